//! Graphics state for the TrueType interpreter.

use std::ops::{Deref, DerefMut};

use font_types::Point;

use crate::{
    round::RoundState,
    zone::{Zone, ZonePointer},
};

/// Axis alignment of a projection or freedom vector.
///
/// Selects fast paths for the common case of axis aligned vectors.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub enum CoordAxis {
    #[default]
    Both,
    X,
    Y,
}

/// The rasterizer behavior that the interpreter reports and emulates.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub enum InterpreterVersion {
    /// Classic interpreter where hints apply on both axes.
    V35,
    /// Subpixel interpreter with optional x axis hinting suppression.
    #[default]
    V40,
}

/// Complete interpreter state that is not tied to a particular program.
///
/// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_graphics_state>
#[derive(Debug)]
pub struct GraphicsState<'a> {
    /// Fields that persist from the control value program into glyph
    /// programs.
    pub retained: RetainedGraphicsState,
    /// 2.14 unit vector used to measure distances.
    pub proj_vector: Point<i32>,
    pub proj_axis: CoordAxis,
    /// Projection vector used to measure original outline distances.
    pub dual_proj_vector: Point<i32>,
    pub dual_proj_axis: CoordAxis,
    /// 2.14 unit vector along which points move.
    pub freedom_vector: Point<i32>,
    pub freedom_axis: CoordAxis,
    /// Dot product of the freedom and projection vectors in 2.14.
    pub fdotp: i32,
    pub round_state: RoundState,
    pub rp0: usize,
    pub rp1: usize,
    pub rp2: usize,
    /// Repeat count for instructions that honor `SLOOP`.
    pub loop_counter: u32,
    pub zp0: ZonePointer,
    pub zp1: ZonePointer,
    pub zp2: ZonePointer,
    /// Twilight and glyph zones, indexed by [`ZonePointer`].
    pub zones: [Zone<'a>; 2],
    /// Suppresses x axis movement, and y axis movement once `IUP` has run
    /// on both axes.
    pub backward_compatibility: bool,
    /// Makes recoverable faults fatal.
    pub is_pedantic: bool,
    pub did_iup_x: bool,
    pub did_iup_y: bool,
}

impl GraphicsState<'_> {
    /// Restores the defaults for a new program run, keeping the retained
    /// state and zones.
    pub fn reset(&mut self) {
        let GraphicsState {
            retained,
            zones,
            backward_compatibility,
            is_pedantic,
            ..
        } = std::mem::take(self);
        *self = GraphicsState {
            retained,
            zones,
            backward_compatibility,
            is_pedantic,
            ..Default::default()
        };
        self.update_projection_state();
    }

    /// Restores retained defaults, keeping the scale and interpreter
    /// version.
    pub fn reset_retained(&mut self) {
        self.retained = RetainedGraphicsState::new(self.scale, self.ppem, self.version);
    }
}

impl Default for GraphicsState<'_> {
    fn default() -> Self {
        // every vector starts on the x axis
        let vector = Point::new(0x4000, 0);
        Self {
            retained: RetainedGraphicsState::default(),
            proj_vector: vector,
            proj_axis: CoordAxis::X,
            dual_proj_vector: vector,
            dual_proj_axis: CoordAxis::X,
            freedom_vector: vector,
            freedom_axis: CoordAxis::X,
            fdotp: 0x4000,
            round_state: RoundState::default(),
            rp0: 0,
            rp1: 0,
            rp2: 0,
            loop_counter: 1,
            zp0: ZonePointer::default(),
            zp1: ZonePointer::default(),
            zp2: ZonePointer::default(),
            zones: [Zone::default(), Zone::default()],
            backward_compatibility: true,
            is_pedantic: false,
            did_iup_x: false,
            did_iup_y: false,
        }
    }
}

/// Graphics state set by the control value program that carries over
/// into each glyph program.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct RetainedGraphicsState {
    pub auto_flip: bool,
    /// 26.6 threshold for preferring the CVT value in `MIRP`/`MIAP`.
    pub control_value_cutin: i32,
    pub delta_base: u16,
    pub delta_shift: u16,
    /// Flags set by `INSTCTRL`.
    pub instruct_control: u8,
    pub min_distance: i32,
    pub scan_control: bool,
    pub scan_type: i32,
    pub single_width_cutin: i32,
    pub single_width: i32,
    pub version: InterpreterVersion,
    /// Font units to 26.6 pixels in 16.16.
    pub scale: i32,
    pub ppem: i32,
}

impl RetainedGraphicsState {
    pub fn new(scale: i32, ppem: i32, version: InterpreterVersion) -> Self {
        Self {
            scale,
            ppem,
            version,
            ..Default::default()
        }
    }
}

impl Default for RetainedGraphicsState {
    fn default() -> Self {
        Self {
            auto_flip: true,
            // 17/16 pixel
            control_value_cutin: 68,
            delta_base: 9,
            delta_shift: 3,
            instruct_control: 0,
            min_distance: 64,
            scan_control: false,
            scan_type: 0,
            single_width_cutin: 0,
            single_width: 0,
            version: InterpreterVersion::default(),
            scale: 0,
            ppem: 0,
        }
    }
}

impl Deref for GraphicsState<'_> {
    type Target = RetainedGraphicsState;

    fn deref(&self) -> &Self::Target {
        &self.retained
    }
}

impl DerefMut for GraphicsState<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.retained
    }
}
