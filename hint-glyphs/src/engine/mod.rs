//! TrueType bytecode interpreter.

mod arith;
mod control_flow;
mod cvt;
mod data;
mod definition;
mod delta;
mod dispatch;
mod graphics;
mod logical;
mod misc;
mod outline;
mod round;
mod stack;
mod storage;

use crate::{
    cow_slice::CowSlice,
    definition::DefinitionState,
    error::HintErrorKind,
    graphics::{GraphicsState, RetainedGraphicsState},
    program::ProgramState,
    value_stack::ValueStack,
    zone::Zone,
};

pub type OpResult = Result<(), HintErrorKind>;

/// The interpreter proper.
///
/// Borrows everything it operates on so that the same machinery runs the
/// font, control value and glyph programs against buffers owned by the
/// caller.
pub struct Engine<'a> {
    pub(crate) program: ProgramState<'a>,
    pub(crate) graphics: GraphicsState<'a>,
    pub(crate) definitions: DefinitionState<'a>,
    pub(crate) cvt: CowSlice<'a>,
    pub(crate) storage: CowSlice<'a>,
    pub(crate) value_stack: ValueStack<'a>,
}

impl<'a> Engine<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        program: ProgramState<'a>,
        retained: RetainedGraphicsState,
        definitions: DefinitionState<'a>,
        cvt: CowSlice<'a>,
        storage: CowSlice<'a>,
        value_stack: ValueStack<'a>,
        twilight: Zone<'a>,
        glyph: Zone<'a>,
        is_pedantic: bool,
    ) -> Self {
        let mut graphics = GraphicsState {
            retained,
            zones: [twilight, glyph],
            backward_compatibility: false,
            is_pedantic,
            ..Default::default()
        };
        graphics.update_projection_state();
        Self {
            program,
            graphics,
            definitions,
            cvt,
            storage,
            value_stack,
        }
    }

    pub fn retained_graphics_state(&self) -> &RetainedGraphicsState {
        &self.graphics.retained
    }

    pub fn backward_compatibility(&self) -> bool {
        self.graphics.backward_compatibility
    }
}

#[cfg(test)]
use font_types::{F26Dot6, Point};

#[cfg(test)]
use crate::{
    definition::{Definition, DefinitionMap},
    graphics::InterpreterVersion,
    program::Program,
    zone::PointFlags,
};

/// Owns the buffers borrowed by an [`Engine`] in tests.
///
/// The glyph zone holds 64 off-curve points in four contours of 16, with
/// unscaled x coordinates equal to the point index times 64 and original
/// coordinates equal to the unscaled ones. The twilight zone holds 16
/// points.
#[cfg(test)]
pub(crate) struct MockEngine {
    cvt: Vec<i32>,
    storage: Vec<i32>,
    stack: Vec<i32>,
    functions: Vec<Definition>,
    instructions: Vec<Definition>,
    unscaled: Vec<Point<i32>>,
    original: Vec<Point<F26Dot6>>,
    points: Vec<Point<F26Dot6>>,
    flags: Vec<PointFlags>,
    contours: Vec<u16>,
    twilight_original: Vec<Point<F26Dot6>>,
    twilight_points: Vec<Point<F26Dot6>>,
    twilight_flags: Vec<PointFlags>,
}

#[cfg(test)]
impl MockEngine {
    pub const POINT_COUNT: usize = 64;

    pub fn new() -> Self {
        let unscaled = (0..Self::POINT_COUNT as i32)
            .map(|i| Point::new(i * 64, i * 32))
            .collect::<Vec<_>>();
        let original = unscaled
            .iter()
            .map(|p| p.map(F26Dot6::from_bits))
            .collect::<Vec<_>>();
        Self {
            cvt: (0..32).map(|i| i * 64).collect(),
            storage: vec![0; 32],
            stack: vec![0; 256],
            functions: vec![Definition::default(); 32],
            instructions: vec![Definition::default(); 8],
            points: original.clone(),
            original,
            unscaled,
            flags: vec![PointFlags::off_curve(); Self::POINT_COUNT],
            contours: vec![15, 31, 47, 63],
            twilight_original: vec![Point::default(); 16],
            twilight_points: vec![Point::default(); 16],
            twilight_flags: vec![PointFlags::default(); 16],
        }
    }

    pub fn engine(&mut self) -> Engine<'_> {
        let twilight = Zone::new(
            &[],
            &mut self.twilight_original,
            &mut self.twilight_points,
            &mut self.twilight_flags,
            &[],
        );
        let glyph = Zone::new(
            &self.unscaled,
            &mut self.original,
            &mut self.points,
            &mut self.flags,
            &self.contours,
        );
        Engine::new(
            ProgramState::new(&[], &[], &[], Program::Font),
            // identity scale so font units and 26.6 coincide
            RetainedGraphicsState::new(0x10000, 16, InterpreterVersion::V40),
            DefinitionState::new(
                DefinitionMap::Mut(&mut self.functions),
                DefinitionMap::Mut(&mut self.instructions),
            ),
            CowSlice::new_mut(&mut self.cvt),
            CowSlice::new_mut(&mut self.storage),
            ValueStack::new(&mut self.stack),
            twilight,
            glyph,
            false,
        )
    }
}

#[cfg(test)]
impl<'a> Engine<'a> {
    /// Replaces the bytecode of `program` and positions the decoder at
    /// its start.
    pub(crate) fn set_code(&mut self, program: Program, code: &'a [u8]) {
        self.program.bytecode[program as usize] = code;
        self.program.reset(program);
    }
}
