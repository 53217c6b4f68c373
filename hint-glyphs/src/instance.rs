//! Font and size level state for hinting glyph outlines.

use font_types::{F26Dot6, GlyphId, Point};
use read_glyphs::{
    tables::maxp::TrueTypeLimits, BeI16, Bounds, GlyphVector, ReadError, TableProvider,
};

use crate::{
    cow_slice::CowSlice,
    definition::{Definition, DefinitionMap, DefinitionState},
    engine::Engine,
    error::HintError,
    graphics::{InterpreterVersion, RetainedGraphicsState},
    math,
    program::{Program, ProgramState},
    value_stack::ValueStack,
    zone::{PointFlags, Zone},
};

/// Stack slots allocated beyond the maximum declared in `maxp`.
const STACK_PADDING: usize = 32;

/// Points allocated in the twilight zone beyond the maximum declared in
/// `maxp`.
const TWILIGHT_PADDING: usize = 4;

/// Number of phantom points appended to each glyph outline.
const PHANTOM_POINT_COUNT: usize = 4;

/// Configuration for a [`TrueTypeInterpreter`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct HintingOptions {
    /// Treat recoverable faults, such as out of range points in delta
    /// instructions or invalid `INSTCTRL` arguments, as errors.
    pub pedantic: bool,
    /// Run glyph programs in the compatibility mode of the version 40
    /// interpreter, where horizontal movement is ignored.
    ///
    /// When false, the interpreter reports itself as version 35 and every
    /// instruction applies as written.
    pub backward_compatibility: bool,
}

impl Default for HintingOptions {
    fn default() -> Self {
        Self {
            pedantic: false,
            backward_compatibility: true,
        }
    }
}

/// Metrics used to place the four phantom points of a glyph.
///
/// All values are in font units.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct PhantomMetrics {
    pub advance_width: u16,
    pub lsb: i16,
    pub ascender: i16,
    pub descender: i16,
}

impl PhantomMetrics {
    /// Reads the metrics for `glyph_id` from the `hmtx` and `hhea` tables.
    ///
    /// Missing or unreadable tables produce zero values.
    pub fn new(font: &impl TableProvider, glyph_id: GlyphId) -> Self {
        let (advance_width, lsb) = font
            .hmtx()
            .map(|hmtx| {
                (
                    hmtx.advance(glyph_id).unwrap_or_default(),
                    hmtx.side_bearing(glyph_id).unwrap_or_default(),
                )
            })
            .unwrap_or_default();
        let (ascender, descender) = font
            .hhea()
            .map(|hhea| (hhea.ascender, hhea.descender))
            .unwrap_or_default();
        Self {
            advance_width,
            lsb,
            ascender,
            descender,
        }
    }

    /// Returns the phantom points for a glyph with the given minimum x
    /// coordinate.
    ///
    /// In order: horizontal origin, advance width, top and bottom.
    fn points(&self, x_min: i32) -> [Point<i32>; PHANTOM_POINT_COUNT] {
        let origin = x_min - self.lsb as i32;
        [
            Point::new(origin, 0),
            Point::new(origin + self.advance_width as i32, 0),
            Point::new(0, self.ascender as i32),
            Point::new(0, self.descender as i32),
        ]
    }
}

/// Executes the TrueType programs of a font.
///
/// The font program runs once on construction. The control value program
/// runs on each call to [`set_size`](Self::set_size), after which any
/// number of glyphs can be hinted at that size. Glyph programs work on
/// copies of the CVT and storage area so they never affect each other.
///
/// A font or control value program that fails disables hinting rather
/// than producing an error; [`hint_glyph`](Self::hint_glyph) then leaves
/// outlines unchanged.
pub struct TrueTypeInterpreter<'a> {
    fpgm: &'a [u8],
    prep: &'a [u8],
    cvt: &'a [BeI16],
    units_per_em: u16,
    limits: TrueTypeLimits,
    options: HintingOptions,
    /// State left behind by the font program, if it succeeded.
    font_state: Option<ProgramOutput>,
    /// State left behind by the control value program, if it succeeded.
    size: Option<SizeState>,
}

/// Definitions and storage produced by running a program.
#[derive(Clone)]
struct ProgramOutput {
    functions: Vec<Definition>,
    instructions: Vec<Definition>,
    storage: Vec<i32>,
}

impl ProgramOutput {
    fn new(limits: &TrueTypeLimits) -> Self {
        Self {
            functions: vec![Definition::default(); limits.max_function_defs as usize],
            instructions: vec![Definition::default(); limits.max_instruction_defs as usize],
            storage: vec![0; limits.max_storage as usize],
        }
    }
}

#[derive(Clone, Default)]
struct Twilight {
    original: Vec<Point<F26Dot6>>,
    points: Vec<Point<F26Dot6>>,
    flags: Vec<PointFlags>,
}

impl Twilight {
    fn new(len: usize) -> Self {
        Self {
            original: vec![Point::default(); len],
            points: vec![Point::default(); len],
            flags: vec![PointFlags::default(); len],
        }
    }

    fn zone(&mut self) -> Zone<'_> {
        Zone::new(&[], &mut self.original, &mut self.points, &mut self.flags, &[])
    }
}

struct SizeState {
    ppem: u16,
    /// Font units to 26.6 in 16.16.
    scale: i32,
    output: ProgramOutput,
    cvt: Vec<i32>,
    graphics: RetainedGraphicsState,
    twilight: Twilight,
}

impl SizeState {
    fn is_enabled(&self) -> bool {
        // INSTCTRL bit 0 inhibits grid fitting
        self.graphics.instruct_control & 1 == 0
    }
}

impl<'a> TrueTypeInterpreter<'a> {
    /// Reads the hinting tables of `font` and runs its font program.
    ///
    /// Fails only if `head`, `maxp` or `cvt ` can't be read. A font
    /// without TrueType limits in `maxp` gets no storage or definitions.
    pub fn new(font: &'a impl TableProvider, options: HintingOptions) -> Result<Self, ReadError> {
        let units_per_em = font.head()?.units_per_em;
        let limits = font.maxp()?.truetype.unwrap_or_default();
        let mut interpreter = Self {
            fpgm: font.fpgm(),
            prep: font.prep(),
            cvt: font.cvt()?,
            units_per_em,
            limits,
            options,
            font_state: None,
            size: None,
        };
        interpreter.font_state = interpreter
            .run_font_program()
            .inspect_err(|e| log::warn!("font program failed, hinting disabled: {e}"))
            .ok();
        Ok(interpreter)
    }

    pub fn options(&self) -> HintingOptions {
        self.options
    }

    /// Returns the size most recently set with [`set_size`](Self::set_size)
    /// if its control value program succeeded.
    pub fn ppem(&self) -> Option<u16> {
        self.size.as_ref().map(|size| size.ppem)
    }

    /// Returns true if glyphs will be hinted at the current size.
    pub fn is_enabled(&self) -> bool {
        self.size.as_ref().is_some_and(SizeState::is_enabled)
    }

    /// Scales the CVT to `ppem` pixels per em and runs the control value
    /// program.
    pub fn set_size(&mut self, ppem: u16) {
        self.size = None;
        let Some(font_state) = &self.font_state else {
            return;
        };
        if ppem == 0 || self.units_per_em == 0 {
            return;
        }
        let scale = math::div(ppem as i32 * 64, self.units_per_em as i32);
        let mut size = SizeState {
            ppem,
            scale,
            output: font_state.clone(),
            cvt: self
                .cvt
                .iter()
                .map(|value| math::mul(value.get() as i32, scale))
                .collect(),
            graphics: RetainedGraphicsState::new(scale, ppem as i32, self.version()),
            twilight: Twilight::new(self.twilight_len()),
        };
        match self.run_control_value_program(&mut size) {
            Ok(()) => {
                if !size.is_enabled() {
                    log::debug!("control value program inhibits hinting at {ppem} ppem");
                }
                self.size = Some(size);
            }
            Err(e) => log::warn!("control value program failed at {ppem} ppem: {e}"),
        }
    }

    /// Runs the glyph program for `glyph` and writes the hinted positions
    /// back in font units.
    ///
    /// Returns the four phantom points in font units. Glyphs without
    /// instructions, and all glyphs when hinting is disabled, are left
    /// unchanged. On error the glyph is also left unchanged.
    pub fn hint_glyph(
        &self,
        glyph_id: GlyphId,
        glyph: &mut GlyphVector,
        metrics: PhantomMetrics,
    ) -> Result<[Point<f32>; 4], HintError> {
        let x_min = glyph.bounds().min.x.round() as i32;
        let phantom = metrics.points(x_min);
        let Some(size) = self.size.as_ref().filter(|size| size.is_enabled()) else {
            return Ok(phantom.map(|p| Point::new(p.x as f32, p.y as f32)));
        };
        if glyph.instructions.is_empty() {
            return Ok(phantom.map(|p| Point::new(p.x as f32, p.y as f32)));
        }
        let unscaled = glyph
            .control_points
            .iter()
            .map(|point| {
                Point::new(
                    point.position.x.round() as i32,
                    point.position.y.round() as i32,
                )
            })
            .chain(phantom)
            .collect::<Vec<_>>();
        let mut original = unscaled
            .iter()
            .map(|p| p.map(|v| F26Dot6::from_bits(math::mul(v, size.scale))))
            .collect::<Vec<_>>();
        let mut points = original.clone();
        let phantom_start = glyph.control_points.len();
        // phantom points are grid fitted before the glyph program runs
        let mut rounded_phantom = [Point::default(); PHANTOM_POINT_COUNT];
        for (i, (point, rounded)) in points[phantom_start..]
            .iter_mut()
            .zip(&mut rounded_phantom)
            .enumerate()
        {
            if i < 2 {
                point.x = F26Dot6::from_bits(math::round(point.x.to_bits()));
            } else {
                point.y = F26Dot6::from_bits(math::round(point.y.to_bits()));
            }
            *rounded = *point;
        }
        let mut flags = glyph
            .control_points
            .iter()
            .map(|point| {
                if point.on_curve {
                    PointFlags::on_curve()
                } else {
                    PointFlags::off_curve()
                }
            })
            .chain([PointFlags::off_curve(); PHANTOM_POINT_COUNT])
            .collect::<Vec<_>>();
        let mut twilight = size.twilight.clone();
        let (mut cvt, mut storage) = (Vec::new(), Vec::new());
        let mut stack = vec![0; self.stack_len()];
        let mut engine = Engine::new(
            ProgramState::new(self.fpgm, self.prep, &glyph.instructions, Program::Glyph),
            size.graphics,
            DefinitionState::new(
                DefinitionMap::Ref(&size.output.functions),
                DefinitionMap::Ref(&size.output.instructions),
            ),
            CowSlice::new(&size.cvt, &mut cvt),
            CowSlice::new(&size.output.storage, &mut storage),
            ValueStack::new(&mut stack),
            twilight.zone(),
            Zone::new(
                &unscaled,
                &mut original,
                &mut points,
                &mut flags,
                &glyph.end_points,
            ),
            self.options.pedantic,
        );
        if let Err(mut e) = engine.run_program(Program::Glyph) {
            e.glyph_id = Some(glyph_id);
            log::warn!("glyph program failed, glyph left unhinted: {e}");
            return Err(e);
        }
        // compatibility mode keeps the grid fitted phantom points
        let keep_phantom = engine.backward_compatibility();
        let to_font_units = |v: i32| {
            (v as f64 * self.units_per_em as f64 / (64.0 * size.ppem as f64)) as f32
        };
        let to_point = |p: &Point<F26Dot6>| {
            Point::new(to_font_units(p.x.to_bits()), to_font_units(p.y.to_bits()))
        };
        for ((control, point), point_flags) in glyph.control_points.iter_mut().zip(&points).zip(&flags)
        {
            control.position = to_point(point);
            control.on_curve = point_flags.is_on_curve();
        }
        glyph.bounds = Bounds::from_points(glyph.control_points.iter().map(|p| p.position));
        let hinted_phantom = if keep_phantom {
            &rounded_phantom[..]
        } else {
            &points[phantom_start..]
        };
        let mut result = [Point::default(); PHANTOM_POINT_COUNT];
        for (out, point) in result.iter_mut().zip(hinted_phantom) {
            *out = to_point(point);
        }
        Ok(result)
    }

    fn version(&self) -> InterpreterVersion {
        if self.options.backward_compatibility {
            InterpreterVersion::V40
        } else {
            InterpreterVersion::V35
        }
    }

    fn stack_len(&self) -> usize {
        self.limits.max_stack_elements as usize + STACK_PADDING
    }

    fn twilight_len(&self) -> usize {
        self.limits.max_twilight_points as usize + TWILIGHT_PADDING
    }

    fn run_font_program(&self) -> Result<ProgramOutput, HintError> {
        let mut output = ProgramOutput::new(&self.limits);
        let mut twilight = Twilight::new(self.twilight_len());
        let mut cvt = Vec::new();
        let mut stack = vec![0; self.stack_len()];
        let mut engine = Engine::new(
            ProgramState::new(self.fpgm, self.prep, &[], Program::Font),
            // no size is known yet so the font program sees font units
            RetainedGraphicsState::new(0x10000, self.units_per_em as i32, self.version()),
            DefinitionState::new(
                DefinitionMap::Mut(&mut output.functions),
                DefinitionMap::Mut(&mut output.instructions),
            ),
            CowSlice::new_mut(&mut cvt),
            CowSlice::new_mut(&mut output.storage),
            ValueStack::new(&mut stack),
            twilight.zone(),
            Zone::default(),
            self.options.pedantic,
        );
        engine.run_program(Program::Font)?;
        log::debug!("font program ran ({} bytes)", self.fpgm.len());
        Ok(output)
    }

    fn run_control_value_program(&self, size: &mut SizeState) -> Result<(), HintError> {
        let SizeState {
            output,
            cvt,
            graphics,
            twilight,
            ..
        } = size;
        let mut stack = vec![0; self.stack_len()];
        let mut engine = Engine::new(
            ProgramState::new(self.fpgm, self.prep, &[], Program::ControlValue),
            *graphics,
            DefinitionState::new(
                DefinitionMap::Mut(&mut output.functions),
                DefinitionMap::Mut(&mut output.instructions),
            ),
            CowSlice::new_mut(cvt),
            CowSlice::new_mut(&mut output.storage),
            ValueStack::new(&mut stack),
            twilight.zone(),
            Zone::default(),
            self.options.pedantic,
        );
        engine.run_program(Program::ControlValue)?;
        *graphics = *engine.retained_graphics_state();
        Ok(())
    }
}
