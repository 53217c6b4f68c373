//! Managing the graphics state.
//!
//! Implements 45 instructions.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#managing-the-graphics-state>

use font_types::Point;

use super::{Engine, HintErrorKind, OpResult};
use crate::{
    graphics::InterpreterVersion,
    math,
    program::Program,
    zone::{point_delta, ZonePointer},
};

impl Engine<'_> {
    /// Set vectors to coordinate axis.
    ///
    /// SVTCA[a] (0x00 - 0x01)
    /// SPVTCA[a] (0x02 - 0x03)
    /// SFVTCA[a] (0x04 - 0x05)
    ///
    /// Odd opcodes select the x axis and even opcodes the y axis. `SVTCA`
    /// sets both the projection and freedom vectors.
    pub(super) fn op_svtca(&mut self, opcode: u8) -> OpResult {
        let vector = if opcode & 1 != 0 {
            Point::new(0x4000, 0)
        } else {
            Point::new(0, 0x4000)
        };
        let (set_pv, set_fv) = match opcode >> 1 {
            0 => (true, true),
            1 => (true, false),
            _ => (false, true),
        };
        let gs = &mut self.graphics;
        if set_pv {
            gs.proj_vector = vector;
            gs.dual_proj_vector = vector;
        }
        if set_fv {
            gs.freedom_vector = vector;
        }
        gs.update_projection_state();
        Ok(())
    }

    /// Set vector to line.
    ///
    /// SPVTL[a] (0x06 - 0x07)
    /// SFVTL[a] (0x08 - 0x09)
    ///
    /// Pops: p2: point number
    ///       p1: point number
    ///
    /// Sets the projection or freedom vector parallel to the line from p2
    /// in zp2 to p1 in zp1, or perpendicular to it for odd opcodes.
    pub(super) fn op_svtl(&mut self, opcode: u8) -> OpResult {
        let p2 = self.value_stack.pop_usize()?;
        let p1 = self.value_stack.pop_usize()?;
        let gs = &mut self.graphics;
        let delta = point_delta(gs.zp1().point(p1)?, gs.zp2().point(p2)?);
        let vector = line_vector(delta, opcode & 1 != 0);
        if opcode < 0x08 {
            gs.proj_vector = vector;
            gs.dual_proj_vector = vector;
        } else {
            gs.freedom_vector = vector;
        }
        gs.update_projection_state();
        Ok(())
    }

    /// Set dual projection vector to line.
    ///
    /// SDPVTL[a] (0x86 - 0x87)
    ///
    /// Pops: p2: point number
    ///       p1: point number
    ///
    /// Like `SPVTL` but also sets the dual projection vector from the
    /// original positions of the points.
    pub(super) fn op_sdpvtl(&mut self, opcode: u8) -> OpResult {
        let p2 = self.value_stack.pop_usize()?;
        let p1 = self.value_stack.pop_usize()?;
        let perpendicular = opcode & 1 != 0;
        let gs = &mut self.graphics;
        let original = point_delta(gs.zp1().original(p1)?, gs.zp2().original(p2)?);
        let current = point_delta(gs.zp1().point(p1)?, gs.zp2().point(p2)?);
        gs.dual_proj_vector = line_vector(original, perpendicular);
        gs.proj_vector = line_vector(current, perpendicular);
        gs.update_projection_state();
        Ok(())
    }

    /// Set projection vector from stack.
    ///
    /// SPVFS[] (0x0A)
    ///
    /// Pops: y: y component of projection vector (2.14 padded with zeros)
    ///       x: x component of projection vector (2.14 padded with zeros)
    pub(super) fn op_spvfs(&mut self) -> OpResult {
        if let Some(vector) = self.pop_vector()? {
            self.graphics.proj_vector = vector;
            self.graphics.dual_proj_vector = vector;
            self.graphics.update_projection_state();
        }
        Ok(())
    }

    /// Set freedom vector from stack.
    ///
    /// SFVFS[] (0x0B)
    ///
    /// Pops: y: y component of freedom vector (2.14 padded with zeros)
    ///       x: x component of freedom vector (2.14 padded with zeros)
    pub(super) fn op_sfvfs(&mut self) -> OpResult {
        if let Some(vector) = self.pop_vector()? {
            self.graphics.freedom_vector = vector;
            self.graphics.update_projection_state();
        }
        Ok(())
    }

    /// Pops a vector and normalizes it, returning `None` for the zero
    /// vector.
    fn pop_vector(&mut self) -> Result<Option<Point<i32>>, HintErrorKind> {
        let y = self.value_stack.pop()? as i16 as i32;
        let x = self.value_stack.pop()? as i16 as i32;
        Ok((x != 0 || y != 0).then(|| math::normalize14(x, y)))
    }

    /// Get projection vector.
    ///
    /// GPV[] (0x0C)
    ///
    /// Pushes: x: x component of projection vector (2.14)
    ///         y: y component of projection vector (2.14)
    pub(super) fn op_gpv(&mut self) -> OpResult {
        let vector = self.graphics.proj_vector;
        self.value_stack.push(vector.x)?;
        self.value_stack.push(vector.y)
    }

    /// Get freedom vector.
    ///
    /// GFV[] (0x0D)
    ///
    /// Pushes: x: x component of freedom vector (2.14)
    ///         y: y component of freedom vector (2.14)
    pub(super) fn op_gfv(&mut self) -> OpResult {
        let vector = self.graphics.freedom_vector;
        self.value_stack.push(vector.x)?;
        self.value_stack.push(vector.y)
    }

    /// Set freedom vector to projection vector.
    ///
    /// SFVTPV[] (0x0E)
    pub(super) fn op_sfvtpv(&mut self) -> OpResult {
        self.graphics.freedom_vector = self.graphics.proj_vector;
        self.graphics.update_projection_state();
        Ok(())
    }

    /// Set reference point 0.
    ///
    /// SRP0[] (0x10)
    ///
    /// Pops: p: point number
    pub(super) fn op_srp0(&mut self) -> OpResult {
        self.graphics.rp0 = self.value_stack.pop_usize()?;
        Ok(())
    }

    /// Set reference point 1.
    ///
    /// SRP1[] (0x11)
    pub(super) fn op_srp1(&mut self) -> OpResult {
        self.graphics.rp1 = self.value_stack.pop_usize()?;
        Ok(())
    }

    /// Set reference point 2.
    ///
    /// SRP2[] (0x12)
    pub(super) fn op_srp2(&mut self) -> OpResult {
        self.graphics.rp2 = self.value_stack.pop_usize()?;
        Ok(())
    }

    /// Set zone pointer 0.
    ///
    /// SZP0[] (0x13)
    ///
    /// Pops: n: zone number
    pub(super) fn op_szp0(&mut self) -> OpResult {
        self.graphics.zp0 = self.pop_zone()?;
        Ok(())
    }

    /// Set zone pointer 1.
    ///
    /// SZP1[] (0x14)
    pub(super) fn op_szp1(&mut self) -> OpResult {
        self.graphics.zp1 = self.pop_zone()?;
        Ok(())
    }

    /// Set zone pointer 2.
    ///
    /// SZP2[] (0x15)
    pub(super) fn op_szp2(&mut self) -> OpResult {
        self.graphics.zp2 = self.pop_zone()?;
        Ok(())
    }

    /// Set all zone pointers.
    ///
    /// SZPS[] (0x16)
    pub(super) fn op_szps(&mut self) -> OpResult {
        let zone = self.pop_zone()?;
        self.graphics.zp0 = zone;
        self.graphics.zp1 = zone;
        self.graphics.zp2 = zone;
        Ok(())
    }

    fn pop_zone(&mut self) -> Result<ZonePointer, HintErrorKind> {
        ZonePointer::try_from(self.value_stack.pop()?)
    }

    /// Set loop variable.
    ///
    /// SLOOP[] (0x17)
    ///
    /// Pops: n: value for loop graphics state variable
    pub(super) fn op_sloop(&mut self) -> OpResult {
        let n = self.value_stack.pop()?;
        if n < 0 {
            return Err(HintErrorKind::NegativeLoopCounter);
        }
        self.graphics.loop_counter = n.min(0xFFFF) as u32;
        Ok(())
    }

    /// Set minimum distance.
    ///
    /// SMD[] (0x1A)
    ///
    /// Pops: distance (F26Dot6)
    pub(super) fn op_smd(&mut self) -> OpResult {
        self.graphics.min_distance = self.value_stack.pop()?;
        Ok(())
    }

    /// Set control value table cut in.
    ///
    /// SCVTCI[] (0x1D)
    ///
    /// Pops: n: value for cut_in (F26Dot6)
    pub(super) fn op_scvtci(&mut self) -> OpResult {
        self.graphics.control_value_cutin = self.value_stack.pop()?;
        Ok(())
    }

    /// Set single width cut in.
    ///
    /// SSWCI[] (0x1E)
    ///
    /// Pops: n: value for single_width_cut_in (F26Dot6)
    pub(super) fn op_sswci(&mut self) -> OpResult {
        self.graphics.single_width_cutin = self.value_stack.pop()?;
        Ok(())
    }

    /// Set single width.
    ///
    /// SSW[] (0x1F)
    ///
    /// Pops: n: value for single_width_value (font units)
    pub(super) fn op_ssw(&mut self) -> OpResult {
        let n = self.value_stack.pop()?;
        self.graphics.single_width = math::mul(n, self.graphics.scale);
        Ok(())
    }

    /// Set the auto flip boolean to on.
    ///
    /// FLIPON[] (0x4D)
    pub(super) fn op_flipon(&mut self) -> OpResult {
        self.graphics.auto_flip = true;
        Ok(())
    }

    /// Set the auto flip boolean to off.
    ///
    /// FLIPOFF[] (0x4E)
    pub(super) fn op_flipoff(&mut self) -> OpResult {
        self.graphics.auto_flip = false;
        Ok(())
    }

    /// Set delta base in the graphics state.
    ///
    /// SDB[] (0x5E)
    ///
    /// Pops: n: value for delta_base
    pub(super) fn op_sdb(&mut self) -> OpResult {
        self.graphics.delta_base = self.value_stack.pop()? as u16;
        Ok(())
    }

    /// Set delta shift in the graphics state.
    ///
    /// SDS[] (0x5F)
    ///
    /// Pops: n: value for delta_shift
    ///
    /// Values outside 0..=6 are clamped to 6.
    pub(super) fn op_sds(&mut self) -> OpResult {
        let n = self.value_stack.pop()? as u32;
        self.graphics.delta_shift = n.min(6) as u16;
        Ok(())
    }

    /// Scan conversion control.
    ///
    /// SCANCTRL[] (0x85)
    ///
    /// Pops: n: flags indicating when to turn on dropout control mode
    ///
    /// Glyphs are never rotated or stretched here, so only the ppem
    /// threshold bits have any effect.
    pub(super) fn op_scanctrl(&mut self) -> OpResult {
        let n = self.value_stack.pop()?;
        let threshold = n & 0xFF;
        let gs = &mut self.graphics;
        match threshold {
            0xFF => gs.scan_control = true,
            0 => gs.scan_control = false,
            _ => {
                if n & 0x100 != 0 && gs.ppem <= threshold {
                    gs.scan_control = true;
                }
                if n & 0x800 != 0 && gs.ppem > threshold {
                    gs.scan_control = false;
                }
            }
        }
        Ok(())
    }

    /// Scan type.
    ///
    /// SCANTYPE[] (0x8D)
    ///
    /// Pops: n: 16 bit integer
    pub(super) fn op_scantype(&mut self) -> OpResult {
        let n = self.value_stack.pop()?;
        if n >= 0 {
            self.graphics.scan_type = n & 0xFFFF;
        }
        Ok(())
    }

    /// Instruction execution control.
    ///
    /// INSTCTRL[] (0x8E)
    ///
    /// Pops: s: selector flag
    ///       value: used to set value of instruction_control
    ///
    /// Selectors are indices 1 through 3 and the value must be either zero
    /// or the flag for the selector. The control value program sets the
    /// flags. Glyph programs may only toggle backward compatibility through
    /// selector 3.
    pub(super) fn op_instctrl(&mut self) -> OpResult {
        let selector = self.value_stack.pop()?;
        let value = self.value_stack.pop()?;
        if !(1..=3).contains(&selector) {
            return self.pedantic_error(HintErrorKind::InvalidStackValue(selector));
        }
        let flag = 1 << (selector - 1);
        if value != 0 && value != flag {
            return self.pedantic_error(HintErrorKind::InvalidStackValue(value));
        }
        match self.program.initial {
            Program::ControlValue => {
                let gs = &mut self.graphics;
                gs.instruct_control = (gs.instruct_control & !(flag as u8)) | value as u8;
            }
            Program::Glyph if selector == 3 => {
                if self.graphics.version == InterpreterVersion::V40 {
                    self.graphics.backward_compatibility = value != 4;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Fails with `error` in pedantic mode and silently continues
    /// otherwise.
    pub(super) fn pedantic_error(&self, error: HintErrorKind) -> OpResult {
        if self.graphics.is_pedantic {
            Err(error)
        } else {
            Ok(())
        }
    }
}

/// Unit vector along `delta`, rotated 90 degrees counterclockwise when
/// `perpendicular` is set.
///
/// Coincident points produce the x axis.
fn line_vector(delta: Point<i32>, perpendicular: bool) -> Point<i32> {
    if delta.x == 0 && delta.y == 0 {
        return Point::new(0x4000, 0);
    }
    if perpendicular {
        math::normalize14(delta.y.wrapping_neg(), delta.x)
    } else {
        math::normalize14(delta.x, delta.y)
    }
}
