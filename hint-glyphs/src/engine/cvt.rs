//! Managing the control value table.
//!
//! Implements 3 instructions.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#managing-the-control-value-table>

use super::{Engine, HintErrorKind, OpResult};
use crate::math;

impl Engine<'_> {
    /// Write control value table in pixel units.
    ///
    /// WCVTP[] (0x44)
    ///
    /// Pops: value: number in pixels (F26Dot6)
    ///       location: control value table location
    pub(super) fn op_wcvtp(&mut self) -> OpResult {
        let value = self.value_stack.pop()?;
        let location = self.value_stack.pop_usize()?;
        self.write_cvt(location, value)
    }

    /// Write control value table in font units.
    ///
    /// WCVTF[] (0x70)
    ///
    /// Pops: value: number in font units
    ///       location: control value table location
    ///
    /// The value is scaled to the current size before it is stored.
    pub(super) fn op_wcvtf(&mut self) -> OpResult {
        let value = self.value_stack.pop()?;
        let location = self.value_stack.pop_usize()?;
        self.write_cvt(location, math::mul(value, self.graphics.scale))
    }

    /// Read control value table.
    ///
    /// RCVT[] (0x45)
    ///
    /// Pops: location: CVT entry number
    /// Pushes: value: CVT value (F26Dot6)
    pub(super) fn op_rcvt(&mut self) -> OpResult {
        let location = self.value_stack.pop_usize()?;
        let value = self.read_cvt(location)?;
        self.value_stack.push(value)
    }

    pub(super) fn read_cvt(&self, location: usize) -> Result<i32, HintErrorKind> {
        self.cvt
            .get(location)
            .ok_or(HintErrorKind::InvalidCvtIndex(location))
    }

    pub(super) fn write_cvt(&mut self, location: usize, value: i32) -> OpResult {
        self.cvt
            .set(location, value)
            .ok_or(HintErrorKind::InvalidCvtIndex(location))
    }
}

#[cfg(test)]
mod tests {
    use super::super::MockEngine;
    use crate::{code::opcodes as op, error::HintErrorKind, program::Program};

    #[test]
    fn read_and_write() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        #[rustfmt::skip]
        let code = [
            op::PUSHB000, 3,
            op::RCVT,
            op::PUSHB000 + 1, 3, 100,
            op::WCVTP,
            op::PUSHB000, 3,
            op::RCVT,
        ];
        engine.set_code(Program::Font, &code);
        engine.run().unwrap();
        assert_eq!(engine.value_stack.values(), &[192, 100]);
    }

    #[test]
    fn font_units_are_scaled() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        // half size
        engine.graphics.scale = 0x8000;
        engine.value_stack.push(2).unwrap();
        engine.value_stack.push(100).unwrap();
        engine.op_wcvtf().unwrap();
        assert_eq!(engine.cvt.get(2), Some(50));
    }

    #[test]
    fn out_of_bounds() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.value_stack.push(32).unwrap();
        assert_eq!(engine.op_rcvt(), Err(HintErrorKind::InvalidCvtIndex(32)));
        engine.value_stack.push(40).unwrap();
        engine.value_stack.push(1).unwrap();
        assert_eq!(engine.op_wcvtp(), Err(HintErrorKind::InvalidCvtIndex(40)));
    }
}
