//! Reading and writing data.
//!
//! Implements 5 instructions.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#reading-and-writing-data>

use font_types::Point;

use super::{Engine, OpResult};
use crate::math;

impl Engine<'_> {
    /// Get coordinate projected onto the projection vector.
    ///
    /// GC[a] (0x46 - 0x47)
    ///
    /// Pops: p: point number
    /// Pushes: value: coordinate location (F26Dot6)
    ///
    /// `GC[0]` measures the current position and `GC[1]` the original
    /// position along the dual projection vector.
    pub(super) fn op_gc(&mut self, opcode: u8) -> OpResult {
        let p = self.value_stack.pop_usize()?;
        let gs = &self.graphics;
        let value = if opcode & 1 != 0 {
            gs.dual_project(gs.zp2().original(p)?, Point::default())
        } else {
            gs.project(gs.zp2().point(p)?, Point::default())
        };
        self.value_stack.push(value)
    }

    /// Set coordinate from the stack using projection vector and freedom
    /// vector.
    ///
    /// SCFS[] (0x48)
    ///
    /// Pops: value: distance from origin to move point (F26Dot6)
    ///       p: point number
    ///
    /// Twilight points take the new position as their original position
    /// too.
    pub(super) fn op_scfs(&mut self) -> OpResult {
        let value = self.value_stack.pop()?;
        let p = self.value_stack.pop_usize()?;
        let gs = &mut self.graphics;
        let projection = gs.project(gs.zp2().point(p)?, Point::default());
        gs.move_point(gs.zp2, p, value.wrapping_sub(projection))?;
        if gs.zp2.is_twilight() {
            let point = gs.zp2().point(p)?;
            *gs.zp2_mut().original_mut(p)? = point;
        }
        Ok(())
    }

    /// Measure distance.
    ///
    /// MD[a] (0x49 - 0x4A)
    ///
    /// Pops: p1: point number
    ///       p2: point number
    /// Pushes: distance (F26Dot6)
    ///
    /// Measures from p1 in zp1 to p2 in zp0. `MD[1]` uses the current
    /// outline. `MD[0]` uses the original outline, in font units when both
    /// points are in the glyph zone.
    pub(super) fn op_md(&mut self, opcode: u8) -> OpResult {
        let p1 = self.value_stack.pop_usize()?;
        let p2 = self.value_stack.pop_usize()?;
        let gs = &self.graphics;
        let distance = if opcode & 1 != 0 {
            gs.project(gs.zp0().point(p2)?, gs.zp1().point(p1)?)
        } else {
            let (original2, original1) = (gs.zp0().original(p2)?, gs.zp1().original(p1)?);
            if gs.zp0.is_twilight() || gs.zp1.is_twilight() {
                gs.dual_project(original2, original1)
            } else {
                let unscaled = gs.dual_project_raw(gs.zp0().unscaled(p2), gs.zp1().unscaled(p1));
                math::mul(unscaled, gs.scale)
            }
        };
        self.value_stack.push(distance)
    }

    /// Measure pixels per em.
    ///
    /// MPPEM[] (0x4B)
    ///
    /// Pushes: ppem: pixels per em (uint32)
    pub(super) fn op_mppem(&mut self) -> OpResult {
        self.value_stack.push(self.graphics.ppem)
    }

    /// Measure point size.
    ///
    /// MPS[] (0x4C)
    ///
    /// Pushes: pointSize: the size in points of the current glyph (F26Dot6)
    ///
    /// Sizes are treated as 72 dpi so this is the ppem in 26.6.
    pub(super) fn op_mps(&mut self) -> OpResult {
        self.value_stack.push(self.graphics.ppem * 64)
    }
}

#[cfg(test)]
mod tests {
    use font_types::{F26Dot6, Point};

    use super::super::MockEngine;
    use crate::{
        code::opcodes as op, error::HintErrorKind, graphics::CoordAxis, program::Program,
        zone::ZonePointer,
    };

    #[test]
    fn get_coordinate() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.graphics.zones[1].points[3].x += F26Dot6::from_bits(10);
        for (opcode, expected) in [(op::GC0, 202), (op::GC1, 192)] {
            engine.value_stack.push(3).unwrap();
            engine.op_gc(opcode).unwrap();
            assert_eq!(engine.value_stack.pop().unwrap(), expected);
        }
        engine.value_stack.push(64).unwrap();
        assert_eq!(
            engine.op_gc(op::GC0),
            Err(HintErrorKind::InvalidPointIndex(64))
        );
    }

    #[test]
    fn set_coordinate() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.value_stack.push(3).unwrap();
        engine.value_stack.push(300).unwrap();
        engine.op_scfs().unwrap();
        let zone = engine.graphics.zone(ZonePointer::Glyph);
        assert_eq!(zone.point(3).unwrap().map(F26Dot6::to_bits), Point::new(300, 96));
        assert_eq!(zone.original(3).unwrap().map(F26Dot6::to_bits), Point::new(192, 96));
        assert!(zone.is_touched(3, CoordAxis::X).unwrap());
    }

    #[test]
    fn set_twilight_coordinate_moves_original() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.graphics.zp2 = ZonePointer::Twilight;
        engine.value_stack.push(2).unwrap();
        engine.value_stack.push(-50).unwrap();
        engine.op_scfs().unwrap();
        let zone = engine.graphics.zone(ZonePointer::Twilight);
        assert_eq!(zone.point(2).unwrap().map(F26Dot6::to_bits), Point::new(-50, 0));
        assert_eq!(zone.original(2).unwrap().map(F26Dot6::to_bits), Point::new(-50, 0));
    }

    #[test]
    fn measure_distance() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.graphics.zones[1].points[4].x += F26Dot6::from_bits(32);
        #[rustfmt::skip]
        let code = [
            op::PUSHB000 + 1, 4, 1,
            op::MD1,
            op::PUSHB000 + 1, 4, 1,
            op::MD0,
        ];
        engine.set_code(Program::Font, &code);
        engine.run().unwrap();
        assert_eq!(engine.value_stack.values(), &[224, 192]);
    }

    #[test]
    fn measure_size() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        let code = [op::MPPEM, op::MPS];
        engine.set_code(Program::Font, &code);
        engine.run().unwrap();
        assert_eq!(engine.value_stack.values(), &[16, 1024]);
    }
}
