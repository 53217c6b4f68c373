//! Managing exceptions.
//!
//! Implements 6 instructions.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#managing-exceptions>

use super::{Engine, HintErrorKind, OpResult};
use crate::graphics::CoordAxis;

impl Engine<'_> {
    /// Delta exception P1, P2 and P3.
    ///
    /// DELTAP1[] (0x5D)
    /// DELTAP2[] (0x71)
    /// DELTAP3[] (0x72)
    ///
    /// Pops: n: number of pairs of exception specifications and points
    ///       p1, arg1, p2, arg2, ..., pnn argn: n pairs of exception
    ///       specifications and points
    ///
    /// Each argument packs a ppem offset from `delta_base + bias` in the
    /// high nibble and a step count in the low nibble. Points whose ppem
    /// matches the current size are moved in zp0 along the freedom
    /// vector.
    pub(super) fn op_deltap(&mut self, bias: u16) -> OpResult {
        let n = self.value_stack.pop_usize()?;
        for _ in 0..n {
            let point_ix = self.value_stack.pop_usize()?;
            let arg = self.value_stack.pop()?;
            let zone = self.graphics.zp0;
            if point_ix >= self.graphics.zone(zone).len() {
                self.pedantic_error(HintErrorKind::InvalidPointIndex(point_ix))?;
                continue;
            }
            let Some(distance) = self.delta_distance(bias, arg) else {
                continue;
            };
            let gs = &self.graphics;
            if gs.backward_compatibility
                && (gs.did_iup_x && gs.did_iup_y
                    || !gs.zone(zone).is_touched(point_ix, CoordAxis::Y)?)
            {
                continue;
            }
            self.graphics.move_point(zone, point_ix, distance)?;
        }
        Ok(())
    }

    /// Delta exception C1, C2 and C3.
    ///
    /// DELTAC1[] (0x73)
    /// DELTAC2[] (0x74)
    /// DELTAC3[] (0x75)
    ///
    /// Pops: n: number of pairs of exception specifications and CVT entry
    ///       numbers
    ///       c1, arg1, c2, arg2,..., cn, argn: n pairs of CVT entry
    ///       numbers and exception specifications
    ///
    /// Adjusts CVT entries instead of points.
    pub(super) fn op_deltac(&mut self, bias: u16) -> OpResult {
        let n = self.value_stack.pop_usize()?;
        for _ in 0..n {
            let cvt_ix = self.value_stack.pop_usize()?;
            let arg = self.value_stack.pop()?;
            let Some(value) = self.cvt.get(cvt_ix) else {
                self.pedantic_error(HintErrorKind::InvalidCvtIndex(cvt_ix))?;
                continue;
            };
            if let Some(distance) = self.delta_distance(bias, arg) {
                self.write_cvt(cvt_ix, value.wrapping_add(distance))?;
            }
        }
        Ok(())
    }

    /// Decodes a delta argument, returning the 26.6 distance when it
    /// applies to the current ppem.
    fn delta_distance(&self, bias: u16, arg: i32) -> Option<i32> {
        let gs = &self.graphics;
        let ppem = ((arg & 0xF0) >> 4) + bias as i32 + gs.delta_base as i32;
        if ppem != gs.ppem {
            return None;
        }
        // steps -8..=-1 and 1..=8, skipping zero
        let mut steps = (arg & 0xF) - 8;
        if steps >= 0 {
            steps += 1;
        }
        Some(steps * (1 << (6 - gs.delta_shift.min(6))))
    }
}
