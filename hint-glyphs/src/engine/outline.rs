//! Managing outlines.
//!
//! Implements 18 instructions.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#managing-outlines>
//! and <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#moving-points>

use font_types::{F26Dot6, Point};

use super::{Engine, HintErrorKind, OpResult};
use crate::{
    graphics::{CoordAxis, GraphicsState},
    math,
    zone::{PointDisplacement, ZonePointer},
};

impl Engine<'_> {
    /// Flip point.
    ///
    /// FLIPPT[] (0x80)
    ///
    /// Pops: p: point number
    ///
    /// Uses the loop counter. Toggles the on curve flag of each point in
    /// the glyph zone without touching it.
    pub(super) fn op_flippt(&mut self) -> OpResult {
        let count = self.take_loop_counter();
        let locked = self.outline_locked();
        for _ in 0..count {
            let p = self.value_stack.pop_usize()?;
            if !locked {
                self.graphics.zone_mut(ZonePointer::Glyph).flip_on_curve(p)?;
            }
        }
        Ok(())
    }

    /// Flip range on.
    ///
    /// FLIPRGON[] (0x81)
    ///
    /// Pops: highpoint: highest point number in range of points to be flipped
    ///       lowpoint: lowest point number in range of points to be flipped
    pub(super) fn op_fliprgon(&mut self) -> OpResult {
        self.set_on_curve_range(true)
    }

    /// Flip range off.
    ///
    /// FLIPRGOFF[] (0x82)
    ///
    /// Pops: highpoint: highest point number in range of points to be flipped
    ///       lowpoint: lowest point number in range of points to be flipped
    pub(super) fn op_fliprgoff(&mut self) -> OpResult {
        self.set_on_curve_range(false)
    }

    fn set_on_curve_range(&mut self, on: bool) -> OpResult {
        let high = self.value_stack.pop_usize()?;
        let low = self.value_stack.pop_usize()?;
        if self.outline_locked() {
            return Ok(());
        }
        self.graphics
            .zone_mut(ZonePointer::Glyph)
            .set_on_curve(low, high.wrapping_add(1), on)
    }

    /// Backward compatibility freezes the outline once `IUP` has run on
    /// both axes.
    fn outline_locked(&self) -> bool {
        let gs = &self.graphics;
        gs.backward_compatibility && gs.did_iup_x && gs.did_iup_y
    }

    /// Returns the loop counter and resets it to 1.
    fn take_loop_counter(&mut self) -> u32 {
        std::mem::replace(&mut self.graphics.loop_counter, 1)
    }

    /// Shift point by the last point.
    ///
    /// SHP[a] (0x32 - 0x33)
    ///
    /// a: 0: uses rp2 in the zone pointed to by zp1
    ///    1: uses rp1 in the zone pointed to by zp0
    ///
    /// Pops: p: point to be shifted
    ///
    /// Uses the loop counter. Moves each point in zp2 by the displacement of
    /// the reference point from its original position.
    pub(super) fn op_shp(&mut self, opcode: u8) -> OpResult {
        let PointDisplacement { dx, dy, .. } = self.graphics.point_displacement(opcode)?;
        let count = self.take_loop_counter();
        for _ in 0..count {
            let p = self.value_stack.pop_usize()?;
            self.graphics.move_zp2_point(p, dx, dy, true)?;
        }
        Ok(())
    }

    /// Shift contour by the last point.
    ///
    /// SHC[a] (0x34 - 0x35)
    ///
    /// Pops: c: contour to be shifted
    ///
    /// Like `SHP` for every point of contour `c` in zp2, except the
    /// reference point itself.
    pub(super) fn op_shc(&mut self, opcode: u8) -> OpResult {
        let contour_ix = self.value_stack.pop_usize()?;
        let gs = &mut self.graphics;
        let displacement = gs.point_displacement(opcode)?;
        let start = match contour_ix.checked_sub(1) {
            Some(prev) => gs.zp2().contour(prev)? as usize + 1,
            None => 0,
        };
        let end = if gs.zp2.is_twilight() {
            gs.zp2().len()
        } else {
            gs.zp2().contour(contour_ix)? as usize + 1
        };
        for ix in start..end {
            if displacement.zone != gs.zp2 || displacement.point_ix != ix {
                gs.move_zp2_point(ix, displacement.dx, displacement.dy, true)?;
            }
        }
        Ok(())
    }

    /// Shift zone by the last point.
    ///
    /// SHZ[a] (0x36 - 0x37)
    ///
    /// Pops: e: zone to be shifted
    ///
    /// The zone number is validated but the points of zp2 are the ones
    /// shifted. Phantom points in the glyph zone are left alone and points
    /// are not marked as touched.
    pub(super) fn op_shz(&mut self, opcode: u8) -> OpResult {
        ZonePointer::try_from(self.value_stack.pop()?)?;
        let gs = &mut self.graphics;
        let displacement = gs.point_displacement(opcode)?;
        let end = if gs.zp2.is_twilight() {
            gs.zp2().len()
        } else {
            gs.zp2()
                .contours
                .last()
                .map(|last| *last as usize + 1)
                .unwrap_or(0)
        };
        for ix in 0..end {
            if displacement.zone != gs.zp2 || displacement.point_ix != ix {
                gs.move_zp2_point(ix, displacement.dx, displacement.dy, false)?;
            }
        }
        Ok(())
    }

    /// Shift point by a pixel amount.
    ///
    /// SHPIX[] (0x38)
    ///
    /// Pops: amount: magnitude of the shift (F26Dot6)
    ///       p1, p2,.. pn: points to be shifted
    ///
    /// Uses the loop counter. In backward compatibility mode only twilight
    /// points and points already touched in y move, and only until `IUP`
    /// has run on both axes.
    pub(super) fn op_shpix(&mut self) -> OpResult {
        let amount = self.value_stack.pop()?;
        let count = self.take_loop_counter();
        let gs = &mut self.graphics;
        let in_twilight = gs.zp0.is_twilight() || gs.zp1.is_twilight() || gs.zp2.is_twilight();
        let did_iup = gs.did_iup_x && gs.did_iup_y;
        let dx = math::mul14(amount, gs.freedom_vector.x);
        let dy = math::mul14(amount, gs.freedom_vector.y);
        for _ in 0..count {
            let p = self.value_stack.pop_usize()?;
            let should_move = !gs.backward_compatibility
                || in_twilight
                || (!did_iup && gs.zp2().is_touched(p, CoordAxis::Y)?);
            if should_move {
                gs.move_zp2_point(p, dx, dy, true)?;
            }
        }
        Ok(())
    }

    /// Move stack indirect relative point.
    ///
    /// MSIRP[a] (0x3A - 0x3B)
    ///
    /// a: 0: do not set rp0 to p
    ///    1: set rp0 to p
    ///
    /// Pops: d: distance (F26Dot6)
    ///       p: point number
    ///
    /// Moves p in zp1 so that its distance from rp0 in zp0 is `d`.
    pub(super) fn op_msirp(&mut self, opcode: u8) -> OpResult {
        let distance = self.value_stack.pop()?;
        let point_ix = self.value_stack.pop_usize()?;
        let gs = &mut self.graphics;
        if gs.zp1.is_twilight() {
            // twilight points start from rp0 and carry the distance in
            // their original position too
            *gs.zp1_mut().original_mut(point_ix)? = gs.zp0().original(gs.rp0)?;
            gs.move_original(gs.zp1, point_ix, distance)?;
            *gs.zp1_mut().point_mut(point_ix)? = gs.zp1().original(point_ix)?;
        }
        let current = gs.project(gs.zp1().point(point_ix)?, gs.zp0().point(gs.rp0)?);
        gs.move_point(gs.zp1, point_ix, distance.wrapping_sub(current))?;
        gs.rp1 = gs.rp0;
        gs.rp2 = point_ix;
        if opcode & 1 != 0 {
            gs.rp0 = point_ix;
        }
        Ok(())
    }

    /// Move direct absolute point.
    ///
    /// MDAP[a] (0x2E - 0x2F)
    ///
    /// a: 0: do not round the value
    ///    1: round the value
    ///
    /// Pops: p: point number
    ///
    /// Touches p in zp0, rounding its position first when `a` is set, and
    /// makes it rp0 and rp1.
    pub(super) fn op_mdap(&mut self, opcode: u8) -> OpResult {
        let p = self.value_stack.pop_usize()?;
        let gs = &mut self.graphics;
        let distance = if opcode & 1 != 0 {
            let current = gs.project(gs.zp0().point(p)?, Point::default());
            gs.round_state.round(current).wrapping_sub(current)
        } else {
            0
        };
        gs.move_point(gs.zp0, p, distance)?;
        gs.rp0 = p;
        gs.rp1 = p;
        Ok(())
    }

    /// Move indirect absolute point.
    ///
    /// MIAP[a] (0x3E - 0x3F)
    ///
    /// a: 0: do not round the distance and don't use control value cutin
    ///    1: round the distance and use control value cutin
    ///
    /// Pops: n: CVT entry number
    ///       p: point number
    ///
    /// Moves p in zp0 to the position held in CVT entry `n`, measured along
    /// the projection vector.
    pub(super) fn op_miap(&mut self, opcode: u8) -> OpResult {
        let cvt_ix = self.value_stack.pop_usize()?;
        let point_ix = self.value_stack.pop_usize()?;
        let mut distance = self.read_cvt(cvt_ix)?;
        let gs = &mut self.graphics;
        if gs.zp0.is_twilight() {
            let fv = gs.freedom_vector;
            let zone = gs.zp0_mut();
            let original = zone.original_mut(point_ix)?;
            original.x = F26Dot6::from_bits(math::mul14(distance, fv.x));
            original.y = F26Dot6::from_bits(math::mul14(distance, fv.y));
            let original = *original;
            *zone.point_mut(point_ix)? = original;
        }
        let current = gs.project(gs.zp0().point(point_ix)?, Point::default());
        if opcode & 1 != 0 {
            if distance.wrapping_sub(current).abs() > gs.control_value_cutin {
                distance = current;
            }
            distance = gs.round_state.round(distance);
        }
        gs.move_point(gs.zp0, point_ix, distance.wrapping_sub(current))?;
        gs.rp0 = point_ix;
        gs.rp1 = point_ix;
        Ok(())
    }

    /// Move direct relative point.
    ///
    /// MDRP[abcde] (0xC0 - 0xDF)
    ///
    /// a: 0: do not set rp0 to point p after move
    ///    1: do set rp0 to point p after move
    /// b: 0: do not keep distance greater than or equal to minimum_distance
    ///    1: keep distance greater than or equal to minimum_distance
    /// c: 0: do not round distance
    ///    1: round the distance
    /// de: distance type for engine characteristic compensation
    ///
    /// Pops: p: point number
    ///
    /// Preserves the original distance between p in zp1 and rp0 in zp0,
    /// subject to single width, rounding and minimum distance.
    pub(super) fn op_mdrp(&mut self, opcode: u8) -> OpResult {
        let point_ix = self.value_stack.pop_usize()?;
        let gs = &mut self.graphics;
        let rp0 = gs.rp0;
        let mut original = original_distance(gs, point_ix, rp0)?;
        let (cutin, single_width) = (gs.single_width_cutin, gs.single_width);
        if cutin > 0 && original.wrapping_sub(single_width).wrapping_abs() < cutin {
            original = if original >= 0 {
                single_width
            } else {
                -single_width
            };
        }
        let mut distance = if opcode & 4 != 0 {
            gs.round_state.round(original)
        } else {
            original
        };
        if opcode & 8 != 0 {
            distance = keep_min_distance(original, distance, gs.min_distance);
        }
        let current = gs.project(gs.zp1().point(point_ix)?, gs.zp0().point(rp0)?);
        gs.move_point(gs.zp1, point_ix, distance.wrapping_sub(current))?;
        gs.rp1 = rp0;
        gs.rp2 = point_ix;
        if opcode & 16 != 0 {
            gs.rp0 = point_ix;
        }
        Ok(())
    }

    /// Move indirect relative point.
    ///
    /// MIRP[abcde] (0xE0 - 0xFF)
    ///
    /// a: 0: do not set rp0 to point p after move
    ///    1: do set rp0 to point p after move
    /// b: 0: do not keep distance greater than or equal to minimum_distance
    ///    1: keep distance greater than or equal to minimum_distance
    /// c: 0: do not round distance and do not look at control_value_cutin
    ///    1: round the distance and look at control_value_cutin
    /// de: distance type for engine characteristic compensation
    ///
    /// Pops: n: CVT entry number
    ///       p: point number
    ///
    /// Moves p in zp1 so that its distance from rp0 in zp0 matches CVT
    /// entry `n`. The entry -1 reads as zero.
    pub(super) fn op_mirp(&mut self, opcode: u8) -> OpResult {
        let cvt_ix = self.value_stack.pop()?;
        let point_ix = self.value_stack.pop_usize()?;
        let mut cvt_distance = match cvt_ix {
            -1 => 0,
            _ => self.read_cvt(cvt_ix as usize)?,
        };
        let gs = &mut self.graphics;
        let rp0 = gs.rp0;
        let (cutin, single_width) = (gs.single_width_cutin, gs.single_width);
        if cvt_distance.wrapping_sub(single_width).wrapping_abs() < cutin {
            cvt_distance = if cvt_distance >= 0 {
                single_width
            } else {
                -single_width
            };
        }
        if gs.zp1.is_twilight() {
            let fv = gs.freedom_vector;
            let base = gs.zp0().original(rp0)?;
            let moved = Point::new(
                base.x.wrapping_add(F26Dot6::from_bits(math::mul(cvt_distance, fv.x))),
                base.y.wrapping_add(F26Dot6::from_bits(math::mul(cvt_distance, fv.y))),
            );
            let zone = gs.zp1_mut();
            *zone.original_mut(point_ix)? = moved;
            *zone.point_mut(point_ix)? = moved;
        }
        let original = gs.dual_project(gs.zp1().original(point_ix)?, gs.zp0().original(rp0)?);
        let current = gs.project(gs.zp1().point(point_ix)?, gs.zp0().point(rp0)?);
        if gs.auto_flip && (original ^ cvt_distance) < 0 {
            cvt_distance = cvt_distance.wrapping_neg();
        }
        let mut distance = if opcode & 4 != 0 {
            if gs.zp0 == gs.zp1
                && cvt_distance.wrapping_sub(original).wrapping_abs() > gs.control_value_cutin
            {
                cvt_distance = original;
            }
            gs.round_state.round(cvt_distance)
        } else {
            cvt_distance
        };
        if opcode & 8 != 0 {
            distance = keep_min_distance(original, distance, gs.min_distance);
        }
        gs.move_point(gs.zp1, point_ix, distance.wrapping_sub(current))?;
        gs.rp1 = rp0;
        gs.rp2 = point_ix;
        if opcode & 16 != 0 {
            gs.rp0 = point_ix;
        }
        Ok(())
    }

    /// Align relative point.
    ///
    /// ALIGNRP[] (0x3C)
    ///
    /// Pops: p: point number
    ///
    /// Uses the loop counter. Moves each point in zp1 onto rp0 in zp0 along
    /// the projection vector.
    pub(super) fn op_alignrp(&mut self) -> OpResult {
        let count = self.take_loop_counter();
        let gs = &mut self.graphics;
        for _ in 0..count {
            let p = self.value_stack.pop_usize()?;
            let distance = gs.project(gs.zp1().point(p)?, gs.zp0().point(gs.rp0)?);
            gs.move_point(gs.zp1, p, distance.wrapping_neg())?;
        }
        Ok(())
    }

    /// Move point to intersection of two lines.
    ///
    /// ISECT[] (0x0F)
    ///
    /// Pops: b1: end point of line 2
    ///       b0: start point of line 2
    ///       a1: end point of line 1
    ///       a0: start point of line 1
    ///       p: point to move
    ///
    /// Line 1 is in zp0 and line 2 in zp1, p is in zp2. Nearly parallel
    /// lines place p at the average of the four points.
    pub(super) fn op_isect(&mut self) -> OpResult {
        let b1 = self.value_stack.pop_usize()?;
        let b0 = self.value_stack.pop_usize()?;
        let a1 = self.value_stack.pop_usize()?;
        let a0 = self.value_stack.pop_usize()?;
        let point_ix = self.value_stack.pop_usize()?;
        let gs = &mut self.graphics;
        let bits = |p: Point<F26Dot6>| p.map(F26Dot6::to_bits);
        let (pa0, pa1) = (bits(gs.zp1().point(a0)?), bits(gs.zp1().point(a1)?));
        let (pb0, pb1) = (bits(gs.zp0().point(b0)?), bits(gs.zp0().point(b1)?));
        let delta = |to: Point<i32>, from: Point<i32>| {
            Point::new(to.x.wrapping_sub(from.x), to.y.wrapping_sub(from.y))
        };
        let (db, da, d) = (delta(pb1, pb0), delta(pa1, pa0), delta(pb0, pa0));
        let cross = |u: Point<i32>, v: Point<i32>| {
            math::mul_div(u.x, v.y.wrapping_neg(), 0x40)
                .wrapping_add(math::mul_div(u.y, v.x, 0x40))
        };
        let discriminant = cross(da, db);
        let dot = math::mul_div(da.x, db.x, 0x40).wrapping_add(math::mul_div(da.y, db.y, 0x40));
        let intersection = if 19 * discriminant.unsigned_abs() as i64 > dot.unsigned_abs() as i64 {
            let v = cross(d, db);
            Point::new(
                pa0.x.wrapping_add(math::mul_div(v, da.x, discriminant)),
                pa0.y.wrapping_add(math::mul_div(v, da.y, discriminant)),
            )
        } else {
            let average = |a: i32, b: i32, c: i32, d: i32| {
                ((a as i64 + b as i64 + c as i64 + d as i64) / 4) as i32
            };
            Point::new(
                average(pa0.x, pa1.x, pb0.x, pb1.x),
                average(pa0.y, pa1.y, pb0.y, pb1.y),
            )
        };
        let intersection = intersection.map(F26Dot6::from_bits);
        let zone = gs.zp2_mut();
        *zone.point_mut(point_ix)? = intersection;
        zone.touch(point_ix, CoordAxis::Both)
    }

    /// Align points.
    ///
    /// ALIGNPTS[] (0x27)
    ///
    /// Pops: p2: point number
    ///       p1: point number
    ///
    /// Moves p1 in zp1 and p2 in zp0 toward each other to meet halfway
    /// along the projection vector.
    pub(super) fn op_alignpts(&mut self) -> OpResult {
        let p2 = self.value_stack.pop_usize()?;
        let p1 = self.value_stack.pop_usize()?;
        let gs = &mut self.graphics;
        let distance = gs.project(gs.zp0().point(p2)?, gs.zp1().point(p1)?) / 2;
        gs.move_point(gs.zp1, p1, distance)?;
        gs.move_point(gs.zp0, p2, distance.wrapping_neg())
    }

    /// Interpolate point by the last relative stretch.
    ///
    /// IP[] (0x39)
    ///
    /// Pops: p: point number
    ///
    /// Uses the loop counter. Moves each point in zp2 so that its relative
    /// position between rp1 in zp0 and rp2 in zp1 is the same as in the
    /// original outline.
    pub(super) fn op_ip(&mut self) -> OpResult {
        let count = self.take_loop_counter();
        let gs = &mut self.graphics;
        let (rp1, rp2) = (gs.rp1, gs.rp2);
        let in_twilight = gs.zp0.is_twilight() || gs.zp1.is_twilight() || gs.zp2.is_twilight();
        // original positions come from font units outside the twilight zone
        let original_of = |gs: &GraphicsState, zone: ZonePointer, ix: usize| {
            let zone = gs.zone(zone);
            let original = zone.original(ix)?;
            Ok::<_, HintErrorKind>(if in_twilight {
                original.map(F26Dot6::to_bits)
            } else {
                zone.unscaled(ix)
            })
        };
        let original_base = original_of(gs, gs.zp0, rp1)?;
        let current_base = gs.zp0().point(rp1)?;
        let old_range = gs.dual_project_raw(original_of(gs, gs.zp1, rp2)?, original_base);
        let current_range = gs.project(gs.zp1().point(rp2)?, current_base);
        for _ in 0..count {
            let p = self.value_stack.pop_usize()?;
            let original_distance = gs.dual_project_raw(original_of(gs, gs.zp2, p)?, original_base);
            let current_distance = gs.project(gs.zp2().point(p)?, current_base);
            let new_distance = match (original_distance, old_range) {
                (0, _) => 0,
                (_, 0) => original_distance,
                _ => math::mul_div(original_distance, current_range, old_range),
            };
            gs.move_point(gs.zp2, p, new_distance.wrapping_sub(current_distance))?;
        }
        Ok(())
    }

    /// Untouch point.
    ///
    /// UTP[] (0x29)
    ///
    /// Pops: p: point number
    ///
    /// Clears the touched flags of p in zp0 for the axes the freedom vector
    /// moves along.
    pub(super) fn op_utp(&mut self) -> OpResult {
        let p = self.value_stack.pop_usize()?;
        let fv = self.graphics.freedom_vector;
        let axis = match (fv.x != 0, fv.y != 0) {
            (true, true) => CoordAxis::Both,
            (true, false) => CoordAxis::X,
            (false, true) => CoordAxis::Y,
            (false, false) => return Ok(()),
        };
        self.graphics.zp0_mut().untouch(p, axis)
    }

    /// Interpolate untouched points through the outline.
    ///
    /// IUP[a] (0x30 - 0x31)
    ///
    /// a: 0: interpolate in the y direction
    ///    1: interpolate in the x direction
    ///
    /// Always applies to the glyph zone. In backward compatibility mode
    /// each axis is interpolated at most once.
    pub(super) fn op_iup(&mut self, opcode: u8) -> OpResult {
        let is_x = opcode & 1 != 0;
        let gs = &mut self.graphics;
        if gs.backward_compatibility {
            if gs.did_iup_x && gs.did_iup_y {
                return Ok(());
            }
            if is_x {
                gs.did_iup_x = true;
            } else {
                gs.did_iup_y = true;
            }
        }
        let axis = if is_x { CoordAxis::X } else { CoordAxis::Y };
        gs.zone_mut(ZonePointer::Glyph).iup(axis)
    }
}

/// Distance from `from` in zp0 to `to` in zp1 in the original outline,
/// measured along the dual projection vector.
///
/// Glyph zone distances are measured in font units and then scaled.
fn original_distance(gs: &GraphicsState, to: usize, from: usize) -> Result<i32, HintErrorKind> {
    let (to_zone, from_zone) = (gs.zp1(), gs.zp0());
    let (to_original, from_original) = (to_zone.original(to)?, from_zone.original(from)?);
    if gs.zp0.is_twilight() || gs.zp1.is_twilight() {
        Ok(gs.dual_project(to_original, from_original))
    } else {
        let unscaled = gs.dual_project_raw(to_zone.unscaled(to), from_zone.unscaled(from));
        Ok(math::mul(unscaled, gs.scale))
    }
}

/// Pushes `distance` out to at least `min_distance` in the direction of
/// `original`.
fn keep_min_distance(original: i32, distance: i32, min_distance: i32) -> i32 {
    if original >= 0 {
        distance.max(min_distance)
    } else {
        distance.min(min_distance.wrapping_neg())
    }
}

#[cfg(test)]
mod tests {
    use font_types::{F26Dot6, Point};

    use super::super::{Engine, MockEngine};
    use crate::{
        code::opcodes as op, error::HintErrorKind, graphics::CoordAxis, zone::ZonePointer,
    };

    fn push(engine: &mut Engine, values: &[i32]) {
        for value in values {
            engine.value_stack.push(*value).unwrap();
        }
    }

    fn glyph_point(engine: &Engine, ix: usize) -> Point<i32> {
        engine
            .graphics
            .zone(ZonePointer::Glyph)
            .point(ix)
            .unwrap()
            .map(F26Dot6::to_bits)
    }

    fn on_curve(engine: &Engine) -> Vec<bool> {
        engine.graphics.zones[1].flags[..6]
            .iter()
            .map(|flags| flags.is_on_curve())
            .collect()
    }

    #[test]
    fn flip_points() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        push(&mut engine, &[1, 3, 2]);
        engine.graphics.loop_counter = 2;
        engine.op_flippt().unwrap();
        assert_eq!(on_curve(&engine), [false, false, true, true, false, false]);
        assert_eq!(engine.graphics.loop_counter, 1);
        assert_eq!(engine.value_stack.values(), &[1]);
        push(&mut engine, &[5]);
        engine.op_fliprgon().unwrap();
        assert_eq!(on_curve(&engine), [false, true, true, true, true, true]);
        push(&mut engine, &[2, 4]);
        engine.op_fliprgoff().unwrap();
        assert_eq!(on_curve(&engine), [false, true, false, false, false, true]);
    }

    #[test]
    fn flips_ignored_after_iup_in_compatibility_mode() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.graphics.backward_compatibility = true;
        engine.graphics.did_iup_x = true;
        engine.graphics.did_iup_y = true;
        push(&mut engine, &[1, 0, 3]);
        engine.op_flippt().unwrap();
        engine.op_fliprgon().unwrap();
        assert_eq!(on_curve(&engine), [false; 6]);
        assert!(engine.value_stack.is_empty());
    }

    #[test]
    fn untouch_point() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        let zone = engine.graphics.zone_mut(ZonePointer::Glyph);
        zone.touch(4, CoordAxis::Both).unwrap();
        push(&mut engine, &[4]);
        engine.op_utp().unwrap();
        let zone = engine.graphics.zone(ZonePointer::Glyph);
        assert!(!zone.is_touched(4, CoordAxis::X).unwrap());
        assert!(zone.is_touched(4, CoordAxis::Y).unwrap());
    }

    #[test]
    fn shift_by_reference_point() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.graphics.zones[1].points[1].x += F26Dot6::from_bits(10);
        engine.graphics.rp2 = 1;
        push(&mut engine, &[5]);
        engine.op_shp(op::SHP0).unwrap();
        assert_eq!(glyph_point(&engine, 5), Point::new(330, 160));
        // contour 1 holds points 16 through 31
        push(&mut engine, &[1]);
        engine.op_shc(op::SHC0).unwrap();
        assert_eq!(glyph_point(&engine, 16).x, 16 * 64 + 10);
        assert_eq!(glyph_point(&engine, 31).x, 31 * 64 + 10);
        assert_eq!(glyph_point(&engine, 32).x, 32 * 64);
        // the reference point itself does not move
        push(&mut engine, &[1]);
        engine.op_shz(op::SHZ0).unwrap();
        assert_eq!(glyph_point(&engine, 1).x, 74);
        assert_eq!(glyph_point(&engine, 0).x, 10);
        assert_eq!(glyph_point(&engine, 63).x, 63 * 64 + 10);
        assert!(!engine.graphics.zones[1].is_touched(0, CoordAxis::X).unwrap());
    }

    #[test]
    fn shift_by_pixels() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        push(&mut engine, &[2, 3, -32]);
        engine.graphics.loop_counter = 2;
        engine.op_shpix().unwrap();
        assert_eq!(glyph_point(&engine, 2), Point::new(96, 64));
        assert_eq!(glyph_point(&engine, 3), Point::new(160, 96));
        assert!(engine.graphics.zones[1].is_touched(3, CoordAxis::X).unwrap());
    }

    #[test]
    fn shift_by_pixels_wraps() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.op_svtca(op::SVTCA0).unwrap();
        push(&mut engine, &[1, i32::MAX]);
        engine.op_shpix().unwrap();
        assert_eq!(glyph_point(&engine, 1).y, i32::MIN + 31);
        // measuring against the wrapped point must not overflow either
        push(&mut engine, &[3, 1]);
        engine.op_alignpts().unwrap();
        push(&mut engine, &[3]);
        engine.op_mdap(op::MDAP1).unwrap();
    }

    #[test]
    fn shift_by_pixels_in_compatibility_mode() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.graphics.backward_compatibility = true;
        engine.op_svtca(op::SVTCA0).unwrap();
        engine.graphics.zones[1].touch(2, CoordAxis::Y).unwrap();
        push(&mut engine, &[2, 3, 64]);
        engine.graphics.loop_counter = 2;
        engine.op_shpix().unwrap();
        assert_eq!(glyph_point(&engine, 2).y, 128);
        assert_eq!(glyph_point(&engine, 3).y, 96);
    }

    #[test]
    fn move_absolute() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.op_svtca(op::SVTCA0).unwrap();
        // y of point 1 is 32, rounded to 64
        push(&mut engine, &[1]);
        engine.op_mdap(op::MDAP1).unwrap();
        assert_eq!(glyph_point(&engine, 1), Point::new(64, 64));
        assert_eq!((engine.graphics.rp0, engine.graphics.rp1), (1, 1));
        // unrounded only touches
        push(&mut engine, &[3]);
        engine.op_mdap(op::MDAP0).unwrap();
        assert_eq!(glyph_point(&engine, 3), Point::new(192, 96));
        assert!(engine.graphics.zones[1].is_touched(3, CoordAxis::Y).unwrap());
    }

    #[test]
    fn move_to_cvt_position() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.op_svtca(op::SVTCA0).unwrap();
        // cvt 3 is 192 and point 5 is at 160, within the cut in
        push(&mut engine, &[5, 3]);
        engine.op_miap(op::MIAP1).unwrap();
        assert_eq!(glyph_point(&engine, 5).y, 192);
        assert_eq!((engine.graphics.rp0, engine.graphics.rp1), (5, 5));
        // cvt 10 is 640, too far from 160 so the current position is
        // rounded instead
        push(&mut engine, &[6, 10]);
        engine.op_miap(op::MIAP1).unwrap();
        assert_eq!(glyph_point(&engine, 6).y, 192);
        push(&mut engine, &[7, 10]);
        engine.op_miap(op::MIAP0).unwrap();
        assert_eq!(glyph_point(&engine, 7).y, 640);
        push(&mut engine, &[7, 40]);
        assert_eq!(
            engine.op_miap(op::MIAP0),
            Err(HintErrorKind::InvalidCvtIndex(40))
        );
    }

    #[test]
    fn move_to_cvt_position_in_twilight() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.graphics.zp0 = ZonePointer::Twilight;
        push(&mut engine, &[2, 3]);
        engine.op_miap(op::MIAP0).unwrap();
        let zone = engine.graphics.zone(ZonePointer::Twilight);
        assert_eq!(zone.point(2).unwrap().map(F26Dot6::to_bits), Point::new(192, 0));
        assert_eq!(zone.original(2).unwrap().map(F26Dot6::to_bits), Point::new(192, 0));
    }

    #[test]
    fn move_relative() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.op_svtca(op::SVTCA0).unwrap();
        // y distance from point 0 to point 3 is 96, rounded to 128
        push(&mut engine, &[3]);
        engine.op_mdrp(op::MDRP00000 | 0b10100).unwrap();
        assert_eq!(glyph_point(&engine, 3).y, 128);
        let gs = &engine.graphics;
        assert_eq!((gs.rp0, gs.rp1, gs.rp2), (3, 0, 3));
        // 32 from point 3 to point 4 is raised to the minimum distance
        push(&mut engine, &[4]);
        engine.op_mdrp(op::MDRP00000 | 0b01000).unwrap();
        assert_eq!(glyph_point(&engine, 4).y, 192);
        assert_eq!(engine.graphics.rp0, 3);
    }

    #[test]
    fn move_relative_single_width() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.op_svtca(op::SVTCA0).unwrap();
        engine.graphics.single_width = 100;
        engine.graphics.single_width_cutin = 10;
        push(&mut engine, &[3]);
        engine.op_mdrp(op::MDRP00000).unwrap();
        // 96 is within the cut in of the single width
        assert_eq!(glyph_point(&engine, 3).y, 100);
    }

    #[test]
    fn move_relative_by_cvt() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.op_svtca(op::SVTCA0).unwrap();
        // cvt 2 is 128 and the original distance is 96
        push(&mut engine, &[3, 2]);
        engine.op_mirp(op::MIRP00000 | 0b10100).unwrap();
        assert_eq!(glyph_point(&engine, 3).y, 128);
        let gs = &engine.graphics;
        assert_eq!((gs.rp0, gs.rp1, gs.rp2), (3, 0, 3));
        // cvt 4 is 256, beyond the cut in from the original distance of 32
        push(&mut engine, &[4, 4]);
        engine.op_mirp(op::MIRP00000 | 0b00100).unwrap();
        assert_eq!(glyph_point(&engine, 4).y, 192);
        // without rounding the cvt value is used directly
        push(&mut engine, &[5, 4]);
        engine.op_mirp(op::MIRP00000).unwrap();
        assert_eq!(glyph_point(&engine, 5).y, 384);
        // entry -1 is zero
        push(&mut engine, &[6, -1]);
        engine.op_mirp(op::MIRP00000).unwrap();
        assert_eq!(glyph_point(&engine, 6).y, 128);
    }

    #[test]
    fn move_relative_by_cvt_auto_flip() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.op_svtca(op::SVTCA0).unwrap();
        engine.graphics.rp0 = 4;
        // original distance from 4 to 2 is -64 so the cvt value flips
        push(&mut engine, &[2, 2]);
        engine.op_mirp(op::MIRP00000).unwrap();
        assert_eq!(glyph_point(&engine, 2).y, 0);
    }

    #[test]
    fn move_stack_indirect() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.graphics.rp0 = 1;
        push(&mut engine, &[5, 100]);
        engine.op_msirp(op::MSIRP1).unwrap();
        assert_eq!(glyph_point(&engine, 5).x, 164);
        let gs = &engine.graphics;
        assert_eq!((gs.rp0, gs.rp1, gs.rp2), (5, 1, 5));
    }

    #[test]
    fn align_to_reference() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.graphics.rp0 = 2;
        push(&mut engine, &[7, 9]);
        engine.graphics.loop_counter = 2;
        engine.op_alignrp().unwrap();
        assert_eq!(glyph_point(&engine, 7).x, 128);
        assert_eq!(glyph_point(&engine, 9).x, 128);
        push(&mut engine, &[1, 3]);
        engine.op_alignpts().unwrap();
        assert_eq!(glyph_point(&engine, 1).x, 128);
        assert_eq!(glyph_point(&engine, 3).x, 128);
    }

    #[test]
    fn intersection() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        let points = &mut engine.graphics.zones[1].points;
        points[0] = Point::new(0, 0).map(F26Dot6::from_bits);
        points[1] = Point::new(128, 128).map(F26Dot6::from_bits);
        points[2] = Point::new(0, 128).map(F26Dot6::from_bits);
        points[3] = Point::new(128, 0).map(F26Dot6::from_bits);
        push(&mut engine, &[10, 0, 1, 2, 3]);
        engine.op_isect().unwrap();
        assert_eq!(glyph_point(&engine, 10), Point::new(64, 64));
        assert!(engine.graphics.zones[1].is_touched(10, CoordAxis::Both).unwrap());
        // parallel lines meet at the average of their points
        push(&mut engine, &[11, 0, 1, 2, 3]);
        engine.graphics.zones[1].points[1] = Point::new(128, 0).map(F26Dot6::from_bits);
        engine.graphics.zones[1].points[3] = Point::new(128, 128).map(F26Dot6::from_bits);
        engine.op_isect().unwrap();
        assert_eq!(glyph_point(&engine, 11), Point::new(64, 64));
    }

    #[test]
    fn interpolate() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        // stretch the span from point 0 to point 4 by a pixel
        engine.graphics.zones[1].points[4].x += F26Dot6::from_bits(64);
        engine.graphics.rp1 = 0;
        engine.graphics.rp2 = 4;
        push(&mut engine, &[2, 6]);
        engine.graphics.loop_counter = 2;
        engine.op_ip().unwrap();
        assert_eq!(glyph_point(&engine, 2).x, 160);
        assert_eq!(glyph_point(&engine, 6).x, 480);
    }

    #[test]
    fn interpolate_untouched() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        let zone = engine.graphics.zone_mut(ZonePointer::Glyph);
        zone.points[0].x += F26Dot6::from_bits(64);
        zone.touch(0, CoordAxis::X).unwrap();
        engine.op_iup(op::IUP1).unwrap();
        // a single touched point shifts its whole contour
        assert_eq!(glyph_point(&engine, 15).x, 16 * 64);
        assert_eq!(glyph_point(&engine, 16).x, 16 * 64);
        assert!(!engine.graphics.did_iup_x);
    }

    #[test]
    fn interpolate_untouched_once_in_compatibility_mode() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.graphics.backward_compatibility = true;
        engine.op_iup(op::IUP0).unwrap();
        engine.op_iup(op::IUP1).unwrap();
        assert!(engine.graphics.did_iup_x && engine.graphics.did_iup_y);
        let zone = engine.graphics.zone_mut(ZonePointer::Glyph);
        zone.points[0].x += F26Dot6::from_bits(64);
        zone.touch(0, CoordAxis::X).unwrap();
        engine.op_iup(op::IUP1).unwrap();
        assert_eq!(glyph_point(&engine, 1).x, 64);
    }
}
