//! Glyph zones.

use font_types::{F26Dot6, Point};

use crate::{
    error::HintErrorKind,
    graphics::{CoordAxis, GraphicsState},
    math,
};

use HintErrorKind::{InvalidPointIndex, InvalidPointRange};

/// Selects between the twilight and glyph zones.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[repr(u8)]
pub enum ZonePointer {
    Twilight = 0,
    #[default]
    Glyph = 1,
}

impl ZonePointer {
    pub fn is_twilight(self) -> bool {
        self == Self::Twilight
    }
}

impl TryFrom<i32> for ZonePointer {
    type Error = HintErrorKind;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Twilight),
            1 => Ok(Self::Glyph),
            _ => Err(HintErrorKind::InvalidZoneIndex(value)),
        }
    }
}

/// Per point flags tracked during hinting.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct PointFlags(u8);

impl PointFlags {
    const ON_CURVE: u8 = 0x01;
    const TOUCHED_X: u8 = 0x10;
    const TOUCHED_Y: u8 = 0x20;

    pub fn on_curve() -> Self {
        Self(Self::ON_CURVE)
    }

    pub fn off_curve() -> Self {
        Self(0)
    }

    pub fn is_on_curve(self) -> bool {
        self.0 & Self::ON_CURVE != 0
    }

    pub fn set_on_curve(&mut self, on: bool) {
        if on {
            self.0 |= Self::ON_CURVE;
        } else {
            self.0 &= !Self::ON_CURVE;
        }
    }

    pub fn flip_on_curve(&mut self) {
        self.0 ^= Self::ON_CURVE;
    }

    fn touched_mask(axis: CoordAxis) -> u8 {
        match axis {
            CoordAxis::X => Self::TOUCHED_X,
            CoordAxis::Y => Self::TOUCHED_Y,
            CoordAxis::Both => Self::TOUCHED_X | Self::TOUCHED_Y,
        }
    }

    pub fn is_touched(self, axis: CoordAxis) -> bool {
        self.0 & Self::touched_mask(axis) != 0
    }

    pub fn touch(&mut self, axis: CoordAxis) {
        self.0 |= Self::touched_mask(axis);
    }

    pub fn untouch(&mut self, axis: CoordAxis) {
        self.0 &= !Self::touched_mask(axis);
    }
}

/// A collection of points with their flags and contours.
///
/// The glyph zone holds the outline being hinted followed by its four
/// phantom points. The twilight zone holds scratch points created by the
/// font's programs and has no contours or unscaled points.
#[derive(Default, Debug)]
pub struct Zone<'a> {
    /// Points in font units.
    pub unscaled: &'a [Point<i32>],
    /// Scaled points before any hinting.
    pub original: &'a mut [Point<F26Dot6>],
    /// Scaled points being hinted.
    pub points: &'a mut [Point<F26Dot6>],
    pub flags: &'a mut [PointFlags],
    /// Index of the last point of each contour.
    pub contours: &'a [u16],
}

impl<'a> Zone<'a> {
    pub fn new(
        unscaled: &'a [Point<i32>],
        original: &'a mut [Point<F26Dot6>],
        points: &'a mut [Point<F26Dot6>],
        flags: &'a mut [PointFlags],
        contours: &'a [u16],
    ) -> Self {
        Self {
            unscaled,
            original,
            points,
            flags,
            contours,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, index: usize) -> Result<Point<F26Dot6>, HintErrorKind> {
        self.points.get(index).copied().ok_or(InvalidPointIndex(index))
    }

    pub fn point_mut(&mut self, index: usize) -> Result<&mut Point<F26Dot6>, HintErrorKind> {
        self.points.get_mut(index).ok_or(InvalidPointIndex(index))
    }

    pub fn original(&self, index: usize) -> Result<Point<F26Dot6>, HintErrorKind> {
        self.original
            .get(index)
            .copied()
            .ok_or(InvalidPointIndex(index))
    }

    pub fn original_mut(&mut self, index: usize) -> Result<&mut Point<F26Dot6>, HintErrorKind> {
        self.original.get_mut(index).ok_or(InvalidPointIndex(index))
    }

    /// Returns the point in font units.
    ///
    /// Twilight points have no unscaled position and are always at the
    /// origin.
    pub fn unscaled(&self, index: usize) -> Point<i32> {
        self.unscaled.get(index).copied().unwrap_or_default()
    }

    pub fn contour(&self, index: usize) -> Result<u16, HintErrorKind> {
        self.contours
            .get(index)
            .copied()
            .ok_or(HintErrorKind::InvalidContourIndex(index))
    }

    fn flag_mut(&mut self, index: usize) -> Result<&mut PointFlags, HintErrorKind> {
        self.flags.get_mut(index).ok_or(InvalidPointIndex(index))
    }

    pub fn touch(&mut self, index: usize, axis: CoordAxis) -> Result<(), HintErrorKind> {
        self.flag_mut(index)?.touch(axis);
        Ok(())
    }

    pub fn untouch(&mut self, index: usize, axis: CoordAxis) -> Result<(), HintErrorKind> {
        self.flag_mut(index)?.untouch(axis);
        Ok(())
    }

    pub fn is_touched(&self, index: usize, axis: CoordAxis) -> Result<bool, HintErrorKind> {
        self.flags
            .get(index)
            .map(|flag| flag.is_touched(axis))
            .ok_or(InvalidPointIndex(index))
    }

    pub fn flip_on_curve(&mut self, index: usize) -> Result<(), HintErrorKind> {
        self.flag_mut(index)?.flip_on_curve();
        Ok(())
    }

    /// Sets or clears the on curve flag for the points in `start..end`.
    pub fn set_on_curve(&mut self, start: usize, end: usize, on: bool) -> Result<(), HintErrorKind> {
        self.flags
            .get_mut(start..end)
            .ok_or(InvalidPointRange(start, end))?
            .iter_mut()
            .for_each(|flag| flag.set_on_curve(on));
        Ok(())
    }

    /// Interpolates untouched points on the given axis.
    ///
    /// In each contour, runs of untouched points between two touched points
    /// are moved proportionally to how those two moved, wrapping around
    /// the end of the contour. A contour with a single touched point is
    /// shifted by that point's displacement and contours without touched
    /// points are left alone.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#interpolate-untouched-points-through-the-outline>
    pub fn iup(&mut self, axis: CoordAxis) -> Result<(), HintErrorKind> {
        if self.points.is_empty() {
            return Ok(());
        }
        let last_point = self.points.len() - 1;
        let mut start = 0;
        for contour_ix in 0..self.contours.len() {
            let end = (self.contour(contour_ix)? as usize).min(last_point);
            let first = start;
            start = end + 1;
            let Some(first_touched) = (first..=end).find(|ix| self.has_touched(*ix, axis)) else {
                continue;
            };
            let mut prev_touched = first_touched;
            for ix in first_touched + 1..=end {
                if self.has_touched(ix, axis) {
                    self.iup_interpolate(axis, prev_touched + 1, ix, prev_touched, ix)?;
                    prev_touched = ix;
                }
            }
            if prev_touched == first_touched {
                self.iup_shift(axis, first..end + 1, first_touched)?;
            } else {
                // wrap around from the last touched point to the first
                self.iup_interpolate(axis, prev_touched + 1, end + 1, prev_touched, first_touched)?;
                self.iup_interpolate(axis, first, first_touched, prev_touched, first_touched)?;
            }
        }
        Ok(())
    }

    fn has_touched(&self, index: usize, axis: CoordAxis) -> bool {
        self.flags.get(index).is_some_and(|flag| flag.is_touched(axis))
    }

    /// Moves every point of `range` except `touched` by the displacement
    /// of `touched`.
    fn iup_shift(
        &mut self,
        axis: CoordAxis,
        range: std::ops::Range<usize>,
        touched: usize,
    ) -> Result<(), HintErrorKind> {
        let delta = coord(self.point(touched)?, axis).wrapping_sub(coord(self.original(touched)?, axis));
        if delta == F26Dot6::ZERO {
            return Ok(());
        }
        let (start, end) = (range.start, range.end);
        let points = self
            .points
            .get_mut(range)
            .ok_or(InvalidPointRange(start, end))?;
        for (ix, point) in (start..end).zip(points) {
            if ix != touched {
                let value = coord_mut(point, axis);
                *value = value.wrapping_add(delta);
            }
        }
        Ok(())
    }

    /// Interpolates the points in `start..end` between the reference
    /// points `ref1` and `ref2`.
    ///
    /// Points outside the original span of the references are shifted
    /// with the nearer reference. Points inside are placed by their
    /// relative position in font units.
    fn iup_interpolate(
        &mut self,
        axis: CoordAxis,
        start: usize,
        end: usize,
        ref1: usize,
        ref2: usize,
    ) -> Result<(), HintErrorKind> {
        if start >= end {
            return Ok(());
        }
        let (mut ref1, mut ref2) = (ref1, ref2);
        if unscaled_coord(self.unscaled(ref1), axis) > unscaled_coord(self.unscaled(ref2), axis) {
            std::mem::swap(&mut ref1, &mut ref2);
        }
        let orus1 = unscaled_coord(self.unscaled(ref1), axis);
        let orus2 = unscaled_coord(self.unscaled(ref2), axis);
        let org1 = coord(self.original(ref1)?, axis);
        let org2 = coord(self.original(ref2)?, axis);
        let cur1 = coord(self.point(ref1)?, axis);
        let cur2 = coord(self.point(ref2)?, axis);
        let (delta1, delta2) = (cur1.wrapping_sub(org1), cur2.wrapping_sub(org2));
        let scale = (cur1 != cur2 && orus1 != orus2).then(|| {
            math::div(
                cur2.wrapping_sub(cur1).to_bits(),
                orus2.wrapping_sub(orus1),
            )
        });
        let range_error = InvalidPointRange(start, end);
        let original = self.original.get(start..end).ok_or(range_error.clone())?;
        let points = self.points.get_mut(start..end).ok_or(range_error)?;
        for (offset, (orig, point)) in original.iter().zip(points).enumerate() {
            let org = coord(*orig, axis);
            let value = if org <= org1 {
                org.wrapping_add(delta1)
            } else if org >= org2 {
                org.wrapping_add(delta2)
            } else if let Some(scale) = scale {
                let orus = unscaled_coord(
                    self.unscaled.get(start + offset).copied().unwrap_or_default(),
                    axis,
                );
                cur1.wrapping_add(F26Dot6::from_bits(math::mul(
                    orus.wrapping_sub(orus1),
                    scale,
                )))
            } else {
                cur1
            };
            *coord_mut(point, axis) = value;
        }
        Ok(())
    }
}

fn coord(point: Point<F26Dot6>, axis: CoordAxis) -> F26Dot6 {
    if axis == CoordAxis::X {
        point.x
    } else {
        point.y
    }
}

fn coord_mut(point: &mut Point<F26Dot6>, axis: CoordAxis) -> &mut F26Dot6 {
    if axis == CoordAxis::X {
        &mut point.x
    } else {
        &mut point.y
    }
}

fn unscaled_coord(point: Point<i32>, axis: CoordAxis) -> i32 {
    if axis == CoordAxis::X {
        point.x
    } else {
        point.y
    }
}

/// Returns `a - b` as raw 26.6 bits, wrapping on overflow.
pub fn point_delta(a: Point<F26Dot6>, b: Point<F26Dot6>) -> Point<i32> {
    Point::new(
        a.x.wrapping_sub(b.x).to_bits(),
        a.y.wrapping_sub(b.y).to_bits(),
    )
}

/// Offsets a coordinate by raw 26.6 bits, wrapping on overflow.
fn nudge(value: &mut F26Dot6, bits: i32) {
    *value = value.wrapping_add(F26Dot6::from_bits(bits));
}

impl<'a> GraphicsState<'a> {
    pub fn zone(&self, pointer: ZonePointer) -> &Zone<'a> {
        &self.zones[pointer as usize]
    }

    pub fn zone_mut(&mut self, pointer: ZonePointer) -> &mut Zone<'a> {
        &mut self.zones[pointer as usize]
    }

    pub fn zp0(&self) -> &Zone<'a> {
        self.zone(self.zp0)
    }

    pub fn zp0_mut(&mut self) -> &mut Zone<'a> {
        self.zone_mut(self.zp0)
    }

    pub fn zp1(&self) -> &Zone<'a> {
        self.zone(self.zp1)
    }

    pub fn zp1_mut(&mut self) -> &mut Zone<'a> {
        self.zone_mut(self.zp1)
    }

    pub fn zp2(&self) -> &Zone<'a> {
        self.zone(self.zp2)
    }

    pub fn zp2_mut(&mut self) -> &mut Zone<'a> {
        self.zone_mut(self.zp2)
    }

    /// Moves an original (unhinted) point by `distance` along the freedom
    /// vector.
    pub fn move_original(
        &mut self,
        zone: ZonePointer,
        point_ix: usize,
        distance: i32,
    ) -> Result<(), HintErrorKind> {
        let (fv, fdotp, axis) = (self.freedom_vector, self.fdotp, self.freedom_axis);
        let point = self.zone_mut(zone).original_mut(point_ix)?;
        match axis {
            CoordAxis::X => nudge(&mut point.x, distance),
            CoordAxis::Y => nudge(&mut point.y, distance),
            CoordAxis::Both => {
                nudge(&mut point.x, math::mul_div(distance, fv.x, fdotp));
                nudge(&mut point.y, math::mul_div(distance, fv.y, fdotp));
            }
        }
        Ok(())
    }

    /// Moves a point by `distance` along the freedom vector so that its
    /// projection changes by `distance`, and marks it touched.
    ///
    /// In backward compatibility mode, x never moves and y stops moving
    /// once `IUP` has run on both axes. Points are still marked touched.
    pub fn move_point(
        &mut self,
        zone: ZonePointer,
        point_ix: usize,
        distance: i32,
    ) -> Result<(), HintErrorKind> {
        let (move_x, move_y) = self.movable_axes();
        let (fv, fdotp, axis) = (self.freedom_vector, self.fdotp, self.freedom_axis);
        let zone = self.zone_mut(zone);
        let point = zone.point_mut(point_ix)?;
        let (dx, dy) = match axis {
            CoordAxis::X => (Some(distance), None),
            CoordAxis::Y => (None, Some(distance)),
            CoordAxis::Both => (
                (fv.x != 0).then(|| math::mul_div(distance, fv.x, fdotp)),
                (fv.y != 0).then(|| math::mul_div(distance, fv.y, fdotp)),
            ),
        };
        if let Some(dx) = dx {
            if move_x {
                nudge(&mut point.x, dx);
            }
        }
        if let Some(dy) = dy {
            if move_y {
                nudge(&mut point.y, dy);
            }
        }
        if dx.is_some() {
            zone.touch(point_ix, CoordAxis::X)?;
        }
        if dy.is_some() {
            zone.touch(point_ix, CoordAxis::Y)?;
        }
        Ok(())
    }

    /// Shifts a point in zp2 by a displacement computed with
    /// [`point_displacement`](Self::point_displacement).
    pub fn move_zp2_point(
        &mut self,
        point_ix: usize,
        dx: i32,
        dy: i32,
        do_touch: bool,
    ) -> Result<(), HintErrorKind> {
        let (move_x, move_y) = self.movable_axes();
        let fv = self.freedom_vector;
        let zone = self.zp2_mut();
        if fv.x != 0 {
            if move_x {
                nudge(&mut zone.point_mut(point_ix)?.x, dx);
            }
            if do_touch {
                zone.touch(point_ix, CoordAxis::X)?;
            }
        }
        if fv.y != 0 {
            if move_y {
                nudge(&mut zone.point_mut(point_ix)?.y, dy);
            }
            if do_touch {
                zone.touch(point_ix, CoordAxis::Y)?;
            }
        }
        Ok(())
    }

    fn movable_axes(&self) -> (bool, bool) {
        let compat = self.backward_compatibility;
        (!compat, !(compat && self.did_iup_x && self.did_iup_y))
    }

    /// Computes how far the reference point used by `SHP`, `SHC` and
    /// `SHZ` has moved from its original position.
    ///
    /// Odd opcodes use rp1 in zp0, even opcodes use rp2 in zp1.
    pub fn point_displacement(&self, opcode: u8) -> Result<PointDisplacement, HintErrorKind> {
        let (zone, point_ix) = if opcode & 1 != 0 {
            (self.zp0, self.rp1)
        } else {
            (self.zp1, self.rp2)
        };
        let zone_data = self.zone(zone);
        let distance = self.project(zone_data.point(point_ix)?, zone_data.original(point_ix)?);
        let fv = self.freedom_vector;
        Ok(PointDisplacement {
            zone,
            point_ix,
            dx: math::mul_div(distance, fv.x, self.fdotp),
            dy: math::mul_div(distance, fv.y, self.fdotp),
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PointDisplacement {
    pub zone: ZonePointer,
    pub point_ix: usize,
    pub dx: i32,
    pub dy: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct ZoneData {
        unscaled: Vec<Point<i32>>,
        original: Vec<Point<F26Dot6>>,
        points: Vec<Point<F26Dot6>>,
        flags: Vec<PointFlags>,
        contours: Vec<u16>,
    }

    impl ZoneData {
        /// Points at the given x coordinates, scaled by 2 into 26.6 with
        /// y = x.
        fn new(xs: &[i32], contours: &[u16]) -> Self {
            let unscaled = xs.iter().map(|x| Point::new(*x, *x)).collect::<Vec<_>>();
            let original = unscaled
                .iter()
                .map(|p| p.map(|v| F26Dot6::from_bits(v * 2)))
                .collect::<Vec<_>>();
            Self {
                points: original.clone(),
                original,
                unscaled,
                flags: vec![PointFlags::on_curve(); xs.len()],
                contours: contours.to_vec(),
            }
        }

        fn zone(&mut self) -> Zone<'_> {
            Zone::new(
                &self.unscaled,
                &mut self.original,
                &mut self.points,
                &mut self.flags,
                &self.contours,
            )
        }
    }

    fn xs(zone: &Zone) -> Vec<i32> {
        zone.points.iter().map(|p| p.x.to_bits()).collect()
    }

    fn bits(point: Point<F26Dot6>) -> Point<i32> {
        point.map(F26Dot6::to_bits)
    }

    fn f26(bits: i32) -> F26Dot6 {
        F26Dot6::from_bits(bits)
    }

    #[test]
    fn zone_pointer_from_value() {
        assert_eq!(ZonePointer::try_from(0), Ok(ZonePointer::Twilight));
        assert_eq!(ZonePointer::try_from(1), Ok(ZonePointer::Glyph));
        assert_eq!(ZonePointer::try_from(2), Err(HintErrorKind::InvalidZoneIndex(2)));
    }

    #[test]
    fn flags() {
        let mut data = ZoneData::new(&[0, 10, 20, 30], &[3]);
        let mut zone = data.zone();
        zone.flip_on_curve(1).unwrap();
        zone.set_on_curve(2, 4, false).unwrap();
        let on = zone.flags.iter().map(|f| f.is_on_curve()).collect::<Vec<_>>();
        assert_eq!(on, [true, false, false, false]);
        assert_eq!(zone.set_on_curve(3, 5, true), Err(InvalidPointRange(3, 5)));
        zone.touch(2, CoordAxis::X).unwrap();
        assert!(zone.is_touched(2, CoordAxis::X).unwrap());
        assert!(!zone.is_touched(2, CoordAxis::Y).unwrap());
        zone.untouch(2, CoordAxis::X).unwrap();
        assert!(!zone.is_touched(2, CoordAxis::Both).unwrap());
        assert_eq!(zone.touch(4, CoordAxis::X), Err(InvalidPointIndex(4)));
    }

    #[test]
    fn iup_single_touched_point_shifts_contour() {
        let mut data = ZoneData::new(&[0, 10, 20, 30, 40, 50], &[2, 5]);
        let mut zone = data.zone();
        zone.points[1].x += f26(7);
        zone.touch(1, CoordAxis::X).unwrap();
        zone.iup(CoordAxis::X).unwrap();
        // only the first contour moves
        assert_eq!(xs(&zone), [7, 27, 47, 60, 80, 100]);
        // y is untouched
        assert_eq!(zone.points[0].y, F26Dot6::ZERO);
    }

    #[test]
    fn iup_interpolates_between_touched_points() {
        let mut data = ZoneData::new(&[0, 10, 20, 30, 40], &[4]);
        let mut zone = data.zone();
        // stretch the span 20..60 in 26.6 to 20..100
        zone.points[1].x = f26(20);
        zone.points[3].x = f26(100);
        zone.touch(1, CoordAxis::X).unwrap();
        zone.touch(3, CoordAxis::X).unwrap();
        zone.iup(CoordAxis::X).unwrap();
        // point 2 is midway, points 0 and 4 are outside the span and shift
        // with the nearer reference
        assert_eq!(xs(&zone), [0, 20, 60, 100, 120]);
    }

    #[test]
    fn iup_wraps_around_contour() {
        let mut data = ZoneData::new(&[10, 0, 20, 30], &[3]);
        let mut zone = data.zone();
        zone.points[1].x += f26(4);
        zone.points[2].x += f26(8);
        zone.touch(1, CoordAxis::X).unwrap();
        zone.touch(2, CoordAxis::X).unwrap();
        zone.iup(CoordAxis::X).unwrap();
        // 3 lies past both references and 0 lies between them
        assert_eq!(xs(&zone), [26, 4, 48, 68]);
    }

    #[test]
    fn iup_ignores_untouched_contours() {
        let mut data = ZoneData::new(&[0, 10, 20], &[2]);
        let mut zone = data.zone();
        zone.points[0].x = f26(99);
        zone.iup(CoordAxis::X).unwrap();
        assert_eq!(xs(&zone), [99, 20, 40]);
    }

    fn graphics_state<'a>(data: &'a mut ZoneData, fv: Point<i32>) -> GraphicsState<'a> {
        let mut state = GraphicsState {
            freedom_vector: fv,
            proj_vector: fv,
            dual_proj_vector: fv,
            backward_compatibility: false,
            ..Default::default()
        };
        state.zones[1] = data.zone();
        state.update_projection_state();
        state
    }

    #[test]
    fn move_point_on_axes() {
        let mut data = ZoneData::new(&[0, 10], &[1]);
        let mut state = graphics_state(&mut data, Point::new(0, 0x4000));
        state.move_point(ZonePointer::Glyph, 1, 64).unwrap();
        let zone = state.zone(ZonePointer::Glyph);
        assert_eq!(bits(zone.point(1).unwrap()), Point::new(20, 84));
        assert!(zone.is_touched(1, CoordAxis::Y).unwrap());
        assert!(!zone.is_touched(1, CoordAxis::X).unwrap());
    }

    #[test]
    fn move_point_diagonal() {
        let mut data = ZoneData::new(&[0, 10], &[1]);
        let mut state = graphics_state(&mut data, math::normalize14(1, 1));
        // fdotp is ~1 so the distance is split across both axes
        state.move_point(ZonePointer::Glyph, 0, 100).unwrap();
        let point = state.zone(ZonePointer::Glyph).point(0).unwrap();
        assert_eq!(bits(point), Point::new(71, 71));
        assert!(state.zone(ZonePointer::Glyph).is_touched(0, CoordAxis::Both).unwrap());
    }

    #[test]
    fn backward_compatibility_locks_movement() {
        let mut data = ZoneData::new(&[0, 10], &[1]);
        let mut state = graphics_state(&mut data, Point::new(0x4000, 0));
        state.backward_compatibility = true;
        state.move_point(ZonePointer::Glyph, 1, 64).unwrap();
        assert_eq!(state.zp2().point(1).unwrap().x, f26(20));
        assert!(state.zp2().is_touched(1, CoordAxis::X).unwrap());
        state.freedom_vector = Point::new(0, 0x4000);
        state.update_projection_state();
        state.move_point(ZonePointer::Glyph, 1, 64).unwrap();
        assert_eq!(state.zp2().point(1).unwrap().y, f26(84));
        state.did_iup_x = true;
        state.did_iup_y = true;
        state.move_point(ZonePointer::Glyph, 1, 64).unwrap();
        assert_eq!(state.zp2().point(1).unwrap().y, f26(84));
    }

    #[test]
    fn move_original_point() {
        let mut data = ZoneData::new(&[0, 10], &[1]);
        let mut state = graphics_state(&mut data, Point::new(0x4000, 0));
        state.move_original(ZonePointer::Glyph, 0, -30).unwrap();
        assert_eq!(bits(state.zp0().original(0).unwrap()), Point::new(-30, 0));
        assert_eq!(bits(state.zp0().point(0).unwrap()), Point::new(0, 0));
    }

    #[test]
    fn displacement_of_reference_point() {
        let mut data = ZoneData::new(&[0, 10], &[1]);
        let mut state = graphics_state(&mut data, Point::new(0x4000, 0));
        state.zp1_mut().point_mut(1).unwrap().x += f26(40);
        state.rp2 = 1;
        let displacement = state.point_displacement(0x32).unwrap();
        assert_eq!(
            displacement,
            PointDisplacement {
                zone: ZonePointer::Glyph,
                point_ix: 1,
                dx: 40,
                dy: 0
            }
        );
        state.move_zp2_point(0, displacement.dx, displacement.dy, true).unwrap();
        assert_eq!(bits(state.zp2().point(0).unwrap()), Point::new(40, 0));
        assert!(state.zp2().is_touched(0, CoordAxis::X).unwrap());
    }

    #[test]
    fn movement_wraps_at_extremes() {
        let mut data = ZoneData::new(&[0, 10], &[1]);
        let mut state = graphics_state(&mut data, Point::new(0, 0x4000));
        state.move_point(ZonePointer::Glyph, 1, i32::MAX).unwrap();
        assert_eq!(state.zp2().point(1).unwrap().y, f26(i32::MIN + 19));
        state.move_zp2_point(0, i32::MAX, i32::MAX, true).unwrap();
        assert_eq!(state.zp2().point(0).unwrap().y, f26(i32::MAX));
        state.move_zp2_point(0, 0, 1, true).unwrap();
        assert_eq!(state.zp2().point(0).unwrap().y, f26(i32::MIN));
        state.move_original(ZonePointer::Glyph, 1, i32::MIN).unwrap();
        assert_eq!(state.zp2().original(1).unwrap().y, f26(i32::MIN + 20));
    }

    #[test]
    fn iup_wraps_at_extremes() {
        let mut data = ZoneData::new(&[0, 10, 20], &[2]);
        let mut zone = data.zone();
        zone.points[0].x = f26(i32::MAX);
        zone.touch(0, CoordAxis::X).unwrap();
        zone.iup(CoordAxis::X).unwrap();
        assert_eq!(xs(&zone), [i32::MAX, i32::MIN + 19, i32::MIN + 39]);
        zone.points[2].x = f26(i32::MIN);
        zone.touch(2, CoordAxis::X).unwrap();
        zone.iup(CoordAxis::X).unwrap();
    }
}
