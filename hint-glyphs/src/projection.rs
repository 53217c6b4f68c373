//! Point projection.

use font_types::{F26Dot6, Point};

use crate::{
    graphics::{CoordAxis, GraphicsState},
    math,
    zone::point_delta,
};

/// 1.0 in 2.14.
const ONE: i32 = 0x4000;

impl GraphicsState<'_> {
    /// Recomputes the cached axes and dot product after a change to the
    /// projection, dual projection or freedom vector.
    pub fn update_projection_state(&mut self) {
        let (fv, pv) = (self.freedom_vector, self.proj_vector);
        self.fdotp = if fv.x == ONE {
            pv.x
        } else if fv.y == ONE {
            pv.y
        } else {
            (pv.x * fv.x + pv.y * fv.y) >> 14
        };
        self.proj_axis = axis_of(pv);
        self.dual_proj_axis = axis_of(self.dual_proj_vector);
        self.freedom_axis = if self.fdotp == ONE {
            axis_of(fv)
        } else {
            CoordAxis::Both
        };
        // nearly perpendicular vectors make movement explode
        if self.fdotp.abs() < 0x400 {
            self.fdotp = ONE;
        }
    }

    /// Distance from `v2` to `v1` along the projection vector.
    pub fn project(&self, v1: Point<F26Dot6>, v2: Point<F26Dot6>) -> i32 {
        project_along(self.proj_axis, self.proj_vector, point_delta(v1, v2))
    }

    /// Distance from `v2` to `v1` along the dual projection vector.
    pub fn dual_project(&self, v1: Point<F26Dot6>, v2: Point<F26Dot6>) -> i32 {
        project_along(self.dual_proj_axis, self.dual_proj_vector, point_delta(v1, v2))
    }

    /// Like [`dual_project`](Self::dual_project) for raw coordinates, such
    /// as points in font units.
    pub fn dual_project_raw(&self, v1: Point<i32>, v2: Point<i32>) -> i32 {
        let delta = Point::new(v1.x.wrapping_sub(v2.x), v1.y.wrapping_sub(v2.y));
        project_along(self.dual_proj_axis, self.dual_proj_vector, delta)
    }
}

fn axis_of(vector: Point<i32>) -> CoordAxis {
    if vector.x == ONE {
        CoordAxis::X
    } else if vector.y == ONE {
        CoordAxis::Y
    } else {
        CoordAxis::Both
    }
}

fn project_along(axis: CoordAxis, vector: Point<i32>, delta: Point<i32>) -> i32 {
    match axis {
        CoordAxis::X => delta.x,
        CoordAxis::Y => delta.y,
        CoordAxis::Both => math::dot14(delta, vector),
    }
}
