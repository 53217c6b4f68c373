//! Decoded glyph outlines.

use bytemuck::{AnyBitPattern, NoUninit};
use font_types::Point;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in a glyph outline.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlPoint {
    pub position: Point<f32>,
    pub on_curve: bool,
}

impl ControlPoint {
    pub fn new(x: f32, y: f32, on_curve: bool) -> Self {
        Self {
            position: Point::new(x, y),
            on_curve,
        }
    }
}

/// An axis aligned bounding box.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    pub min: Point<f32>,
    pub max: Point<f32>,
}

impl Bounds {
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            min: Point::new(x_min, y_min),
            max: Point::new(x_max, y_max),
        }
    }

    /// Computes the bounds of a set of points.
    ///
    /// Returns the default (zero) bounds for an empty set.
    pub fn from_points(points: impl IntoIterator<Item = Point<f32>>) -> Self {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self::default();
        };
        points.fold(Self { min: first, max: first }, |mut bounds, p| {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
            bounds
        })
    }

    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Returns the bounds of this box after transformation.
    pub fn transform(&self, transform: &Transform) -> Self {
        if transform.is_identity() {
            return *self;
        }
        let corners = [
            Point::new(self.min.x, self.min.y),
            Point::new(self.max.x, self.min.y),
            Point::new(self.min.x, self.max.y),
            Point::new(self.max.x, self.max.y),
        ];
        Self::from_points(corners.map(|p| transform.transform_point(p)))
    }
}

/// A transformation matrix applied to a component of a composite glyph.
///
/// For a vector `(x,y)` the transformed position is
/// `x' = xx * x + xy * y + dx` and `y' = yx * x + yy * y + dy`.
#[derive(Copy, Clone, Debug, PartialEq, AnyBitPattern, NoUninit)]
#[repr(C)]
pub struct Transform {
    pub xx: f32,
    pub yx: f32,
    pub xy: f32,
    pub yy: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        xx: 1.0,
        yx: 0.0,
        xy: 0.0,
        yy: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    pub fn translation(dx: f32, dy: f32) -> Self {
        Self {
            dx,
            dy,
            ..Self::IDENTITY
        }
    }

    /// Returns the six coefficients in `[xx, yx, xy, yy, dx, dy]` order.
    pub fn as_array(&self) -> [f32; 6] {
        bytemuck::cast(*self)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn transform_point(&self, Point { x, y }: Point<f32>) -> Point<f32> {
        Point::new(
            self.dx + (self.xx * x) + (self.xy * y),
            self.dy + (self.yx * x) + (self.yy * y),
        )
    }
}

/// The outline of a single glyph.
///
/// `end_points` holds the index of the last point of each contour in
/// ascending order; the final entry is always `control_points.len() - 1`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GlyphVector {
    pub control_points: Vec<ControlPoint>,
    pub end_points: Vec<u16>,
    pub bounds: Bounds,
    pub instructions: Vec<u8>,
    pub is_composite: bool,
}

impl GlyphVector {
    /// An empty glyph with no contours.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.control_points.is_empty()
    }

    pub fn num_contours(&self) -> usize {
        self.end_points.len()
    }

    /// Returns the bounds of the glyph, computing them from the control
    /// points when no bounds were recorded.
    pub fn bounds(&self) -> Bounds {
        if self.bounds == Bounds::default() && !self.control_points.is_empty() {
            Bounds::from_points(self.control_points.iter().map(|p| p.position))
        } else {
            self.bounds
        }
    }

    /// Iterates over the points of each contour.
    pub fn contours(&self) -> impl Iterator<Item = &[ControlPoint]> + '_ {
        let mut start = 0;
        self.end_points.iter().filter_map(move |end| {
            let end = *end as usize + 1;
            let contour = self.control_points.get(start..end);
            start = end;
            contour
        })
    }

    /// Returns a new glyph with every point and the bounds transformed.
    pub fn transform(&self, transform: &Transform) -> Self {
        let control_points = self
            .control_points
            .iter()
            .map(|point| ControlPoint {
                position: transform.transform_point(point.position),
                on_curve: point.on_curve,
            })
            .collect();
        Self {
            control_points,
            end_points: self.end_points.clone(),
            bounds: self.bounds().transform(transform),
            instructions: self.instructions.clone(),
            is_composite: self.is_composite,
        }
    }

    /// Appends the contours of `other` to this glyph.
    ///
    /// Contour end points of `other` are rebased on the current point count.
    pub(crate) fn append(&mut self, other: &GlyphVector) -> Result<(), crate::ReadError> {
        let base = self.control_points.len();
        for end in &other.end_points {
            let end = u16::try_from(base + *end as usize)
                .map_err(|_| crate::ReadError::MalformedData("too many points in glyph"))?;
            self.end_points.push(end);
        }
        self.control_points
            .extend_from_slice(&other.control_points);
        Ok(())
    }

    /// Checks the contour invariants.
    pub(crate) fn validate(&self) -> Result<(), crate::ReadError> {
        let mut prev: Option<u16> = None;
        for end in &self.end_points {
            if prev.is_some_and(|prev| *end <= prev) {
                return Err(crate::ReadError::MalformedData(
                    "contour end points are not ascending",
                ));
            }
            prev = Some(*end);
        }
        let expected = prev.map(|end| end as usize + 1).unwrap_or(0);
        if expected != self.control_points.len() {
            return Err(crate::ReadError::MalformedData(
                "contour end points do not match point count",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> GlyphVector {
        GlyphVector {
            control_points: vec![
                ControlPoint::new(0.0, 0.0, true),
                ControlPoint::new(0.0, 100.0, true),
                ControlPoint::new(100.0, 100.0, true),
                ControlPoint::new(100.0, 0.0, true),
            ],
            end_points: vec![3],
            bounds: Bounds::new(0.0, 0.0, 100.0, 100.0),
            ..Default::default()
        }
    }

    #[test]
    fn bounds_from_points() {
        let bounds = Bounds::from_points([
            Point::new(5.0, -3.0),
            Point::new(-1.0, 8.0),
            Point::new(2.0, 2.0),
        ]);
        assert_eq!(bounds, Bounds::new(-1.0, -3.0, 5.0, 8.0));
        assert_eq!(Bounds::from_points([]), Bounds::default());
    }

    #[test]
    fn lazily_computed_bounds() {
        let mut glyph = square();
        glyph.bounds = Bounds::default();
        assert_eq!(glyph.bounds(), Bounds::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(GlyphVector::empty().bounds(), Bounds::default());
    }

    #[test]
    fn transform_layout() {
        let transform = Transform {
            xx: 1.0,
            yx: 2.0,
            xy: 3.0,
            yy: 4.0,
            dx: 5.0,
            dy: 6.0,
        };
        assert_eq!(transform.as_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(
            transform.transform_point(Point::new(1.0, 1.0)),
            Point::new(9.0, 12.0)
        );
    }

    #[test]
    fn transformed_glyph_is_new_copy() {
        let glyph = square();
        let moved = glyph.transform(&Transform {
            xx: -1.0,
            ..Transform::translation(10.0, 20.0)
        });
        assert_eq!(glyph, square());
        assert_eq!(moved.control_points[2].position, Point::new(-90.0, 120.0));
        assert_eq!(moved.bounds, Bounds::new(-90.0, 20.0, 10.0, 120.0));
    }

    #[test]
    fn append_rebases_end_points() {
        let mut glyph = square();
        glyph.append(&square()).unwrap();
        assert_eq!(glyph.end_points, [3, 7]);
        assert_eq!(glyph.contours().count(), 2);
        glyph.validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_contours() {
        let mut glyph = square();
        glyph.end_points = vec![2];
        assert!(glyph.validate().is_err());
        glyph.end_points = vec![3, 3];
        assert!(glyph.validate().is_err());
    }
}
