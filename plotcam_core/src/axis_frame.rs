//! Axis frames: affine maps between curve space and world space.
//!
//! A frame is three number lines sharing an origin. Each axis maps its range
//! `[min, max]` onto a segment of `length` world units; the frame as a whole
//! may be rotated and translated rigidly. Nothing is cached, every position is
//! recomputed from the map.

use nalgebra::{Isometry3, Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::curve::{endpoint_extents, ParametricCurve};
use crate::error::{GeometryError, Result};

/// Number of tick intervals a range is divided into.
const TICK_DIVISIONS: f64 = 5.0;

/// Closed numeric range of one axis plus its tick spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// `[0, max]` split into five ticks.
    pub fn from_zero(max: f64) -> Self {
        Self::new(0.0, max, max / TICK_DIVISIONS)
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Coordinate value placed at the frame origin: zero when the range
    /// contains it, otherwise the end nearest to zero.
    pub fn anchor_value(&self) -> f64 {
        if self.min <= 0.0 && self.max >= 0.0 {
            0.0
        } else if self.min > 0.0 {
            self.min
        } else {
            self.max
        }
    }
}

/// Position and orientation of an axis label. Text layout is up to the
/// renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelAnchor {
    pub position: Point3<f64>,
    pub orientation: UnitQuaternion<f64>,
}

/// A 3D axis frame placed in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisFrame {
    pub ranges: [AxisRange; 3],
    /// World length of each axis.
    pub lengths: [f64; 3],
    /// World position of the coordinate anchor (usually `(0, 0, 0)`).
    pub origin: Point3<f64>,
    pub orientation: UnitQuaternion<f64>,
}

impl AxisFrame {
    /// Creates an axis-aligned frame anchored at the world origin.
    pub fn new(ranges: [AxisRange; 3], lengths: [f64; 3]) -> Result<Self> {
        for (i, (range, length)) in ranges.iter().zip(lengths.iter()).enumerate() {
            if !(range.span() > 0.0) {
                return Err(GeometryError::invalid_axis(format!(
                    "axis {i}: range [{}, {}] is empty",
                    range.min, range.max
                )));
            }
            if !(*length > 0.0) {
                return Err(GeometryError::invalid_axis(format!(
                    "axis {i}: length {length} is not positive"
                )));
            }
        }
        Ok(Self {
            ranges,
            lengths,
            origin: Point3::origin(),
            orientation: UnitQuaternion::identity(),
        })
    }

    /// Frame whose ranges `[0, e]` enclose both curve endpoints with `margin`
    /// to spare, every axis `length` world units long.
    pub fn enclosing<C: ParametricCurve + ?Sized>(
        curve: &C,
        margin: f64,
        length: f64,
    ) -> Result<Self> {
        let [x, y, z] = endpoint_extents(curve, margin);
        Self::new(
            [AxisRange::from_zero(x), AxisRange::from_zero(y), AxisRange::from_zero(z)],
            [length; 3],
        )
    }

    /// World units per coordinate unit along axis `i`.
    pub fn unit_length(&self, i: usize) -> f64 {
        self.lengths[i] / self.ranges[i].span()
    }

    /// World displacement of one coordinate unit along axis `i`.
    pub fn unit_step(&self, i: usize) -> Vector3<f64> {
        let mut local = Vector3::zeros();
        local[i] = self.unit_length(i);
        self.orientation * local
    }

    /// World direction of axis `i`.
    pub fn axis_direction(&self, i: usize) -> Vector3<f64> {
        self.orientation * Vector3::ith(i, 1.0)
    }

    /// Maps curve-space coordinates to a world point.
    pub fn to_world(&self, coords: &Point3<f64>) -> Point3<f64> {
        let local = Vector3::from_fn(|i, _| {
            (coords[i] - self.ranges[i].anchor_value()) * self.unit_length(i)
        });
        self.origin + self.orientation * local
    }

    /// Convenience wrapper over [`to_world`](Self::to_world).
    pub fn coords_to_point(&self, x: f64, y: f64, z: f64) -> Point3<f64> {
        self.to_world(&Point3::new(x, y, z))
    }

    /// Inverse of [`to_world`](Self::to_world).
    pub fn to_curve_space(&self, point: &Point3<f64>) -> Point3<f64> {
        let local = self.orientation.inverse() * (point - self.origin);
        Point3::from(Vector3::from_fn(|i, _| {
            local[i] / self.unit_length(i) + self.ranges[i].anchor_value()
        }))
    }

    /// Projection onto the XY plane (`z = 0`), in world space.
    pub fn xy_projection(&self, coords: &Point3<f64>) -> Point3<f64> {
        self.coords_to_point(coords.x, coords.y, 0.0)
    }

    /// Projection onto the X axis, in world space.
    pub fn x_axis_projection(&self, coords: &Point3<f64>) -> Point3<f64> {
        self.coords_to_point(coords.x, 0.0, 0.0)
    }

    /// Projection onto the Y axis, in world space.
    pub fn y_axis_projection(&self, coords: &Point3<f64>) -> Point3<f64> {
        self.coords_to_point(0.0, coords.y, 0.0)
    }

    /// Projection onto the Z axis, in world space.
    pub fn z_axis_projection(&self, coords: &Point3<f64>) -> Point3<f64> {
        self.coords_to_point(0.0, 0.0, coords.z)
    }

    /// The same frame translated by `offset`.
    pub fn shifted(&self, offset: &Vector3<f64>) -> Self {
        Self {
            origin: self.origin + offset,
            ..*self
        }
    }

    /// The same frame moved rigidly: rotated about its origin, then placed at
    /// `transform`'s translation.
    pub fn placed(&self, transform: &Isometry3<f64>) -> Self {
        Self {
            origin: Point3::from(transform.translation.vector),
            orientation: transform.rotation * self.orientation,
            ..*self
        }
    }

    /// Label anchor at `coords`, rotated by `orientation` and nudged by a
    /// world-space `offset`.
    pub fn label_anchor(
        &self,
        coords: &Point3<f64>,
        orientation: UnitQuaternion<f64>,
        offset: &Vector3<f64>,
    ) -> LabelAnchor {
        LabelAnchor {
            position: self.to_world(coords) + offset,
            orientation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{BudgetCurve, RANGE_MARGIN};
    use approx::assert_relative_eq;
    use nalgebra::Translation3;
    use proptest::prelude::*;

    fn scene_frame() -> AxisFrame {
        AxisFrame::enclosing(&BudgetCurve::default(), RANGE_MARGIN, 7.0).unwrap()
    }

    #[test]
    fn test_enclosing_ranges() {
        let frame = scene_frame();
        assert_relative_eq!(frame.ranges[0].max, 2.2, epsilon = 1e-12);
        assert_relative_eq!(frame.ranges[0].step, 0.44, epsilon = 1e-12);
        assert_relative_eq!(frame.unit_length(1), 7.0 / 4.2, epsilon = 1e-12);
    }

    #[test]
    fn test_origin_and_axis_ends() {
        let frame = scene_frame();
        assert_relative_eq!(frame.coords_to_point(0.0, 0.0, 0.0), Point3::origin());
        let x_end = frame.coords_to_point(frame.ranges[0].max, 0.0, 0.0);
        assert_relative_eq!(x_end, Point3::new(7.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_anchor_value_off_zero() {
        assert_eq!(AxisRange::new(2.0, 5.0, 1.0).anchor_value(), 2.0);
        assert_eq!(AxisRange::new(-5.0, -2.0, 1.0).anchor_value(), -2.0);
        assert_eq!(AxisRange::new(-1.0, 1.0, 1.0).anchor_value(), 0.0);
    }

    #[test]
    fn test_invalid_axes() {
        let r = AxisRange::from_zero(1.0);
        assert!(AxisFrame::new([r, r, AxisRange::new(1.0, 1.0, 0.0)], [1.0; 3]).is_err());
        assert!(AxisFrame::new([r; 3], [1.0, 0.0, 1.0]).is_err());
    }

    #[test]
    fn test_projections() {
        let frame = scene_frame().shifted(&Vector3::new(0.0, 0.0, -6.0));
        let c = Point3::new(1.0, 2.0, 1.2);
        let xy = frame.xy_projection(&c);
        assert_relative_eq!(frame.to_curve_space(&xy), Point3::new(1.0, 2.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(
            frame.to_curve_space(&frame.x_axis_projection(&c)),
            Point3::new(1.0, 0.0, 0.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            frame.to_curve_space(&frame.y_axis_projection(&c)),
            Point3::new(0.0, 2.0, 0.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            frame.to_curve_space(&frame.z_axis_projection(&c)),
            Point3::new(0.0, 0.0, 1.2),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_placed_moves_origin_and_axes() {
        let frame = scene_frame();
        let rotation =
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2);
        let iso = Isometry3::from_parts(Translation3::new(1.0, 2.0, 3.0), rotation);
        let placed = frame.placed(&iso);
        assert_relative_eq!(placed.coords_to_point(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(placed.axis_direction(0), Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(placed.unit_step(0).norm(), frame.unit_length(0), epsilon = 1e-12);
    }

    #[test]
    fn test_label_anchor_offset() {
        let frame = scene_frame();
        let anchor = frame.label_anchor(
            &Point3::new(1.0, 0.0, 0.0),
            UnitQuaternion::identity(),
            &Vector3::new(0.0, -0.3, 0.3),
        );
        let expected = frame.coords_to_point(1.0, 0.0, 0.0) + Vector3::new(0.0, -0.3, 0.3);
        assert_relative_eq!(anchor.position, expected);
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            x in -20.0f64..20.0,
            y in -20.0f64..20.0,
            z in -20.0f64..20.0,
            angle in -3.0f64..3.0,
        ) {
            let rotation = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), angle);
            let placement = Isometry3::from_parts(Translation3::new(0.5, -1.0, 2.0), rotation);
            let frame = scene_frame().placed(&placement);
            let p = Point3::new(x, y, z);
            let back = frame.to_world(&frame.to_curve_space(&p));
            prop_assert!((back - p).norm() < 1e-9);
        }
    }
}
