//! Change of basis for the camera-facing "2D" plotting frame.
//!
//! After the camera swings round to look at the curve side on, a second axis
//! frame is placed in the 3D scene so that it reads as a flat 2D plot: its x
//! axis runs along the XY chord between the curve endpoints, its y axis points
//! screen-up and its z axis only completes the right-handed frame (it is never
//! drawn).

use nalgebra::{Isometry3, Matrix3, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::axis_frame::{AxisFrame, AxisRange};
use crate::error::{GeometryError, Result};

const DEGENERATE_EPS: f64 = 1e-12;

/// Right-handed orthonormal frame `{x_dir, y_dir, z_dir}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReprojectionBasis {
    /// Along the XY chord between the curve endpoints.
    pub x_dir: Vector3<f64>,
    /// Screen up, made exactly perpendicular to `x_dir`.
    pub y_dir: Vector3<f64>,
    /// `x_dir × y_dir`.
    pub z_dir: Vector3<f64>,
}

impl ReprojectionBasis {
    /// Builds the basis from two curve-space endpoints.
    ///
    /// The chord `(x1 − x0, y1 − y0)` is normalized in curve space, carried
    /// into world space through the frame's unit steps and normalized again.
    /// Screen up is Gram-Schmidt projected off the chord so the result is a
    /// proper rotation even when the camera's up is not quite perpendicular.
    pub fn from_chord(
        p0: &Point3<f64>,
        p1: &Point3<f64>,
        frame: &AxisFrame,
        screen_up: &Vector3<f64>,
    ) -> Result<Self> {
        let (dx, dy) = (p1.x - p0.x, p1.y - p0.y);
        let chord_len = dx.hypot(dy);
        if chord_len < DEGENERATE_EPS {
            return Err(GeometryError::degenerate(
                "curve endpoints coincide in the XY projection",
            ));
        }
        let (ex, ey) = (dx / chord_len, dy / chord_len);
        let chord = frame.unit_step(0) * ex + frame.unit_step(1) * ey;
        let x_dir = normalized(chord, "chord direction")?;

        let up = normalized(*screen_up, "screen up")?;
        let y_dir = normalized(up - x_dir * up.dot(&x_dir), "screen up along the chord")?;
        let z_dir = x_dir.cross(&y_dir).normalize();

        Ok(Self { x_dir, y_dir, z_dir })
    }

    /// Rotation whose columns are `x_dir`, `y_dir`, `z_dir`.
    pub fn rotation(&self) -> Rotation3<f64> {
        let columns = [self.x_dir, self.y_dir, self.z_dir];
        Rotation3::from_matrix_unchecked(Matrix3::from_columns(&columns))
    }
}

fn normalized(v: Vector3<f64>, what: &str) -> Result<Vector3<f64>> {
    v.try_normalize(DEGENERATE_EPS)
        .ok_or_else(|| GeometryError::degenerate(format!("{what} has zero length")))
}

/// Sizing constants of the plotting frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReprojectionParams {
    /// Gap left of the leftmost sample, as a fraction of the extent.
    pub left_margin: f64,
    /// x axis length as a multiple of the extent.
    pub x_padding: f64,
    pub y_length: f64,
    /// Length of the hidden z axis.
    pub z_length: f64,
}

impl Default for ReprojectionParams {
    fn default() -> Self {
        Self {
            left_margin: 0.08,
            x_padding: 1.05,
            y_length: 7.0,
            z_length: 1.0,
        }
    }
}

/// The plotting frame and everything it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reprojection {
    pub basis: ReprojectionBasis,
    /// Maps the canonical frame (origin at zero, axes along world x/y/z) into
    /// the scene.
    pub transform: Isometry3<f64>,
    /// Smallest and largest projection of the samples onto `x_dir`, relative
    /// to the first sample.
    pub s_min: f64,
    pub s_max: f64,
    /// The placed plotting frame. Its z axis is hidden.
    pub frame: AxisFrame,
}

impl Reprojection {
    /// Builds the plotting frame.
    ///
    /// * `p0`, `p1` - curve endpoints in curve space
    /// * `frame` - the scene's axis frame the samples were laid out in
    /// * `screen_up` - current screen-up vector
    /// * `xy_samples` - world points of the curve's XY projection, first sample first
    /// * `scene_offset` - shift applied to the whole scene after the samples were taken
    pub fn build(
        p0: &Point3<f64>,
        p1: &Point3<f64>,
        frame: &AxisFrame,
        screen_up: &Vector3<f64>,
        xy_samples: &[Point3<f64>],
        scene_offset: &Vector3<f64>,
        params: &ReprojectionParams,
    ) -> Result<Self> {
        let basis = ReprojectionBasis::from_chord(p0, p1, frame, screen_up)?;
        let first = *xy_samples.first().ok_or(GeometryError::InsufficientSamples {
            required: 1,
            got: 0,
        })?;

        let (s_min, s_max) = xy_samples
            .iter()
            .map(|p| (p - first).dot(&basis.x_dir))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| (lo.min(s), hi.max(s)));
        let extent = s_max - s_min;
        if !(extent > 0.0) {
            return Err(GeometryError::degenerate("projected curve has no extent along the chord"));
        }

        let origin = first + basis.x_dir * (s_min - params.left_margin * extent) + scene_offset;
        let transform = Isometry3::from_parts(
            Translation3::from(origin.coords),
            UnitQuaternion::from_rotation_matrix(&basis.rotation()),
        );

        let x_length = params.x_padding * extent;
        let canonical = AxisFrame::new(
            [
                AxisRange::from_zero(x_length),
                AxisRange::from_zero(params.y_length),
                AxisRange::new(0.0, params.z_length, params.z_length),
            ],
            [x_length, params.y_length, params.z_length],
        )?;

        Ok(Self {
            basis,
            transform,
            s_min,
            s_max,
            frame: canonical.placed(&transform),
        })
    }

    pub fn extent(&self) -> f64 {
        self.s_max - self.s_min
    }

    pub fn origin(&self) -> Point3<f64> {
        self.frame.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraPose;
    use crate::curve::{BudgetCurve, ParametricCurve, RANGE_MARGIN};
    use crate::path::STATIC_TRACE_SAMPLES;
    use approx::assert_relative_eq;

    struct Fixture {
        frame: AxisFrame,
        up: Vector3<f64>,
        samples: Vec<Point3<f64>>,
        curve: BudgetCurve,
    }

    fn fixture() -> Fixture {
        let curve = BudgetCurve::default();
        let basis = CameraPose::default().screen_basis().unwrap();
        let frame = AxisFrame::enclosing(&curve, RANGE_MARGIN, 7.0)
            .unwrap()
            .shifted(&(basis.down() * 6.0));
        let samples = curve
            .sample(STATIC_TRACE_SAMPLES)
            .iter()
            .map(|c| frame.xy_projection(c))
            .collect();
        Fixture { frame, up: basis.up, samples, curve }
    }

    #[test]
    fn test_basis_orthonormal_right_handed() {
        let f = fixture();
        let b = ReprojectionBasis::from_chord(&f.curve.start(), &f.curve.end(), &f.frame, &f.up)
            .unwrap();
        assert_relative_eq!(b.x_dir.norm(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(b.y_dir.norm(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(b.z_dir.norm(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(b.x_dir.dot(&b.y_dir), 0.0, epsilon = 1e-9);
        assert_relative_eq!(b.x_dir.dot(&b.z_dir), 0.0, epsilon = 1e-9);
        assert_relative_eq!(b.y_dir.dot(&b.z_dir), 0.0, epsilon = 1e-9);
        assert_relative_eq!(b.x_dir.cross(&b.y_dir), b.z_dir, epsilon = 1e-9);
        assert_relative_eq!(b.rotation().matrix().determinant(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_chord_stays_horizontal() {
        let f = fixture();
        let b = ReprojectionBasis::from_chord(&f.curve.start(), &f.curve.end(), &f.frame, &f.up)
            .unwrap();
        // axis-aligned scene frame: the chord lies in the world XY plane
        assert_relative_eq!(b.x_dir.z, 0.0, epsilon = 1e-12);
        // y still leans screen up
        assert!(b.y_dir.dot(&f.up) > 0.99);
    }

    #[test]
    fn test_degenerate_chord() {
        let f = fixture();
        let p = Point3::new(1.0, 2.0, 0.0);
        let q = Point3::new(1.0, 2.0, 5.0);
        let err = ReprojectionBasis::from_chord(&p, &q, &f.frame, &f.up).unwrap_err();
        assert!(err.is_degenerate());
    }

    #[test]
    fn test_origin_left_of_curve() {
        let f = fixture();
        let offset = Vector3::new(0.0, 0.0, -1.5);
        let params = ReprojectionParams::default();
        let r = Reprojection::build(
            &f.curve.start(),
            &f.curve.end(),
            &f.frame,
            &f.up,
            &f.samples,
            &offset,
            &params,
        )
        .unwrap();

        let extent = r.extent();
        assert!(extent > 0.0);
        // origin sits 8% of the extent before the leftmost sample
        let leftmost = f.samples[0] + offset;
        let s_origin = (r.origin() - leftmost).dot(&r.basis.x_dir);
        assert_relative_eq!(s_origin, r.s_min - 0.08 * extent, epsilon = 1e-9);

        assert_relative_eq!(r.frame.lengths[0], 1.05 * extent, epsilon = 1e-12);
        assert_relative_eq!(r.frame.axis_direction(0), r.basis.x_dir, epsilon = 1e-9);
        assert_relative_eq!(r.frame.axis_direction(1), r.basis.y_dir, epsilon = 1e-9);
        // rigid: one coordinate unit is one world unit
        assert_relative_eq!(r.frame.unit_step(0).norm(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(r.frame.unit_step(1).norm(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_build_needs_samples() {
        let f = fixture();
        let err = Reprojection::build(
            &f.curve.start(),
            &f.curve.end(),
            &f.frame,
            &f.up,
            &[],
            &Vector3::zeros(),
            &ReprojectionParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GeometryError::InsufficientSamples { .. }));
    }

    #[test]
    fn test_params_partial_json() {
        let params: ReprojectionParams = serde_json::from_str(r#"{ "left_margin": 0.1 }"#).unwrap();
        assert_eq!(params.left_margin, 0.1);
        assert_eq!(params.x_padding, ReprojectionParams::default().x_padding);
        assert_eq!(params.y_length, 7.0);
    }
}
