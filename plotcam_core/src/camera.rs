//! Camera pose and the camera-relative screen basis.
//!
//! The camera sits on a sphere around its frame center, described by the
//! polar angle `phi` (from world up) and the azimuth `theta`. Anything that
//! must look consistent on screen (label offsets, shifts of whole plot groups)
//! is expressed in the screen basis derived from those two angles.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

use crate::easing::{lerp, RateFunction};
use crate::error::{GeometryError, Result};

/// World up, also used as the screen "out" direction.
pub const WORLD_UP: Vector3<f64> = Vector3::new(0.0, 0.0, 1.0);

/// Below this, `forward × world_up` is treated as zero.
const PARALLEL_EPS: f64 = 1e-9;

/// Orientation, zoom and focus point of the scene camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    /// Polar angle from world up, radians. Must lie strictly inside (0, π).
    pub phi: f64,
    /// Azimuth, radians.
    pub theta: f64,
    pub zoom: f64,
    /// World point the camera looks at.
    pub frame_center: Point3<f64>,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::from_degrees(65.0, 30.0)
    }
}

impl CameraPose {
    /// Creates a pose centered on the origin with unit zoom.
    pub fn new(phi: f64, theta: f64) -> Self {
        Self {
            phi,
            theta,
            zoom: 1.0,
            frame_center: Point3::origin(),
        }
    }

    /// Creates a pose from angles in degrees.
    pub fn from_degrees(phi_deg: f64, theta_deg: f64) -> Self {
        Self::new(phi_deg.to_radians(), theta_deg.to_radians())
    }

    /// Builder: sets the frame center.
    pub fn with_frame_center(mut self, center: Point3<f64>) -> Self {
        self.frame_center = center;
        self
    }

    /// Builder: sets the zoom.
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    /// Unit vector pointing from the camera toward the scene.
    pub fn forward(&self) -> Vector3<f64> {
        -Vector3::new(
            self.theta.cos() * self.phi.sin(),
            self.theta.sin() * self.phi.sin(),
            self.phi.cos(),
        )
    }

    /// Builds the screen basis for this pose.
    ///
    /// Fails with [`GeometryError::DegenerateBasis`] when the camera looks
    /// straight along world up (phi at 0 or π).
    pub fn screen_basis(&self) -> Result<ScreenBasis> {
        ScreenBasis::from_angles(self.phi, self.theta)
    }

    /// Interpolates every pose component. Angles are lerped as plain scalars.
    pub fn interpolate(&self, target: &CameraPose, t: f64) -> CameraPose {
        CameraPose {
            phi: lerp(self.phi, target.phi, t),
            theta: lerp(self.theta, target.theta, t),
            zoom: lerp(self.zoom, target.zoom, t),
            frame_center: self.frame_center + (target.frame_center - self.frame_center) * t,
        }
    }
}

/// Right/up/out triad of the screen, expressed in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenBasis {
    pub forward: Vector3<f64>,
    pub right: Vector3<f64>,
    pub up: Vector3<f64>,
    /// Always world up.
    pub out: Vector3<f64>,
}

impl ScreenBasis {
    /// Derives the basis from spherical camera angles.
    pub fn from_angles(phi: f64, theta: f64) -> Result<Self> {
        let forward = CameraPose::new(phi, theta).forward();
        let cross = forward.cross(&WORLD_UP);
        let norm = cross.norm();
        if !norm.is_finite() || norm < PARALLEL_EPS {
            return Err(GeometryError::degenerate(format!(
                "camera forward is parallel to world up (phi = {phi})"
            )));
        }
        let right = cross / norm;
        let up = right.cross(&forward).normalize();

        Ok(Self {
            forward,
            right,
            up,
            out: WORLD_UP,
        })
    }

    pub fn down(&self) -> Vector3<f64> {
        -self.up
    }

    /// Offset of `dx` screen units to the right and `dy` up.
    pub fn screen_shift(&self, dx: f64, dy: f64) -> Vector3<f64> {
        self.right * dx + self.up * dy
    }
}

/// A timed move from one pose to another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraMove {
    pub from: CameraPose,
    pub to: CameraPose,
    /// Seconds.
    pub run_time: f64,
    pub rate: RateFunction,
}

impl CameraMove {
    /// Pose `elapsed` seconds into the move. Clamped at both ends.
    pub fn pose_at(&self, elapsed: f64) -> CameraPose {
        let alpha = if self.run_time > 0.0 {
            elapsed / self.run_time
        } else {
            1.0
        };
        self.from.interpolate(&self.to, self.rate.apply(alpha))
    }
}

/// Azimuth that makes the camera face the XY chord `(dx, dy)` side on.
///
/// The chord normal in the XY plane is `(dy, −dx)`; the camera looks along
/// its negative.
pub fn facing_theta(dx: f64, dy: f64) -> Result<f64> {
    if dx.hypot(dy) < PARALLEL_EPS {
        return Err(GeometryError::degenerate("chord has zero length in the XY plane"));
    }
    Ok((-dx).atan2(dy))
}

/// Side-on pose looking at `center` across the XY chord `(dx, dy)`.
pub fn side_on_pose(dx: f64, dy: f64, center: Point3<f64>) -> Result<CameraPose> {
    Ok(CameraPose::new(FRAC_PI_2, facing_theta(dx, dy)?).with_frame_center(center))
}
