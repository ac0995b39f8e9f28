//! plotcam core - geometry for camera-aware explanatory plots
//!
//! Pure functions behind two animated scenes:
//! 1. **Screen basis**: right/up/out from the camera's spherical angles, so
//!    labels and shifts stay screen-consistent while the camera moves
//! 2. **Curves and projections**: parametric curves mapped through 3D axis
//!    frames, with their XY/X/Y/Z projections, dashed guides and smooth traces
//! 3. **Reprojection**: the change of basis that embeds a flat-looking plotting
//!    frame in 3D, aligned with a curve's endpoint chord
//! 4. **Progress sweep**: position, color and trail of a marker driven by a
//!    single progress scalar
//!
//! Nothing here renders, schedules or stores frames; a driver re-invokes these
//! functions once per frame.

pub mod axis_frame;
pub mod camera;
pub mod color;
pub mod curve;
pub mod easing;
pub mod error;
pub mod guides;
pub mod path;
pub mod progress;
pub mod reprojection;

// Re-export key types for convenience
pub use axis_frame::{AxisFrame, AxisRange, LabelAnchor};
pub use camera::{CameraMove, CameraPose, ScreenBasis, WORLD_UP};
pub use color::Rgb;
pub use curve::{BudgetCurve, EllipseLoop, ParametricCurve};
pub use easing::RateFunction;
pub use error::{GeometryError, Result};
pub use guides::{DashStyle, FrozenGuides, GuideSegment, GuideSet};
pub use path::{CubicSegment, SmoothPath};
pub use progress::{ColorSweep, ProgressState, SweepSample};
pub use reprojection::{Reprojection, ReprojectionBasis, ReprojectionParams};
