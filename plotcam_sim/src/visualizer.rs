//! Rerun visualization of scene geometry.
//!
//! Only available with the `visualization` feature; otherwise every method is
//! a no-op.
//!
//! # What Gets Logged
//!
//! - Static geometry once: axes, traces, frozen guide dashes, plotting frame,
//!   base loop
//! - Per frame: moving dots, live guides and traces, the sweep trail with its
//!   gradient, progress as a scalar
//! - The plot group's current shift as a transform on `world/plot`

#[cfg(feature = "visualization")]
use nalgebra::Point3;
#[cfg(feature = "visualization")]
use plotcam_core::{AxisFrame, GuideSegment, Rgb, SmoothPath};
#[cfg(feature = "visualization")]
use rerun::{Color, LineStrips3D, Points3D, Radius, RecordingStream};

use crate::exporter::{FrameGeometry, SceneStatics};

/// Points per Bézier segment when flattening paths into line strips.
#[cfg(feature = "visualization")]
const STRIP_RESOLUTION: usize = 4;

#[cfg(feature = "visualization")]
fn position(p: &Point3<f64>) -> [f32; 3] {
    [p.x as f32, p.y as f32, p.z as f32]
}

#[cfg(feature = "visualization")]
fn color(c: Rgb) -> Color {
    let [r, g, b] = c.to_rgb8();
    Color::from_rgb(r, g, b)
}

#[cfg(feature = "visualization")]
fn strip(path: &SmoothPath) -> Vec<[f32; 3]> {
    path.flatten(STRIP_RESOLUTION).iter().map(position).collect()
}

#[cfg(feature = "visualization")]
fn dash_strips(dashes: &[GuideSegment]) -> Vec<Vec<[f32; 3]>> {
    dashes.iter().map(|d| vec![position(&d.start), position(&d.end)]).collect()
}

/// Axis lines of a frame, skipping the axes listed in `hidden`.
#[cfg(feature = "visualization")]
fn axis_strips(frame: &AxisFrame, hidden: &[usize]) -> Vec<Vec<[f32; 3]>> {
    (0..3)
        .filter(|i| !hidden.contains(i))
        .map(|i| {
            let [x, y, z] = frame.ranges.map(|r| r.anchor_value());
            let mut lo = Point3::new(x, y, z);
            let mut hi = lo;
            lo[i] = frame.ranges[i].min;
            hi[i] = frame.ranges[i].max;
            vec![position(&frame.to_world(&lo)), position(&frame.to_world(&hi))]
        })
        .collect()
}

/// Rerun logger for scene playback.
pub struct RerunLogger {
    #[cfg(feature = "visualization")]
    rec: Option<RecordingStream>,

    /// Whether visualization is enabled
    enabled: bool,
}

impl RerunLogger {
    /// Creates a new logger with visualization disabled.
    pub fn disabled() -> Self {
        Self {
            #[cfg(feature = "visualization")]
            rec: None,
            enabled: false,
        }
    }

    /// Creates a new logger with visualization enabled.
    #[cfg(feature = "visualization")]
    pub fn new(name: &str) -> Self {
        match rerun::RecordingStreamBuilder::new(name).spawn() {
            Ok(rec) => {
                tracing::info!(
                    "Rerun visualization enabled - open Rerun Viewer to watch the scene"
                );
                Self {
                    rec: Some(rec),
                    enabled: true,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to initialize Rerun: {:?}", e);
                Self {
                    rec: None,
                    enabled: false,
                }
            }
        }
    }

    /// Creates a logger - returns disabled if visualization feature not enabled.
    #[cfg(not(feature = "visualization"))]
    pub fn new(_name: &str) -> Self {
        tracing::info!("Rerun visualization not available (compile with --features visualization)");
        Self::disabled()
    }

    /// Returns whether visualization is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sets the scene time for subsequent logs.
    #[cfg(feature = "visualization")]
    pub fn set_time(&self, seconds: f64) {
        if let Some(ref rec) = self.rec {
            rec.set_time_seconds("scene_time", seconds);
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn set_time(&self, _seconds: f64) {}

    /// Logs the geometry that stays put for the whole run.
    #[cfg(feature = "visualization")]
    pub fn log_statics(&self, statics: &SceneStatics) {
        let Some(ref rec) = self.rec else { return };
        let black = Color::from_rgb(0, 0, 0);
        match statics {
            SceneStatics::Hparam(s) => {
                let blue = color(plotcam_core::color::BLUE);
                let _ = rec.log(
                    "world/plot/axes",
                    &LineStrips3D::new(axis_strips(&s.axes, &[])).with_colors([black]),
                );
                let traces = [strip(&s.traces.path_3d), strip(&s.traces.xy), strip(&s.traces.z)];
                let _ = rec.log(
                    "world/plot/traces",
                    &LineStrips3D::new(traces).with_colors([blue, black, blue]),
                );
                let _ = rec.log(
                    "world/plot/start_guides",
                    &LineStrips3D::new(dash_strips(&s.start_dashes)).with_colors([black]),
                );
                let _ = rec.log(
                    "world/plot/end_guides",
                    &LineStrips3D::new(dash_strips(&s.end_dashes)).with_colors([black]),
                );
                let labels = [s.labels.x.position, s.labels.y.position, s.labels.z.position];
                let _ = rec.log(
                    "world/plot/labels",
                    &Points3D::new(labels.iter().map(position))
                        .with_radii([Radius::new_scene_units(0.05)]),
                );
                let _ = rec.log(
                    "world/reprojection/axes",
                    &LineStrips3D::new(axis_strips(&s.reprojection.frame, &[2]))
                        .with_colors([black]),
                );
            }
            SceneStatics::Sweep(s) => {
                let _ = rec.log(
                    "world/base",
                    &LineStrips3D::new([strip(&s.base)])
                        .with_colors([Color::from_rgb(128, 128, 128)]),
                );
            }
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_statics(&self, _statics: &SceneStatics) {}

    /// Logs one frame of moving geometry.
    #[cfg(feature = "visualization")]
    pub fn log_frame(&self, frame: &FrameGeometry) {
        let Some(ref rec) = self.rec else { return };
        match frame {
            FrameGeometry::Hparam(f) => {
                let offset = f.plot_offset;
                let _ = rec.log(
                    "world/plot",
                    &rerun::Transform3D::from_translation([
                        offset.x as f32,
                        offset.y as f32,
                        offset.z as f32,
                    ]),
                );
                let _ = rec.log(
                    "world/live/dots",
                    &Points3D::new([position(&f.dot), position(&f.z_dot)])
                        .with_colors([color(plotcam_core::color::BLUE)])
                        .with_radii([Radius::new_scene_units(0.1)]),
                );
                let _ = rec.log(
                    "world/live/guides",
                    &LineStrips3D::new(dash_strips(&f.live_dashes))
                        .with_colors([Color::from_rgb(0, 0, 0)]),
                );
                if let Some(ref traces) = f.live_traces {
                    let _ = rec.log(
                        "world/live/traces",
                        &LineStrips3D::new([
                            strip(&traces.path_3d),
                            strip(&traces.xy),
                            strip(&traces.z),
                        ]),
                    );
                }
            }
            FrameGeometry::Sweep(f) => {
                let _ = rec.log(
                    "world/dot",
                    &Points3D::new([position(&f.position)])
                        .with_colors([color(f.color)])
                        .with_radii([Radius::new_scene_units(0.08)]),
                );
                // one strip per segment so each can carry its gradient color
                let anchors = f.trail.anchors();
                let strips: Vec<Vec<[f32; 3]>> =
                    anchors.windows(2).map(|w| vec![position(&w[0]), position(&w[1])]).collect();
                let colors: Vec<Color> = f.trail_colors.iter().skip(1).map(|c| color(*c)).collect();
                let _ = rec.log("world/trail", &LineStrips3D::new(strips).with_colors(colors));
                let _ = rec.log("metrics/progress", &rerun::Scalar::new(f.progress));
            }
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_frame(&self, _frame: &FrameGeometry) {}

    /// Logs a text annotation (e.g., a phase change).
    #[cfg(feature = "visualization")]
    pub fn log_event(&self, path: &str, message: &str) {
        if let Some(ref rec) = self.rec {
            let _ = rec.log(path, &rerun::TextLog::new(message));
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_event(&self, _path: &str, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SweepConfig;
    use crate::scenarios::Scene;
    use crate::sweep::SweepScene;

    #[test]
    fn test_disabled_logger() {
        let logger = RerunLogger::disabled();
        assert!(!logger.is_enabled());

        // These should be no-ops
        let mut scene = SweepScene::new(&SweepConfig::default()).unwrap();
        logger.set_time(1.0);
        logger.log_statics(&scene.static_geometry());
        logger.log_frame(&scene.frame(1.0).unwrap());
        logger.log_event("events", "sweep");
    }
}
