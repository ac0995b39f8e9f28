//! Blue-to-green sweep scene.
//!
//! Progress runs linearly from 0 to 1, then the finished state is held. The
//! dot, its color and its trail are all recomputed from progress each frame.

use nalgebra::Point3;
use plotcam_core::path::{trace, SmoothPath, STATIC_TRACE_SAMPLES};
use plotcam_core::progress::clamp_progress;
use plotcam_core::{ColorSweep, EllipseLoop, ProgressState, RateFunction, Rgb};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{RenderConfig, SweepConfig};
use crate::error::SceneError;
use crate::exporter::{FrameGeometry, SceneStatics};
use crate::scenarios::{Scene, SceneId};
use crate::timeline::{phase_fraction, Timeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepPhase {
    Sweep,
    Hold,
}

impl SweepPhase {
    pub fn name(&self) -> &'static str {
        match self {
            SweepPhase::Sweep => "sweep",
            SweepPhase::Hold => "hold",
        }
    }
}

/// Geometry computed once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepStatics {
    pub curve: EllipseLoop,
    /// The loop itself, drawn under the trail.
    pub base: SmoothPath,
    pub from: Rgb,
    pub to: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepFrame {
    pub phase: SweepPhase,
    pub progress: f64,
    /// Set once progress has reached 1; nothing moves afterwards.
    pub frozen: bool,
    pub position: Point3<f64>,
    pub color: Rgb,
    pub trail: SmoothPath,
    pub trail_colors: Vec<Rgb>,
}

pub struct SweepScene {
    config: SweepConfig,
    timeline: Timeline<SweepPhase>,
    sweep: ColorSweep<EllipseLoop>,
    state: ProgressState,
    statics: SweepStatics,
}

impl SweepScene {
    pub fn new(config: &SweepConfig) -> Result<Self, SceneError> {
        let curve = EllipseLoop {
            semi_x: config.semi_x,
            semi_y: config.semi_y,
        };
        let base = trace(&curve, STATIC_TRACE_SAMPLES, |p| *p)?;
        debug!("sweep loop {}x{}, {} -> {}", curve.semi_x, curve.semi_y, config.from, config.to);

        Ok(Self {
            config: *config,
            timeline: Timeline::new(vec![
                (SweepPhase::Sweep, config.run_time),
                (SweepPhase::Hold, config.hold),
            ]),
            sweep: ColorSweep::new(curve, config.from, config.to),
            state: ProgressState::default(),
            statics: SweepStatics {
                curve,
                base,
                from: config.from,
                to: config.to,
            },
        })
    }

    pub fn statics(&self) -> &SweepStatics {
        &self.statics
    }

    /// Frame at `time`. Times must not decrease between calls.
    pub fn frame_at(&mut self, time: f64) -> Result<SweepFrame, SceneError> {
        let (phase, elapsed) = self
            .timeline
            .locate(time)
            .ok_or(SceneError::EmptyTimeline(SceneId::BlueToGreen.name()))?;
        let target = match phase {
            SweepPhase::Sweep => {
                RateFunction::Linear.apply(phase_fraction(elapsed, self.config.run_time))
            }
            SweepPhase::Hold => 1.0,
        };
        let progress = self.state.advance_to(clamp_progress(target)?)?;
        let sample = self.sweep.sample(progress)?;

        Ok(SweepFrame {
            phase,
            progress,
            frozen: self.state.is_frozen(),
            position: sample.position,
            color: sample.color,
            trail: sample.trail,
            trail_colors: sample.trail_colors,
        })
    }
}

impl Scene for SweepScene {
    fn id(&self) -> SceneId {
        SceneId::BlueToGreen
    }

    fn duration(&self) -> f64 {
        self.timeline.duration()
    }

    fn render(&self) -> RenderConfig {
        self.config.render
    }

    fn static_geometry(&self) -> SceneStatics {
        SceneStatics::Sweep(self.statics.clone())
    }

    fn frame(&mut self, time: f64) -> Result<FrameGeometry, SceneError> {
        self.frame_at(time).map(FrameGeometry::Sweep)
    }

    fn verify(&self, last: &FrameGeometry) -> Option<String> {
        match last {
            FrameGeometry::Sweep(frame) if frame.progress != 1.0 => {
                Some(format!("sweep ended at progress {}", frame.progress))
            }
            FrameGeometry::Sweep(frame) if frame.color != self.config.to => {
                Some(format!("sweep ended on {} instead of {}", frame.color, self.config.to))
            }
            FrameGeometry::Sweep(_) => None,
            _ => Some("unexpected frame kind".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use plotcam_core::color::{BLUE, GREEN};

    fn scene() -> SweepScene {
        SweepScene::new(&SweepConfig::default()).unwrap()
    }

    #[test]
    fn test_start_and_midpoint() {
        let mut s = scene();
        let first = s.frame_at(0.0).unwrap();
        assert_eq!(first.progress, 0.0);
        assert_eq!(first.color, BLUE);
        assert_relative_eq!(first.position, Point3::new(3.0, 0.0, 0.0), epsilon = 1e-12);
        assert_eq!(first.trail.anchors().len(), 2);

        let half = s.frame_at(2.0).unwrap();
        assert_relative_eq!(half.position, Point3::new(-3.0, 0.0, 0.0), epsilon = 1e-9);
        assert_eq!(half.trail_colors.first(), Some(&BLUE));
        assert_eq!(half.trail_colors.last(), Some(&GREEN));
    }

    #[test]
    fn test_freezes_at_one() {
        let mut s = scene();
        let end = s.frame_at(4.0).unwrap();
        assert_eq!(end.progress, 1.0);
        assert!(end.frozen);
        assert_eq!(end.color, GREEN);

        let held = s.frame_at(4.5).unwrap();
        assert_eq!(held.phase, SweepPhase::Hold);
        assert_eq!(held.position, end.position);
        assert_eq!(held.trail, end.trail);
    }

    #[test]
    fn test_time_runs_forward() {
        let mut s = scene();
        s.frame_at(2.0).unwrap();
        assert!(s.frame_at(1.0).is_err());
    }

    #[test]
    fn test_base_loop_closed() {
        let s = scene();
        let base = &s.statics().base;
        assert_relative_eq!(base.start(), base.end(), epsilon = 1e-9);
    }
}
