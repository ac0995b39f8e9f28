//! Scene runner - plays a scene frame by frame on the virtual clock.

use tracing::{debug, info};

use crate::clock::FrameClock;
use crate::config::SceneConfig;
use crate::error::SceneError;
use crate::exporter::{FrameGeometry, SceneExport, SceneFrame};
use crate::hparam::HparamScene;
use crate::scenarios::{Scene, SceneId};
use crate::sweep::SweepScene;
use crate::visualizer::RerunLogger;

/// Results from running a scene.
#[derive(Debug, Clone)]
pub struct SceneResult {
    /// Scene that was run
    pub scene: SceneId,

    /// Whether playback finished and the final checks held
    pub passed: bool,

    /// Frames produced
    pub total_frames: u64,

    /// Scene time of the last frame in seconds
    pub final_time_secs: f64,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Everything that was played, when playback got that far
    pub export: Option<SceneExport>,
}

/// Plays scenes.
pub struct SceneRunner {
    config: SceneConfig,
    logger: RerunLogger,
}

impl SceneRunner {
    /// Creates a new scene runner.
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            logger: RerunLogger::disabled(),
        }
    }

    /// Overrides the frame rate of every scene.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.config = self.config.with_fps(fps);
        self
    }

    /// Sets the visualization logger.
    pub fn with_logger(mut self, logger: RerunLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Builds the script for `scene` from the current config.
    pub fn build(&self, scene: SceneId) -> Result<Box<dyn Scene>, SceneError> {
        self.config.validate()?;
        Ok(match scene {
            SceneId::HparamEstimation => Box::new(HparamScene::new(&self.config.hparam)?),
            SceneId::BlueToGreen => Box::new(SweepScene::new(&self.config.sweep)?),
        })
    }

    /// Plays `scene` to the end and returns every frame.
    pub fn play(&self, scene: SceneId) -> Result<SceneExport, SceneError> {
        let mut script = self.build(scene)?;
        let render = script.render();
        let duration = script.duration();
        let mut clock = FrameClock::new(render.fps);
        let total = clock.frame_count(duration);
        info!(
            "Starting scene: {} ({}x{} @ {} fps, {:.2}s, {} frames)",
            scene.name(),
            render.width,
            render.height,
            render.fps,
            duration,
            total
        );

        let statics = script.static_geometry();
        self.logger.log_statics(&statics);
        let mut export = SceneExport::new(scene, render, statics);

        let mut last_phase = None;
        for _ in 0..total {
            let time = clock.time_secs().min(duration);
            let geometry = script.frame(time)?;

            let phase = phase_name(&geometry);
            if last_phase != Some(phase) {
                debug!("  t={:.2}s | phase={}", time, phase);
                self.logger.set_time(time);
                self.logger.log_event("events", phase);
                last_phase = Some(phase);
            }
            self.logger.set_time(time);
            self.logger.log_frame(&geometry);

            export.add_frame(SceneFrame {
                index: clock.frame(),
                time_sec: time,
                geometry,
            });
            clock.tick();
        }

        let failure = match export.last_frame() {
            Some(frame) => script.verify(&frame.geometry),
            None => Some("no frames produced".to_string()),
        };
        export.finalize(failure);
        Ok(export)
    }

    /// Runs a scene and returns the result.
    pub fn run(&self, scene: SceneId) -> SceneResult {
        match self.play(scene) {
            Ok(export) => SceneResult {
                scene,
                passed: export.passed,
                total_frames: export.frames.len() as u64,
                final_time_secs: export.duration_sec,
                failure_reason: export.failure_reason.clone(),
                export: Some(export),
            },
            Err(e) => SceneResult {
                scene,
                passed: false,
                total_frames: 0,
                final_time_secs: 0.0,
                failure_reason: Some(e.to_string()),
                export: None,
            },
        }
    }
}

fn phase_name(geometry: &FrameGeometry) -> &'static str {
    match geometry {
        FrameGeometry::Hparam(f) => f.phase.name(),
        FrameGeometry::Sweep(f) => f.phase.name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotcam_core::color::GREEN;

    #[test]
    fn test_blue_to_green_run() {
        let result = SceneRunner::new(SceneConfig::default()).run(SceneId::BlueToGreen);
        assert!(result.passed, "{:?}", result.failure_reason);
        // 4.5 s at 30 fps, both ends included
        assert_eq!(result.total_frames, 136);
        assert_eq!(result.final_time_secs, 4.5);

        let export = result.export.unwrap();
        let FrameGeometry::Sweep(last) = &export.last_frame().unwrap().geometry else {
            panic!("expected a sweep frame");
        };
        assert_eq!(last.progress, 1.0);
        assert_eq!(last.color, GREEN);

        // progress never decreases
        let progress: Vec<f64> = export
            .frames
            .iter()
            .filter_map(|f| match &f.geometry {
                FrameGeometry::Sweep(s) => Some(s.progress),
                _ => None,
            })
            .collect();
        assert!(progress.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_hparam_run() {
        let runner = SceneRunner::new(SceneConfig::default());
        let result = runner.run(SceneId::HparamEstimation);
        assert!(result.passed, "{:?}", result.failure_reason);
        let expected = FrameClock::new(30).frame_count(runner.config().hparam.timing.total());
        assert_eq!(result.total_frames, expected);
    }

    #[test]
    fn test_fps_override() {
        let result = SceneRunner::new(SceneConfig::default())
            .with_fps(10)
            .run(SceneId::BlueToGreen);
        assert_eq!(result.total_frames, 46);
        assert_eq!(result.export.unwrap().render.fps, 10);
    }

    #[test]
    fn test_invalid_config_fails() {
        let result = SceneRunner::new(SceneConfig::default())
            .with_fps(0)
            .run(SceneId::BlueToGreen);
        assert!(!result.passed);
        assert!(result.export.is_none());
        assert!(result.failure_reason.unwrap().contains("fps"));
    }

    #[test]
    fn test_tiny_dash_length_fails_cleanly() {
        let mut config = SceneConfig::default();
        config.hparam.start_dash_length = 1e-300;
        let result = SceneRunner::new(config).run(SceneId::HparamEstimation);
        assert!(!result.passed);
        assert!(result.failure_reason.unwrap().contains("dash"));
    }
}
