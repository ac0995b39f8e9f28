//! Scene and render configuration.
//!
//! Defaults reproduce the two scenes exactly; a JSON file may override any
//! subset of fields.

use plotcam_core::color::{Rgb, BLACK, BLUE, GREEN, WHITE};
use plotcam_core::guides::MAX_DASHES;
use plotcam_core::ReprojectionParams;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Shortest dash a guide may use, in world units.
pub const MIN_DASH_LENGTH: f64 = 0.01;

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }
}

/// Output surface handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Frames per second of the virtual clock.
    pub fps: u32,
    pub background: Rgb,
}

impl RenderConfig {
    /// Portrait 640x1080 on white.
    pub const HPARAM: RenderConfig = RenderConfig {
        width: 640,
        height: 1080,
        fps: 30,
        background: WHITE,
    };

    /// Landscape 1280x720 on black.
    pub const SWEEP: RenderConfig = RenderConfig {
        width: 1280,
        height: 720,
        fps: 30,
        background: BLACK,
    };

    fn validate(&self, scene: &str) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::invalid(format!("{scene}: fps must be positive")));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::invalid(format!(
                "{scene}: resolution {}x{} is empty",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Render settings as written in a config file; absent fields keep the
/// scene's own default.
#[derive(Debug, Deserialize)]
struct RenderOverride {
    width: Option<u32>,
    height: Option<u32>,
    fps: Option<u32>,
    background: Option<Rgb>,
}

impl RenderOverride {
    fn apply(self, base: RenderConfig) -> RenderConfig {
        RenderConfig {
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            fps: self.fps.unwrap_or(base.fps),
            background: self.background.unwrap_or(base.background),
        }
    }
}

fn hparam_render<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RenderConfig, D::Error> {
    Ok(RenderOverride::deserialize(deserializer)?.apply(RenderConfig::HPARAM))
}

fn sweep_render<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RenderConfig, D::Error> {
    Ok(RenderOverride::deserialize(deserializer)?.apply(RenderConfig::SWEEP))
}

/// Phase durations of the hyperparameter scene, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HparamTiming {
    /// Title, axes and axis labels.
    pub setup: f64,
    /// Dot fade-in and the start guides.
    pub start_guides: f64,
    /// The dot travelling along the curve.
    pub trace: f64,
    /// Frozen end state, including the title change.
    pub hold: f64,
    pub camera_move: f64,
    /// Fading the 3D scaffolding and drawing the plotting frame.
    pub reproject: f64,
}

impl Default for HparamTiming {
    fn default() -> Self {
        Self {
            setup: 2.6,
            start_guides: 1.8,
            trace: 4.0,
            hold: 7.2,
            camera_move: 1.6,
            reproject: 5.6,
        }
    }
}

impl HparamTiming {
    pub fn total(&self) -> f64 {
        self.setup + self.start_guides + self.trace + self.hold + self.camera_move + self.reproject
    }
}

/// Hyperparameter-estimation scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HparamConfig {
    pub camera_phi_deg: f64,
    pub camera_theta_deg: f64,
    pub t_start: f64,
    pub t_end: f64,
    /// World length of every scene axis.
    pub axis_length: f64,
    pub range_margin: f64,
    /// How far the plot is pushed down screen, once at construction and
    /// again during the camera move.
    pub drop_distance: f64,
    pub start_dash_length: f64,
    pub live_dash_length: f64,
    pub frozen_dash_count: usize,
    pub reprojection: ReprojectionParams,
    pub timing: HparamTiming,
    #[serde(deserialize_with = "hparam_render")]
    pub render: RenderConfig,
}

impl Default for HparamConfig {
    fn default() -> Self {
        Self {
            camera_phi_deg: 65.0,
            camera_theta_deg: 30.0,
            t_start: 1.0,
            t_end: 2.0,
            axis_length: 7.0,
            range_margin: 0.2,
            drop_distance: 6.0,
            start_dash_length: 0.18,
            live_dash_length: 0.16,
            frozen_dash_count: 21,
            reprojection: ReprojectionParams::default(),
            timing: HparamTiming::default(),
            render: RenderConfig::HPARAM,
        }
    }
}

/// Blue-to-green sweep scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub semi_x: f64,
    pub semi_y: f64,
    pub from: Rgb,
    pub to: Rgb,
    /// Seconds for progress to run from 0 to 1.
    pub run_time: f64,
    /// Seconds the finished state is held.
    pub hold: f64,
    #[serde(deserialize_with = "sweep_render")]
    pub render: RenderConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            semi_x: 3.0,
            semi_y: 2.0,
            from: BLUE,
            to: GREEN,
            run_time: 4.0,
            hold: 0.5,
            render: RenderConfig::SWEEP,
        }
    }
}

/// Configuration for both scenes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub hparam: HparamConfig,
    pub sweep: SweepConfig,
}

impl SceneConfig {
    /// Parses a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Overrides the frame rate of both scenes.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.hparam.render.fps = fps;
        self.sweep.render.fps = fps;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.hparam.render.validate("hparam")?;
        self.sweep.render.validate("sweep")?;

        let h = &self.hparam;
        if !(h.t_start > 0.0 && h.t_end > h.t_start) {
            return Err(ConfigError::invalid(format!(
                "hparam: curve domain [{}, {}] must be positive and non-empty",
                h.t_start, h.t_end
            )));
        }
        if !(h.axis_length > 0.0) {
            return Err(ConfigError::invalid("hparam: axis_length must be positive"));
        }
        if !(h.start_dash_length >= MIN_DASH_LENGTH && h.live_dash_length >= MIN_DASH_LENGTH) {
            return Err(ConfigError::invalid(format!(
                "hparam: dash lengths must be at least {MIN_DASH_LENGTH}"
            )));
        }
        if h.frozen_dash_count == 0 || h.frozen_dash_count > MAX_DASHES {
            return Err(ConfigError::invalid(format!(
                "hparam: frozen_dash_count must be in 1..={MAX_DASHES}"
            )));
        }
        let t = &h.timing;
        let phases = [t.setup, t.start_guides, t.trace, t.hold, t.camera_move, t.reproject];
        if phases.iter().any(|d| !(*d >= 0.0)) {
            return Err(ConfigError::invalid("hparam: phase durations must be non-negative"));
        }

        let s = &self.sweep;
        if !(s.semi_x > 0.0 && s.semi_y > 0.0) {
            return Err(ConfigError::invalid("sweep: loop semi-axes must be positive"));
        }
        if !(s.run_time > 0.0) || !(s.hold >= 0.0) {
            return Err(ConfigError::invalid(
                "sweep: run_time must be positive and hold non-negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = SceneConfig::default();
        config.validate().unwrap();
        assert_eq!(config.hparam.render.background, WHITE);
        assert_eq!(config.sweep.render.width, 1280);
        assert!((config.hparam.timing.total() - 22.8).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SceneConfig::from_json(
            r##"{
                "sweep": { "run_time": 2.0, "to": "#FFFFFF" },
                "hparam": {
                    "render": { "width": 800, "height": 600, "fps": 24, "background": "#000000" }
                }
            }"##,
        )
        .unwrap();
        assert_eq!(config.sweep.run_time, 2.0);
        assert_eq!(config.sweep.to, WHITE);
        assert_eq!(config.sweep.from, BLUE);
        assert_eq!(config.hparam.render.fps, 24);
        assert_eq!(config.hparam.camera_phi_deg, 65.0);
    }

    #[test]
    fn test_partial_nested_overrides() {
        let config = SceneConfig::from_json(r#"{ "sweep": { "render": { "fps": 24 } } }"#).unwrap();
        assert_eq!(config.sweep.render.fps, 24);
        assert_eq!(config.sweep.render.width, 1280);
        assert_eq!(config.sweep.render.background, BLACK);
        assert_eq!(config.hparam.render, RenderConfig::HPARAM);

        let config =
            SceneConfig::from_json(r#"{ "hparam": { "render": { "height": 900 } } }"#).unwrap();
        assert_eq!(config.hparam.render.height, 900);
        assert_eq!(config.hparam.render.width, 640);
        assert_eq!(config.hparam.render.background, WHITE);

        let json = r#"{ "hparam": { "reprojection": { "left_margin": 0.1 } } }"#;
        let config = SceneConfig::from_json(json).unwrap();
        assert_eq!(config.hparam.reprojection.left_margin, 0.1);
        assert_eq!(config.hparam.reprojection.x_padding, ReprojectionParams::default().x_padding);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = SceneConfig::from_json(r#"{ "sweep": { "run_time": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = SceneConfig::from_json(r##"{ "sweep": { "from": "#12" } }"##).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        assert!(SceneConfig::default().with_fps(0).validate().is_err());
    }

    #[test]
    fn test_rejects_tiny_dashes() {
        let mut config = SceneConfig::default();
        config.hparam.start_dash_length = 1e-300;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = SceneConfig::default();
        config.hparam.live_dash_length = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.hparam.frozen_dash_count = usize::MAX;
        assert!(config.validate().is_err());

        config.hparam.frozen_dash_count = 21;
        config.hparam.start_dash_length = MIN_DASH_LENGTH;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file() {
        let err = SceneConfig::load("/nonexistent/plotcam.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
