//! JSON frame export for external renderers.
//!
//! One document per scene run: the render settings, the static geometry and
//! one record per frame.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

use crate::config::RenderConfig;
use crate::error::SceneError;
use crate::hparam::{HparamFrame, HparamStatics};
use crate::scenarios::SceneId;
use crate::sweep::{SweepFrame, SweepStatics};

/// Geometry that does not change between frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneStatics {
    Hparam(HparamStatics),
    Sweep(SweepStatics),
}

/// Per-frame geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameGeometry {
    Hparam(HparamFrame),
    Sweep(SweepFrame),
}

/// A single frame of scene data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFrame {
    pub index: u64,

    /// Scene time in seconds
    pub time_sec: f64,

    pub geometry: FrameGeometry,
}

/// Complete scene export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneExport {
    /// Scene name
    pub scene: String,

    pub render: RenderConfig,

    /// Duration in seconds
    pub duration_sec: f64,

    pub statics: SceneStatics,

    /// All frames
    pub frames: Vec<SceneFrame>,

    /// Final checks passed
    pub passed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl SceneExport {
    /// Creates a new export container.
    pub fn new(scene: SceneId, render: RenderConfig, statics: SceneStatics) -> Self {
        Self {
            scene: scene.name().to_string(),
            render,
            duration_sec: 0.0,
            statics,
            frames: Vec::new(),
            passed: false,
            failure_reason: None,
        }
    }

    /// Adds a frame.
    pub fn add_frame(&mut self, frame: SceneFrame) {
        self.duration_sec = frame.time_sec;
        self.frames.push(frame);
    }

    /// Finalizes the export.
    pub fn finalize(&mut self, failure_reason: Option<String>) {
        self.passed = failure_reason.is_none();
        self.failure_reason = failure_reason;
    }

    pub fn last_frame(&self) -> Option<&SceneFrame> {
        self.frames.last()
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> Result<(), SceneError> {
        let json = self.to_json()?;
        let export_err = |source| SceneError::Export {
            path: path.to_string(),
            source,
        };
        let mut file = File::create(path).map_err(export_err)?;
        file.write_all(json.as_bytes()).map_err(export_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SweepConfig;
    use crate::scenarios::Scene;
    use crate::sweep::SweepScene;

    #[test]
    fn test_export_json_shape() {
        let config = SweepConfig::default();
        let mut scene = SweepScene::new(&config).unwrap();
        let mut export =
            SceneExport::new(SceneId::BlueToGreen, config.render, scene.static_geometry());
        for (index, time) in [0.0, 1.0].into_iter().enumerate() {
            export.add_frame(SceneFrame {
                index: index as u64,
                time_sec: time,
                geometry: scene.frame(time).unwrap(),
            });
        }
        export.finalize(None);

        let value: serde_json::Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();
        assert_eq!(value["scene"], "blue_to_green");
        assert_eq!(value["render"]["background"], "#000000");
        assert_eq!(value["statics"]["kind"], "sweep");
        assert_eq!(value["frames"][1]["geometry"]["kind"], "sweep");
        assert_eq!(value["frames"][0]["geometry"]["color"], "#58C4DD");
        assert_eq!(value["duration_sec"], 1.0);
        assert!(value.get("failure_reason").is_none());

        let back: SceneExport = serde_json::from_str(&export.to_json().unwrap()).unwrap();
        assert_eq!(back.frames.len(), 2);
        assert!(back.passed);
    }

    #[test]
    fn test_write_to_bad_path() {
        let config = SweepConfig::default();
        let scene = SweepScene::new(&config).unwrap();
        let export = SceneExport::new(SceneId::BlueToGreen, config.render, scene.static_geometry());
        let err = export.write_to_file("/nonexistent/dir/out.json").unwrap_err();
        assert!(matches!(err, SceneError::Export { .. }));
    }
}
