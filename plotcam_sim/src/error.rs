//! Errors raised while playing or exporting a scene.

use plotcam_core::GeometryError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("scene {0} has no phases")]
    EmptyTimeline(&'static str),

    #[error("failed to write export {path}: {source}")]
    Export {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}
