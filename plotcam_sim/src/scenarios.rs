//! Scene identifiers and the scene script interface.

use crate::config::RenderConfig;
use crate::error::SceneError;
use crate::exporter::{FrameGeometry, SceneStatics};

/// The scenes the driver can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneId {
    /// Curve traced through 3D axes, camera swing, flat plotting frame
    HparamEstimation,

    /// Marker sweeping a loop while fading from blue to green
    BlueToGreen,
}

impl SceneId {
    /// Returns a list of all scenes.
    pub fn all() -> Vec<SceneId> {
        vec![SceneId::HparamEstimation, SceneId::BlueToGreen]
    }

    /// Returns the scene name.
    pub fn name(&self) -> &'static str {
        match self {
            SceneId::HparamEstimation => "hparam_estimation",
            SceneId::BlueToGreen => "blue_to_green",
        }
    }

    /// Returns a description of the scene.
    pub fn description(&self) -> &'static str {
        match self {
            SceneId::HparamEstimation => {
                "Budget curve in 3D with projection guides, then a side-on camera move \
                 and a reprojected 2D frame"
            }
            SceneId::BlueToGreen => {
                "Dot around an ellipse leaving a growing trail, color interpolated BLUE -> GREEN"
            }
        }
    }
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for SceneId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hparam_estimation" | "hparamestimation3d" | "hparam" => Ok(SceneId::HparamEstimation),
            "blue_to_green" | "bluetogreensinglepath" | "bluegreen" => Ok(SceneId::BlueToGreen),
            _ => Err(format!("Unknown scene: {}", s)),
        }
    }
}

/// A scene script: static geometry plus a frame function over scene time.
pub trait Scene {
    fn id(&self) -> SceneId;

    /// Total length in seconds.
    fn duration(&self) -> f64;

    fn render(&self) -> RenderConfig;

    fn static_geometry(&self) -> SceneStatics;

    /// Geometry at `time` seconds. Callers pass non-decreasing times.
    fn frame(&mut self, time: f64) -> Result<FrameGeometry, SceneError>;

    /// Checks the last frame of a run, returning the first problem found.
    fn verify(&self, last: &FrameGeometry) -> Option<String>;
}
