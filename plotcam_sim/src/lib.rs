//! plotcam scene driver
//!
//! Plays the plotcam scenes frame by frame on a virtual clock and hands the
//! geometry to a renderer.
//!
//! # Core Principle: Pure Frames
//!
//! The geometry library never keeps state between frames. The driver owns the
//! only mutable pieces (the clock, the sweep progress) and re-invokes the
//! geometry functions for every timestamp:
//! - **Time**: frame `k` is at `k / fps` seconds, clamped to the scene length
//! - **Camera**: the pose is a pure function of scene time
//! - **Progress**: monotone, frozen once it reaches 1
//!
//! # Architecture
//!
//! ```text
//! SceneConfig ──► SceneRunner ──► Box<dyn Scene> (HparamScene | SweepScene)
//!                     │                 │
//!                 FrameClock      plotcam_core geometry
//!                     │                 │
//!                     ▼                 ▼
//!               SceneExport (JSON)   RerunLogger (optional)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use plotcam_sim::{SceneConfig, SceneRunner, SceneId};
//!
//! let result = SceneRunner::new(SceneConfig::default())
//!     .with_fps(30)
//!     .run(SceneId::BlueToGreen);
//! assert!(result.passed);
//! ```

mod clock;
pub mod config;
mod error;
pub mod exporter;
pub mod hparam;
mod runner;
pub mod scenarios;
pub mod sweep;
mod timeline;
mod visualizer;

pub use clock::FrameClock;
pub use config::{ConfigError, HparamConfig, RenderConfig, SceneConfig, SweepConfig};
pub use error::SceneError;
pub use exporter::{FrameGeometry, SceneExport, SceneFrame, SceneStatics};
pub use runner::{SceneResult, SceneRunner};
pub use scenarios::{Scene, SceneId};
pub use timeline::Timeline;
pub use visualizer::RerunLogger;
