//! Rate functions: normalized animation time to eased progress.

use serde::{Deserialize, Serialize};

/// Inflection of the sigmoid used by [`RateFunction::Smooth`].
const SMOOTH_INFLECTION: f64 = 10.0;

/// Easing applied to a normalized time `α ∈ [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateFunction {
    /// Identity.
    Linear,
    /// Rescaled logistic curve, flat at both ends.
    Smooth,
}

impl RateFunction {
    /// Evaluates the easing. Input is clamped to `[0, 1]`.
    pub fn apply(self, alpha: f64) -> f64 {
        let alpha = alpha.clamp(0.0, 1.0);
        match self {
            RateFunction::Linear => alpha,
            RateFunction::Smooth => smooth(alpha),
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn smooth(alpha: f64) -> f64 {
    let error = sigmoid(-SMOOTH_INFLECTION / 2.0);
    let raw = (sigmoid(SMOOTH_INFLECTION * (alpha - 0.5)) - error) / (1.0 - 2.0 * error);
    raw.clamp(0.0, 1.0)
}

/// Scalar linear interpolation.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}
