//! Error types for plotcam geometry.
//!
//! Every variant is a caller contract violation on a pure function. Nothing
//! here is transient, so nothing is retried.

use thiserror::Error;

/// Errors raised by the geometry builders.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A basis could not be built (parallel or zero-length inputs).
    #[error("degenerate basis: {reason}")]
    DegenerateBasis {
        /// What collapsed.
        reason: String,
    },

    /// A parameter fell outside its closed domain.
    #[error("{what} out of range: {value} not in [{min}, {max}]")]
    OutOfRange {
        /// Name of the offending parameter.
        what: &'static str,
        /// The requested value.
        value: f64,
        /// Lower bound of the domain.
        min: f64,
        /// Upper bound of the domain.
        max: f64,
    },

    /// An axis range or length that cannot define an affine map.
    #[error("invalid axis: {reason}")]
    InvalidAxis {
        /// Why the axis was rejected.
        reason: String,
    },

    /// A color string that is not `#RRGGBB`.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Too few points to build a path.
    #[error("insufficient samples: need at least {required}, got {got}")]
    InsufficientSamples {
        /// Minimum number of samples.
        required: usize,
        /// Number supplied.
        got: usize,
    },
}

impl GeometryError {
    /// Creates a degenerate basis error.
    #[must_use]
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateBasis {
            reason: reason.into(),
        }
    }

    /// Creates an out-of-range error.
    #[must_use]
    pub const fn out_of_range(what: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            what,
            value,
            min,
            max,
        }
    }

    /// Creates an invalid axis error.
    #[must_use]
    pub fn invalid_axis(reason: impl Into<String>) -> Self {
        Self::InvalidAxis {
            reason: reason.into(),
        }
    }

    /// Returns true for the degenerate basis variant.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::DegenerateBasis { .. })
    }

    /// Returns true for the out-of-range variant.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Checks that `value` lies in `[min, max]`.
pub(crate) fn ensure_in_range(what: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
    if value.is_nan() || value < min || value > max {
        return Err(GeometryError::out_of_range(what, value, min, max));
    }
    Ok(value)
}
