//! rare_events::errors — validation failures of the closed-form statistics
//! and tilting wrappers, plus passthrough of the layers they drive.
use std::fmt;

use crate::{paths::errors::PathError, variational::errors::VIError};

/// Result alias for rare-event glue.
pub type RareResult<T> = Result<T, RareEventError>;

#[derive(Debug, Clone, PartialEq)]
pub enum RareEventError {
    // ---- Inputs ----
    /// Two inputs that must align have different shapes.
    ShapeMismatch { what: &'static str, expected: Vec<usize>, found: Vec<usize> },
    /// An input that needs at least one entry is empty.
    EmptyInput { what: &'static str },
    /// A NaN or infinite entry in an input that must be finite.
    NonFiniteInput { what: &'static str, index: usize, value: f64 },
    /// Noise temperature ε must be finite and positive.
    InvalidTemperature { eps: f64 },
    /// Time step must be finite and positive.
    InvalidDt { dt: f64 },

    // ---- Layers ----
    /// Probability-vector or fitting failure.
    Variational(VIError),
    /// Path-solver failure.
    Path(PathError),
}

impl std::error::Error for RareEventError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RareEventError::Variational(e) => Some(e),
            RareEventError::Path(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for RareEventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RareEventError::ShapeMismatch { what, expected, found } => {
                write!(f, "Shape mismatch in {what}: expected {expected:?}, found {found:?}")
            }
            RareEventError::EmptyInput { what } => write!(f, "{what} must not be empty"),
            RareEventError::NonFiniteInput { what, index, value } => {
                write!(f, "{what} entry {index} is not finite: {value}")
            }
            RareEventError::InvalidTemperature { eps } => {
                write!(f, "Noise temperature must be finite and > 0, got {eps}")
            }
            RareEventError::InvalidDt { dt } => {
                write!(f, "Time step dt must be finite and > 0, got {dt}")
            }
            RareEventError::Variational(e) => write!(f, "{e}"),
            RareEventError::Path(e) => write!(f, "{e}"),
        }
    }
}

impl From<VIError> for RareEventError {
    fn from(err: VIError) -> Self {
        RareEventError::Variational(err)
    }
}

impl From<PathError> for RareEventError {
    fn from(err: PathError) -> Self {
        RareEventError::Path(err)
    }
}
