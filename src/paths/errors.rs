//! paths::errors — validation errors for action evaluation and path search.
//!
//! Every failure here is a configuration or input problem detected before
//! any iteration runs, or a drift evaluation whose output cannot be
//! interpreted. Non-finite values produced by the drift at interior points
//! are not errors; they propagate into the path and the action.
use std::fmt;

/// Result alias for path and action operations.
pub type ActionResult<T> = Result<T, PathError>;

#[derive(Debug, Clone, PartialEq)]
pub enum PathError {
    // ---- Discretization ----
    /// Time step must be finite and strictly positive.
    InvalidDt { dt: f64 },
    /// Descent step size must be finite and strictly positive.
    InvalidStepsize { stepsize: f64 },
    /// Path search needs at least one interior point (`T > 2`).
    TooFewPoints { n_points: usize },
    /// Action evaluation needs at least one increment.
    PathTooShort { rows: usize },
    /// `log_every` must be at least one.
    InvalidLogEvery,

    // ---- Geometry ----
    /// Boundary points or grid rows must share one dimension `d ≥ 1`.
    DimensionMismatch { expected: usize, found: usize },
    /// State space dimension must be at least one.
    EmptyState,
    /// A boundary point, path, or grid entry is NaN or infinite.
    NonFiniteInput { row: usize, col: usize, value: f64 },

    // ---- Drift ----
    /// Drift returned neither a scalar nor a d-vector.
    DriftLengthMismatch { expected: usize, found: usize },
}

impl std::error::Error for PathError {}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::InvalidDt { dt } => {
                write!(f, "Time step dt must be finite and > 0, got {dt}")
            }
            PathError::InvalidStepsize { stepsize } => {
                write!(f, "Step size must be finite and > 0, got {stepsize}")
            }
            PathError::TooFewPoints { n_points } => {
                write!(f, "Path needs more than 2 points, got {n_points}")
            }
            PathError::PathTooShort { rows } => {
                write!(f, "Action needs a path with at least 2 points, got {rows}")
            }
            PathError::InvalidLogEvery => write!(f, "log_every must be at least 1"),
            PathError::DimensionMismatch { expected, found } => {
                write!(f, "State dimension mismatch: expected {expected}, found {found}")
            }
            PathError::EmptyState => write!(f, "State dimension must be at least 1"),
            PathError::NonFiniteInput { row, col, value } => {
                write!(f, "Path input at ({row}, {col}) is not finite: {value}")
            }
            PathError::DriftLengthMismatch { expected, found } => {
                write!(f, "Drift returned {found} components; expected 1 or {expected}")
            }
        }
    }
}
