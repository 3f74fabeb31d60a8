//! flows::errors — configuration and input errors for flow models.
//!
//! Purpose
//! -------
//! Report every way a flow can be mis-specified (wrong parameter count,
//! invalid structure, bad fixed scalars) or mis-used (wrong column count,
//! non-finite base draws) through one enum with a result alias.
//!
//! Conventions
//! -----------
//! - Construction errors name the variant and the expected count so the
//!   message is actionable without a debugger.
//! - Non-finite values produced *inside* a transform are not errors; they
//!   propagate into the outputs.
use std::fmt;

/// Result alias for flow operations.
pub type FlowResult<T> = Result<T, FlowError>;

/// Variant tag of a flow model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowKind {
    Planar,
    Radial,
    Autoregressive,
    Spline,
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowKind::Planar => "planar",
            FlowKind::Radial => "radial",
            FlowKind::Autoregressive => "autoregressive",
            FlowKind::Spline => "spline",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowError {
    // ---- Construction ----
    /// Parameter vector length does not match the variant's layout.
    ParamLengthMismatch { kind: FlowKind, expected: usize, found: usize },
    /// Dimension must be at least one.
    InvalidDimension { dim: usize, reason: &'static str },
    /// Number of steps or bins must be at least one.
    InvalidStructure { kind: FlowKind, count: usize, reason: &'static str },
    /// A parameter entry is NaN or infinite.
    NonFiniteParam { kind: FlowKind, index: usize, value: f64 },
    /// Radial flows require `α > 0`.
    NonPositiveAlpha { alpha: f64 },

    // ---- Usage ----
    /// Base draws have the wrong number of columns.
    ColumnMismatch { expected: usize, found: usize },
    /// Base draws contain a NaN or infinite entry.
    NonFiniteInput { row: usize, col: usize, value: f64 },
    /// Operation needs a trainable variant.
    NotTrainable { kind: FlowKind },
    /// Initial-θ scale must be finite and non-negative.
    InvalidScale { scale: f64 },
}

impl std::error::Error for FlowError {}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // ---- Construction ----
            FlowError::ParamLengthMismatch { kind, expected, found } => {
                write!(f, "{kind} flow expects {expected} parameters, got {found}")
            }
            FlowError::InvalidDimension { dim, reason } => {
                write!(f, "Invalid flow dimension {dim}: {reason}")
            }
            FlowError::InvalidStructure { kind, count, reason } => {
                write!(f, "Invalid {kind} flow structure ({count}): {reason}")
            }
            FlowError::NonFiniteParam { kind, index, value } => {
                write!(f, "{kind} flow parameter at index {index} is not finite: {value}")
            }
            FlowError::NonPositiveAlpha { alpha } => {
                write!(f, "Radial flow requires alpha > 0, got {alpha}")
            }

            // ---- Usage ----
            FlowError::ColumnMismatch { expected, found } => {
                write!(f, "Base draws have {found} columns, flow dimension is {expected}")
            }
            FlowError::NonFiniteInput { row, col, value } => {
                write!(f, "Base draw at ({row}, {col}) is not finite: {value}")
            }
            FlowError::NotTrainable { kind } => {
                write!(f, "{kind} flow has fixed parameters and cannot be trained")
            }
            FlowError::InvalidScale { scale } => {
                write!(f, "Initial parameter scale must be finite and non-negative, got {scale}")
            }
        }
    }
}
