//! variational::errors — error surface of ELBO estimation and fitting.
//!
//! Purpose
//! -------
//! Report invalid probability inputs, category-count mismatches, invalid
//! Monte Carlo settings, and failures bubbling up from the flow and
//! optimizer layers through one enum.
//!
//! Conventions
//! -----------
//! - `FlowError` and `OptError` are wrapped, not flattened, so callers can
//!   still match on the original variant.
//! - A non-zero optimizer status is **not** an error; it is surfaced in
//!   `FitResult::convergence`.
use std::fmt;

use crate::{flows::errors::FlowError, optimization::errors::OptError};

/// Result alias for variational operations.
pub type VIResult<T> = Result<T, VIError>;

#[derive(Debug, Clone, PartialEq)]
pub enum VIError {
    // ---- Probability inputs ----
    /// A probability vector has no entries.
    EmptyDistribution { what: &'static str },
    /// A probability entry is negative or non-finite.
    InvalidProbability { what: &'static str, index: usize, value: f64 },
    /// A probability vector does not sum to one within tolerance.
    NotNormalized { what: &'static str, sum: f64 },
    /// Likelihood returned a pmf with a different number of categories.
    CategoryMismatch { expected: usize, found: usize },

    // ---- Configuration ----
    /// Number of Monte Carlo draws must be positive.
    InvalidNmc { nmc: usize },
    /// Starting parameters contain a non-finite entry.
    InvalidTheta0 { index: usize, value: f64 },
    /// The ELBO estimate is NaN or infinite.
    NonFiniteElbo { value: f64 },

    // ---- Wrapped ----
    Flow(FlowError),
    Opt(OptError),
}

impl std::error::Error for VIError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VIError::Flow(e) => Some(e),
            VIError::Opt(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for VIError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VIError::EmptyDistribution { what } => write!(f, "{what} distribution is empty"),
            VIError::InvalidProbability { what, index, value } => write!(
                f,
                "{what} probability at index {index} is {value}, must be finite and non-negative"
            ),
            VIError::NotNormalized { what, sum } => {
                write!(f, "{what} probabilities sum to {sum}, expected 1")
            }
            VIError::CategoryMismatch { expected, found } => write!(
                f,
                "Likelihood returned {found} categories, observed distribution has {expected}"
            ),
            VIError::InvalidNmc { nmc } => {
                write!(f, "Number of Monte Carlo draws must be positive, got {nmc}")
            }
            VIError::InvalidTheta0 { index, value } => {
                write!(f, "Initial parameter at index {index} is not finite: {value}")
            }
            VIError::NonFiniteElbo { value } => write!(f, "ELBO estimate is not finite: {value}"),
            VIError::Flow(e) => write!(f, "Flow error: {e}"),
            VIError::Opt(e) => write!(f, "Optimizer error: {e}"),
        }
    }
}

impl From<FlowError> for VIError {
    fn from(err: FlowError) -> Self {
        VIError::Flow(err)
    }
}

impl From<OptError> for VIError {
    fn from(err: OptError) -> Self {
        VIError::Opt(err)
    }
}

/// Objectives handed to a minimizer must fail with `OptError`.
impl From<VIError> for OptError {
    fn from(err: VIError) -> Self {
        match err {
            VIError::Opt(e) => e,
            other => OptError::ObjectiveFailed { text: other.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::errors::FlowKind;

    #[test]
    fn wrapped_errors_keep_their_variant() {
        let err: VIError = FlowError::NotTrainable { kind: FlowKind::Radial }.into();
        assert!(matches!(err, VIError::Flow(FlowError::NotTrainable { .. })));
        assert!(err.to_string().contains("radial"));
    }

    #[test]
    fn objective_failures_become_opt_errors() {
        let opt: OptError = VIError::InvalidNmc { nmc: 0 }.into();
        assert!(matches!(opt, OptError::ObjectiveFailed { .. }));
        let passthrough: OptError = VIError::Opt(OptError::EmptyTheta).into();
        assert_eq!(passthrough, OptError::EmptyTheta);
    }
}
