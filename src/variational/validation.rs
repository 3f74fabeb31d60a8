//! Entry validation for probability vectors and Monte Carlo settings.
use ndarray::ArrayView1;

use crate::variational::errors::{VIError, VIResult};

/// Allowed deviation of a probability vector's sum from one.
pub const PROB_SUM_TOL: f64 = 1e-8;

/// Check that `p` is a probability vector.
///
/// # Errors
/// - [`VIError::EmptyDistribution`] for an empty vector.
/// - [`VIError::InvalidProbability`] for the first negative or non-finite
///   entry.
/// - [`VIError::NotNormalized`] if `|Σp − 1| > PROB_SUM_TOL`.
pub fn validate_distribution(what: &'static str, p: ArrayView1<'_, f64>) -> VIResult<()> {
    if p.is_empty() {
        return Err(VIError::EmptyDistribution { what });
    }
    if let Some((index, &value)) = p.iter().enumerate().find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        return Err(VIError::InvalidProbability { what, index, value });
    }
    let sum = p.sum();
    if (sum - 1.0).abs() > PROB_SUM_TOL {
        return Err(VIError::NotNormalized { what, sum });
    }
    Ok(())
}

/// Check the observed distribution supplied to the fitter.
pub fn validate_observed(observed: ArrayView1<'_, f64>) -> VIResult<()> {
    validate_distribution("observed", observed)
}

/// Check a likelihood output against the observed category count.
///
/// # Errors
/// [`VIError::CategoryMismatch`] on a length mismatch, otherwise as
/// [`validate_distribution`].
pub fn validate_pmf(pmf: ArrayView1<'_, f64>, n_categories: usize) -> VIResult<()> {
    if pmf.len() != n_categories {
        return Err(VIError::CategoryMismatch { expected: n_categories, found: pmf.len() });
    }
    validate_distribution("likelihood", pmf)
}

/// # Errors
/// [`VIError::InvalidNmc`] if `nmc == 0`.
pub fn validate_nmc(nmc: usize) -> VIResult<()> {
    if nmc == 0 {
        return Err(VIError::InvalidNmc { nmc });
    }
    Ok(())
}
