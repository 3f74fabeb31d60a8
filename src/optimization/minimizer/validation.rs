//! Validation helpers for black-box minimization.
//!
//! Settings are checked when options are built, the starting point before a
//! solver is configured, and the solver's answer before it is returned.
use crate::{
    optimization::{
        errors::{OptError, OptResult},
        minimizer::types::{Grad, Theta},
    },
    utils::first_non_finite,
};

/// Why `x` is not a usable positive scale, if it is not.
fn non_positive_reason(x: f64) -> Option<&'static str> {
    if !x.is_finite() {
        Some("must be finite")
    } else if x <= 0.0 {
        Some("must be > 0")
    } else {
        None
    }
}

/// # Errors
/// [`OptError::InvalidTolGrad`] for a non-finite or non-positive tolerance.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    match tol.and_then(|t| non_positive_reason(t).map(|reason| (t, reason))) {
        Some((tol, reason)) => Err(OptError::InvalidTolGrad { tol, reason }),
        None => Ok(()),
    }
}

/// # Errors
/// [`OptError::InvalidTolCost`] for a non-finite or non-positive tolerance.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    match tol.and_then(|t| non_positive_reason(t).map(|reason| (t, reason))) {
        Some((tol, reason)) => Err(OptError::InvalidTolCost { tol, reason }),
        None => Ok(()),
    }
}

/// Edge length of the initial Nelder–Mead simplex.
///
/// # Errors
/// [`OptError::InvalidSimplexStep`] for a non-finite or non-positive step.
pub fn verify_simplex_step(step: f64) -> OptResult<()> {
    match non_positive_reason(step) {
        Some(reason) => Err(OptError::InvalidSimplexStep { step, reason }),
        None => Ok(()),
    }
}

/// Starting point handed to a solver.
///
/// # Errors
/// - [`OptError::EmptyTheta`] if `theta0` has no entries.
/// - [`OptError::InvalidThetaInput`] for the first non-finite entry.
pub fn validate_theta0(theta0: &Theta) -> OptResult<()> {
    if theta0.is_empty() {
        return Err(OptError::EmptyTheta);
    }
    match first_non_finite(theta0.view()) {
        Some((index, value)) => Err(OptError::InvalidThetaInput { index, value }),
        None => Ok(()),
    }
}

/// Finite-difference gradient of a `dim`-parameter objective.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] on a length mismatch.
/// - [`OptError::InvalidGradient`] for the first non-finite entry.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    match first_non_finite(grad.view()) {
        Some((index, value)) => Err(OptError::InvalidGradient {
            index,
            value,
            reason: "objective is not differentiable here",
        }),
        None => Ok(()),
    }
}

/// Best parameters reported by the solver.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if the solver reported none.
/// - [`OptError::InvalidThetaHat`] for the first non-finite entry.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta = theta_hat.ok_or(OptError::MissingThetaHat)?;
    match first_non_finite(theta.view()) {
        Some((index, value)) => {
            Err(OptError::InvalidThetaHat { index, value, reason: "best iterate must be finite" })
        }
        None => Ok(theta),
    }
}

/// # Errors
/// [`OptError::NonFiniteCost`] if `value` is NaN or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if value.is_finite() { Ok(()) } else { Err(OptError::NonFiniteCost { value }) }
}
