//! rare_events::stats — closed-form large-deviation quantities.
//!
//! Purpose
//! -------
//! Small, exact formulas used around the variational and path layers:
//! relative entropy between categorical distributions, the Sanov estimate
//! of an empirical-distribution rare event, and the Girsanov log-likelihood
//! ratio of a drift tilt.
//!
//! Conventions
//! -----------
//! - Probability inputs go through the same validation as the fitter's
//!   `observed` vector (non-negative, sum to one within 1e−8).
//! - `0 · ln(0 / p) = 0`; `q > 0` against `p = 0` gives `+∞`, not an error.
use ndarray::{ArrayView, ArrayView1, Dimension, Zip};

use crate::{
    rare_events::errors::{RareEventError, RareResult},
    variational::validation::validate_distribution,
};

/// Relative entropy `KL(Q ‖ P) = Σ_c Q_c ln(Q_c / P_c)`.
///
/// Parameters
/// ----------
/// - `q`: the tilted (rare) distribution.
/// - `p`: the reference distribution.
///
/// Returns
/// -------
/// A non-negative value, `+∞` when `Q` charges a category `P` does not.
///
/// Errors
/// ------
/// - `RareEventError::ShapeMismatch` for different lengths.
/// - `RareEventError::Variational` when either input is not a probability
///   vector.
pub fn kl_div(q: ArrayView1<'_, f64>, p: ArrayView1<'_, f64>) -> RareResult<f64> {
    if q.len() != p.len() {
        return Err(RareEventError::ShapeMismatch {
            what: "kl_div",
            expected: vec![q.len()],
            found: vec![p.len()],
        });
    }
    validate_distribution("Q", q)?;
    validate_distribution("P", p)?;

    let kl = q
        .iter()
        .zip(p.iter())
        .filter(|(qc, _)| **qc > 0.0)
        .map(|(&qc, &pc)| if pc > 0.0 { qc * (qc / pc).ln() } else { f64::INFINITY })
        .sum::<f64>();
    // Rounding can leave tiny negatives when Q ≈ P.
    Ok(kl.max(0.0))
}

/// Sanov estimate `exp(−n · KL(Q ‖ P))` of observing empirical law `Q`
/// after `n` draws from `P`.
///
/// # Errors
/// As [`kl_div`].
pub fn sanov_prob(q: ArrayView1<'_, f64>, p: ArrayView1<'_, f64>, n: usize) -> RareResult<f64> {
    let kl = kl_div(q, p)?;
    if n == 0 {
        return Ok(1.0);
    }
    Ok((-(n as f64) * kl).exp())
}

/// Girsanov log-likelihood ratio of the tilt `θ`:
/// `Σ_t θ_t · ΔW_t − ½ Σ_t ‖θ_t‖² dt`.
///
/// `theta` and `winc` share any shape (`T` for scalar noise, `T × d` for a
/// d-dimensional Brownian motion); the sums run over every entry.
///
/// # Errors
/// - `RareEventError::InvalidDt` unless `dt` is finite and positive.
/// - `RareEventError::ShapeMismatch` when the shapes differ.
/// - `RareEventError::EmptyInput` for empty paths.
/// - `RareEventError::NonFiniteInput` for a NaN or infinite entry.
pub fn girsanov_logratio<D>(
    theta: ArrayView<'_, f64, D>, winc: ArrayView<'_, f64, D>, dt: f64,
) -> RareResult<f64>
where
    D: Dimension,
{
    if !(dt.is_finite() && dt > 0.0) {
        return Err(RareEventError::InvalidDt { dt });
    }
    if theta.shape() != winc.shape() {
        return Err(RareEventError::ShapeMismatch {
            what: "girsanov_logratio",
            expected: theta.shape().to_vec(),
            found: winc.shape().to_vec(),
        });
    }
    if theta.is_empty() {
        return Err(RareEventError::EmptyInput { what: "theta path" });
    }
    for (what, a) in [("theta path", theta.view()), ("Brownian increments", winc.view())] {
        if let Some((index, &value)) = a.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(RareEventError::NonFiniteInput { what, index, value });
        }
    }

    let mut stochastic = 0.0;
    let mut energy = 0.0;
    Zip::from(&theta).and(&winc).for_each(|&th, &dw| {
        stochastic += th * dw;
        energy += th * th;
    });
    Ok(stochastic - 0.5 * energy * dt)
}
