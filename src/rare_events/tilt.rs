//! rare_events::tilt — exponentially tilted categorical likelihoods.
//!
//! Purpose
//! -------
//! Reweight a base likelihood per category,
//!
//! ```text
//! p̃_c(z) ∝ exp(w_c) · p_c(z)
//! ```
//!
//! so rare-event information (quasipotentials, Girsanov ratios) can be fed
//! into the variational fitter as an ordinary [`Likelihood`].
//!
//! Key behaviors
//! -------------
//! - Weights are fixed at construction and must be finite.
//! - Normalization is done in log space with the maximum subtracted, so large
//!   `|w_c|` do not overflow.
//! - A base pmf of the wrong length, or one without positive mass, yields a
//!   NaN vector; the ELBO estimator rejects it as an invalid probability.
use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::{
    rare_events::{
        errors::{RareEventError, RareResult},
        stats::girsanov_logratio,
    },
    utils::first_non_finite,
    variational::likelihood::Likelihood,
};

/// Base likelihood with per-category log-weights.
#[derive(Debug, Clone, PartialEq)]
pub struct TiltedLikelihood<L> {
    base: L,
    log_weights: Array1<f64>,
}

impl<L: Likelihood> TiltedLikelihood<L> {
    /// Tilt `base` by `exp(log_weights[c])`.
    ///
    /// # Errors
    /// - [`RareEventError::EmptyInput`] for no weights.
    /// - [`RareEventError::NonFiniteInput`] for a NaN or infinite weight.
    pub fn new(base: L, log_weights: Array1<f64>) -> RareResult<Self> {
        if log_weights.is_empty() {
            return Err(RareEventError::EmptyInput { what: "log-weights" });
        }
        if let Some((index, value)) = first_non_finite(log_weights.view()) {
            return Err(RareEventError::NonFiniteInput { what: "log-weights", index, value });
        }
        Ok(Self { base, log_weights })
    }

    /// Weights `exp(−V_c / ε)` from per-category quasipotentials `V`.
    ///
    /// Small `ε` concentrates the likelihood on the cheapest transitions.
    ///
    /// # Errors
    /// - [`RareEventError::InvalidTemperature`] unless `eps` is finite and
    ///   positive.
    /// - As [`TiltedLikelihood::new`] for empty or non-finite `V`.
    pub fn from_quasipotentials(base: L, v: ArrayView1<'_, f64>, eps: f64) -> RareResult<Self> {
        if !(eps.is_finite() && eps > 0.0) {
            return Err(RareEventError::InvalidTemperature { eps });
        }
        if let Some((index, value)) = first_non_finite(v) {
            return Err(RareEventError::NonFiniteInput { what: "quasipotentials", index, value });
        }
        Self::new(base, v.mapv(|vc| -vc / eps))
    }

    /// Weights `exp(girsanov_logratio(θ_c, ΔW_c, dt))`, one `(θ, ΔW)` pair
    /// of `T × d` paths per category.
    ///
    /// # Errors
    /// Any error of [`girsanov_logratio`] for the first failing category, or
    /// [`RareEventError::EmptyInput`] when no paths are given.
    pub fn from_girsanov<'a, I>(base: L, paths: I, dt: f64) -> RareResult<Self>
    where
        I: IntoIterator<Item = (ArrayView2<'a, f64>, ArrayView2<'a, f64>)>,
    {
        let log_weights = paths
            .into_iter()
            .map(|(theta, winc)| girsanov_logratio(theta, winc, dt))
            .collect::<RareResult<Vec<f64>>>()?;
        Self::new(base, Array1::from(log_weights))
    }

    pub fn base(&self) -> &L {
        &self.base
    }

    pub fn log_weights(&self) -> ArrayView1<'_, f64> {
        self.log_weights.view()
    }

    pub fn n_categories(&self) -> usize {
        self.log_weights.len()
    }
}

impl<L: Likelihood> Likelihood for TiltedLikelihood<L> {
    fn pmf(&self, z: ArrayView1<'_, f64>) -> Array1<f64> {
        let base = self.base.pmf(z);
        let n = self.log_weights.len();
        if base.len() != n {
            return Array1::from_elem(n, f64::NAN);
        }
        let logits: Array1<f64> = base
            .iter()
            .zip(self.log_weights.iter())
            .map(|(&p, &w)| match p {
                p if p > 0.0 => p.ln() + w,
                p if p == 0.0 => f64::NEG_INFINITY,
                _ => f64::NAN,
            })
            .collect();
        let max = logits.fold(f64::NEG_INFINITY, |m, &l| m.max(l));
        if !max.is_finite() || logits.iter().any(|l| l.is_nan()) {
            return Array1::from_elem(n, f64::NAN);
        }
        let unnormalized = logits.mapv(|l| (l - max).exp());
        let total = unnormalized.sum();
        unnormalized / total
    }
}
