//! variational::fit — ELBO maximization over a flow family.
//!
//! Purpose
//! -------
//! Fit a [`FlowModel`] to a categorical observation through its ELBO.
//!
//! Key behaviors
//! -------------
//! - Fixed variants (planar, radial): the ELBO is estimated once at the
//!   supplied parameters; `theta = None`, `convergence = 0`.
//! - Trainable variants (autoregressive, spline): the minimizer searches
//!   `f(θ) = −ELBO(θ)`. Each evaluation rebuilds a flow from θ and draws
//!   fresh samples, so `f` is stochastic: two calls at the same θ differ.
//! - The minimizer's status is copied into `FitResult::convergence`
//!   untouched. A cap-limited run is a successful call with a non-zero
//!   status; nothing is retried.
//!
//! Invariants & assumptions
//! ------------------------
//! - One seeded `ChaCha8Rng` stream drives every draw of a fit. It is the
//!   only state shared between objective evaluations, so a fit is
//!   reproducible for a fixed seed, minimizer, and options.
//! - `FitResult::elbo` is the negated best objective value reported by the
//!   minimizer, i.e. the ELBO estimate at `theta_hat` from the evaluation
//!   that found it.
//!
//! Downstream usage
//! ----------------
//! - [`fit_flow_variational`] for the argmin-backed default.
//! - [`fit_flow_variational_with`] to plug in any [`Minimizer`].
use std::cell::RefCell;

use ndarray::ArrayView1;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{
    flows::model::FlowModel,
    optimization::{
        errors::OptResult,
        minimizer::{ArgminMinimizer, Minimizer, Theta},
    },
    variational::{
        elbo::elbo_flow,
        errors::{VIError, VIResult},
        likelihood::Likelihood,
        options::{FitOptions, ResolvedFitOptions},
        validation::validate_observed,
    },
};

/// Outcome of a variational fit.
///
/// - `flow`: the flow at the returned parameters (a new instance).
/// - `elbo`: finite ELBO estimate at those parameters.
/// - `theta`: fitted parameters, `None` for fixed variants.
/// - `convergence`: minimizer status code (0 for fixed variants).
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub flow: FlowModel,
    pub elbo: f64,
    pub theta: Option<Theta>,
    pub convergence: i32,
}

/// Fit `flow` with the argmin-backed minimizer configured in `opts.minimizer`.
///
/// # Errors
/// See [`fit_flow_variational_with`].
pub fn fit_flow_variational<L>(
    flow: &FlowModel, likelihood: &L, observed: ArrayView1<'_, f64>, opts: &FitOptions,
) -> VIResult<FitResult>
where
    L: Likelihood + ?Sized,
{
    let minimizer = ArgminMinimizer::new(opts.minimizer.clone());
    fit_flow_variational_with(flow, likelihood, observed, opts, &minimizer)
}

/// Fit `flow` with a caller-supplied [`Minimizer`].
///
/// `opts.minimizer` is ignored here; the minimizer carries its own settings.
///
/// # Errors
/// - Probability and configuration errors from validating `observed` and
///   resolving `opts`.
/// - [`VIError::Opt`] when the minimizer fails (including objective
///   evaluations that fail inside it).
/// - [`VIError::NonFiniteElbo`] if the reported optimum is not finite.
pub fn fit_flow_variational_with<L, M>(
    flow: &FlowModel, likelihood: &L, observed: ArrayView1<'_, f64>, opts: &FitOptions,
    minimizer: &M,
) -> VIResult<FitResult>
where
    L: Likelihood + ?Sized,
    M: Minimizer,
{
    validate_observed(observed)?;
    let resolved = opts.resolve(flow)?;
    let mut rng = ChaCha8Rng::seed_from_u64(resolved.seed);

    if !flow.is_trainable() {
        let elbo = elbo_flow(flow, likelihood, observed, resolved.nmc, &mut rng)?;
        let elbo = check_elbo(elbo)?;
        let result = FitResult { flow: flow.clone(), elbo, theta: None, convergence: 0 };
        log_fit(&resolved, &result);
        return Ok(result);
    }

    let rng = RefCell::new(rng);
    let nmc = resolved.nmc;
    let objective = |theta: &Theta| -> OptResult<f64> {
        let candidate = flow.with_theta(theta.clone()).map_err(VIError::from)?;
        let elbo = elbo_flow(&candidate, likelihood, observed, nmc, &mut *rng.borrow_mut())?;
        Ok(-elbo)
    };
    let outcome = minimizer.minimize(objective, resolved.theta0.clone())?;

    let fitted = flow.with_theta(outcome.theta_hat.clone())?;
    let result = FitResult {
        flow: fitted,
        elbo: check_elbo(-outcome.value)?,
        theta: Some(outcome.theta_hat),
        convergence: outcome.status,
    };
    log_fit(&resolved, &result);
    Ok(result)
}

fn check_elbo(value: f64) -> VIResult<f64> {
    if value.is_finite() { Ok(value) } else { Err(VIError::NonFiniteElbo { value }) }
}

#[cfg(feature = "obs_slog")]
fn log_fit(resolved: &ResolvedFitOptions, result: &FitResult) {
    if resolved.verbose {
        let logger = crate::utils::term_logger();
        slog::info!(logger, "variational fit finished";
            "flow" => result.flow.kind().to_string(),
            "n_params" => result.flow.n_params(),
            "nmc" => resolved.nmc,
            "elbo" => result.elbo,
            "status" => result.convergence
        );
    }
}

#[cfg(not(feature = "obs_slog"))]
fn log_fit(_resolved: &ResolvedFitOptions, _result: &FitResult) {}
