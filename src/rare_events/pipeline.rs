//! rare_events::pipeline — tilt a likelihood with rare-event weights and
//! fit a flow to it.
//!
//! Two entry points share one shape: build per-category log-weights, wrap the
//! base likelihood in a [`TiltedLikelihood`], and hand it to the variational
//! fitter together with the observed distribution.
//!
//! - [`fit_quasipotential_tilted`]: weights `−V_c/ε` from the quasipotential
//!   between an anchor state and each category's representative state.
//! - [`fit_girsanov_tilted`]: weights from one Girsanov log-ratio per
//!   category.
use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::{
    flows::model::FlowModel,
    paths::{drift::DriftField, landscape::quasipotential_landscape, options::PathOptions},
    rare_events::{
        errors::{RareEventError, RareResult},
        tilt::TiltedLikelihood,
    },
    variational::{
        fit::{FitResult, fit_flow_variational},
        likelihood::Likelihood,
        options::FitOptions,
        validation::validate_observed,
    },
};

/// Fit on a tilted likelihood, with the weights that produced the tilt.
#[derive(Debug, Clone, PartialEq)]
pub struct TiltedFit {
    pub fit: FitResult,
    pub log_weights: Array1<f64>,
}

/// Quasipotential-tilted variational fit.
///
/// `targets` holds one representative state per category (row `c` for
/// category `c`). Quasipotentials `V_c = V(anchor → targets[c])` come from
/// the path solver; the base likelihood is tilted by `exp(−V_c/ε)` and
/// fitted against `observed`.
///
/// # Errors
/// - [`RareEventError::ShapeMismatch`] when `targets` has a row count other
///   than `observed.len()`.
/// - Path, tilt, and fitting errors from the stages it drives.
#[allow(clippy::too_many_arguments)]
pub fn fit_quasipotential_tilted<L, D>(
    flow: &FlowModel, base: L, observed: ArrayView1<'_, f64>, drift: &D,
    anchor: ArrayView1<'_, f64>, targets: ArrayView2<'_, f64>, eps: f64, path_opts: &PathOptions,
    fit_opts: &FitOptions,
) -> RareResult<TiltedFit>
where
    L: Likelihood,
    D: DriftField + ?Sized,
{
    validate_observed(observed)?;
    if targets.nrows() != observed.len() {
        return Err(RareEventError::ShapeMismatch {
            what: "category targets",
            expected: vec![observed.len(), anchor.len()],
            found: targets.shape().to_vec(),
        });
    }
    let v = quasipotential_landscape(drift, anchor, targets, path_opts)?;
    let tilted = TiltedLikelihood::from_quasipotentials(base, v.view(), eps)?;
    fit_tilted(flow, tilted, observed, fit_opts)
}

/// Girsanov-tilted variational fit: one `(θ, ΔW)` path pair per category.
///
/// # Errors
/// - [`RareEventError::ShapeMismatch`] when the number of path pairs differs
///   from `observed.len()`.
/// - Girsanov, tilt, and fitting errors from the stages it drives.
pub fn fit_girsanov_tilted<'a, L, I>(
    flow: &FlowModel, base: L, observed: ArrayView1<'_, f64>, paths: I, dt: f64,
    fit_opts: &FitOptions,
) -> RareResult<TiltedFit>
where
    L: Likelihood,
    I: IntoIterator<Item = (ArrayView2<'a, f64>, ArrayView2<'a, f64>)>,
{
    validate_observed(observed)?;
    let tilted = TiltedLikelihood::from_girsanov(base, paths, dt)?;
    if tilted.n_categories() != observed.len() {
        return Err(RareEventError::ShapeMismatch {
            what: "Girsanov paths per category",
            expected: vec![observed.len()],
            found: vec![tilted.n_categories()],
        });
    }
    fit_tilted(flow, tilted, observed, fit_opts)
}

fn fit_tilted<L: Likelihood>(
    flow: &FlowModel, tilted: TiltedLikelihood<L>, observed: ArrayView1<'_, f64>,
    fit_opts: &FitOptions,
) -> RareResult<TiltedFit> {
    let fit = fit_flow_variational(flow, &tilted, observed, fit_opts)?;
    Ok(TiltedFit { fit, log_weights: tilted.log_weights().to_owned() })
}
