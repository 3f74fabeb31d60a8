//! Public API surface for black-box minimization.
//!
//! - [`Minimizer`]: the narrow seam the variational fitter talks to.
//! - [`MinimizerOptions`] and [`Tolerances`]: configuration for the argmin
//!   backed default.
//! - [`SolverMethod`] / [`LineSearcher`]: which argmin solver runs.
//! - [`MinimizeOutcome`]: normalized result, including the integer status
//!   code that higher layers surface verbatim.
//!
//! Convention: objectives are **minimized**. A caller maximizing `g(θ)`
//! hands over `f(θ) = -g(θ)` and flips the sign of [`MinimizeOutcome::value`].
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::{
        types::{Cost, DEFAULT_SIMPLEX_STEP, FnEvalMap, Theta},
        validation::{
            validate_theta_hat, validate_value, verify_simplex_step, verify_tol_cost,
            verify_tol_grad,
        },
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use std::str::FromStr;

/// Status: the solver met its own convergence criterion (or a target cost).
pub const STATUS_CONVERGED: i32 = 0;
/// Status: the iteration cap was hit before convergence.
pub const STATUS_MAX_ITERS: i32 = 1;
/// Status: the run hit a wall-clock timeout.
pub const STATUS_TIMEOUT: i32 = 2;
/// Status: the run was interrupted externally.
pub const STATUS_INTERRUPTED: i32 = 3;
/// Status: the solver exited on a solver-specific condition.
pub const STATUS_SOLVER_EXIT: i32 = 4;
/// Status: the executor returned without recording a termination reason.
pub const STATUS_NOT_TERMINATED: i32 = -1;

/// Black-box unconstrained minimizer.
///
/// Implementors search for `argmin_θ f(θ)` starting at `theta0` and report
/// the best point, its value, and an integer status. Callers must treat
/// `status` as opaque and pass it on unchanged; in particular a non-zero
/// status is never an error on its own.
///
/// The objective may be stochastic: two evaluations at the same `θ` are not
/// required to agree.
pub trait Minimizer {
    fn minimize<F>(&self, objective: F, theta0: Theta) -> OptResult<MinimizeOutcome>
    where
        F: Fn(&Theta) -> OptResult<Cost>;
}

/// Line search for [`SolverMethod::Lbfgs`].
///
/// Parses from `"MoreThuente"` or `"HagerZhang"` in any letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "expected MoreThuente or HagerZhang",
            }),
        }
    }
}

/// Which argmin solver the default minimizer runs.
///
/// - `Lbfgs(line_searcher)`: quasi-Newton with finite-difference gradients.
/// - `NelderMead`: derivative-free simplex search; robust to the noise of
///   Monte Carlo objectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverMethod {
    Lbfgs(LineSearcher),
    NelderMead,
}

/// Stopping rules.
///
/// - `tol_grad`: gradient-norm threshold (L-BFGS only).
/// - `tol_cost`: cost-change threshold for L-BFGS; spread of the simplex
///   values for Nelder–Mead.
/// - `max_iter`: iteration cap. The fitter relies on it, since a Monte Carlo
///   objective rarely meets a cost tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if max_iter == Some(0) {
            return Err(OptError::InvalidMaxIter { max_iter: 0, reason: "no iteration would run" });
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

impl Default for Tolerances {
    /// `tol_grad = 1e-6`, `tol_cost = 1e-8`, `max_iter = 200`.
    fn default() -> Self {
        Self { tol_grad: Some(1e-6), tol_cost: Some(1e-8), max_iter: Some(200) }
    }
}

/// Settings of [`ArgminMinimizer`](super::api::ArgminMinimizer).
///
/// | Field | Meaning | Default |
/// |---|---|---|
/// | `tols` | stopping rules | [`Tolerances::default`] |
/// | `method` | solver | `NelderMead` |
/// | `lbfgs_mem` | L-BFGS history length | `None` (7) |
/// | `simplex_step` | initial simplex edge | [`DEFAULT_SIMPLEX_STEP`] |
/// | `verbose` | attach the slog observer (`obs_slog`) | `false` |
#[derive(Debug, Clone, PartialEq)]
pub struct MinimizerOptions {
    pub tols: Tolerances,
    pub method: SolverMethod,
    pub lbfgs_mem: Option<usize>,
    pub simplex_step: f64,
    pub verbose: bool,
}

impl MinimizerOptions {
    /// # Errors
    /// - [`OptError::InvalidLBFGSMem`] if `lbfgs_mem == Some(0)`.
    /// - [`OptError::InvalidSimplexStep`] if `simplex_step` is not finite and
    ///   positive.
    pub fn new(
        tols: Tolerances, method: SolverMethod, lbfgs_mem: Option<usize>, simplex_step: f64,
        verbose: bool,
    ) -> OptResult<Self> {
        if lbfgs_mem == Some(0) {
            return Err(OptError::InvalidLBFGSMem { mem: 0, reason: "history must hold a pair" });
        }
        verify_simplex_step(simplex_step)?;
        Ok(Self { tols, method, lbfgs_mem, simplex_step, verbose })
    }
}

impl Default for MinimizerOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances::default(),
            method: SolverMethod::NelderMead,
            lbfgs_mem: None,
            simplex_step: DEFAULT_SIMPLEX_STEP,
            verbose: false,
        }
    }
}

/// Canonical result returned by a [`Minimizer`].
///
/// - `theta_hat`: best point seen.
/// - `value`: objective value recorded at `theta_hat`.
/// - `status`: integer status code (`STATUS_*` constants for the argmin
///   backend; arbitrary for other implementors).
/// - `status_text`: human-readable termination reason.
/// - `iterations`: completed solver iterations.
/// - `fn_evals`: function-evaluation counters keyed by argmin counter name.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimizeOutcome {
    pub theta_hat: Theta,
    pub value: Cost,
    pub status: i32,
    pub status_text: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
}

impl MinimizeOutcome {
    /// Build a validated [`MinimizeOutcome`] from raw argmin solver state.
    ///
    /// # Errors
    /// - Propagates validation errors for `theta_hat` (missing or non-finite)
    ///   and `value` (non-finite).
    pub fn from_argmin(
        theta_hat_opt: Option<Theta>, value: Cost, termination: &TerminationStatus,
        iterations: u64, fn_evals: FnEvalMap,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let status_text = match termination {
            TerminationStatus::NotTerminated => "Not terminated".to_string(),
            TerminationStatus::Terminated(reason) => format!("{reason:?}"),
        };
        Ok(Self {
            theta_hat,
            value,
            status: status_code(termination),
            status_text,
            iterations: iterations as usize,
            fn_evals,
        })
    }
}

/// Map an argmin termination status onto the crate's integer codes.
pub fn status_code(termination: &TerminationStatus) -> i32 {
    match termination {
        TerminationStatus::NotTerminated => STATUS_NOT_TERMINATED,
        TerminationStatus::Terminated(reason) => match reason {
            TerminationReason::SolverConverged | TerminationReason::TargetCostReached => {
                STATUS_CONVERGED
            }
            TerminationReason::MaxItersReached => STATUS_MAX_ITERS,
            TerminationReason::Timeout => STATUS_TIMEOUT,
            TerminationReason::Interrupt => STATUS_INTERRUPTED,
            _ => STATUS_SOLVER_EXIT,
        },
    }
}
