//! High-level entry point for minimizing an objective closure with argmin.
//!
//! Selects L-BFGS (Hager–Zhang or More–Thuente line search) or Nelder–Mead
//! from [`MinimizerOptions`], wraps the closure in an [`ObjectiveAdapter`],
//! and delegates the run to the matching runner.
use crate::optimization::{
    errors::OptResult,
    minimizer::{
        adapter::ObjectiveAdapter,
        builders::{build_nelder_mead, build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::{run_lbfgs, run_nelder_mead},
        traits::{LineSearcher, MinimizeOutcome, Minimizer, MinimizerOptions, SolverMethod},
        types::{Cost, Theta},
        validation::validate_theta0,
    },
};

/// Minimize `f(θ)` with the solver selected in `opts`.
///
/// # Behavior
/// - Validates `theta0` (non-empty, finite).
/// - Builds the solver named by `opts.method`.
/// - Runs to the solver's own convergence test or `opts.tols.max_iter`,
///   whichever comes first.
///
/// # Errors
/// - [`OptError::EmptyTheta`](crate::optimization::errors::OptError::EmptyTheta) /
///   `InvalidThetaInput` for a bad starting point.
/// - Builder errors (rejected tolerances).
/// - Runtime errors raised by the objective or the solver.
///
/// # Returns
/// A [`MinimizeOutcome`] whose `status` reports how the run terminated.
/// Reaching the iteration cap is **not** an error; it is reported as
/// [`STATUS_MAX_ITERS`](crate::optimization::minimizer::traits::STATUS_MAX_ITERS).
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use rust_rare_events::optimization::minimizer::{MinimizerOptions, minimize};
///
/// let f = |t: &ndarray::Array1<f64>| Ok((t[0] - 1.0).powi(2) + (t[1] + 2.0).powi(2));
/// let out = minimize(f, array![0.0, 0.0], &MinimizerOptions::default())?;
/// println!("θ̂ = {:?}, status = {}", out.theta_hat, out.status);
/// # Ok::<(), rust_rare_events::optimization::errors::OptError>(())
/// ```
pub fn minimize<F>(f: F, theta0: Theta, opts: &MinimizerOptions) -> OptResult<MinimizeOutcome>
where
    F: Fn(&Theta) -> OptResult<Cost>,
{
    validate_theta0(&theta0)?;
    let problem = ObjectiveAdapter::new(&f);
    match opts.method {
        SolverMethod::Lbfgs(LineSearcher::MoreThuente) => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        SolverMethod::Lbfgs(LineSearcher::HagerZhang) => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        SolverMethod::NelderMead => {
            let solver = build_nelder_mead(&theta0, opts)?;
            run_nelder_mead(opts, problem, solver)
        }
    }
}

/// The default [`Minimizer`]: argmin with the configured solver.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArgminMinimizer {
    pub opts: MinimizerOptions,
}

impl ArgminMinimizer {
    pub fn new(opts: MinimizerOptions) -> Self {
        Self { opts }
    }
}

impl Minimizer for ArgminMinimizer {
    fn minimize<F>(&self, objective: F, theta0: Theta) -> OptResult<MinimizeOutcome>
    where
        F: Fn(&Theta) -> OptResult<Cost>,
    {
        minimize(objective, theta0, &self.opts)
    }
}
