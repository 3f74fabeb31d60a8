//! Execution helpers that run an `argmin` solver on an objective closure and
//! return a crate-friendly [`MinimizeOutcome`].
use crate::optimization::{
    errors::OptResult,
    minimizer::{
        adapter::ObjectiveAdapter,
        traits::{MinimizeOutcome, MinimizerOptions},
        types::{Cost, Grad, NelderMeadSolver, Theta},
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::CostFunction;
use argmin::core::{Executor, IterState, Solver, State};

/// Run an L-BFGS solver (either line search) on an objective.
///
/// Wires up the adapter, the initial parameter `theta0`, the optional
/// observer (behind `obs_slog`, only when `opts.verbose`), and the optional
/// `max_iters`, then converts the final state into [`MinimizeOutcome`].
///
/// # Errors
/// - Propagates any `argmin` runtime error (objective failures, line-search
///   failures) via `From<argmin::core::Error>`.
/// - Propagates validation errors raised while building the outcome.
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MinimizerOptions, problem: ObjectiveAdapter<'a, F>, solver: S,
) -> OptResult<MinimizeOutcome>
where
    F: Fn(&Theta) -> OptResult<Cost>,
    S: Solver<ObjectiveAdapter<'a, F>, IterState<Theta, Grad, (), (), (), f64>> + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    MinimizeOutcome::from_argmin(
        result.take_best_param(),
        result.get_best_cost(),
        &termination,
        iterations,
        function_counts,
    )
}

/// Run a Nelder–Mead solver on an objective.
///
/// The simplex already carries `θ₀`, so no initial parameter is configured on
/// the executor.
///
/// # Errors
/// Same as [`run_lbfgs`].
pub fn run_nelder_mead<'a, F>(
    opts: &MinimizerOptions, problem: ObjectiveAdapter<'a, F>, solver: NelderMeadSolver,
) -> OptResult<MinimizeOutcome>
where
    F: Fn(&Theta) -> OptResult<Cost>,
{
    let mut optimizer = Executor::new(problem, solver);
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    MinimizeOutcome::from_argmin(
        result.take_best_param(),
        result.get_best_cost(),
        &termination,
        iterations,
        function_counts,
    )
}

// ---- Helper Methods ----

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: &Theta, problem: &ObjectiveAdapter<'_, F>) -> OptResult<()>
where
    F: Fn(&Theta) -> OptResult<Cost>,
{
    let f0 = problem.cost(theta0)?;
    let logger = crate::utils::term_logger();
    slog::info!(logger, "minimizer start"; "f(theta0)" => f0, "dim" => theta0.len());
    Ok(())
}
