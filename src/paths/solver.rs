//! paths::solver — fixed-budget descent for minimum-action paths.
//!
//! Purpose
//! -------
//! Approximate the Freidlin–Wentzell minimum-action path between two states
//! `x0`, `x1` of a diffusion with drift `b`, and report its action as the
//! quasipotential estimate.
//!
//! Key behaviors
//! -------------
//! - Initialization: `T` points on the straight line from `x0` to `x1`.
//! - Iteration (Jacobi, from the previous iterate), for interior `t`:
//!
//!   ```text
//!   φ_t ← φ_t + stepsize · [ (φ_{t+1} − φ_t) − (φ_t − φ_{t−1}) − b(φ_t) ]
//!   ```
//!
//!   run exactly `niter` times. No line search, no convergence test.
//! - Endpoints are written once, at construction, and never touched again;
//!   `path[0] == x0` and `path[T−1] == x1` bit-for-bit at every step.
//!
//! Invariants & assumptions
//! ------------------------
//! - The update omits the drift-Jacobian-transpose term of the
//!   Euler–Lagrange equation. It is a stationary condition of the action only
//!   for conservative drifts; for other drifts the result is an approximation
//!   and is returned as such.
//! - Descent from a straight line can stop near a local stationary path when
//!   the drift has several basins. The reported quasipotential is the action
//!   of the returned path: a local, approximate value.
//! - Non-finite drift values propagate into the path and the action.
//!
//! Downstream usage
//! ----------------
//! - [`minimum_action_path`] / [`quasipotential`] for one-shot calls.
//! - [`ActionSolver`] to step manually, e.g. to inspect intermediate paths.
use std::mem;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};

use crate::{
    paths::{
        action::action_of,
        drift::{DriftField, eval_drift_into},
        errors::{ActionResult, PathError},
        options::PathOptions,
    },
    utils::first_non_finite,
};

/// Path and action returned by the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    /// `T × d`, endpoints equal to the requested boundary points.
    pub path: Array2<f64>,
    pub action: f64,
}

/// Stateful descent over one discretized path.
pub struct ActionSolver<'d, D: ?Sized> {
    drift: &'d D,
    opts: PathOptions,
    path: Array2<f64>,
    scratch: Array2<f64>,
    b: Array1<f64>,
    iterations: usize,
}

impl<'d, D> ActionSolver<'d, D>
where
    D: DriftField + ?Sized,
{
    /// Validate inputs and build the straight-line initial path.
    ///
    /// # Errors
    /// - Option errors from [`PathOptions::validate`].
    /// - [`PathError::EmptyState`] for zero-dimensional boundary points.
    /// - [`PathError::DimensionMismatch`] when `x0` and `x1` differ in length.
    /// - [`PathError::NonFiniteInput`] for a non-finite boundary entry
    ///   (row 0 for `x0`, row 1 for `x1`).
    pub fn new(
        drift: &'d D, x0: ArrayView1<'_, f64>, x1: ArrayView1<'_, f64>, opts: PathOptions,
    ) -> ActionResult<Self> {
        opts.validate()?;
        let d = x0.len();
        if d == 0 {
            return Err(PathError::EmptyState);
        }
        if x1.len() != d {
            return Err(PathError::DimensionMismatch { expected: d, found: x1.len() });
        }
        for (row, x) in [x0.view(), x1.view()].into_iter().enumerate() {
            if let Some((col, value)) = first_non_finite(x) {
                return Err(PathError::NonFiniteInput { row, col, value });
            }
        }

        let last = opts.n_points - 1;
        let mut path = Array2::from_shape_fn((opts.n_points, d), |(t, i)| {
            let s = t as f64 / last as f64;
            x0[i] + s * (x1[i] - x0[i])
        });
        path.row_mut(0).assign(&x0);
        path.row_mut(last).assign(&x1);

        Ok(Self {
            drift,
            opts,
            scratch: path.clone(),
            path,
            b: Array1::zeros(d),
            iterations: 0,
        })
    }

    /// One Jacobi update of every interior point.
    ///
    /// # Errors
    /// [`PathError::DriftLengthMismatch`] from drift evaluation; the path is
    /// left at the previous iterate.
    pub fn step(&mut self) -> ActionResult<()> {
        let h = self.opts.stepsize;
        for t in 1..self.path.nrows() - 1 {
            let here = self.path.row(t);
            eval_drift_into(self.drift, here, self.b.view_mut())?;
            Zip::from(self.scratch.row_mut(t))
                .and(self.path.row(t - 1))
                .and(here)
                .and(self.path.row(t + 1))
                .and(&self.b)
                .for_each(|out, &prev, &cur, &next, &bt| {
                    *out = cur + h * ((next - cur) - (cur - prev) - bt);
                });
        }
        mem::swap(&mut self.path, &mut self.scratch);
        self.iterations += 1;
        Ok(())
    }

    /// Current path.
    pub fn path(&self) -> ArrayView2<'_, f64> {
        self.path.view()
    }

    /// Number of completed iterations.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Action of the current path.
    ///
    /// # Errors
    /// [`PathError::DriftLengthMismatch`] from drift evaluation.
    pub fn action(&self) -> ActionResult<f64> {
        action_of(self.path.view(), self.drift, self.opts.dt)
    }

    /// Run the remaining iterations up to `niter` and return path and action.
    ///
    /// # Errors
    /// As [`ActionSolver::step`] and [`ActionSolver::action`].
    pub fn run(mut self) -> ActionResult<PathResult> {
        #[cfg(feature = "obs_slog")]
        let logger = self.opts.verbose.then(crate::utils::term_logger);

        while self.iterations < self.opts.niter {
            self.step()?;
            #[cfg(feature = "obs_slog")]
            {
                if let Some(logger) = &logger {
                    if self.iterations % self.opts.log_every == 0 {
                        let action = self.action()?;
                        slog::debug!(logger, "path iteration";
                            "iteration" => self.iterations,
                            "action" => action
                        );
                    }
                }
            }
        }

        let action = self.action()?;
        #[cfg(feature = "obs_slog")]
        {
            if let Some(logger) = &logger {
                slog::info!(logger, "minimum action path finished";
                    "n_points" => self.opts.n_points,
                    "niter" => self.iterations,
                    "action" => action
                );
            }
        }
        Ok(PathResult { path: self.path, action })
    }
}

/// Approximate minimum-action path from `x0` to `x1` under `drift`.
///
/// # Errors
/// As [`ActionSolver::new`] and [`ActionSolver::run`].
pub fn minimum_action_path<D>(
    drift: &D, x0: ArrayView1<'_, f64>, x1: ArrayView1<'_, f64>, opts: &PathOptions,
) -> ActionResult<PathResult>
where
    D: DriftField + ?Sized,
{
    ActionSolver::new(drift, x0, x1, *opts)?.run()
}

/// Quasipotential estimate `V(x0 → x1)`: the action of [`minimum_action_path`].
///
/// A local estimate; see the module notes.
///
/// # Errors
/// As [`minimum_action_path`].
pub fn quasipotential<D>(
    drift: &D, x0: ArrayView1<'_, f64>, x1: ArrayView1<'_, f64>, opts: &PathOptions,
) -> ActionResult<f64>
where
    D: DriftField + ?Sized,
{
    Ok(minimum_action_path(drift, x0, x1, opts)?.action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Boundary points held exactly before and after every iteration.
    // - The double-well sanity case and a pinned value of the update rule.
    // - Scalar drift broadcast in two dimensions.
    // - Entry validation.
    // -------------------------------------------------------------------------

    fn double_well(x: ArrayView1<'_, f64>) -> Array1<f64> {
        x.mapv(|v| v - v * v * v)
    }

    #[test]
    // Purpose
    // -------
    // Endpoints never move, checked around every single step.
    //
    // Given
    // -----
    // - A 2-D rotational (non-conservative) drift, T = 25, 30 iterations.
    //
    // Expect
    // ------
    // - path[0] == x0 and path[T−1] == x1 exactly before and after each step.
    fn endpoints_hold_before_and_after_each_step() {
        // Arrange
        let rotation = |x: ArrayView1<'_, f64>| array![-x[1] - x[0], x[0] - x[1]];
        let x0 = array![0.1, -0.7];
        let x1 = array![1.3, 0.4];
        let opts = PathOptions { n_points: 25, niter: 30, ..PathOptions::default() };
        let mut solver = ActionSolver::new(&rotation, x0.view(), x1.view(), opts)
            .expect("valid inputs");

        // Act / Assert
        for _ in 0..opts.niter {
            assert_eq!(solver.path().row(0), x0.view());
            assert_eq!(solver.path().row(24), x1.view());
            solver.step().expect("drift has matching length");
            assert_eq!(solver.path().row(0), x0.view());
            assert_eq!(solver.path().row(24), x1.view());
        }
        assert_eq!(solver.iterations(), 30);
    }

    #[test]
    // Purpose
    // -------
    // Double-well transition from −1 to 1 with default settings.
    //
    // Given
    // -----
    // - b(x) = x − x³, T = 100, dt = 0.01, niter = 10, stepsize = 0.05.
    //
    // Expect
    // ------
    // - One column, exact endpoints, finite non-negative action.
    // - Action equals the value produced by this exact update rule.
    fn double_well_quasipotential_sanity() {
        // Arrange
        let opts = PathOptions::default();

        // Act
        let (x0, x1) = (array![-1.0], array![1.0]);
        let result = minimum_action_path(&double_well, x0.view(), x1.view(), &opts)
            .expect("valid inputs");

        // Assert
        assert_eq!(result.path.dim(), (100, 1));
        assert_eq!(result.path[[0, 0]], -1.0);
        assert_eq!(result.path[[99, 0]], 1.0);
        assert!(result.action.is_finite() && result.action >= 0.0);
        assert_abs_diff_eq!(result.action, 2.5143208907, epsilon = 1e-8);
    }

    #[test]
    fn zero_drift_keeps_the_straight_line() {
        let zero = |_: ArrayView1<'_, f64>| array![0.0];
        let opts = PathOptions { n_points: 11, niter: 50, ..PathOptions::default() };
        let start = ActionSolver::new(&zero, array![0.0, 0.0].view(), array![1.0, 2.0].view(), opts)
            .expect("valid inputs");
        let initial = start.path().to_owned();
        let result = start.run().expect("scalar drift broadcasts");
        for (a, b) in result.path.iter().zip(initial.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn quasipotential_matches_path_action() {
        let opts = PathOptions { n_points: 40, ..PathOptions::default() };
        let (a, b) = (array![-1.0], array![0.5]);
        let v = quasipotential(&double_well, a.view(), b.view(), &opts).expect("valid");
        let full = minimum_action_path(&double_well, a.view(), b.view(), &opts).expect("valid");
        assert_eq!(v, full.action);
    }

    #[test]
    fn invalid_entry_conditions() {
        let opts = PathOptions::default();
        assert!(matches!(
            ActionSolver::new(&double_well, array![0.0].view(), array![0.0, 1.0].view(), opts),
            Err(PathError::DimensionMismatch { expected: 1, found: 2 })
        ));
        let short = PathOptions { n_points: 2, ..opts };
        assert!(matches!(
            ActionSolver::new(&double_well, array![0.0].view(), array![1.0].view(), short),
            Err(PathError::TooFewPoints { n_points: 2 })
        ));
        assert!(matches!(
            ActionSolver::new(&double_well, array![0.0].view(), array![f64::INFINITY].view(), opts),
            Err(PathError::NonFiniteInput { row: 1, col: 0, .. })
        ));

        let wrong = |_: ArrayView1<'_, f64>| array![0.0, 0.0, 0.0];
        let (a, b) = (array![0.0, 0.0], array![1.0, 1.0]);
        let err = minimum_action_path(&wrong, a.view(), b.view(), &opts)
            .expect_err("three components for a 2-D state");
        assert_eq!(err, PathError::DriftLengthMismatch { expected: 2, found: 3 });
    }
}
