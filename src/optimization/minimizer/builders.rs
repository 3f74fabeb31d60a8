//! minimizer::builders — argmin solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small, focused builders for the solvers the default minimizer can
//! run. These helpers hide argmin's generic wiring and apply crate-level
//! options (tolerances, L-BFGS memory, simplex size) so that higher-level
//! code can request a configured solver without touching argmin types.
//!
//! Conventions
//! -----------
//! - Builders do **not** set `max_iters`; that is applied by the runner.
//! - The Nelder–Mead builder needs `θ₀` because argmin takes the initial
//!   simplex at construction time.
//! - Errors are reported via [`OptResult`]; raw `argmin::core::Error` values
//!   never cross module boundaries.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    minimizer::{
        traits::MinimizerOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, NelderMeadSolver, Theta,
        },
    },
};

/// Construct L-BFGS with Hager–Zhang line search.
///
/// Consults `opts.lbfgs_mem` (defaulting to [`DEFAULT_LBFGS_MEM`]) and the
/// optional gradient/cost tolerances.
///
/// # Errors
/// Returns an `OptError` when argmin rejects a tolerance.
pub fn build_optimizer_hager_zhang(opts: &MinimizerOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Construct L-BFGS with More–Thuente line search.
///
/// # Errors
/// Returns an `OptError` when argmin rejects a tolerance.
pub fn build_optimizer_more_thuente(opts: &MinimizerOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Apply optional tolerances to an L-BFGS solver, regardless of line search.
///
/// When a tolerance is `None` the corresponding `with_tolerance_*` method is
/// not called and argmin's default stays in effect.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MinimizerOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

/// Construct a Nelder–Mead solver around `theta0`.
///
/// The initial simplex is `θ₀` plus `θ₀ + step·eᵢ` for each coordinate `i`,
/// with `step = opts.simplex_step`. When `opts.tols.tol_cost` is present it
/// becomes the standard-deviation tolerance on simplex values.
///
/// # Errors
/// Returns an `OptError` when argmin rejects the tolerance.
pub fn build_nelder_mead(theta0: &Theta, opts: &MinimizerOptions) -> OptResult<NelderMeadSolver> {
    let mut simplex = Vec::with_capacity(theta0.len() + 1);
    simplex.push(theta0.clone());
    for i in 0..theta0.len() {
        let mut vertex = theta0.clone();
        vertex[i] += opts.simplex_step;
        simplex.push(vertex);
    }
    let mut solver = NelderMeadSolver::new(simplex);
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_sd_tolerance(c)?;
    }
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        minimizer::traits::{LineSearcher, SolverMethod, Tolerances},
    };
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Construction of each solver family with and without optional settings.
    // End-to-end runs live in the `api` tests.
    // -------------------------------------------------------------------------

    fn opts_with(method: SolverMethod, mem: Option<usize>) -> MinimizerOptions {
        let tols =
            Tolerances::new(Some(1e-6), Some(1e-8), Some(50)).expect("Tolerances should be valid");
        MinimizerOptions::new(tols, method, mem, 0.1, false).expect("options should be valid")
    }

    #[test]
    fn lbfgs_builders_accept_default_and_explicit_memory() {
        let hz = opts_with(SolverMethod::Lbfgs(LineSearcher::HagerZhang), None);
        assert!(build_optimizer_hager_zhang(&hz).is_ok());
        let mt = opts_with(SolverMethod::Lbfgs(LineSearcher::MoreThuente), Some(11));
        assert!(build_optimizer_more_thuente(&mt).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // `configure_lbfgs` leaves the solver constructible when both gradient
    // and cost tolerances are `None`, relying on argmin defaults.
    fn configure_lbfgs_respects_absent_tolerances() {
        let raw = LBFGS::new(MoreThuenteLS::new(), DEFAULT_LBFGS_MEM);
        let tols = Tolerances::new(None, None, Some(50)).expect("Tolerances should be valid");
        let opts = MinimizerOptions::new(
            tols,
            SolverMethod::Lbfgs(LineSearcher::MoreThuente),
            None,
            0.1,
            false,
        )
        .expect("options should be valid");
        assert!(configure_lbfgs(raw, &opts).is_ok());
    }

    #[test]
    fn nelder_mead_builder_accepts_valid_tolerance() {
        let opts = opts_with(SolverMethod::NelderMead, None);
        assert!(build_nelder_mead(&array![0.0, 1.0, -2.0], &opts).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // A bypassed validation (negative tolerance set directly on the struct)
    // is still caught by argmin and surfaced as an `OptError`.
    fn nelder_mead_builder_surfaces_argmin_rejection() {
        let mut opts = opts_with(SolverMethod::NelderMead, None);
        opts.tols.tol_cost = Some(-1.0);
        let Err(err) = build_nelder_mead(&array![0.0], &opts) else {
            panic!("negative tolerance must be rejected");
        };
        assert!(matches!(err, OptError::InvalidParameter { .. }), "got {err:?}");
    }
}
