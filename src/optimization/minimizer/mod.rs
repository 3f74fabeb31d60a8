//! minimizer — black-box minimization backed by argmin.
//!
//! Purpose
//! -------
//! Provide the [`Minimizer`] seam used by the variational fitter, together
//! with an argmin-backed default ([`ArgminMinimizer`]) that runs either
//! L-BFGS on finite-difference gradients or derivative-free Nelder–Mead.
//!
//! Key behaviors
//! -------------
//! - Accept any `Fn(&Theta) -> OptResult<Cost>` closure as the objective.
//! - Validate starting points and configuration before building a solver.
//! - Normalize termination into a [`MinimizeOutcome`] with an integer status
//!   code. Hitting the iteration cap is a status, not an error.
//!
//! Conventions
//! -----------
//! - Objectives are minimized. Maximizers negate before calling in.
//! - Gradients, when needed, are finite differences of the cost; objectives
//!   never supply analytic gradients.
//!
//! Testing notes
//! -------------
//! - `traits`: option validation and status mapping.
//! - `adapter`: cost passthrough and FD gradient fallbacks.
//! - `builders`: solver construction with and without tolerances.
//! - `api`: end-to-end runs on a quadratic bowl for every solver family.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

pub use api::{ArgminMinimizer, minimize};
pub use traits::{
    LineSearcher, MinimizeOutcome, Minimizer, MinimizerOptions, STATUS_CONVERGED,
    STATUS_INTERRUPTED, STATUS_MAX_ITERS, STATUS_NOT_TERMINATED, STATUS_SOLVER_EXIT,
    STATUS_TIMEOUT, SolverMethod, Tolerances,
};
pub use types::{Cost, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::{ArgminMinimizer, minimize};
    pub use super::traits::{
        LineSearcher, MinimizeOutcome, Minimizer, MinimizerOptions, SolverMethod, Tolerances,
    };
    pub use super::types::{Cost, Theta};
}
