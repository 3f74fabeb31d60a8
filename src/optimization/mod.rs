//! optimization — black-box minimizer, numerical helpers, and error surface.
//!
//! Purpose
//! -------
//! Provide the optimization layer the variational fitter sits on: a narrow
//! [`Minimizer`](minimizer::Minimizer) seam with an argmin-backed default,
//! the guarded scalar transforms shared by the flows, and a single error
//! enum for everything that can go wrong while minimizing.
//!
//! Key behaviors
//! -------------
//! - `minimizer`: minimize any `Fn(&Theta) -> OptResult<Cost>` with L-BFGS
//!   (finite-difference gradients) or Nelder–Mead, reporting an integer
//!   termination status.
//! - `numerical_stability`: logistic/logit, softmax, floored logs, and the
//!   standard-normal log density.
//! - `errors`: [`OptError`](errors::OptError) and the `OptResult<T>` alias,
//!   including recovery of objective errors that travelled through argmin.
//!
//! Conventions
//! -----------
//! - Costs are minimized. The fitter hands over `−ELBO`.
//! - Parameters are `ndarray::Array1<f64>` (`Theta`).
//! - Failing entrypoints return `OptResult<T>`; callers never see raw argmin
//!   errors.
//! - Logging happens only behind the `obs_slog` feature and only when the
//!   caller asks for it via `verbose`.
//!
//! Downstream usage
//! ----------------
//! - `variational::fit` implements its objective as a closure and drives it
//!   through a `Minimizer`.
//! - `flows` and `variational::elbo` use `numerical_stability` for every
//!   probability-to-log conversion.

pub mod errors;
pub mod minimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::minimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
