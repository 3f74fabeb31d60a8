//! variational — ELBO estimation and flow fitting against categorical data.
//!
//! Purpose
//! -------
//! Given a flow family, a likelihood `p(x | z)` over finitely many
//! categories, and an observed category distribution, estimate and maximize
//!
//! ```text
//! ELBO(θ) = E_q[ln p(x|z)] + E_q[ln p(z)] − E_q[ln q(z)]
//! ```
//!
//! by Monte Carlo over the flow's own draws.
//!
//! Key behaviors
//! -------------
//! - `elbo`: the estimator, with the 1e−12 probability floor and optional
//!   rayon evaluation of draws.
//! - `fit`: fixed variants are evaluated once; trainable variants are
//!   optimized through the [`Minimizer`](crate::optimization::minimizer::Minimizer)
//!   seam and the status code is passed through.
//! - `options`: `FitOptions` with documented defaults, resolved once.
//! - `validation`: probability-vector and Monte Carlo checks at entry.
//!
//! Testing notes
//! -------------
//! - A mock minimizer verifies that status codes are surfaced verbatim.
//! - The identity flow pins the estimator to a closed-form value.

pub mod elbo;
pub mod errors;
pub mod fit;
pub mod likelihood;
pub mod options;
pub mod validation;

pub use elbo::elbo_flow;
pub use errors::{VIError, VIResult};
pub use fit::{FitResult, fit_flow_variational, fit_flow_variational_with};
pub use likelihood::Likelihood;
pub use options::{DEFAULT_NMC, DEFAULT_SEED, FitOptions, ResolvedFitOptions};

pub mod prelude {
    pub use super::elbo::elbo_flow;
    pub use super::errors::{VIError, VIResult};
    pub use super::fit::{FitResult, fit_flow_variational, fit_flow_variational_with};
    pub use super::likelihood::Likelihood;
    pub use super::options::FitOptions;
}
