//! rust_rare_events — normalizing flows, variational fitting, and
//! minimum-action paths for rare-event analysis.
//!
//! Purpose
//! -------
//! Serve as the crate root. Three numerical subsystems do the work:
//! invertible density transforms (`flows`), Monte Carlo ELBO fitting of those
//! transforms against categorical observations (`variational`), and the
//! discrete Freidlin–Wentzell action with a fixed-budget path solver
//! (`paths`). `rare_events` ties them together through closed-form
//! large-deviation statistics and tilted likelihoods.
//!
//! Key behaviors
//! -------------
//! - `flows`: planar, radial, autoregressive, and spline flows with exact
//!   log-densities.
//! - `variational`: ELBO estimation and fitting through a `Minimizer`.
//! - `optimization`: the argmin-backed minimizer and numerical guards.
//! - `paths`: action evaluation, minimum-action paths, quasipotentials.
//! - `rare_events`: KL/Sanov/Girsanov and tilted variational fits.
//!
//! Invariants & assumptions
//! ------------------------
//! - All randomness flows through caller-supplied or seeded `ChaCha8Rng`
//!   streams; results are reproducible for a fixed seed.
//! - Flow instances are immutable and `Send + Sync`.
//! - Inputs are validated at entry; each subtree reports through its own
//!   error enum (`FlowError`, `VIError`, `OptError`, `PathError`,
//!   `RareEventError`) with `From` conversions between layers.
//!
//! Conventions
//! -----------
//! - Vectors and matrices are `ndarray` types; draws and paths are stored one
//!   point per row.
//! - Optimizer non-convergence is an integer status, never an error.
//!
//! Features
//! --------
//! - `obs_slog` (default): structured `slog` records when options set
//!   `verbose`.
//! - `parallel`: rayon evaluation of ELBO draws and landscape grid points.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; `tests/` holds the end-to-end
//!   rare-event pipeline.

pub mod flows;
pub mod optimization;
pub mod paths;
pub mod rare_events;
pub mod utils;
pub mod variational;

pub mod prelude {
    pub use crate::flows::prelude::*;
    pub use crate::optimization::prelude::*;
    pub use crate::paths::prelude::*;
    pub use crate::rare_events::{
        RareEventError, RareResult, TiltedFit, TiltedLikelihood, fit_girsanov_tilted,
        fit_quasipotential_tilted, girsanov_logratio, kl_div, sanov_prob,
    };
    pub use crate::variational::prelude::*;
}
