//! rare_events — glue between large-deviation quantities and the fitter.
//!
//! - `stats`: [`kl_div`], [`sanov_prob`], [`girsanov_logratio`].
//! - `tilt`: [`TiltedLikelihood`], a base likelihood reweighted per category.
//! - `pipeline`: quasipotential- and Girsanov-tilted variational fits.

pub mod errors;
pub mod pipeline;
pub mod stats;
pub mod tilt;

pub use errors::{RareEventError, RareResult};
pub use pipeline::{TiltedFit, fit_girsanov_tilted, fit_quasipotential_tilted};
pub use stats::{girsanov_logratio, kl_div, sanov_prob};
pub use tilt::TiltedLikelihood;
