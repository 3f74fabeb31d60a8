//! flows — invertible transforms of a standard Gaussian with exact densities.
//!
//! Purpose
//! -------
//! Provide the variational families the fitter optimizes over. Each flow
//! maps base draws `z0 ~ N(0, I)` to `zK` and reports `ln q(zK)` through the
//! change-of-variables formula.
//!
//! | Variant | Dim | Trainable | Parameters |
//! |---|---|---|---|
//! | Planar | 1 | no | `(u, w, b)` |
//! | Radial | 1 | no | `(z_ref, α, β)`, `α > 0` |
//! | Autoregressive | d | yes | `K·(2d + d(d − 1))` |
//! | Spline | d | yes | `2·K·d` |
//!
//! Conventions
//! -----------
//! - Draws are `n × d` `ndarray` matrices, one draw per row.
//! - Flows are immutable; `with_theta` returns a new instance.
//! - Randomness is passed in as `&mut impl Rng` so callers control seeding.
//!
//! Downstream usage
//! ----------------
//! `variational::elbo` samples through [`FlowModel::sample_q`] and the fitter
//! rebuilds flows from candidate θ via [`FlowModel::with_theta`].

pub mod autoregressive;
pub mod errors;
pub mod layout;
pub mod model;
pub mod planar;
pub mod radial;
pub mod spline;

pub use errors::{FlowError, FlowKind, FlowResult};
pub use layout::{AutoregressiveLayout, SplineLayout};
pub use model::{FlowDensity, FlowModel, FlowSample, sample_base};

pub mod prelude {
    pub use super::errors::{FlowError, FlowKind, FlowResult};
    pub use super::model::{FlowDensity, FlowModel, FlowSample};
}
