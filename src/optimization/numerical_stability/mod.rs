//! numerical_stability — guarded scalar transforms and shared tolerances.
//!
//! Purpose
//! -------
//! Collect the small, numerically delicate helpers the flows and the ELBO
//! estimator share: logistic/logit maps, a max-shifted softmax, a floored
//! logarithm, and the standard-normal log density. Centralizing them keeps
//! the probability floor and the spline clamp consistent across modules.
//!
//! Invariants & assumptions
//! ------------------------
//! - `PROB_FLOOR = 1e-12` is the only place probabilities are clamped before
//!   `ln`; nothing else in the crate silently repairs a probability.
//! - `LOGIT_EPS = 1e-10` bounds spline inputs away from exact 0/1.
//! - Non-finite inputs propagate; these helpers never panic.
//!
//! Conventions
//! -----------
//! Pure functions on `f64` and slices. No logging, no allocation except the
//! softmax output.

pub mod transformations;

pub use self::transformations::{
    LOGIT_EPS, PROB_FLOOR, floored_ln, safe_logistic, safe_logit, safe_softmax,
    std_normal_ln_pdf,
};

pub mod prelude {
    pub use super::transformations::{
        LOGIT_EPS, PROB_FLOOR, floored_ln, safe_logistic, safe_logit, safe_softmax,
        std_normal_ln_pdf,
    };
}
