//! paths — Freidlin–Wentzell actions and minimum-action paths.
//!
//! Purpose
//! -------
//! Evaluate the discrete action of a trajectory under a drift field and
//! approximate minimum-action paths (and hence quasipotentials) between two
//! states by fixed-budget descent.
//!
//! Key behaviors
//! -------------
//! - `action`: [`fw_action`] on any `T × d` path.
//! - `solver`: [`ActionSolver`], [`minimum_action_path`], [`quasipotential`].
//! - `landscape`: [`quasipotential_landscape`] over a grid of targets.
//! - `drift`: the [`DriftField`] seam; scalar outputs broadcast to `d`.
//!
//! Independent of `flows` and `variational`; the `rare_events` glue feeds
//! quasipotentials from here into tilted likelihoods.

pub mod action;
pub mod drift;
pub mod errors;
pub mod landscape;
pub mod options;
pub mod solver;

pub use action::fw_action;
pub use drift::DriftField;
pub use errors::{ActionResult, PathError};
pub use landscape::quasipotential_landscape;
pub use options::PathOptions;
pub use solver::{ActionSolver, PathResult, minimum_action_path, quasipotential};

pub mod prelude {
    pub use super::action::fw_action;
    pub use super::drift::DriftField;
    pub use super::errors::{ActionResult, PathError};
    pub use super::options::PathOptions;
    pub use super::solver::{PathResult, minimum_action_path, quasipotential};
}
