//! optimization::errors — unified error surface for the minimizer layer.
//!
//! Purpose
//! -------
//! Collect every failure the black-box minimizer can report (configuration
//! mistakes, non-finite objective values, backend solver errors) into a
//! single enum with a common result alias, so callers never see raw argmin
//! errors.
//!
//! Conventions
//! -----------
//! - Objective closures report their own failures as [`OptError`]; when such
//!   an error travels through argmin it is recovered intact by the
//!   `From<argmin::core::Error>` conversion below.
//! - Messages are phrased in terms of the violated constraint.
use argmin::core::{ArgminError, Error};

/// Result alias for the minimizer layer.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// Finite-difference gradient length differs from `θ`.
    GradientDimMismatch { expected: usize, found: usize },

    /// A finite-difference gradient entry is NaN or infinite.
    InvalidGradient { index: usize, value: f64, reason: &'static str },

    // ---- MinimizerOptions ----
    /// `tol_grad` must be finite and > 0.
    InvalidTolGrad { tol: f64, reason: &'static str },
    /// `tol_cost` must be finite and > 0.
    InvalidTolCost { tol: f64, reason: &'static str },
    /// `max_iter` must be at least 1.
    InvalidMaxIter { max_iter: usize, reason: &'static str },
    /// Every stopping rule was left unset.
    NoTolerancesProvided,
    /// Line-search name not recognized.
    InvalidLineSearch { name: String, reason: &'static str },
    /// L-BFGS history length must be at least 1.
    InvalidLBFGSMem { mem: usize, reason: &'static str },
    /// Nelder–Mead simplex edge length needs to be positive and finite.
    InvalidSimplexStep { step: f64, reason: &'static str },

    // ---- Objective ----
    /// Objective returned a non-finite value.
    NonFiniteCost { value: f64 },
    /// Objective failed for a reason outside the optimizer's control.
    ObjectiveFailed { text: String },

    // ---- Parameters ----
    /// Initial parameter vector is empty.
    EmptyTheta,
    /// Initial parameter vector contains a non-finite entry.
    InvalidThetaInput { index: usize, value: f64 },
    /// Solver returned a non-finite parameter.
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },
    /// Solver finished without a best parameter vector.
    MissingThetaHat,

    // ---- Argmin ----
    /// argmin rejected a solver setting.
    InvalidParameter { text: String },
    NotImplemented { text: String },
    NotInitialized { text: String },
    ConditionViolated { text: String },
    CheckPointNotFound { text: String },
    PotentialBug { text: String },
    ImpossibleError { text: String },
    /// Any other error raised inside argmin.
    BackendError { text: String },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient has {found} entries, parameter vector has {expected}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Gradient entry {index} is {value}: {reason}")
            }

            // ---- MinimizerOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "tol_grad = {tol} rejected: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "tol_cost = {tol} rejected: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "max_iter = {max_iter} rejected: {reason}")
            }
            OptError::NoTolerancesProvided => write!(f, "Set at least one of tol_grad, tol_cost, max_iter"),
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Unknown line search '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "L-BFGS memory {mem} rejected: {reason}")
            }
            OptError::InvalidSimplexStep { step, reason } => {
                write!(f, "Invalid Nelder-Mead simplex step {step}: {reason}")
            }

            // ---- Objective ----
            OptError::NonFiniteCost { value } => write!(f, "Non-finite cost value: {value}"),
            OptError::ObjectiveFailed { text } => write!(f, "Objective evaluation failed: {text}"),

            // ---- Parameters ----
            OptError::EmptyTheta => write!(f, "Initial parameter vector is empty"),
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "Starting point entry {index} is {value}; it must be finite")
            }
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Solver returned {value} at index {index}: {reason}")
            }
            OptError::MissingThetaHat => write!(f, "Solver finished without a best parameter vector"),

            // ---- Argmin ----
            OptError::InvalidParameter { text } => write!(f, "Invalid parameter: {text}"),
            OptError::NotImplemented { text } => write!(f, "Not implemented: {text}"),
            OptError::NotInitialized { text } => write!(f, "Not initialized: {text}"),
            OptError::ConditionViolated { text } => write!(f, "Condition violated: {text}"),
            OptError::CheckPointNotFound { text } => write!(f, "Checkpoint not found: {text}"),
            OptError::PotentialBug { text } => write!(f, "Potential bug: {text}"),
            OptError::ImpossibleError { text } => write!(f, "Impossible error: {text}"),
            OptError::BackendError { text } => write!(f, "Backend error: {text}"),

            // ---- Fallback ----
            OptError::UnknownError => write!(f, "Unknown error"),
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        // Errors raised by our own objective come back first.
        let err = match original_err.downcast::<OptError>() {
            Ok(ours) => return ours,
            Err(err) => err,
        };
        match err.downcast::<ArgminError>() {
            Ok(native) => match native {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(other) => OptError::BackendError { text: other.to_string() },
        }
    }
}
