//! Adapter that exposes a plain objective closure as an `argmin` problem.
//!
//! The closure `f(θ) -> OptResult<Cost>` is the cost itself; no sign flip
//! happens here. Gradients are always finite differences of the cost, since
//! objectives reaching this layer are black boxes (and frequently stochastic).
use std::cell::RefCell;

use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::{
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges an objective closure to `argmin`'s `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` returns `f(θ)` and rejects non-finite values.
/// - `Gradient::gradient` returns a central-difference gradient of the cost.
///   A failed stencil evaluation is returned as is, never re-sampled.
pub struct ObjectiveAdapter<'a, F>
where
    F: Fn(&Theta) -> OptResult<Cost>,
{
    pub f: &'a F,
}

impl<'a, F> ObjectiveAdapter<'a, F>
where
    F: Fn(&Theta) -> OptResult<Cost>,
{
    /// Construct a new adapter over an objective closure.
    pub fn new(f: &'a F) -> Self {
        Self { f }
    }
}

impl<F> CostFunction for ObjectiveAdapter<'_, F>
where
    F: Fn(&Theta) -> OptResult<Cost>,
{
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `f(θ)`.
    ///
    /// # Errors
    /// - Propagates any `OptError` from the objective via `?`.
    /// - Returns `NonFiniteCost` if the value is `NaN` or infinite.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = (self.f)(theta)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(output)
    }
}

impl<F> Gradient for ObjectiveAdapter<'_, F>
where
    F: Fn(&Theta) -> OptResult<Cost>,
{
    type Param = Theta;
    type Gradient = Grad;

    /// Central-difference gradient of the cost at `θ`.
    ///
    /// The FD closure must return `f64`, so the first failed evaluation is
    /// parked in `closure_err` and the closure returns `NaN`. That error is
    /// surfaced once the stencil completes.
    ///
    /// # Errors
    /// - The first objective error hit by the stencil.
    /// - `InvalidGradient` if the differences are not finite.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let cost_func = |theta: &Theta| -> f64 {
            match self.cost(theta) {
                Ok(val) => val,
                Err(e) => {
                    let mut slot = closure_err.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                    f64::NAN
                }
            }
        };
        let fd_grad = theta.central_diff(&cost_func);
        if let Some(err) = closure_err.take() {
            return Err(err);
        }
        validate_grad(&fd_grad, theta.len())?;
        Ok(fd_grad)
    }
}
