//! paths::action — the discrete Freidlin–Wentzell action functional.
//!
//! For a path `φ_0, …, φ_{T−1}` sampled at spacing `dt`,
//!
//! ```text
//! I[φ] = (dt/2) · Σ_{t=0}^{T−2} ‖ (φ_{t+1} − φ_t)/dt − b(φ_t) ‖²
//! ```
//!
//! The drift is evaluated at the left end of each increment. The action is
//! non-negative whenever it is finite.
use ndarray::{Array1, ArrayView2};

use crate::{
    paths::{
        drift::{DriftField, eval_drift_into},
        errors::{ActionResult, PathError},
    },
    utils::first_non_finite_2d,
};

/// Discrete action of an arbitrary `T × d` path under `drift`.
///
/// # Errors
/// - [`PathError::InvalidDt`] unless `dt` is finite and positive.
/// - [`PathError::PathTooShort`] for fewer than two rows.
/// - [`PathError::EmptyState`] for zero columns.
/// - [`PathError::NonFiniteInput`] for a NaN or infinite path entry.
/// - [`PathError::DriftLengthMismatch`] from drift evaluation.
///
/// # Examples
/// ```
/// use ndarray::{Array2, ArrayView1};
/// use rust_rare_events::paths::fw_action;
///
/// // Zero drift, unit-speed straight line from 0 to 1 in unit time.
/// let path = Array2::from_shape_fn((11, 1), |(t, _)| t as f64 / 10.0);
/// let zero = |_: ArrayView1<'_, f64>| ndarray::array![0.0];
/// let action = fw_action(path.view(), &zero, 0.1).unwrap();
/// assert!((action - 0.5).abs() < 1e-12);
/// ```
pub fn fw_action<D>(path: ArrayView2<'_, f64>, drift: &D, dt: f64) -> ActionResult<f64>
where
    D: DriftField + ?Sized,
{
    validate_dt(dt)?;
    if path.nrows() < 2 {
        return Err(PathError::PathTooShort { rows: path.nrows() });
    }
    if path.ncols() == 0 {
        return Err(PathError::EmptyState);
    }
    if let Some((row, col, value)) = first_non_finite_2d(path) {
        return Err(PathError::NonFiniteInput { row, col, value });
    }
    action_of(path, drift, dt)
}

/// Action of an already-validated path.
pub(crate) fn action_of<D>(path: ArrayView2<'_, f64>, drift: &D, dt: f64) -> ActionResult<f64>
where
    D: DriftField + ?Sized,
{
    let mut b = Array1::<f64>::zeros(path.ncols());
    let mut total = 0.0;
    for t in 0..path.nrows() - 1 {
        let here = path.row(t);
        eval_drift_into(drift, here, b.view_mut())?;
        let next = path.row(t + 1);
        total += next
            .iter()
            .zip(here.iter())
            .zip(b.iter())
            .map(|((&x1, &x0), &bt)| {
                let r = (x1 - x0) / dt - bt;
                r * r
            })
            .sum::<f64>();
    }
    Ok(0.5 * dt * total)
}

pub(crate) fn validate_dt(dt: f64) -> ActionResult<()> {
    if dt.is_finite() && dt > 0.0 { Ok(()) } else { Err(PathError::InvalidDt { dt }) }
}
