//! The drift-field seam `b: R^d → R^d` and its broadcasting rule.
use ndarray::{Array1, ArrayView1, ArrayViewMut1};

use crate::paths::errors::{ActionResult, PathError};

/// Deterministic vector field of a diffusion `dX = b(X) dt + √ε dW`.
///
/// A drift may return either `d` components or a single component; a
/// single component is broadcast to every dimension. Any other length is
/// rejected when the drift is evaluated.
///
/// Closures `Fn(ArrayView1<f64>) -> Array1<f64> + Sync` implement this trait.
pub trait DriftField: Sync {
    fn drift(&self, x: ArrayView1<'_, f64>) -> Array1<f64>;
}

impl<F> DriftField for F
where
    F: Fn(ArrayView1<'_, f64>) -> Array1<f64> + Sync,
{
    fn drift(&self, x: ArrayView1<'_, f64>) -> Array1<f64> {
        self(x)
    }
}

/// Evaluate `drift` at `x` into `out`, broadcasting a scalar result.
///
/// # Errors
/// [`PathError::DriftLengthMismatch`] when the drift returns neither one
/// nor `x.len()` components.
pub(crate) fn eval_drift_into<D>(
    drift: &D, x: ArrayView1<'_, f64>, mut out: ArrayViewMut1<'_, f64>,
) -> ActionResult<()>
where
    D: DriftField + ?Sized,
{
    let b = drift.drift(x);
    match b.len() {
        n if n == out.len() => out.assign(&b),
        1 => out.fill(b[0]),
        found => return Err(PathError::DriftLengthMismatch { expected: out.len(), found }),
    }
    Ok(())
}
