//! The likelihood seam `p(x | z)` over a finite set of categories.
use ndarray::{Array1, ArrayView1};

/// Categorical likelihood `z ↦ pmf(z)`.
///
/// Implementors return a probability vector with one entry per category.
/// Outputs are validated on every call by the ELBO estimator, so a bad pmf
/// fails the estimate instead of being repaired.
///
/// `Sync` lets the estimator evaluate draws in parallel under the
/// `parallel` feature.
///
/// Any `Fn(ArrayView1<f64>) -> Array1<f64> + Sync` closure is a likelihood:
///
/// ```
/// use ndarray::{Array1, ArrayView1, array};
/// use rust_rare_events::variational::Likelihood;
///
/// let coin = |z: ArrayView1<'_, f64>| -> Array1<f64> {
///     let p = 1.0 / (1.0 + (-z[0]).exp());
///     array![1.0 - p, p]
/// };
/// assert_eq!(coin.pmf(array![0.0].view()), array![0.5, 0.5]);
/// ```
pub trait Likelihood: Sync {
    fn pmf(&self, z: ArrayView1<'_, f64>) -> Array1<f64>;
}

impl<F> Likelihood for F
where
    F: Fn(ArrayView1<'_, f64>) -> Array1<f64> + Sync,
{
    fn pmf(&self, z: ArrayView1<'_, f64>) -> Array1<f64> {
        self(z)
    }
}
