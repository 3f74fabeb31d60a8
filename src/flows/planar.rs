//! One-dimensional planar flow with fixed parameters.
//!
//! `zK = z0 + u·tanh(w·z0 + b)` with
//! `ln|J| = ln|1 + u·w·(1 − tanh²(w·z0 + b))|`.
//!
//! The map is invertible when `u·w ≥ −1`; this is not enforced, and a
//! non-invertible choice shows up as `−∞` log-determinants where the
//! derivative vanishes.
use ndarray::{Array1, ArrayView1, ArrayViewMut1, array};

use crate::flows::{
    errors::{FlowKind, FlowResult},
    layout::check_theta,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PlanarFlow {
    theta: Array1<f64>,
}

impl PlanarFlow {
    pub const N_PARAMS: usize = 3;

    /// # Errors
    /// [`FlowError::NonFiniteParam`](crate::flows::errors::FlowError::NonFiniteParam)
    /// if any scalar is NaN or infinite.
    pub fn new(u: f64, w: f64, b: f64) -> FlowResult<Self> {
        Self::from_theta(array![u, w, b])
    }

    /// Build from `θ = (u, w, b)`.
    pub fn from_theta(theta: Array1<f64>) -> FlowResult<Self> {
        check_theta(FlowKind::Planar, theta.view(), Self::N_PARAMS)?;
        Ok(Self { theta })
    }

    pub fn theta(&self) -> ArrayView1<'_, f64> {
        self.theta.view()
    }

    pub fn u(&self) -> f64 {
        self.theta[0]
    }

    pub fn w(&self) -> f64 {
        self.theta[1]
    }

    pub fn b(&self) -> f64 {
        self.theta[2]
    }

    /// Forward map of a scalar; returns `(zK, ln|J|)`.
    #[inline]
    pub fn map(&self, z: f64) -> (f64, f64) {
        let (u, w) = (self.u(), self.w());
        let h = (w * z + self.b()).tanh();
        let deriv = 1.0 + u * w * (1.0 - h * h);
        (z + u * h, deriv.abs().ln())
    }

    pub(crate) fn forward_row(
        &self, z: ArrayView1<'_, f64>, mut out: ArrayViewMut1<'_, f64>,
    ) -> f64 {
        let (zk, logdet) = self.map(z[0]);
        out[0] = zk;
        logdet
    }
}
