//! flows::autoregressive — K chained affine autoregressive steps.
//!
//! Purpose
//! -------
//! Trainable d-dimensional flow. Each step maps its input `x` to `y` with
//!
//! ```text
//! s_i = tanh(a_i + Σ_{j<i} A_ij·x_j)
//! t_i = c_i + Σ_{j<i} C_ij·x_j
//! y_i = exp(s_i)·x_i + t_i
//! ```
//!
//! and contributes `Σ_i s_i` to the log-determinant.
//!
//! Invariants
//! ----------
//! - `s_i` and `t_i` read only inputs `j < i` of the *same* step, so each
//!   step has a lower-triangular Jacobian with diagonal `exp(s_i)`.
//! - Steps are chained without permutation. Output dimension `i` therefore
//!   depends only on base dimensions `≤ i`, and the total log-determinant is
//!   the sum over steps.
//! - `tanh` bounds each log-scale to `(−1, 1)`, so one step can stretch a
//!   coordinate by at most a factor of `e`.
//!
//! Conventions
//! -----------
//! θ is laid out by [`AutoregressiveLayout`]. With θ = 0 the flow is the
//! identity.
use ndarray::{Array1, ArrayView1, ArrayViewMut1, s};

use crate::flows::{
    errors::{FlowKind, FlowResult},
    layout::{AutoregressiveLayout, check_theta},
};

#[derive(Debug, Clone, PartialEq)]
pub struct AutoregressiveFlow {
    layout: AutoregressiveLayout,
    theta: Array1<f64>,
}

impl AutoregressiveFlow {
    /// Build a `dim`-dimensional flow with `steps` affine steps.
    ///
    /// # Errors
    /// - Layout errors for `dim == 0` or `steps == 0`.
    /// - `ParamLengthMismatch` unless `theta.len() == steps·(2d + d(d − 1))`.
    /// - `NonFiniteParam` for any NaN or infinite entry.
    pub fn new(dim: usize, steps: usize, theta: Array1<f64>) -> FlowResult<Self> {
        let layout = AutoregressiveLayout::new(dim, steps)?;
        check_theta(FlowKind::Autoregressive, theta.view(), layout.n_params())?;
        Ok(Self { layout, theta })
    }

    /// Identity flow (θ = 0) with the given structure.
    pub fn identity(dim: usize, steps: usize) -> FlowResult<Self> {
        let layout = AutoregressiveLayout::new(dim, steps)?;
        Ok(Self { layout, theta: Array1::zeros(layout.n_params()) })
    }

    pub fn layout(&self) -> &AutoregressiveLayout {
        &self.layout
    }

    pub fn theta(&self) -> ArrayView1<'_, f64> {
        self.theta.view()
    }

    /// Push one base draw through all steps; writes `zK` into `out` and
    /// returns `ln|det J|`.
    pub(crate) fn forward_row(
        &self, z: ArrayView1<'_, f64>, mut out: ArrayViewMut1<'_, f64>,
    ) -> f64 {
        let d = self.layout.dim();
        let mut x = z.to_vec();
        let mut y = vec![0.0; d];
        let mut logdet = 0.0;
        for k in 0..self.layout.steps() {
            let step = self.layout.step(self.theta.view(), k);
            for i in 0..d {
                let row = AutoregressiveLayout::row_range(i);
                let scale_row = step.scale_weights.slice(s![row.clone()]);
                let shift_row = step.shift_weights.slice(s![row]);
                let mut s_pre = step.scale_bias[i];
                let mut t = step.shift_bias[i];
                for (j, (&a, &c)) in scale_row.iter().zip(shift_row.iter()).enumerate() {
                    s_pre += a * x[j];
                    t += c * x[j];
                }
                let s = s_pre.tanh();
                y[i] = s.exp() * x[i] + t;
                logdet += s;
            }
            std::mem::swap(&mut x, &mut y);
        }
        out.iter_mut().zip(&x).for_each(|(o, &v)| *o = v);
        logdet
    }
}
