//! Typed parameter layouts for the trainable flows.
//!
//! A layout is computed once from `(d, K)` and hands out named views into a
//! flat parameter vector, so variant code never does index arithmetic on θ.
//!
//! Autoregressive (K steps, `P = 2d + d(d − 1)` entries per step):
//!
//! ```text
//! θ[k·P .. (k+1)·P] = [ scale_bias (d) | shift_bias (d) |
//!                       scale_weights (d(d−1)/2) | shift_weights (d(d−1)/2) ]
//! ```
//!
//! Weights are strictly-lower-triangular and packed row-major: row `i` holds
//! the coefficients on inputs `0..i` and starts at offset `i(i − 1)/2`.
//!
//! Spline (K bins per dimension, `2K` entries per dimension):
//!
//! ```text
//! θ[2K·i .. 2K·(i+1)] = [ width_logits (K) | height_logits (K) ]
//! ```
use std::ops::Range;

use ndarray::{ArrayView1, s};

use crate::flows::errors::{FlowError, FlowKind, FlowResult};

/// Layout of an autoregressive flow with `steps` affine steps in `dim` dims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoregressiveLayout {
    dim: usize,
    steps: usize,
}

/// Views into one autoregressive step.
#[derive(Debug, Clone, Copy)]
pub struct AutoregressiveStep<'a> {
    pub scale_bias: ArrayView1<'a, f64>,
    pub shift_bias: ArrayView1<'a, f64>,
    pub scale_weights: ArrayView1<'a, f64>,
    pub shift_weights: ArrayView1<'a, f64>,
}

impl AutoregressiveLayout {
    /// # Errors
    /// - [`FlowError::InvalidDimension`] if `dim == 0`.
    /// - [`FlowError::InvalidStructure`] if `steps == 0`.
    pub fn new(dim: usize, steps: usize) -> FlowResult<Self> {
        if dim == 0 {
            return Err(FlowError::InvalidDimension { dim, reason: "Dimension must be positive." });
        }
        if steps == 0 {
            return Err(FlowError::InvalidStructure {
                kind: FlowKind::Autoregressive,
                count: steps,
                reason: "Number of steps must be positive.",
            });
        }
        Ok(Self { dim, steps })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of strictly-lower-triangular weights per matrix, `d(d − 1)/2`.
    pub fn n_weights(&self) -> usize {
        self.dim * (self.dim - 1) / 2
    }

    /// Entries per step, `2d + d(d − 1)`.
    pub fn per_step(&self) -> usize {
        2 * self.dim + 2 * self.n_weights()
    }

    /// Total parameter count, `K·(2d + d(d − 1))`.
    pub fn n_params(&self) -> usize {
        self.steps * self.per_step()
    }

    /// Range of row `i` inside a packed weight block.
    #[inline]
    pub fn row_range(i: usize) -> Range<usize> {
        let start = i * i.saturating_sub(1) / 2;
        start..start + i
    }

    /// Views of step `k`. `theta` must already have length [`Self::n_params`].
    pub fn step<'a>(&self, theta: ArrayView1<'a, f64>, k: usize) -> AutoregressiveStep<'a> {
        let d = self.dim;
        let w = self.n_weights();
        let base = k * self.per_step();
        AutoregressiveStep {
            scale_bias: theta.slice_move(s![base..base + d]),
            shift_bias: theta.slice_move(s![base + d..base + 2 * d]),
            scale_weights: theta.slice_move(s![base + 2 * d..base + 2 * d + w]),
            shift_weights: theta.slice_move(s![base + 2 * d + w..base + 2 * d + 2 * w]),
        }
    }
}

/// Layout of a spline flow with `bins` bins in each of `dim` dims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplineLayout {
    dim: usize,
    bins: usize,
}

/// Views into one dimension's spline logits.
#[derive(Debug, Clone, Copy)]
pub struct SplineDim<'a> {
    pub width_logits: ArrayView1<'a, f64>,
    pub height_logits: ArrayView1<'a, f64>,
}

impl SplineLayout {
    /// # Errors
    /// - [`FlowError::InvalidDimension`] if `dim == 0`.
    /// - [`FlowError::InvalidStructure`] if `bins == 0`.
    pub fn new(dim: usize, bins: usize) -> FlowResult<Self> {
        if dim == 0 {
            return Err(FlowError::InvalidDimension { dim, reason: "Dimension must be positive." });
        }
        if bins == 0 {
            return Err(FlowError::InvalidStructure {
                kind: FlowKind::Spline,
                count: bins,
                reason: "Number of bins must be positive.",
            });
        }
        Ok(Self { dim, bins })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Total parameter count, `2·K·d`.
    pub fn n_params(&self) -> usize {
        2 * self.bins * self.dim
    }

    /// Views of dimension `i`. `theta` must already have length [`Self::n_params`].
    pub fn dim_params<'a>(&self, theta: ArrayView1<'a, f64>, i: usize) -> SplineDim<'a> {
        let k = self.bins;
        let base = 2 * k * i;
        SplineDim {
            width_logits: theta.slice_move(s![base..base + k]),
            height_logits: theta.slice_move(s![base + k..base + 2 * k]),
        }
    }
}

/// Check `theta` against an expected length and finiteness.
///
/// # Errors
/// - [`FlowError::ParamLengthMismatch`] on a length mismatch.
/// - [`FlowError::NonFiniteParam`] for the first non-finite entry.
pub fn check_theta(kind: FlowKind, theta: ArrayView1<'_, f64>, expected: usize) -> FlowResult<()> {
    if theta.len() != expected {
        return Err(FlowError::ParamLengthMismatch { kind, expected, found: theta.len() });
    }
    match crate::utils::first_non_finite(theta) {
        Some((index, value)) => Err(FlowError::NonFiniteParam { kind, index, value }),
        None => Ok(()),
    }
}
