//! Numerical stability utilities.
//!
//! Guarded forms of the nonlinear maps used by the flows and the ELBO
//! estimator. The logistic picks its branch by sign so `exp` never
//! overflows in `f64`.
//!
//! # Provided items
//! - [`PROB_FLOOR`]: lower bound applied to probabilities before `ln`.
//! - [`LOGIT_EPS`]: clamp margin keeping spline inputs inside `(0, 1)`.
//! - [`safe_logistic`] / [`safe_logit`]: ℝ ↔ (0, 1) without overflow.
//! - [`safe_softmax`]: max-shifted softmax of a logit slice.
//! - [`floored_ln`]: `ln(max(p, PROB_FLOOR))`.
//! - [`std_normal_ln_pdf`]: log density of `N(0, I)` at a point.
use statrs::consts::LN_SQRT_2PI;

/// Probabilities below this value are raised to it before taking a log.
pub const PROB_FLOOR: f64 = 1e-12;

/// Spline inputs are clamped to `[LOGIT_EPS, 1 − LOGIT_EPS]` before bin
/// lookup so the `ln(u(1 − u))` terms stay finite.
pub const LOGIT_EPS: f64 = 1e-10;

/// Numerically stable logistic: `σ(x) = 1 / (1 + exp(−x))`.
///
/// For negative `x` the equivalent form `exp(x) / (1 + exp(x))` is used so
/// that `exp` never overflows.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Inverse of [`safe_logistic`] on `(0, 1)`: `ln(p) − ln(1 − p)`.
///
/// Uses `ln_1p(−p)` for the second term to keep precision when `p` is small.
/// Inputs at or outside the endpoints return `±∞` or `NaN`, as `ln` does.
pub fn safe_logit(p: f64) -> f64 {
    p.ln() - (-p).ln_1p()
}

/// Max-shifted softmax of `logits`.
///
/// Returns an empty vector for empty input. Entries are non-negative and sum
/// to one whenever all logits are finite.
pub fn safe_softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut out: Vec<f64> = logits.iter().map(|&l| (l - max).exp()).collect();
    let total: f64 = out.iter().sum();
    out.iter_mut().for_each(|v| *v /= total);
    out
}

/// `ln(max(p, PROB_FLOOR))`.
///
/// `NaN` stays `NaN`; `f64::max` would otherwise replace it with the floor.
#[inline]
pub fn floored_ln(p: f64) -> f64 {
    if p.is_nan() { p } else { p.max(PROB_FLOOR).ln() }
}

/// Log density of the standard multivariate normal at `z`:
/// `−½‖z‖² − d·ln√(2π)`.
pub fn std_normal_ln_pdf<'a, I>(z: I) -> f64
where
    I: IntoIterator<Item = &'a f64>,
{
    z.into_iter().map(|&v| -0.5 * v * v - LN_SQRT_2PI).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Agreement with naive formulas on safe grids, tail behavior, and the
    // floor/NaN conventions. Higher-level invariants are tested in `flows`.
    // -------------------------------------------------------------------------

    #[test]
    fn logistic_matches_naive_formula_and_saturates() {
        for &x in &[-5.0_f64, -0.3, 0.0, 0.7, 4.0] {
            assert_relative_eq!(safe_logistic(x), 1.0 / (1.0 + (-x).exp()), epsilon = 1e-14);
        }
        assert!(safe_logistic(-800.0) >= 0.0);
        assert_relative_eq!(safe_logistic(800.0), 1.0);
    }

    #[test]
    // Purpose
    // -------
    // `safe_logit` inverts `safe_logistic` on a moderate grid.
    fn logit_inverts_logistic() {
        for &x in &[-12.0, -1.5, 0.0, 2.25, 9.0] {
            assert_relative_eq!(safe_logit(safe_logistic(x)), x, epsilon = 1e-9);
        }
    }

    #[test]
    fn softmax_sums_to_one_under_large_shifts() {
        let p = safe_softmax(&[1000.0, 1001.0, 999.0]);
        assert_relative_eq!(p.iter().sum::<f64>(), 1.0, epsilon = 1e-14);
        assert!(p[1] > p[0] && p[0] > p[2]);
        assert!(safe_softmax(&[]).is_empty());
    }

    #[test]
    fn floored_ln_clamps_zero_and_keeps_nan() {
        assert_relative_eq!(floored_ln(0.0), PROB_FLOOR.ln());
        assert_relative_eq!(floored_ln(0.5), 0.5f64.ln());
        assert!(floored_ln(f64::NAN).is_nan());
    }

    #[test]
    fn std_normal_ln_pdf_matches_closed_form() {
        let z = [0.5, -1.0];
        let expected = -0.5 * (0.25 + 1.0) - (2.0 * std::f64::consts::PI).ln();
        assert_relative_eq!(std_normal_ln_pdf(&z), expected, epsilon = 1e-14);
    }
}
