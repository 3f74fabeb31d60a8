//! Integration tests for the rare-event pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path: flow construction and sampling, ELBO
//!   fitting of a trainable flow against a categorical observation, the
//!   minimum-action path solver, and the tilted fits that combine them.
//! - Use a realistic three-category fixture (two logistic separators on the
//!   first coordinate) rather than degenerate toy likelihoods only.
//!
//! Coverage
//! --------
//! - `flows`: sampling, density re-evaluation, and `with_theta` on fitted θ.
//! - `variational`: Nelder–Mead fits, reproducibility for a fixed seed.
//! - `paths`: quasipotentials on the double-well drift.
//! - `rare_events`: quasipotential and Girsanov tilts, KL between the
//!   observation and the fitted predictive distribution.
//!
//! Exclusions
//! ----------
//! - Low-level validation branches and closed-form values; those are covered
//!   by unit tests next to each module.
use ndarray::{Array1, Array2, ArrayView1, array};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};
use rust_rare_events::{
    flows::FlowModel,
    optimization::minimizer::{MinimizerOptions, SolverMethod, Tolerances},
    paths::{PathOptions, quasipotential},
    rare_events::{
        fit_girsanov_tilted, fit_quasipotential_tilted, girsanov_logratio, kl_div, sanov_prob,
    },
    variational::{FitOptions, Likelihood, fit_flow_variational},
};

/// Purpose
/// -------
/// Three ordered categories split by logistic separators at `z = ±0.5`.
fn two_separator(z: ArrayView1<'_, f64>) -> Array1<f64> {
    let s1 = 1.0 / (1.0 + (-(4.0 * (z[0] + 0.5))).exp());
    let s2 = 1.0 / (1.0 + (-(4.0 * (z[0] - 0.5))).exp());
    array![1.0 - s1, s1 - s2, s2]
}

fn double_well(x: ArrayView1<'_, f64>) -> Array1<f64> {
    x.mapv(|v| v - v * v * v)
}

fn nelder_mead_options(max_iter: usize, nmc: usize, seed: u64) -> FitOptions {
    let tols = Tolerances::new(None, None, Some(max_iter)).expect("valid tolerances");
    let minimizer = MinimizerOptions::new(tols, SolverMethod::NelderMead, None, 0.3, false)
        .expect("valid minimizer options");
    FitOptions::new(Some(nmc), Some(seed), None, minimizer, false).expect("valid fit options")
}

/// Average pmf of `likelihood` over `n` draws of `flow`.
fn predictive(flow: &FlowModel, likelihood: &impl Likelihood, n: usize) -> Array1<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(123);
    let sample = flow.sample_q(n, &mut rng).expect("valid flow");
    let mut total = Array1::<f64>::zeros(3);
    for row in sample.zk.rows() {
        total += &likelihood.pmf(row);
    }
    total / n as f64
}

#[test]
// Purpose
// -------
// Fit a spline flow to a skewed observation and check the whole result.
//
// Given
// -----
// - Spline flow, d = 1, K = 4 bins, small random starting θ.
// - observed = (0.1, 0.3, 0.6), 80 Nelder–Mead iterations, nmc = 64.
//
// Expect
// ------
// - Finite ELBO, θ of the right length, a status in the documented range.
// - The fitted flow's densities re-evaluate consistently.
// - KL(observed ‖ predictive) is finite and the Sanov estimate lies in (0, 1].
fn spline_fit_end_to_end() {
    // Arrange
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let template = FlowModel::spline(1, 4, Array1::zeros(8)).expect("valid flow");
    let theta0 = template.initial_theta(0.1, &mut rng).expect("trainable flow");
    let flow = template.with_theta(theta0).expect("same layout");
    let observed = array![0.1, 0.3, 0.6];
    let opts = nelder_mead_options(80, 64, 5);

    // Act
    let result = fit_flow_variational(&flow, &two_separator, observed.view(), &opts)
        .expect("fit succeeds");

    // Assert
    let theta = result.theta.clone().expect("trainable flow returns θ");
    assert_eq!(theta.len(), 8);
    assert!(result.elbo.is_finite());
    assert!((0..=4).contains(&result.convergence), "status {}", result.convergence);

    let sample = result.flow.sample_q(50, &mut rng).expect("valid flow");
    let density = result.flow.log_q(sample.z0.view()).expect("valid draws");
    for (a, b) in density.log_q.iter().zip(sample.log_q.iter()) {
        assert!((a - b).abs() < 1e-10);
    }

    let pred = predictive(&result.flow, &two_separator, 2000);
    let kl = kl_div(observed.view(), pred.view()).expect("probability vectors");
    assert!(kl.is_finite() && kl >= 0.0);
    let p = sanov_prob(observed.view(), pred.view(), 20).expect("probability vectors");
    assert!(p > 0.0 && p <= 1.0);
}

#[test]
// Purpose
// -------
// A fit is a pure function of its inputs and seed.
fn fits_are_reproducible_for_a_fixed_seed() {
    let flow = FlowModel::autoregressive(1, 2, Array1::zeros(4)).expect("valid flow");
    let observed = array![0.2, 0.2, 0.6];
    let opts = nelder_mead_options(30, 32, 99);

    let first = fit_flow_variational(&flow, &two_separator, observed.view(), &opts).expect("fit");
    let second = fit_flow_variational(&flow, &two_separator, observed.view(), &opts).expect("fit");

    assert_eq!(first, second);
}

#[test]
// Purpose
// -------
// Tilt by double-well quasipotentials and fit a trainable flow.
//
// Given
// -----
// - Anchor −1; category targets −1, 0, 1 (left well, saddle, right well).
// - ε = 0.5, 40-point paths.
//
// Expect
// ------
// - The anchor's own category has zero log-weight and the largest weight.
// - Log-weights equal −V/ε for standalone quasipotential calls.
// - Finite ELBO with θ returned.
fn quasipotential_tilted_fit_end_to_end() {
    // Arrange
    let flow = FlowModel::spline(1, 3, Array1::zeros(6)).expect("valid flow");
    let anchor = array![-1.0];
    let targets = array![[-1.0], [0.0], [1.0]];
    let path_opts = PathOptions { n_points: 40, ..PathOptions::default() };
    let opts = nelder_mead_options(40, 32, 3);
    let eps = 0.5;

    // Act
    let out = fit_quasipotential_tilted(
        &flow,
        two_separator,
        array![0.5, 0.3, 0.2].view(),
        &double_well,
        anchor.view(),
        targets.view(),
        eps,
        &path_opts,
        &opts,
    )
    .expect("pipeline succeeds");

    // Assert
    assert_eq!(out.log_weights[0], 0.0);
    assert!(out.log_weights.iter().all(|&w| w <= 0.0));
    for (c, target) in targets.rows().into_iter().enumerate() {
        let v = quasipotential(&double_well, anchor.view(), target, &path_opts).expect("valid");
        assert!((out.log_weights[c] + v / eps).abs() < 1e-12, "category {c}");
    }
    assert!(out.fit.elbo.is_finite());
    assert_eq!(out.fit.theta.map(|t| t.len()), Some(6));
}

#[test]
// Purpose
// -------
// Girsanov-tilted fit with simulated Brownian increments.
//
// Given
// -----
// - 50 increments `ΔW ~ N(0, dt)` per category, dt = 0.02.
// - Constant tilts θ = −0.5, 0, 0.5 for the three categories.
//
// Expect
// ------
// - The zero tilt gives a zero log-weight; the others equal
//   `girsanov_logratio` on the same paths.
// - The fixed planar flow is evaluated once (status 0, no θ).
fn girsanov_tilted_fit_end_to_end() {
    // Arrange
    let dt: f64 = 0.02;
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let increments: Vec<Array2<f64>> = (0..3)
        .map(|_| {
            Array2::from_shape_simple_fn((50, 1), || {
                let e: f64 = StandardNormal.sample(&mut rng);
                e * dt.sqrt()
            })
        })
        .collect();
    let tilts: Vec<Array2<f64>> =
        [-0.5, 0.0, 0.5].iter().map(|&th| Array2::from_elem((50, 1), th)).collect();
    let flow = FlowModel::planar(0.8, 1.2, 0.1).expect("valid flow");
    let opts = FitOptions { nmc: Some(128), ..FitOptions::default() };

    // Act
    let out = fit_girsanov_tilted(
        &flow,
        two_separator,
        array![0.3, 0.4, 0.3].view(),
        tilts.iter().zip(increments.iter()).map(|(t, w)| (t.view(), w.view())),
        dt,
        &opts,
    )
    .expect("pipeline succeeds");

    // Assert
    assert_eq!(out.log_weights[1], 0.0);
    for c in [0, 2] {
        let expected =
            girsanov_logratio(tilts[c].view(), increments[c].view(), dt).expect("valid paths");
        assert_eq!(out.log_weights[c], expected);
    }
    assert!(out.fit.elbo.is_finite());
    assert_eq!(out.fit.convergence, 0);
    assert_eq!(out.fit.theta, None);
}
