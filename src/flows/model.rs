//! flows::model — the tagged [`FlowModel`] and its density bookkeeping.
//!
//! Purpose
//! -------
//! Wrap the four flow variants behind one value type that samples from the
//! base Gaussian, pushes draws forward, and tracks the change-of-variables
//! log density
//!
//! ```text
//! ln q(zK) = ln N(z0; 0, I) − ln|det ∂zK/∂z0|
//! ```
//!
//! Key behaviors
//! -------------
//! - Dispatch by `match` on the variant; every variant exposes a row-wise
//!   forward pass that returns its log-determinant.
//! - [`FlowModel::log_q`] on the base draws of a [`FlowModel::sample_q`] call
//!   reproduces the same `zK` and `log_q`.
//! - [`FlowModel::with_theta`] builds a new instance with the same structure;
//!   instances are never mutated.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are `n × d` matrices whose column count equals [`FlowModel::dim`]
//!   and whose entries are finite. Both are checked.
//! - Non-finite values arising inside a transform are returned as-is.
//!
//! Testing notes
//! -------------
//! - Change-of-variables identity against finite-difference Jacobians for
//!   every variant, including a triangularity check.
//! - 1-D quadrature of `q` over the pushed-forward grid integrates to ≈ 1.
//! - Property test: perturbing base dimension `j` of an autoregressive flow
//!   leaves output dimensions `< j` bit-identical.
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::{
    flows::{
        autoregressive::AutoregressiveFlow,
        errors::{FlowError, FlowKind, FlowResult},
        planar::PlanarFlow,
        radial::RadialFlow,
        spline::SplineFlow,
    },
    optimization::numerical_stability::std_normal_ln_pdf,
    utils::first_non_finite_2d,
};

/// Invertible, density-tracking transform of a standard Gaussian.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowModel {
    Planar(PlanarFlow),
    Radial(RadialFlow),
    Autoregressive(AutoregressiveFlow),
    Spline(SplineFlow),
}

/// Base draws, their images, and the flow log density at the images.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSample {
    pub z0: Array2<f64>,
    pub zk: Array2<f64>,
    pub log_q: Array1<f64>,
}

/// Output of [`FlowModel::log_q`].
#[derive(Debug, Clone, PartialEq)]
pub struct FlowDensity {
    pub zk: Array2<f64>,
    pub log_q: Array1<f64>,
}

impl FlowModel {
    // ---- Constructors ----

    /// 1-D planar flow `z + u·tanh(w·z + b)`.
    pub fn planar(u: f64, w: f64, b: f64) -> FlowResult<Self> {
        Ok(FlowModel::Planar(PlanarFlow::new(u, w, b)?))
    }

    /// 1-D radial flow around `z_ref`; requires `alpha > 0`.
    pub fn radial(z_ref: f64, alpha: f64, beta: f64) -> FlowResult<Self> {
        Ok(FlowModel::Radial(RadialFlow::new(z_ref, alpha, beta)?))
    }

    /// `dim`-dimensional autoregressive flow with `steps` affine steps.
    pub fn autoregressive(dim: usize, steps: usize, theta: Array1<f64>) -> FlowResult<Self> {
        Ok(FlowModel::Autoregressive(AutoregressiveFlow::new(dim, steps, theta)?))
    }

    /// `dim`-dimensional spline flow with `bins` bins per dimension.
    pub fn spline(dim: usize, bins: usize, theta: Array1<f64>) -> FlowResult<Self> {
        Ok(FlowModel::Spline(SplineFlow::new(dim, bins, theta)?))
    }

    // ---- Structure ----

    pub fn kind(&self) -> FlowKind {
        match self {
            FlowModel::Planar(_) => FlowKind::Planar,
            FlowModel::Radial(_) => FlowKind::Radial,
            FlowModel::Autoregressive(_) => FlowKind::Autoregressive,
            FlowModel::Spline(_) => FlowKind::Spline,
        }
    }

    pub fn dim(&self) -> usize {
        match self {
            FlowModel::Planar(_) | FlowModel::Radial(_) => 1,
            FlowModel::Autoregressive(f) => f.layout().dim(),
            FlowModel::Spline(f) => f.layout().dim(),
        }
    }

    /// Planar and radial flows carry fixed scalars; the others are fitted.
    pub fn is_trainable(&self) -> bool {
        matches!(self, FlowModel::Autoregressive(_) | FlowModel::Spline(_))
    }

    pub fn n_params(&self) -> usize {
        self.theta().len()
    }

    /// Current parameter vector (`(u, w, b)` or `(z_ref, α, β)` for the
    /// fixed variants).
    pub fn theta(&self) -> ArrayView1<'_, f64> {
        match self {
            FlowModel::Planar(f) => f.theta(),
            FlowModel::Radial(f) => f.theta(),
            FlowModel::Autoregressive(f) => f.theta(),
            FlowModel::Spline(f) => f.theta(),
        }
    }

    /// New instance of the same variant and structure with parameters `theta`.
    ///
    /// # Errors
    /// Whatever the variant's constructor rejects (length, finiteness, `α`).
    pub fn with_theta(&self, theta: Array1<f64>) -> FlowResult<Self> {
        match self {
            FlowModel::Planar(_) => Ok(FlowModel::Planar(PlanarFlow::from_theta(theta)?)),
            FlowModel::Radial(_) => Ok(FlowModel::Radial(RadialFlow::from_theta(theta)?)),
            FlowModel::Autoregressive(f) => {
                let l = f.layout();
                FlowModel::autoregressive(l.dim(), l.steps(), theta)
            }
            FlowModel::Spline(f) => {
                let l = f.layout();
                FlowModel::spline(l.dim(), l.bins(), theta)
            }
        }
    }

    /// Random starting parameters `θ_i ~ N(0, scale²)` for a trainable flow.
    ///
    /// `scale = 0` returns the identity parameters.
    ///
    /// # Errors
    /// - [`FlowError::NotTrainable`] for planar and radial flows.
    /// - [`FlowError::InvalidScale`] if `scale` is negative or non-finite.
    pub fn initial_theta<R: Rng + ?Sized>(
        &self, scale: f64, rng: &mut R,
    ) -> FlowResult<Array1<f64>> {
        if !self.is_trainable() {
            return Err(FlowError::NotTrainable { kind: self.kind() });
        }
        if !scale.is_finite() || scale < 0.0 {
            return Err(FlowError::InvalidScale { scale });
        }
        Ok(Array1::from_shape_simple_fn(self.n_params(), || {
            let e: f64 = StandardNormal.sample(&mut *rng);
            scale * e
        }))
    }

    // ---- Forward map and density ----

    /// Forward map only.
    ///
    /// # Errors
    /// - [`FlowError::ColumnMismatch`] if `z0.ncols() != self.dim()`.
    /// - [`FlowError::NonFiniteInput`] for any non-finite base draw.
    pub fn apply_flow(&self, z0: ArrayView2<'_, f64>) -> FlowResult<Array2<f64>> {
        Ok(self.forward(z0)?.0)
    }

    /// Per-draw `ln|det ∂zK/∂z0|`.
    pub fn log_det_jacobian(&self, z0: ArrayView2<'_, f64>) -> FlowResult<Array1<f64>> {
        Ok(self.forward(z0)?.1)
    }

    /// Images `zK` and `ln q(zK) = ln N(z0) − ln|det J(z0)|` per draw.
    pub fn log_q(&self, z0: ArrayView2<'_, f64>) -> FlowResult<FlowDensity> {
        let (zk, logdet) = self.forward(z0)?;
        let log_q = Array1::from_iter(
            z0.outer_iter().zip(logdet.iter()).map(|(row, &ld)| std_normal_ln_pdf(row) - ld),
        );
        Ok(FlowDensity { zk, log_q })
    }

    /// Draw `n` base samples and push them through the flow.
    pub fn sample_q<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> FlowResult<FlowSample> {
        let z0 = sample_base(n, self.dim(), rng);
        let FlowDensity { zk, log_q } = self.log_q(z0.view())?;
        Ok(FlowSample { z0, zk, log_q })
    }

    fn forward(&self, z0: ArrayView2<'_, f64>) -> FlowResult<(Array2<f64>, Array1<f64>)> {
        self.check_input(z0)?;
        let mut zk = Array2::zeros(z0.raw_dim());
        let mut logdet = Array1::zeros(z0.nrows());
        for ((row, out), ld) in z0.outer_iter().zip(zk.outer_iter_mut()).zip(logdet.iter_mut()) {
            *ld = match self {
                FlowModel::Planar(f) => f.forward_row(row, out),
                FlowModel::Radial(f) => f.forward_row(row, out),
                FlowModel::Autoregressive(f) => f.forward_row(row, out),
                FlowModel::Spline(f) => f.forward_row(row, out),
            };
        }
        Ok((zk, logdet))
    }

    fn check_input(&self, z0: ArrayView2<'_, f64>) -> FlowResult<()> {
        if z0.ncols() != self.dim() {
            return Err(FlowError::ColumnMismatch { expected: self.dim(), found: z0.ncols() });
        }
        match first_non_finite_2d(z0) {
            Some((row, col, value)) => Err(FlowError::NonFiniteInput { row, col, value }),
            None => Ok(()),
        }
    }
}

/// `n × dim` matrix of iid standard-normal draws.
pub fn sample_base<R: Rng + ?Sized>(n: usize, dim: usize, rng: &mut R) -> Array2<f64> {
    Array2::from_shape_simple_fn((n, dim), || StandardNormal.sample(&mut *rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, Array2, array};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The change-of-variables identity for all four variants.
    // - Normalization of the pushed-forward density in one dimension.
    // - Autoregressive triangularity as a property test.
    // - Input and parameter validation at the model boundary.
    //
    // They intentionally DO NOT cover:
    // - ELBO estimation or fitting; see `variational`.
    // -------------------------------------------------------------------------

    fn example_flows(rng: &mut ChaCha8Rng) -> Vec<FlowModel> {
        let ar = FlowModel::autoregressive(3, 2, Array1::zeros(24)).expect("valid flow");
        let ar_theta = ar.initial_theta(0.5, rng).expect("trainable");
        let sp = FlowModel::spline(2, 5, Array1::zeros(20)).expect("valid flow");
        let sp_theta = sp.initial_theta(0.8, rng).expect("trainable");
        vec![
            FlowModel::planar(0.9, -0.7, 0.2).expect("valid flow"),
            FlowModel::radial(0.3, 0.8, 1.2).expect("valid flow"),
            ar.with_theta(ar_theta).expect("same layout"),
            sp.with_theta(sp_theta).expect("same layout"),
        ]
    }

    /// Central-difference Jacobian of the forward map at one base point.
    fn fd_jacobian(flow: &FlowModel, z: ArrayView1<'_, f64>) -> Array2<f64> {
        let d = z.len();
        let h = 1e-6;
        let mut jac = Array2::zeros((d, d));
        for b in 0..d {
            let mut plus = z.to_owned().insert_axis(ndarray::Axis(0));
            let mut minus = plus.clone();
            plus[[0, b]] += h;
            minus[[0, b]] -= h;
            let fp = flow.apply_flow(plus.view()).expect("valid input");
            let fm = flow.apply_flow(minus.view()).expect("valid input");
            for a in 0..d {
                jac[[a, b]] = (fp[[0, a]] - fm[[0, a]]) / (2.0 * h);
            }
        }
        jac
    }

    #[test]
    // Purpose
    // -------
    // Re-evaluating `log_q` on the base draws of `sample_q` reproduces both
    // the images and the log density exactly.
    fn log_q_reproduces_sample_q() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for flow in example_flows(&mut rng) {
            let sample = flow.sample_q(50, &mut rng).expect("sampling succeeds");
            let density = flow.log_q(sample.z0.view()).expect("valid input");
            assert_eq!(density.zk, sample.zk, "{}", flow.kind());
            assert_eq!(density.log_q, sample.log_q, "{}", flow.kind());
            assert_eq!(sample.z0.ncols(), flow.dim());
        }
    }

    #[test]
    // Purpose
    // -------
    // `log_q = ln N(z0) − ln|det J|` with J from central differences.
    //
    // Given
    // -----
    // - Each example flow and 20 seeded base draws.
    //
    // Expect
    // ------
    // - The FD Jacobian is lower-triangular (entries above the diagonal
    //   vanish).
    // - ln|Π diag J| matches `log_det_jacobian` to 1e-5.
    // - `log_q` equals `ln N(z0)` minus that log-determinant.
    fn change_of_variables_matches_finite_differences() {
        // Arrange
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for flow in example_flows(&mut rng) {
            let z0 = sample_base(20, flow.dim(), &mut rng);

            // Act
            let logdet = flow.log_det_jacobian(z0.view()).expect("valid input");
            let density = flow.log_q(z0.view()).expect("valid input");

            // Assert
            for (t, row) in z0.outer_iter().enumerate() {
                let jac = fd_jacobian(&flow, row);
                let d = flow.dim();
                for a in 0..d {
                    for b in a + 1..d {
                        assert_abs_diff_eq!(jac[[a, b]], 0.0, epsilon = 1e-8);
                    }
                }
                let fd_logdet: f64 = (0..d).map(|a| jac[[a, a]].abs().ln()).sum();
                assert_abs_diff_eq!(logdet[t], fd_logdet, epsilon = 1e-5);
                let expected = std_normal_ln_pdf(row) - logdet[t];
                assert_abs_diff_eq!(density.log_q[t], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // In one dimension, `exp(log_q)` integrated over the image grid with the
    // trapezoid rule is ≈ 1 for every variant.
    fn pushed_forward_density_integrates_to_one() {
        let flows = vec![
            FlowModel::planar(-0.6, 1.2, 0.4).expect("valid flow"),
            FlowModel::radial(-0.5, 0.6, 2.0).expect("valid flow"),
            FlowModel::autoregressive(1, 2, array![0.4, -0.3, -0.8, 1.1]).expect("valid flow"),
            FlowModel::spline(1, 4, array![0.3, -0.5, 1.0, 0.0, -0.2, 0.9, 0.1, -1.0])
                .expect("valid flow"),
        ];
        let n = 20_001;
        let z0 = Array2::from_shape_fn((n, 1), |(i, _)| -10.0 + 20.0 * i as f64 / (n - 1) as f64);
        for flow in flows {
            let density = flow.log_q(z0.view()).expect("valid input");
            let q = density.log_q.mapv(f64::exp);
            let mut mass = 0.0;
            for i in 0..n - 1 {
                let dz = density.zk[[i + 1, 0]] - density.zk[[i, 0]];
                assert!(dz > 0.0, "{} flow is not increasing", flow.kind());
                mass += 0.5 * (q[i] + q[i + 1]) * dz;
            }
            assert_abs_diff_eq!(mass, 1.0, epsilon = 2e-3);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            .. ProptestConfig::default()
        })]
        #[test]
        fn prop_autoregressive_output_ignores_later_inputs(
            theta in prop::collection::vec(-1.0f64..1.0, 60),
            z in prop::collection::vec(-3.0f64..3.0, 4),
            j in 0usize..4,
            delta in 0.1f64..2.0,
        ) {
            let flow = FlowModel::autoregressive(4, 3, Array1::from(theta)).expect("valid flow");
            let base = Array2::from_shape_vec((1, 4), z).expect("1 x 4 draw");
            let mut bumped = base.clone();
            bumped[[0, j]] += delta;

            let a = flow.apply_flow(base.view()).expect("valid input");
            let b = flow.apply_flow(bumped.view()).expect("valid input");

            for i in 0..j {
                prop_assert_eq!(a[[0, i]], b[[0, i]]);
            }
            prop_assert!(a[[0, j]] != b[[0, j]]);
        }
    }

    #[test]
    fn rejects_wrong_columns_and_non_finite_draws() {
        let flow = FlowModel::spline(2, 3, Array1::zeros(12)).expect("valid flow");
        let wrong = Array2::<f64>::zeros((4, 3));
        assert_eq!(
            flow.apply_flow(wrong.view()),
            Err(FlowError::ColumnMismatch { expected: 2, found: 3 })
        );
        let bad = array![[0.0, 1.0], [f64::INFINITY, 0.0]];
        assert!(matches!(
            flow.log_q(bad.view()),
            Err(FlowError::NonFiniteInput { row: 1, col: 0, .. })
        ));
    }

    #[test]
    fn with_theta_keeps_structure_and_validates_length() {
        let flow = FlowModel::autoregressive(2, 3, Array1::zeros(18)).expect("valid flow");
        let next = flow.with_theta(Array1::from_elem(18, 0.1)).expect("same length");
        assert_eq!(next.kind(), FlowKind::Autoregressive);
        assert_eq!(next.dim(), 2);
        assert_eq!(flow.theta()[0], 0.0);
        assert!(matches!(
            flow.with_theta(Array1::zeros(17)),
            Err(FlowError::ParamLengthMismatch { expected: 18, found: 17, .. })
        ));
        let radial = FlowModel::radial(0.0, 1.0, 1.0).expect("valid flow");
        assert!(matches!(
            radial.with_theta(array![0.0, -1.0, 1.0]),
            Err(FlowError::NonPositiveAlpha { .. })
        ));
    }

    #[test]
    fn fixed_variants_are_not_trainable() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let planar = FlowModel::planar(1.0, 0.5, 0.0).expect("valid flow");
        assert!(!planar.is_trainable());
        assert_eq!(planar.n_params(), 3);
        assert_eq!(
            planar.initial_theta(0.1, &mut rng),
            Err(FlowError::NotTrainable { kind: FlowKind::Planar })
        );
        let spline = FlowModel::spline(1, 2, Array1::zeros(4)).expect("valid flow");
        assert!(matches!(
            spline.initial_theta(-1.0, &mut rng),
            Err(FlowError::InvalidScale { .. })
        ));
    }

    #[test]
    fn flow_models_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FlowModel>();
    }
}
