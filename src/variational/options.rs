//! Fit configuration with defaults resolved once at entry.
use crate::{
    flows::model::FlowModel,
    optimization::minimizer::{MinimizerOptions, Theta},
    utils::first_non_finite,
    variational::{
        errors::{VIError, VIResult},
        validation::validate_nmc,
    },
};

/// Default number of Monte Carlo draws per ELBO estimate.
pub const DEFAULT_NMC: usize = 200;

/// Default seed of the ChaCha8 stream driving all draws of one fit.
pub const DEFAULT_SEED: u64 = 42;

/// Caller-facing configuration for [`fit_flow_variational`](super::fit::fit_flow_variational).
///
/// Fields:
/// - `nmc` — draws per ELBO estimate (default [`DEFAULT_NMC`]).
/// - `seed` — RNG seed (default [`DEFAULT_SEED`]).
/// - `theta0` — starting parameters (default: the supplied flow's θ).
/// - `minimizer` — options for the default argmin minimizer
///   (default: Nelder–Mead, 200 iterations).
/// - `verbose` — emit progress records behind the `obs_slog` feature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FitOptions {
    pub nmc: Option<usize>,
    pub seed: Option<u64>,
    pub theta0: Option<Theta>,
    pub minimizer: MinimizerOptions,
    pub verbose: bool,
}

impl FitOptions {
    /// # Errors
    /// - [`VIError::InvalidNmc`] for `nmc == Some(0)`.
    /// - [`VIError::InvalidTheta0`] for a non-finite starting entry.
    pub fn new(
        nmc: Option<usize>, seed: Option<u64>, theta0: Option<Theta>,
        minimizer: MinimizerOptions, verbose: bool,
    ) -> VIResult<Self> {
        if let Some(n) = nmc {
            validate_nmc(n)?;
        }
        if let Some((index, value)) = theta0.as_ref().and_then(|t| first_non_finite(t.view())) {
            return Err(VIError::InvalidTheta0 { index, value });
        }
        Ok(Self { nmc, seed, theta0, minimizer, verbose })
    }

    /// Fill in defaults against the flow being fitted.
    ///
    /// # Errors
    /// - As [`FitOptions::new`] (fields are public and may have been edited).
    /// - [`VIError::Flow`] if `theta0` does not fit the flow's layout.
    pub fn resolve(&self, flow: &FlowModel) -> VIResult<ResolvedFitOptions> {
        let nmc = self.nmc.unwrap_or(DEFAULT_NMC);
        validate_nmc(nmc)?;
        let theta0 = match &self.theta0 {
            Some(t) => {
                if let Some((index, value)) = first_non_finite(t.view()) {
                    return Err(VIError::InvalidTheta0 { index, value });
                }
                flow.with_theta(t.clone())?;
                t.clone()
            }
            None => flow.theta().to_owned(),
        };
        Ok(ResolvedFitOptions {
            nmc,
            seed: self.seed.unwrap_or(DEFAULT_SEED),
            theta0,
            minimizer: self.minimizer.clone(),
            verbose: self.verbose,
        })
    }
}

/// [`FitOptions`] with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFitOptions {
    pub nmc: usize,
    pub seed: u64,
    pub theta0: Theta,
    pub minimizer: MinimizerOptions,
    pub verbose: bool,
}
