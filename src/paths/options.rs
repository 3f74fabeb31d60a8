//! Configuration for the minimum-action path search.
use crate::paths::{
    action::validate_dt,
    errors::{ActionResult, PathError},
};

pub const DEFAULT_N_POINTS: usize = 100;
pub const DEFAULT_DT: f64 = 0.01;
pub const DEFAULT_NITER: usize = 10;
pub const DEFAULT_STEPSIZE: f64 = 0.05;
pub const DEFAULT_LOG_EVERY: usize = 1;

/// PathOptions — discretization and descent settings.
///
/// Fields
/// ------
/// - `n_points`: number of path points `T` including both endpoints
///   (default 100, must exceed 2).
/// - `dt`: time spacing between consecutive points (default 0.01).
/// - `niter`: number of descent iterations, run exactly (default 10).
/// - `stepsize`: constant descent step (default 0.05).
/// - `verbose`: emit one `slog` record every `log_every` iterations and one
///   for the final action (requires the `obs_slog` feature).
/// - `log_every`: iteration stride for progress records (default 1).
///
/// There is no tolerance: callers control precision with `niter` and
/// `stepsize` only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathOptions {
    pub n_points: usize,
    pub dt: f64,
    pub niter: usize,
    pub stepsize: f64,
    pub verbose: bool,
    pub log_every: usize,
}

impl PathOptions {
    /// # Errors
    /// See [`PathOptions::validate`].
    pub fn new(
        n_points: usize, dt: f64, niter: usize, stepsize: f64, verbose: bool, log_every: usize,
    ) -> ActionResult<Self> {
        let opts = Self { n_points, dt, niter, stepsize, verbose, log_every };
        opts.validate()?;
        Ok(opts)
    }

    /// Check every field. Called again at solver entry since fields are public.
    ///
    /// # Errors
    /// - [`PathError::TooFewPoints`] for `n_points ≤ 2`.
    /// - [`PathError::InvalidDt`] / [`PathError::InvalidStepsize`] for
    ///   non-positive or non-finite values.
    /// - [`PathError::InvalidLogEvery`] for `log_every == 0`.
    pub fn validate(&self) -> ActionResult<()> {
        if self.n_points <= 2 {
            return Err(PathError::TooFewPoints { n_points: self.n_points });
        }
        validate_dt(self.dt)?;
        if !(self.stepsize.is_finite() && self.stepsize > 0.0) {
            return Err(PathError::InvalidStepsize { stepsize: self.stepsize });
        }
        if self.log_every == 0 {
            return Err(PathError::InvalidLogEvery);
        }
        Ok(())
    }
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            n_points: DEFAULT_N_POINTS,
            dt: DEFAULT_DT,
            niter: DEFAULT_NITER,
            stepsize: DEFAULT_STEPSIZE,
            verbose: false,
            log_every: DEFAULT_LOG_EVERY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_and_bad_values_fail() {
        assert!(PathOptions::default().validate().is_ok());
        assert_eq!(
            PathOptions::new(2, 0.01, 10, 0.05, false, 1),
            Err(PathError::TooFewPoints { n_points: 2 })
        );
        assert_eq!(
            PathOptions::new(10, -0.1, 10, 0.05, false, 1),
            Err(PathError::InvalidDt { dt: -0.1 })
        );
        assert!(matches!(
            PathOptions::new(10, 0.01, 10, f64::NAN, false, 1),
            Err(PathError::InvalidStepsize { .. })
        ));
        assert_eq!(PathOptions::new(10, 0.01, 0, 0.05, true, 0), Err(PathError::InvalidLogEvery));
    }
}
