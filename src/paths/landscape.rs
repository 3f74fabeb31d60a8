//! Quasipotential landscape: `V(anchor → g)` for every row `g` of a grid.
//!
//! Rows are independent path searches. Under the `parallel` feature they run
//! on the rayon pool; each search is itself sequential, so both builds give
//! identical values.
use ndarray::{Array1, ArrayView1, ArrayView2};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::paths::{
    drift::DriftField,
    errors::{ActionResult, PathError},
    options::PathOptions,
    solver::quasipotential,
};

/// Quasipotential from `anchor` to each grid row.
///
/// Per-row progress records are suppressed; with `opts.verbose` one summary
/// record is emitted for the sweep.
///
/// # Errors
/// - [`PathError::DimensionMismatch`] when grid columns differ from the
///   anchor's length.
/// - Any error of [`quasipotential`] for the first failing row.
pub fn quasipotential_landscape<D>(
    drift: &D, anchor: ArrayView1<'_, f64>, grid: ArrayView2<'_, f64>, opts: &PathOptions,
) -> ActionResult<Array1<f64>>
where
    D: DriftField + ?Sized,
{
    opts.validate()?;
    if grid.ncols() != anchor.len() {
        return Err(PathError::DimensionMismatch { expected: anchor.len(), found: grid.ncols() });
    }
    let row_opts = PathOptions { verbose: false, ..*opts };
    let solve = |i: usize| quasipotential(drift, anchor, grid.row(i), &row_opts);

    #[cfg(feature = "parallel")]
    let values: Vec<f64> =
        (0..grid.nrows()).into_par_iter().map(solve).collect::<ActionResult<_>>()?;
    #[cfg(not(feature = "parallel"))]
    let values: Vec<f64> = (0..grid.nrows()).map(solve).collect::<ActionResult<_>>()?;

    #[cfg(feature = "obs_slog")]
    {
        if opts.verbose {
            let logger = crate::utils::term_logger();
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            slog::info!(logger, "quasipotential landscape finished";
                "points" => values.len(),
                "min_action" => min
            );
        }
    }
    Ok(Array1::from(values))
}
