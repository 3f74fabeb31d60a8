//! Small shared helpers: the terminal logger used when `verbose` is set, and
//! matrix checks reused by the flow and path entrypoints.
use ndarray::{ArrayView1, ArrayView2};

/// Build a synchronous terminal logger writing to stderr.
///
/// Used for the progress records the fitter and the path solver emit when
/// their options ask for `verbose` output.
#[cfg(feature = "obs_slog")]
pub fn term_logger() -> slog::Logger {
    use slog::Drain;

    let decorator = slog_term::PlainSyncDecorator::new(std::io::stderr());
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    slog::Logger::root(drain, slog::o!("crate" => env!("CARGO_PKG_NAME")))
}

/// Position of the first non-finite entry of a vector, if any.
#[inline]
pub fn first_non_finite(v: ArrayView1<'_, f64>) -> Option<(usize, f64)> {
    v.iter().enumerate().find(|(_, x)| !x.is_finite()).map(|(i, &x)| (i, x))
}

/// `(row, col, value)` of the first non-finite entry of a matrix, if any.
pub fn first_non_finite_2d(m: ArrayView2<'_, f64>) -> Option<(usize, usize, f64)> {
    m.indexed_iter().find(|(_, x)| !x.is_finite()).map(|((r, c), &x)| (r, c, x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn finds_first_non_finite_entries() {
        let v = array![1.0, f64::INFINITY, f64::NAN];
        assert_eq!(first_non_finite(v.view()).map(|(i, _)| i), Some(1));
        assert!(first_non_finite(array![0.0, 2.0].view()).is_none());

        let m = array![[0.0, 1.0], [f64::NAN, 3.0]];
        assert_eq!(first_non_finite_2d(m.view()).map(|(r, c, _)| (r, c)), Some((1, 0)));
    }
}
