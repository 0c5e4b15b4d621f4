//! Lagged autocorrelation of one state dimension.

use ndarray::ArrayView2;
use tracing::debug;

use crate::error::DiagnosticsError;

/// Autocorrelation of `series[row, :]` at each lag in `lags`.
///
/// For lag τ the value is the Pearson correlation between
/// `series[row, 0..T-τ]` and `series[row, τ..T]`; τ = 0 correlates the row
/// with itself. An entry is `None` when the correlation is undefined (a
/// constant slice, or fewer than 3 finite pairs).
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`DiagnosticsError::EmptySeries`] | no rows or no columns |
/// | [`DiagnosticsError::RowOutOfRange`] | `row >= series.nrows()` |
/// | [`DiagnosticsError::LagTooLong`] | any lag `>= series.ncols()` |
pub fn autocorrelation(
    series: ArrayView2<'_, f64>,
    row: usize,
    lags: &[usize],
) -> Result<Vec<Option<f64>>, DiagnosticsError> {
    let (n_dims, n_times) = series.dim();
    if n_dims == 0 || n_times == 0 {
        return Err(DiagnosticsError::EmptySeries);
    }
    if row >= n_dims {
        return Err(DiagnosticsError::RowOutOfRange { row, n_dims });
    }
    if let Some(&lag) = lags.iter().find(|&&lag| lag >= n_times) {
        return Err(DiagnosticsError::LagTooLong { lag, n_times });
    }

    let values = series.row(row).to_vec();
    let acf: Vec<Option<f64>> = lags
        .iter()
        .map(|&lag| lim_stats::lagged_correlation(&values, lag))
        .collect();
    debug!(row, n_lags = lags.len(), "autocorrelation computed");
    Ok(acf)
}
