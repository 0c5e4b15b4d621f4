//! Diagnostics for Linear Inverse Models: lagged autocorrelation of a state
//! dimension and the sensitivity of the fitted propagator to the lag.
//!
//! Both are read-only consumers of a D×T series; the lag sweep goes through
//! [`lim_model::Lim`] and keeps only the fitted `G` for each lag.

mod autocorrelation;
mod error;
mod output;
mod sweep;

use ndarray::ArrayView2;

pub use autocorrelation::autocorrelation;
pub use error::DiagnosticsError;
pub use output::{AutocorrelationOutput, DiagnosticsReport, FitReport, LagSweepOutput, to_json};
pub use sweep::{LagSweep, lag_sweep};

/// Runs the autocorrelation and lag sweep over the same lags and collects
/// them into one report.
///
/// Lag 0 is kept for the autocorrelation but skipped by the sweep, where it
/// is not a valid model lag. `names` labels the autocorrelated row when it
/// has an entry for it.
///
/// # Errors
///
/// Any error from [`autocorrelation()`] or [`lag_sweep()`].
pub fn diagnose(
    series: ArrayView2<'_, f64>,
    row: usize,
    lags: &[usize],
    names: &[String],
) -> Result<DiagnosticsReport, DiagnosticsError> {
    let values = autocorrelation(series, row, lags)?;
    let sweep_lags: Vec<usize> = lags.iter().copied().filter(|&lag| lag > 0).collect();
    let sweep = lag_sweep(series, &sweep_lags)?;

    Ok(DiagnosticsReport {
        n_dims: series.nrows(),
        n_times: series.ncols(),
        autocorrelation: AutocorrelationOutput {
            row,
            name: names.get(row).cloned(),
            lags: lags.to_vec(),
            values,
        },
        lag_sweep: LagSweepOutput::from(&sweep),
    })
}
