//! Lag-sensitivity sweep over candidate lags.

use lim_model::Lim;
use ndarray::{Array2, ArrayView2, Axis};
use tracing::{debug, info_span};

use crate::error::DiagnosticsError;

/// Fitted lag propagators `G`, one per candidate lag.
#[derive(Clone, Debug)]
pub struct LagSweep {
    lags: Vec<usize>,
    propagators: Vec<Array2<f64>>,
}

impl LagSweep {
    /// Candidate lags, in the order they were swept.
    pub fn lags(&self) -> &[usize] {
        &self.lags
    }

    /// Lag propagators, aligned with [`LagSweep::lags()`].
    pub fn propagators(&self) -> &[Array2<f64>] {
        &self.propagators
    }

    /// Element `(i, j)` of every propagator, aligned with the lags.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is not smaller than the number of dimensions.
    pub fn entry(&self, i: usize, j: usize) -> Vec<f64> {
        self.propagators.iter().map(|g| g[[i, j]]).collect()
    }

    pub fn len(&self) -> usize {
        self.lags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lags.is_empty()
    }
}

/// Fits a one-step model at each lag and collects its lag propagator `G`.
///
/// Each model uses the first column of `series` as its initial condition and
/// a horizon of 1; only the fitted `G` is kept.
///
/// # Errors
///
/// Returns [`DiagnosticsError::Model`] with the first failing lag's error,
/// including [`lim_model::LimError::InvalidLag`] for a lag of 0.
pub fn lag_sweep(series: ArrayView2<'_, f64>, lags: &[usize]) -> Result<LagSweep, DiagnosticsError> {
    if series.nrows() == 0 || series.ncols() == 0 {
        return Err(DiagnosticsError::EmptySeries);
    }
    let initial = series.index_axis_move(Axis(1), 0);

    let mut propagators = Vec::with_capacity(lags.len());
    for &lag in lags {
        let _span = info_span!("lag_sweep", lag).entered();
        let mut model = Lim::new(initial, series, lag, 1)?;
        let fit = model.build()?;
        debug!(g00 = fit.propagator()[[0, 0]], "propagator fitted");
        propagators.push(fit.propagator().clone());
    }

    Ok(LagSweep {
        lags: lags.to_vec(),
        propagators,
    })
}
