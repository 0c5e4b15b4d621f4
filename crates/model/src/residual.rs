//! Empirical one-step residuals of the fitted dynamics.

use ndarray::{Array2, ArrayView2, Axis};

/// Computes `e[:, t] = data[:, t] - G₁ · data[:, t]` for `t in 0..T-lag`.
///
/// The residual is taken against the same column that was propagated, so
/// `G₁ · data[:, t] + e[:, t]` reconstructs `data[:, t]`. Returns a
/// D×(T−lag) matrix; each row is the marginal noise sample for one state
/// dimension.
pub(crate) fn extract_residuals(
    data: ArrayView2<'_, f64>,
    g1: ArrayView2<'_, f64>,
    lag: usize,
) -> Array2<f64> {
    let n = data.ncols() - lag;
    let mut residuals = Array2::zeros((data.nrows(), n));

    for (t, mut col) in residuals.axis_iter_mut(Axis(1)).enumerate() {
        let state = data.column(t);
        let predicted = g1.dot(&state);
        col.assign(&(&state - &predicted));
    }

    residuals
}
