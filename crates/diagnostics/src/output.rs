//! JSON output structures for fits and diagnostics.

use lim_model::LimFit;
use ndarray::Array2;
use serde::Serialize;

use crate::error::DiagnosticsError;
use crate::sweep::LagSweep;

/// Fitted model parameters in machine-readable form.
#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    pub lag: usize,
    pub n_dims: usize,
    pub n_residuals: usize,
    /// State dimension names, aligned with matrix rows and columns.
    pub names: Vec<String>,
    /// Lag propagator `G`, row-major.
    pub propagator: Vec<Vec<f64>>,
    /// Unit-step propagator `G₁`, row-major.
    pub unit_propagator: Vec<Vec<f64>>,
    /// Sample standard deviation of each residual row.
    pub residual_sd: Vec<f64>,
}

impl FitReport {
    pub fn new(fit: &LimFit, names: &[String]) -> Self {
        Self {
            lag: fit.lag(),
            n_dims: fit.n_dims(),
            n_residuals: fit.residuals().ncols(),
            names: names.to_vec(),
            propagator: rows(fit.propagator()),
            unit_propagator: rows(fit.unit_propagator()),
            residual_sd: fit.residual_sd(),
        }
    }
}

/// Autocorrelation of one state dimension.
#[derive(Debug, Clone, Serialize)]
pub struct AutocorrelationOutput {
    pub row: usize,
    pub name: Option<String>,
    pub lags: Vec<usize>,
    pub values: Vec<Option<f64>>,
}

/// Lag propagators across candidate lags.
#[derive(Debug, Clone, Serialize)]
pub struct LagSweepOutput {
    pub lags: Vec<usize>,
    /// One row-major `G` per lag.
    pub propagators: Vec<Vec<Vec<f64>>>,
}

impl From<&LagSweep> for LagSweepOutput {
    fn from(sweep: &LagSweep) -> Self {
        Self {
            lags: sweep.lags().to_vec(),
            propagators: sweep.propagators().iter().map(rows).collect(),
        }
    }
}

/// Top-level diagnostics output.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsReport {
    pub n_dims: usize,
    pub n_times: usize,
    pub autocorrelation: AutocorrelationOutput,
    pub lag_sweep: LagSweepOutput,
}

fn rows(m: &Array2<f64>) -> Vec<Vec<f64>> {
    m.rows().into_iter().map(|r| r.to_vec()).collect()
}

/// Serialize any report to a pretty-printed JSON string.
pub fn to_json<T: Serialize>(report: &T) -> Result<String, DiagnosticsError> {
    serde_json::to_string_pretty(report).map_err(|e| DiagnosticsError::Serialization {
        reason: e.to_string(),
    })
}
