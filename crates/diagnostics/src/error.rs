//! Diagnostics error types.

use lim_model::LimError;

/// Errors that can occur while computing diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum DiagnosticsError {
    /// The input series has no rows or no columns.
    #[error("series is empty")]
    EmptySeries,

    /// The requested state dimension does not exist.
    #[error("row {row} out of range for a series with {n_dims} dimension(s)")]
    RowOutOfRange { row: usize, n_dims: usize },

    /// A lag leaves no overlap between the leading and lagged slices.
    #[error("lag {lag} too long for a series of {n_times} time step(s)")]
    LagTooLong { lag: usize, n_times: usize },

    /// Fitting a model for the lag sweep failed.
    #[error(transparent)]
    Model(#[from] LimError),

    /// JSON serialization failed.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}
