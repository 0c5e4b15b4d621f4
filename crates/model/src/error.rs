//! Error types for the lim-model crate.

/// Error type for all fallible operations in the lim-model crate.
///
/// Covers input validation, the two numerical failure modes of the
/// propagator solver, and calling [`Lim::run()`](crate::Lim::run) out of
/// order. None of these are retried internally.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LimError {
    /// Returned when the training data has no rows or no columns.
    #[error("input data is empty")]
    EmptyData,

    /// Returned when the training data or initial condition contains NaN or
    /// infinity.
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Returned when the lag is zero.
    #[error("invalid lag {lag}: lag must be greater than 0")]
    InvalidLag {
        /// The rejected lag.
        lag: usize,
    },

    /// Returned when the requested number of integration steps is zero.
    #[error("invalid horizon: at least one time step is required")]
    InvalidHorizon,

    /// Returned when two shapes that must agree do not.
    #[error("dimension mismatch for {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Which quantity had the wrong shape.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when the training data has too few time steps for the lag.
    #[error("insufficient data: got {n} time steps, need at least {min}")]
    InsufficientData {
        /// Number of time steps provided.
        n: usize,
        /// Minimum number of time steps required (`lag + 1`).
        min: usize,
    },

    /// Returned when the zero-lag covariance cannot be inverted.
    #[error("zero-lag covariance is singular (reciprocal condition number {rcond:e})")]
    SingularMatrix {
        /// Ratio of smallest to largest singular value.
        rcond: f64,
    },

    /// Returned when the matrix logarithm of the lag propagator is undefined
    /// or the unit-step propagator does not reproduce it.
    #[error("propagator decomposition failed: {reason}")]
    PropagatorDecomposition {
        /// Description of the failure.
        reason: String,
    },

    /// Returned when an operation is called before its prerequisite.
    #[error("precondition violated: {reason}")]
    Precondition {
        /// Description of the missing prerequisite.
        reason: &'static str,
    },
}
