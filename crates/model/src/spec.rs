//! Linear Inverse Model specification (unfitted).

use ndarray::ArrayView2;
use tracing::debug;

use crate::covariance::lagged_covariances;
use crate::error::LimError;
use crate::fit::LimFit;
use crate::integrate::Resampling;
use crate::propagator;
use crate::residual::extract_residuals;

/// An unfitted Linear Inverse Model with lag `τ`.
///
/// This is the entry point of the typestate workflow. Create a spec with
/// [`LimSpec::new()`], then call [`LimSpec::fit()`] to obtain a [`LimFit`].
///
/// # Typestate Workflow
///
/// ```mermaid
/// graph LR
///     A["LimSpec::new(lag)"] -->|".fit(data.view())?"| B["LimFit"]
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LimSpec {
    lag: usize,
    resampling: Resampling,
}

impl LimSpec {
    /// Creates a specification with lag `lag` and independent per-dimension
    /// residual resampling.
    ///
    /// # Example
    ///
    /// ```
    /// use lim_model::{LimSpec, Resampling};
    ///
    /// let spec = LimSpec::new(3).with_resampling(Resampling::Joint);
    /// assert_eq!(spec.lag(), 3);
    /// assert_eq!(spec.resampling(), Resampling::Joint);
    /// ```
    pub fn new(lag: usize) -> Self {
        Self {
            lag,
            resampling: Resampling::default(),
        }
    }

    /// Sets how residual noise is resampled during stochastic integration.
    pub fn with_resampling(mut self, resampling: Resampling) -> Self {
        self.resampling = resampling;
        self
    }

    /// Returns the lag `τ`.
    pub fn lag(&self) -> usize {
        self.lag
    }

    /// Returns the residual resampling mode.
    pub fn resampling(&self) -> Resampling {
        self.resampling
    }

    /// Fits the model to a D×T training series (rows are state dimensions,
    /// columns are time steps).
    ///
    /// Computes the lagged covariances, the lag propagator `G`, the unit-step
    /// propagator `G₁` and the residual matrix. Nothing is returned unless
    /// every stage succeeds.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`LimError::InvalidLag`] | `lag == 0` |
    /// | [`LimError::EmptyData`] | no rows or no columns |
    /// | [`LimError::InsufficientData`] | fewer than `lag + 1` columns |
    /// | [`LimError::NonFiniteData`] | any element is NaN or infinite |
    /// | [`LimError::SingularMatrix`] | zero-lag covariance not invertible |
    /// | [`LimError::PropagatorDecomposition`] | matrix logarithm of `G` undefined or unstable |
    #[tracing::instrument(skip(self, data), fields(lag = self.lag, n_dims = data.nrows(), n_times = data.ncols()))]
    pub fn fit(&self, data: ArrayView2<'_, f64>) -> Result<LimFit, LimError> {
        validate_training(data, self.lag)?;

        let cov = lagged_covariances(data, self.lag);
        let propagators = propagator::solve(&cov, self.lag)?;
        let residuals = extract_residuals(data, propagators.unit.view(), self.lag);
        debug!(n_residuals = residuals.ncols(), "residuals extracted");

        Ok(LimFit::new(
            *self,
            propagators.tau_lag,
            propagators.unit,
            residuals,
        ))
    }
}

/// Checks lag and training data before any computation.
pub(crate) fn validate_training(data: ArrayView2<'_, f64>, lag: usize) -> Result<(), LimError> {
    if lag == 0 {
        return Err(LimError::InvalidLag { lag });
    }
    if data.nrows() == 0 || data.ncols() == 0 {
        return Err(LimError::EmptyData);
    }
    if lag >= data.ncols() {
        return Err(LimError::InsufficientData {
            n: data.ncols(),
            min: lag.saturating_add(1),
        });
    }
    if data.iter().any(|v| !v.is_finite()) {
        return Err(LimError::NonFiniteData);
    }
    Ok(())
}
