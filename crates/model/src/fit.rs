//! Fitted Linear Inverse Model.

use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::LimError;
use crate::integrate::{Resampling, integrate};
use crate::spec::LimSpec;

/// A fitted Linear Inverse Model produced by [`LimSpec::fit()`].
///
/// Holds the lag propagator `G`, the unit-step propagator `G₁` and the
/// D×(T−τ) residual matrix. All three are fixed once fitted. Use
/// [`LimFit::simulate()`] to integrate forward from an initial state.
///
/// # Typestate Workflow
///
/// ```mermaid
/// graph LR
///     B["LimFit"] --> C[".propagator(): G (lag τ)"]
///     B --> D[".unit_propagator(): G₁"]
///     B --> E[".residuals(): forcing samples"]
///     B --> F[".simulate(x0, n, stochastic, &mut rng)"]
///     B --> G[".simulate_ensemble(x0, n, members, stochastic, &mut rng)"]
/// ```
#[derive(Clone, Debug)]
pub struct LimFit {
    spec: LimSpec,
    propagator: Array2<f64>,
    unit_propagator: Array2<f64>,
    residuals: Array2<f64>,
}

impl LimFit {
    pub(crate) fn new(
        spec: LimSpec,
        propagator: Array2<f64>,
        unit_propagator: Array2<f64>,
        residuals: Array2<f64>,
    ) -> Self {
        Self {
            spec,
            propagator,
            unit_propagator,
            residuals,
        }
    }

    pub(crate) fn set_resampling(&mut self, resampling: Resampling) {
        self.spec = self.spec.with_resampling(resampling);
    }

    /// Returns the [`LimSpec`] that produced this fit.
    pub fn spec(&self) -> LimSpec {
        self.spec
    }

    /// Returns the lag `τ`.
    pub fn lag(&self) -> usize {
        self.spec.lag()
    }

    /// Returns the number of state dimensions `D`.
    pub fn n_dims(&self) -> usize {
        self.propagator.nrows()
    }

    /// Returns the lag propagator `G = C(τ)·C(0)⁻¹`.
    pub fn propagator(&self) -> &Array2<f64> {
        &self.propagator
    }

    /// Returns the unit-step propagator `G₁`, with `G₁^τ ≈ G`.
    pub fn unit_propagator(&self) -> &Array2<f64> {
        &self.unit_propagator
    }

    /// Returns the D×(T−τ) residual matrix.
    pub fn residuals(&self) -> &Array2<f64> {
        &self.residuals
    }

    /// Sample standard deviation (N−1 denominator) of each residual row.
    pub fn residual_sd(&self) -> Vec<f64> {
        self.residuals
            .rows()
            .into_iter()
            .map(|row| lim_stats::sd(&row.to_vec()))
            .collect()
    }

    /// Integrates `n_steps` columns forward from `initial`.
    ///
    /// Column 0 is `initial`; each later column is `G₁ · x + ε`, where ε is a
    /// fresh bootstrap draw from the residuals when `stochastic` is true and
    /// zero otherwise. The resampling mode comes from the [`LimSpec`].
    ///
    /// Returns a D×`n_steps` [`Array2<f64>`].
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`LimError::InvalidHorizon`] | `n_steps == 0` |
    /// | [`LimError::DimensionMismatch`] | `initial.len() != n_dims()` |
    /// | [`LimError::NonFiniteData`] | `initial` contains NaN or infinity |
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let path = fit.simulate(x0.view(), 120, true, &mut rng)?;
    /// assert_eq!(path.shape(), &[fit.n_dims(), 120]);
    /// ```
    pub fn simulate(
        &self,
        initial: ArrayView1<'_, f64>,
        n_steps: usize,
        stochastic: bool,
        rng: &mut impl Rng,
    ) -> Result<Array2<f64>, LimError> {
        if initial.iter().any(|v| !v.is_finite()) {
            return Err(LimError::NonFiniteData);
        }
        let noise = stochastic.then_some(self.spec.resampling());
        integrate(
            self.unit_propagator.view(),
            self.residuals.view(),
            initial,
            n_steps,
            noise,
            rng,
        )
    }

    /// Integrates `n_members` independent trajectories in parallel.
    ///
    /// One seed per member is drawn from `rng` before any work starts, so the
    /// ensemble is reproducible for a seeded `rng` regardless of thread
    /// scheduling.
    ///
    /// # Errors
    ///
    /// Same as [`LimFit::simulate()`].
    pub fn simulate_ensemble(
        &self,
        initial: ArrayView1<'_, f64>,
        n_steps: usize,
        n_members: usize,
        stochastic: bool,
        rng: &mut impl Rng,
    ) -> Result<Vec<Array2<f64>>, LimError> {
        let seeds: Vec<u64> = (0..n_members).map(|_| rng.random()).collect();
        seeds
            .into_par_iter()
            .map(|seed| {
                let mut member_rng = StdRng::seed_from_u64(seed);
                self.simulate(initial, n_steps, stochastic, &mut member_rng)
            })
            .collect()
    }
}
