//! Stateful model container: construct, build, run.

use ndarray::{Array2, ArrayView1, ArrayView2};
use rand::Rng;
use tracing::info;

use crate::error::LimError;
use crate::fit::LimFit;
use crate::integrate::Resampling;
use crate::spec::{LimSpec, validate_training};

/// A Linear Inverse Model bound to its training data and initial condition.
///
/// Borrows the D×T training series and the length-D initial condition for
/// its whole lifetime and never mutates them. The fitted parameters and the
/// last output trajectory are owned by the container.
///
/// # Workflow
///
/// ```mermaid
/// graph LR
///     A["Lim::new(x0, data, lag, horizon)?"] -->|".build()?"| B["fit: LimFit"]
///     B -->|".run(stochastic, &mut rng)?"| C["output: D × horizon"]
/// ```
///
/// # Example
///
/// ```
/// use lim_model::Lim;
/// use ndarray::array;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let data = array![[1.0, 2.0, 3.0, 4.0, 5.0], [5.0, 4.0, 3.0, 2.0, 1.0]];
/// let x0 = array![1.0, 5.0];
///
/// let mut model = Lim::new(x0.view(), data.view(), 1, 3).unwrap();
/// model.build().unwrap();
/// let mut rng = StdRng::seed_from_u64(42);
/// let out = model.run(false, &mut rng).unwrap();
/// assert_eq!(out.shape(), &[2, 3]);
/// ```
#[derive(Clone, Debug)]
pub struct Lim<'a> {
    initial: ArrayView1<'a, f64>,
    data: ArrayView2<'a, f64>,
    spec: LimSpec,
    horizon: usize,
    fit: Option<LimFit>,
    output: Option<Array2<f64>>,
}

impl<'a> Lim<'a> {
    /// Validates the inputs and creates an unbuilt model.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`LimError::InvalidLag`] | `lag == 0` |
    /// | [`LimError::EmptyData`] | `data` has no rows or no columns |
    /// | [`LimError::DimensionMismatch`] | `initial.len() != data.nrows()` |
    /// | [`LimError::InsufficientData`] | `data.ncols() < lag + 1` |
    /// | [`LimError::InvalidHorizon`] | `horizon == 0` |
    /// | [`LimError::NonFiniteData`] | NaN or infinity in `data` or `initial` |
    pub fn new(
        initial: ArrayView1<'a, f64>,
        data: ArrayView2<'a, f64>,
        lag: usize,
        horizon: usize,
    ) -> Result<Self, LimError> {
        if lag == 0 {
            return Err(LimError::InvalidLag { lag });
        }
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(LimError::EmptyData);
        }
        if initial.len() != data.nrows() {
            return Err(LimError::DimensionMismatch {
                what: "initial condition",
                expected: data.nrows(),
                got: initial.len(),
            });
        }
        validate_training(data, lag)?;
        if horizon == 0 {
            return Err(LimError::InvalidHorizon);
        }
        if initial.iter().any(|v| !v.is_finite()) {
            return Err(LimError::NonFiniteData);
        }

        Ok(Self {
            initial,
            data,
            spec: LimSpec::new(lag),
            horizon,
            fit: None,
            output: None,
        })
    }

    /// Sets the residual resampling mode used by [`Lim::run()`].
    ///
    /// Applies to an existing fit as well as to later builds.
    pub fn with_resampling(mut self, resampling: Resampling) -> Self {
        self.spec = self.spec.with_resampling(resampling);
        if let Some(fit) = self.fit.as_mut() {
            fit.set_resampling(resampling);
        }
        self
    }

    /// Fits the propagators and residuals to the training data.
    ///
    /// The new fit replaces the stored one only when every stage succeeds;
    /// on error the previous fit (if any) is left in place.
    ///
    /// # Errors
    ///
    /// [`LimError::SingularMatrix`] or [`LimError::PropagatorDecomposition`]
    /// from [`LimSpec::fit()`].
    pub fn build(&mut self) -> Result<&LimFit, LimError> {
        let fit = self.spec.fit(self.data)?;
        info!(
            lag = fit.lag(),
            n_dims = fit.n_dims(),
            n_residuals = fit.residuals().ncols(),
            "model built"
        );
        Ok(self.fit.insert(fit))
    }

    /// Integrates `horizon` steps from the initial condition and stores the
    /// trajectory, replacing any previous one.
    ///
    /// Repeated stochastic runs give different realizations; deterministic
    /// runs are bit-identical.
    ///
    /// # Errors
    ///
    /// [`LimError::Precondition`] if [`Lim::build()`] has not succeeded.
    pub fn run(&mut self, stochastic: bool, rng: &mut impl Rng) -> Result<&Array2<f64>, LimError> {
        let fit = self.fit.as_ref().ok_or(LimError::Precondition {
            reason: "run() requires a successful build()",
        })?;
        let out = fit.simulate(self.initial, self.horizon, stochastic, rng)?;
        Ok(self.output.insert(out))
    }

    /// Returns the fitted parameters, if built.
    pub fn fit(&self) -> Option<&LimFit> {
        self.fit.as_ref()
    }

    /// Returns the trajectory from the last [`Lim::run()`], if any.
    pub fn output(&self) -> Option<&Array2<f64>> {
        self.output.as_ref()
    }

    /// Lag `τ` used for the fit.
    pub fn lag(&self) -> usize {
        self.spec.lag()
    }

    /// Number of steps `N` produced by [`Lim::run()`].
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Number of state dimensions `D`.
    pub fn n_dims(&self) -> usize {
        self.data.nrows()
    }

    /// Number of training time steps `T`.
    pub fn n_times(&self) -> usize {
        self.data.ncols()
    }
}
