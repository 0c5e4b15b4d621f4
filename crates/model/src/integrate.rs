//! Stochastic forward integration with bootstrap-resampled residuals.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;

use crate::error::LimError;

/// How residual noise is drawn at each integration step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Resampling {
    /// Each state dimension draws its own residual, uniformly with
    /// replacement from its row of the residual matrix. Cross-dimension
    /// correlation of the noise is not preserved.
    #[default]
    Independent,
    /// One residual column is drawn uniformly with replacement and used for
    /// every dimension, preserving the empirical cross-dimension correlation.
    Joint,
}

/// Fills `eps` with one bootstrap draw from `residuals`.
fn draw_noise(
    residuals: ArrayView2<'_, f64>,
    resampling: Resampling,
    rng: &mut impl Rng,
    eps: &mut Array1<f64>,
) {
    let n = residuals.ncols();
    match resampling {
        Resampling::Independent => {
            for (d, e) in eps.iter_mut().enumerate() {
                *e = residuals[[d, rng.random_range(0..n)]];
            }
        }
        Resampling::Joint => {
            let t = rng.random_range(0..n);
            eps.assign(&residuals.column(t));
        }
    }
}

/// Advances `initial` for `n_steps - 1` steps of `x[t+1] = G₁·x[t] + ε`.
///
/// Column 0 of the returned D×`n_steps` trajectory is `initial`. With
/// `noise = None` the propagation is deterministic (ε = 0) and `rng` is not
/// touched; otherwise ε is drawn freshly at every step from `residuals`.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`LimError::InvalidHorizon`] | `n_steps == 0` |
/// | [`LimError::DimensionMismatch`] | `initial` or `residuals` do not match `g1` |
/// | [`LimError::EmptyData`] | stochastic run with an empty residual matrix |
pub(crate) fn integrate(
    g1: ArrayView2<'_, f64>,
    residuals: ArrayView2<'_, f64>,
    initial: ArrayView1<'_, f64>,
    n_steps: usize,
    noise: Option<Resampling>,
    rng: &mut impl Rng,
) -> Result<Array2<f64>, LimError> {
    let d = g1.nrows();
    if n_steps == 0 {
        return Err(LimError::InvalidHorizon);
    }
    if initial.len() != d {
        return Err(LimError::DimensionMismatch {
            what: "initial condition",
            expected: d,
            got: initial.len(),
        });
    }
    if residuals.nrows() != d {
        return Err(LimError::DimensionMismatch {
            what: "residual rows",
            expected: d,
            got: residuals.nrows(),
        });
    }
    if noise.is_some() && residuals.ncols() == 0 {
        return Err(LimError::EmptyData);
    }

    let mut out = Array2::zeros((d, n_steps));
    out.column_mut(0).assign(&initial);
    let mut eps = Array1::zeros(d);

    for t in 0..n_steps - 1 {
        let mut next = g1.dot(&out.column(t));
        if let Some(resampling) = noise {
            draw_noise(residuals, resampling, rng, &mut eps);
            next += &eps;
        }
        out.column_mut(t + 1).assign(&next);
    }

    Ok(out)
}
