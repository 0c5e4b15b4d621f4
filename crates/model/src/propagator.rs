//! Lag-τ and unit-step propagators.
//!
//! The lag propagator is the least-squares regression `G = C(τ)·C(0)⁻¹`.
//! It is only calibrated for steps of length τ, so the integrator advances
//! with the unit-step propagator `G₁ = exp(log(G)/τ)`, whose τ-th power
//! reproduces `G`.

use nalgebra::DMatrix;
use ndarray::Array2;
use tracing::debug;

use crate::covariance::LaggedCovariance;
use crate::error::LimError;
use crate::linalg::{from_dmatrix, power, reciprocal_condition, to_dmatrix};
use crate::matrix_fn::fractional_root;

/// Smallest reciprocal condition number accepted for `C0`.
pub(crate) const MIN_RCOND: f64 = 1e-12;

/// Largest relative Frobenius error accepted for `G₁^τ` against `G`.
pub(crate) const MAX_ROOT_ERROR: f64 = 1e-6;

/// Fitted lag and unit-step propagators.
#[derive(Clone, Debug)]
pub(crate) struct Propagators {
    /// τ-lag propagator `G`.
    pub(crate) tau_lag: Array2<f64>,
    /// Unit-step propagator `G₁`.
    pub(crate) unit: Array2<f64>,
}

/// Solves `G = Ct · C0⁻¹`.
///
/// # Errors
///
/// [`LimError::SingularMatrix`] if `C0` is rank-deficient to working
/// precision or cannot be inverted.
pub(crate) fn solve_lag_propagator(cov: &LaggedCovariance) -> Result<DMatrix<f64>, LimError> {
    let c0 = to_dmatrix(cov.c0.view());
    let ct = to_dmatrix(cov.ct.view());

    let rcond = reciprocal_condition(&c0);
    debug!(rcond, "zero-lag covariance conditioning");
    if rcond.is_nan() || rcond < MIN_RCOND {
        return Err(LimError::SingularMatrix { rcond });
    }

    let c0_inv = c0
        .try_inverse()
        .ok_or(LimError::SingularMatrix { rcond })?;
    Ok(ct * c0_inv)
}

/// Derives the unit-step propagator from `G` and checks that its `lag`-th
/// power reproduces `G`.
///
/// # Errors
///
/// [`LimError::PropagatorDecomposition`] if the logarithm of `G` is
/// undefined or the root does not reproduce `G` within tolerance.
pub(crate) fn unit_step_propagator(g: &DMatrix<f64>, lag: usize) -> Result<DMatrix<f64>, LimError> {
    if lag == 1 {
        // exp(log(G)) = G, only the branch condition applies.
        crate::matrix_fn::check_log_branch(g)?;
        return Ok(g.clone());
    }

    let g1 = fractional_root(g, lag)?;
    check_reconstruction(g, &g1, lag)?;
    Ok(g1)
}

/// Requires `g1^lag` to match `g` within [`MAX_ROOT_ERROR`] relative
/// Frobenius error.
fn check_reconstruction(g: &DMatrix<f64>, g1: &DMatrix<f64>, lag: usize) -> Result<(), LimError> {
    let reconstructed = power(g1, lag);
    let scale = g.norm().max(f64::MIN_POSITIVE);
    let rel_err = (&reconstructed - g).norm() / scale;
    debug!(lag, rel_err, "unit-step propagator reconstruction");
    if rel_err.is_nan() || rel_err > MAX_ROOT_ERROR {
        return Err(LimError::PropagatorDecomposition {
            reason: format!(
                "unit-step propagator raised to the power {lag} deviates from the lag propagator \
                 (relative error {rel_err:.3e})"
            ),
        });
    }
    Ok(())
}

/// Runs the full solver: lag propagator, then unit-step propagator.
pub(crate) fn solve(cov: &LaggedCovariance, lag: usize) -> Result<Propagators, LimError> {
    let g = solve_lag_propagator(cov)?;
    let g1 = unit_step_propagator(&g, lag)?;
    Ok(Propagators {
        tau_lag: from_dmatrix(&g),
        unit: from_dmatrix(&g1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::covariance::lagged_covariances;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn scenario_lag_one() {
        let data = array![[1.0, 2.0, 3.0, 4.0, 5.0], [5.0, 4.0, 3.0, 2.0, 1.0]];
        let cov = lagged_covariances(data.view(), 1);
        let p = solve(&cov, 1).unwrap();

        // G = Ct C0^-1 = [[7/6, 1/6], [-1/6, 5/6]]
        let expected = array![[7.0 / 6.0, 1.0 / 6.0], [-1.0 / 6.0, 5.0 / 6.0]];
        assert_abs_diff_eq!(p.tau_lag, expected, epsilon = 1e-12);
        assert_abs_diff_eq!(p.unit, expected, epsilon = 1e-12);
    }

    #[test]
    fn singular_covariance_rejected() {
        let cov = LaggedCovariance {
            c0: array![[1.0, 2.0], [2.0, 4.0]],
            ct: array![[1.0, 0.0], [0.0, 1.0]],
        };
        assert!(matches!(
            solve_lag_propagator(&cov),
            Err(LimError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn zero_covariance_rejected() {
        let cov = LaggedCovariance {
            c0: Array2::zeros((2, 2)),
            ct: Array2::zeros((2, 2)),
        };
        assert!(matches!(
            solve_lag_propagator(&cov),
            Err(LimError::SingularMatrix { rcond }) if rcond == 0.0
        ));
    }

    #[test]
    fn unit_step_reproduces_lag_propagator() {
        let g1 = DMatrix::from_row_slice(2, 2, &[0.9, 0.15, -0.1, 0.8]);
        let g = power(&g1, 4);
        let root = unit_step_propagator(&g, 4).unwrap();
        assert_abs_diff_eq!(root, g1, epsilon = 1e-9);
    }

    #[test]
    fn negative_eigenvalue_rejected_for_any_lag() {
        let g = DMatrix::from_row_slice(2, 2, &[-0.7, 0.0, 0.0, 0.5]);
        for lag in [1, 2, 5] {
            assert!(matches!(
                unit_step_propagator(&g, lag),
                Err(LimError::PropagatorDecomposition { .. })
            ));
        }
    }

    #[test]
    fn reconstruction_within_tolerance_accepted() {
        let g1 = DMatrix::from_row_slice(2, 2, &[0.9, 0.15, -0.1, 0.8]);
        let g = power(&g1, 3);
        assert!(check_reconstruction(&g, &g1, 3).is_ok());
    }

    #[test]
    fn reconstruction_mismatch_rejected() {
        // 0.95^2 = 0.9025 vs 0.9: relative error ~2.8e-3
        let g = DMatrix::<f64>::identity(2, 2) * 0.9;
        let g1 = DMatrix::<f64>::identity(2, 2) * 0.95;
        let err = check_reconstruction(&g, &g1, 2).unwrap_err();
        match err {
            LimError::PropagatorDecomposition { reason } => {
                assert!(reason.contains("power 2"));
                assert!(reason.contains("relative error"));
            }
            other => panic!("expected PropagatorDecomposition, got {other:?}"),
        }
    }
}
