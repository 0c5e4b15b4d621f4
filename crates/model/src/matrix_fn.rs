//! Real principal matrix logarithm and fractional matrix roots.
//!
//! The logarithm uses inverse scaling and squaring: Denman–Beavers square
//! roots are taken until the matrix is within 0.25 of the identity in the
//! 1-norm, the Mercator series of `log(I + X)` is summed, and the result is
//! scaled back by `2^k`.
//!
//! Everything stays in real arithmetic. A real matrix whose spectrum avoids
//! the closed negative real axis has a real principal logarithm, so inputs
//! with an eigenvalue on that axis (including zero) are rejected up front
//! instead of producing a complex result whose imaginary part would have to
//! be dropped.

use nalgebra::DMatrix;
use tracing::{debug, trace};

use crate::error::LimError;
use crate::linalg::one_norm;

/// Target distance from the identity before the series is summed.
const SQRT_TARGET: f64 = 0.25;
/// Upper bound on repeated square roots.
const MAX_SQRTS: usize = 64;
/// Upper bound on Denman–Beavers iterations per square root.
const MAX_DB_ITER: usize = 100;
/// Relative step size at which a square root is accepted.
const DB_TOL: f64 = 1e-13;
/// Relative step size below which a stalled iteration is still accepted.
const DB_STALL_TOL: f64 = 1e-8;
/// Upper bound on Mercator series terms.
const MAX_SERIES_TERMS: usize = 200;
/// Relative tolerance for classifying an eigenvalue as real and non-positive.
const BRANCH_TOL: f64 = 1e-10;

fn decomposition(reason: impl Into<String>) -> LimError {
    LimError::PropagatorDecomposition {
        reason: reason.into(),
    }
}

/// Rejects matrices with an eigenvalue on the closed negative real axis.
pub(crate) fn check_log_branch(m: &DMatrix<f64>) -> Result<(), LimError> {
    if m.iter().any(|v| !v.is_finite()) {
        return Err(decomposition("matrix contains non-finite entries"));
    }
    for lambda in m.complex_eigenvalues().iter() {
        let scale = lambda.norm().max(1.0);
        if lambda.im.abs() <= BRANCH_TOL * scale && lambda.re <= BRANCH_TOL * scale {
            return Err(decomposition(format!(
                "eigenvalue {:.6e}{:+.6e}i lies on the closed negative real axis; \
                 the real principal logarithm is undefined",
                lambda.re, lambda.im
            )));
        }
    }
    Ok(())
}

/// Principal square root by the Denman–Beavers iteration.
pub(crate) fn sqrtm(a: &DMatrix<f64>) -> Result<DMatrix<f64>, LimError> {
    let n = a.nrows();
    let mut y = a.clone();
    let mut z = DMatrix::<f64>::identity(n, n);
    let mut prev_delta = f64::INFINITY;

    for iter in 0..MAX_DB_ITER {
        let y_inv = y
            .clone()
            .try_inverse()
            .ok_or_else(|| decomposition("square-root iterate became singular"))?;
        let z_inv = z
            .clone()
            .try_inverse()
            .ok_or_else(|| decomposition("square-root iterate became singular"))?;

        let y_next = (&y + &z_inv) * 0.5;
        let z_next = (&z + &y_inv) * 0.5;
        let delta = one_norm(&(&y_next - &y));
        let scale = one_norm(&y_next).max(f64::MIN_POSITIVE);
        y = y_next;
        z = z_next;

        if !delta.is_finite() {
            return Err(decomposition("square-root iteration diverged"));
        }
        if delta <= DB_TOL * scale || (delta >= prev_delta && delta <= DB_STALL_TOL * scale) {
            trace!(iterations = iter + 1, "square root converged");
            return Ok(y);
        }
        prev_delta = delta;
    }

    Err(decomposition(format!(
        "square root did not converge in {MAX_DB_ITER} iterations"
    )))
}

/// `log(I + X)` for `‖X‖₁ ≤ 0.25`.
fn mercator_series(x: &DMatrix<f64>) -> Result<DMatrix<f64>, LimError> {
    let mut term = x.clone();
    let mut sum = x.clone();

    for k in 2..=MAX_SERIES_TERMS {
        term = &term * x;
        let sign = if k % 2 == 0 { -1.0 } else { 1.0 };
        let contribution = &term * (sign / k as f64);
        sum += &contribution;
        if one_norm(&contribution) <= f64::EPSILON * one_norm(&sum).max(f64::MIN_POSITIVE) {
            return Ok(sum);
        }
    }

    Err(decomposition(format!(
        "logarithm series did not converge in {MAX_SERIES_TERMS} terms"
    )))
}

/// Real principal matrix logarithm.
///
/// # Errors
///
/// [`LimError::PropagatorDecomposition`] if `m` has an eigenvalue on the
/// closed negative real axis, a square root fails to converge, or the result
/// is not finite.
pub(crate) fn principal_log(m: &DMatrix<f64>) -> Result<DMatrix<f64>, LimError> {
    check_log_branch(m)?;

    let n = m.nrows();
    let identity = DMatrix::<f64>::identity(n, n);
    let mut a = m.clone();
    let mut n_sqrts = 0usize;

    while one_norm(&(&a - &identity)) > SQRT_TARGET {
        if n_sqrts == MAX_SQRTS {
            return Err(decomposition(format!(
                "matrix did not approach the identity after {MAX_SQRTS} square roots"
            )));
        }
        a = sqrtm(&a)?;
        n_sqrts += 1;
    }

    let log_a = mercator_series(&(&a - &identity))?;
    let log_m = log_a * 2f64.powi(n_sqrts as i32);
    debug!(n_sqrts, "matrix logarithm computed");

    if log_m.iter().any(|v| !v.is_finite()) {
        return Err(decomposition("matrix logarithm is not finite"));
    }
    Ok(log_m)
}

/// Principal `root`-th root `exp(log(m) / root)`.
pub(crate) fn fractional_root(m: &DMatrix<f64>, root: usize) -> Result<DMatrix<f64>, LimError> {
    debug_assert!(root > 0, "root must be positive");
    let log_m = principal_log(m)?;
    let out = (log_m / root as f64).exp();
    if out.iter().any(|v| !v.is_finite()) {
        return Err(decomposition("matrix exponential is not finite"));
    }
    Ok(out)
}
