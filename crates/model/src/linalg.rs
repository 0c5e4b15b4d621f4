//! Dense linear algebra helpers shared by the propagator solver.
//!
//! Training data, residuals and trajectories live in `ndarray` arrays; the
//! decompositions (SVD, Schur, LU, matrix exponential) come from `nalgebra`.
//! These helpers convert between the two and provide the norms used by the
//! convergence checks.

use nalgebra::DMatrix;
use ndarray::{Array2, ArrayView2};

/// Copies an `ndarray` view into a column-major `nalgebra` matrix.
pub(crate) fn to_dmatrix(a: ArrayView2<'_, f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

/// Copies an `nalgebra` matrix into an owned `ndarray` array.
pub(crate) fn from_dmatrix(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Maximum absolute column sum.
pub(crate) fn one_norm(m: &DMatrix<f64>) -> f64 {
    m.column_iter()
        .map(|c| c.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0, f64::max)
}

/// Reciprocal condition number `sigma_min / sigma_max` from the singular
/// values. Returns 0.0 for an all-zero or empty matrix.
pub(crate) fn reciprocal_condition(m: &DMatrix<f64>) -> f64 {
    let sv = m.singular_values();
    let max = sv.iter().copied().fold(0.0, f64::max);
    let min = sv.iter().copied().fold(f64::INFINITY, f64::min);
    if max <= 0.0 || !min.is_finite() {
        return 0.0;
    }
    min / max
}

/// Integer matrix power by repeated multiplication. `power(m, 0)` is the
/// identity.
pub(crate) fn power(m: &DMatrix<f64>, exponent: usize) -> DMatrix<f64> {
    let mut out = DMatrix::identity(m.nrows(), m.ncols());
    for _ in 0..exponent {
        out = &out * m;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn round_trip_preserves_layout() {
        let a = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let m = to_dmatrix(a.view());
        assert_eq!(m.nrows(), 2);
        assert_eq!(m.ncols(), 3);
        assert_eq!(m[(0, 2)], 3.0);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(from_dmatrix(&m), a);
    }

    #[test]
    fn one_norm_is_max_column_sum() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, -4.0, 2.0, 1.0]);
        assert_abs_diff_eq!(one_norm(&m), 5.0);
    }

    #[test]
    fn rcond_identity_is_one() {
        let m = DMatrix::<f64>::identity(3, 3);
        assert_abs_diff_eq!(reciprocal_condition(&m), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rcond_rank_deficient_is_tiny() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        assert!(reciprocal_condition(&m) < 1e-12);
    }

    #[test]
    fn rcond_zero_matrix_is_zero() {
        let m = DMatrix::<f64>::zeros(2, 2);
        assert_eq!(reciprocal_condition(&m), 0.0);
    }

    #[test]
    fn power_matches_manual_product() {
        let m = DMatrix::from_row_slice(2, 2, &[0.9, 0.1, -0.2, 0.8]);
        let expected = &m * &m * &m;
        assert_abs_diff_eq!(power(&m, 3), expected, epsilon = 1e-14);
        assert_eq!(power(&m, 0), DMatrix::identity(2, 2));
    }
}
