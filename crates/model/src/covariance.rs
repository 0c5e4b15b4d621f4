//! Raw and lagged covariance products of the training data.

use ndarray::{Array2, ArrayView2, s};

/// Zero-lag and lag-τ covariance products of a D×T series.
#[derive(Clone, Debug)]
pub(crate) struct LaggedCovariance {
    /// `C0 = x0 · x0ᵀ`.
    pub(crate) c0: Array2<f64>,
    /// `Ct = xt · x0ᵀ`.
    pub(crate) ct: Array2<f64>,
}

/// Computes the uncentred products `C0 = x0·x0ᵀ` and `Ct = xt·x0ᵀ`, where
/// `x0` holds columns `0..T-lag` and `xt` holds columns `lag..T`.
///
/// With `lag == 0` both slices are the whole series. The caller guarantees
/// `lag < T`.
pub(crate) fn lagged_covariances(data: ArrayView2<'_, f64>, lag: usize) -> LaggedCovariance {
    let n = data.ncols();
    let x0 = data.slice(s![.., ..n - lag]);
    let xt = data.slice(s![.., lag..]);

    LaggedCovariance {
        c0: x0.dot(&x0.t()),
        ct: xt.dot(&x0.t()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn shapes_are_square() {
        let data = Array2::<f64>::from_shape_fn((3, 10), |(i, j)| (i + j) as f64);
        let cov = lagged_covariances(data.view(), 2);
        assert_eq!(cov.c0.shape(), &[3, 3]);
        assert_eq!(cov.ct.shape(), &[3, 3]);
    }

    #[test]
    fn hand_computed_lag_one() {
        let data = array![[1.0, 2.0, 3.0, 4.0, 5.0], [5.0, 4.0, 3.0, 2.0, 1.0]];
        let cov = lagged_covariances(data.view(), 1);

        // x0 = [[1,2,3,4],[5,4,3,2]], xt = [[2,3,4,5],[4,3,2,1]]
        let c0 = array![[30.0, 30.0], [30.0, 54.0]];
        let ct = array![[40.0, 44.0], [20.0, 40.0]];
        assert_abs_diff_eq!(cov.c0, c0, epsilon = 1e-12);
        assert_abs_diff_eq!(cov.ct, ct, epsilon = 1e-12);
    }

    #[test]
    fn c0_is_symmetric() {
        let data = Array2::<f64>::from_shape_fn((4, 20), |(i, j)| ((i * 7 + j * 3) % 11) as f64);
        let cov = lagged_covariances(data.view(), 3);
        assert_abs_diff_eq!(cov.c0, cov.c0.t().to_owned(), epsilon = 1e-12);
    }

    #[test]
    fn zero_lag_uses_full_series_against_itself() {
        let data = array![[1.0, -1.0, 2.0], [0.5, 0.0, 1.5]];
        let cov = lagged_covariances(data.view(), 0);
        assert_abs_diff_eq!(cov.c0, cov.ct, epsilon = 1e-15);
        assert_abs_diff_eq!(cov.c0, data.dot(&data.t()), epsilon = 1e-15);
    }
}
