//! Scalar statistics helpers for the LIM workspace.

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    match data.len() {
        0 => 0.0,
        n => data.iter().sum::<f64>() / n as f64,
    }
}

/// Sample variance with N-1 denominator.
/// Returns 0.0 if fewer than 2 elements.
pub fn variance(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    let ss: f64 = data.iter().map(|&x| (x - m).powi(2)).sum();
    ss / (data.len() - 1) as f64
}

/// Sample standard deviation with N-1 denominator.
pub fn sd(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Pearson correlation over the pairs where both values are finite.
///
/// `None` with fewer than 3 such pairs or when either side is constant.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .unzip();
    if xs.len() < 3 {
        return None;
    }

    let (mx, my) = (mean(&xs), mean(&ys));
    let (sxy, sxx, syy) = xs.iter().zip(&ys).fold((0.0, 0.0, 0.0), |(sxy, sxx, syy), (a, b)| {
        let (dx, dy) = (a - mx, b - my);
        (sxy + dx * dy, sxx + dx * dx, syy + dy * dy)
    });

    let denom = (sxx * syy).sqrt();
    (denom > 0.0).then(|| sxy / denom)
}

/// Correlation between `series[..n - lag]` and `series[lag..]`.
///
/// Returns `None` when `lag >= series.len()` or when
/// [`pearson_correlation`] is undefined for the two slices.
pub fn lagged_correlation(series: &[f64], lag: usize) -> Option<f64> {
    if lag >= series.len() {
        return None;
    }
    let n = series.len();
    pearson_correlation(&series[..n - lag], &series[lag..])
}

/// Element-wise mean across equally long members.
///
/// Returns an empty vector when `members` is empty.
///
/// # Panics
///
/// Panics if the members differ in length.
pub fn ensemble_mean(members: &[Vec<f64>]) -> Vec<f64> {
    let Some(first) = members.first() else {
        return Vec::new();
    };
    let len = first.len();
    assert!(
        members.iter().all(|m| m.len() == len),
        "ensemble_mean: members must have equal length"
    );
    (0..len)
        .map(|i| members.iter().map(|m| m[i]).sum::<f64>() / members.len() as f64)
        .collect()
}

/// Element-wise sample standard deviation across equally long members.
///
/// # Panics
///
/// Panics if the members differ in length.
pub fn ensemble_sd(members: &[Vec<f64>]) -> Vec<f64> {
    let Some(first) = members.first() else {
        return Vec::new();
    };
    let len = first.len();
    assert!(
        members.iter().all(|m| m.len() == len),
        "ensemble_sd: members must have equal length"
    );
    let mut column = Vec::with_capacity(members.len());
    (0..len)
        .map(|i| {
            column.clear();
            column.extend(members.iter().map(|m| m[i]));
            sd(&column)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        assert_relative_eq!(mean(&[0.5, -1.5, 4.0, 1.0]), 1.0, epsilon = 1e-12);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_variance_and_sd() {
        // deviations from 2: -2, -1, 0, 1, 2 -> ss = 10, var = 10 / 4
        let data = [0.0, 1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(variance(&data), 2.5, epsilon = 1e-12);
        assert_relative_eq!(sd(&data), 2.5_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_variance_short_input() {
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(sd(&[3.0]), 0.0);
    }

    #[test]
    fn test_pearson_correlation_linear() {
        let x = [0.1, 0.4, 0.2, 0.9, 0.5];
        let y: Vec<f64> = x.iter().map(|v| 3.0 - 2.0 * v).collect();
        assert_relative_eq!(pearson_correlation(&x, &y).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_correlation_undefined() {
        assert!(pearson_correlation(&[1.0, 2.0], &[3.0, 4.0]).is_none());
        assert!(pearson_correlation(&[2.0, 2.0, 2.0], &[1.0, 5.0, 3.0]).is_none());
    }

    #[test]
    fn test_pearson_correlation_skips_non_finite_pairs() {
        let x = [1.0, f64::NAN, 2.0, 3.0, f64::INFINITY, 4.0];
        let y = [2.0, 0.0, 4.0, 6.0, 1.0, 8.0];
        assert_relative_eq!(pearson_correlation(&x, &y).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lagged_correlation_zero_lag() {
        let x = [0.3, -1.0, 2.0, 0.5, 1.5];
        assert_relative_eq!(lagged_correlation(&x, 0).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lagged_correlation_linear_trend() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        assert_relative_eq!(lagged_correlation(&x, 3).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lagged_correlation_alternating() {
        let x: Vec<f64> = (0..12).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        assert_relative_eq!(lagged_correlation(&x, 1).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lagged_correlation_lag_too_long() {
        assert!(lagged_correlation(&[1.0, 2.0, 3.0], 3).is_none());
    }

    #[test]
    fn test_ensemble_mean_and_sd() {
        let members = vec![vec![1.0, 10.0], vec![3.0, 10.0], vec![5.0, 10.0]];
        let m = ensemble_mean(&members);
        let s = ensemble_sd(&members);
        assert_relative_eq!(m[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(m[1], 10.0, epsilon = 1e-12);
        assert_relative_eq!(s[0], 2.0, epsilon = 1e-12);
        assert_eq!(s[1], 0.0);
    }

    #[test]
    fn test_ensemble_empty() {
        assert!(ensemble_mean(&[]).is_empty());
        assert!(ensemble_sd(&[]).is_empty());
    }

    #[test]
    #[should_panic(expected = "ensemble_mean: members must have equal length")]
    fn test_ensemble_mean_ragged_panics() {
        ensemble_mean(&[vec![1.0], vec![1.0, 2.0]]);
    }
}
