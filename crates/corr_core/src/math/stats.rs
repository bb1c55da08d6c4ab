//! Sample statistics.
//!
//! All functions are generic over `T: Float` and return `None` instead of
//! NaN when the statistic is undefined (too few observations, or a
//! zero-variance input for correlation).

use num_traits::Float;

/// Arithmetic mean. `None` for an empty slice.
///
/// # Example
///
/// ```
/// use corr_core::math::stats::mean;
///
/// assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
/// assert_eq!(mean::<f64>(&[]), None);
/// ```
pub fn mean<T: Float>(values: &[T]) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let n = T::from(values.len())?;
    let sum = values.iter().fold(T::zero(), |acc, v| acc + *v);
    Some(sum / n)
}

/// Sample variance with an `n - 1` denominator. `None` below 2 observations.
pub fn sample_variance<T: Float>(values: &[T]) -> Option<T> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let dof = T::from(values.len() - 1)?;
    let ss = values.iter().fold(T::zero(), |acc, v| {
        let d = *v - m;
        acc + d * d
    });
    Some(ss / dof)
}

/// Sample standard deviation (`n - 1` denominator).
///
/// # Example
///
/// ```
/// use corr_core::math::stats::sample_std_dev;
///
/// let sd = sample_std_dev::<f64>(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
/// assert!((sd - 2.138089935299395).abs() < 1e-12);
/// ```
pub fn sample_std_dev<T: Float>(values: &[T]) -> Option<T> {
    sample_variance(values).map(|v| v.sqrt())
}

/// Pearson correlation coefficient of two equally long samples.
///
/// Returns `None` when the lengths differ, fewer than two observations are
/// available, or either sample has (numerically) zero variance. A defined
/// result is clamped to `[-1, 1]`.
///
/// The variance test is relative to the sample's second moment, so a
/// constant series whose mean picks up rounding error is still treated as
/// degenerate.
///
/// # Example
///
/// ```
/// use corr_core::math::stats::pearson;
///
/// let x: [f64; 4] = [1.0, 2.0, 3.0, 4.0];
/// let y = [2.0, 4.0, 6.0, 8.0];
/// assert!((pearson(&x, &y).unwrap() - 1.0).abs() < 1e-12);
///
/// // Zero variance is undefined, not zero.
/// assert_eq!(pearson(&x, &[3.0; 4]), None);
/// ```
pub fn pearson<T: Float>(xs: &[T], ys: &[T]) -> Option<T> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let mx = mean(xs)?;
    let my = mean(ys)?;

    let mut sxx = T::zero();
    let mut syy = T::zero();
    let mut sxy = T::zero();
    let mut raw_xx = T::zero();
    let mut raw_yy = T::zero();
    for (x, y) in xs.iter().zip(ys) {
        let dx = *x - mx;
        let dy = *y - my;
        sxx = sxx + dx * dx;
        syy = syy + dy * dy;
        sxy = sxy + dx * dy;
        raw_xx = raw_xx + *x * *x;
        raw_yy = raw_yy + *y * *y;
    }

    if is_degenerate(sxx, raw_xx) || is_degenerate(syy, raw_yy) {
        return None;
    }

    let rho = sxy / (sxx.sqrt() * syy.sqrt());
    if !rho.is_finite() {
        return None;
    }
    Some(rho.max(-T::one()).min(T::one()))
}

/// Round half away from zero to `decimals` places.
///
/// # Example
///
/// ```
/// use corr_core::math::stats::round_to;
///
/// assert_eq!(round_to(0.12345_f64, 3), 0.123);
/// assert_eq!(round_to(-0.9996_f64, 3), -1.0);
/// ```
pub fn round_to<T: Float>(value: T, decimals: i32) -> T {
    let five = T::one() + T::one() + T::one() + T::one() + T::one();
    let scale = (five + five).powi(decimals);
    (value * scale).round() / scale
}

#[inline]
fn is_degenerate<T: Float>(centred: T, raw: T) -> bool {
    centred <= T::zero() || centred <= raw * T::epsilon()
}
