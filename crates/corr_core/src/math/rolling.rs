//! Trailing-window statistics over series with missing values.
//!
//! Each output entry `t` is computed from the inputs at `t + 1 - window ..= t`
//! and is defined only when every input in that window is present. Outputs
//! are aligned with the inputs, so the first `window - 1` entries are always
//! `None`.

use super::stats::{pearson, sample_std_dev};

/// Rolling sample standard deviation.
///
/// A window shorter than 2 yields no defined values.
///
/// # Example
///
/// ```
/// use corr_core::math::rolling::rolling_std;
///
/// let out = rolling_std(&[None, Some(1.0), Some(3.0), Some(5.0)], 2);
/// assert_eq!(out.len(), 4);
/// assert_eq!(out[1], None);
/// assert!((out[2].unwrap() - 2.0_f64.sqrt()).abs() < 1e-12);
/// ```
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window < 2 {
        return vec![None; values.len()];
    }
    rolling_apply(values.len(), window, |range| {
        let sample = full_window(&values[range])?;
        sample_std_dev(&sample)
    })
}

/// Rolling Pearson correlation of two aligned series.
///
/// Inputs longer than their counterpart are truncated to the shorter length.
/// Windows with a missing value on either side, or with zero variance on
/// either side, yield `None`.
///
/// # Example
///
/// ```
/// use corr_core::math::rolling::rolling_pearson;
///
/// let x = [None, Some(0.02), Some(-0.01), Some(0.03)];
/// let y = [None, Some(0.04), Some(-0.02), Some(0.06)];
/// let out = rolling_pearson(&x, &y, 3);
/// assert_eq!(out[2], None);
/// assert!((out[3].unwrap() - 1.0).abs() < 1e-12);
/// ```
pub fn rolling_pearson(xs: &[Option<f64>], ys: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let len = xs.len().min(ys.len());
    if window < 2 {
        return vec![None; len];
    }
    rolling_apply(len, window, |range| {
        let x = full_window(&xs[range.clone()])?;
        let y = full_window(&ys[range])?;
        pearson(&x, &y)
    })
}

/// Pearson correlation over the trailing `window` entries only.
///
/// Equivalent to the last element of `rolling_pearson`, without computing the
/// earlier windows.
pub fn trailing_pearson(xs: &[Option<f64>], ys: &[Option<f64>], window: usize) -> Option<f64> {
    let len = xs.len().min(ys.len());
    if window < 2 || len < window {
        return None;
    }
    let x = full_window(&xs[len - window..len])?;
    let y = full_window(&ys[len - window..len])?;
    pearson(&x, &y)
}

/// Values at positions where both series are present (pairwise deletion).
pub fn complete_pairs(xs: &[Option<f64>], ys: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
    xs.iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .unzip()
}

/// Collect a window if every entry is present.
fn full_window(window: &[Option<f64>]) -> Option<Vec<f64>> {
    window.iter().copied().collect()
}

fn rolling_apply<F>(len: usize, window: usize, mut f: F) -> Vec<Option<f64>>
where
    F: FnMut(std::ops::Range<usize>) -> Option<f64>,
{
    (0..len)
        .map(|end| {
            if end + 1 < window {
                None
            } else {
                f(end + 1 - window..end + 1)
            }
        })
        .collect()
}
