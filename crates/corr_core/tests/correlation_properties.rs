//! Property tests for the correlation statistics.
//!
//! Verifies the invariants every consumer relies on: self-correlation is one,
//! correlation is symmetric, and defined values never leave `[-1, 1]`.

use approx::assert_relative_eq;
use corr_core::math::rolling::{rolling_pearson, rolling_std};
use corr_core::math::stats::pearson;
use corr_core::{period_returns, Correlation};
use proptest::prelude::*;

fn price_path() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-0.05_f64..0.05, 8..64).prop_map(|steps| {
        let mut price = 100.0;
        steps
            .into_iter()
            .map(|r| {
                price *= 1.0 + r;
                price
            })
            .collect()
    })
}

fn returns_of(prices: &[f64]) -> Vec<Option<f64>> {
    let wrapped: Vec<Option<f64>> = prices.iter().copied().map(Some).collect();
    period_returns(&wrapped)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_self_correlation_is_one(prices in price_path()) {
        let r: Vec<f64> = returns_of(&prices).into_iter().flatten().collect();
        if let Some(rho) = pearson(&r, &r) {
            assert_relative_eq!(rho, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_correlation_is_symmetric(a in price_path(), b in price_path()) {
        let n = a.len().min(b.len());
        let ra = returns_of(&a[..n]);
        let rb = returns_of(&b[..n]);
        let window = (n / 2).max(2);

        let ab = rolling_pearson(&ra, &rb, window);
        let ba = rolling_pearson(&rb, &ra, window);
        for (x, y) in ab.iter().zip(&ba) {
            match (x, y) {
                (Some(x), Some(y)) => assert_relative_eq!(*x, *y, epsilon = 1e-12),
                (None, None) => {}
                _ => {
                    prop_assert!(false, "definedness differs: {:?} vs {:?}", x, y);
                }
            }
        }
    }

    #[test]
    fn test_correlation_is_bounded(a in price_path(), b in price_path(), window in 2_usize..8) {
        let n = a.len().min(b.len());
        let out = rolling_pearson(&returns_of(&a[..n]), &returns_of(&b[..n]), window);
        for rho in out.into_iter().flatten() {
            prop_assert!((-1.0..=1.0).contains(&rho), "rho = {}", rho);
        }
    }

    #[test]
    fn test_rolling_std_non_negative(prices in price_path(), window in 2_usize..8) {
        for sd in rolling_std(&returns_of(&prices), window).into_iter().flatten() {
            prop_assert!(sd >= 0.0);
        }
    }

    #[test]
    fn test_correlation_outcome_never_nan(raw in prop::option::of(prop::num::f64::ANY)) {
        if let Some(value) = Correlation::from_estimate(raw).value() {
            prop_assert!(value.is_finite());
            prop_assert!((-1.0..=1.0).contains(&value));
        }
    }
}

#[test]
fn test_rolling_defined_length_scenario() {
    // 21 prices -> 20 returns; a 5-day window is defined on 20 - 5 + 1 points.
    let prices: Vec<f64> = (0..21).map(|i| 100.0 + (i as f64 * 0.8).sin() * 3.0).collect();
    let other: Vec<f64> = (0..21).map(|i| 50.0 + (i as f64 * 0.5).cos() * 2.0).collect();
    let out = rolling_pearson(&returns_of(&prices), &returns_of(&other), 5);
    assert_eq!(out.len(), 21);
    assert_eq!(out.iter().filter(|v| v.is_some()).count(), 20 - 5 + 1);
}
