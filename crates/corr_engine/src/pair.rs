//! On-demand queries for a single asset pair.
//!
//! Two views of how a pair co-moves:
//!
//! - [`rolling_correlation`]: Pearson correlation of daily returns over a
//!   sliding window, one value per date.
//! - [`volatility_correlation`]: Pearson correlation between the two assets'
//!   rolling volatility (sample standard deviation of returns), one value per
//!   named horizon.

use corr_core::math::rolling::{complete_pairs, rolling_pearson, rolling_std};
use corr_core::math::stats::pearson;
use corr_core::{Correlation, PriceColumn, PriceTable, TradingDate};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::horizons::Horizon;

/// Share of a horizon's window that must be covered by overlapping
/// volatility observations.
pub const DEFAULT_MIN_COVERAGE: f64 = 0.8;

/// Rolling return correlation for one window length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingCorrelationSeries {
    /// Window length in trading days
    pub window: usize,
    /// One entry per table date; undefined until the window first fills
    pub points: Vec<(TradingDate, Correlation)>,
}

impl RollingCorrelationSeries {
    /// Entries with a defined correlation.
    pub fn defined(&self) -> impl Iterator<Item = (TradingDate, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|(date, c)| c.value().map(|v| (*date, v)))
    }

    /// Number of defined entries.
    pub fn defined_len(&self) -> usize {
        self.defined().count()
    }

    /// Most recent defined entry.
    pub fn latest(&self) -> Option<(TradingDate, f64)> {
        self.points
            .iter()
            .rev()
            .find_map(|(date, c)| c.value().map(|v| (*date, v)))
    }

    /// Correlation on `date`.
    pub fn get(&self, date: TradingDate) -> Option<Correlation> {
        self.points
            .binary_search_by_key(&date, |(d, _)| *d)
            .ok()
            .map(|i| self.points[i].1)
    }
}

/// Volatility correlation at one horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HorizonCorrelation {
    pub horizon: Horizon,
    /// Dates on which both rolling volatilities were defined
    pub observations: usize,
    pub correlation: Correlation,
}

/// Volatility correlation for every requested horizon, in request order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilityCorrelation {
    pub entries: Vec<HorizonCorrelation>,
}

impl VolatilityCorrelation {
    /// Entry for a horizon key such as `"3M"`.
    pub fn get(&self, key: &str) -> Option<&HorizonCorrelation> {
        self.entries.iter().find(|e| e.horizon.key.label() == key)
    }
}

/// Price relative to the first available price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSeries {
    pub symbol: String,
    /// `price / first valid price`; missing where the price is missing
    pub points: Vec<(TradingDate, Option<f64>)>,
}

impl NormalizedSeries {
    /// Most recent defined value.
    pub fn latest(&self) -> Option<f64> {
        self.points.iter().rev().find_map(|(_, v)| *v)
    }
}

/// Rolling Pearson correlation of the returns of `asset_a` and `asset_b`.
///
/// The series covers every date of `prices`. With `n` return observations
/// and no gaps, exactly `n - window_days + 1` entries are defined.
///
/// # Errors
///
/// * `EngineError::DataUnavailable` - empty table
/// * `EngineError::UnknownAsset` - either symbol is not a column
/// * `EngineError::InvalidWindow` - `window_days < 2`
pub fn rolling_correlation(
    prices: &PriceTable,
    asset_a: &str,
    asset_b: &str,
    window_days: usize,
) -> Result<RollingCorrelationSeries, EngineError> {
    check_window(window_days)?;
    let (a, b) = pair_columns(prices, asset_a, asset_b)?;

    let ra = a.returns();
    let rb = b.returns();
    let values = rolling_pearson(ra.values(), rb.values(), window_days);

    let points: Vec<(TradingDate, Correlation)> = prices
        .dates()
        .iter()
        .zip(values)
        .map(|(date, value)| (*date, Correlation::from_estimate(value)))
        .collect();

    let series = RollingCorrelationSeries {
        window: window_days,
        points,
    };
    debug!(
        asset_a,
        asset_b,
        window = window_days,
        defined = series.defined_len(),
        "Rolling correlation computed"
    );
    Ok(series)
}

/// Volatility correlation with [`DEFAULT_MIN_COVERAGE`].
///
/// # Example
///
/// ```
/// use chrono::{Duration, NaiveDate};
/// use corr_core::{PriceColumn, PriceTable};
/// use corr_engine::horizons::Horizon;
/// use corr_engine::pair::volatility_correlation;
///
/// let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
/// let dates: Vec<NaiveDate> = (0..80).map(|i| start + Duration::days(i)).collect();
/// let path = |f: f64| -> Vec<Option<f64>> {
///     let mut p = 100.0;
///     (0..80)
///         .map(|i| {
///             p *= 1.0 + 0.02 * (i as f64 * f).sin() * (i as f64 * 0.05).cos();
///             Some(p)
///         })
///         .collect()
/// };
/// let table = PriceTable::new(
///     dates,
///     vec![PriceColumn::new("SPY", path(0.7)), PriceColumn::new("GLD", path(1.1))],
/// )
/// .unwrap();
///
/// let vol = volatility_correlation(&table, "SPY", "GLD", &Horizon::standard()).unwrap();
/// assert!(vol.get("1M").unwrap().correlation.is_defined());
/// // 80 rows cannot support a one-year volatility window.
/// assert!(!vol.get("1Y").unwrap().correlation.is_defined());
/// ```
pub fn volatility_correlation(
    prices: &PriceTable,
    asset_a: &str,
    asset_b: &str,
    horizons: &[Horizon],
) -> Result<VolatilityCorrelation, EngineError> {
    volatility_correlation_with_coverage(prices, asset_a, asset_b, horizons, DEFAULT_MIN_COVERAGE)
}

/// Pearson correlation of the two assets' rolling return volatility.
///
/// For each horizon of `d` trading days, both assets get a rolling sample
/// standard deviation of returns over `d` days. Dates where either volatility
/// is missing are dropped. When at least `min_coverage * d` dates remain, the
/// result is the Pearson coefficient of the two volatility series over all of
/// them; otherwise the horizon is `InsufficientData`.
///
/// # Errors
///
/// * `EngineError::InvalidCoverage` - `min_coverage` outside `(0, 1]`
/// * `EngineError::InvalidWindow` - a horizon shorter than 2 days
/// * plus the errors of [`rolling_correlation`] for the table and symbols
pub fn volatility_correlation_with_coverage(
    prices: &PriceTable,
    asset_a: &str,
    asset_b: &str,
    horizons: &[Horizon],
    min_coverage: f64,
) -> Result<VolatilityCorrelation, EngineError> {
    if !(min_coverage > 0.0 && min_coverage <= 1.0) {
        return Err(EngineError::InvalidCoverage(min_coverage));
    }
    for horizon in horizons {
        check_window(horizon.days())?;
    }
    let (a, b) = pair_columns(prices, asset_a, asset_b)?;

    let ra = a.returns();
    let rb = b.returns();

    let entries = horizons
        .iter()
        .map(|horizon| {
            let days = horizon.days();
            let vol_a = rolling_std(ra.values(), days);
            let vol_b = rolling_std(rb.values(), days);
            let (xs, ys) = complete_pairs(&vol_a, &vol_b);

            let required = (min_coverage * days as f64).ceil() as usize;
            let correlation = if xs.len() >= required {
                Correlation::from_estimate(pearson(&xs, &ys))
            } else {
                Correlation::InsufficientData
            };

            if !correlation.is_defined() {
                debug!(
                    asset_a,
                    asset_b,
                    horizon = %horizon.key,
                    observations = xs.len(),
                    required,
                    "Insufficient data for volatility correlation"
                );
            }

            HorizonCorrelation {
                horizon: horizon.clone(),
                observations: xs.len(),
                correlation,
            }
        })
        .collect();

    Ok(VolatilityCorrelation { entries })
}

/// Prices of `symbol` divided by its first available price.
///
/// # Errors
///
/// * `EngineError::UnknownAsset` - `symbol` is not a column
/// * `EngineError::DataUnavailable` - the column has no prices
pub fn normalized_performance(
    prices: &PriceTable,
    symbol: &str,
) -> Result<NormalizedSeries, EngineError> {
    let column = prices
        .column(symbol)
        .ok_or_else(|| EngineError::unknown_asset(symbol))?;
    let base = column
        .first_valid()
        .ok_or_else(|| EngineError::data_unavailable(format!("no prices for {}", symbol)))?;

    let points = prices
        .dates()
        .iter()
        .zip(column.values())
        .map(|(date, price)| (*date, price.map(|p| p / base)))
        .collect();

    Ok(NormalizedSeries {
        symbol: symbol.to_string(),
        points,
    })
}

fn check_window(days: usize) -> Result<(), EngineError> {
    if days < 2 {
        return Err(EngineError::InvalidWindow(days));
    }
    Ok(())
}

fn pair_columns<'a>(
    prices: &'a PriceTable,
    asset_a: &str,
    asset_b: &str,
) -> Result<(&'a PriceColumn, &'a PriceColumn), EngineError> {
    if prices.is_empty() {
        return Err(EngineError::data_unavailable("price table is empty"));
    }
    let a = prices
        .column(asset_a)
        .ok_or_else(|| EngineError::unknown_asset(asset_a))?;
    let b = prices
        .column(asset_b)
        .ok_or_else(|| EngineError::unknown_asset(asset_b))?;
    if asset_a == asset_b {
        warn!(asset = asset_a, "Pair query on a single asset");
    }
    Ok((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::horizons::Lookback;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
        (0..n as i64).map(|i| start + Duration::days(i)).collect()
    }

    /// Price path whose daily return amplitude drifts over time.
    fn path(n: usize, freq: f64, drift: f64) -> Vec<Option<f64>> {
        let mut price = 100.0;
        (0..n)
            .map(|i| {
                let t = i as f64;
                price *= 1.0 + 0.01 * (1.0 + 0.5 * (t * drift).sin()) * (t * freq).sin();
                Some(price)
            })
            .collect()
    }

    fn table(columns: Vec<PriceColumn>) -> PriceTable {
        let n = columns[0].values().len();
        PriceTable::new(dates(n), columns).unwrap()
    }

    #[test]
    fn test_rolling_defined_count() {
        let t = table(vec![
            PriceColumn::new("A", path(100, 0.9, 0.05)),
            PriceColumn::new("B", path(100, 1.3, 0.07)),
        ]);
        let series = rolling_correlation(&t, "A", "B", 30).unwrap();
        assert_eq!(series.points.len(), 100);
        assert_eq!(series.defined_len(), 99 - 30 + 1);
        assert_eq!(series.defined().next().unwrap().0, t.dates()[30]);
    }

    #[test]
    fn test_rolling_latest_and_get() {
        let t = table(vec![
            PriceColumn::new("A", path(50, 0.9, 0.05)),
            PriceColumn::new("B", path(50, 1.3, 0.07)),
        ]);
        let series = rolling_correlation(&t, "A", "B", 10).unwrap();
        let (date, value) = series.latest().unwrap();
        assert_eq!(date, t.dates()[49]);
        assert_eq!(series.get(date), Some(Correlation::Defined(value)));
        assert_eq!(series.get(t.dates()[3]), Some(Correlation::InsufficientData));
        assert_eq!(series.get(NaiveDate::from_ymd_opt(1999, 1, 1).unwrap()), None);
    }

    #[test]
    fn test_rolling_self_correlation() {
        let t = table(vec![PriceColumn::new("A", path(40, 0.9, 0.05))]);
        let series = rolling_correlation(&t, "A", "A", 5).unwrap();
        for (_, rho) in series.defined() {
            assert_relative_eq!(rho, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rolling_errors() {
        let t = table(vec![
            PriceColumn::new("A", path(20, 0.9, 0.05)),
            PriceColumn::new("B", path(20, 1.3, 0.07)),
        ]);
        assert_eq!(
            rolling_correlation(&t, "A", "XYZ", 5).unwrap_err(),
            EngineError::UnknownAsset("XYZ".to_string())
        );
        assert_eq!(
            rolling_correlation(&t, "A", "B", 1).unwrap_err(),
            EngineError::InvalidWindow(1)
        );
        assert!(matches!(
            rolling_correlation(&PriceTable::default(), "A", "B", 5),
            Err(EngineError::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_volatility_matches_direct_computation() {
        let a = path(120, 0.9, 0.05);
        let b = path(120, 1.3, 0.11);
        let t = table(vec![PriceColumn::new("A", a.clone()), PriceColumn::new("B", b.clone())]);
        let horizon = Horizon::new(Lookback::parse("20D").unwrap());

        let vol = volatility_correlation(&t, "A", "B", &[horizon]).unwrap();
        let entry = vol.get("20D").unwrap();

        let sa = rolling_std(&corr_core::period_returns(&a), 20);
        let sb = rolling_std(&corr_core::period_returns(&b), 20);
        let (xs, ys) = complete_pairs(&sa, &sb);
        assert_eq!(entry.observations, 119 - 20 + 1);
        assert_relative_eq!(
            entry.correlation.value().unwrap(),
            pearson(&xs, &ys).unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_volatility_coverage_threshold() {
        // 30 prices -> 29 returns -> 29 - 10 + 1 = 20 volatility observations.
        let t = table(vec![
            PriceColumn::new("A", path(30, 0.9, 0.3)),
            PriceColumn::new("B", path(30, 1.3, 0.4)),
        ]);
        let horizons = [Horizon::new(Lookback::parse("10D").unwrap())];

        let vol = volatility_correlation_with_coverage(&t, "A", "B", &horizons, 1.0).unwrap();
        assert!(vol.entries[0].correlation.is_defined());

        let t = table(vec![
            PriceColumn::new("A", path(16, 0.9, 0.3)),
            PriceColumn::new("B", path(16, 1.3, 0.4)),
        ]);
        // 15 returns -> 6 observations, below 0.8 * 10.
        let vol = volatility_correlation(&t, "A", "B", &horizons).unwrap();
        assert_eq!(vol.entries[0].observations, 6);
        assert_eq!(vol.entries[0].correlation, Correlation::InsufficientData);
    }

    #[test]
    fn test_volatility_constant_asset_is_undefined() {
        let t = table(vec![
            PriceColumn::new("A", path(80, 0.9, 0.05)),
            PriceColumn::new("FLAT", vec![Some(10.0); 80]),
        ]);
        let horizons = [Horizon::new(Lookback::parse("10D").unwrap())];
        let vol = volatility_correlation(&t, "A", "FLAT", &horizons).unwrap();
        assert_eq!(vol.entries[0].correlation, Correlation::InsufficientData);
    }

    #[test]
    fn test_volatility_rejects_bad_coverage() {
        let t = table(vec![PriceColumn::new("A", path(30, 0.9, 0.05))]);
        let horizons = Horizon::standard();
        for coverage in [0.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                volatility_correlation_with_coverage(&t, "A", "A", &horizons, coverage),
                Err(EngineError::InvalidCoverage(_))
            ));
        }
    }

    #[test]
    fn test_normalized_performance() {
        let t = table(vec![PriceColumn::new(
            "A",
            vec![None, Some(50.0), Some(55.0), None, Some(45.0)],
        )]);
        let norm = normalized_performance(&t, "A").unwrap();
        let values: Vec<Option<f64>> = norm.points.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![None, Some(1.0), Some(1.1), None, Some(0.9)]);
        assert_eq!(norm.latest(), Some(0.9));
    }

    #[test]
    fn test_normalized_performance_errors() {
        let t = table(vec![PriceColumn::new("A", vec![None, None])]);
        assert!(matches!(
            normalized_performance(&t, "A"),
            Err(EngineError::DataUnavailable(_))
        ));
        assert!(matches!(
            normalized_performance(&t, "B"),
            Err(EngineError::UnknownAsset(_))
        ));
    }
}
