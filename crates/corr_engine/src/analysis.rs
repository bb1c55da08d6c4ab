//! Pair analysis over a trailing calendar window.
//!
//! Bundles everything a pair view needs into one call: restrict the price
//! table to the last N years, check coverage, then compute volatility
//! correlations per horizon, rolling return correlations and normalized
//! performance for both assets.

use chrono::Months;
use corr_core::{PriceTable, TradingDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::EngineError;
use crate::horizons::{Horizon, TRADING_DAYS_PER_YEAR};
use crate::pair::{
    normalized_performance, rolling_correlation, volatility_correlation_with_coverage,
    NormalizedSeries, RollingCorrelationSeries, VolatilityCorrelation, DEFAULT_MIN_COVERAGE,
};

/// Longest analysis window accepted, in calendar years
pub const MAX_ANALYSIS_YEARS: u32 = 100;

/// Settings for [`PairAnalysis::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairAnalysisConfig {
    /// Volatility correlation horizons
    pub horizons: Vec<Horizon>,
    /// Rolling return-correlation windows in trading days
    pub rolling_windows: Vec<usize>,
    /// Trailing calendar years analysed
    pub analysis_years: u32,
    /// Minimum share of a horizon covered by overlapping observations
    pub min_coverage: f64,
}

impl Default for PairAnalysisConfig {
    fn default() -> Self {
        Self {
            horizons: Horizon::standard(),
            rolling_windows: vec![30, 90],
            analysis_years: 3,
            min_coverage: DEFAULT_MIN_COVERAGE,
        }
    }
}

impl PairAnalysisConfig {
    /// Check window lengths, years and coverage.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.analysis_years == 0 || self.analysis_years > MAX_ANALYSIS_YEARS {
            return Err(EngineError::InvalidYears(self.analysis_years));
        }
        if let Some(&w) = self.rolling_windows.iter().find(|&&w| w < 2) {
            return Err(EngineError::InvalidWindow(w));
        }
        if let Some(h) = self.horizons.iter().find(|h| h.days() < 2) {
            return Err(EngineError::InvalidWindow(h.days()));
        }
        if !(self.min_coverage > 0.0 && self.min_coverage <= 1.0) {
            return Err(EngineError::InvalidCoverage(self.min_coverage));
        }
        Ok(())
    }
}

/// The trailing calendar range a pair is analysed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisWindow {
    /// First date included
    pub start: TradingDate,
    /// Last date of the price table
    pub end: TradingDate,
    pub years: u32,
}

impl AnalysisWindow {
    /// Window covering the `years` calendar years up to the table's last date.
    ///
    /// # Errors
    ///
    /// * `EngineError::DataUnavailable` - empty table
    /// * `EngineError::InvalidYears` - `years` is 0 or above [`MAX_ANALYSIS_YEARS`]
    pub fn trailing(prices: &PriceTable, years: u32) -> Result<Self, EngineError> {
        if years == 0 || years > MAX_ANALYSIS_YEARS {
            return Err(EngineError::InvalidYears(years));
        }
        let end = prices
            .last_date()
            .filter(|_| !prices.is_empty())
            .ok_or_else(|| EngineError::data_unavailable("price table is empty"))?;
        let months = 12u32
            .checked_mul(years)
            .ok_or(EngineError::InvalidYears(years))?;
        let start = end
            .checked_sub_months(Months::new(months))
            .ok_or_else(|| EngineError::data_unavailable(format!("cannot go back {} years", years)))?;
        Ok(Self { start, end, years })
    }

    /// Trading days expected in a full window.
    pub fn expected_days(&self) -> usize {
        TRADING_DAYS_PER_YEAR * self.years as usize
    }

    /// Rows of `prices` on or after `start`.
    pub fn apply(&self, prices: &PriceTable) -> PriceTable {
        prices.since(self.start)
    }

    /// Coverage of one asset's prices inside the window.
    pub fn coverage(&self, prices: &PriceTable, symbol: &str) -> Result<WindowCoverage, EngineError> {
        let column = prices
            .column(symbol)
            .ok_or_else(|| EngineError::unknown_asset(symbol))?;
        let observed = prices
            .dates()
            .iter()
            .zip(column.values())
            .filter(|(date, price)| **date >= self.start && **date <= self.end && price.is_some())
            .count();
        Ok(WindowCoverage::new(symbol, observed, self.expected_days()))
    }
}

/// Observed versus expected trading days for one asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowCoverage {
    pub symbol: String,
    pub observed: usize,
    pub expected: usize,
}

impl WindowCoverage {
    /// Below this share of expected days the window is flagged.
    pub const MIN_RATIO: f64 = 0.8;

    fn new(symbol: &str, observed: usize, expected: usize) -> Self {
        Self {
            symbol: symbol.to_string(),
            observed,
            expected,
        }
    }

    /// Observed share of expected days.
    pub fn ratio(&self) -> f64 {
        if self.expected == 0 {
            return 0.0;
        }
        self.observed as f64 / self.expected as f64
    }

    /// Whether coverage reaches [`Self::MIN_RATIO`].
    pub fn is_sufficient(&self) -> bool {
        self.ratio() >= Self::MIN_RATIO
    }
}

/// Everything known about one asset pair over the analysis window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairAnalysis {
    pub asset_a: String,
    pub asset_b: String,
    pub window: AnalysisWindow,
    /// Coverage of `asset_a` then `asset_b`
    pub coverage: Vec<WindowCoverage>,
    pub volatility: VolatilityCorrelation,
    /// One series per configured rolling window
    pub rolling: Vec<RollingCorrelationSeries>,
    /// Normalized performance of `asset_a` then `asset_b`; an asset without
    /// prices in the window gets a series of missing values
    pub performance: Vec<NormalizedSeries>,
}

impl PairAnalysis {
    /// Analyse `asset_a` against `asset_b`.
    ///
    /// Coverage shortfalls are logged, not fatal: affected horizons come back
    /// as `InsufficientData`, even when an asset has no prices in the window.
    pub fn run(
        prices: &PriceTable,
        asset_a: &str,
        asset_b: &str,
        config: &PairAnalysisConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        for symbol in [asset_a, asset_b] {
            if prices.column(symbol).is_none() {
                return Err(EngineError::unknown_asset(symbol));
            }
        }

        let window = AnalysisWindow::trailing(prices, config.analysis_years)?;
        let windowed = window.apply(prices);
        info!(
            asset_a,
            asset_b,
            start = %window.start,
            end = %window.end,
            rows = windowed.len(),
            "Running pair analysis"
        );

        let coverage = [asset_a, asset_b]
            .into_iter()
            .map(|symbol| window.coverage(&windowed, symbol))
            .collect::<Result<Vec<_>, _>>()?;
        for c in coverage.iter().filter(|c| !c.is_sufficient()) {
            warn!(
                symbol = %c.symbol,
                observed = c.observed,
                expected = c.expected,
                "Insufficient data in analysis window"
            );
        }

        let volatility = volatility_correlation_with_coverage(
            &windowed,
            asset_a,
            asset_b,
            &config.horizons,
            config.min_coverage,
        )?;
        let rolling = config
            .rolling_windows
            .iter()
            .map(|&w| rolling_correlation(&windowed, asset_a, asset_b, w))
            .collect::<Result<Vec<_>, _>>()?;
        let performance = [asset_a, asset_b]
            .into_iter()
            .map(|symbol| performance_or_gap(&windowed, symbol))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            asset_a: asset_a.to_string(),
            asset_b: asset_b.to_string(),
            window,
            coverage,
            volatility,
            rolling,
            performance,
        })
    }
}

fn performance_or_gap(prices: &PriceTable, symbol: &str) -> Result<NormalizedSeries, EngineError> {
    match normalized_performance(prices, symbol) {
        Err(EngineError::DataUnavailable(_)) => Ok(NormalizedSeries {
            symbol: symbol.to_string(),
            points: prices.dates().iter().map(|d| (*d, None)).collect(),
        }),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use corr_core::PriceColumn;

    fn daily_table(start: NaiveDate, n: usize) -> PriceTable {
        let dates: Vec<NaiveDate> = (0..n as i64).map(|i| start + Duration::days(i)).collect();
        let wave = |f: f64| {
            let mut p = 100.0;
            (0..n)
                .map(|i| {
                    p *= 1.0 + 0.01 * (i as f64 * f).sin() * (1.0 + (i as f64 * 0.01).cos());
                    Some(p)
                })
                .collect::<Vec<_>>()
        };
        PriceTable::new(
            dates,
            vec![PriceColumn::new("SPY", wave(0.7)), PriceColumn::new("BTC", wave(1.9))],
        )
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = PairAnalysisConfig::default();
        assert_eq!(config.rolling_windows, vec![30, 90]);
        assert_eq!(config.analysis_years, 3);
        assert_eq!(config.horizons.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = PairAnalysisConfig::default();
        config.rolling_windows.push(1);
        assert_eq!(config.validate(), Err(EngineError::InvalidWindow(1)));

        let config = PairAnalysisConfig {
            min_coverage: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(EngineError::InvalidCoverage(_))));

        let config = PairAnalysisConfig {
            analysis_years: 400_000_000,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(EngineError::InvalidYears(400_000_000)));

        let config = PairAnalysisConfig {
            analysis_years: MAX_ANALYSIS_YEARS,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_trailing_window_bounds() {
        let table = daily_table(NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(), 2000);
        let window = AnalysisWindow::trailing(&table, 3).unwrap();
        assert_eq!(window.end, table.last_date().unwrap());
        assert_eq!(window.start, window.end.checked_sub_months(Months::new(36)).unwrap());
        assert_eq!(window.expected_days(), 756);

        let windowed = window.apply(&table);
        assert!(windowed.first_date().unwrap() >= window.start);
        assert_eq!(windowed.last_date(), table.last_date());
    }

    #[test]
    fn test_trailing_window_errors() {
        assert!(matches!(
            AnalysisWindow::trailing(&PriceTable::default(), 3),
            Err(EngineError::DataUnavailable(_))
        ));
        let table = daily_table(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), 10);
        assert_eq!(
            AnalysisWindow::trailing(&table, 0).unwrap_err(),
            EngineError::InvalidYears(0)
        );
        assert_eq!(
            AnalysisWindow::trailing(&table, 400_000_000).unwrap_err(),
            EngineError::InvalidYears(400_000_000)
        );
        assert_eq!(
            AnalysisWindow::trailing(&table, u32::MAX).unwrap_err(),
            EngineError::InvalidYears(u32::MAX)
        );
    }

    #[test]
    fn test_coverage_ratio() {
        // Calendar days overshoot trading days, so a full daily table is sufficient.
        let table = daily_table(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), 400);
        let window = AnalysisWindow::trailing(&table, 1).unwrap();
        let coverage = window.coverage(&table, "SPY").unwrap();
        assert_eq!(coverage.expected, 252);
        assert!(coverage.is_sufficient());

        let short = daily_table(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), 100);
        let window = AnalysisWindow::trailing(&short, 1).unwrap();
        let coverage = window.coverage(&short, "BTC").unwrap();
        assert_eq!(coverage.observed, 100);
        assert!(!coverage.is_sufficient());
    }

    #[test]
    fn test_pair_analysis_bundle() {
        let table = daily_table(NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(), 1800);
        let analysis =
            PairAnalysis::run(&table, "SPY", "BTC", &PairAnalysisConfig::default()).unwrap();

        assert_eq!(analysis.rolling.len(), 2);
        assert_eq!(analysis.rolling[0].window, 30);
        assert_eq!(analysis.rolling[1].window, 90);
        assert_eq!(analysis.volatility.entries.len(), 4);
        assert!(analysis.volatility.get("1Y").unwrap().correlation.is_defined());
        assert_eq!(analysis.performance[0].symbol, "SPY");
        assert_eq!(analysis.coverage.len(), 2);

        let first = analysis.rolling[0].points.first().unwrap().0;
        assert!(first >= analysis.window.start);
        assert_eq!(analysis.performance[1].points[0].1, Some(1.0));
    }

    #[test]
    fn test_pair_analysis_with_delisted_asset() {
        let full = daily_table(NaiveDate::from_ymd_opt(2016, 1, 1).unwrap(), 2000);
        let delisted: Vec<Option<f64>> = full
            .column("BTC")
            .unwrap()
            .values()
            .iter()
            .enumerate()
            .map(|(i, v)| if i < 500 { *v } else { None })
            .collect();
        let table = PriceTable::new(
            full.dates().to_vec(),
            vec![
                full.column("SPY").unwrap().clone(),
                PriceColumn::new("BTC", delisted),
            ],
        )
        .unwrap();

        let analysis =
            PairAnalysis::run(&table, "SPY", "BTC", &PairAnalysisConfig::default()).unwrap();

        assert_eq!(analysis.coverage[1].observed, 0);
        assert!(!analysis.coverage[1].is_sufficient());
        assert!(analysis
            .volatility
            .entries
            .iter()
            .all(|e| !e.correlation.is_defined()));
        assert!(analysis.rolling.iter().all(|r| r.defined_len() == 0));

        assert_eq!(analysis.performance[0].points[0].1, Some(1.0));
        let gap = &analysis.performance[1];
        assert_eq!(gap.symbol, "BTC");
        assert_eq!(gap.points.len(), analysis.performance[0].points.len());
        assert_eq!(gap.latest(), None);
    }

    #[test]
    fn test_pair_analysis_unknown_asset() {
        let table = daily_table(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), 50);
        assert_eq!(
            PairAnalysis::run(&table, "SPY", "GLD", &PairAnalysisConfig::default()).unwrap_err(),
            EngineError::UnknownAsset("GLD".to_string())
        );
    }
}
