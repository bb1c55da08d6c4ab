//! Pairwise correlation matrix builder.
//!
//! For every unordered pair of distinct assets and every lookback, the
//! Pearson correlation of the two return series over the most recent
//! `lookback.days()` observations. Only the latest window is evaluated; the
//! matrix is a snapshot, not a history. Values are rounded to
//! [`MATRIX_DECIMALS`] places.

use corr_core::math::rolling::trailing_pearson;
use corr_core::{Correlation, PriceTable, ReturnSeries};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::EngineError;
use crate::horizons::{validate_lookbacks, Lookback};

/// Decimal places kept in matrix values
pub const MATRIX_DECIMALS: i32 = 3;

/// Progress is logged after every this many pairs
const PROGRESS_INTERVAL: usize = 100;

/// One unordered asset pair with a correlation per lookback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrixRow {
    /// First asset (earlier column in the price table)
    pub asset_a: String,
    /// Second asset
    pub asset_b: String,
    /// One value per lookback, in the matrix's lookback order
    pub values: Vec<Correlation>,
}

impl CorrelationMatrixRow {
    /// Whether this row describes the unordered pair `{a, b}`.
    pub fn is_pair(&self, a: &str, b: &str) -> bool {
        (self.asset_a == a && self.asset_b == b) || (self.asset_a == b && self.asset_b == a)
    }

    /// Order-insensitive pair key.
    pub fn pair_key(&self) -> (&str, &str) {
        if self.asset_a <= self.asset_b {
            (&self.asset_a, &self.asset_b)
        } else {
            (&self.asset_b, &self.asset_a)
        }
    }
}

/// Correlation snapshot across all asset pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    lookbacks: Vec<Lookback>,
    rows: Vec<CorrelationMatrixRow>,
}

impl CorrelationMatrix {
    /// Assemble a matrix, checking every row against the lookback columns.
    ///
    /// Used by the store when reading a persisted table back.
    pub fn new(
        lookbacks: Vec<Lookback>,
        rows: Vec<CorrelationMatrixRow>,
    ) -> Result<Self, EngineError> {
        validate_lookbacks(&lookbacks)?;
        if let Some(row) = rows.iter().find(|r| r.values.len() != lookbacks.len()) {
            return Err(EngineError::ShapeMismatch(format!(
                "row {}/{} has {} values for {} lookbacks",
                row.asset_a,
                row.asset_b,
                row.values.len(),
                lookbacks.len()
            )));
        }
        Ok(Self { lookbacks, rows })
    }

    /// Lookback columns in order.
    #[inline]
    pub fn lookbacks(&self) -> &[Lookback] {
        &self.lookbacks
    }

    /// All rows.
    #[inline]
    pub fn rows(&self) -> &[CorrelationMatrixRow] {
        &self.rows
    }

    /// Number of pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the matrix has no pairs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column position of a lookback label.
    pub fn lookback_index(&self, label: &str) -> Option<usize> {
        let wanted = Lookback::parse(label).ok()?;
        self.lookbacks.iter().position(|lb| *lb == wanted)
    }

    /// Row for the unordered pair `{a, b}`.
    pub fn row(&self, a: &str, b: &str) -> Option<&CorrelationMatrixRow> {
        self.rows.iter().find(|r| r.is_pair(a, b))
    }

    /// Correlation of `{a, b}` at `label`.
    pub fn value(&self, a: &str, b: &str, label: &str) -> Option<Correlation> {
        let index = self.lookback_index(label)?;
        self.row(a, b).map(|r| r.values[index])
    }
}

/// Build the pairwise correlation matrix for every unordered pair of columns.
///
/// Pairs are enumerated in column order (`i < j`), so every pair appears
/// exactly once. A pair whose latest window has a missing return on either
/// side, too few rows, or a zero-variance series gets
/// `Correlation::InsufficientData` for that lookback; other lookbacks and
/// pairs are unaffected.
///
/// # Errors
///
/// * `EngineError::DataUnavailable` - the table has no rows or no columns
/// * `EngineError::InvalidLookbacks` - empty or repeated lookbacks
///
/// # Example
///
/// ```
/// use chrono::{Duration, NaiveDate};
/// use corr_core::{PriceColumn, PriceTable};
/// use corr_engine::horizons::Lookback;
/// use corr_engine::matrix::build_correlation_matrix;
///
/// let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
/// let dates: Vec<NaiveDate> = (0..40).map(|i| start + Duration::days(i)).collect();
/// let wave = |f: f64| (0..40).map(|i| Some(100.0 + (i as f64 * f).sin())).collect();
/// let table = PriceTable::new(
///     dates,
///     vec![
///         PriceColumn::new("SPY", wave(0.5)),
///         PriceColumn::new("QQQ", wave(0.6)),
///         PriceColumn::new("TLT", wave(0.9)),
///     ],
/// )
/// .unwrap();
///
/// let matrix = build_correlation_matrix(&table, &Lookback::standard()).unwrap();
/// assert_eq!(matrix.len(), 3);
/// // 40 prices cannot fill a 3-month window.
/// assert!(!matrix.value("SPY", "QQQ", "3M").unwrap().is_defined());
/// assert!(matrix.value("QQQ", "SPY", "1M").unwrap().is_defined());
/// ```
pub fn build_correlation_matrix(
    prices: &PriceTable,
    lookbacks: &[Lookback],
) -> Result<CorrelationMatrix, EngineError> {
    if prices.is_empty() {
        return Err(EngineError::data_unavailable(format!(
            "price table has {} rows and {} assets",
            prices.len(),
            prices.num_assets()
        )));
    }
    validate_lookbacks(lookbacks)?;

    let symbols: Vec<&str> = prices.symbols().collect();
    let returns: Vec<ReturnSeries> = prices.columns().iter().map(|c| c.returns()).collect();

    let n = symbols.len();
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();

    info!(
        assets = n,
        pairs = pairs.len(),
        rows = prices.len(),
        lookbacks = ?lookbacks.iter().map(Lookback::label).collect::<Vec<_>>(),
        "Calculating correlation matrix"
    );

    let rows = compute_rows(&pairs, &symbols, &returns, lookbacks);

    let undefined = rows
        .iter()
        .flat_map(|r| r.values.iter())
        .filter(|v| !v.is_defined())
        .count();
    info!(pairs = rows.len(), undefined, "Correlation matrix complete");

    CorrelationMatrix::new(lookbacks.to_vec(), rows)
}

#[cfg(not(feature = "parallel"))]
fn compute_rows(
    pairs: &[(usize, usize)],
    symbols: &[&str],
    returns: &[ReturnSeries],
    lookbacks: &[Lookback],
) -> Vec<CorrelationMatrixRow> {
    pairs
        .iter()
        .enumerate()
        .map(|(done, &(i, j))| {
            if (done + 1) % PROGRESS_INTERVAL == 0 {
                info!("Processing pair {} of {}", done + 1, pairs.len());
            }
            pair_row(symbols[i], symbols[j], &returns[i], &returns[j], lookbacks)
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn compute_rows(
    pairs: &[(usize, usize)],
    symbols: &[&str],
    returns: &[ReturnSeries],
    lookbacks: &[Lookback],
) -> Vec<CorrelationMatrixRow> {
    use rayon::prelude::*;

    debug!(
        threads = rayon::current_num_threads(),
        chunk = PROGRESS_INTERVAL,
        "Evaluating pairs in parallel"
    );
    pairs
        .par_iter()
        .map(|&(i, j)| pair_row(symbols[i], symbols[j], &returns[i], &returns[j], lookbacks))
        .collect()
}

fn pair_row(
    asset_a: &str,
    asset_b: &str,
    returns_a: &ReturnSeries,
    returns_b: &ReturnSeries,
    lookbacks: &[Lookback],
) -> CorrelationMatrixRow {
    let values = lookbacks
        .iter()
        .map(|lookback| {
            let estimate = trailing_pearson(returns_a.values(), returns_b.values(), lookback.days());
            let value = Correlation::from_estimate(estimate).rounded(MATRIX_DECIMALS);
            if !value.is_defined() {
                debug!(asset_a, asset_b, lookback = %lookback, "Insufficient data for lookback");
            }
            value
        })
        .collect();

    CorrelationMatrixRow {
        asset_a: asset_a.to_string(),
        asset_b: asset_b.to_string(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};
    use corr_core::math::stats::pearson;
    use corr_core::PriceColumn;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        (0..n as i64).map(|i| start + Duration::days(i)).collect()
    }

    fn wave(n: usize, freq: f64, phase: f64) -> Vec<Option<f64>> {
        (0..n)
            .map(|i| Some(100.0 * (1.0 + 0.05 * (i as f64 * freq + phase).sin())))
            .collect()
    }

    fn table(columns: Vec<PriceColumn>) -> PriceTable {
        let n = columns[0].values().len();
        PriceTable::new(dates(n), columns).unwrap()
    }

    #[test]
    fn test_pair_count_and_order() {
        let t = table(vec![
            PriceColumn::new("A", wave(30, 0.3, 0.0)),
            PriceColumn::new("B", wave(30, 0.4, 0.1)),
            PriceColumn::new("C", wave(30, 0.5, 0.2)),
            PriceColumn::new("D", wave(30, 0.6, 0.3)),
        ]);
        let m = build_correlation_matrix(&t, &[Lookback::parse("10D").unwrap()]).unwrap();

        let pairs: Vec<(&str, &str)> = m
            .rows()
            .iter()
            .map(|r| (r.asset_a.as_str(), r.asset_b.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("A", "B"), ("A", "C"), ("A", "D"), ("B", "C"), ("B", "D"), ("C", "D")]
        );
    }

    #[test]
    fn test_latest_window_value_rounded() {
        let a = wave(40, 0.3, 0.0);
        let b = wave(40, 0.7, 1.3);
        let t = table(vec![PriceColumn::new("A", a.clone()), PriceColumn::new("B", b.clone())]);
        let m = build_correlation_matrix(&t, &[Lookback::parse("21D").unwrap()]).unwrap();

        let ra: Vec<f64> = corr_core::period_returns(&a)[19..].iter().flatten().copied().collect();
        let rb: Vec<f64> = corr_core::period_returns(&b)[19..].iter().flatten().copied().collect();
        assert_eq!(ra.len(), 21);
        let expected = (pearson(&ra, &rb).unwrap() * 1000.0).round() / 1000.0;

        assert_relative_eq!(
            m.value("A", "B", "21D").unwrap().value().unwrap(),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_window_longer_than_history_is_undefined() {
        let t = table(vec![
            PriceColumn::new("A", wave(21, 0.3, 0.0)),
            PriceColumn::new("B", wave(21, 0.4, 0.1)),
        ]);
        // 21 prices give only 20 returns.
        let m = build_correlation_matrix(&t, &Lookback::standard()).unwrap();
        assert!(m.rows()[0].values.iter().all(|v| !v.is_defined()));
    }

    #[test]
    fn test_missing_price_in_window_is_undefined() {
        let mut a = wave(60, 0.3, 0.0);
        a[50] = None;
        let t = table(vec![
            PriceColumn::new("A", a),
            PriceColumn::new("B", wave(60, 0.4, 0.1)),
        ]);
        let lookbacks = vec![Lookback::parse("5D").unwrap(), Lookback::parse("20D").unwrap()];
        let m = build_correlation_matrix(&t, &lookbacks).unwrap();

        assert!(m.value("A", "B", "5D").unwrap().is_defined());
        assert!(!m.value("A", "B", "20D").unwrap().is_defined());
    }

    #[test]
    fn test_single_asset_yields_no_rows() {
        let t = table(vec![PriceColumn::new("A", wave(30, 0.3, 0.0))]);
        let m = build_correlation_matrix(&t, &Lookback::standard()).unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn test_empty_table_is_unavailable() {
        let result = build_correlation_matrix(&PriceTable::default(), &Lookback::standard());
        assert!(matches!(result, Err(EngineError::DataUnavailable(_))));
    }

    #[test]
    fn test_empty_lookbacks_rejected() {
        let t = table(vec![
            PriceColumn::new("A", wave(30, 0.3, 0.0)),
            PriceColumn::new("B", wave(30, 0.4, 0.1)),
        ]);
        assert!(matches!(
            build_correlation_matrix(&t, &[]),
            Err(EngineError::InvalidLookbacks(_))
        ));
    }

    #[test]
    fn test_matrix_new_rejects_ragged_rows() {
        let rows = vec![CorrelationMatrixRow {
            asset_a: "A".to_string(),
            asset_b: "B".to_string(),
            values: vec![Correlation::Defined(0.1)],
        }];
        assert!(matches!(
            CorrelationMatrix::new(Lookback::standard(), rows),
            Err(EngineError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_row_pair_key_is_order_insensitive() {
        let row = CorrelationMatrixRow {
            asset_a: "TLT".to_string(),
            asset_b: "GLD".to_string(),
            values: vec![],
        };
        assert_eq!(row.pair_key(), ("GLD", "TLT"));
        assert!(row.is_pair("GLD", "TLT"));
        assert!(row.is_pair("TLT", "GLD"));
    }
}
