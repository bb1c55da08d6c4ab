//! Date-indexed price store.
//!
//! A `PriceTable` is the in-memory form of the persisted price table: a
//! strictly increasing trading-date index and one nullable close-price
//! column per symbol. Missing observations stay `None`; nothing is
//! zero-filled or forward-filled.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveDate;

use super::error::CoreError;
use crate::returns::ReturnSeries;

/// Calendar date of a daily close.
pub type TradingDate = NaiveDate;

/// Sparse price history for one symbol.
///
/// Dates are unique and iterate in ascending order; absent dates are simply
/// not present.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceSeries {
    symbol: String,
    points: BTreeMap<TradingDate, f64>,
}

impl PriceSeries {
    /// Build a series from `(date, price)` points.
    ///
    /// # Errors
    ///
    /// * `CoreError::EmptySymbol` - blank symbol
    /// * `CoreError::DuplicateDate` - a date occurs twice
    /// * `CoreError::InvalidPrice` - a price is not a positive finite number
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use corr_core::types::PriceSeries;
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
    /// let series = PriceSeries::from_points("BTC", [(d(2), 61_000.0), (d(1), 60_000.0)]).unwrap();
    /// assert_eq!(series.first_date(), Some(d(1)));
    /// assert_eq!(series.len(), 2);
    /// ```
    pub fn from_points(
        symbol: impl Into<String>,
        points: impl IntoIterator<Item = (TradingDate, f64)>,
    ) -> Result<Self, CoreError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(CoreError::EmptySymbol);
        }

        let mut map = BTreeMap::new();
        for (date, price) in points {
            validate_price(&symbol, date, price)?;
            if map.insert(date, price).is_some() {
                return Err(CoreError::DuplicateDate { symbol, date });
            }
        }

        Ok(Self {
            symbol,
            points: map,
        })
    }

    /// Series symbol.
    #[inline]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Price on `date`, if observed.
    #[inline]
    pub fn get(&self, date: TradingDate) -> Option<f64> {
        self.points.get(&date).copied()
    }

    /// Number of observations.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no observations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Earliest observed date.
    pub fn first_date(&self) -> Option<TradingDate> {
        self.points.keys().next().copied()
    }

    /// Latest observed date.
    pub fn last_date(&self) -> Option<TradingDate> {
        self.points.keys().next_back().copied()
    }

    /// Observations in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (TradingDate, f64)> + '_ {
        self.points.iter().map(|(date, price)| (*date, *price))
    }
}

/// One symbol's close prices aligned to a table's date index.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceColumn {
    symbol: String,
    values: Vec<Option<f64>>,
}

impl PriceColumn {
    /// Create a column. Validation against the index happens in `PriceTable::new`.
    pub fn new(symbol: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            symbol: symbol.into(),
            values,
        }
    }

    /// Column symbol.
    #[inline]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Prices aligned to the table's dates.
    #[inline]
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Number of observed (non-missing) prices.
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Period-over-period returns aligned to the same dates.
    pub fn returns(&self) -> ReturnSeries {
        ReturnSeries::from_prices(&self.values)
    }

    /// First observed price, used as the base for normalised performance.
    pub fn first_valid(&self) -> Option<f64> {
        self.values.iter().flatten().next().copied()
    }
}

/// Daily close prices for a basket of assets.
///
/// # Invariants
///
/// * dates are strictly increasing
/// * every column has exactly one entry per date
/// * symbols are unique and non-empty
/// * every present price is positive and finite
///
/// Column order is preserved; it defines the pair enumeration order of the
/// matrix builder.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceTable {
    dates: Vec<TradingDate>,
    columns: Vec<PriceColumn>,
}

impl PriceTable {
    /// Build a validated table.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation found; see `CoreError`.
    pub fn new(dates: Vec<TradingDate>, columns: Vec<PriceColumn>) -> Result<Self, CoreError> {
        for (index, pair) in dates.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(CoreError::UnsortedDates {
                    index: index + 1,
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if column.symbol.trim().is_empty() {
                return Err(CoreError::EmptySymbol);
            }
            if !seen.insert(column.symbol.as_str()) {
                return Err(CoreError::DuplicateSymbol(column.symbol.clone()));
            }
            if column.values.len() != dates.len() {
                return Err(CoreError::LengthMismatch {
                    symbol: column.symbol.clone(),
                    expected: dates.len(),
                    got: column.values.len(),
                });
            }
            for (date, value) in dates.iter().zip(&column.values) {
                if let Some(price) = value {
                    validate_price(&column.symbol, *date, *price)?;
                }
            }
        }

        Ok(Self { dates, columns })
    }

    /// Outer-join several series on the union of their dates.
    ///
    /// Columns keep the order of `series`; dates absent from a series become
    /// missing values in that column.
    pub fn from_series(series: impl IntoIterator<Item = PriceSeries>) -> Result<Self, CoreError> {
        let series: Vec<PriceSeries> = series.into_iter().collect();
        let index: BTreeSet<TradingDate> = series
            .iter()
            .flat_map(|s| s.points.keys().copied())
            .collect();
        let dates: Vec<TradingDate> = index.into_iter().collect();

        let columns = series
            .iter()
            .map(|s| PriceColumn::new(s.symbol.clone(), dates.iter().map(|d| s.get(*d)).collect()))
            .collect();

        Self::new(dates, columns)
    }

    /// Trading dates in ascending order.
    #[inline]
    pub fn dates(&self) -> &[TradingDate] {
        &self.dates
    }

    /// All columns in table order.
    #[inline]
    pub fn columns(&self) -> &[PriceColumn] {
        &self.columns
    }

    /// Symbols in column order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.symbol.as_str())
    }

    /// Column for `symbol`.
    pub fn column(&self, symbol: &str) -> Option<&PriceColumn> {
        self.columns.iter().find(|c| c.symbol == symbol)
    }

    /// Number of rows (trading dates).
    #[inline]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Number of asset columns.
    #[inline]
    pub fn num_assets(&self) -> usize {
        self.columns.len()
    }

    /// A table without rows or without columns carries no usable data.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.columns.is_empty()
    }

    /// Earliest date in the index.
    pub fn first_date(&self) -> Option<TradingDate> {
        self.dates.first().copied()
    }

    /// Latest date in the index.
    pub fn last_date(&self) -> Option<TradingDate> {
        self.dates.last().copied()
    }

    /// Rows dated on or after `start`.
    pub fn since(&self, start: TradingDate) -> Self {
        let offset = self.dates.partition_point(|d| *d < start);
        Self {
            dates: self.dates[offset..].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| PriceColumn::new(c.symbol.clone(), c.values[offset..].to_vec()))
                .collect(),
        }
    }

    /// Sparse series view of one column.
    pub fn series(&self, symbol: &str) -> Option<PriceSeries> {
        let column = self.column(symbol)?;
        let points = self
            .dates
            .iter()
            .zip(&column.values)
            .filter_map(|(date, value)| value.map(|price| (*date, price)))
            .collect();
        Some(PriceSeries {
            symbol: column.symbol.clone(),
            points,
        })
    }

    /// Reindex `series` onto this table's dates and insert it as a column.
    ///
    /// Dates outside the index are dropped and index dates absent from the
    /// series become missing. An existing column with the same symbol is
    /// replaced in place; otherwise the column is appended.
    pub fn with_aligned_column(mut self, series: &PriceSeries) -> Self {
        let values = self.dates.iter().map(|d| series.get(*d)).collect();
        let column = PriceColumn::new(series.symbol.clone(), values);

        match self.columns.iter().position(|c| c.symbol == series.symbol) {
            Some(position) => self.columns[position] = column,
            None => self.columns.push(column),
        }
        self
    }
}

fn validate_price(symbol: &str, date: TradingDate, price: f64) -> Result<(), CoreError> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(CoreError::InvalidPrice {
            symbol: symbol.to_string(),
            date,
            value: price,
        })
    }
}
