//! Import a single close-price series from CSV.
//!
//! Expected layout is a header row followed by `date,close` rows with ISO
//! dates. Extra columns are ignored; `Date`/`Close` headers are accepted too.

use std::path::Path;

use corr_core::{PriceSeries, PriceTable, TradingDate};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{Result, StoreError};

#[derive(Debug, Deserialize)]
struct CloseRecord {
    #[serde(alias = "Date", alias = "DATE")]
    date: TradingDate,
    #[serde(alias = "Close", alias = "CLOSE")]
    close: Option<f64>,
}

/// Outcome of aligning a series onto a price table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub symbol: String,
    /// Rows in the CSV with a price
    pub read: usize,
    /// Table dates that received a price
    pub aligned: usize,
    /// Table dates left missing
    pub missing: usize,
    /// Whether an existing column was replaced
    pub replaced: bool,
}

/// Parse a close series from `path`.
///
/// Rows with an empty close are skipped.
///
/// # Errors
///
/// * `StoreError::NotFound` - `path` does not exist
/// * `StoreError::Csv` - malformed rows
/// * `StoreError::Core` - empty symbol, duplicate dates or invalid prices
pub fn read_close_csv(path: &Path, symbol: &str) -> Result<PriceSeries> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;

    let mut points = Vec::new();
    let mut skipped = 0;
    for record in reader.deserialize::<CloseRecord>() {
        let record = record?;
        match record.close {
            Some(close) => points.push((record.date, close)),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(path = %path.display(), skipped, "Skipped CSV rows without a close");
    }

    Ok(PriceSeries::from_points(symbol, points)?)
}

/// Reindex `series` onto the dates of `table` and insert it as a column.
///
/// An empty table adopts the series' own dates.
pub fn align_series(table: PriceTable, series: &PriceSeries) -> Result<(PriceTable, ImportReport)> {
    let replaced = table.column(series.symbol()).is_some();

    let table = if table.dates().is_empty() {
        PriceTable::from_series(std::iter::once(series.clone()))?
    } else {
        table.with_aligned_column(series)
    };

    let aligned = table
        .column(series.symbol())
        .map(|c| c.valid_count())
        .unwrap_or_default();
    let report = ImportReport {
        symbol: series.symbol().to_string(),
        read: series.len(),
        aligned,
        missing: table.len() - aligned,
        replaced,
    };

    if report.aligned < report.read {
        warn!(
            symbol = %report.symbol,
            dropped = report.read - report.aligned,
            "Dates outside the price index were dropped"
        );
    }
    info!(
        symbol = %report.symbol,
        aligned = report.aligned,
        missing = report.missing,
        replaced,
        "Aligned close series"
    );
    Ok((table, report))
}
