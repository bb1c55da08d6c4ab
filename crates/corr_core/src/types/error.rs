//! Error types for structured error handling.
//!
//! All variants describe invalid price data handed to the core layer. The
//! statistics themselves never fail: degenerate inputs surface as
//! `Correlation::InsufficientData` instead.

use chrono::NaiveDate;
use thiserror::Error;

/// Validation failures raised while building price tables and series.
///
/// # Examples
/// ```
/// use corr_core::types::CoreError;
///
/// let err = CoreError::DuplicateSymbol("SPY".to_string());
/// assert_eq!(format!("{}", err), "Duplicate symbol: SPY");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Date index is not strictly increasing.
    #[error("Dates must be strictly increasing: {current} follows {previous} at row {index}")]
    UnsortedDates {
        /// Row index of the offending date
        index: usize,
        /// Date at the previous row
        previous: NaiveDate,
        /// Date at the offending row
        current: NaiveDate,
    },

    /// The same date appears twice in one series.
    #[error("Duplicate date {date} in series {symbol}")]
    DuplicateDate {
        /// Series symbol
        symbol: String,
        /// Repeated date
        date: NaiveDate,
    },

    /// The same symbol names two columns.
    #[error("Duplicate symbol: {0}")]
    DuplicateSymbol(String),

    /// A column does not have one value per date.
    #[error("Column {symbol} has {got} values, expected {expected}")]
    LengthMismatch {
        /// Column symbol
        symbol: String,
        /// Number of dates in the table
        expected: usize,
        /// Number of values in the column
        got: usize,
    },

    /// A price is zero, negative, or not finite.
    #[error("Invalid price {value} for {symbol} on {date}")]
    InvalidPrice {
        /// Column symbol
        symbol: String,
        /// Observation date
        date: NaiveDate,
        /// Offending value
        value: f64,
    },

    /// A symbol is blank.
    #[error("Symbol must not be empty")]
    EmptySymbol,
}
