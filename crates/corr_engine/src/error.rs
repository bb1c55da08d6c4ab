//! Error types for the correlation engine.
//!
//! Only whole-request failures are errors. A pair or horizon without enough
//! data is not an error; it yields `Correlation::InsufficientData`.

use corr_core::CoreError;
use thiserror::Error;

/// Engine error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The price table is missing, has no rows, or has no asset columns
    #[error("Price data unavailable: {0}")]
    DataUnavailable(String),

    /// Requested symbol is not a column of the price table
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    /// Window too short to estimate a correlation
    #[error("Invalid window: {0} trading days (need at least 2)")]
    InvalidWindow(usize),

    /// Analysis window years outside `1..=MAX_ANALYSIS_YEARS`
    #[error("Invalid analysis window: {0} years (must be between 1 and {max})", max = crate::analysis::MAX_ANALYSIS_YEARS)]
    InvalidYears(u32),

    /// Lookback label outside the `<n>D`, `<n>M`, `<n>Y` grammar
    #[error("Invalid lookback label '{0}': expected <n>D, <n>M or <n>Y")]
    InvalidLabel(String),

    /// Lookback set is empty or repeats a label
    #[error("Invalid lookback set: {0}")]
    InvalidLookbacks(String),

    /// Coverage threshold outside (0, 1]
    #[error("Invalid coverage threshold {0}: must be in (0, 1]")]
    InvalidCoverage(f64),

    /// Matrix rows do not match the lookback columns
    #[error("Matrix shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Invalid price data
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl EngineError {
    /// Create a data unavailable error
    pub fn data_unavailable(msg: impl Into<String>) -> Self {
        Self::DataUnavailable(msg.into())
    }

    /// Create an unknown asset error
    pub fn unknown_asset(symbol: impl Into<String>) -> Self {
        Self::UnknownAsset(symbol.into())
    }
}
