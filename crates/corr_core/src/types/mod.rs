//! Domain types for the price store and correlation outcomes.
//!
//! This module provides:
//! - `PriceTable`: date-indexed table of closing prices, one column per symbol
//! - `PriceColumn`: a single symbol's nullable price column
//! - `PriceSeries`: sparse date → price mapping for one symbol
//! - `Correlation`: a defined coefficient or an explicit insufficient-data marker
//! - `CoreError`: construction and validation failures

pub mod correlation;
pub mod error;
pub mod table;

pub use correlation::Correlation;
pub use error::CoreError;
pub use table::{PriceColumn, PriceSeries, PriceTable, TradingDate};
