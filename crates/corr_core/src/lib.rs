//! # corr_core: Foundation Types and Statistics for Cross-Asset Correlation
//!
//! ## Core Layer Role
//!
//! corr_core is the bottom layer of the workspace, providing:
//! - The in-memory price store: `PriceTable`, `PriceColumn`, `PriceSeries` (`types::table`)
//! - The correlation outcome type: `Correlation` (`types::correlation`)
//! - Period return computation: `ReturnSeries`, `period_returns` (`returns`)
//! - Generic statistics: mean, sample standard deviation, Pearson (`math::stats`)
//! - Trailing-window statistics over gappy series (`math::rolling`)
//! - Error types: `CoreError` (`types::error`)
//!
//! ## Dependency Principle
//!
//! This layer depends on no other workspace crate and performs no I/O:
//! - num-traits: generic floating-point statistics
//! - chrono: trading dates
//! - serde: serialisation of correlation outcomes
//! - thiserror: error derivation
//!
//! ## Usage Examples
//!
//! ```rust
//! use chrono::NaiveDate;
//! use corr_core::math::stats::pearson;
//! use corr_core::types::{PriceColumn, PriceTable};
//!
//! let dates: Vec<NaiveDate> = (1..=4)
//!     .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
//!     .collect();
//! let table = PriceTable::new(
//!     dates,
//!     vec![
//!         PriceColumn::new("SPY", vec![Some(100.0), Some(101.0), Some(99.0), Some(102.0)]),
//!         PriceColumn::new("TLT", vec![Some(90.0), Some(89.0), Some(91.0), Some(88.0)]),
//!     ],
//! )
//! .unwrap();
//!
//! let spy = table.column("SPY").unwrap().returns();
//! let tlt = table.column("TLT").unwrap().returns();
//! let (xs, ys) = spy.complete_pairs(&tlt);
//! let rho = pearson(&xs, &ys).unwrap();
//! assert!(rho < 0.0);
//! ```

pub mod math;
pub mod returns;
pub mod types;

pub use returns::{period_returns, ReturnSeries};
pub use types::{Correlation, CoreError, PriceColumn, PriceSeries, PriceTable, TradingDate};
