//! # corr_engine: Correlation Engine (Engine Layer)
//!
//! ## Engine Layer Role
//!
//! corr_engine turns a `PriceTable` into correlation results:
//! - Lookback labels and named horizons (`horizons`)
//! - The batch pairwise correlation matrix, latest window only (`matrix`)
//! - Matrix statistics and top/bottom pairs (`summary`)
//! - Pair queries: rolling return correlation, volatility correlation,
//!   normalized performance (`pair`)
//! - Trailing-years pair analysis with coverage checks (`analysis`)
//!
//! The engine performs no I/O; persistence lives in `infra_store`.
//!
//! ## Feature Flags
//!
//! - `parallel`: evaluate matrix pairs on the rayon thread pool
//!
//! ## Usage Example
//!
//! ```rust
//! use chrono::{Duration, NaiveDate};
//! use corr_core::{PriceColumn, PriceTable};
//! use corr_engine::prelude::*;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let dates: Vec<NaiveDate> = (0..60).map(|i| start + Duration::days(i)).collect();
//! let a: Vec<Option<f64>> = (0..60).map(|i| Some(100.0 + (i as f64 * 0.4).sin())).collect();
//! let b: Vec<Option<f64>> = (0..60).map(|i| Some(50.0 + (i as f64 * 0.4).sin())).collect();
//! let table = PriceTable::new(
//!     dates,
//!     vec![PriceColumn::new("SPY", a), PriceColumn::new("QQQ", b)],
//! )
//! .unwrap();
//!
//! let series = rolling_correlation(&table, "SPY", "QQQ", 30).unwrap();
//! assert_eq!(series.defined_len(), 59 - 30 + 1);
//!
//! let matrix = build_correlation_matrix(&table, &Lookback::standard()).unwrap();
//! assert_eq!(matrix.rows().len(), 1);
//! ```

pub mod analysis;
pub mod error;
pub mod horizons;
pub mod matrix;
pub mod pair;
pub mod summary;

pub use error::EngineError;

/// Commonly used engine types and entry points.
pub mod prelude {
    pub use crate::analysis::{AnalysisWindow, PairAnalysis, PairAnalysisConfig, WindowCoverage};
    pub use crate::horizons::{Horizon, Lookback};
    pub use crate::matrix::{build_correlation_matrix, CorrelationMatrix, CorrelationMatrixRow};
    pub use crate::pair::{
        normalized_performance, rolling_correlation, volatility_correlation,
        volatility_correlation_with_coverage, RollingCorrelationSeries, VolatilityCorrelation,
    };
    pub use crate::summary::{least_correlated, most_correlated, MatrixSummary};
    pub use crate::EngineError;
}
