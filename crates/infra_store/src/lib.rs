//! # infra_store: Persisted Price and Correlation Tables (Infra Layer)
//!
//! Whole-table Parquet I/O for the two persisted tables:
//! - the price table (`prices`): `Date` + one Float64 column per symbol
//! - the correlation matrix (`matrix`): `Asset1`, `Asset2`, `Corr_<label>`
//!
//! plus CSV close-series import aligned onto the price index (`csv_import`).
//! Every write goes to a temp file in the destination directory and is
//! renamed into place.
//!
//! ## Usage Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use corr_core::{PriceColumn, PriceTable};
//! use infra_store::TableStore;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = TableStore::new(
//!     dir.path().join("prices.parquet"),
//!     dir.path().join("correlation_matrix.parquet"),
//! );
//!
//! let table = PriceTable::new(
//!     vec![NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()],
//!     vec![PriceColumn::new("SPY", vec![Some(472.6)])],
//! )
//! .unwrap();
//! store.save_prices(&table).unwrap();
//! assert_eq!(store.load_prices().unwrap(), table);
//! ```

mod atomic;
pub mod csv_import;
pub mod error;
pub mod matrix;
pub mod prices;

use std::path::{Path, PathBuf};

use corr_core::PriceTable;
use corr_engine::matrix::CorrelationMatrix;

pub use csv_import::{align_series, read_close_csv, ImportReport};
pub use error::{Result, StoreError};
pub use matrix::{read_correlation_matrix, write_correlation_matrix};
pub use prices::{read_price_table, write_price_table};

/// Locations of the price and matrix tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStore {
    prices_path: PathBuf,
    matrix_path: PathBuf,
}

impl TableStore {
    pub fn new(prices_path: impl Into<PathBuf>, matrix_path: impl Into<PathBuf>) -> Self {
        Self {
            prices_path: prices_path.into(),
            matrix_path: matrix_path.into(),
        }
    }

    #[inline]
    pub fn prices_path(&self) -> &Path {
        &self.prices_path
    }

    #[inline]
    pub fn matrix_path(&self) -> &Path {
        &self.matrix_path
    }

    pub fn load_prices(&self) -> Result<PriceTable> {
        read_price_table(&self.prices_path)
    }

    pub fn save_prices(&self, table: &PriceTable) -> Result<()> {
        write_price_table(&self.prices_path, table)
    }

    pub fn load_matrix(&self) -> Result<CorrelationMatrix> {
        read_correlation_matrix(&self.matrix_path)
    }

    pub fn save_matrix(&self, matrix: &CorrelationMatrix) -> Result<()> {
        write_correlation_matrix(&self.matrix_path, matrix)
    }

    /// Align the close series in `csv_path` into the price table.
    ///
    /// A missing price table is created from the series alone.
    pub fn import_close_csv(&self, symbol: &str, csv_path: &Path) -> Result<ImportReport> {
        let series = read_close_csv(csv_path, symbol)?;
        let table = match self.load_prices() {
            Ok(table) => table,
            Err(StoreError::NotFound(_)) => PriceTable::default(),
            Err(e) => return Err(e),
        };
        let (table, report) = align_series(table, &series)?;
        self.save_prices(&table)?;
        Ok(report)
    }
}
