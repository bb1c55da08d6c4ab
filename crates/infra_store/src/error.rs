//! Storage error types.

use std::path::PathBuf;

use corr_core::CoreError;
use corr_engine::EngineError;
use thiserror::Error;

/// Errors raised while reading or writing persisted tables.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Table file does not exist
    #[error("Table not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow conversion failure
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet encoding or decoding failure
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// CSV parsing failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Columns or types do not match the expected table layout
    #[error("Schema error in {}: {message}", .path.display())]
    Schema { path: PathBuf, message: String },

    /// Stored prices violate table invariants
    #[error("Invalid price data: {0}")]
    Core(#[from] CoreError),

    /// Stored matrix violates matrix invariants
    #[error("Invalid matrix data: {0}")]
    Engine(#[from] EngineError),
}

impl StoreError {
    /// Create a schema error for `path`
    pub fn schema(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result alias for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;
