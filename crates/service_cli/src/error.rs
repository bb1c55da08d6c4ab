//! CLI error types.

use corr_engine::EngineError;
use infra_config::ConfigError;
use infra_store::StoreError;
use thiserror::Error;

/// Errors surfaced by `corrctl` commands
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reading or writing a table failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The engine rejected the request
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Output could not be encoded
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Bad command-line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// `check` found problems
    #[error("{0} check(s) failed")]
    CheckFailed(usize),
}

/// Result alias for CLI commands
pub type Result<T> = std::result::Result<T, CliError>;
