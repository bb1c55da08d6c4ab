//! Configuration error type.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("IO error reading {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    /// Config file is not valid TOML or has wrongly typed values
    #[error("Parse error in {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// One or more settings are out of range
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Result alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_joins_problems() {
        let error = ConfigError::Validation(vec!["Error 1".to_string(), "Error 2".to_string()]);
        assert_eq!(error.to_string(), "Validation errors: Error 1; Error 2");
    }

    #[test]
    fn test_parse_display_names_file() {
        let error = ConfigError::Parse {
            path: PathBuf::from("corrctl.toml"),
            message: "expected a table".to_string(),
        };
        assert!(error.to_string().contains("corrctl.toml"));
    }
}
