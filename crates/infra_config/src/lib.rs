//! # infra_config: Configuration for the Cross-Asset Correlation Tools
//!
//! - `AppConfig`: data paths, matrix lookbacks, pair analysis settings and
//!   the asset catalog, loaded from TOML (`settings`)
//! - `AssetCatalog`: symbol descriptions and categories (`catalog`)
//! - `ConfigError`: I/O, parse and collected validation errors (`error`)
//!
//! ## Example
//!
//! ```rust
//! use std::path::Path;
//! use infra_config::AppConfig;
//!
//! let config = AppConfig::from_toml(
//!     Path::new("inline.toml"),
//!     "[matrix]\nlookbacks = [\"1M\", \"12M\"]\n",
//! )
//! .unwrap();
//! assert_eq!(config.matrix.lookbacks[1].days(), 252);
//! assert_eq!(config.catalog().label("BTC"), "BTC (Bitcoin)");
//! ```

pub mod catalog;
pub mod error;
pub mod settings;

pub use catalog::{default_assets, symbol_from_label, AssetCatalog, AssetInfo, UNKNOWN_ASSET};
pub use error::{ConfigError, Result};
pub use settings::{
    build_config, AppConfig, CliOverrides, DataPaths, MatrixSettings, PairSettings,
    DEFAULT_CONFIG_FILE,
};
