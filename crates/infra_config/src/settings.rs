//! Application configuration.
//!
//! Handles loading of `corrctl.toml` with environment variable and
//! command-line overrides. Precedence, lowest first: built-in defaults, the
//! TOML file, `CROSSASSET_*` environment variables, CLI flags.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use corr_engine::analysis::PairAnalysisConfig;
use corr_engine::horizons::Lookback;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{default_assets, AssetCatalog, AssetInfo};
use crate::error::{ConfigError, Result};

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "corrctl.toml";

pub const ENV_PRICES_PATH: &str = "CROSSASSET_PRICES_PATH";
pub const ENV_MATRIX_PATH: &str = "CROSSASSET_MATRIX_PATH";
pub const ENV_LOG_LEVEL: &str = "CROSSASSET_LOG_LEVEL";
pub const ENV_ANALYSIS_YEARS: &str = "CROSSASSET_ANALYSIS_YEARS";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Locations of the persisted tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub prices_path: PathBuf,
    pub matrix_path: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            prices_path: PathBuf::from("data/market_prices.parquet"),
            matrix_path: PathBuf::from("data/correlation_matrix.parquet"),
        }
    }
}

/// Batch matrix job settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixSettings {
    /// Lookback columns, e.g. `["1M", "3M", "6M", "12M"]`
    pub lookbacks: Vec<Lookback>,
}

impl Default for MatrixSettings {
    fn default() -> Self {
        Self {
            lookbacks: Lookback::standard(),
        }
    }
}

/// Pair query settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairSettings {
    /// Pair analysed when none is given
    pub default_assets: [String; 2],
    #[serde(flatten)]
    pub analysis: PairAnalysisConfig,
}

impl Default for PairSettings {
    fn default() -> Self {
        Self {
            default_assets: ["SPY".to_string(), "BTC".to_string()],
            analysis: PairAnalysisConfig::default(),
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub data: DataPaths,

    #[serde(default)]
    pub matrix: MatrixSettings,

    #[serde(default)]
    pub pair: PairSettings,

    /// Asset catalog; replaces the built-in basket when present
    #[serde(default = "default_assets")]
    pub assets: Vec<AssetInfo>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data: DataPaths::default(),
            matrix: MatrixSettings::default(),
            pair: PairSettings::default(),
            assets: default_assets(),
        }
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub prices_path: Option<PathBuf>,
    pub matrix_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(path, &content)
    }

    /// Parse configuration text; `origin` is used in error messages only
    pub fn from_toml(origin: &Path, content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load `path`, or the defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "Config file not found; using defaults");
            Ok(Self::default())
        }
    }

    /// Apply `CROSSASSET_*` environment variable overrides
    pub fn with_env_override(mut self) -> Self {
        if let Ok(path) = std::env::var(ENV_PRICES_PATH) {
            self.data.prices_path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var(ENV_MATRIX_PATH) {
            self.data.matrix_path = PathBuf::from(path);
        }

        if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
            self.log_level = level;
        }

        if let Ok(years) = std::env::var(ENV_ANALYSIS_YEARS) {
            match years.trim().parse() {
                Ok(years) => self.pair.analysis.analysis_years = years,
                Err(_) => warn!(
                    variable = ENV_ANALYSIS_YEARS,
                    value = %years,
                    "Ignoring non-numeric override"
                ),
            }
        }

        self
    }

    /// Apply command-line overrides
    pub fn with_cli_overrides(mut self, overrides: &CliOverrides) -> Self {
        if let Some(path) = &overrides.prices_path {
            self.data.prices_path = path.clone();
        }
        if let Some(path) = &overrides.matrix_path {
            self.data.matrix_path = path.clone();
        }
        if let Some(level) = &overrides.log_level {
            self.log_level = level.clone();
        }
        self
    }

    /// Validate the configuration, collecting every problem found
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, VALID_LOG_LEVELS
            ));
        }

        if self.data.prices_path.as_os_str().is_empty() {
            errors.push("data.prices_path cannot be empty".to_string());
        }
        if self.data.matrix_path.as_os_str().is_empty() {
            errors.push("data.matrix_path cannot be empty".to_string());
        }

        if self.matrix.lookbacks.is_empty() {
            errors.push("matrix.lookbacks must list at least one lookback".to_string());
        }
        let mut labels = HashSet::new();
        for lookback in &self.matrix.lookbacks {
            if !labels.insert(lookback.label()) {
                errors.push(format!("matrix.lookbacks lists {} twice", lookback));
            }
        }

        if let Err(e) = self.pair.analysis.validate() {
            errors.push(format!("pair: {}", e));
        }
        let [a, b] = &self.pair.default_assets;
        if a.trim().is_empty() || b.trim().is_empty() {
            errors.push("pair.default_assets cannot contain empty symbols".to_string());
        } else if a == b {
            errors.push(format!("pair.default_assets must differ (both are {})", a));
        }

        let mut symbols = HashSet::new();
        for asset in &self.assets {
            if asset.symbol.trim().is_empty() {
                errors.push("assets: entry with empty symbol".to_string());
            } else if !symbols.insert(asset.symbol.as_str()) {
                errors.push(format!("assets: duplicate symbol {}", asset.symbol));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Catalog view over the configured assets
    pub fn catalog(&self) -> AssetCatalog<'_> {
        AssetCatalog::new(&self.assets)
    }
}

/// Resolve the effective configuration: file (or defaults), environment,
/// then command-line overrides, validated.
pub fn build_config(config_path: Option<&Path>, overrides: &CliOverrides) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    let config = config.with_env_override().with_cli_overrides(overrides);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use corr_engine::horizons::Horizon;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.matrix.lookbacks, Lookback::standard());
        assert_eq!(config.pair.default_assets, ["SPY".to_string(), "BTC".to_string()]);
        assert_eq!(config.pair.analysis.rolling_windows, vec![30, 90]);
        assert_eq!(config.pair.analysis.analysis_years, 3);
        assert_eq!(config.assets.len(), 42);
    }

    #[test]
    fn test_default_config_validates() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_parse_full_file() {
        let text = r#"
            log_level = "debug"

            [data]
            prices_path = "/srv/prices.parquet"

            [matrix]
            lookbacks = ["1M", "2Y"]

            [pair]
            default_assets = ["QQQ", "GLD"]
            rolling_windows = [20]
            analysis_years = 5
            min_coverage = 0.9
            horizons = [{ key = "1M", name = "Month" }, { key = "10D" }]

            [[assets]]
            symbol = "QQQ"
            description = "Nasdaq 100 ETF"

            [[assets]]
            symbol = "GLD"
            description = "Gold ETF"
            category = "Commodities"
        "#;
        let config = AppConfig::from_toml(Path::new("test.toml"), text).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.data.prices_path, PathBuf::from("/srv/prices.parquet"));
        assert_eq!(config.data.matrix_path, DataPaths::default().matrix_path);
        assert_eq!(config.matrix.lookbacks[1].days(), 504);
        assert_eq!(config.pair.analysis.analysis_years, 5);
        assert_eq!(config.pair.analysis.rolling_windows, vec![20]);
        assert_eq!(config.pair.analysis.horizons[0].name(), "Month");
        assert_eq!(config.pair.analysis.horizons[1].name(), "10 Days");
        assert_eq!(config.assets.len(), 2);
        assert_eq!(config.catalog().describe("SPY"), "Unknown Asset");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_pair_section_keeps_defaults() {
        let config = AppConfig::from_toml(Path::new("t.toml"), "[pair]\nanalysis_years = 2\n").unwrap();
        assert_eq!(config.pair.analysis.analysis_years, 2);
        assert_eq!(config.pair.analysis.horizons, Horizon::standard());
        assert_eq!(config.pair.default_assets[1], "BTC");
    }

    #[test]
    fn test_bad_lookback_label_is_parse_error() {
        let result = AppConfig::from_toml(Path::new("t.toml"), "[matrix]\nlookbacks = [\"3W\"]\n");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_oversized_lookback_label_is_parse_error() {
        let result = AppConfig::from_toml(
            Path::new("t.toml"),
            "[matrix]\nlookbacks = [\"99999999999999999Y\"]\n",
        );
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_validate_rejects_huge_analysis_years() {
        let config =
            AppConfig::from_toml(Path::new("t.toml"), "[pair]\nanalysis_years = 400000000\n").unwrap();
        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 1, "{:?}", errors);
                assert!(errors[0].contains("400000000 years"), "{:?}", errors);
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_env_override() {
        std::env::set_var(ENV_PRICES_PATH, "/tmp/env_prices.parquet");
        std::env::set_var(ENV_ANALYSIS_YEARS, "4");
        let config = AppConfig::default().with_env_override();
        assert_eq!(config.data.prices_path, PathBuf::from("/tmp/env_prices.parquet"));
        assert_eq!(config.pair.analysis.analysis_years, 4);

        std::env::set_var(ENV_ANALYSIS_YEARS, "several");
        let config = AppConfig::default().with_env_override();
        assert_eq!(config.pair.analysis.analysis_years, 3);

        std::env::remove_var(ENV_PRICES_PATH);
        std::env::remove_var(ENV_ANALYSIS_YEARS);
    }

    #[test]
    fn test_cli_overrides_win() {
        let overrides = CliOverrides {
            matrix_path: Some(PathBuf::from("out/m.parquet")),
            log_level: Some("warn".to_string()),
            ..Default::default()
        };
        let config = AppConfig::default().with_cli_overrides(&overrides);
        assert_eq!(config.data.matrix_path, PathBuf::from("out/m.parquet"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.data.prices_path, DataPaths::default().prices_path);
    }

    #[test]
    fn test_build_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrctl.toml");
        std::fs::write(&path, "log_level = \"error\"\n").unwrap();

        let config = build_config(Some(&path), &CliOverrides::default()).unwrap();
        assert_eq!(config.log_level, "error");

        std::fs::write(&path, "log_level = \"loud\"\n").unwrap();
        assert!(matches!(
            build_config(Some(&path), &CliOverrides::default()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_collects_multiple_errors() {
        let mut config = AppConfig::default();
        config.log_level = "invalid".to_string();
        config.data.prices_path = PathBuf::new();
        config.pair.default_assets = ["SPY".to_string(), "SPY".to_string()];
        config.pair.analysis.min_coverage = 2.0;
        config.assets.push(config.assets[0].clone());

        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 5, "{:?}", errors);
                assert!(errors.iter().any(|e| e.contains("log_level")));
                assert!(errors.iter().any(|e| e.contains("duplicate symbol SPY")));
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_valid_log_levels() {
        for level in &["trace", "debug", "info", "warn", "error", "INFO", "DEBUG"] {
            let mut config = AppConfig::default();
            config.log_level = level.to_string();
            assert!(config.validate().is_ok(), "Log level '{}' should be valid", level);
        }
    }
}
