//! corrctl - Command Line Operations for Cross-Asset Correlation
//!
//! # Commands
//!
//! - `corrctl matrix` - Build and persist the pairwise correlation matrix
//! - `corrctl pair <A> <B>` - Rolling and volatility correlation for one pair
//! - `corrctl summary` - Statistics for the stored matrix
//! - `corrctl import --symbol BTC --csv btc.csv` - Align a close series into the price table
//! - `corrctl check` - Validate configuration and tables
//!
//! # Architecture
//!
//! As the service layer, this crate wires configuration (`infra_config`),
//! storage (`infra_store`) and the engine (`corr_engine`) together.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use infra_config::{build_config, CliOverrides};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod error;
mod output;

pub use error::{CliError, Result};
use output::OutputFormat;

/// Cross-asset correlation engine CLI
#[derive(Parser)]
#[command(name = "corrctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (defaults to ./corrctl.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the pairwise correlation matrix and persist it
    Matrix {
        /// Price table to read
        #[arg(short, long, env = "CROSSASSET_PRICES_PATH")]
        prices: Option<PathBuf>,

        /// Matrix table to write
        #[arg(short, long, env = "CROSSASSET_MATRIX_PATH")]
        output: Option<PathBuf>,
    },

    /// Analyse one asset pair
    Pair {
        /// First asset (defaults to the configured pair)
        asset_a: Option<String>,

        /// Second asset
        asset_b: Option<String>,

        /// Price table to read
        #[arg(short, long, env = "CROSSASSET_PRICES_PATH")]
        prices: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Summarise a stored correlation matrix
    Summary {
        /// Matrix table to read
        #[arg(short, long, env = "CROSSASSET_MATRIX_PATH")]
        input: Option<PathBuf>,

        /// Lookback for the top pair lists (e.g. 1M)
        #[arg(short, long)]
        lookback: Option<String>,

        /// Number of pairs in each list
        #[arg(short, long, default_value = "5")]
        top: usize,
    },

    /// Align a date,close CSV series into the price table
    Import {
        /// Column name for the series
        #[arg(short, long)]
        symbol: String,

        /// CSV file with date,close rows
        #[arg(long)]
        csv: PathBuf,

        /// Price table to update
        #[arg(short, long, env = "CROSSASSET_PRICES_PATH")]
        prices: Option<PathBuf>,
    },

    /// Check configuration and table availability
    Check,
}

impl Commands {
    fn overrides(&self) -> CliOverrides {
        match self {
            Commands::Matrix { prices, output } => CliOverrides {
                prices_path: prices.clone(),
                matrix_path: output.clone(),
                ..Default::default()
            },
            Commands::Pair { prices, .. } | Commands::Import { prices, .. } => CliOverrides {
                prices_path: prices.clone(),
                ..Default::default()
            },
            Commands::Summary { input, .. } => CliOverrides {
                matrix_path: input.clone(),
                ..Default::default()
            },
            Commands::Check => CliOverrides::default(),
        }
    }
}

fn init_tracing(level: &str) {
    // RUST_LOG takes precedence over the configured level. Logs go to stderr
    // so that stdout carries only command output.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut overrides = cli.command.overrides();
    if cli.verbose {
        overrides.log_level = Some("debug".to_string());
    }
    let config = build_config(cli.config.as_deref(), &overrides)
        .context("failed to load configuration")?;

    init_tracing(&config.log_level.to_lowercase());
    debug!(
        prices = %config.data.prices_path.display(),
        matrix = %config.data.matrix_path.display(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Matrix { .. } => commands::matrix::run(&config)?,
        Commands::Pair {
            asset_a,
            asset_b,
            format,
            ..
        } => commands::pair::run(&config, asset_a.as_deref(), asset_b.as_deref(), format)?,
        Commands::Summary { lookback, top, .. } => {
            commands::summary::run(&config, lookback.as_deref(), top)?
        }
        Commands::Import { symbol, csv, .. } => commands::import::run(&config, &symbol, &csv)?,
        Commands::Check => commands::check::run(&config)?,
    }
    Ok(())
}
