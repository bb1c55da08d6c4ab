//! Check command implementation
//!
//! Reports the effective configuration and whether both tables are present
//! and readable.

use infra_config::AppConfig;
use infra_store::{read_correlation_matrix, read_price_table};
use tracing::warn;

use crate::{CliError, Result};

/// Run the check command
pub fn run(config: &AppConfig) -> Result<()> {
    println!("Configuration:");
    println!("  Log level:      {}", config.log_level);
    println!(
        "  Lookbacks:      {}",
        config
            .matrix
            .lookbacks
            .iter()
            .map(|l| l.label())
            .collect::<Vec<_>>()
            .join(", ")
    );
    let [a, b] = &config.pair.default_assets;
    println!("  Default pair:   {} / {}", a, b);
    println!("  Catalog:        {} assets", config.assets.len());
    println!();

    let mut failures = 0;

    print!("Price table {} ... ", config.data.prices_path.display());
    match read_price_table(&config.data.prices_path) {
        Ok(prices) => {
            println!(
                "ok ({} rows, {} assets, {} to {})",
                prices.len(),
                prices.num_assets(),
                prices.first_date().map_or_else(|| "-".to_string(), |d| d.to_string()),
                prices.last_date().map_or_else(|| "-".to_string(), |d| d.to_string()),
            );
            let catalog = config.catalog();
            let unknown: Vec<&str> = prices
                .symbols()
                .filter(|s| catalog.get(s).is_none())
                .collect();
            if !unknown.is_empty() {
                warn!("Symbols without a catalog entry: {}", unknown.join(", "));
            }
        }
        Err(e) => {
            println!("FAILED: {}", e);
            failures += 1;
        }
    }

    print!("Correlation matrix {} ... ", config.data.matrix_path.display());
    match read_correlation_matrix(&config.data.matrix_path) {
        Ok(matrix) => println!(
            "ok ({} pairs, {} lookbacks)",
            matrix.len(),
            matrix.lookbacks().len()
        ),
        Err(e) => {
            println!("FAILED: {}", e);
            failures += 1;
        }
    }

    if failures > 0 {
        return Err(CliError::CheckFailed(failures));
    }
    println!("\nAll checks passed");
    Ok(())
}
