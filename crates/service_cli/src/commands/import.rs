//! Import command implementation
//!
//! Aligns a `date,close` CSV series onto the price table's date index and
//! writes the table back.

use std::path::Path;

use infra_config::AppConfig;
use infra_store::TableStore;
use tracing::info;

use crate::{CliError, Result};

/// Run the import command
pub fn run(config: &AppConfig, symbol: &str, csv: &Path) -> Result<()> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(CliError::InvalidArgument("symbol cannot be empty".to_string()));
    }
    info!("Importing {} from {}", symbol, csv.display());

    let store = TableStore::new(&config.data.prices_path, &config.data.matrix_path);
    let report = store.import_close_csv(symbol, csv)?;

    println!("\n{} ({}) Data Statistics:", symbol, config.catalog().describe(symbol));
    println!("  Prices read:      {}", report.read);
    println!("  Aligned to index: {}", report.aligned);
    println!("  Missing values:   {}", report.missing);
    if report.replaced {
        println!("  Existing column replaced");
    }
    println!("  Saved to {}", store.prices_path().display());
    Ok(())
}
