//! Matrix command implementation
//!
//! Builds the pairwise correlation matrix from the price table, persists it,
//! and prints the per-lookback summary.

use corr_engine::matrix::build_correlation_matrix;
use corr_engine::summary::{least_correlated, most_correlated, MatrixSummary};
use infra_config::AppConfig;
use infra_store::TableStore;
use tracing::info;

use crate::commands::summary::{print_pairs, print_summary};
use crate::Result;

/// Pairs listed in the most/least correlated tables
const TOP_PAIRS: usize = 5;

/// Run the matrix command
pub fn run(config: &AppConfig) -> Result<()> {
    let store = TableStore::new(&config.data.prices_path, &config.data.matrix_path);
    info!("Starting correlation matrix job...");
    info!("  Prices: {}", store.prices_path().display());
    info!("  Output: {}", store.matrix_path().display());

    let prices = store.load_prices()?;
    let matrix = build_correlation_matrix(&prices, &config.matrix.lookbacks)?;
    store.save_matrix(&matrix)?;

    let summary = MatrixSummary::from_matrix(&matrix);
    print_summary(&summary);

    if let Some(first) = matrix.lookbacks().first() {
        let label = first.label();
        let most = most_correlated(&matrix, &label, TOP_PAIRS)?;
        let least = least_correlated(&matrix, &label, TOP_PAIRS)?;
        print_pairs(&format!("Most Correlated Pairs ({})", label), &most);
        print_pairs(&format!("Least Correlated Pairs ({})", label), &least);
    }

    info!(pairs = matrix.len(), "Correlation matrix job complete");
    Ok(())
}
