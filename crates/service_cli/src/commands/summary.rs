//! Summary command implementation
//!
//! Reports statistics for a stored correlation matrix without recomputing it.

use corr_engine::horizons::Lookback;
use corr_engine::summary::{least_correlated, most_correlated, MatrixSummary, PairCorrelation};
use infra_config::AppConfig;
use infra_store::read_correlation_matrix;
use tracing::info;

use crate::output::{number_cell, render_table};
use crate::{CliError, Result};

/// Run the summary command
pub fn run(config: &AppConfig, lookback: Option<&str>, top: usize) -> Result<()> {
    let path = &config.data.matrix_path;
    info!("Summarising {}", path.display());

    let matrix = read_correlation_matrix(path)?;
    let summary = MatrixSummary::from_matrix(&matrix);
    print_summary(&summary);

    let label = match lookback {
        Some(label) => Lookback::parse(label)?.label(),
        None => match matrix.lookbacks().first() {
            Some(first) => first.label(),
            None => return Ok(()),
        },
    };
    if matrix.lookback_index(&label).is_none() {
        return Err(CliError::InvalidArgument(format!(
            "matrix has no {} column. Available: {}",
            label,
            matrix
                .lookbacks()
                .iter()
                .map(Lookback::label)
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }

    print_pairs(
        &format!("Most Correlated Pairs ({})", label),
        &most_correlated(&matrix, &label, top)?,
    );
    print_pairs(
        &format!("Least Correlated Pairs ({})", label),
        &least_correlated(&matrix, &label, top)?,
    );
    Ok(())
}

/// Print per-lookback statistics.
pub(crate) fn print_summary(summary: &MatrixSummary) {
    println!("\nCorrelation Summary ({} pairs)", summary.pairs);
    let rows: Vec<Vec<String>> = summary
        .lookbacks
        .iter()
        .map(|s| {
            vec![
                s.lookback.label(),
                number_cell(s.mean, 3),
                number_cell(s.max, 3),
                number_cell(s.min, 3),
                s.undefined.to_string(),
            ]
        })
        .collect();
    print!(
        "{}",
        render_table(&["Lookback", "Average", "Highest", "Lowest", "Undefined"], &rows)
    );
}

/// Print a titled pair list.
pub(crate) fn print_pairs(title: &str, pairs: &[PairCorrelation]) {
    println!("\n{}:", title);
    if pairs.is_empty() {
        println!("  (no defined correlations)");
        return;
    }
    let rows: Vec<Vec<String>> = pairs
        .iter()
        .map(|p| {
            vec![
                p.asset_a.clone(),
                p.asset_b.clone(),
                format!("{:.3}", p.correlation),
            ]
        })
        .collect();
    print!("{}", render_table(&["Asset1", "Asset2", "Correlation"], &rows));
}
