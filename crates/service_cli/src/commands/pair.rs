//! Pair command implementation
//!
//! Runs the pair analysis (volatility correlation per horizon, rolling
//! return correlation, normalized performance) for two assets.

use corr_engine::analysis::{PairAnalysis, WindowCoverage};
use infra_config::{symbol_from_label, AppConfig};
use infra_store::read_price_table;
use serde::Serialize;
use tracing::{info, warn};

use crate::output::{correlation_cell, number_cell, render_table, to_json, OutputFormat};
use crate::Result;

#[derive(Serialize)]
struct PairReport<'a> {
    asset_a_label: String,
    asset_b_label: String,
    #[serde(flatten)]
    analysis: &'a PairAnalysis,
}

/// Run the pair command
pub fn run(
    config: &AppConfig,
    asset_a: Option<&str>,
    asset_b: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let [default_a, default_b] = &config.pair.default_assets;
    let asset_a = symbol_from_label(asset_a.unwrap_or(default_a.as_str()));
    let asset_b = symbol_from_label(asset_b.unwrap_or(default_b.as_str()));
    if asset_a == asset_b {
        warn!("Please select two different assets for comparison");
    }
    info!("Analysing {} vs {}", asset_a, asset_b);

    let prices = read_price_table(&config.data.prices_path)?;
    let analysis = PairAnalysis::run(&prices, asset_a, asset_b, &config.pair.analysis)?;

    let catalog = config.catalog();
    let report = PairReport {
        asset_a_label: catalog.label(asset_a),
        asset_b_label: catalog.label(asset_b),
        analysis: &analysis,
    };

    match format {
        OutputFormat::Json => println!("{}", to_json(&report)?),
        OutputFormat::Table => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &PairReport<'_>) {
    let analysis = report.analysis;
    println!("\n{} vs {}", report.asset_a_label, report.asset_b_label);
    println!(
        "Analysis window: {} to {} ({} years)",
        analysis.window.start, analysis.window.end, analysis.window.years
    );
    for coverage in analysis.coverage.iter().filter(|c| !c.is_sufficient()) {
        println!(
            "Warning: insufficient data for {}: expected at least {} trading days, found {}",
            coverage.symbol,
            (coverage.expected as f64 * WindowCoverage::MIN_RATIO) as usize,
            coverage.observed
        );
    }

    println!("\nVolatility-Based Correlations:");
    let rows: Vec<Vec<String>> = analysis
        .volatility
        .entries
        .iter()
        .map(|e| {
            vec![
                e.horizon.name(),
                e.horizon.days().to_string(),
                e.observations.to_string(),
                correlation_cell(e.correlation, 2),
            ]
        })
        .collect();
    print!(
        "{}",
        render_table(&["Horizon", "Days", "Observations", "Correlation"], &rows)
    );

    println!("\nRolling Return Correlation:");
    let rows: Vec<Vec<String>> = analysis
        .rolling
        .iter()
        .map(|series| {
            let (date, value) = match series.latest() {
                Some((date, value)) => (date.to_string(), format!("{:.2}", value)),
                None => ("-".to_string(), "n/a".to_string()),
            };
            vec![
                format!("{}D", series.window),
                date,
                value,
                series.defined_len().to_string(),
            ]
        })
        .collect();
    print!(
        "{}",
        render_table(&["Window", "As of", "Latest", "Points"], &rows)
    );

    println!("\nNormalized Performance:");
    let rows: Vec<Vec<String>> = analysis
        .performance
        .iter()
        .map(|p| {
            vec![
                p.symbol.clone(),
                number_cell(p.latest(), 3),
                number_cell(p.latest().map(|v| (v - 1.0) * 100.0), 1),
            ]
        })
        .collect();
    print!(
        "{}",
        render_table(&["Asset", "Normalized", "Change %"], &rows)
    );
}
