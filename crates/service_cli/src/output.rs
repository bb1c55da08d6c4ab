//! Terminal rendering helpers.

use clap::ValueEnum;
use corr_core::Correlation;
use serde::Serialize;

use crate::Result;

/// Output format for query commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Correlation cell text: fixed decimals, or `n/a` when undefined.
pub fn correlation_cell(value: Correlation, decimals: usize) -> String {
    match value.value() {
        Some(v) => format!("{:.*}", decimals, v),
        None => "n/a".to_string(),
    }
}

/// Optional number cell.
pub fn number_cell(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.*}", decimals, v))
}

/// Box-drawn table with left-aligned first column and right-aligned others.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule = |left: &str, mid: &str, right: &str| {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}\n", left, segments.join(mid), right)
    };
    let line = |cells: &[String]| {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                if i == 0 {
                    format!(" {:<width$} ", cell, width = w)
                } else {
                    format!(" {:>width$} ", cell, width = w)
                }
            })
            .collect();
        format!("│{}│\n", padded.join("│"))
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut out = rule("┌", "┬", "┐");
    out.push_str(&line(&header_cells));
    out.push_str(&rule("├", "┼", "┤"));
    for row in rows {
        out.push_str(&line(row));
    }
    out.push_str(&rule("└", "┴", "┘"));
    out
}

/// Pretty JSON for `value`.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_cell() {
        assert_eq!(correlation_cell(Correlation::Defined(0.8765), 2), "0.88");
        assert_eq!(correlation_cell(Correlation::Defined(-0.5), 3), "-0.500");
        assert_eq!(correlation_cell(Correlation::InsufficientData, 2), "n/a");
    }

    #[test]
    fn test_render_table_alignment() {
        let table = render_table(
            &["Pair", "1M"],
            &[
                vec!["SPY/QQQ".to_string(), "0.934".to_string()],
                vec!["SPY/BTC".to_string(), "n/a".to_string()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "┌─────────┬───────┐");
        assert_eq!(lines[1], "│ Pair    │    1M │");
        assert_eq!(lines[3], "│ SPY/QQQ │ 0.934 │");
        assert_eq!(lines[4], "│ SPY/BTC │   n/a │");
        assert_eq!(lines[5], "└─────────┴───────┘");
    }

    #[test]
    fn test_number_cell() {
        assert_eq!(number_cell(Some(1.23456), 3), "1.235");
        assert_eq!(number_cell(None, 3), "n/a");
    }
}
