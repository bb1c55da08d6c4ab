//! Summary statistics over a correlation matrix.

use serde::Serialize;

use crate::error::EngineError;
use crate::horizons::Lookback;
use crate::matrix::CorrelationMatrix;

/// Aggregate statistics for one lookback column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookbackSummary {
    /// Lookback the column was computed over
    pub lookback: Lookback,
    /// Mean of the defined correlations
    pub mean: Option<f64>,
    /// Highest defined correlation
    pub max: Option<f64>,
    /// Lowest defined correlation
    pub min: Option<f64>,
    /// Number of defined values
    pub defined: usize,
    /// Number of pairs with insufficient data
    pub undefined: usize,
}

impl LookbackSummary {
    fn from_values(lookback: Lookback, values: impl Iterator<Item = Option<f64>>) -> Self {
        let mut sum = 0.0;
        let mut max: Option<f64> = None;
        let mut min: Option<f64> = None;
        let mut defined = 0;
        let mut undefined = 0;

        for value in values {
            match value {
                Some(v) => {
                    sum += v;
                    defined += 1;
                    max = Some(max.map_or(v, |m| m.max(v)));
                    min = Some(min.map_or(v, |m| m.min(v)));
                }
                None => undefined += 1,
            }
        }

        let mean = (defined > 0).then(|| sum / defined as f64);
        Self {
            lookback,
            mean,
            max,
            min,
            defined,
            undefined,
        }
    }
}

/// Per-lookback statistics for a whole matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixSummary {
    /// Number of asset pairs
    pub pairs: usize,
    /// One entry per lookback, in matrix order
    pub lookbacks: Vec<LookbackSummary>,
}

impl MatrixSummary {
    /// Summarise every lookback column of `matrix`.
    pub fn from_matrix(matrix: &CorrelationMatrix) -> Self {
        let lookbacks = matrix
            .lookbacks()
            .iter()
            .enumerate()
            .map(|(index, lookback)| {
                LookbackSummary::from_values(
                    lookback.clone(),
                    matrix.rows().iter().map(|row| row.values[index].value()),
                )
            })
            .collect();

        Self {
            pairs: matrix.len(),
            lookbacks,
        }
    }

    /// Summary for one lookback label.
    pub fn get(&self, label: &str) -> Option<&LookbackSummary> {
        let wanted = Lookback::parse(label).ok()?;
        self.lookbacks.iter().find(|s| s.lookback == wanted)
    }
}

/// A pair and its correlation at one lookback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairCorrelation {
    pub asset_a: String,
    pub asset_b: String,
    pub correlation: f64,
}

/// The `n` pairs with the highest defined correlation at `label`, highest first.
///
/// # Errors
///
/// Returns `EngineError::InvalidLookbacks` when the matrix has no `label` column.
pub fn most_correlated(
    matrix: &CorrelationMatrix,
    label: &str,
    n: usize,
) -> Result<Vec<PairCorrelation>, EngineError> {
    let mut pairs = defined_pairs(matrix, label)?;
    pairs.sort_by(|a, b| b.correlation.total_cmp(&a.correlation));
    pairs.truncate(n);
    Ok(pairs)
}

/// The `n` pairs with the lowest defined correlation at `label`, lowest first.
pub fn least_correlated(
    matrix: &CorrelationMatrix,
    label: &str,
    n: usize,
) -> Result<Vec<PairCorrelation>, EngineError> {
    let mut pairs = defined_pairs(matrix, label)?;
    pairs.sort_by(|a, b| a.correlation.total_cmp(&b.correlation));
    pairs.truncate(n);
    Ok(pairs)
}

fn defined_pairs(
    matrix: &CorrelationMatrix,
    label: &str,
) -> Result<Vec<PairCorrelation>, EngineError> {
    let index = matrix.lookback_index(label).ok_or_else(|| {
        EngineError::InvalidLookbacks(format!("matrix has no {} column", label))
    })?;

    Ok(matrix
        .rows()
        .iter()
        .filter_map(|row| {
            row.values[index].value().map(|correlation| PairCorrelation {
                asset_a: row.asset_a.clone(),
                asset_b: row.asset_b.clone(),
                correlation,
            })
        })
        .collect())
}
