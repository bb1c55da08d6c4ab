//! Period return computation.
//!
//! `return[t] = price[t] / price[t-1] - 1`, aligned to the price dates. The
//! first entry has no prior observation and is undefined, as is any entry
//! whose own or previous price is missing.

/// Fractional period returns of a nullable price column.
///
/// Output has the same length as the input; empty input yields empty output.
///
/// # Example
///
/// ```
/// use corr_core::period_returns;
///
/// let r = period_returns(&[Some(100.0), Some(110.0), None, Some(99.0)]);
/// assert_eq!(r.len(), 4);
/// assert_eq!(r[0], None);
/// assert!((r[1].unwrap() - 0.1).abs() < 1e-12);
/// assert_eq!(r[2], None);
/// assert_eq!(r[3], None);
/// ```
pub fn period_returns(prices: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return out;
    }

    out.push(None);
    out.extend(prices.windows(2).map(|w| match (w[0], w[1]) {
        (Some(prev), Some(curr)) if prev != 0.0 => Some(curr / prev - 1.0),
        _ => None,
    }));
    out
}

/// Return series aligned to a price table's dates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReturnSeries {
    values: Vec<Option<f64>>,
}

impl ReturnSeries {
    /// Compute returns from aligned prices.
    pub fn from_prices(prices: &[Option<f64>]) -> Self {
        Self {
            values: period_returns(prices),
        }
    }

    /// Wrap precomputed returns.
    pub fn from_values(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }

    /// Returns aligned to the source dates.
    #[inline]
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Series length (equal to the number of price dates).
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of defined returns.
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// The trailing `window` entries, or `None` if the series is shorter.
    pub fn tail(&self, window: usize) -> Option<&[Option<f64>]> {
        let start = self.values.len().checked_sub(window)?;
        Some(&self.values[start..])
    }

    /// Values at positions where both series are defined.
    ///
    /// The two series must share a date index; extra trailing entries of the
    /// longer series are ignored.
    pub fn complete_pairs(&self, other: &ReturnSeries) -> (Vec<f64>, Vec<f64>) {
        crate::math::rolling::complete_pairs(&self.values, &other.values)
    }
}
