//! Correlation outcome type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a correlation estimate.
///
/// A coefficient is either defined and inside `[-1, 1]`, or explicitly
/// marked as undefined because the window lacked observations or one of the
/// inputs had zero variance. NaN never escapes into this type.
///
/// Serialises as a nullable number, so `InsufficientData` becomes `null` in
/// JSON and in nullable table columns.
///
/// # Examples
/// ```
/// use corr_core::types::Correlation;
///
/// let c = Correlation::from_estimate(Some(0.81234));
/// assert_eq!(c.rounded(3), Correlation::Defined(0.812));
///
/// let missing = Correlation::from_estimate(Some(f64::NAN));
/// assert!(!missing.is_defined());
/// assert_eq!(format!("{}", missing), "insufficient data");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Correlation {
    /// A coefficient in `[-1, 1]`
    Defined(f64),
    /// Not enough valid observations, or a degenerate input series
    #[default]
    InsufficientData,
}

impl Correlation {
    /// Wrap a raw estimate, rejecting non-finite values and clamping rounding
    /// overshoot back into `[-1, 1]`.
    pub fn from_estimate(estimate: Option<f64>) -> Self {
        match estimate {
            Some(value) if value.is_finite() => Self::Defined(value.clamp(-1.0, 1.0)),
            _ => Self::InsufficientData,
        }
    }

    /// The coefficient, if defined.
    #[inline]
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Defined(value) => Some(*value),
            Self::InsufficientData => None,
        }
    }

    /// Whether a coefficient is available.
    #[inline]
    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Defined(_))
    }

    /// Round a defined coefficient to `decimals` places.
    pub fn rounded(self, decimals: i32) -> Self {
        match self {
            Self::Defined(value) => {
                Self::Defined(crate::math::stats::round_to(value, decimals).clamp(-1.0, 1.0))
            }
            Self::InsufficientData => Self::InsufficientData,
        }
    }
}

impl From<Option<f64>> for Correlation {
    fn from(value: Option<f64>) -> Self {
        Self::from_estimate(value)
    }
}

impl From<Correlation> for Option<f64> {
    fn from(value: Correlation) -> Self {
        value.value()
    }
}

impl fmt::Display for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, f.precision()) {
            (Self::Defined(value), Some(precision)) => write!(f, "{:.*}", precision, value),
            (Self::Defined(value), None) => write!(f, "{}", value),
            (Self::InsufficientData, _) => f.write_str("insufficient data"),
        }
    }
}
