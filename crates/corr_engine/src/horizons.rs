//! Lookback windows and named horizons.
//!
//! A lookback is written as `<n>D`, `<n>M` or `<n>Y` and converted to
//! trading days with 21 days per month and 252 per year, so `1M` = 21,
//! `3M` = 63, `6M` = 126, `12M` = `1Y` = 252.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Trading days in one month
pub const TRADING_DAYS_PER_MONTH: usize = 21;

/// Trading days in one year
pub const TRADING_DAYS_PER_YEAR: usize = 252;

/// Calendar unit of a lookback label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Unit {
    Day,
    Month,
    Year,
}

impl Unit {
    fn trading_days(self) -> usize {
        match self {
            Unit::Day => 1,
            Unit::Month => TRADING_DAYS_PER_MONTH,
            Unit::Year => TRADING_DAYS_PER_YEAR,
        }
    }

    fn suffix(self) -> char {
        match self {
            Unit::Day => 'D',
            Unit::Month => 'M',
            Unit::Year => 'Y',
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Unit::Day => "Day",
            Unit::Month => "Month",
            Unit::Year => "Year",
        }
    }
}

/// A trailing window expressed as a label and its length in trading days.
///
/// Serialises as its label, e.g. `"3M"`.
///
/// # Examples
/// ```
/// use corr_engine::horizons::Lookback;
///
/// let lb: Lookback = "6M".parse().unwrap();
/// assert_eq!(lb.days(), 126);
/// assert_eq!(lb.column_name(), "Corr_6M");
/// assert_eq!(lb.describe(), "6 Months");
///
/// assert!("soon".parse::<Lookback>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Lookback {
    count: usize,
    unit: Unit,
}

impl Lookback {
    /// Parse a `<n>D`, `<n>M` or `<n>Y` label (case-insensitive).
    ///
    /// # Errors
    ///
    /// * `EngineError::InvalidLabel` - malformed label, zero count, or a
    ///   length that does not fit in `usize` trading days
    /// * `EngineError::InvalidWindow` - label resolves to fewer than 2 days
    pub fn parse(label: &str) -> Result<Self, EngineError> {
        let trimmed = label.trim();
        let invalid = || EngineError::InvalidLabel(label.to_string());

        let suffix = trimmed.chars().last().ok_or_else(invalid)?;
        let unit = match suffix.to_ascii_uppercase() {
            'D' => Unit::Day,
            'M' => Unit::Month,
            'Y' => Unit::Year,
            _ => return Err(invalid()),
        };
        let digits = &trimmed[..trimmed.len() - suffix.len_utf8()];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let count: usize = digits.parse().map_err(|_| invalid())?;
        if count == 0 {
            return Err(invalid());
        }
        // `days()` multiplies unchecked, so the product must fit here.
        let days = count
            .checked_mul(unit.trading_days())
            .ok_or_else(invalid)?;
        if days < 2 {
            return Err(EngineError::InvalidWindow(days));
        }
        Ok(Self { count, unit })
    }

    /// A lookback of exactly `days` trading days, labelled `<days>D`.
    pub fn from_days(days: usize) -> Result<Self, EngineError> {
        if days < 2 {
            return Err(EngineError::InvalidWindow(days));
        }
        Ok(Self {
            count: days,
            unit: Unit::Day,
        })
    }

    /// Canonical label, e.g. `"12M"`.
    pub fn label(&self) -> String {
        format!("{}{}", self.count, self.unit.suffix())
    }

    /// Window length in trading days.
    #[inline]
    pub fn days(&self) -> usize {
        self.count * self.unit.trading_days()
    }

    /// Name of the persisted matrix column.
    pub fn column_name(&self) -> String {
        format!("Corr_{}", self.label())
    }

    /// Human-readable length, e.g. `"1 Month"` or `"3 Months"`.
    pub fn describe(&self) -> String {
        let plural = if self.count == 1 { "" } else { "s" };
        format!("{} {}{}", self.count, self.unit.noun(), plural)
    }

    /// The batch matrix lookbacks: 1M, 3M, 6M, 12M.
    pub fn standard() -> Vec<Lookback> {
        [1, 3, 6, 12]
            .into_iter()
            .map(|count| Lookback {
                count,
                unit: Unit::Month,
            })
            .collect()
    }
}

impl FromStr for Lookback {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Lookback {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Lookback> for String {
    fn from(value: Lookback) -> Self {
        value.label()
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.unit.suffix())
    }
}

/// A named horizon for the volatility correlation summary.
///
/// The display name defaults to the lookback's description when not set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    /// Window key, e.g. `1M`
    pub key: Lookback,
    /// Display name, e.g. `1 Month`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Horizon {
    /// Horizon with the default display name.
    pub fn new(key: Lookback) -> Self {
        Self { key, name: None }
    }

    /// Horizon with an explicit display name.
    pub fn named(key: Lookback, name: impl Into<String>) -> Self {
        Self {
            key,
            name: Some(name.into()),
        }
    }

    /// Window length in trading days.
    #[inline]
    pub fn days(&self) -> usize {
        self.key.days()
    }

    /// Display name.
    pub fn name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.key.describe())
    }

    /// The dashboard horizons: 1 Month, 3 Months, 6 Months, 1 Year.
    pub fn standard() -> Vec<Horizon> {
        let month = |count| Lookback {
            count,
            unit: Unit::Month,
        };
        vec![
            Horizon::named(month(1), "1 Month"),
            Horizon::named(month(3), "3 Months"),
            Horizon::named(month(6), "6 Months"),
            Horizon::named(
                Lookback {
                    count: 1,
                    unit: Unit::Year,
                },
                "1 Year",
            ),
        ]
    }
}

/// Reject empty lookback sets and repeated labels.
pub(crate) fn validate_lookbacks(lookbacks: &[Lookback]) -> Result<(), EngineError> {
    if lookbacks.is_empty() {
        return Err(EngineError::InvalidLookbacks(
            "at least one lookback is required".to_string(),
        ));
    }
    for (i, lookback) in lookbacks.iter().enumerate() {
        if lookbacks[..i].contains(lookback) {
            return Err(EngineError::InvalidLookbacks(format!(
                "lookback {} is listed twice",
                lookback
            )));
        }
    }
    Ok(())
}
