//! Leaf value types for the rounds dashboard.
//!
//! This crate holds the small, dependency-free building blocks shared by the
//! record shape and the derived-value engine:
//! - [`ChartValue`], the number-or-text chart field
//! - demographic enumerations ([`Gender`], [`IbwSex`])
//! - [`Rass`], a validated sedation-depth level
//!
//! **No domain logic**: score formulas, thresholds and record handling belong
//! in `rounds-core`.

use serde::{Deserialize, Serialize};

/// Errors that can occur when validating clinical scale values.
#[derive(Debug, thiserror::Error)]
pub enum ScaleError {
    /// The RASS level was outside the defined -5..=+4 range.
    #[error("RASS level must be between -5 and +4, got {0}")]
    RassOutOfRange(i64),
}

/// A chart field that may hold a genuine number or its textual form.
///
/// Bedside charting must never be blocked by half-typed input, so every
/// numeric field on the patient record is stored as whatever the form
/// delivered: a number, a numeric string, or empty text meaning "not yet
/// recorded". The conversions below are total — malformed or missing input
/// reads as zero, never as an error.
///
/// The serde representation is untagged, so JSON round-trips preserve
/// whether a field was saved as a number or as a string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartValue {
    /// A recorded numeric value.
    Num(f64),
    /// Raw text as entered; the empty string means "not yet recorded".
    Text(String),
}

impl ChartValue {
    /// The "not yet recorded" state.
    pub fn empty() -> Self {
        ChartValue::Text(String::new())
    }

    /// Returns true when nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        match self {
            ChartValue::Num(_) => false,
            ChartValue::Text(text) => text.trim().is_empty(),
        }
    }

    /// Reads the field as a float, falling back to `0.0`.
    ///
    /// Empty text, non-numeric text and non-finite numbers all read as
    /// zero so that downstream sums and formulas stay total.
    pub fn as_f64(&self) -> f64 {
        let value = match self {
            ChartValue::Num(n) => *n,
            ChartValue::Text(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        };
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }

    /// Reads the field as an integer, truncating any fractional part.
    pub fn as_int(&self) -> i64 {
        self.as_f64() as i64
    }
}

impl Default for ChartValue {
    fn default() -> Self {
        ChartValue::empty()
    }
}

impl std::fmt::Display for ChartValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartValue::Num(n) => write!(f, "{}", n),
            ChartValue::Text(text) => write!(f, "{}", text),
        }
    }
}

impl From<f64> for ChartValue {
    fn from(value: f64) -> Self {
        ChartValue::Num(value)
    }
}

impl From<i64> for ChartValue {
    fn from(value: i64) -> Self {
        ChartValue::Num(value as f64)
    }
}

impl From<i32> for ChartValue {
    fn from(value: i32) -> Self {
        ChartValue::Num(value as f64)
    }
}

impl From<&str> for ChartValue {
    fn from(value: &str) -> Self {
        ChartValue::Text(value.to_owned())
    }
}

impl From<String> for ChartValue {
    fn from(value: String) -> Self {
        ChartValue::Text(value)
    }
}

/// Patient gender as recorded on admission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Convert to the wire/display string.
    pub fn to_wire(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    /// Parse from the wire/display string.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

impl Default for Gender {
    fn default() -> Self {
        Gender::Male
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_wire())
    }
}

/// Sex used by the Devine ideal-body-weight formula.
///
/// Kept separate from [`Gender`]: the formula is binary and the clinician
/// may choose a formula sex that differs from the recorded gender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IbwSex {
    M,
    F,
}

impl Default for IbwSex {
    fn default() -> Self {
        IbwSex::M
    }
}

impl std::fmt::Display for IbwSex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IbwSex::M => write!(f, "M"),
            IbwSex::F => write!(f, "F"),
        }
    }
}

/// A validated Richmond Agitation-Sedation Scale level.
///
/// The record itself stores RASS as a [`ChartValue`]; this type exists for
/// the edit boundary, where out-of-range input should be rejected before it
/// reaches the chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rass(i8);

impl Rass {
    /// Creates a RASS level, rejecting values outside `-5..=+4`.
    pub fn new(value: i64) -> Result<Self, ScaleError> {
        if (-5..=4).contains(&value) {
            Ok(Rass(value as i8))
        } else {
            Err(ScaleError::RassOutOfRange(value))
        }
    }

    /// The raw level.
    pub fn value(self) -> i8 {
        self.0
    }

    /// True when the level sits in the usual sedation target band (-1..=0).
    pub fn in_target_band(self) -> bool {
        (-1..=0).contains(&self.0)
    }
}

impl std::fmt::Display for Rass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 > 0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_value_reads_numbers_and_numeric_text() {
        assert_eq!(ChartValue::Num(12.5).as_f64(), 12.5);
        assert_eq!(ChartValue::from("380").as_f64(), 380.0);
        assert_eq!(ChartValue::from(" 7.5 ").as_f64(), 7.5);
    }

    #[test]
    fn chart_value_reads_missing_and_malformed_as_zero() {
        assert_eq!(ChartValue::empty().as_f64(), 0.0);
        assert_eq!(ChartValue::from("PCV").as_f64(), 0.0);
        assert_eq!(ChartValue::from("12a").as_f64(), 0.0);
        assert_eq!(ChartValue::Num(f64::NAN).as_f64(), 0.0);
    }

    #[test]
    fn chart_value_truncates_to_integer() {
        assert_eq!(ChartValue::Num(3.9).as_int(), 3);
        assert_eq!(ChartValue::from("3.9").as_int(), 3);
        assert_eq!(ChartValue::Num(-1.5).as_int(), -1);
    }

    #[test]
    fn chart_value_empty_detection() {
        assert!(ChartValue::empty().is_empty());
        assert!(ChartValue::from("   ").is_empty());
        assert!(!ChartValue::Num(0.0).is_empty());
        assert!(!ChartValue::from("0").is_empty());
    }

    #[test]
    fn chart_value_round_trips_number_vs_string() {
        let num: ChartValue = serde_json::from_str("380").expect("parse number");
        assert_eq!(num, ChartValue::Num(380.0));
        let text: ChartValue = serde_json::from_str("\"380\"").expect("parse string");
        assert_eq!(text, ChartValue::Text("380".to_owned()));

        assert_eq!(serde_json::to_string(&num).expect("render"), "380.0");
        assert_eq!(serde_json::to_string(&text).expect("render"), "\"380\"");
    }

    #[test]
    fn gender_wire_round_trip() {
        for gender in [Gender::Male, Gender::Female, Gender::Other] {
            assert_eq!(Gender::from_wire(gender.to_wire()), Some(gender));
        }
        assert_eq!(Gender::from_wire("unknown"), None);
    }

    #[test]
    fn rass_accepts_defined_range_only() {
        assert!(Rass::new(-5).is_ok());
        assert!(Rass::new(4).is_ok());
        assert!(Rass::new(5).is_err());
        assert!(Rass::new(-6).is_err());
    }

    #[test]
    fn rass_target_band() {
        assert!(Rass::new(0).expect("valid").in_target_band());
        assert!(Rass::new(-1).expect("valid").in_target_band());
        assert!(!Rass::new(1).expect("valid").in_target_band());
        assert!(!Rass::new(-2).expect("valid").in_target_band());
    }
}
