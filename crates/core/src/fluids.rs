//! Fluid-balance extraction and classification.
//!
//! Intake and output are charted as free text, one entry per line, with the
//! volume in mL appearing anywhere in the entry ("0.9% saline 1500ml").
//! Every numeric token in the whole blob counts as a volume; a log with no
//! numbers sums to zero.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::PatientRecord;

static VOLUME_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\d.]+").expect("volume token pattern is valid"));

/// Sums every numeric token found in a fluid log.
///
/// Tokens that do not parse as a float (a stray "." for instance)
/// contribute zero rather than corrupting the sum.
pub fn extract_volume_sum(log: &str) -> f64 {
    VOLUME_TOKEN
        .find_iter(log)
        .filter_map(|token| token.as_str().parse::<f64>().ok())
        .sum()
}

/// One day's totals: intake, output and the net balance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DailyBalance {
    pub intake_ml: f64,
    pub output_ml: f64,
    /// intake - output; positive means retention.
    pub net_ml: f64,
}

/// Computes the daily balance from a record's intake/output logs.
pub fn daily_balance(record: &PatientRecord) -> DailyBalance {
    let intake_ml = extract_volume_sum(&record.intake_log);
    let output_ml = extract_volume_sum(&record.output_log);
    DailyBalance {
        intake_ml,
        output_ml,
        net_ml: intake_ml - output_ml,
    }
}

/// Risk tier for the magnitude of a daily balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BalanceTier {
    /// |balance| < 500 mL.
    Low,
    /// |balance| < 1000 mL.
    Moderate,
    /// |balance| >= 1000 mL: edema or hypovolaemia risk.
    High,
}

/// Classifies the magnitude of a net balance.
pub fn classify_magnitude(net_ml: f64) -> BalanceTier {
    let magnitude = net_ml.abs();
    if magnitude < 500.0 {
        BalanceTier::Low
    } else if magnitude < 1000.0 {
        BalanceTier::Moderate
    } else {
        BalanceTier::High
    }
}

/// Direction of a daily balance, with a +/-100 mL tolerance band.
///
/// Deliberately independent of [`classify_magnitude`]: the tier drives the
/// risk display, the trend drives the direction arrow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BalanceTrend {
    /// Net > +100 mL: fluid retention.
    Positive,
    /// Net < -100 mL: fluid loss.
    Negative,
    Stable,
}

/// Classifies the direction of a net balance.
pub fn classify_trend(net_ml: f64) -> BalanceTrend {
    if net_ml > 100.0 {
        BalanceTrend::Positive
    } else if net_ml < -100.0 {
        BalanceTrend::Negative
    } else {
        BalanceTrend::Stable
    }
}

impl std::fmt::Display for BalanceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceTier::Low => write!(f, "balanced"),
            BalanceTier::Moderate => write!(f, "moderate"),
            BalanceTier::High => write!(f, "high"),
        }
    }
}

impl std::fmt::Display for BalanceTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceTrend::Positive => write!(f, "positive - fluid retention"),
            BalanceTrend::Negative => write!(f, "negative - fluid loss"),
            BalanceTrend::Stable => write!(f, "stable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_tokens_anywhere_in_the_blob() {
        assert_eq!(extract_volume_sum("SF 500ml\nNaCl 250ml"), 750.0);
        assert_eq!(
            extract_volume_sum("Enteral feed 1000ml\nMedications 200ml\nBlood products 0ml"),
            1200.0
        );
    }

    #[test]
    fn no_numeric_tokens_sums_to_zero() {
        assert_eq!(extract_volume_sum(""), 0.0);
        assert_eq!(extract_volume_sum("nothing recorded yet"), 0.0);
    }

    #[test]
    fn decimal_tokens_and_stray_dots() {
        assert!((extract_volume_sum("0.9% saline 1500ml") - 1500.9).abs() < 1e-9);
        // A bare dot is not a number and contributes nothing.
        assert_eq!(extract_volume_sum("pending ."), 0.0);
    }

    #[test]
    fn daily_balance_subtracts_output_from_intake() {
        let mut record = PatientRecord::blank();
        record.intake_log = "Saline 1500ml\nEnteral feed 1000ml\nMedications 200ml".to_owned();
        record.output_log = "Urine 1200ml\nInsensible losses 800ml".to_owned();

        let balance = daily_balance(&record);
        assert_eq!(balance.intake_ml, 2700.0);
        assert_eq!(balance.output_ml, 2000.0);
        assert_eq!(balance.net_ml, 700.0);
    }

    #[test]
    fn magnitude_tiers_use_strict_bounds() {
        assert_eq!(classify_magnitude(0.0), BalanceTier::Low);
        assert_eq!(classify_magnitude(-499.9), BalanceTier::Low);
        assert_eq!(classify_magnitude(500.0), BalanceTier::Moderate);
        assert_eq!(classify_magnitude(-999.9), BalanceTier::Moderate);
        assert_eq!(classify_magnitude(1000.0), BalanceTier::High);
        assert_eq!(classify_magnitude(-2800.0), BalanceTier::High);
    }

    #[test]
    fn trend_has_a_hundred_ml_tolerance() {
        assert_eq!(classify_trend(100.0), BalanceTrend::Stable);
        assert_eq!(classify_trend(100.1), BalanceTrend::Positive);
        assert_eq!(classify_trend(-100.0), BalanceTrend::Stable);
        assert_eq!(classify_trend(-100.1), BalanceTrend::Negative);
    }

    #[test]
    fn tier_and_trend_stay_independent() {
        // 300 mL positive: trending up but still in the low-risk tier.
        assert_eq!(classify_magnitude(300.0), BalanceTier::Low);
        assert_eq!(classify_trend(300.0), BalanceTrend::Positive);
    }
}
