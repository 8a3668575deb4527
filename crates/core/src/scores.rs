//! Composite severity scores summed from record sub-items.
//!
//! Every instrument here follows the same law: the total is the sum of its
//! fixed, ordered sub-item fields read through `ChartValue::as_int`, so a
//! missing or malformed sub-item contributes zero instead of poisoning the
//! total. The field list for each family lives on [`PatientRecord`]; this
//! module never enumerates field names itself.

use rounds_types::ChartValue;

use crate::record::PatientRecord;

fn family_total(items: &[&ChartValue]) -> i64 {
    items.iter().map(|item| item.as_int()).sum()
}

/// SOFA total (0-24) across the six organ systems.
pub fn sofa_total(record: &PatientRecord) -> i64 {
    family_total(&record.sofa_items())
}

/// Glasgow Coma Scale total (3-15 when fully charted).
pub fn gcs_total(record: &PatientRecord) -> i64 {
    family_total(&record.gcs_items())
}

/// qSOFA total (0-3).
pub fn qsofa_total(record: &PatientRecord) -> i64 {
    family_total(&record.qsofa_items())
}

/// CURB-65 total (0-5).
pub fn curb65_total(record: &PatientRecord) -> i64 {
    family_total(&record.curb65_items())
}

/// Modified Early Warning Score total.
pub fn mews_total(record: &PatientRecord) -> i64 {
    family_total(&record.mews_items())
}

/// NUTRIC nutrition-risk total.
pub fn nutric_total(record: &PatientRecord) -> i64 {
    family_total(&record.nutric_items())
}

/// Charlson comorbidity index total.
pub fn charlson_total(record: &PatientRecord) -> i64 {
    family_total(&record.charlson_items())
}

/// CPOT pain total (0-8).
pub fn cpot_total(record: &PatientRecord) -> i64 {
    family_total(&record.cpot_items())
}

/// Mortality-risk reading of a qSOFA total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QsofaRisk {
    /// Total >= 2: high risk of poor outcome in suspected infection.
    High,
    Low,
}

/// Classifies a qSOFA total.
pub fn qsofa_risk(total: i64) -> QsofaRisk {
    if total >= 2 {
        QsofaRisk::High
    } else {
        QsofaRisk::Low
    }
}

/// Disposition suggested by a CURB-65 total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Curb65Disposition {
    /// Total >= 3.
    IntensiveCare,
    /// Total == 2.
    Ward,
    /// Total <= 1.
    Outpatient,
}

/// Classifies a CURB-65 total.
pub fn curb65_disposition(total: i64) -> Curb65Disposition {
    if total >= 3 {
        Curb65Disposition::IntensiveCare
    } else if total == 2 {
        Curb65Disposition::Ward
    } else {
        Curb65Disposition::Outpatient
    }
}

impl std::fmt::Display for QsofaRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QsofaRisk::High => write!(f, "high risk"),
            QsofaRisk::Low => write!(f, "low risk"),
        }
    }
}

impl std::fmt::Display for Curb65Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Curb65Disposition::IntensiveCare => write!(f, "high risk - ICU admission"),
            Curb65Disposition::Ward => write!(f, "moderate risk - ward admission"),
            Curb65Disposition::Outpatient => write!(f, "low risk - outpatient"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rounds_types::ChartValue;

    fn empty_record() -> PatientRecord {
        let mut record = PatientRecord::blank();
        record.gcs_eyes = ChartValue::empty();
        record.gcs_verbal = ChartValue::empty();
        record.gcs_motor = ChartValue::empty();
        record
    }

    #[test]
    fn all_empty_families_sum_to_zero() {
        let record = empty_record();
        assert_eq!(sofa_total(&record), 0);
        assert_eq!(gcs_total(&record), 0);
        assert_eq!(qsofa_total(&record), 0);
        assert_eq!(curb65_total(&record), 0);
        assert_eq!(mews_total(&record), 0);
        assert_eq!(nutric_total(&record), 0);
        assert_eq!(charlson_total(&record), 0);
        assert_eq!(cpot_total(&record), 0);
    }

    #[test]
    fn sofa_sums_all_six_systems() {
        let mut record = PatientRecord::blank();
        record.sofa_resp = ChartValue::from(3);
        record.sofa_coag = ChartValue::from(2);
        record.sofa_liver = ChartValue::from(0);
        record.sofa_cardio = ChartValue::from(4);
        record.sofa_gcs = ChartValue::from(4);
        record.sofa_renal = ChartValue::from(2);
        assert_eq!(sofa_total(&record), 15);
    }

    #[test]
    fn sums_accept_textual_codes_and_ignore_garbage() {
        let mut record = PatientRecord::blank();
        record.sofa_resp = ChartValue::from("3");
        record.sofa_coag = ChartValue::from("not charted");
        record.sofa_cardio = ChartValue::from("2.9");
        assert_eq!(sofa_total(&record), 5);
    }

    #[test]
    fn blank_record_keeps_full_gcs() {
        assert_eq!(gcs_total(&PatientRecord::blank()), 15);
    }

    #[test]
    fn qsofa_risk_threshold_is_two() {
        assert_eq!(qsofa_risk(0), QsofaRisk::Low);
        assert_eq!(qsofa_risk(1), QsofaRisk::Low);
        assert_eq!(qsofa_risk(2), QsofaRisk::High);
        assert_eq!(qsofa_risk(3), QsofaRisk::High);
    }

    #[test]
    fn curb65_disposition_tiers() {
        assert_eq!(curb65_disposition(0), Curb65Disposition::Outpatient);
        assert_eq!(curb65_disposition(1), Curb65Disposition::Outpatient);
        assert_eq!(curb65_disposition(2), Curb65Disposition::Ward);
        assert_eq!(curb65_disposition(3), Curb65Disposition::IntensiveCare);
        assert_eq!(curb65_disposition(5), Curb65Disposition::IntensiveCare);
    }

    #[test]
    fn idempotent_over_a_snapshot() {
        let mut record = PatientRecord::blank();
        record.sofa_cardio = ChartValue::from(4);
        assert_eq!(sofa_total(&record), sofa_total(&record));
    }
}
