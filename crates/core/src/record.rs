//! The per-patient clinical record.
//!
//! One [`PatientRecord`] is the full bedside chart for a single ICU patient:
//! admission details, per-system narrative text, ventilator settings,
//! fluid-balance logs, severity sub-scores and sedation/analgesia state.
//!
//! Every field is defaultable — a record is valid even when mostly empty, so
//! charting can happen incrementally. Numeric fields are stored as
//! [`ChartValue`] (number-or-text), which keeps the record faithful to
//! whatever the form delivered and makes the derived-value engine total over
//! missing input.
//!
//! Records are owned by the census and mutated only through it; the engine
//! modules read them and never write.

use chrono::{DateTime, Utc};
use rounds_types::{ChartValue, Gender, IbwSex};
use serde::{Deserialize, Serialize};

/// A single patient's chart.
///
/// Serialises to the exact persisted shape; unknown-at-save-time fields fall
/// back to their blank-record defaults on load, so older snapshots stay
/// readable as the chart grows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientRecord {
    // Identity / admission
    pub bed: String,
    pub name: String,
    pub age: ChartValue,
    pub gender: Gender,
    /// ISO 8601 date (YYYY-MM-DD) of ICU admission.
    pub admission_date: String,
    pub icu_day: ChartValue,
    pub main_diagnosis: String,

    // Narrative fields, one per system plus history/problems/plan
    pub history: String,
    pub problems: String,
    pub neuro: String,
    pub cardio: String,
    pub resp: String,
    pub renal: String,
    pub plan: String,
    pub comorbidities: String,

    // Ventilator settings
    pub vent_mode: String,
    /// Tidal volume, mL.
    pub tidal_volume: ChartValue,
    /// Respiratory rate, breaths/min.
    pub resp_rate: ChartValue,
    /// PEEP, cmH2O.
    pub peep: ChartValue,
    /// Peak inspiratory pressure, cmH2O.
    pub peak_pressure: ChartValue,
    /// Plateau pressure, cmH2O.
    pub plateau_pressure: ChartValue,
    /// Ventilator FiO2, percent (21-100).
    pub fio2: ChartValue,

    // Gas-exchange inputs
    /// PaO2, mmHg.
    pub pao2: ChartValue,
    /// FiO2 used for the P/F ratio, percent; falls back to the
    /// ventilator FiO2 when unset.
    pub pf_fio2: ChartValue,
    /// Mean airway pressure, cmH2O (oxygenation index input).
    pub mean_airway_pressure: ChartValue,
    /// Airway flow, L/min (resistance input).
    pub airway_flow: ChartValue,

    // Ideal-body-weight inputs
    /// Height, cm.
    pub ibw_height_cm: ChartValue,
    pub ibw_sex: IbwSex,

    // Fluid balance
    /// Free-text intake log; any numeric token counts as a volume in mL.
    pub intake_log: String,
    /// Free-text output log, same convention as the intake log.
    pub output_log: String,
    /// Cumulative balance, edited independently of the computed daily balance.
    pub cumulative_balance: String,

    // SOFA sub-scores (0-4 each)
    pub sofa_resp: ChartValue,
    pub sofa_coag: ChartValue,
    pub sofa_liver: ChartValue,
    pub sofa_cardio: ChartValue,
    pub sofa_gcs: ChartValue,
    pub sofa_renal: ChartValue,

    // Glasgow Coma Scale sub-scores
    pub gcs_eyes: ChartValue,
    pub gcs_verbal: ChartValue,
    pub gcs_motor: ChartValue,

    // qSOFA sub-scores (0-1 each)
    pub qsofa_mental: ChartValue,
    pub qsofa_sbp: ChartValue,
    pub qsofa_rr: ChartValue,

    // CURB-65 sub-scores (0-1 each)
    pub curb65_confusion: ChartValue,
    pub curb65_urea: ChartValue,
    pub curb65_rr: ChartValue,
    pub curb65_bp: ChartValue,
    pub curb65_age: ChartValue,

    // MEWS sub-scores
    pub mews_sbp: ChartValue,
    pub mews_hr: ChartValue,
    pub mews_rr: ChartValue,
    pub mews_temp: ChartValue,
    pub mews_avpu: ChartValue,

    // NUTRIC sub-scores
    pub nutric_age: ChartValue,
    pub nutric_apache: ChartValue,
    pub nutric_sofa: ChartValue,
    pub nutric_comorbid: ChartValue,
    pub nutric_hospital: ChartValue,

    // Charlson comorbidity items
    pub charlson_mi: ChartValue,
    pub charlson_chf: ChartValue,
    pub charlson_pvd: ChartValue,
    pub charlson_dementia: ChartValue,
    pub charlson_copd: ChartValue,
    pub charlson_connective: ChartValue,
    pub charlson_peptic: ChartValue,
    pub charlson_liver_mild: ChartValue,
    pub charlson_diabetes: ChartValue,
    pub charlson_hemiplegia: ChartValue,
    pub charlson_renal: ChartValue,
    pub charlson_tumor: ChartValue,

    // Sedation / analgesia
    /// Dosing weight, kg.
    pub weight_kg: ChartValue,
    /// Hours since intubation.
    pub intubation_hours: ChartValue,
    /// Predicted remaining ventilation, days.
    pub projected_vent_days: ChartValue,
    /// When sedation was last formally assessed.
    pub last_sedation_check: Option<DateTime<Utc>>,
    /// Current RASS level (-5..=+4).
    pub rass: ChartValue,
    pub target_rass: ChartValue,
    pub target_cpot: ChartValue,
    pub sedation_notes: String,

    // CPOT sub-scores (0-2 each)
    pub cpot_face: ChartValue,
    pub cpot_movement: ChartValue,
    pub cpot_tension: ChartValue,
    pub cpot_ventilator: ChartValue,

    // Infusion triples: prescribed dose, syringe concentration and the
    // last computed pump rate (mL/h). The rate is written back through the
    // census when dose or concentration changes.
    pub fentanyl_dose: ChartValue,
    pub fentanyl_concentration: ChartValue,
    pub fentanyl_infusion: ChartValue,
    pub propofol_dose: ChartValue,
    pub propofol_concentration: ChartValue,
    pub propofol_infusion: ChartValue,
    pub dexmedetomidine_dose: ChartValue,
    pub dexmedetomidine_concentration: ChartValue,
    pub dexmedetomidine_infusion: ChartValue,
    pub midazolam_dose: ChartValue,
    pub midazolam_concentration: ChartValue,
    pub midazolam_infusion: ChartValue,
}

impl PatientRecord {
    /// The chart created when a new patient is admitted.
    ///
    /// Narratives are empty, severity sub-scores are at their clinically
    /// neutral values (GCS defaults to a full 4/5/6), and sedation fields
    /// carry the usual starting targets: weight 70 kg, target RASS -1,
    /// target CPOT <= 2, standard syringe concentrations.
    pub fn blank() -> Self {
        PatientRecord {
            bed: "New bed".to_owned(),
            name: String::new(),
            age: ChartValue::empty(),
            gender: Gender::Male,
            admission_date: Utc::now().date_naive().to_string(),
            icu_day: ChartValue::from(1),
            main_diagnosis: String::new(),

            history: String::new(),
            problems: String::new(),
            neuro: String::new(),
            cardio: String::new(),
            resp: String::new(),
            renal: String::new(),
            plan: String::new(),
            comorbidities: String::new(),

            vent_mode: String::new(),
            tidal_volume: ChartValue::empty(),
            resp_rate: ChartValue::empty(),
            peep: ChartValue::empty(),
            peak_pressure: ChartValue::empty(),
            plateau_pressure: ChartValue::empty(),
            fio2: ChartValue::empty(),

            pao2: ChartValue::empty(),
            pf_fio2: ChartValue::empty(),
            mean_airway_pressure: ChartValue::empty(),
            airway_flow: ChartValue::empty(),

            ibw_height_cm: ChartValue::empty(),
            ibw_sex: IbwSex::M,

            intake_log: String::new(),
            output_log: String::new(),
            cumulative_balance: String::new(),

            sofa_resp: ChartValue::from(0),
            sofa_coag: ChartValue::from(0),
            sofa_liver: ChartValue::from(0),
            sofa_cardio: ChartValue::from(0),
            sofa_gcs: ChartValue::from(0),
            sofa_renal: ChartValue::from(0),

            gcs_eyes: ChartValue::from(4),
            gcs_verbal: ChartValue::from(5),
            gcs_motor: ChartValue::from(6),

            qsofa_mental: ChartValue::from(0),
            qsofa_sbp: ChartValue::from(0),
            qsofa_rr: ChartValue::from(0),

            curb65_confusion: ChartValue::from(0),
            curb65_urea: ChartValue::from(0),
            curb65_rr: ChartValue::from(0),
            curb65_bp: ChartValue::from(0),
            curb65_age: ChartValue::from(0),

            mews_sbp: ChartValue::from(0),
            mews_hr: ChartValue::from(0),
            mews_rr: ChartValue::from(0),
            mews_temp: ChartValue::from(0),
            mews_avpu: ChartValue::from(0),

            nutric_age: ChartValue::from(0),
            nutric_apache: ChartValue::from(0),
            nutric_sofa: ChartValue::from(0),
            nutric_comorbid: ChartValue::from(0),
            nutric_hospital: ChartValue::from(0),

            charlson_mi: ChartValue::from(0),
            charlson_chf: ChartValue::from(0),
            charlson_pvd: ChartValue::from(0),
            charlson_dementia: ChartValue::from(0),
            charlson_copd: ChartValue::from(0),
            charlson_connective: ChartValue::from(0),
            charlson_peptic: ChartValue::from(0),
            charlson_liver_mild: ChartValue::from(0),
            charlson_diabetes: ChartValue::from(0),
            charlson_hemiplegia: ChartValue::from(0),
            charlson_renal: ChartValue::from(0),
            charlson_tumor: ChartValue::from(0),

            weight_kg: ChartValue::from(70),
            intubation_hours: ChartValue::from(0),
            projected_vent_days: ChartValue::from(3),
            last_sedation_check: None,
            rass: ChartValue::from(0),
            target_rass: ChartValue::from(-1),
            target_cpot: ChartValue::from(2),
            sedation_notes: String::new(),

            cpot_face: ChartValue::from(0),
            cpot_movement: ChartValue::from(0),
            cpot_tension: ChartValue::from(0),
            cpot_ventilator: ChartValue::from(0),

            fentanyl_dose: ChartValue::from(0),
            fentanyl_concentration: ChartValue::from(50),
            fentanyl_infusion: ChartValue::from(0),
            propofol_dose: ChartValue::from(0),
            propofol_concentration: ChartValue::from(10),
            propofol_infusion: ChartValue::from(0),
            dexmedetomidine_dose: ChartValue::from(0),
            dexmedetomidine_concentration: ChartValue::from(4),
            dexmedetomidine_infusion: ChartValue::from(0),
            midazolam_dose: ChartValue::from(0),
            midazolam_concentration: ChartValue::from(1),
            midazolam_infusion: ChartValue::from(0),
        }
    }

    // Fixed, ordered sub-item families. Each family's field list lives here
    // and nowhere else; the engine sums whatever these return.

    /// SOFA organ-dysfunction sub-items.
    pub fn sofa_items(&self) -> [&ChartValue; 6] {
        [
            &self.sofa_resp,
            &self.sofa_coag,
            &self.sofa_liver,
            &self.sofa_cardio,
            &self.sofa_gcs,
            &self.sofa_renal,
        ]
    }

    /// Glasgow Coma Scale sub-items (eye / verbal / motor).
    pub fn gcs_items(&self) -> [&ChartValue; 3] {
        [&self.gcs_eyes, &self.gcs_verbal, &self.gcs_motor]
    }

    /// qSOFA sub-items.
    pub fn qsofa_items(&self) -> [&ChartValue; 3] {
        [&self.qsofa_mental, &self.qsofa_sbp, &self.qsofa_rr]
    }

    /// CURB-65 sub-items.
    pub fn curb65_items(&self) -> [&ChartValue; 5] {
        [
            &self.curb65_confusion,
            &self.curb65_urea,
            &self.curb65_rr,
            &self.curb65_bp,
            &self.curb65_age,
        ]
    }

    /// Modified Early Warning Score sub-items.
    pub fn mews_items(&self) -> [&ChartValue; 5] {
        [
            &self.mews_sbp,
            &self.mews_hr,
            &self.mews_rr,
            &self.mews_temp,
            &self.mews_avpu,
        ]
    }

    /// NUTRIC nutrition-risk sub-items.
    pub fn nutric_items(&self) -> [&ChartValue; 5] {
        [
            &self.nutric_age,
            &self.nutric_apache,
            &self.nutric_sofa,
            &self.nutric_comorbid,
            &self.nutric_hospital,
        ]
    }

    /// Charlson comorbidity items.
    pub fn charlson_items(&self) -> [&ChartValue; 12] {
        [
            &self.charlson_mi,
            &self.charlson_chf,
            &self.charlson_pvd,
            &self.charlson_dementia,
            &self.charlson_copd,
            &self.charlson_connective,
            &self.charlson_peptic,
            &self.charlson_liver_mild,
            &self.charlson_diabetes,
            &self.charlson_hemiplegia,
            &self.charlson_renal,
            &self.charlson_tumor,
        ]
    }

    /// CPOT pain-assessment sub-items.
    pub fn cpot_items(&self) -> [&ChartValue; 4] {
        [
            &self.cpot_face,
            &self.cpot_movement,
            &self.cpot_tension,
            &self.cpot_ventilator,
        ]
    }
}

impl Default for PatientRecord {
    fn default() -> Self {
        PatientRecord::blank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_record_has_neutral_defaults() {
        let record = PatientRecord::blank();
        assert_eq!(record.gcs_eyes.as_int(), 4);
        assert_eq!(record.gcs_verbal.as_int(), 5);
        assert_eq!(record.gcs_motor.as_int(), 6);
        assert_eq!(record.icu_day.as_int(), 1);
        assert_eq!(record.weight_kg.as_f64(), 70.0);
        assert_eq!(record.target_rass.as_int(), -1);
        assert_eq!(record.fentanyl_concentration.as_f64(), 50.0);
        assert!(record.sofa_items().iter().all(|item| item.as_int() == 0));
        assert!(record.history.is_empty());
        assert!(record.last_sedation_check.is_none());
    }

    #[test]
    fn partial_json_falls_back_to_blank_defaults() {
        let record: PatientRecord =
            serde_json::from_str(r#"{"bed": "Bed 03", "sofa_resp": "3"}"#).expect("parse partial");
        assert_eq!(record.bed, "Bed 03");
        assert_eq!(record.sofa_resp.as_int(), 3);
        // Untouched fields keep the blank-record values.
        assert_eq!(record.gcs_motor.as_int(), 6);
        assert_eq!(record.propofol_concentration.as_f64(), 10.0);
    }

    #[test]
    fn round_trips_number_and_text_fields() {
        let mut record = PatientRecord::blank();
        record.tidal_volume = ChartValue::from("380");
        record.peep = ChartValue::from(12);

        let json = serde_json::to_string(&record).expect("render record");
        let reparsed: PatientRecord = serde_json::from_str(&json).expect("reparse record");
        assert_eq!(record, reparsed);
        assert_eq!(reparsed.tidal_volume, ChartValue::Text("380".to_owned()));
        assert_eq!(reparsed.peep, ChartValue::Num(12.0));
    }
}
