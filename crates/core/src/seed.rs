//! Example census used when nothing has been saved yet.
//!
//! Two fully charted patients so every panel has something to show on
//! first launch: a septic-shock admission on deep sedation and a post-CABG
//! patient weaning from the ventilator.

use chrono::{DateTime, Utc};
use rounds_types::{ChartValue, Gender, IbwSex};

use crate::census::PatientCensus;
use crate::record::PatientRecord;

fn timestamp(rfc3339: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(rfc3339)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn bed_08() -> PatientRecord {
    let mut record = PatientRecord::blank();
    record.bed = "Bed 08".to_owned();
    record.name = "João Silva Santos".to_owned();
    record.age = ChartValue::from(65);
    record.gender = Gender::Male;
    record.admission_date = "2025-09-10".to_owned();
    record.icu_day = ChartValue::from(3);
    record.main_diagnosis = "Septic shock of pulmonary origin".to_owned();

    record.history = "Admitted with severe community-acquired pneumonia progressing to \
respiratory failure and septic shock, requiring intubation and vasopressor support."
        .to_owned();
    record.problems = "1. Septic shock of pulmonary origin\n2. Moderate ARDS (P/F 140)\n\
3. Acute kidney injury KDIGO 2\n4. Compensated metabolic acidosis"
        .to_owned();
    record.neuro = "RASS -4 (propofol 50 mL/h + fentanyl 5 mL/h). Glasgow 3T. \
Pupils equal and reactive."
        .to_owned();
    record.cardio = "Noradrenaline 0.5 mcg/kg/min to keep MAP > 65 mmHg. \
Urine output 0.8 mL/kg/h."
        .to_owned();
    record.resp =
        "Moderate ARDS with P/F 140. Prone 16 h/day. Protective ventilation.".to_owned();
    record.renal = "AKI KDIGO 2 (creatinine 2.1 mg/dL). Gases: pH 7.28, PaCO2 42, \
HCO3 18, lactate 3.8."
        .to_owned();
    record.plan = "## THERAPEUTIC PLAN\n\n### RESPIRATORY\n\
- Keep protective ventilation (TV <= 6 mL/kg)\n- Prone position 16 h/day\n- Target P/F > 150\n\n\
### CARDIOVASCULAR\n- Progressive vasopressor weaning\n- Target MAP 65-70 mmHg\n\n\
### INFECTION\n- Piperacillin-tazobactam day 3 of 7\n- Review antibiotics against cultures\n\n\
## PENDING\n- [ ] Repeat blood cultures\n- [ ] Control blood gas at 14:00\n\
- [ ] Discuss tracheostomy"
        .to_owned();

    record.vent_mode = "PCV".to_owned();
    record.tidal_volume = ChartValue::from("380");
    record.resp_rate = ChartValue::from(20);
    record.peep = ChartValue::from("12");
    record.peak_pressure = ChartValue::from(30);
    record.plateau_pressure = ChartValue::from("27");
    record.fio2 = ChartValue::from(60);

    record.pao2 = ChartValue::from(84);
    record.pf_fio2 = ChartValue::from(60);
    record.airway_flow = ChartValue::from(60);
    record.mean_airway_pressure = ChartValue::from(18);
    record.ibw_height_cm = ChartValue::from(175);
    record.ibw_sex = IbwSex::M;

    record.intake_log = "0.9% saline 1500ml\nEnteral feed 1000ml\nMedications 200ml\n\
Blood products 0ml"
        .to_owned();
    record.output_log = "Urine 1200ml\nInsensible losses 800ml".to_owned();
    record.cumulative_balance = "+2800 ml".to_owned();

    record.sofa_resp = ChartValue::from(3);
    record.sofa_coag = ChartValue::from(2);
    record.sofa_liver = ChartValue::from(0);
    record.sofa_cardio = ChartValue::from(4);
    record.sofa_gcs = ChartValue::from(4);
    record.sofa_renal = ChartValue::from(2);

    record.gcs_eyes = ChartValue::from(1);
    record.gcs_verbal = ChartValue::from(1);
    record.gcs_motor = ChartValue::from(1);

    record.weight_kg = ChartValue::from(75);
    record.intubation_hours = ChartValue::from(72);
    record.projected_vent_days = ChartValue::from(7);
    record.last_sedation_check = timestamp("2025-09-15T14:30:00Z");
    record.rass = ChartValue::from(-2);
    record.target_rass = ChartValue::from(-1);
    record.target_cpot = ChartValue::from(2);

    record.cpot_face = ChartValue::from(1);
    record.cpot_movement = ChartValue::from(0);
    record.cpot_tension = ChartValue::from(1);
    record.cpot_ventilator = ChartValue::from(1);

    record.fentanyl_dose = ChartValue::from(2.5);
    record.fentanyl_concentration = ChartValue::from(50);
    record.fentanyl_infusion = ChartValue::from(3.75);
    record.propofol_dose = ChartValue::from(2.0);
    record.propofol_concentration = ChartValue::from(10);
    record.propofol_infusion = ChartValue::from(15.0);
    record.dexmedetomidine_dose = ChartValue::from(0);
    record.dexmedetomidine_concentration = ChartValue::from(0);
    record.dexmedetomidine_infusion = ChartValue::from(0);
    record.midazolam_dose = ChartValue::from(0);
    record.midazolam_concentration = ChartValue::from(0);
    record.midazolam_infusion = ChartValue::from(0);

    record.sedation_notes = "Moderate sedation on propofol + fentanyl. CPOT 3 suggests \
residual pain; optimise analgesia before deepening sedation. Next assessment in 2 h."
        .to_owned();

    record
}

fn bed_12() -> PatientRecord {
    let mut record = PatientRecord::blank();
    record.bed = "Bed 12".to_owned();
    record.name = "Maria Aparecida Costa".to_owned();
    record.age = ChartValue::from(78);
    record.gender = Gender::Female;
    record.admission_date = "2025-09-08".to_owned();
    record.icu_day = ChartValue::from(5);
    record.main_diagnosis = "Postoperative coronary artery bypass grafting".to_owned();

    record.history = "Urgent coronary artery bypass grafting for STEMI. Postoperative \
course complicated by low cardiac output requiring inotropic support."
        .to_owned();
    record.problems = "1. Cardiogenic shock after CABG\n2. Atrial fibrillation with rapid \
response\n3. Acute kidney injury KDIGO 1\n4. Ventilator weaning in progress"
        .to_owned();
    record.neuro = "RASS 0. Waking progressively. Oriented to time and place.".to_owned();
    record.cardio = "Dobutamine 5 mcg/kg/min + noradrenaline 0.2 mcg/kg/min. \
AF rate-controlled on amiodarone."
        .to_owned();
    record.resp = "Weaning (PSV 10 cmH2O). Stable blood gases.".to_owned();
    record.renal =
        "AKI KDIGO 1 (creatinine 1.5 mg/dL). Negative fluid balance planned.".to_owned();
    record.plan = "## THERAPEUTIC PLAN\n\n### RESPIRATORY\n- Progress ventilator weaning\n\
- Spontaneous breathing trial if tolerated\n\n### CARDIOVASCULAR\n- Keep current inotropes\n\
- AF rate control\n\n### RENAL\n- Keep negative fluid balance\n- Monitor renal function\n\n\
## PENDING\n- [ ] Control echocardiogram\n- [ ] Assess for extubation"
        .to_owned();

    record.vent_mode = "PSV".to_owned();
    record.tidal_volume = ChartValue::from("450");
    record.resp_rate = ChartValue::from(14);
    record.peep = ChartValue::from("8");
    record.peak_pressure = ChartValue::from(18);
    record.plateau_pressure = ChartValue::from("16");
    record.fio2 = ChartValue::from(30);

    record.pao2 = ChartValue::from(120);
    record.pf_fio2 = ChartValue::from(30);
    record.airway_flow = ChartValue::from(40);
    record.mean_airway_pressure = ChartValue::from(10);
    record.ibw_height_cm = ChartValue::from(162);
    record.ibw_sex = IbwSex::F;

    record.intake_log = "Enteral feed 1200ml\nMedications 400ml\nSaline 500ml".to_owned();
    record.output_log = "Urine 2500ml\nChest drain 150ml".to_owned();
    record.cumulative_balance = "-1400 ml".to_owned();

    record.sofa_resp = ChartValue::from(1);
    record.sofa_coag = ChartValue::from(1);
    record.sofa_liver = ChartValue::from(0);
    record.sofa_cardio = ChartValue::from(3);
    record.sofa_gcs = ChartValue::from(1);
    record.sofa_renal = ChartValue::from(1);

    record.gcs_eyes = ChartValue::from(4);
    record.gcs_verbal = ChartValue::from(4);
    record.gcs_motor = ChartValue::from(6);

    record.weight_kg = ChartValue::from(62);
    record.intubation_hours = ChartValue::from(120);
    record.projected_vent_days = ChartValue::from(2);
    record.last_sedation_check = timestamp("2025-09-15T16:00:00Z");
    record.rass = ChartValue::from(0);
    record.target_rass = ChartValue::from(0);
    record.target_cpot = ChartValue::from(2);

    record.cpot_face = ChartValue::from(0);
    record.cpot_movement = ChartValue::from(0);
    record.cpot_tension = ChartValue::from(0);
    record.cpot_ventilator = ChartValue::from(0);

    record.fentanyl_dose = ChartValue::from(1.0);
    record.fentanyl_concentration = ChartValue::from(50);
    record.fentanyl_infusion = ChartValue::from(1.24);
    record.propofol_dose = ChartValue::from(0);
    record.propofol_concentration = ChartValue::from(0);
    record.propofol_infusion = ChartValue::from(0);
    record.dexmedetomidine_dose = ChartValue::from(0.6);
    record.dexmedetomidine_concentration = ChartValue::from(4);
    record.dexmedetomidine_infusion = ChartValue::from(9.3);
    record.midazolam_dose = ChartValue::from(0);
    record.midazolam_concentration = ChartValue::from(0);
    record.midazolam_infusion = ChartValue::from(0);

    record.sedation_notes = "Weaning sedation; transitioned from propofol to \
dexmedetomidine. RASS 0 appropriate for weaning, CPOT 0 indicates effective analgesia. \
Next assessment in 4 h."
        .to_owned();

    record
}

/// The example census: two charted patients, first one active.
pub fn example_census() -> PatientCensus {
    PatientCensus::from_entries(vec![
        ("bed-08".to_owned(), bed_08()),
        ("bed-12".to_owned(), bed_12()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sedation;
    use crate::ventilation::{self, ArdsSeverity};
    use crate::{fluids, scores};

    #[test]
    fn seeds_two_patients_with_the_first_active() {
        let census = example_census();
        assert_eq!(census.len(), 2);
        assert_eq!(census.active_id(), Some("bed-08"));
    }

    #[test]
    fn septic_patient_derives_expected_values() {
        let census = example_census();
        let record = census.get("bed-08").expect("seed patient");

        assert_eq!(scores::sofa_total(record), 15);
        assert_eq!(scores::gcs_total(record), 3);

        let summary = ventilation::VentilationSummary::from_record(record);
        assert!((summary.pf_ratio - 140.0).abs() < 1e-6);
        assert_eq!(summary.ards, Some(ArdsSeverity::Moderate));
        assert_eq!(summary.driving_pressure, 15.0);

        let balance = fluids::daily_balance(record);
        assert!((balance.net_ml - 700.9).abs() < 1e-6);
    }

    #[test]
    fn seeded_infusion_rates_match_the_formula() {
        let census = example_census();
        for id in ["bed-08", "bed-12"] {
            let mut record = census.get(id).expect("seed patient").clone();
            let before: Vec<f64> = sedation::DRUGS
                .iter()
                .map(|&drug| sedation::drug_state(&record, drug).infusion_ml_h)
                .collect();
            sedation::recompute_infusions(&mut record);
            let after: Vec<f64> = sedation::DRUGS
                .iter()
                .map(|&drug| sedation::drug_state(&record, drug).infusion_ml_h)
                .collect();
            assert_eq!(before, after, "stale infusion rate in seed {id}");
        }
    }
}
