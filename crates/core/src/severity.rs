//! Multi-variable severity instruments: APACHE II, SAPS III, P-POSSUM and
//! CAM-ICU.
//!
//! Each score is a deterministic sum of banded point contributions. Band
//! ranges overlap when written naively, so every chain below checks the
//! most extreme band first; the first matching band wins. Do not reorder.
//!
//! The mortality figures are display-only estimates from the published
//! per-instrument transforms; nothing else in the engine reads them.

/// Physiological inputs for the APACHE II score.
///
/// Defaults are the neutral values a fresh calculator starts from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApacheInputs {
    pub age_years: f64,
    pub temperature_c: f64,
    pub mean_arterial_pressure: f64,
    pub heart_rate: f64,
    pub respiratory_rate: f64,
    pub fio2_pct: f64,
    pub pao2: f64,
    pub arterial_ph: f64,
    pub serum_sodium: f64,
    pub serum_potassium: f64,
    pub serum_creatinine: f64,
    pub hematocrit: f64,
    pub white_cell_count: f64,
    pub glasgow_score: i64,
    pub chronic_health_points: i64,
}

impl Default for ApacheInputs {
    fn default() -> Self {
        ApacheInputs {
            age_years: 0.0,
            temperature_c: 37.0,
            mean_arterial_pressure: 90.0,
            heart_rate: 80.0,
            respiratory_rate: 16.0,
            fio2_pct: 21.0,
            pao2: 90.0,
            arterial_ph: 7.40,
            serum_sodium: 140.0,
            serum_potassium: 4.0,
            serum_creatinine: 1.0,
            hematocrit: 40.0,
            white_cell_count: 10.0,
            glasgow_score: 15,
            chronic_health_points: 0,
        }
    }
}

/// APACHE II total score.
pub fn apache_ii_score(inputs: &ApacheInputs) -> i64 {
    let mut score: i64 = 0;

    let age = inputs.age_years;
    if age >= 75.0 {
        score += 6;
    } else if age >= 65.0 {
        score += 5;
    } else if age >= 55.0 {
        score += 3;
    } else if age >= 45.0 {
        score += 2;
    }

    let temp = inputs.temperature_c;
    if temp >= 41.0 || temp < 30.0 {
        score += 4;
    } else if temp >= 39.0 || temp <= 31.9 {
        score += 3;
    } else if temp <= 33.9 {
        score += 2;
    } else if (38.5..=38.9).contains(&temp) || (34.0..=35.9).contains(&temp) {
        score += 1;
    }

    let map = inputs.mean_arterial_pressure;
    if map >= 160.0 {
        score += 4;
    } else if map >= 130.0 {
        score += 3;
    } else if map >= 110.0 {
        score += 2;
    } else if map <= 49.0 {
        score += 4;
    } else if map <= 69.0 {
        score += 2;
    }

    let hr = inputs.heart_rate;
    if hr >= 180.0 {
        score += 4;
    } else if hr >= 140.0 {
        score += 3;
    } else if hr >= 110.0 {
        score += 2;
    } else if hr <= 39.0 {
        score += 4;
    } else if hr <= 54.0 {
        score += 3;
    } else if hr <= 69.0 {
        score += 2;
    }

    let rr = inputs.respiratory_rate;
    if rr >= 50.0 {
        score += 4;
    } else if rr >= 35.0 {
        score += 3;
    } else if rr >= 25.0 {
        score += 1;
    } else if rr <= 5.0 {
        score += 4;
    } else if rr <= 9.0 {
        score += 2;
    } else if rr <= 11.0 {
        score += 1;
    }

    // Oxygenation: on high FiO2 the A-a gradient is graded, otherwise PaO2.
    if inputs.fio2_pct >= 50.0 {
        let aa_gradient =
            (inputs.fio2_pct * 713.0 / 100.0) - inputs.pao2 - (inputs.arterial_ph * 1.25);
        if aa_gradient >= 500.0 {
            score += 4;
        } else if aa_gradient >= 350.0 {
            score += 3;
        } else if aa_gradient >= 200.0 {
            score += 2;
        }
    } else {
        let pao2 = inputs.pao2;
        if pao2 <= 55.0 {
            score += 4;
        } else if pao2 <= 60.0 {
            score += 3;
        } else if pao2 <= 70.0 {
            score += 1;
        }
    }

    let ph = inputs.arterial_ph;
    if ph >= 7.7 || ph < 7.15 {
        score += 4;
    } else if ph >= 7.6 || ph <= 7.24 {
        score += 3;
    } else if ph <= 7.32 {
        score += 2;
    } else if ph >= 7.5 {
        score += 1;
    }

    let na = inputs.serum_sodium;
    if na >= 180.0 || na <= 110.0 {
        score += 4;
    } else if na >= 160.0 || na <= 119.0 {
        score += 3;
    } else if na >= 155.0 || na <= 120.0 {
        score += 2;
    } else if na >= 150.0 {
        score += 1;
    }

    let k = inputs.serum_potassium;
    if k >= 7.0 || k < 2.5 {
        score += 4;
    } else if k >= 6.0 {
        score += 3;
    } else if k <= 2.9 {
        score += 2;
    } else if k >= 5.5 || (3.0..=3.4).contains(&k) {
        score += 1;
    }

    let cr = inputs.serum_creatinine;
    if cr >= 3.5 {
        score += 4;
    } else if cr >= 2.0 {
        score += 3;
    } else if cr >= 1.5 {
        score += 2;
    } else if cr <= 0.6 {
        score += 2;
    }

    let hct = inputs.hematocrit;
    if hct >= 60.0 || hct < 20.0 {
        score += 4;
    } else if hct >= 50.0 || hct <= 29.9 {
        score += 2;
    } else if hct >= 46.0 {
        score += 1;
    }

    let wbc = inputs.white_cell_count;
    if wbc >= 40.0 || wbc < 1.0 {
        score += 4;
    } else if wbc >= 20.0 || wbc <= 2.9 {
        score += 2;
    } else if wbc >= 15.0 {
        score += 1;
    }

    score += 15 - inputs.glasgow_score;
    score += inputs.chronic_health_points;

    score
}

/// Estimated hospital mortality for an APACHE II score, percent.
pub fn apache_ii_mortality_pct(score: i64) -> i64 {
    if score <= 4 {
        4
    } else if score <= 9 {
        8
    } else if score <= 14 {
        15
    } else if score <= 19 {
        25
    } else if score <= 24 {
        40
    } else if score <= 29 {
        55
    } else if score <= 34 {
        73
    } else {
        85
    }
}

/// Inputs for the SAPS III admission score.
///
/// The comorbidity, location and admission fields carry their instrument
/// point values directly (they are selected from closed option lists).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Saps3Inputs {
    pub age_years: f64,
    pub comorbidity_points: i64,
    pub days_in_hospital_before_icu: f64,
    pub location_points: i64,
    pub admission_category_points: i64,
    pub admission_reason_points: i64,
    pub temperature_c: f64,
    pub systolic_bp: f64,
    pub heart_rate: f64,
    pub glasgow_score: i64,
    pub bilirubin: f64,
    pub creatinine: f64,
    pub platelets: f64,
    pub white_cell_count: f64,
    pub ph: f64,
    pub pf_ratio: f64,
    pub mechanical_ventilation: bool,
}

impl Default for Saps3Inputs {
    fn default() -> Self {
        Saps3Inputs {
            age_years: 0.0,
            comorbidity_points: 0,
            days_in_hospital_before_icu: 0.0,
            location_points: 0,
            admission_category_points: 0,
            admission_reason_points: 0,
            temperature_c: 37.0,
            systolic_bp: 120.0,
            heart_rate: 80.0,
            glasgow_score: 15,
            bilirubin: 1.0,
            creatinine: 1.0,
            platelets: 200.0,
            white_cell_count: 10.0,
            ph: 7.40,
            pf_ratio: 400.0,
            mechanical_ventilation: false,
        }
    }
}

/// SAPS III total score (starts from the instrument's base of 16).
pub fn saps3_score(inputs: &Saps3Inputs) -> i64 {
    let mut score: i64 = 16;

    let age = inputs.age_years;
    if age < 40.0 {
        // no points
    } else if age < 60.0 {
        score += 5;
    } else if age < 70.0 {
        score += 9;
    } else if age < 75.0 {
        score += 13;
    } else if age < 80.0 {
        score += 15;
    } else {
        score += 18;
    }

    score += inputs.comorbidity_points;

    let los = inputs.days_in_hospital_before_icu;
    if los >= 28.0 {
        score += 7;
    } else if los >= 14.0 {
        score += 6;
    }

    score += inputs.location_points;
    score += inputs.admission_category_points + inputs.admission_reason_points;

    let temp = inputs.temperature_c;
    if temp < 35.0 || temp >= 40.0 {
        score += 7;
    }

    let sbp = inputs.systolic_bp;
    if sbp < 40.0 {
        score += 11;
    } else if sbp < 70.0 {
        score += 8;
    } else if sbp < 120.0 {
        score += 3;
    } else if sbp >= 160.0 {
        score += 3;
    }

    let hr = inputs.heart_rate;
    if hr >= 160.0 {
        score += 7;
    } else if hr >= 120.0 {
        score += 5;
    }

    let gcs = inputs.glasgow_score;
    if gcs < 3 {
        score += 26;
    } else if gcs < 7 {
        score += 13;
    } else if gcs < 9 {
        score += 7;
    } else if gcs < 11 {
        score += 5;
    } else if gcs < 14 {
        score += 2;
    }

    let bili = inputs.bilirubin;
    if bili >= 6.0 {
        score += 5;
    } else if bili >= 2.0 {
        score += 4;
    }

    let cr = inputs.creatinine;
    if cr >= 3.5 {
        score += 8;
    } else if cr >= 2.0 {
        score += 7;
    } else if cr >= 1.2 {
        score += 2;
    }

    let plt = inputs.platelets;
    if plt < 20.0 {
        score += 13;
    } else if plt < 50.0 {
        score += 8;
    } else if plt < 100.0 {
        score += 5;
    }

    if inputs.white_cell_count >= 15.0 {
        score += 2;
    }

    if inputs.ph < 7.25 {
        score += 3;
    }

    let pf = inputs.pf_ratio;
    if pf < 100.0 {
        score += 11;
    } else if pf < 200.0 {
        score += 9;
    } else if pf < 300.0 {
        score += 6;
    }

    if inputs.mechanical_ventilation {
        score += 5;
    }

    score
}

/// SAPS III estimated mortality, percent, from the published logistic
/// transform.
pub fn saps3_mortality_pct(score: i64) -> f64 {
    let logit = -32.6659 + (score as f64 + 20.5958).ln() * 7.3068;
    let probability = logit.exp() / (1.0 + logit.exp());
    probability * 100.0
}

/// Physiological inputs for the P-POSSUM score.
///
/// `cardiac_points`, `respiratory_points` and `ecg_points` carry their
/// 1/2/4/8 instrument values directly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PossumPhysiology {
    pub age_years: f64,
    pub cardiac_points: i64,
    pub respiratory_points: i64,
    pub systolic_bp: f64,
    pub pulse_rate: f64,
    pub glasgow_score: i64,
    pub hemoglobin: f64,
    pub white_cell_count: f64,
    pub urea: f64,
    pub sodium: f64,
    pub potassium: f64,
    pub ecg_points: i64,
}

impl Default for PossumPhysiology {
    fn default() -> Self {
        PossumPhysiology {
            age_years: 0.0,
            cardiac_points: 0,
            respiratory_points: 0,
            systolic_bp: 120.0,
            pulse_rate: 80.0,
            glasgow_score: 15,
            hemoglobin: 13.0,
            white_cell_count: 10.0,
            urea: 7.0,
            sodium: 140.0,
            potassium: 4.0,
            ecg_points: 0,
        }
    }
}

/// Operative inputs for the P-POSSUM score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PossumOperative {
    pub severity_points: i64,
    pub multiple_procedure_points: i64,
    pub blood_loss_ml: f64,
    pub peritoneal_soiling_points: i64,
    pub malignancy_points: i64,
    pub timing_points: i64,
}

impl Default for PossumOperative {
    fn default() -> Self {
        PossumOperative {
            severity_points: 1,
            multiple_procedure_points: 1,
            blood_loss_ml: 100.0,
            peritoneal_soiling_points: 0,
            malignancy_points: 0,
            timing_points: 1,
        }
    }
}

/// P-POSSUM physiological score.
pub fn possum_physiological_score(inputs: &PossumPhysiology) -> i64 {
    let mut score: i64 = 0;

    let age = inputs.age_years;
    if age <= 60.0 {
        score += 1;
    } else if age <= 70.0 {
        score += 2;
    } else {
        score += 4;
    }

    score += inputs.cardiac_points;
    score += inputs.respiratory_points;

    let sbp = inputs.systolic_bp;
    if (110.0..=130.0).contains(&sbp) {
        score += 1;
    } else if (100.0..110.0).contains(&sbp) || (sbp > 130.0 && sbp <= 170.0) {
        score += 2;
    } else if (90.0..100.0).contains(&sbp) {
        score += 4;
    } else if sbp < 90.0 || sbp > 170.0 {
        score += 8;
    }

    let pulse = inputs.pulse_rate;
    if (50.0..=80.0).contains(&pulse) {
        score += 1;
    } else if (40.0..50.0).contains(&pulse) || (pulse > 80.0 && pulse <= 100.0) {
        score += 2;
    } else if pulse > 100.0 && pulse <= 120.0 {
        score += 4;
    } else if pulse < 40.0 || pulse > 120.0 {
        score += 8;
    }

    let gcs = inputs.glasgow_score;
    if gcs == 15 {
        score += 1;
    } else if (12..=14).contains(&gcs) {
        score += 2;
    } else if (9..=11).contains(&gcs) {
        score += 4;
    } else if gcs < 9 {
        score += 8;
    }

    let hb = inputs.hemoglobin;
    if (13.0..=16.0).contains(&hb) {
        score += 1;
    } else if (11.5..13.0).contains(&hb) || (hb > 16.0 && hb <= 17.0) {
        score += 2;
    } else if (10.0..11.5).contains(&hb) || (hb > 17.0 && hb <= 18.0) {
        score += 4;
    } else if hb < 10.0 || hb > 18.0 {
        score += 8;
    }

    let wbc = inputs.white_cell_count;
    if (4.0..=10.0).contains(&wbc) {
        score += 1;
    } else if (wbc > 10.0 && wbc <= 20.0) || (3.1..4.0).contains(&wbc) {
        score += 2;
    } else if wbc > 20.0 || wbc < 3.1 {
        score += 4;
    }

    let urea = inputs.urea;
    if urea <= 7.5 {
        score += 1;
    } else if urea <= 10.0 {
        score += 2;
    } else if urea <= 15.0 {
        score += 4;
    } else {
        score += 8;
    }

    let na = inputs.sodium;
    if na >= 136.0 {
        score += 1;
    } else if (131.0..=135.0).contains(&na) {
        score += 2;
    } else if (126.0..=130.0).contains(&na) {
        score += 4;
    } else {
        score += 8;
    }

    let k = inputs.potassium;
    if (3.5..=5.0).contains(&k) {
        score += 1;
    } else if (3.2..3.5).contains(&k) || (k > 5.0 && k <= 5.3) {
        score += 2;
    } else if (2.9..3.2).contains(&k) || (k > 5.3 && k <= 5.9) {
        score += 4;
    } else {
        score += 8;
    }

    score += inputs.ecg_points;

    score
}

/// P-POSSUM operative score.
pub fn possum_operative_score(inputs: &PossumOperative) -> i64 {
    let blood_loss = if inputs.blood_loss_ml <= 100.0 {
        1
    } else if inputs.blood_loss_ml <= 500.0 {
        2
    } else if inputs.blood_loss_ml <= 999.0 {
        4
    } else {
        8
    };

    inputs.severity_points
        + inputs.multiple_procedure_points
        + blood_loss
        + inputs.peritoneal_soiling_points
        + inputs.malignancy_points
        + inputs.timing_points
}

/// P-POSSUM estimated mortality, percent.
///
/// Returns 0 when either score is non-positive (nothing charted yet); both
/// scores are at least their floor values once real inputs arrive.
pub fn ppossum_mortality_pct(physiological: i64, operative: i64) -> f64 {
    if physiological <= 0 || operative <= 0 {
        return 0.0;
    }
    let logit =
        -9.37 + 0.19 * (physiological as f64).ln() + 0.15 * (operative as f64).ln();
    let risk = 1.0 / (1.0 + (-logit).exp());
    risk * 100.0
}

/// CAM-ICU delirium assessment features.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CamIcuAssessment {
    pub acute_onset: bool,
    pub fluctuating_course: bool,
    pub inattention: bool,
    pub disorganized_thinking: bool,
    pub altered_consciousness: bool,
}

impl CamIcuAssessment {
    /// Delirium is present when feature 1 (acute onset or fluctuating
    /// course) and feature 2 (inattention) hold, together with feature 3
    /// or feature 4.
    pub fn delirium_present(&self) -> bool {
        let feature1 = self.acute_onset || self.fluctuating_course;
        feature1 && self.inattention && (self.disorganized_thinking || self.altered_consciousness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apache_neutral_inputs_score_zero() {
        let score = apache_ii_score(&ApacheInputs {
            age_years: 30.0,
            ..ApacheInputs::default()
        });
        assert_eq!(score, 0);
    }

    #[test]
    fn apache_most_severe_band_wins() {
        // 41 C sits in both the ">= 39" and ">= 41" naive ranges; the
        // extreme band must be the one that scores.
        let extreme = apache_ii_score(&ApacheInputs {
            age_years: 30.0,
            temperature_c: 41.0,
            ..ApacheInputs::default()
        });
        assert_eq!(extreme, 4);

        let high = apache_ii_score(&ApacheInputs {
            age_years: 30.0,
            temperature_c: 39.5,
            ..ApacheInputs::default()
        });
        assert_eq!(high, 3);
    }

    #[test]
    fn apache_gcs_deficit_and_age_points() {
        let score = apache_ii_score(&ApacheInputs {
            age_years: 76.0,
            glasgow_score: 9,
            ..ApacheInputs::default()
        });
        // 6 age points + (15 - 9) Glasgow deficit.
        assert_eq!(score, 12);
    }

    #[test]
    fn apache_uses_aa_gradient_on_high_fio2() {
        let low_fio2 = apache_ii_score(&ApacheInputs {
            age_years: 30.0,
            fio2_pct: 40.0,
            pao2: 55.0,
            ..ApacheInputs::default()
        });
        assert_eq!(low_fio2, 4);

        // FiO2 100%: gradient = 713 - 90 - 9.25 = 613.75 -> 4 points.
        let high_fio2 = apache_ii_score(&ApacheInputs {
            age_years: 30.0,
            fio2_pct: 100.0,
            ..ApacheInputs::default()
        });
        assert_eq!(high_fio2, 4);
    }

    #[test]
    fn apache_mortality_steps() {
        assert_eq!(apache_ii_mortality_pct(0), 4);
        assert_eq!(apache_ii_mortality_pct(5), 8);
        assert_eq!(apache_ii_mortality_pct(12), 15);
        assert_eq!(apache_ii_mortality_pct(19), 25);
        assert_eq!(apache_ii_mortality_pct(24), 40);
        assert_eq!(apache_ii_mortality_pct(29), 55);
        assert_eq!(apache_ii_mortality_pct(34), 73);
        assert_eq!(apache_ii_mortality_pct(40), 85);
    }

    #[test]
    fn saps3_base_score_with_neutral_inputs() {
        assert_eq!(saps3_score(&Saps3Inputs::default()), 16);
    }

    #[test]
    fn saps3_accumulates_banded_points() {
        let score = saps3_score(&Saps3Inputs {
            age_years: 72.0,
            comorbidity_points: 6,
            glasgow_score: 8,
            pf_ratio: 140.0,
            mechanical_ventilation: true,
            ..Saps3Inputs::default()
        });
        // 16 base + 13 age + 6 comorbidity + 7 GCS + 9 P/F + 5 ventilation.
        assert_eq!(score, 56);
    }

    #[test]
    fn saps3_mortality_is_monotonic() {
        let low = saps3_mortality_pct(20);
        let high = saps3_mortality_pct(80);
        assert!(low < high);
        assert!((0.0..=100.0).contains(&low));
        assert!((0.0..=100.0).contains(&high));
    }

    #[test]
    fn possum_floor_scores() {
        let physiology = possum_physiological_score(&PossumPhysiology {
            age_years: 50.0,
            cardiac_points: 1,
            respiratory_points: 1,
            ..PossumPhysiology::default()
        });
        // Every banded parameter at its healthy value contributes 1.
        assert_eq!(physiology, 11);

        let operative = possum_operative_score(&PossumOperative::default());
        assert_eq!(operative, 4);
    }

    #[test]
    fn possum_extreme_bands() {
        let physiology = possum_physiological_score(&PossumPhysiology {
            age_years: 80.0,
            systolic_bp: 80.0,
            pulse_rate: 130.0,
            glasgow_score: 6,
            ..PossumPhysiology::default()
        });
        // 4 age + 8 bp + 8 pulse + 8 gcs + 1 each for hb/wbc/urea/na/k.
        assert_eq!(physiology, 33);
    }

    #[test]
    fn ppossum_mortality_guards_and_grows() {
        assert_eq!(ppossum_mortality_pct(0, 4), 0.0);
        let low = ppossum_mortality_pct(12, 4);
        let high = ppossum_mortality_pct(40, 20);
        assert!(low < high);
        assert!(low > 0.0);
    }

    #[test]
    fn cam_icu_requires_both_core_features() {
        let mut assessment = CamIcuAssessment {
            acute_onset: true,
            inattention: true,
            altered_consciousness: true,
            ..CamIcuAssessment::default()
        };
        assert!(assessment.delirium_present());

        assessment.inattention = false;
        assert!(!assessment.delirium_present());

        assessment.inattention = true;
        assessment.acute_onset = false;
        assert!(!assessment.delirium_present());

        assessment.fluctuating_course = true;
        assessment.altered_consciousness = false;
        assessment.disorganized_thinking = true;
        assert!(assessment.delirium_present());
    }
}
