//! Creatinine-clearance and glomerular-filtration estimates.
//!
//! Three estimators over the same inputs (Cockcroft-Gault, CKD-EPI 2009,
//! MDRD) plus the five-tier CKD stage derived from the CKD-EPI value.
//! As everywhere in the engine, missing input yields 0, not an error.

use rounds_types::IbwSex;

/// Inputs shared by the clearance estimators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenalInputs {
    pub age_years: f64,
    pub weight_kg: f64,
    pub sex: IbwSex,
    /// Serum creatinine, mg/dL.
    pub creatinine: f64,
    /// Applies the 2009 CKD-EPI / MDRD race coefficient.
    pub race_coefficient: bool,
}

impl Default for RenalInputs {
    fn default() -> Self {
        RenalInputs {
            age_years: 65.0,
            weight_kg: 70.0,
            sex: IbwSex::M,
            creatinine: 1.0,
            race_coefficient: false,
        }
    }
}

/// Cockcroft-Gault creatinine clearance, mL/min.
pub fn cockcroft_gault(inputs: &RenalInputs) -> f64 {
    if inputs.creatinine <= 0.0 || inputs.weight_kg <= 0.0 {
        return 0.0;
    }
    let clearance = ((140.0 - inputs.age_years) * inputs.weight_kg) / (72.0 * inputs.creatinine);
    match inputs.sex {
        IbwSex::F => clearance * 0.85,
        IbwSex::M => clearance,
    }
}

/// CKD-EPI (2009) estimated GFR, mL/min/1.73 m^2.
pub fn ckd_epi(inputs: &RenalInputs) -> f64 {
    if inputs.creatinine <= 0.0 || inputs.age_years <= 0.0 {
        return 0.0;
    }
    let (kappa, alpha, sex_factor) = match inputs.sex {
        IbwSex::F => (0.7, -0.329, 1.018),
        IbwSex::M => (0.9, -0.411, 1.0),
    };
    let race_factor = if inputs.race_coefficient { 1.159 } else { 1.0 };

    let ratio = inputs.creatinine / kappa;
    let min_cr = ratio.min(1.0);
    let max_cr = ratio.max(1.0);

    141.0
        * min_cr.powf(alpha)
        * max_cr.powf(-1.209)
        * 0.993_f64.powf(inputs.age_years)
        * sex_factor
        * race_factor
}

/// MDRD estimated GFR, mL/min/1.73 m^2.
pub fn mdrd(inputs: &RenalInputs) -> f64 {
    if inputs.creatinine <= 0.0 || inputs.age_years <= 0.0 {
        return 0.0;
    }
    let sex_factor = match inputs.sex {
        IbwSex::F => 0.742,
        IbwSex::M => 1.0,
    };
    let race_factor = if inputs.race_coefficient { 1.212 } else { 1.0 };

    175.0
        * inputs.creatinine.powf(-1.154)
        * inputs.age_years.powf(-0.203)
        * sex_factor
        * race_factor
}

/// Chronic kidney disease stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CkdStage {
    /// GFR >= 90: normal or increased.
    Stage1,
    /// GFR >= 60: mildly decreased.
    Stage2,
    /// GFR >= 30: moderately decreased.
    Stage3,
    /// GFR >= 15: severely decreased.
    Stage4,
    /// GFR < 15: kidney failure.
    Stage5,
}

/// Stages a GFR value (conventionally the CKD-EPI estimate).
pub fn ckd_stage(gfr: f64) -> CkdStage {
    if gfr >= 90.0 {
        CkdStage::Stage1
    } else if gfr >= 60.0 {
        CkdStage::Stage2
    } else if gfr >= 30.0 {
        CkdStage::Stage3
    } else if gfr >= 15.0 {
        CkdStage::Stage4
    } else {
        CkdStage::Stage5
    }
}

impl std::fmt::Display for CkdStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CkdStage::Stage1 => write!(f, "stage 1 - normal or increased"),
            CkdStage::Stage2 => write!(f, "stage 2 - mildly decreased"),
            CkdStage::Stage3 => write!(f, "stage 3 - moderately decreased"),
            CkdStage::Stage4 => write!(f, "stage 4 - severely decreased"),
            CkdStage::Stage5 => write!(f, "stage 5 - kidney failure"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.1
    }

    #[test]
    fn cockcroft_gault_reference_values() {
        let male = cockcroft_gault(&RenalInputs::default());
        assert!(close(male, (140.0 - 65.0) * 70.0 / 72.0));

        let female = cockcroft_gault(&RenalInputs {
            sex: IbwSex::F,
            ..RenalInputs::default()
        });
        assert!(close(female, male * 0.85));
    }

    #[test]
    fn cockcroft_gault_guards_division() {
        let inputs = RenalInputs {
            creatinine: 0.0,
            ..RenalInputs::default()
        };
        assert_eq!(cockcroft_gault(&inputs), 0.0);
    }

    #[test]
    fn ckd_epi_healthy_male_is_high() {
        let gfr = ckd_epi(&RenalInputs {
            age_years: 40.0,
            creatinine: 0.9,
            ..RenalInputs::default()
        });
        // Creatinine at kappa: 141 * 0.993^40.
        assert!(close(gfr, 141.0 * 0.993_f64.powf(40.0)));
    }

    #[test]
    fn ckd_epi_rises_with_race_coefficient() {
        let base = ckd_epi(&RenalInputs::default());
        let adjusted = ckd_epi(&RenalInputs {
            race_coefficient: true,
            ..RenalInputs::default()
        });
        assert!(close(adjusted, base * 1.159));
    }

    #[test]
    fn mdrd_sex_factor() {
        let male = mdrd(&RenalInputs::default());
        let female = mdrd(&RenalInputs {
            sex: IbwSex::F,
            ..RenalInputs::default()
        });
        assert!(close(female, male * 0.742));
    }

    #[test]
    fn estimators_return_zero_without_creatinine() {
        let inputs = RenalInputs {
            creatinine: 0.0,
            ..RenalInputs::default()
        };
        assert_eq!(ckd_epi(&inputs), 0.0);
        assert_eq!(mdrd(&inputs), 0.0);
    }

    #[test]
    fn ckd_stage_boundaries_are_inclusive_lower_bounds() {
        assert_eq!(ckd_stage(90.0), CkdStage::Stage1);
        assert_eq!(ckd_stage(89.9), CkdStage::Stage2);
        assert_eq!(ckd_stage(60.0), CkdStage::Stage2);
        assert_eq!(ckd_stage(59.9), CkdStage::Stage3);
        assert_eq!(ckd_stage(30.0), CkdStage::Stage3);
        assert_eq!(ckd_stage(15.0), CkdStage::Stage4);
        assert_eq!(ckd_stage(14.9), CkdStage::Stage5);
    }
}
