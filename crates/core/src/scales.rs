//! Closed option lists for the charted sub-scores.
//!
//! Each instrument's sub-items accept codes from a fixed clinical table.
//! The tables here back the edit boundary (offer the options, reject
//! anything outside them) without touching the engine's sum contract —
//! the sums stay total even over codes that never came from these lists.

/// One selectable code for a sub-score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaleOption {
    pub code: i64,
    pub label: &'static str,
}

/// True when `code` is one of the listed options.
pub fn is_valid_code(options: &[ScaleOption], code: i64) -> bool {
    options.iter().any(|option| option.code == code)
}

/// The six SOFA organ systems.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SofaItem {
    Respiration,
    Coagulation,
    Liver,
    Cardiovascular,
    Neurological,
    Renal,
}

impl SofaItem {
    pub fn options(self) -> &'static [ScaleOption] {
        match self {
            SofaItem::Respiration => &[
                ScaleOption { code: 0, label: "P/F >= 400" },
                ScaleOption { code: 1, label: "P/F < 400" },
                ScaleOption { code: 2, label: "P/F < 300" },
                ScaleOption { code: 3, label: "P/F < 200 with support" },
                ScaleOption { code: 4, label: "P/F < 100 with support" },
            ],
            SofaItem::Coagulation => &[
                ScaleOption { code: 0, label: "platelets >= 150k" },
                ScaleOption { code: 1, label: "platelets < 150k" },
                ScaleOption { code: 2, label: "platelets < 100k" },
                ScaleOption { code: 3, label: "platelets < 50k" },
                ScaleOption { code: 4, label: "platelets < 20k" },
            ],
            SofaItem::Liver => &[
                ScaleOption { code: 0, label: "bilirubin < 1.2" },
                ScaleOption { code: 1, label: "bilirubin 1.2-1.9" },
                ScaleOption { code: 2, label: "bilirubin 2.0-5.9" },
                ScaleOption { code: 3, label: "bilirubin 6.0-11.9" },
                ScaleOption { code: 4, label: "bilirubin >= 12.0" },
            ],
            SofaItem::Cardiovascular => &[
                ScaleOption { code: 0, label: "MAP >= 70" },
                ScaleOption { code: 1, label: "MAP < 70" },
                ScaleOption { code: 2, label: "dopamine <= 5 or dobutamine" },
                ScaleOption { code: 3, label: "dopamine > 5 or noradrenaline <= 0.1" },
                ScaleOption { code: 4, label: "dopamine > 15 or noradrenaline > 0.1" },
            ],
            SofaItem::Neurological => &[
                ScaleOption { code: 0, label: "GCS 15" },
                ScaleOption { code: 1, label: "GCS 13-14" },
                ScaleOption { code: 2, label: "GCS 10-12" },
                ScaleOption { code: 3, label: "GCS 6-9" },
                ScaleOption { code: 4, label: "GCS < 6" },
            ],
            SofaItem::Renal => &[
                ScaleOption { code: 0, label: "creatinine < 1.2" },
                ScaleOption { code: 1, label: "creatinine 1.2-1.9" },
                ScaleOption { code: 2, label: "creatinine 2.0-3.4" },
                ScaleOption { code: 3, label: "creatinine 3.5-4.9 or urine < 500 mL" },
                ScaleOption { code: 4, label: "creatinine >= 5.0 or urine < 200 mL" },
            ],
        }
    }
}

/// The three Glasgow Coma Scale components.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GcsItem {
    Eyes,
    Verbal,
    Motor,
}

impl GcsItem {
    pub fn options(self) -> &'static [ScaleOption] {
        match self {
            GcsItem::Eyes => &[
                ScaleOption { code: 4, label: "spontaneous" },
                ScaleOption { code: 3, label: "to voice" },
                ScaleOption { code: 2, label: "to pain" },
                ScaleOption { code: 1, label: "none" },
            ],
            GcsItem::Verbal => &[
                ScaleOption { code: 5, label: "oriented" },
                ScaleOption { code: 4, label: "confused" },
                ScaleOption { code: 3, label: "inappropriate words" },
                ScaleOption { code: 2, label: "incomprehensible sounds" },
                ScaleOption { code: 1, label: "none" },
            ],
            GcsItem::Motor => &[
                ScaleOption { code: 6, label: "obeys commands" },
                ScaleOption { code: 5, label: "localises pain" },
                ScaleOption { code: 4, label: "withdraws from pain" },
                ScaleOption { code: 3, label: "abnormal flexion" },
                ScaleOption { code: 2, label: "abnormal extension" },
                ScaleOption { code: 1, label: "none" },
            ],
        }
    }
}

/// The yes/no options shared by the qSOFA and CURB-65 criteria.
pub const YES_NO: [ScaleOption; 2] = [
    ScaleOption { code: 0, label: "no" },
    ScaleOption { code: 1, label: "yes" },
];

/// One selectable CPOT option: code, short label and the bedside criterion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CpotOption {
    pub code: i64,
    pub label: &'static str,
    pub criterion: &'static str,
}

/// The four CPOT parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CpotParameter {
    FacialExpression,
    BodyMovement,
    MuscleTension,
    VentilatorCompliance,
}

impl CpotParameter {
    pub fn options(self) -> &'static [CpotOption; 3] {
        match self {
            CpotParameter::FacialExpression => &[
                CpotOption {
                    code: 0,
                    label: "relaxed",
                    criterion: "no facial muscle tension",
                },
                CpotOption {
                    code: 1,
                    label: "tense",
                    criterion: "frowning, brow lowering",
                },
                CpotOption {
                    code: 2,
                    label: "grimacing",
                    criterion: "eyelids tightly closed, facial muscles contracted",
                },
            ],
            CpotParameter::BodyMovement => &[
                CpotOption {
                    code: 0,
                    label: "absent",
                    criterion: "no movement or normal position",
                },
                CpotOption {
                    code: 1,
                    label: "protective",
                    criterion: "slow cautious movements, touching the painful site",
                },
                CpotOption {
                    code: 2,
                    label: "restless",
                    criterion: "frequent movements, thrashing, not cooperating",
                },
            ],
            CpotParameter::MuscleTension => &[
                CpotOption {
                    code: 0,
                    label: "relaxed",
                    criterion: "no resistance to passive movement",
                },
                CpotOption {
                    code: 1,
                    label: "tense",
                    criterion: "resistance to passive movement",
                },
                CpotOption {
                    code: 2,
                    label: "very tense",
                    criterion: "strong resistance, movements cannot be completed",
                },
            ],
            CpotParameter::VentilatorCompliance => &[
                CpotOption {
                    code: 0,
                    label: "tolerating",
                    criterion: "no alarms, synchronous breathing",
                },
                CpotOption {
                    code: 1,
                    label: "coughing",
                    criterion: "coughing but tolerating ventilation",
                },
                CpotOption {
                    code: 2,
                    label: "fighting",
                    criterion: "frequent alarms, asynchrony, blocking ventilation",
                },
            ],
        }
    }
}

/// One level of the Richmond Agitation-Sedation Scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RassLevel {
    pub value: i8,
    pub label: &'static str,
    pub interpretation: &'static str,
    /// Whether the level sits in the usual -1..0 sedation target band.
    pub target: bool,
}

/// The full RASS scale, most agitated first.
pub const RASS_SCALE: [RassLevel; 10] = [
    RassLevel {
        value: 4,
        label: "combative",
        interpretation: "combative, violent, danger to staff",
        target: false,
    },
    RassLevel {
        value: 3,
        label: "very agitated",
        interpretation: "pulls at tubes or catheters, does not follow commands",
        target: false,
    },
    RassLevel {
        value: 2,
        label: "agitated",
        interpretation: "frequent non-purposeful movement",
        target: false,
    },
    RassLevel {
        value: 1,
        label: "restless",
        interpretation: "anxious, movements not aggressive",
        target: false,
    },
    RassLevel {
        value: 0,
        label: "alert and calm",
        interpretation: "awake, calm, cooperative",
        target: true,
    },
    RassLevel {
        value: -1,
        label: "drowsy",
        interpretation: "awakens to voice, eye contact longer than 10 s",
        target: true,
    },
    RassLevel {
        value: -2,
        label: "light sedation",
        interpretation: "awakens to voice, eye contact shorter than 10 s",
        target: false,
    },
    RassLevel {
        value: -3,
        label: "moderate sedation",
        interpretation: "movement to voice, no eye contact",
        target: false,
    },
    RassLevel {
        value: -4,
        label: "deep sedation",
        interpretation: "no response to voice, movement to physical stimulus",
        target: false,
    },
    RassLevel {
        value: -5,
        label: "unarousable",
        interpretation: "no response to voice or physical stimulus",
        target: false,
    },
];

/// Looks up a RASS level by value.
pub fn rass_level(value: i64) -> Option<&'static RassLevel> {
    RASS_SCALE.iter().find(|level| i64::from(level.value) == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sofa_items_offer_five_codes_each() {
        for item in [
            SofaItem::Respiration,
            SofaItem::Coagulation,
            SofaItem::Liver,
            SofaItem::Cardiovascular,
            SofaItem::Neurological,
            SofaItem::Renal,
        ] {
            let options = item.options();
            assert_eq!(options.len(), 5);
            for (expected, option) in options.iter().enumerate() {
                assert_eq!(option.code, expected as i64);
            }
        }
    }

    #[test]
    fn gcs_codes_span_the_component_ranges() {
        assert!(is_valid_code(GcsItem::Eyes.options(), 4));
        assert!(!is_valid_code(GcsItem::Eyes.options(), 5));
        assert!(is_valid_code(GcsItem::Verbal.options(), 5));
        assert!(is_valid_code(GcsItem::Motor.options(), 6));
        assert!(!is_valid_code(GcsItem::Motor.options(), 0));
    }

    #[test]
    fn cpot_parameters_have_three_graded_options() {
        for parameter in [
            CpotParameter::FacialExpression,
            CpotParameter::BodyMovement,
            CpotParameter::MuscleTension,
            CpotParameter::VentilatorCompliance,
        ] {
            let options = parameter.options();
            assert_eq!(options.iter().map(|o| o.code).collect::<Vec<_>>(), vec![0, 1, 2]);
        }
    }

    #[test]
    fn rass_scale_covers_minus_five_to_plus_four() {
        assert_eq!(RASS_SCALE.len(), 10);
        for value in -5..=4 {
            assert!(rass_level(value).is_some());
        }
        assert!(rass_level(5).is_none());
    }

    #[test]
    fn rass_target_band_is_minus_one_to_zero() {
        let targets: Vec<i8> = RASS_SCALE
            .iter()
            .filter(|level| level.target)
            .map(|level| level.value)
            .collect();
        assert_eq!(targets, vec![0, -1]);
    }
}
