//! Sedation and analgesia support: CPOT/RASS interpretation, the infusion
//! drug catalogue and the pump-rate calculation.
//!
//! The engine stays a pure reader with one documented exception:
//! [`recompute_infusions`] writes freshly calculated pump rates into a
//! record. Callers invoke it inside a census update when a dose or
//! concentration changes; a rate whose inputs are incomplete keeps its
//! last written value instead of resetting to zero.

use crate::record::PatientRecord;
use crate::scores;

/// The four continuously infused sedation/analgesia drugs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Drug {
    Fentanyl,
    Propofol,
    Dexmedetomidine,
    Midazolam,
}

/// All drugs, in chart display order.
pub const DRUGS: [Drug; 4] = [
    Drug::Fentanyl,
    Drug::Propofol,
    Drug::Dexmedetomidine,
    Drug::Midazolam,
];

/// Dose limits for a drug, in its own dose unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoseLimits {
    pub minimum: f64,
    pub maximum: f64,
    pub initial: f64,
}

impl Drug {
    pub fn name(self) -> &'static str {
        match self {
            Drug::Fentanyl => "Fentanyl",
            Drug::Propofol => "Propofol",
            Drug::Dexmedetomidine => "Dexmedetomidine",
            Drug::Midazolam => "Midazolam",
        }
    }

    /// Dose unit of the per-kg prescription.
    pub fn dose_unit(self) -> &'static str {
        match self {
            Drug::Fentanyl | Drug::Dexmedetomidine => "mcg/kg/h",
            Drug::Propofol | Drug::Midazolam => "mg/kg/h",
        }
    }

    /// Concentration unit of the syringe.
    pub fn concentration_unit(self) -> &'static str {
        match self {
            Drug::Fentanyl | Drug::Dexmedetomidine => "mcg/mL",
            Drug::Propofol | Drug::Midazolam => "mg/mL",
        }
    }

    /// Standard syringe concentrations stocked on the unit.
    pub fn standard_concentrations(self) -> &'static [f64] {
        match self {
            Drug::Fentanyl => &[50.0, 100.0],
            Drug::Propofol => &[10.0, 20.0],
            Drug::Dexmedetomidine => &[4.0, 100.0],
            Drug::Midazolam => &[1.0, 5.0],
        }
    }

    /// The drug's safe dosing range.
    pub fn dose_limits(self) -> DoseLimits {
        match self {
            Drug::Fentanyl => DoseLimits {
                minimum: 0.5,
                maximum: 10.0,
                initial: 1.5,
            },
            Drug::Propofol => DoseLimits {
                minimum: 0.5,
                maximum: 4.0,
                initial: 1.5,
            },
            Drug::Dexmedetomidine => DoseLimits {
                minimum: 0.2,
                maximum: 1.5,
                initial: 0.5,
            },
            Drug::Midazolam => DoseLimits {
                minimum: 0.02,
                maximum: 0.2,
                initial: 0.05,
            },
        }
    }
}

/// A drug's current chart state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrugState {
    pub dose: f64,
    pub concentration: f64,
    pub infusion_ml_h: f64,
}

/// Reads one drug's dose/concentration/rate triple from a record.
pub fn drug_state(record: &PatientRecord, drug: Drug) -> DrugState {
    let (dose, concentration, infusion) = match drug {
        Drug::Fentanyl => (
            &record.fentanyl_dose,
            &record.fentanyl_concentration,
            &record.fentanyl_infusion,
        ),
        Drug::Propofol => (
            &record.propofol_dose,
            &record.propofol_concentration,
            &record.propofol_infusion,
        ),
        Drug::Dexmedetomidine => (
            &record.dexmedetomidine_dose,
            &record.dexmedetomidine_concentration,
            &record.dexmedetomidine_infusion,
        ),
        Drug::Midazolam => (
            &record.midazolam_dose,
            &record.midazolam_concentration,
            &record.midazolam_infusion,
        ),
    };
    DrugState {
        dose: dose.as_f64(),
        concentration: concentration.as_f64(),
        infusion_ml_h: infusion.as_f64(),
    }
}

/// Where a prescribed dose sits against the drug's limits.
///
/// Checked in the chart's order: below range, then above maximum, then the
/// 80% warning band, then within range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoseBand {
    BelowRange,
    AboveMaximum,
    NearMaximum,
    WithinRange,
}

/// Bands a dose against a drug's limits.
pub fn classify_dose(drug: Drug, dose: f64) -> DoseBand {
    let limits = drug.dose_limits();
    if dose < limits.minimum {
        DoseBand::BelowRange
    } else if dose > limits.maximum {
        DoseBand::AboveMaximum
    } else if dose > limits.maximum * 0.8 {
        DoseBand::NearMaximum
    } else {
        DoseBand::WithinRange
    }
}

/// Pump rate for a weight-based infusion, mL/h, rounded to two decimals.
///
/// Defined only when dose and concentration are both positive; `None`
/// tells the caller to keep the last written rate.
pub fn infusion_rate(dose_per_kg_h: f64, concentration: f64, weight_kg: f64) -> Option<f64> {
    if dose_per_kg_h > 0.0 && concentration > 0.0 {
        let rate = (dose_per_kg_h * weight_kg) / concentration;
        Some((rate * 100.0).round() / 100.0)
    } else {
        None
    }
}

/// The weight to dose against: the recorded weight, or an age/gender
/// estimate when none has been charted yet.
pub fn dosing_weight(record: &PatientRecord) -> f64 {
    let recorded = record.weight_kg.as_f64();
    if recorded > 0.0 {
        return recorded;
    }
    let age = {
        let charted = record.age.as_f64();
        if charted > 0.0 {
            charted
        } else {
            70.0
        }
    };
    let elderly_loss = if age > 65.0 { (age - 65.0) * 0.5 } else { 0.0 };
    match record.gender {
        rounds_types::Gender::Female => (70.0 - elderly_loss).max(50.0),
        _ => (75.0 - elderly_loss).max(60.0),
    }
}

/// Recomputes the pump rate of every drug whose dose and concentration are
/// both charted, writing the result back into the record.
///
/// This is the engine's one write path; call it inside a census update so
/// the collection owns the mutation. Drugs with incomplete inputs keep
/// their last written rate.
pub fn recompute_infusions(record: &mut PatientRecord) {
    let weight = dosing_weight(record);
    for drug in DRUGS {
        let state = drug_state(record, drug);
        if let Some(rate) = infusion_rate(state.dose, state.concentration, weight) {
            let slot = match drug {
                Drug::Fentanyl => &mut record.fentanyl_infusion,
                Drug::Propofol => &mut record.propofol_infusion,
                Drug::Dexmedetomidine => &mut record.dexmedetomidine_infusion,
                Drug::Midazolam => &mut record.midazolam_infusion,
            };
            *slot = rounds_types::ChartValue::Num(rate);
        }
    }
}

/// Reading of a CPOT total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CpotReading {
    /// Total <= 2: analgesia adequate.
    Adequate,
    /// Total <= 4.
    MildPain,
    SignificantPain,
}

/// Classifies a CPOT total.
pub fn classify_cpot(total: i64) -> CpotReading {
    if total <= 2 {
        CpotReading::Adequate
    } else if total <= 4 {
        CpotReading::MildPain
    } else {
        CpotReading::SignificantPain
    }
}

/// Where a RASS level sits relative to the -1..0 target band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RassBand {
    /// Above 0: agitation.
    Agitated,
    /// -1..=0: the usual sedation target.
    AtTarget,
    /// -2: light oversedation, watch.
    LightSedation,
    /// Below -2: sedation deeper than intended.
    DeepSedation,
}

/// Bands a RASS level.
pub fn classify_rass(rass: i64) -> RassBand {
    if rass > 0 {
        RassBand::Agitated
    } else if rass >= -1 {
        RassBand::AtTarget
    } else if rass >= -2 {
        RassBand::LightSedation
    } else {
        RassBand::DeepSedation
    }
}

/// Overall sedation/analgesia status shown in the chart header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SedationStatus {
    Adequate,
    PainDetected,
    AdjustmentNeeded,
}

/// Combines CPOT and RASS into the header status.
pub fn sedation_status(cpot_total: i64, rass: i64) -> SedationStatus {
    if cpot_total <= 2 && (-1..=0).contains(&rass) {
        SedationStatus::Adequate
    } else if cpot_total > 2 {
        SedationStatus::PainDetected
    } else {
        SedationStatus::AdjustmentNeeded
    }
}

/// PADIS-2018 bedside recommendation.
///
/// Pain always outranks sedation depth: analgesia is optimised before any
/// sedative adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PadisAdvice {
    AnalgesiaFirst,
    TreatAgitation,
    LightenSedation,
    MaintainCurrent,
    Reassess,
}

/// Priority attached to a PADIS recommendation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PadisPriority {
    Critical,
    High,
    Medium,
    Low,
}

impl PadisAdvice {
    pub fn priority(self) -> PadisPriority {
        match self {
            PadisAdvice::AnalgesiaFirst => PadisPriority::Critical,
            PadisAdvice::TreatAgitation => PadisPriority::High,
            PadisAdvice::LightenSedation | PadisAdvice::Reassess => PadisPriority::Medium,
            PadisAdvice::MaintainCurrent => PadisPriority::Low,
        }
    }

    /// Suggested actions for the protocol card.
    pub fn actions(self) -> &'static [&'static str] {
        match self {
            PadisAdvice::AnalgesiaFirst => &[
                "Do not deepen sedation before optimising analgesia",
                "Look for pain sources: positioning, recent procedures",
                "Consider fentanyl 1-2 mcg/kg/h when CPOT > 4",
                "Reassess CPOT in 30-60 min",
            ],
            PadisAdvice::TreatAgitation => &[
                "RASS >= +3: consider a propofol bolus first",
                "Increase propofol by 0.5 mg/kg/h (maximum 4 mg/kg/h)",
                "Alternative: dexmedetomidine 0.2-1.5 mcg/kg/h",
                "Target RASS -1 to 0, reassess in 15-30 min",
            ],
            PadisAdvice::LightenSedation => &[
                "RASS <= -4: consider a daily sedation interruption",
                "Reduce propofol by 25-50%",
                "Keep analgesia adequate",
                "Reassess in 60 min",
            ],
            PadisAdvice::MaintainCurrent => &[
                "Targets met: keep current doses",
                "Assess readiness for SAT/SBT",
                "Next assessment in 4-6 h",
            ],
            PadisAdvice::Reassess => &["Reassess CPOT and RASS", "Follow the PADIS pathway"],
        }
    }
}

/// Chooses the PADIS recommendation for a CPOT total and RASS level.
pub fn padis_advice(cpot_total: i64, rass: i64) -> PadisAdvice {
    if cpot_total > 2 {
        PadisAdvice::AnalgesiaFirst
    } else if rass > 0 {
        PadisAdvice::TreatAgitation
    } else if rass < -2 {
        PadisAdvice::LightenSedation
    } else if (-1..=0).contains(&rass) {
        PadisAdvice::MaintainCurrent
    } else {
        PadisAdvice::Reassess
    }
}

/// Everything the sedation panel derives from one record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SedationSummary {
    pub dosing_weight_kg: f64,
    pub rass: i64,
    pub rass_band: RassBand,
    pub cpot_total: i64,
    pub cpot_reading: CpotReading,
    pub status: SedationStatus,
    pub advice: PadisAdvice,
}

impl SedationSummary {
    pub fn from_record(record: &PatientRecord) -> Self {
        let rass = record.rass.as_int();
        let cpot_total = scores::cpot_total(record);
        SedationSummary {
            dosing_weight_kg: dosing_weight(record),
            rass,
            rass_band: classify_rass(rass),
            cpot_total,
            cpot_reading: classify_cpot(cpot_total),
            status: sedation_status(cpot_total, rass),
            advice: padis_advice(cpot_total, rass),
        }
    }
}
