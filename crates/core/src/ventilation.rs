//! Ventilator mechanics and oxygenation indices.
//!
//! Pure formulas over the ventilation and gas-exchange fields. Every
//! function guards its own domain: a ratio whose inputs are missing or
//! physiologically invalid reads as zero (the "not computable" sentinel)
//! rather than dividing by nothing or going negative.

use rounds_types::IbwSex;

use crate::record::PatientRecord;

/// Driving pressure (plateau - PEEP), cmH2O. Never negative.
pub fn driving_pressure(plateau: f64, peep: f64) -> f64 {
    if plateau > peep {
        plateau - peep
    } else {
        0.0
    }
}

/// Devine ideal body weight, kg.
///
/// Defined only above the formula's 152.4 cm (5 ft) floor; shorter heights
/// read as zero.
pub fn ideal_body_weight(height_cm: f64, sex: IbwSex) -> f64 {
    if height_cm > 152.4 {
        let base = match sex {
            IbwSex::M => 50.0,
            IbwSex::F => 45.5,
        };
        base + 0.91 * (height_cm - 152.4)
    } else {
        0.0
    }
}

/// Protective tidal-volume window derived from ideal body weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProtectiveVolumes {
    /// 6 mL/kg target, mL.
    pub lower_ml: f64,
    /// 8 mL/kg ceiling, mL.
    pub upper_ml: f64,
}

/// The 6-8 mL/kg protective window for a given ideal body weight.
pub fn protective_volumes(ibw_kg: f64) -> ProtectiveVolumes {
    ProtectiveVolumes {
        lower_ml: ibw_kg * 6.0,
        upper_ml: ibw_kg * 8.0,
    }
}

/// PaO2/FiO2 ratio.
///
/// Valid only when PaO2 is positive and FiO2 is at or above the 21%
/// room-air floor; otherwise 0 (undefined).
pub fn pf_ratio(pao2: f64, fio2_pct: f64) -> f64 {
    if pao2 > 0.0 && fio2_pct >= 21.0 {
        pao2 / (fio2_pct / 100.0)
    } else {
        0.0
    }
}

/// Berlin ARDS severity tier for a P/F ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArdsSeverity {
    /// P/F < 100.
    Severe,
    /// P/F < 200.
    Moderate,
    /// P/F < 300.
    Mild,
    /// P/F >= 300.
    Normal,
}

/// Classifies a P/F ratio against the Berlin cutoffs.
///
/// Returns `None` for the 0 sentinel (ratio not computable).
pub fn classify_pf(ratio: f64) -> Option<ArdsSeverity> {
    if ratio <= 0.0 {
        return None;
    }
    Some(if ratio < 100.0 {
        ArdsSeverity::Severe
    } else if ratio < 200.0 {
        ArdsSeverity::Moderate
    } else if ratio < 300.0 {
        ArdsSeverity::Mild
    } else {
        ArdsSeverity::Normal
    })
}

/// Dynamic compliance (tidal volume / (peak - PEEP)), mL/cmH2O.
pub fn dynamic_compliance(tidal_volume_ml: f64, peak: f64, peep: f64) -> f64 {
    if tidal_volume_ml > 0.0 && peak > peep {
        tidal_volume_ml / (peak - peep)
    } else {
        0.0
    }
}

/// Airway resistance ((peak - plateau) / flow), cmH2O/L/s.
///
/// Flow arrives in L/min and is converted to L/s before use as the divisor.
pub fn airway_resistance(peak: f64, plateau: f64, flow_lpm: f64) -> f64 {
    if flow_lpm > 0.0 && peak > plateau {
        (peak - plateau) / (flow_lpm / 60.0)
    } else {
        0.0
    }
}

/// Minute ventilation (tidal volume x rate), L/min.
pub fn minute_ventilation(tidal_volume_ml: f64, resp_rate: f64) -> f64 {
    if tidal_volume_ml > 0.0 && resp_rate > 0.0 {
        tidal_volume_ml * resp_rate / 1000.0
    } else {
        0.0
    }
}

/// Oxygenation index ((mean airway pressure x FiO2%) / PaO2).
pub fn oxygenation_index(mean_airway_pressure: f64, fio2_pct: f64, pao2: f64) -> f64 {
    if mean_airway_pressure > 0.0 && fio2_pct > 0.0 && pao2 > 0.0 {
        (mean_airway_pressure * fio2_pct) / pao2
    } else {
        0.0
    }
}

/// Severity tier for an oxygenation index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OiSeverity {
    /// OI >= 25: ECMO consideration territory.
    VerySevere,
    /// OI >= 16.
    Severe,
    /// OI >= 8.
    Moderate,
    Mild,
}

/// Classifies an oxygenation index; `None` for the 0 sentinel.
pub fn classify_oi(oi: f64) -> Option<OiSeverity> {
    if oi <= 0.0 {
        return None;
    }
    Some(if oi >= 25.0 {
        OiSeverity::VerySevere
    } else if oi >= 16.0 {
        OiSeverity::Severe
    } else if oi >= 8.0 {
        OiSeverity::Moderate
    } else {
        OiSeverity::Mild
    })
}

/// The FiO2 the oxygenation formulas should use for a record: the dedicated
/// gas-exchange entry when present, else the ventilator setting.
pub fn effective_fio2(record: &PatientRecord) -> f64 {
    let dedicated = record.pf_fio2.as_f64();
    if dedicated > 0.0 {
        dedicated
    } else {
        record.fio2.as_f64()
    }
}

/// Everything the ventilation panel derives from one record, computed in a
/// single read. Recomputed on every call; nothing is cached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VentilationSummary {
    pub driving_pressure: f64,
    pub ideal_body_weight: f64,
    pub protective_volumes: ProtectiveVolumes,
    pub pf_ratio: f64,
    pub ards: Option<ArdsSeverity>,
    pub dynamic_compliance: f64,
    pub airway_resistance: f64,
    pub minute_ventilation: f64,
    pub oxygenation_index: f64,
    pub oi_severity: Option<OiSeverity>,
}

impl VentilationSummary {
    pub fn from_record(record: &PatientRecord) -> Self {
        let plateau = record.plateau_pressure.as_f64();
        let peep = record.peep.as_f64();
        let peak = record.peak_pressure.as_f64();
        let tidal = record.tidal_volume.as_f64();
        let pao2 = record.pao2.as_f64();
        let fio2 = effective_fio2(record);

        let ibw = ideal_body_weight(record.ibw_height_cm.as_f64(), record.ibw_sex);
        let pf = pf_ratio(pao2, fio2);
        let oi = oxygenation_index(record.mean_airway_pressure.as_f64(), fio2, pao2);

        VentilationSummary {
            driving_pressure: driving_pressure(plateau, peep),
            ideal_body_weight: ibw,
            protective_volumes: protective_volumes(ibw),
            pf_ratio: pf,
            ards: classify_pf(pf),
            dynamic_compliance: dynamic_compliance(tidal, peak, peep),
            airway_resistance: airway_resistance(peak, plateau, record.airway_flow.as_f64()),
            minute_ventilation: minute_ventilation(tidal, record.resp_rate.as_f64()),
            oxygenation_index: oi,
            oi_severity: classify_oi(oi),
        }
    }
}

impl std::fmt::Display for ArdsSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArdsSeverity::Severe => write!(f, "severe ARDS"),
            ArdsSeverity::Moderate => write!(f, "moderate ARDS"),
            ArdsSeverity::Mild => write!(f, "mild ARDS"),
            ArdsSeverity::Normal => write!(f, "normal"),
        }
    }
}

impl std::fmt::Display for OiSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OiSeverity::VerySevere => write!(f, "very severe (consider ECMO)"),
            OiSeverity::Severe => write!(f, "severe"),
            OiSeverity::Moderate => write!(f, "moderate"),
            OiSeverity::Mild => write!(f, "mild"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rounds_types::ChartValue;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn driving_pressure_is_never_negative() {
        assert_eq!(driving_pressure(27.0, 12.0), 15.0);
        assert_eq!(driving_pressure(10.0, 12.0), 0.0);
        assert_eq!(driving_pressure(12.0, 12.0), 0.0);
    }

    #[test]
    fn ibw_devine_formula() {
        assert!(close(ideal_body_weight(175.0, IbwSex::M), 50.0 + 0.91 * 22.6));
        assert!(close(ideal_body_weight(162.0, IbwSex::F), 45.5 + 0.91 * 9.6));
        assert_eq!(ideal_body_weight(152.4, IbwSex::M), 0.0);
        assert_eq!(ideal_body_weight(140.0, IbwSex::F), 0.0);
    }

    #[test]
    fn protective_window_scales_with_ibw() {
        let window = protective_volumes(70.0);
        assert_eq!(window.lower_ml, 420.0);
        assert_eq!(window.upper_ml, 560.0);
    }

    #[test]
    fn pf_ratio_guards_its_domain() {
        assert!(close(pf_ratio(84.0, 60.0), 140.0));
        assert_eq!(pf_ratio(84.0, 20.0), 0.0);
        assert_eq!(pf_ratio(0.0, 60.0), 0.0);
    }

    #[test]
    fn berlin_bands_use_strict_cutoffs() {
        assert_eq!(classify_pf(99.9), Some(ArdsSeverity::Severe));
        assert_eq!(classify_pf(100.0), Some(ArdsSeverity::Moderate));
        assert_eq!(classify_pf(140.0), Some(ArdsSeverity::Moderate));
        assert_eq!(classify_pf(200.0), Some(ArdsSeverity::Mild));
        assert_eq!(classify_pf(300.0), Some(ArdsSeverity::Normal));
        assert_eq!(classify_pf(0.0), None);
    }

    #[test]
    fn compliance_resistance_and_minute_volume() {
        assert!(close(dynamic_compliance(380.0, 30.0, 12.0), 380.0 / 18.0));
        assert_eq!(dynamic_compliance(0.0, 30.0, 12.0), 0.0);
        assert_eq!(dynamic_compliance(380.0, 12.0, 12.0), 0.0);

        // 60 L/min is 1 L/s, so resistance equals the pressure difference.
        assert!(close(airway_resistance(30.0, 27.0, 60.0), 3.0));
        assert_eq!(airway_resistance(30.0, 27.0, 0.0), 0.0);
        assert_eq!(airway_resistance(25.0, 27.0, 60.0), 0.0);

        assert!(close(minute_ventilation(380.0, 20.0), 7.6));
        assert_eq!(minute_ventilation(380.0, 0.0), 0.0);
    }

    #[test]
    fn oxygenation_index_and_bands() {
        assert!(close(oxygenation_index(18.0, 60.0, 84.0), 18.0 * 60.0 / 84.0));
        assert_eq!(oxygenation_index(0.0, 60.0, 84.0), 0.0);

        assert_eq!(classify_oi(7.9), Some(OiSeverity::Mild));
        assert_eq!(classify_oi(8.0), Some(OiSeverity::Moderate));
        assert_eq!(classify_oi(16.0), Some(OiSeverity::Severe));
        assert_eq!(classify_oi(25.0), Some(OiSeverity::VerySevere));
        assert_eq!(classify_oi(0.0), None);
    }

    #[test]
    fn effective_fio2_falls_back_to_ventilator_setting() {
        let mut record = PatientRecord::blank();
        record.fio2 = ChartValue::from(60);
        assert_eq!(effective_fio2(&record), 60.0);
        record.pf_fio2 = ChartValue::from(40);
        assert_eq!(effective_fio2(&record), 40.0);
    }

    #[test]
    fn summary_reads_a_full_record() {
        let mut record = PatientRecord::blank();
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

        let summary = VentilationSummary::from_record(&record);
        assert_eq!(summary.driving_pressure, 15.0);
        assert!(close(summary.pf_ratio, 140.0));
        assert_eq!(summary.ards, Some(ArdsSeverity::Moderate));
        assert!(close(summary.ideal_body_weight, 70.566));
        assert!(close(summary.minute_ventilation, 7.6));
        assert_eq!(summary.oi_severity, Some(OiSeverity::Moderate));
    }
}
