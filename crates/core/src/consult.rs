//! The consult boundary: prompt construction for the external
//! text-generation service.
//!
//! The core only builds the prompt from already-derived values and defines
//! the seam the external collaborator implements. Network transport, API
//! keys, retries and model choice all live on the other side of
//! [`ConsultService`].

use chrono::{DateTime, Utc};

use crate::record::PatientRecord;
use crate::scores;
use crate::ventilation;

/// Errors surfaced by a consult service implementation.
#[derive(Debug, thiserror::Error)]
pub enum ConsultError {
    /// The service could not be reached.
    #[error("consult service unavailable: {0}")]
    Unavailable(String),
    /// The service answered with an error of its own.
    #[error("consult service error: {0}")]
    Service(String),
}

/// The external text-generation collaborator.
///
/// Implementations are synchronous from the core's perspective; the core
/// never awaits anything and only ever hands over a finished prompt.
pub trait ConsultService {
    /// Produces the free-text assessment for a prompt.
    fn generate(&self, prompt: &str) -> Result<String, ConsultError>;
}

fn text_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_owned()
    } else {
        value.to_owned()
    }
}

/// Builds the intensivist-assessment prompt for one patient.
///
/// Pure: the caller supplies the timestamp, and every derived value is
/// recomputed from the record at call time.
pub fn build_prompt(record: &PatientRecord, now: DateTime<Utc>) -> String {
    let sofa = scores::sofa_total(record);
    let gcs = scores::gcs_total(record);
    let qsofa = scores::qsofa_total(record);

    let driving_pressure = ventilation::driving_pressure(
        record.plateau_pressure.as_f64(),
        record.peep.as_f64(),
    );
    let pf = ventilation::pf_ratio(record.pao2.as_f64(), record.pf_fio2.as_f64());
    let pf_text = if pf > 0.0 {
        format!("{:.0}", pf)
    } else {
        "N/A".to_owned()
    };

    let age = if record.age.is_empty() {
        "--".to_owned()
    } else {
        record.age.to_string()
    };
    let icu_day = if record.icu_day.is_empty() {
        "--".to_owned()
    } else {
        record.icu_day.to_string()
    };

    format!(
        "**ICU PATIENT ANALYSIS - INTENSIVIST ASSISTANT**\n\
\n\
**INSTRUCTIONS:** Act as an experienced intensive-care physician. Analyse \
the patient data below and give a concise, strategic assessment. Your answer \
MUST follow EXACTLY the Markdown format below, filling in the values and the \
alerts/recommendations from the data. Do NOT add any other information or \
formatting. The current date and time is {now}.\n\
\n\
**RESPONSE FORMAT (MARKDOWN):**\n\
**INTEGRATED ANALYSIS - INTENSIVIST ASSISTANT**\n\
\n\
**PATIENT:** {{NAME}}, {{AGE}} years\n\
**DIAGNOSIS:** {{MAIN DIAGNOSIS}}\n\
**ICU DAY:** {{ICU DAY}}\n\
\n\
**OVERALL SEVERITY:**\n\
- SOFA score: {{SOFA_TOTAL}} points {{SOFA ASSESSMENT}}\n\
- Glasgow: {{GCS_TOTAL}} points {{GCS ASSESSMENT}}\n\
- qSOFA: {{QSOFA_TOTAL}} points {{QSOFA ASSESSMENT}}\n\
\n\
**RESPIRATORY ANALYSIS:**\n\
- P/F ratio: {{PF_RATIO}} {{PF ASSESSMENT}}\n\
- Driving pressure: {{DRIVING_PRESSURE}} cmH2O {{DP ASSESSMENT}}\n\
\n\
**PRIORITY ALERTS:**\n\
{{ALERT LIST. Example: - SOFA >= 10: mortality risk above 40%}}\n\
\n\
**RECOMMENDATIONS:**\n\
{{RECOMMENDATION LIST. Example: - Adjust PEEP towards DP < 15 cmH2O}}\n\
\n\
*Analysis generated at {{CURRENT DATE AND TIME}}*\n\
\n\
---\n\
\n\
**PATIENT DATA FOR ANALYSIS:**\n\
*   **Name:** {name}\n\
*   **Age:** {age}\n\
*   **Gender:** {gender}\n\
*   **ICU day:** {icu_day}\n\
*   **Main diagnosis:** {diagnosis}\n\
*   **History:** {history}\n\
*   **Active problems:** {problems}\n\
*   **Neurological:** {neuro}, Glasgow total: {gcs}\n\
*   **Cardiovascular:** {cardio}\n\
*   **Respiratory:** {resp}, ventilation mode: {vent_mode}, PEEP: {peep}, \
plateau: {plateau}, driving pressure: {driving_pressure}, P/F ratio: {pf_text}\n\
*   **Renal/metabolic:** {renal}\n\
*   **SOFA total:** {sofa}\n\
*   **qSOFA total:** {qsofa}\n\
*   **Cumulative fluid balance:** {balance}\n\
*   **Current therapeutic plan:** {plan}\n",
        now = now.to_rfc3339(),
        name = text_or(&record.name, "Not recorded"),
        age = age,
        gender = record.gender,
        icu_day = icu_day,
        diagnosis = text_or(&record.main_diagnosis, "Not defined"),
        history = record.history,
        problems = record.problems,
        neuro = record.neuro,
        gcs = gcs,
        cardio = record.cardio,
        resp = record.resp,
        vent_mode = record.vent_mode,
        peep = record.peep,
        plateau = record.plateau_pressure,
        driving_pressure = driving_pressure,
        pf_text = pf_text,
        renal = record.renal,
        sofa = sofa,
        qsofa = qsofa,
        balance = record.cumulative_balance,
        plan = record.plan,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 15, 14, 30, 0).single().expect("valid timestamp")
    }

    #[test]
    fn prompt_carries_derived_values() {
        let census = seed::example_census();
        let record = census.get("bed-08").expect("seed patient");

        let prompt = build_prompt(record, fixed_now());
        assert!(prompt.contains("**SOFA total:** 15"));
        assert!(prompt.contains("Glasgow total: 3"));
        assert!(prompt.contains("P/F ratio: 140"));
        assert!(prompt.contains("driving pressure: 15"));
        assert!(prompt.contains("João Silva Santos"));
        assert!(prompt.contains("+2800 ml"));
    }

    #[test]
    fn prompt_falls_back_for_uncharted_fields() {
        let record = crate::record::PatientRecord::blank();
        let prompt = build_prompt(&record, fixed_now());
        assert!(prompt.contains("**Name:** Not recorded"));
        assert!(prompt.contains("**Main diagnosis:** Not defined"));
        assert!(prompt.contains("P/F ratio: N/A"));
    }

    #[test]
    fn prompt_is_deterministic_for_a_snapshot() {
        let census = seed::example_census();
        let record = census.get("bed-12").expect("seed patient");
        let now = fixed_now();
        assert_eq!(build_prompt(record, now), build_prompt(record, now));
    }

    #[test]
    fn consult_errors_render_their_context() {
        let err = ConsultError::Unavailable("offline".to_owned());
        assert_eq!(err.to_string(), "consult service unavailable: offline");
    }
}
