//! Strongly-typed patient rows.
//!
//! Rows are produced either by a cohort assembler (always fully populated) or
//! by normalizing one record of an externally parsed dataset via `from_raw`.
//! Normalization happens exactly once, here; the scorers never see raw
//! values. A scorer appends derived columns and never mutates these fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::normalize::{parse_bool, parse_f64, SelfRatedHealth, Sex, SmokingStatus};

/// One patient row for the CVD (CCS / MHF) pipeline.
///
/// Required numerics are `Option` so a missing or unparseable upload value
/// propagates as an indeterminate score rather than a fabricated number.
/// Boolean flags default to false when absent, matching how the point tables
/// treat "not known to be true".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvdProfile {
    /// Age in years.
    pub age: Option<f64>,
    pub sex: Sex,
    pub bmi: Option<f64>,
    /// Prior cardiovascular disease.
    pub cvd: bool,
    /// Systolic blood pressure, mmHg.
    pub sbp: Option<f64>,
    pub on_bp_meds: bool,
    /// Total cholesterol, mmol/L or mg/dL (unit resolved at scoring time).
    pub tc: Option<f64>,
    /// HDL cholesterol, mmol/L or mg/dL.
    pub hdl: Option<f64>,
    pub diabetes: bool,
    pub smoker: bool,
    /// Weekly MET-minutes of physical activity. Missing activity means no
    /// discount, so this one coerces to 0 rather than propagating `None`.
    pub met_min: f64,
}

impl CvdProfile {
    /// Normalize one loosely-typed record into a typed row.
    pub fn from_raw(raw: &Map<String, JsonValue>) -> Self {
        Self {
            age: raw.get("age").and_then(parse_f64),
            sex: sex_from_raw(raw.get("sex")),
            bmi: raw.get("bmi").and_then(parse_f64),
            cvd: raw.get("cvd").map(parse_bool).unwrap_or(false),
            sbp: raw.get("sbp").and_then(parse_f64),
            on_bp_meds: raw.get("on_bp_meds").map(parse_bool).unwrap_or(false),
            tc: raw.get("tc").and_then(parse_f64),
            hdl: raw.get("hdl").and_then(parse_f64),
            diabetes: raw.get("diabetes").map(parse_bool).unwrap_or(false),
            smoker: raw.get("smoker").map(parse_bool).unwrap_or(false),
            met_min: raw.get("met_min").and_then(parse_f64).unwrap_or(0.0),
        }
    }
}

/// One patient row for the mortality (Lee / C-score) pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortalityProfile {
    pub age: Option<f64>,
    pub sex: Sex,
    pub bmi: Option<f64>,
    pub smoking_status: SmokingStatus,
    /// Derived: true for either current smoking intensity.
    pub smoker: bool,
    pub diabetes: bool,
    pub non_skin_cancer: bool,
    pub copd: bool,
    pub heart_failure: bool,
    pub difficulty_bathing: bool,
    pub difficulty_managing_money: bool,
    pub difficulty_walking: bool,
    /// `None` when the label was missing or unrecognized; the C-score is
    /// indeterminate for such rows.
    pub self_rated_health: Option<SelfRatedHealth>,
    /// Waist-to-height ratio.
    pub whtr: Option<f64>,
    /// Resting heart rate, bpm.
    pub resting_hr: Option<f64>,
    pub drinks_per_week: Option<f64>,
    pub sleep_hours: Option<f64>,
}

impl MortalityProfile {
    /// Normalize one loosely-typed record into a typed row.
    pub fn from_raw(raw: &Map<String, JsonValue>) -> Self {
        let smoker_flag = raw.get("smoker").map(parse_bool).unwrap_or(false);
        let smoking_status = SmokingStatus::classify(
            raw.get("smoking_status").and_then(|v| v.as_str()),
            smoker_flag,
        );
        Self {
            age: raw.get("age").and_then(parse_f64),
            sex: sex_from_raw(raw.get("sex")),
            bmi: raw.get("bmi").and_then(parse_f64),
            smoking_status,
            smoker: smoking_status.is_current(),
            diabetes: raw.get("diabetes").map(parse_bool).unwrap_or(false),
            non_skin_cancer: raw.get("non_skin_cancer").map(parse_bool).unwrap_or(false),
            copd: raw.get("copd").map(parse_bool).unwrap_or(false),
            heart_failure: raw.get("heart_failure").map(parse_bool).unwrap_or(false),
            difficulty_bathing: raw.get("difficulty_bathing").map(parse_bool).unwrap_or(false),
            difficulty_managing_money: raw
                .get("difficulty_managing_money")
                .map(parse_bool)
                .unwrap_or(false),
            difficulty_walking: raw.get("difficulty_walking").map(parse_bool).unwrap_or(false),
            self_rated_health: raw
                .get("self_rated_health")
                .and_then(|v| v.as_str())
                .and_then(SelfRatedHealth::parse),
            whtr: raw.get("whtr").and_then(parse_f64),
            resting_hr: raw.get("resting_hr").and_then(parse_f64),
            drinks_per_week: raw.get("drinks_per_week").and_then(parse_f64),
            sleep_hours: raw.get("sleep_hours").and_then(parse_f64),
        }
    }
}

fn sex_from_raw(value: Option<&JsonValue>) -> Sex {
    value
        .and_then(|v| v.as_str())
        .map(Sex::parse)
        .unwrap_or(Sex::Other)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: JsonValue) -> Map<String, JsonValue> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_cvd_from_raw_mixed_formats() {
        let raw = map(json!({
            "age": "55", "sex": "Male", "bmi": 28, "cvd": "no", "sbp": 140,
            "on_bp_meds": "yes", "tc": 5.5, "hdl": "1.1", "diabetes": 0,
            "smoker": 1, "met_min": "1200"
        }));
        let p = CvdProfile::from_raw(&raw);
        assert_eq!(p.age, Some(55.0));
        assert_eq!(p.sex, Sex::Male);
        assert!(!p.cvd);
        assert!(p.on_bp_meds);
        assert!(!p.diabetes);
        assert!(p.smoker);
        assert_eq!(p.tc, Some(5.5));
        assert_eq!(p.met_min, 1200.0);
    }

    #[test]
    fn test_cvd_from_raw_missing_fields() {
        let raw = map(json!({ "sex": "f" }));
        let p = CvdProfile::from_raw(&raw);
        assert_eq!(p.age, None);
        assert_eq!(p.tc, None);
        assert_eq!(p.sbp, None);
        assert!(!p.smoker);
        // Activity is the one field that coerces: no activity, no discount
        assert_eq!(p.met_min, 0.0);
    }

    #[test]
    fn test_mortality_from_raw_smoking_fallback() {
        // No smoking_status label; the boolean flag decides the bucket
        let raw = map(json!({ "age": 70, "sex": "m", "smoker": "yes" }));
        let p = MortalityProfile::from_raw(&raw);
        assert_eq!(p.smoking_status, SmokingStatus::CurrentGt10);
        assert!(p.smoker);

        let raw = map(json!({ "age": 70, "sex": "m", "smoking_status": "former_gt1" }));
        let p = MortalityProfile::from_raw(&raw);
        assert_eq!(p.smoking_status, SmokingStatus::FormerGt1);
        assert!(!p.smoker);
    }

    #[test]
    fn test_mortality_from_raw_unknown_srh_is_none() {
        let raw = map(json!({ "age": 70, "sex": "f", "self_rated_health": "splendid" }));
        let p = MortalityProfile::from_raw(&raw);
        assert_eq!(p.self_rated_health, None);
    }
}
