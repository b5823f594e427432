//! Value normalization for loosely-typed clinical inputs.
//!
//! Uploaded datasets carry booleans as 0/1/yes/no/true/false, sex and smoking
//! status as free text, and cholesterol in either mmol/L or mg/dL. Every
//! "truthy string" and unit heuristic lives in this module so the scoring
//! code only ever sees canonical typed values. Missing or unparseable
//! numerics become `None` — they are never silently defaulted for a required
//! clinical field.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// mg/dL per mmol/L (cholesterol conversion).
pub const MGDL_PER_MMOLL: f64 = 38.67;

/// Raw cholesterol above this is read as mg/dL; physiologic mmol/L values
/// never get near it.
pub const MGDL_HEURISTIC_CUTOFF: f64 = 20.0;

const TRUTHY_TOKENS: &[&str] = &["1", "true", "t", "yes", "y", "on"];
const MALE_TOKENS: &[&str] = &["m", "male", "man", "masculine"];
const FEMALE_TOKENS: &[&str] = &["f", "female", "woman", "feminine"];

/// Interpret a loosely-typed value as a boolean.
///
/// Numbers are true when nonzero; strings are matched case-insensitively
/// against the accepted truthy spellings. Anything else (null, arrays,
/// unknown spellings) is false.
pub fn parse_bool(value: &JsonValue) -> bool {
    match value {
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        JsonValue::String(s) => TRUTHY_TOKENS.contains(&s.trim().to_lowercase().as_str()),
        _ => false,
    }
}

/// Interpret a loosely-typed value as a float.
///
/// Returns `None` for anything unparseable or non-finite instead of a
/// placeholder number.
pub fn parse_f64(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        JsonValue::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        JsonValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Cholesterol unit heuristic: values above the cutoff are treated as mg/dL
/// and converted to mmol/L; everything else is already mmol/L.
pub fn tc_to_mmol(value: f64) -> f64 {
    if value > MGDL_HEURISTIC_CUTOFF {
        value / MGDL_PER_MMOLL
    } else {
        value
    }
}

/// Round to 2 decimal places. The epsilon keeps values that sit exactly on a
/// band boundary (e.g. 1.2999999...) from banding one bucket low. NaN passes
/// through unchanged.
pub fn round2(value: f64) -> f64 {
    if value.is_nan() {
        value
    } else {
        ((value + 1e-12) * 100.0).round() / 100.0
    }
}

// ── Sex ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl Sex {
    /// Classify free-text sex labels. Case-insensitive; unrecognized labels
    /// become `Other`.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim().to_lowercase();
        if MALE_TOKENS.contains(&s.as_str()) {
            Sex::Male
        } else if FEMALE_TOKENS.contains(&s.as_str()) {
            Sex::Female
        } else {
            Sex::Other
        }
    }

    pub fn is_male(self) -> bool {
        matches!(self, Sex::Male)
    }

    /// The CCS chart only defines men's and women's tables. Every non-male
    /// row (including `Other`) is scored on the women's tables.
    pub fn scores_as_male(self) -> bool {
        self.is_male()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Other => "other",
        }
    }
}

// ── Smoking status ────────────────────────────────────────────────────────────

/// Five-level smoking status used by the mortality models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokingStatus {
    Never,
    FormerGt1,
    FormerLt1,
    CurrentLe10,
    CurrentGt10,
}

impl SmokingStatus {
    pub const ALL: [SmokingStatus; 5] = [
        SmokingStatus::Never,
        SmokingStatus::FormerGt1,
        SmokingStatus::FormerLt1,
        SmokingStatus::CurrentLe10,
        SmokingStatus::CurrentGt10,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SmokingStatus::Never => "never",
            SmokingStatus::FormerGt1 => "former_gt1",
            SmokingStatus::FormerLt1 => "former_lt1",
            SmokingStatus::CurrentLe10 => "current_le10",
            SmokingStatus::CurrentGt10 => "current_gt10",
        }
    }

    pub fn is_current(self) -> bool {
        matches!(self, SmokingStatus::CurrentLe10 | SmokingStatus::CurrentGt10)
    }

    /// Best-effort classification of a smoking label, with a boolean smoker
    /// flag as last resort.
    ///
    /// Exact tokens match first, then human labels ("Former >1 yr",
    /// "current, less than 10/day"). A bare "current" with no intensity is
    /// bucketed into the heavier group. With no usable label at all, a true
    /// smoker flag means `CurrentGt10`, otherwise `Never`.
    pub fn classify(label: Option<&str>, smoker_flag: bool) -> Self {
        if let Some(raw) = label {
            let s = raw.trim().to_lowercase();
            match s.as_str() {
                "never" => return SmokingStatus::Never,
                "former_gt1" => return SmokingStatus::FormerGt1,
                "former_lt1" => return SmokingStatus::FormerLt1,
                "current_le10" => return SmokingStatus::CurrentLe10,
                "current_gt10" => return SmokingStatus::CurrentGt10,
                _ => {}
            }

            if s.contains("never") {
                return SmokingStatus::Never;
            }
            if s.contains("former") {
                if s.contains('>') || s.contains("gt") || s.contains("1+") || s.contains("over") {
                    return SmokingStatus::FormerGt1;
                }
                if s.contains('<') || s.contains("lt") || s.contains("under") {
                    return SmokingStatus::FormerLt1;
                }
            }
            if s.contains("current") {
                if s.contains("10") && (s.contains("<=") || s.contains("le") || s.contains("less"))
                {
                    return SmokingStatus::CurrentLe10;
                }
                if s.contains("10") && (s.contains('>') || s.contains("gt") || s.contains("more"))
                {
                    return SmokingStatus::CurrentGt10;
                }
                // Known current but unknown intensity: take the heavier group
                return SmokingStatus::CurrentGt10;
            }
        }

        if smoker_flag {
            SmokingStatus::CurrentGt10
        } else {
            SmokingStatus::Never
        }
    }
}

impl std::fmt::Display for SmokingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Self-rated health ─────────────────────────────────────────────────────────

/// Five-level self-rated health category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfRatedHealth {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Poor,
}

impl SelfRatedHealth {
    pub const ALL: [SelfRatedHealth; 5] = [
        SelfRatedHealth::Excellent,
        SelfRatedHealth::VeryGood,
        SelfRatedHealth::Good,
        SelfRatedHealth::Fair,
        SelfRatedHealth::Poor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SelfRatedHealth::Excellent => "excellent",
            SelfRatedHealth::VeryGood => "very_good",
            SelfRatedHealth::Good => "good",
            SelfRatedHealth::Fair => "fair",
            SelfRatedHealth::Poor => "poor",
        }
    }

    /// Parse a self-rated-health label. Unknown labels are `None`, which
    /// propagates as an indeterminate score component.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "excellent" => Some(SelfRatedHealth::Excellent),
            "very good" | "very_good" => Some(SelfRatedHealth::VeryGood),
            "good" => Some(SelfRatedHealth::Good),
            "fair" => Some(SelfRatedHealth::Fair),
            "poor" => Some(SelfRatedHealth::Poor),
            _ => None,
        }
    }
}

impl std::fmt::Display for SelfRatedHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_bool_accepted_spellings() {
        for v in ["1", "true", "t", "yes", "y", "on", "YES", " True "] {
            assert!(parse_bool(&json!(v)), "{v:?} should be truthy");
        }
        for v in ["0", "false", "no", "n", "off", "maybe", ""] {
            assert!(!parse_bool(&json!(v)), "{v:?} should be falsy");
        }
        assert!(parse_bool(&json!(true)));
        assert!(!parse_bool(&json!(false)));
        assert!(parse_bool(&json!(1)));
        assert!(parse_bool(&json!(2.5)));
        assert!(!parse_bool(&json!(0)));
        assert!(!parse_bool(&JsonValue::Null));
    }

    #[test]
    fn test_parse_f64_never_defaults() {
        assert_eq!(parse_f64(&json!(55)), Some(55.0));
        assert_eq!(parse_f64(&json!("140.5")), Some(140.5));
        assert_eq!(parse_f64(&json!(" 7 ")), Some(7.0));
        assert_eq!(parse_f64(&json!("abc")), None);
        assert_eq!(parse_f64(&json!("")), None);
        assert_eq!(parse_f64(&JsonValue::Null), None);
        assert_eq!(parse_f64(&json!("NaN")), None);
    }

    #[test]
    fn test_tc_unit_heuristic() {
        // mmol/L passes through
        assert_eq!(tc_to_mmol(5.5), 5.5);
        assert_eq!(tc_to_mmol(20.0), 20.0);
        // mg/dL converts
        let converted = tc_to_mmol(5.5 * MGDL_PER_MMOLL);
        assert!((converted - 5.5).abs() < 1e-9);
        assert!((tc_to_mmol(200.0) - 200.0 / MGDL_PER_MMOLL).abs() < 1e-12);
    }

    #[test]
    fn test_sex_tokens() {
        for v in ["m", "M", "male", "Man", " MASCULINE "] {
            assert_eq!(Sex::parse(v), Sex::Male);
        }
        for v in ["f", "female", "Woman", "feminine"] {
            assert_eq!(Sex::parse(v), Sex::Female);
        }
        for v in ["other", "nonbinary", "", "x"] {
            assert_eq!(Sex::parse(v), Sex::Other);
        }
        assert!(!Sex::Other.scores_as_male());
        assert!(Sex::Male.scores_as_male());
    }

    #[test]
    fn test_smoking_exact_tokens() {
        assert_eq!(SmokingStatus::classify(Some("never"), true), SmokingStatus::Never);
        assert_eq!(
            SmokingStatus::classify(Some("former_gt1"), false),
            SmokingStatus::FormerGt1
        );
        assert_eq!(
            SmokingStatus::classify(Some("current_le10"), false),
            SmokingStatus::CurrentLe10
        );
    }

    #[test]
    fn test_smoking_fuzzy_labels() {
        assert_eq!(
            SmokingStatus::classify(Some("Never smoked"), false),
            SmokingStatus::Never
        );
        assert_eq!(
            SmokingStatus::classify(Some("Former (>1 yr)"), false),
            SmokingStatus::FormerGt1
        );
        assert_eq!(
            SmokingStatus::classify(Some("former, under a year"), false),
            SmokingStatus::FormerLt1
        );
        assert_eq!(
            SmokingStatus::classify(Some("current, less than 10/day"), false),
            SmokingStatus::CurrentLe10
        );
        assert_eq!(
            SmokingStatus::classify(Some("current >10 cig/day"), false),
            SmokingStatus::CurrentGt10
        );
        // Current with unknown intensity takes the heavier bucket
        assert_eq!(
            SmokingStatus::classify(Some("current"), false),
            SmokingStatus::CurrentGt10
        );
    }

    #[test]
    fn test_smoking_boolean_fallback() {
        assert_eq!(SmokingStatus::classify(None, true), SmokingStatus::CurrentGt10);
        assert_eq!(SmokingStatus::classify(None, false), SmokingStatus::Never);
        assert_eq!(SmokingStatus::classify(Some(""), true), SmokingStatus::CurrentGt10);
    }

    #[test]
    fn test_srh_labels() {
        assert_eq!(SelfRatedHealth::parse("Excellent"), Some(SelfRatedHealth::Excellent));
        assert_eq!(SelfRatedHealth::parse("very good"), Some(SelfRatedHealth::VeryGood));
        assert_eq!(SelfRatedHealth::parse("very_good"), Some(SelfRatedHealth::VeryGood));
        assert_eq!(SelfRatedHealth::parse("POOR"), Some(SelfRatedHealth::Poor));
        assert_eq!(SelfRatedHealth::parse("okay"), None);
    }

    #[test]
    fn test_round2_boundary() {
        assert_eq!(round2(1.299999999999), 1.3);
        assert_eq!(round2(0.899999999999), 0.9);
        assert!(round2(f64::NAN).is_nan());
    }
}
