//! CCS cardiovascular point chart and the MHF activity adjustment.
//!
//! Six components (age, HDL, total cholesterol, systolic BP × treatment,
//! smoking, diabetes) are banded against sex-specific tables and summed; the
//! total maps to a 10-year risk percentage. Validity is all-or-nothing: if
//! any component cannot be computed from the row, the whole score is
//! indeterminate (`None` points, NaN percent) — never a partial sum.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use mhf_common::normalize::{round2, tc_to_mmol};
use mhf_common::CvdProfile;

use crate::bands::{band_points, threshold_points, Band};

// ── Point tables ──────────────────────────────────────────────────────────────

// Age points by lower-bound threshold. Ages below 30 take the 30–34 bucket's
// 0 points rather than failing.
const AGE_THRESHOLDS_MEN: &[(f64, i32)] = &[
    (0.0, 0),
    (30.0, 0),
    (35.0, 2),
    (40.0, 5),
    (45.0, 6),
    (50.0, 8),
    (55.0, 10),
    (60.0, 11),
    (65.0, 12),
    (70.0, 14),
    (75.0, 15),
];
const AGE_THRESHOLDS_WOMEN: &[(f64, i32)] = &[
    (0.0, 0),
    (30.0, 0),
    (35.0, 2),
    (40.0, 4),
    (45.0, 5),
    (50.0, 7),
    (55.0, 8),
    (60.0, 9),
    (65.0, 10),
    (70.0, 11),
    (75.0, 12),
];

// HDL (mmol/L, rounded to 2 decimals before banding; sex-independent).
const HDL_BANDS: &[Band] = &[
    (f64::NEG_INFINITY, 0.89, 2),
    (0.90, 1.19, 1),
    (1.20, 1.29, 0),
    (1.30, 1.59, -1),
    (1.60, f64::INFINITY, -2),
];

// Total cholesterol (mmol/L, rounded to 2 decimals; sex-specific).
const TC_BANDS_MEN: &[Band] = &[
    (f64::NEG_INFINITY, 4.09, 0),
    (4.10, 5.19, 1),
    (5.20, 6.19, 2),
    (6.20, 7.19, 3),
    (7.20, f64::INFINITY, 4),
];
const TC_BANDS_WOMEN: &[Band] = &[
    (f64::NEG_INFINITY, 4.09, 0),
    (4.10, 5.19, 1),
    (5.20, 6.19, 3),
    (6.20, 7.19, 4),
    (7.20, f64::INFINITY, 5),
];

// Systolic BP (mmHg, rounded to the nearest integer; keyed sex × treatment).
const SBP_MEN_TREATED: &[Band] = &[
    (0.0, 119.0, 0),
    (120.0, 129.0, 2),
    (130.0, 139.0, 3),
    (140.0, 149.0, 4),
    (150.0, 159.0, 4),
    (160.0, f64::INFINITY, 5),
];
const SBP_MEN_UNTREATED: &[Band] = &[
    (0.0, 119.0, -2),
    (120.0, 129.0, 0),
    (130.0, 139.0, 1),
    (140.0, 149.0, 2),
    (150.0, 159.0, 2),
    (160.0, f64::INFINITY, 3),
];
const SBP_WOMEN_TREATED: &[Band] = &[
    (0.0, 119.0, -1),
    (120.0, 129.0, 2),
    (130.0, 139.0, 3),
    (140.0, 149.0, 5),
    (150.0, 159.0, 6),
    (160.0, f64::INFINITY, 7),
];
const SBP_WOMEN_UNTREATED: &[Band] = &[
    (0.0, 119.0, -3),
    (120.0, 129.0, 0),
    (130.0, 139.0, 1),
    (140.0, 149.0, 2),
    (150.0, 159.0, 4),
    (160.0, f64::INFINITY, 5),
];

const SMOKER_POINTS_MEN: i32 = 4;
const SMOKER_POINTS_WOMEN: i32 = 3;
const DIABETES_POINTS_MEN: i32 = 3;
const DIABETES_POINTS_WOMEN: i32 = 4;

// Total points → 10-year risk %, stored densely from the minimum key so an
// interior total can never miss the table and silently saturate. Totals
// below the minimum clamp to the first entry; totals at or past the end
// saturate at 30.0 (the chart's ">30%").
const RISK_MIN_POINTS: i32 = -3;
const RISK_SATURATION_PCT: f64 = 30.0;
const RISK_PCT_MEN: [f64; 21] = [
    0.9, 1.1, 1.4, 1.6, 1.9, 2.3, 2.8, 3.3, 3.9, 4.7, 5.6, 6.7, 7.9, 9.4, 11.2, 13.2, 15.6, 18.4,
    21.6, 25.3, 29.4,
];
const RISK_PCT_WOMEN: [f64; 24] = [
    0.9, 0.9, 1.0, 1.2, 1.5, 1.7, 2.0, 2.4, 2.8, 3.3, 3.9, 4.5, 5.3, 6.3, 7.3, 8.6, 10.0, 11.7,
    13.7, 15.9, 18.5, 21.5, 24.8, 28.5,
];

/// The MET-minute discount tops out at 30% from 1000 MET-min/week.
const MET_DISCOUNT_CAP: f64 = 0.3;
const MET_DISCOUNT_SCALE: f64 = 1000.0;

// ── Component scoring ─────────────────────────────────────────────────────────

fn age_points(age: f64, male: bool) -> Option<i32> {
    if !age.is_finite() || age < 0.0 {
        return None;
    }
    let table = if male { AGE_THRESHOLDS_MEN } else { AGE_THRESHOLDS_WOMEN };
    threshold_points(table, age.round())
}

fn hdl_points(hdl_mmol: f64) -> Option<i32> {
    band_points(HDL_BANDS, round2(hdl_mmol))
}

fn tc_points(tc_mmol: f64, male: bool) -> Option<i32> {
    let table = if male { TC_BANDS_MEN } else { TC_BANDS_WOMEN };
    band_points(table, round2(tc_mmol))
}

fn sbp_points(sbp: f64, treated: bool, male: bool) -> Option<i32> {
    if !sbp.is_finite() {
        return None;
    }
    let table = match (male, treated) {
        (true, true) => SBP_MEN_TREATED,
        (true, false) => SBP_MEN_UNTREATED,
        (false, true) => SBP_WOMEN_TREATED,
        (false, false) => SBP_WOMEN_UNTREATED,
    };
    band_points(table, sbp.round())
}

// ── Row scoring ───────────────────────────────────────────────────────────────

/// Total CCS points for a row, or `None` if any required input is missing or
/// invalid.
pub fn framingham_points(row: &CvdProfile) -> Option<i32> {
    let male = row.sex.scores_as_male();
    let age_pts = age_points(row.age?, male)?;
    // TC and HDL both accept mmol/L or mg/dL
    let tc_pts = tc_points(tc_to_mmol(row.tc?), male)?;
    let hdl_pts = hdl_points(tc_to_mmol(row.hdl?))?;
    let sbp_pts = sbp_points(row.sbp?, row.on_bp_meds, male)?;
    let smoker_pts = if row.smoker {
        if male { SMOKER_POINTS_MEN } else { SMOKER_POINTS_WOMEN }
    } else {
        0
    };
    let diabetes_pts = if row.diabetes {
        if male { DIABETES_POINTS_MEN } else { DIABETES_POINTS_WOMEN }
    } else {
        0
    };
    Some(age_pts + hdl_pts + tc_pts + sbp_pts + smoker_pts + diabetes_pts)
}

/// Map a point total to a 10-year risk percentage.
pub fn risk_from_points(points: i32, male: bool) -> f64 {
    let table: &[f64] = if male { &RISK_PCT_MEN } else { &RISK_PCT_WOMEN };
    let idx = points - RISK_MIN_POINTS;
    if idx < 0 {
        table[0]
    } else if idx as usize >= table.len() {
        RISK_SATURATION_PCT
    } else {
        table[idx as usize]
    }
}

/// 10-year CVD risk percentage for a row; NaN when indeterminate.
pub fn framingham_risk(row: &CvdProfile) -> f64 {
    match framingham_points(row) {
        Some(points) => risk_from_points(points, row.sex.scores_as_male()),
        None => f64::NAN,
    }
}

/// MHF risk: the CCS percentage discounted for physical activity.
///
/// Always starts from the base percentage — prior CVD history does not
/// override it. NaN propagates from an indeterminate base.
pub fn mhf_risk(row: &CvdProfile) -> f64 {
    let base = framingham_risk(row);
    let reduction = MET_DISCOUNT_CAP.min(MET_DISCOUNT_CAP * row.met_min / MET_DISCOUNT_SCALE);
    (base * (1.0 - reduction)).clamp(0.0, 100.0)
}

// ── Batch scoring ─────────────────────────────────────────────────────────────

/// Derived CVD columns for one row.
#[derive(Debug, Clone, Serialize)]
pub struct CvdScore {
    /// Raw point total; `None` signals "not computable".
    pub framingham_points: Option<i32>,
    pub framingham_risk: f64,
    pub mhf_risk: f64,
    pub risk_diff: f64,
}

pub fn score_cvd_row(row: &CvdProfile) -> CvdScore {
    let framingham = framingham_risk(row);
    let mhf = mhf_risk(row);
    CvdScore {
        framingham_points: framingham_points(row),
        framingham_risk: framingham,
        mhf_risk: mhf,
        risk_diff: mhf - framingham,
    }
}

/// Score an entire cohort. Rows are independent, so this is a parallel map;
/// output order matches input order.
pub fn score_cvd_cohort(rows: &[CvdProfile]) -> Vec<CvdScore> {
    debug!(rows = rows.len(), "scoring cvd cohort");
    rows.par_iter().map(score_cvd_row).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::is_well_formed;
    use mhf_common::normalize::{Sex, MGDL_PER_MMOLL};

    fn row(sex: Sex, age: f64, tc: f64, hdl: f64, sbp: f64, treated: bool, smoker: bool, diabetes: bool) -> CvdProfile {
        CvdProfile {
            age: Some(age),
            sex,
            bmi: Some(27.0),
            cvd: false,
            sbp: Some(sbp),
            on_bp_meds: treated,
            tc: Some(tc),
            hdl: Some(hdl),
            diabetes,
            smoker,
            met_min: 0.0,
        }
    }

    #[test]
    fn test_tables_well_formed() {
        for bands in [
            HDL_BANDS,
            TC_BANDS_MEN,
            TC_BANDS_WOMEN,
            SBP_MEN_TREATED,
            SBP_MEN_UNTREATED,
            SBP_WOMEN_TREATED,
            SBP_WOMEN_UNTREATED,
        ] {
            assert!(is_well_formed(bands));
        }
    }

    #[test]
    fn test_golden_fixture_male_55() {
        // age 10, TC +2, HDL −1, SBP +2 (untreated), smoker +4, diabetes 0
        let r = row(Sex::Male, 55.0, 5.2, 1.3, 140.0, false, true, false);
        assert_eq!(framingham_points(&r), Some(17));
        assert_eq!(framingham_risk(&r), 29.4);
    }

    #[test]
    fn test_treated_male_saturates() {
        // age 10, TC +2, HDL +1, SBP +4 (treated), smoker +4 → 21 ≥ 18 ⇒ >30%
        let r = row(Sex::Male, 55.0, 5.5, 1.1, 140.0, true, true, false);
        assert_eq!(framingham_points(&r), Some(21));
        assert_eq!(framingham_risk(&r), 30.0);
    }

    #[test]
    fn test_female_tables_differ() {
        let m = row(Sex::Male, 60.0, 6.3, 1.0, 150.0, true, false, true);
        let f = row(Sex::Female, 60.0, 6.3, 1.0, 150.0, true, false, true);
        // men: 11 + 3 + 1 + 4 + 0 + 3 = 22; women: 9 + 4 + 1 + 6 + 0 + 4 = 24
        assert_eq!(framingham_points(&m), Some(22));
        assert_eq!(framingham_points(&f), Some(24));
        // both past their saturation ceiling
        assert_eq!(framingham_risk(&m), 30.0);
        assert_eq!(framingham_risk(&f), 30.0);
    }

    #[test]
    fn test_other_sex_scores_on_womens_tables() {
        let f = row(Sex::Female, 55.0, 5.2, 1.3, 140.0, false, true, false);
        let o = row(Sex::Other, 55.0, 5.2, 1.3, 140.0, false, true, false);
        assert_eq!(framingham_points(&f), framingham_points(&o));
    }

    #[test]
    fn test_low_tail_clamps_to_minimum_entry() {
        // age 0, HDL −2, TC 0, SBP −2 (untreated <120) ⇒ total −4, below −3
        let r = row(Sex::Male, 25.0, 3.0, 1.7, 110.0, false, false, false);
        assert_eq!(framingham_points(&r), Some(-4));
        assert_eq!(framingham_risk(&r), 0.9);
    }

    #[test]
    fn test_young_age_maps_to_lowest_bucket() {
        let r = row(Sex::Female, 22.0, 5.2, 1.25, 125.0, false, false, false);
        // age 0, TC +3, HDL 0, SBP 0
        assert_eq!(framingham_points(&r), Some(3));
    }

    #[test]
    fn test_unit_robustness_tc() {
        let mmol = row(Sex::Male, 55.0, 5.5, 1.3, 140.0, false, false, false);
        let mgdl = row(Sex::Male, 55.0, 5.5 * MGDL_PER_MMOLL, 1.3, 140.0, false, false, false);
        assert_eq!(framingham_points(&mmol), framingham_points(&mgdl));
    }

    #[test]
    fn test_all_or_nothing_validity() {
        let mut r = row(Sex::Male, 55.0, 5.2, 1.3, 140.0, false, true, false);
        r.age = None;
        assert_eq!(framingham_points(&r), None);
        assert!(framingham_risk(&r).is_nan());
        assert!(mhf_risk(&r).is_nan());

        let mut r = row(Sex::Male, 55.0, 5.2, 1.3, 140.0, false, true, false);
        r.hdl = None;
        assert_eq!(framingham_points(&r), None);
    }

    #[test]
    fn test_negative_age_is_indeterminate() {
        let r = row(Sex::Male, -5.0, 5.2, 1.3, 140.0, false, false, false);
        assert_eq!(framingham_points(&r), None);
    }

    #[test]
    fn test_mhf_discount_saturation() {
        let mut r = row(Sex::Male, 55.0, 5.2, 1.3, 140.0, false, true, false);

        r.met_min = 0.0;
        assert_eq!(mhf_risk(&r), framingham_risk(&r));

        r.met_min = 500.0;
        assert!((mhf_risk(&r) - framingham_risk(&r) * 0.85).abs() < 1e-12);

        r.met_min = 1000.0;
        assert!((mhf_risk(&r) - framingham_risk(&r) * 0.7).abs() < 1e-12);

        // Past 1000 MET-min/week the discount stays capped at 30%
        r.met_min = 5000.0;
        assert!((mhf_risk(&r) - framingham_risk(&r) * 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_mhf_ignores_cvd_history() {
        let mut with_cvd = row(Sex::Male, 55.0, 5.2, 1.3, 140.0, false, true, false);
        with_cvd.cvd = true;
        with_cvd.met_min = 1000.0;
        let mut without = with_cvd.clone();
        without.cvd = false;
        assert_eq!(mhf_risk(&with_cvd), mhf_risk(&without));
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let r = row(Sex::Female, 61.0, 212.7, 50.0, 151.0, true, true, true);
        let first = score_cvd_row(&r);
        let second = score_cvd_row(&r);
        assert_eq!(first.framingham_points, second.framingham_points);
        assert_eq!(first.framingham_risk, second.framingham_risk);
        assert_eq!(first.mhf_risk, second.mhf_risk);
    }

    #[test]
    fn test_indeterminate_score_serializes_as_null() {
        let mut r = row(Sex::Male, 55.0, 5.2, 1.3, 140.0, false, true, false);
        r.tc = None;
        let v = serde_json::to_value(score_cvd_row(&r)).unwrap();
        assert!(v["framingham_points"].is_null());
        assert!(v["framingham_risk"].is_null()); // NaN has no JSON form
        assert!(v["mhf_risk"].is_null());
    }

    #[test]
    fn test_batch_preserves_order() {
        let rows = vec![
            row(Sex::Male, 55.0, 5.2, 1.3, 140.0, false, true, false),
            row(Sex::Female, 40.0, 4.0, 1.6, 118.0, false, false, false),
        ];
        let scores = score_cvd_cohort(&rows);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].framingham_points, Some(17));
        // women: age 4, TC 0, HDL −2, SBP −3 ⇒ −1 ⇒ 1.0%
        assert_eq!(scores[1].framingham_points, Some(-1));
        assert_eq!(scores[1].framingham_risk, 1.0);
    }
}
