//! Lee 4-year mortality index and the C-score wellness composite.
//!
//! The Lee index sums demographic, comorbidity, and functional-status points
//! and maps the total to a published 4-year mortality percentage. It is only
//! defined for ages 50 and over; younger rows score `None` / NaN. The
//! C-score sums six lifestyle components on a 0..=100 scale and, like the
//! CCS pipeline, is all-or-nothing: any missing component voids the total.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use mhf_common::normalize::{SelfRatedHealth, SmokingStatus};
use mhf_common::MortalityProfile;

use crate::bands::{band_points, Band};

// ── Lee index tables ──────────────────────────────────────────────────────────

// Ages below 60 contribute 0 points (the index still applies from 50).
const LEE_AGE_BANDS: &[Band] = &[
    (60.0, 64.0, 1),
    (65.0, 69.0, 2),
    (70.0, 74.0, 3),
    (75.0, 79.0, 4),
    (80.0, 84.0, 5),
    (85.0, 200.0, 7),
];

const LEE_MIN_AGE: f64 = 50.0;
const LEE_MALE_POINTS: i32 = 2;
const LEE_SMOKER_POINTS: i32 = 2;
const LEE_DIABETES_POINTS: i32 = 1;
const LEE_CANCER_POINTS: i32 = 2;
const LEE_COPD_POINTS: i32 = 2;
const LEE_HEART_FAILURE_POINTS: i32 = 2;
const LEE_FUNCTION_POINTS: i32 = 2;
const LEE_LOW_BMI_POINTS: i32 = 1;
const LEE_LOW_BMI_CUTOFF: f64 = 25.0;

// Point total → 4-year mortality %.
const LEE_PTS_TO_MORTALITY: &[(i32, i32, f64)] = &[
    (0, 4, 4.0),
    (5, 6, 6.0),
    (7, 8, 10.0),
    (9, 10, 15.0),
    (11, 12, 22.0),
    (13, 14, 32.0),
    (15, 16, 45.0),
    (17, 1000, 64.0),
];

// ── Lee index ─────────────────────────────────────────────────────────────────

/// Lee total points, or `None` when age is missing or below 50.
pub fn lee_points(row: &MortalityProfile) -> Option<i32> {
    let age = row.age?;
    if !age.is_finite() || age < LEE_MIN_AGE {
        return None;
    }

    let mut pts = band_points(LEE_AGE_BANDS, age.round()).unwrap_or(0);

    if row.sex.is_male() {
        pts += LEE_MALE_POINTS;
    }
    if row.smoking_status.is_current() {
        pts += LEE_SMOKER_POINTS;
    }
    if row.diabetes {
        pts += LEE_DIABETES_POINTS;
    }
    if row.non_skin_cancer {
        pts += LEE_CANCER_POINTS;
    }
    if row.copd {
        pts += LEE_COPD_POINTS;
    }
    if row.heart_failure {
        pts += LEE_HEART_FAILURE_POINTS;
    }
    if row.difficulty_bathing {
        pts += LEE_FUNCTION_POINTS;
    }
    if row.difficulty_managing_money {
        pts += LEE_FUNCTION_POINTS;
    }
    if row.difficulty_walking {
        pts += LEE_FUNCTION_POINTS;
    }
    // Low BMI adds a point; an unknown BMI simply skips the component
    if matches!(row.bmi, Some(b) if b.is_finite() && b < LEE_LOW_BMI_CUTOFF) {
        pts += LEE_LOW_BMI_POINTS;
    }

    Some(pts)
}

/// Map a Lee point total to a 4-year mortality percentage; NaN when the
/// total is unknown.
pub fn lee_mortality_pct(points: Option<i32>) -> f64 {
    let Some(points) = points else {
        return f64::NAN;
    };
    LEE_PTS_TO_MORTALITY
        .iter()
        .find(|(lo, hi, _)| *lo <= points && points <= *hi)
        .map(|(_, _, pct)| *pct)
        .unwrap_or(f64::NAN)
}

// ── C-score components ────────────────────────────────────────────────────────

fn srh_points(srh: SelfRatedHealth) -> i32 {
    match srh {
        SelfRatedHealth::Excellent => 25,
        SelfRatedHealth::VeryGood => 22,
        SelfRatedHealth::Good => 17,
        SelfRatedHealth::Fair => 8,
        SelfRatedHealth::Poor => 0,
    }
}

// WHtR, resting HR, and alcohol all award 0 outside their listed bands,
// including fractional values that fall between integer band edges.
fn whtr_points(whtr: f64) -> Option<i32> {
    if !whtr.is_finite() {
        return None;
    }
    if whtr < 0.50 {
        return Some(20);
    }
    Some(band_points(&[(0.50, 0.54, 14), (0.55, 0.59, 6)], whtr).unwrap_or(0))
}

fn rhr_points(rhr: f64) -> Option<i32> {
    if !rhr.is_finite() {
        return None;
    }
    Some(band_points(&[(50.0, 65.0, 20), (66.0, 75.0, 14), (76.0, 85.0, 7)], rhr).unwrap_or(0))
}

fn smoking_points(status: SmokingStatus) -> i32 {
    match status {
        SmokingStatus::Never => 15,
        SmokingStatus::FormerGt1 => 10,
        SmokingStatus::FormerLt1 => 5,
        SmokingStatus::CurrentLe10 => 3,
        SmokingStatus::CurrentGt10 => 0,
    }
}

fn alcohol_points(drinks_per_week: f64) -> Option<i32> {
    if !drinks_per_week.is_finite() {
        return None;
    }
    Some(
        band_points(&[(0.0, 7.0, 10), (8.0, 14.0, 7), (15.0, 21.0, 3)], drinks_per_week)
            .unwrap_or(0),
    )
}

// Sleep bands are asymmetric around the 7-8h optimum: the shoulder toward
// short sleep starts at the exact hour, the shoulder toward long sleep ends
// at it. [5,6) → 3, [6,7) → 7, [7,8] → 10, (8,9] → 7, (9,10] → 3, else 0.
fn sleep_points(hours: f64) -> Option<i32> {
    if !hours.is_finite() {
        return None;
    }
    let pts = if (7.0..=8.0).contains(&hours) {
        10
    } else if (6.0..7.0).contains(&hours) || (hours > 8.0 && hours <= 9.0) {
        7
    } else if (5.0..6.0).contains(&hours) || (hours > 9.0 && hours <= 10.0) {
        3
    } else {
        0
    };
    Some(pts)
}

// ── C-score ───────────────────────────────────────────────────────────────────

/// Total C-score (0..=100), or `None` if any component is missing.
pub fn c_score(row: &MortalityProfile) -> Option<i32> {
    let srh = srh_points(row.self_rated_health?);
    let whtr = whtr_points(row.whtr?)?;
    let rhr = rhr_points(row.resting_hr?)?;
    let smoking = smoking_points(row.smoking_status);
    let alcohol = alcohol_points(row.drinks_per_week?)?;
    let sleep = sleep_points(row.sleep_hours?)?;
    Some(srh + whtr + rhr + smoking + alcohol + sleep)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CScoreCategory {
    Excellent,
    Good,
    NeedsImprovement,
    ElevatedRisk,
    Unknown,
}

impl CScoreCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            CScoreCategory::Excellent => "Excellent, low risk",
            CScoreCategory::Good => "Good",
            CScoreCategory::NeedsImprovement => "Needs improvement",
            CScoreCategory::ElevatedRisk => "Elevated risk",
            CScoreCategory::Unknown => "unknown",
        }
    }
}

pub fn c_score_category(score: Option<i32>) -> CScoreCategory {
    match score {
        None => CScoreCategory::Unknown,
        Some(s) if s >= 90 => CScoreCategory::Excellent,
        Some(s) if s >= 75 => CScoreCategory::Good,
        Some(s) if s >= 60 => CScoreCategory::NeedsImprovement,
        Some(_) => CScoreCategory::ElevatedRisk,
    }
}

// ── Batch scoring ─────────────────────────────────────────────────────────────

/// Derived mortality columns for one row.
#[derive(Debug, Clone, Serialize)]
pub struct MortalityScore {
    pub lee_points: Option<i32>,
    pub lee_mortality_pct: f64,
    pub c_score: Option<i32>,
    pub c_score_category: CScoreCategory,
}

pub fn score_mortality_row(row: &MortalityProfile) -> MortalityScore {
    let points = lee_points(row);
    let c = c_score(row);
    MortalityScore {
        lee_points: points,
        lee_mortality_pct: lee_mortality_pct(points),
        c_score: c,
        c_score_category: c_score_category(c),
    }
}

/// Score an entire cohort in parallel; output order matches input order.
pub fn score_mortality_cohort(rows: &[MortalityProfile]) -> Vec<MortalityScore> {
    debug!(rows = rows.len(), "scoring mortality cohort");
    rows.par_iter().map(score_mortality_row).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
