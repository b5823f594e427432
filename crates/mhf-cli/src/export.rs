//! CSV export of scored cohorts.
//!
//! Records are written by hand rather than through serde so that input
//! columns and derived score columns land side by side in one row, and so
//! indeterminate values (`None` points, NaN percentages) become empty cells
//! instead of literal "NaN" text.

use std::io::Write;

use anyhow::Result;

use mhf_common::normalize::round2;
use mhf_common::{CvdProfile, MortalityProfile};
use mhf_scoring::{CvdScore, MortalityScore};

const CVD_HEADER: &[&str] = &[
    "age",
    "sex",
    "bmi",
    "cvd",
    "sbp",
    "on_bp_meds",
    "tc",
    "hdl",
    "diabetes",
    "smoker",
    "met_min",
    "framingham_points",
    "framingham_risk",
    "mhf_risk",
    "risk_diff",
];

const MORTALITY_HEADER: &[&str] = &[
    "age",
    "sex",
    "bmi",
    "smoking_status",
    "smoker",
    "diabetes",
    "non_skin_cancer",
    "copd",
    "heart_failure",
    "difficulty_bathing",
    "difficulty_managing_money",
    "difficulty_walking",
    "self_rated_health",
    "whtr",
    "resting_hr",
    "drinks_per_week",
    "sleep_hours",
    "lee_points",
    "lee_4yr_mortality_pct",
    "c_score",
    "c_score_category",
];

pub fn write_cvd_csv<W: Write>(
    out: W,
    rows: &[CvdProfile],
    scores: &[CvdScore],
) -> Result<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(CVD_HEADER)?;
    for (row, score) in rows.iter().zip(scores) {
        w.write_record(&[
            opt_num(row.age),
            row.sex.as_str().to_string(),
            opt_num(row.bmi),
            row.cvd.to_string(),
            opt_num(row.sbp),
            row.on_bp_meds.to_string(),
            opt_num(row.tc),
            opt_num(row.hdl),
            row.diabetes.to_string(),
            row.smoker.to_string(),
            row.met_min.to_string(),
            opt_int(score.framingham_points),
            pct(score.framingham_risk),
            pct(score.mhf_risk),
            pct(score.risk_diff),
        ])?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_mortality_csv<W: Write>(
    out: W,
    rows: &[MortalityProfile],
    scores: &[MortalityScore],
) -> Result<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(MORTALITY_HEADER)?;
    for (row, score) in rows.iter().zip(scores) {
        w.write_record(&[
            opt_num(row.age),
            row.sex.as_str().to_string(),
            opt_num(row.bmi),
            row.smoking_status.as_str().to_string(),
            row.smoker.to_string(),
            row.diabetes.to_string(),
            row.non_skin_cancer.to_string(),
            row.copd.to_string(),
            row.heart_failure.to_string(),
            row.difficulty_bathing.to_string(),
            row.difficulty_managing_money.to_string(),
            row.difficulty_walking.to_string(),
            row.self_rated_health.map(|s| s.as_str().to_string()).unwrap_or_default(),
            opt_num(row.whtr),
            opt_num(row.resting_hr),
            opt_num(row.drinks_per_week),
            opt_num(row.sleep_hours),
            opt_int(score.lee_points),
            pct(score.lee_mortality_pct),
            opt_int(score.c_score),
            score.c_score_category.as_str().to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

fn opt_num(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => x.to_string(),
        _ => String::new(),
    }
}

fn opt_int(v: Option<i32>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

/// Percentages are reported to two decimals; NaN becomes an empty cell.
fn pct(v: f64) -> String {
    if v.is_finite() {
        round2(v).to_string()
    } else {
        String::new()
    }
}
