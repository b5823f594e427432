//! mhf-scoring — Deterministic, table-driven risk and mortality scoring.
//!
//! Two independent row-wise pipelines over typed profiles: the CCS
//! cardiovascular point chart (plus the activity-adjusted MHF derivative)
//! and the Lee 4-year mortality index (plus the C-score wellness composite).
//! All scoring is stateless; batch entry points map rows in parallel.

pub mod bands;
pub mod framingham;
pub mod mortality;

pub use framingham::{
    framingham_points, framingham_risk, mhf_risk, score_cvd_cohort, score_cvd_row, CvdScore,
};
pub use mortality::{
    c_score, c_score_category, lee_mortality_pct, lee_points, score_mortality_cohort,
    score_mortality_row, CScoreCategory, MortalityScore,
};
