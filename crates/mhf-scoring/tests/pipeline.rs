//! End-to-end generate-then-score checks over seeded cohorts.

use mhf_cohort::{
    generate_cvd_cohort, generate_mortality_cohort, CvdCohortConfig, MortalityCohortConfig,
    Sampler,
};
use mhf_scoring::{score_cvd_cohort, score_mortality_cohort, CScoreCategory};

#[test]
fn test_cvd_pipeline_scores_every_generated_row() {
    let cfg = CvdCohortConfig {
        count: 5_000,
        ..CvdCohortConfig::default()
    };
    let mut sampler = Sampler::new(Some(7));
    let rows = generate_cvd_cohort(&cfg, &mut sampler).unwrap();
    let scores = score_cvd_cohort(&rows);
    assert_eq!(scores.len(), rows.len());

    for (row, score) in rows.iter().zip(&scores) {
        // Generated rows are always complete, so every score is determinate
        let points = score.framingham_points.unwrap();
        assert!(score.framingham_risk.is_finite());
        assert!((0.9..=30.0).contains(&score.framingham_risk));
        assert!(score.mhf_risk <= score.framingham_risk);
        assert!(score.mhf_risk >= score.framingham_risk * 0.7 - 1e-9);
        assert!(score.risk_diff <= 0.0);
        // Points stay inside what the generator's ranges can produce
        assert!((-10..=40).contains(&points));
        assert!(row.met_min >= 0.0);
    }
}

#[test]
fn test_mortality_pipeline_scores_every_generated_row() {
    let cfg = MortalityCohortConfig {
        count: 5_000,
        ..MortalityCohortConfig::default()
    };
    let mut sampler = Sampler::new(Some(11));
    let rows = generate_mortality_cohort(&cfg, &mut sampler).unwrap();
    let scores = score_mortality_cohort(&rows);
    assert_eq!(scores.len(), rows.len());

    for (row, score) in rows.iter().zip(&scores) {
        // Default mortality cohort ages are 60..=90, past the Lee floor
        let points = score.lee_points.unwrap();
        assert!(points >= 1);
        assert!(score.lee_mortality_pct.is_finite());
        assert!((4.0..=64.0).contains(&score.lee_mortality_pct));

        let c = score.c_score.unwrap();
        assert!((0..=100).contains(&c));
        assert_ne!(score.c_score_category, CScoreCategory::Unknown);
        assert!(row.age.unwrap() >= 60.0);
    }
}

#[test]
fn test_same_seed_reproduces_scores() {
    let cfg = CvdCohortConfig {
        count: 500,
        ..CvdCohortConfig::default()
    };
    let run = |seed| {
        let mut sampler = Sampler::new(Some(seed));
        let rows = generate_cvd_cohort(&cfg, &mut sampler).unwrap();
        score_cvd_cohort(&rows)
    };
    let a = run(99);
    let b = run(99);
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.framingham_points, y.framingham_points);
        assert_eq!(x.framingham_risk, y.framingham_risk);
        assert_eq!(x.mhf_risk, y.mhf_risk);
    }
}

#[test]
fn test_rescoring_is_stable() {
    let cfg = MortalityCohortConfig {
        count: 500,
        ..MortalityCohortConfig::default()
    };
    let mut sampler = Sampler::new(Some(3));
    let rows = generate_mortality_cohort(&cfg, &mut sampler).unwrap();
    let first = score_mortality_cohort(&rows);
    let second = score_mortality_cohort(&rows);
    for (x, y) in first.iter().zip(&second) {
        assert_eq!(x.lee_points, y.lee_points);
        assert_eq!(x.c_score, y.c_score);
        assert_eq!(x.c_score_category, y.c_score_category);
    }
}
