//! CVD cohort assembler.

use tracing::info;

use mhf_common::normalize::Sex;
use mhf_common::{CvdProfile, Result};

use crate::config::CvdCohortConfig;
use crate::sampler::Sampler;

/// Generate a synthetic CVD cohort.
///
/// Each numeric field is drawn independently per its configured distribution
/// and bounds; sex is a 3-way categorical with the "other" share derived as
/// the residual of the male/female percentages; the four condition flags are
/// independent Bernoulli draws. Rows on BP medication get `sbp_meds_shift`
/// subtracted from their sampled SBP before the row is assembled.
pub fn generate_cvd_cohort(cfg: &CvdCohortConfig, sampler: &mut Sampler) -> Result<Vec<CvdProfile>> {
    cfg.validate()?;
    let n = cfg.count;
    info!(count = n, "generating CVD cohort");

    let age = sampler.sample(&cfg.distributions.age, cfg.ranges.age.low, cfg.ranges.age.high, n)?;
    let bmi = sampler.sample(&cfg.distributions.bmi, cfg.ranges.bmi.low, cfg.ranges.bmi.high, n)?;
    let sbp = sampler.sample(&cfg.distributions.sbp, cfg.ranges.sbp.low, cfg.ranges.sbp.high, n)?;
    let tc = sampler.sample(&cfg.distributions.tc, cfg.ranges.tc.low, cfg.ranges.tc.high, n)?;
    let hdl = sampler.sample(&cfg.distributions.hdl, cfg.ranges.hdl.low, cfg.ranges.hdl.high, n)?;
    let met_min = sampler.sample(
        &cfg.distributions.met_min,
        cfg.ranges.met_min.low,
        cfg.ranges.met_min.high,
        n,
    )?;

    let sex = sampler.categorical(&sex_weights(cfg.rates.sex_male, cfg.rates.sex_female), n)?;
    let cvd = sampler.bernoulli(cfg.rates.cvd / 100.0, n);
    let on_bp_meds = sampler.bernoulli(cfg.rates.on_bp_meds / 100.0, n);
    let diabetes = sampler.bernoulli(cfg.rates.diabetes / 100.0, n);
    let smoker = sampler.bernoulli(cfg.rates.smoker / 100.0, n);

    let rows = (0..n)
        .map(|i| CvdProfile {
            age: Some(age[i].round()),
            sex: sex_from_index(sex[i]),
            bmi: Some(bmi[i]),
            cvd: cvd[i],
            sbp: Some(sbp[i] - if on_bp_meds[i] { cfg.sbp_meds_shift } else { 0.0 }),
            on_bp_meds: on_bp_meds[i],
            tc: Some(tc[i]),
            hdl: Some(hdl[i]),
            diabetes: diabetes[i],
            smoker: smoker[i],
            met_min: met_min[i],
        })
        .collect();
    Ok(rows)
}

/// Male/female percentages with the residual share going to "other".
pub(crate) fn sex_weights(male_pct: f64, female_pct: f64) -> [f64; 3] {
    [
        male_pct / 100.0,
        female_pct / 100.0,
        (1.0 - (male_pct + female_pct) / 100.0).max(0.0),
    ]
}

pub(crate) fn sex_from_index(idx: usize) -> Sex {
    match idx {
        0 => Sex::Male,
        1 => Sex::Female,
        _ => Sex::Other,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Range;

    #[test]
    fn test_cohort_fields_in_bounds() {
        let cfg = CvdCohortConfig {
            count: 2_000,
            ..CvdCohortConfig::default()
        };
        let mut sampler = Sampler::new(Some(42));
        let rows = generate_cvd_cohort(&cfg, &mut sampler).unwrap();
        assert_eq!(rows.len(), 2_000);
        for row in &rows {
            let age = row.age.unwrap();
            assert!(age >= cfg.ranges.age.low && age <= cfg.ranges.age.high);
            assert_eq!(age, age.round(), "age rounds to whole years");
            let tc = row.tc.unwrap();
            assert!(tc >= cfg.ranges.tc.low && tc <= cfg.ranges.tc.high);
            assert!(row.met_min >= 0.0 && row.met_min <= cfg.ranges.met_min.high);
        }
    }

    #[test]
    fn test_sbp_shift_only_applies_to_treated_rows() {
        let mut cfg = CvdCohortConfig {
            count: 4_000,
            sbp_meds_shift: 10.0,
            ..CvdCohortConfig::default()
        };
        // Degenerate SBP range pins every sample to 140 so the shift is visible
        cfg.ranges.sbp = Range::new(140.0, 140.0);
        cfg.rates.on_bp_meds = 50.0;
        let mut sampler = Sampler::new(Some(7));
        let rows = generate_cvd_cohort(&cfg, &mut sampler).unwrap();
        for row in &rows {
            let expected = if row.on_bp_meds { 130.0 } else { 140.0 };
            assert_eq!(row.sbp, Some(expected));
        }
        assert!(rows.iter().any(|r| r.on_bp_meds));
        assert!(rows.iter().any(|r| !r.on_bp_meds));
    }

    #[test]
    fn test_residual_other_share() {
        assert_eq!(sex_weights(75.0, 25.0)[2], 0.0);
        let w = sex_weights(40.0, 40.0);
        assert!((w[2] - 0.2).abs() < 1e-12);
        // Over-specified splits never go negative; the sampler renormalizes
        assert_eq!(sex_weights(80.0, 40.0)[2], 0.0);
    }

    #[test]
    fn test_sex_mix_converges() {
        let cfg = CvdCohortConfig {
            count: 100_000,
            ..CvdCohortConfig::default()
        };
        let mut sampler = Sampler::new(Some(11));
        let rows = generate_cvd_cohort(&cfg, &mut sampler).unwrap();
        let male = rows.iter().filter(|r| r.sex == Sex::Male).count() as f64 / rows.len() as f64;
        assert!((male - 0.75).abs() < 0.01, "male fraction off: {male}");
    }
}
