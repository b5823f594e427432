//! Mortality cohort assembler.

use tracing::info;

use mhf_common::normalize::{SelfRatedHealth, SmokingStatus};
use mhf_common::{MortalityProfile, Result};

use crate::config::MortalityCohortConfig;
use crate::cvd::{sex_from_index, sex_weights};
use crate::sampler::Sampler;

/// Generate a synthetic mortality cohort.
///
/// Numeric fields are drawn independently, then WHtR is coupled to BMI (see
/// [`couple_whtr_to_bmi`]). Smoking and self-rated health are 5-way
/// categorical draws; the current-smoker flag is derived from the smoking
/// category. Age and resting heart rate round to whole numbers; alcohol and
/// sleep round to one decimal.
pub fn generate_mortality_cohort(
    cfg: &MortalityCohortConfig,
    sampler: &mut Sampler,
) -> Result<Vec<MortalityProfile>> {
    cfg.validate()?;
    let n = cfg.count;
    info!(count = n, "generating mortality cohort");

    let age = sampler.sample(&cfg.distributions.age, cfg.ranges.age.low, cfg.ranges.age.high, n)?;
    let bmi = sampler.sample(&cfg.distributions.bmi, cfg.ranges.bmi.low, cfg.ranges.bmi.high, n)?;
    let whtr_base = sampler.sample(
        &cfg.distributions.whtr,
        cfg.ranges.whtr.low,
        cfg.ranges.whtr.high,
        n,
    )?;
    let resting_hr = sampler.sample(
        &cfg.distributions.resting_hr,
        cfg.ranges.resting_hr.low,
        cfg.ranges.resting_hr.high,
        n,
    )?;
    let drinks = sampler.sample(
        &cfg.distributions.drinks_per_week,
        cfg.ranges.drinks_per_week.low,
        cfg.ranges.drinks_per_week.high,
        n,
    )?;
    let sleep = sampler.sample(
        &cfg.distributions.sleep_hours,
        cfg.ranges.sleep_hours.low,
        cfg.ranges.sleep_hours.high,
        n,
    )?;

    let whtr = couple_whtr_to_bmi(
        &whtr_base,
        &bmi,
        cfg.whtr_bmi_coupling,
        cfg.ranges.whtr.low,
        cfg.ranges.whtr.high,
    );

    let sex = sampler.categorical(&sex_weights(cfg.rates.sex_male, cfg.rates.sex_female), n)?;
    let smoking = sampler.categorical(&cfg.smoking.as_weights(), n)?;
    let srh = sampler.categorical(&cfg.self_rated_health.as_weights(), n)?;

    let diabetes = sampler.bernoulli(cfg.rates.diabetes / 100.0, n);
    let non_skin_cancer = sampler.bernoulli(cfg.rates.non_skin_cancer / 100.0, n);
    let copd = sampler.bernoulli(cfg.rates.copd / 100.0, n);
    let heart_failure = sampler.bernoulli(cfg.rates.heart_failure / 100.0, n);
    let difficulty_bathing = sampler.bernoulli(cfg.rates.difficulty_bathing / 100.0, n);
    let difficulty_managing_money =
        sampler.bernoulli(cfg.rates.difficulty_managing_money / 100.0, n);
    let difficulty_walking = sampler.bernoulli(cfg.rates.difficulty_walking / 100.0, n);

    let rows = (0..n)
        .map(|i| {
            let smoking_status = SmokingStatus::ALL[smoking[i]];
            MortalityProfile {
                age: Some(age[i].round()),
                sex: sex_from_index(sex[i]),
                bmi: Some(bmi[i]),
                smoking_status,
                smoker: smoking_status.is_current(),
                diabetes: diabetes[i],
                non_skin_cancer: non_skin_cancer[i],
                copd: copd[i],
                heart_failure: heart_failure[i],
                difficulty_bathing: difficulty_bathing[i],
                difficulty_managing_money: difficulty_managing_money[i],
                difficulty_walking: difficulty_walking[i],
                self_rated_health: Some(SelfRatedHealth::ALL[srh[i]]),
                whtr: Some(whtr[i]),
                resting_hr: Some(resting_hr[i].round()),
                drinks_per_week: Some(round1(drinks[i])),
                sleep_hours: Some(round1(sleep[i])),
            }
        })
        .collect();
    Ok(rows)
}

/// Shift each WHtR by `k·(bmi − mean(bmi))`, clipped back into bounds.
///
/// The anchor is the generated cohort's own BMI sample mean, not an external
/// reference, so the WHtR distribution is circular in the same draw's BMI.
/// That is intentional: this is a population-level correlation knob, not a
/// per-row causal model. Kept in one named function so the choice can be
/// revisited independently.
pub fn couple_whtr_to_bmi(whtr_base: &[f64], bmi: &[f64], k: f64, low: f64, high: f64) -> Vec<f64> {
    if bmi.is_empty() {
        return Vec::new();
    }
    let mean_bmi = bmi.iter().sum::<f64>() / bmi.len() as f64;
    whtr_base
        .iter()
        .zip(bmi)
        .map(|(w, b)| (w + k * (b - mean_bmi)).clamp(low, high))
        .collect()
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

// ── Tests ─────────────────────────────────────────────────────────────────────
