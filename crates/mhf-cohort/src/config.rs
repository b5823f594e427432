//! Cohort generation configuration.
//!
//! Loaded from TOML (or built in code); every section has sensible defaults
//! so a partial config works. Validation is fail-fast: a reversed range or
//! an out-of-range percentage is a caller contract violation, not something
//! to sample around.

use serde::{Deserialize, Serialize};

use mhf_common::{MhfError, Result};

use crate::spec::DistributionSpec;

/// Inclusive sampling bounds for one numeric field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Range {
    pub low: f64,
    pub high: f64,
}

impl Range {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn validate(&self, field: &str) -> Result<()> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(MhfError::Config(format!(
                "{field}: range bounds must be finite, got [{}, {}]",
                self.low, self.high
            )));
        }
        if self.low > self.high {
            return Err(MhfError::Config(format!(
                "{field}: range low {} > high {}",
                self.low, self.high
            )));
        }
        Ok(())
    }
}

fn validate_pct(field: &str, pct: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&pct) {
        return Err(MhfError::Config(format!(
            "{field}: percentage must be in [0, 100], got {pct}"
        )));
    }
    Ok(())
}

fn default_count() -> usize {
    10_000
}

// ── CVD cohort ────────────────────────────────────────────────────────────────

/// Configuration for the CVD (CCS / MHF) cohort assembler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvdCohortConfig {
    /// Number of synthetic patients.
    #[serde(default = "default_count")]
    pub count: usize,

    #[serde(default)]
    pub ranges: CvdRanges,

    #[serde(default)]
    pub distributions: CvdDistributions,

    #[serde(default)]
    pub rates: CvdRates,

    /// Subtracted from SBP for rows on BP medication, after sampling and
    /// before scoring.
    #[serde(default)]
    pub sbp_meds_shift: f64,
}

impl Default for CvdCohortConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            ranges: CvdRanges::default(),
            distributions: CvdDistributions::default(),
            rates: CvdRates::default(),
            sbp_meds_shift: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CvdRanges {
    pub age: Range,
    pub bmi: Range,
    pub sbp: Range,
    pub tc: Range,
    pub hdl: Range,
    pub met_min: Range,
}

impl Default for CvdRanges {
    fn default() -> Self {
        Self {
            age: Range::new(18.0, 60.0),
            bmi: Range::new(18.0, 38.0),
            sbp: Range::new(120.0, 150.0),
            tc: Range::new(3.5, 7.5),
            hdl: Range::new(0.9, 2.0),
            met_min: Range::new(0.0, 3000.0),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CvdDistributions {
    pub age: DistributionSpec,
    pub bmi: DistributionSpec,
    pub sbp: DistributionSpec,
    pub tc: DistributionSpec,
    pub hdl: DistributionSpec,
    pub met_min: DistributionSpec,
}

/// Categorical percentages (0–100). The "other" sex share is derived as the
/// residual `max(0, 100 − male − female)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CvdRates {
    pub sex_male: f64,
    pub sex_female: f64,
    pub cvd: f64,
    pub on_bp_meds: f64,
    pub diabetes: f64,
    pub smoker: f64,
}

impl Default for CvdRates {
    fn default() -> Self {
        Self {
            sex_male: 75.0,
            sex_female: 25.0,
            cvd: 10.0,
            on_bp_meds: 30.0,
            diabetes: 25.0,
            smoker: 15.0,
        }
    }
}

impl CvdCohortConfig {
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(MhfError::Config("count must be > 0".to_string()));
        }
        self.ranges.age.validate("age")?;
        self.ranges.bmi.validate("bmi")?;
        self.ranges.sbp.validate("sbp")?;
        self.ranges.tc.validate("tc")?;
        self.ranges.hdl.validate("hdl")?;
        self.ranges.met_min.validate("met_min")?;

        self.distributions.age.validate("age")?;
        self.distributions.bmi.validate("bmi")?;
        self.distributions.sbp.validate("sbp")?;
        self.distributions.tc.validate("tc")?;
        self.distributions.hdl.validate("hdl")?;
        self.distributions.met_min.validate("met_min")?;

        validate_pct("sex_male", self.rates.sex_male)?;
        validate_pct("sex_female", self.rates.sex_female)?;
        validate_pct("cvd", self.rates.cvd)?;
        validate_pct("on_bp_meds", self.rates.on_bp_meds)?;
        validate_pct("diabetes", self.rates.diabetes)?;
        validate_pct("smoker", self.rates.smoker)?;
        Ok(())
    }
}

// ── Mortality cohort ──────────────────────────────────────────────────────────

/// Configuration for the mortality (Lee / C-score) cohort assembler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortalityCohortConfig {
    #[serde(default = "default_count")]
    pub count: usize,

    #[serde(default)]
    pub ranges: MortalityRanges,

    #[serde(default)]
    pub distributions: MortalityDistributions,

    #[serde(default)]
    pub rates: MortalityRates,

    #[serde(default)]
    pub smoking: SmokingRates,

    #[serde(default)]
    pub self_rated_health: SelfRatedHealthRates,

    /// WHtR-to-BMI coupling constant `k` in
    /// `whtr = clip(whtr_base + k·(bmi − mean(bmi)), low, high)`.
    #[serde(default = "default_whtr_coupling")]
    pub whtr_bmi_coupling: f64,
}

fn default_whtr_coupling() -> f64 {
    0.002
}

impl Default for MortalityCohortConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            ranges: MortalityRanges::default(),
            distributions: MortalityDistributions::default(),
            rates: MortalityRates::default(),
            smoking: SmokingRates::default(),
            self_rated_health: SelfRatedHealthRates::default(),
            whtr_bmi_coupling: default_whtr_coupling(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MortalityRanges {
    pub age: Range,
    pub bmi: Range,
    pub whtr: Range,
    pub resting_hr: Range,
    pub drinks_per_week: Range,
    pub sleep_hours: Range,
}

impl Default for MortalityRanges {
    fn default() -> Self {
        Self {
            age: Range::new(60.0, 90.0),
            bmi: Range::new(18.0, 35.0),
            whtr: Range::new(0.45, 0.65),
            resting_hr: Range::new(55.0, 95.0),
            drinks_per_week: Range::new(0.0, 14.0),
            sleep_hours: Range::new(6.0, 9.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MortalityDistributions {
    pub age: DistributionSpec,
    pub bmi: DistributionSpec,
    pub whtr: DistributionSpec,
    pub resting_hr: DistributionSpec,
    pub drinks_per_week: DistributionSpec,
    pub sleep_hours: DistributionSpec,
}

impl Default for MortalityDistributions {
    fn default() -> Self {
        Self {
            age: DistributionSpec::uniform(),
            bmi: DistributionSpec::uniform(),
            whtr: DistributionSpec::normal(0.55, 0.06),
            resting_hr: DistributionSpec::normal(70.0, 10.0),
            drinks_per_week: DistributionSpec::beta(2.0, 4.0),
            sleep_hours: DistributionSpec::normal(7.5, 1.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MortalityRates {
    pub sex_male: f64,
    pub sex_female: f64,
    pub diabetes: f64,
    pub non_skin_cancer: f64,
    pub copd: f64,
    pub heart_failure: f64,
    pub difficulty_bathing: f64,
    pub difficulty_managing_money: f64,
    pub difficulty_walking: f64,
}

impl Default for MortalityRates {
    fn default() -> Self {
        Self {
            sex_male: 50.0,
            sex_female: 50.0,
            diabetes: 20.0,
            non_skin_cancer: 5.0,
            copd: 8.0,
            heart_failure: 5.0,
            difficulty_bathing: 8.0,
            difficulty_managing_money: 10.0,
            difficulty_walking: 12.0,
        }
    }
}

/// Five-way smoking split, percentages. Re-weighted to sum to 1 at draw
/// time, so the group does not need to total exactly 100.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokingRates {
    pub never: f64,
    pub former_gt1: f64,
    pub former_lt1: f64,
    pub current_le10: f64,
    pub current_gt10: f64,
}

impl Default for SmokingRates {
    fn default() -> Self {
        Self {
            never: 50.0,
            former_gt1: 20.0,
            former_lt1: 5.0,
            current_le10: 15.0,
            current_gt10: 10.0,
        }
    }
}

impl SmokingRates {
    pub fn as_weights(&self) -> [f64; 5] {
        [
            self.never,
            self.former_gt1,
            self.former_lt1,
            self.current_le10,
            self.current_gt10,
        ]
    }
}

/// Five-way self-rated-health split, percentages; re-weighted like smoking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfRatedHealthRates {
    pub excellent: f64,
    pub very_good: f64,
    pub good: f64,
    pub fair: f64,
    pub poor: f64,
}

impl Default for SelfRatedHealthRates {
    fn default() -> Self {
        Self {
            excellent: 20.0,
            very_good: 30.0,
            good: 30.0,
            fair: 15.0,
            poor: 5.0,
        }
    }
}

impl SelfRatedHealthRates {
    pub fn as_weights(&self) -> [f64; 5] {
        [self.excellent, self.very_good, self.good, self.fair, self.poor]
    }
}

impl MortalityCohortConfig {
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(MhfError::Config("count must be > 0".to_string()));
        }
        self.ranges.age.validate("age")?;
        self.ranges.bmi.validate("bmi")?;
        self.ranges.whtr.validate("whtr")?;
        self.ranges.resting_hr.validate("resting_hr")?;
        self.ranges.drinks_per_week.validate("drinks_per_week")?;
        self.ranges.sleep_hours.validate("sleep_hours")?;

        self.distributions.age.validate("age")?;
        self.distributions.bmi.validate("bmi")?;
        self.distributions.whtr.validate("whtr")?;
        self.distributions.resting_hr.validate("resting_hr")?;
        self.distributions.drinks_per_week.validate("drinks_per_week")?;
        self.distributions.sleep_hours.validate("sleep_hours")?;

        validate_pct("sex_male", self.rates.sex_male)?;
        validate_pct("sex_female", self.rates.sex_female)?;
        validate_pct("diabetes", self.rates.diabetes)?;
        validate_pct("non_skin_cancer", self.rates.non_skin_cancer)?;
        validate_pct("copd", self.rates.copd)?;
        validate_pct("heart_failure", self.rates.heart_failure)?;
        validate_pct("difficulty_bathing", self.rates.difficulty_bathing)?;
        validate_pct(
            "difficulty_managing_money",
            self.rates.difficulty_managing_money,
        )?;
        validate_pct("difficulty_walking", self.rates.difficulty_walking)?;

        for (name, pct) in [
            ("smoking.never", self.smoking.never),
            ("smoking.former_gt1", self.smoking.former_gt1),
            ("smoking.former_lt1", self.smoking.former_lt1),
            ("smoking.current_le10", self.smoking.current_le10),
            ("smoking.current_gt10", self.smoking.current_gt10),
            ("self_rated_health.excellent", self.self_rated_health.excellent),
            ("self_rated_health.very_good", self.self_rated_health.very_good),
            ("self_rated_health.good", self.self_rated_health.good),
            ("self_rated_health.fair", self.self_rated_health.fair),
            ("self_rated_health.poor", self.self_rated_health.poor),
        ] {
            validate_pct(name, pct)?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(CvdCohortConfig::default().validate().is_ok());
        assert!(MortalityCohortConfig::default().validate().is_ok());
    }

    #[test]
    fn test_reversed_range_fails_fast() {
        let mut cfg = CvdCohortConfig::default();
        cfg.ranges.age = Range::new(60.0, 18.0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_zero_count_rejected() {
        let cfg = CvdCohortConfig {
            count: 0,
            ..CvdCohortConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_percentage_bounds() {
        let mut cfg = CvdCohortConfig::default();
        cfg.rates.smoker = 130.0;
        assert!(cfg.validate().is_err());
        cfg.rates.smoker = -1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let cfg: CvdCohortConfig = toml::from_str("count = 500").unwrap();
        assert_eq!(cfg.count, 500);
        assert_eq!(cfg.rates.sex_male, 75.0);
        assert_eq!(cfg.distributions.age.kind, "uniform");
    }

    #[test]
    fn test_distribution_params_from_toml() {
        let cfg: MortalityCohortConfig = toml::from_str(
            r#"
            count = 100
            [distributions.whtr]
            kind = "normal"
            mean = 0.52
            sd = 0.04
        "#,
        )
        .unwrap();
        assert_eq!(cfg.distributions.whtr.mean, Some(0.52));
        // Untouched sections keep their defaults
        assert_eq!(cfg.distributions.resting_hr.kind, "normal");
        assert_eq!(cfg.whtr_bmi_coupling, 0.002);
    }
}
