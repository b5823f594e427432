//! Per-field distribution specification.

use serde::{Deserialize, Serialize};

use mhf_common::{MhfError, Result};

/// How one numeric field is drawn. Bounds come from the field's configured
/// range; this struct only carries the shape.
///
/// `kind` is deliberately a free string: an unrecognized kind degrades
/// silently to a uniform draw instead of failing the whole run, so a config
/// typo produces a usable (if blunt) cohort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionSpec {
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Normal: mean / standard deviation.
    pub mean: Option<f64>,
    pub sd: Option<f64>,

    /// Lognormal: mu / sigma of the underlying normal.
    pub mu: Option<f64>,
    pub sigma: Option<f64>,

    /// Beta: shape parameters.
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
}

fn default_kind() -> String {
    "uniform".to_string()
}

impl Default for DistributionSpec {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            mean: None,
            sd: None,
            mu: None,
            sigma: None,
            alpha: None,
            beta: None,
        }
    }
}

impl DistributionSpec {
    pub fn uniform() -> Self {
        Self::default()
    }

    pub fn normal(mean: f64, sd: f64) -> Self {
        Self {
            kind: "normal".to_string(),
            mean: Some(mean),
            sd: Some(sd),
            ..Self::default()
        }
    }

    pub fn lognormal(mu: f64, sigma: f64) -> Self {
        Self {
            kind: "lognormal".to_string(),
            mu: Some(mu),
            sigma: Some(sigma),
            ..Self::default()
        }
    }

    pub fn beta(alpha: f64, beta: f64) -> Self {
        Self {
            kind: "beta".to_string(),
            alpha: Some(alpha),
            beta: Some(beta),
            ..Self::default()
        }
    }

    /// Fail fast on parameters the named kind cannot sample from. An unknown
    /// kind passes: it will be drawn uniformly.
    pub fn validate(&self, field: &str) -> Result<()> {
        match self.kind.as_str() {
            "normal" => {
                let sd = self.require(field, "sd", self.sd)?;
                self.require(field, "mean", self.mean)?;
                if sd <= 0.0 {
                    return Err(MhfError::Config(format!(
                        "{field}: normal sd must be > 0, got {sd}"
                    )));
                }
            }
            "lognormal" => {
                let sigma = self.require(field, "sigma", self.sigma)?;
                self.require(field, "mu", self.mu)?;
                if sigma <= 0.0 {
                    return Err(MhfError::Config(format!(
                        "{field}: lognormal sigma must be > 0, got {sigma}"
                    )));
                }
            }
            "beta" => {
                let alpha = self.require(field, "alpha", self.alpha)?;
                let beta = self.require(field, "beta", self.beta)?;
                if alpha <= 0.0 || beta <= 0.0 {
                    return Err(MhfError::Config(format!(
                        "{field}: beta shape parameters must be > 0, got α={alpha}, β={beta}"
                    )));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn require(&self, field: &str, name: &str, value: Option<f64>) -> Result<f64> {
        value.ok_or_else(|| {
            MhfError::Config(format!(
                "{field}: distribution kind \"{}\" needs parameter \"{name}\"",
                self.kind
            ))
        })
    }
}
