//! Run configuration for the mhf binary.
//! Reads mhf.toml from the current directory or the path in MHF_CONFIG.

use serde::Deserialize;
use std::path::Path;

use mhf_cohort::{CvdCohortConfig, MortalityCohortConfig};

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Which pipeline to run: "cvd" or "mortality".
    #[serde(default = "default_mode")]
    pub mode: String,
    /// RNG seed; omit for a fresh entropy-seeded run.
    pub seed: Option<u64>,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default)]
    pub cvd: CvdCohortConfig,
    #[serde(default)]
    pub mortality: MortalityCohortConfig,
}

fn default_mode() -> String { "cvd".to_string() }
fn default_output() -> String { "cohort.csv".to_string() }

impl RunConfig {
    /// Load configuration from mhf.toml.
    /// Checks MHF_CONFIG env var first, then the current directory.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("MHF_CONFIG").unwrap_or_else(|_| "mhf.toml".to_string());

        if !Path::new(&path).exists() {
            anyhow::bail!(
                "Config file not found: {}\n\
                 Copy mhf.example.toml to mhf.toml and edit it.",
                path
            );
        }

        let content = std::fs::read_to_string(&path)?;
        let config: RunConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.mode != "cvd" && self.mode != "mortality" {
            anyhow::bail!("mode must be \"cvd\" or \"mortality\", got {:?}", self.mode);
        }
        if self.output.is_empty() {
            anyhow::bail!("output path must not be empty");
        }
        Ok(())
    }
}
