//! mhf — synthetic cohort generation and risk scoring.
//! Entry point for the mhf binary.

mod config;
mod export;

use std::fs::File;
use std::io::BufWriter;

use tracing::info;
use tracing_subscriber::EnvFilter;

use mhf_cohort::{generate_cvd_cohort, generate_mortality_cohort, Sampler};
use mhf_scoring::{score_cvd_cohort, score_mortality_cohort};

fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mhf=debug,info")),
        )
        .init();

    info!("mhf starting up");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = match config::RunConfig::load() {
        Ok(c) => {
            info!(mode = %c.mode, seed = ?c.seed, output = %c.output, "Configuration loaded");
            c
        }
        Err(e) => {
            tracing::warn!("Could not load mhf.toml: {e}");
            tracing::warn!("Copy mhf.example.toml to mhf.toml and edit it.");
            return Ok(());
        }
    };

    let mut sampler = Sampler::new(config.seed);
    let out = BufWriter::new(File::create(&config.output)?);

    match config.mode.as_str() {
        "cvd" => {
            let rows = generate_cvd_cohort(&config.cvd, &mut sampler)?;
            let scores = score_cvd_cohort(&rows);
            let determinate = scores.iter().filter(|s| s.framingham_points.is_some()).count();
            info!(
                rows = rows.len(),
                determinate, "cvd cohort generated and scored"
            );
            export::write_cvd_csv(out, &rows, &scores)?;
        }
        "mortality" => {
            let rows = generate_mortality_cohort(&config.mortality, &mut sampler)?;
            let scores = score_mortality_cohort(&rows);
            let lee_defined = scores.iter().filter(|s| s.lee_points.is_some()).count();
            info!(
                rows = rows.len(),
                lee_defined, "mortality cohort generated and scored"
            );
            export::write_mortality_csv(out, &rows, &scores)?;
        }
        other => anyhow::bail!("unsupported mode {other:?}"),
    }

    info!(path = %config.output, "wrote cohort CSV");
    Ok(())
}
