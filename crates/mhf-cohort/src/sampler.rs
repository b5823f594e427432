//! Bounded random sampling.
//!
//! The generator is an explicit, seedable dependency: pass `Some(seed)` for
//! reproducible cohorts and test fixtures, `None` to seed from OS entropy.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Beta, Distribution, LogNormal, Normal, WeightedIndex};
use tracing::debug;

use mhf_common::{MhfError, Result};

use crate::spec::DistributionSpec;

/// Redraw rounds for out-of-range lognormal samples before hard clamping.
const LOGNORMAL_REDRAW_ROUNDS: usize = 10;

/// Per-sample rejection cap for the truncated normal. Bounds several sigma
/// into one tail can starve rejection sampling; past the cap the sample is
/// clamped.
const TRUNCNORM_MAX_TRIES: usize = 1000;

pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Draw `n` values of the given shape, all inside `[low, high]`.
    pub fn sample(
        &mut self,
        spec: &DistributionSpec,
        low: f64,
        high: f64,
        n: usize,
    ) -> Result<Vec<f64>> {
        if low > high {
            return Err(MhfError::Config(format!(
                "invalid bounds: low {low} > high {high}"
            )));
        }
        match spec.kind.as_str() {
            "uniform" => Ok(self.uniform(low, high, n)),
            "normal" => self.truncated_normal(
                spec.mean.unwrap_or_default(),
                spec.sd.unwrap_or_default(),
                low,
                high,
                n,
            ),
            "lognormal" => self.lognormal(
                spec.mu.unwrap_or_default(),
                spec.sigma.unwrap_or_default(),
                low,
                high,
                n,
            ),
            "beta" => self.beta_scaled(
                spec.alpha.unwrap_or_default(),
                spec.beta.unwrap_or_default(),
                low,
                high,
                n,
            ),
            other => {
                // Unknown kinds degrade to uniform rather than failing the run
                debug!(kind = other, "unknown distribution kind, sampling uniform");
                Ok(self.uniform(low, high, n))
            }
        }
    }

    pub fn uniform(&mut self, low: f64, high: f64, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.rng.gen_range(low..=high)).collect()
    }

    /// Truncated normal: rejection sampling keeps the distribution
    /// normal-shaped inside the bounds instead of piling mass on the edges.
    pub fn truncated_normal(
        &mut self,
        mean: f64,
        sd: f64,
        low: f64,
        high: f64,
        n: usize,
    ) -> Result<Vec<f64>> {
        let dist = Normal::new(mean, sd)
            .map_err(|e| MhfError::Config(format!("invalid normal parameters: {e}")))?;
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            let mut v = dist.sample(&mut self.rng);
            let mut tries = 0;
            while (v < low || v > high) && tries < TRUNCNORM_MAX_TRIES {
                v = dist.sample(&mut self.rng);
                tries += 1;
            }
            out.push(v.clamp(low, high));
        }
        Ok(out)
    }

    /// Lognormal parameterized by the underlying normal's mu/sigma.
    /// Out-of-range values are redrawn for up to ten rounds, then any
    /// stragglers are hard-clamped (documented lossy fallback).
    pub fn lognormal(
        &mut self,
        mu: f64,
        sigma: f64,
        low: f64,
        high: f64,
        n: usize,
    ) -> Result<Vec<f64>> {
        let dist = LogNormal::new(mu, sigma)
            .map_err(|e| MhfError::Config(format!("invalid lognormal parameters: {e}")))?;
        let mut out: Vec<f64> = (0..n).map(|_| dist.sample(&mut self.rng)).collect();
        for _ in 0..LOGNORMAL_REDRAW_ROUNDS {
            let mut redrew = false;
            for v in out.iter_mut() {
                if *v < low || *v > high {
                    *v = dist.sample(&mut self.rng);
                    redrew = true;
                }
            }
            if !redrew {
                break;
            }
        }
        for v in out.iter_mut() {
            *v = v.clamp(low, high);
        }
        Ok(out)
    }

    /// Beta(α, β) on [0,1], linearly rescaled to [low, high].
    pub fn beta_scaled(
        &mut self,
        alpha: f64,
        beta: f64,
        low: f64,
        high: f64,
        n: usize,
    ) -> Result<Vec<f64>> {
        let dist = Beta::new(alpha, beta)
            .map_err(|e| MhfError::Config(format!("invalid beta parameters: {e}")))?;
        Ok((0..n)
            .map(|_| low + dist.sample(&mut self.rng) * (high - low))
            .collect())
    }

    /// `n` independent booleans, true with probability `p`.
    pub fn bernoulli(&mut self, p: f64, n: usize) -> Vec<bool> {
        (0..n).map(|_| self.rng.gen::<f64>() < p).collect()
    }

    /// `n` category indices drawn proportionally to `weights` (renormalized
    /// internally). An all-zero weight vector falls back to a uniform split.
    pub fn categorical(&mut self, weights: &[f64], n: usize) -> Result<Vec<usize>> {
        if weights.is_empty() {
            return Err(MhfError::Config("categorical weights are empty".to_string()));
        }
        if weights.iter().any(|w| *w < 0.0 || !w.is_finite()) {
            return Err(MhfError::Config(format!(
                "categorical weights must be finite and non-negative: {weights:?}"
            )));
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            let k = weights.len();
            return Ok((0..n).map(|_| self.rng.gen_range(0..k)).collect());
        }
        let dist = WeightedIndex::new(weights)
            .map_err(|e| MhfError::Config(format!("invalid categorical weights: {e}")))?;
        Ok((0..n).map(|_| dist.sample(&mut self.rng)).collect())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
