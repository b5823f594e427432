//! mhf-cohort — Synthetic cohort generation: bounded distribution sampling
//! and the CVD / mortality cohort assemblers.

pub mod config;
pub mod cvd;
pub mod mortality;
pub mod sampler;
pub mod spec;

pub use config::{CvdCohortConfig, MortalityCohortConfig, Range};
pub use cvd::generate_cvd_cohort;
pub use mortality::generate_mortality_cohort;
pub use sampler::Sampler;
pub use spec::DistributionSpec;
