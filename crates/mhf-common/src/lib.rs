//! mhf-common — Shared types, errors, and input normalization used across all MHF crates.

pub mod error;
pub mod normalize;
pub mod profile;

// Re-export commonly used types
pub use error::{MhfError, Result};
pub use profile::{CvdProfile, MortalityProfile};
