//! TrustHoop Runtime
//!
//! Runs one query end to end:
//! 1. Validate and normalize the subject name
//! 2. Fan out to every registered source for every (source, factor) pair
//! 3. Filter and aggregate the merged signals into a [`CompanyProfile`]
//!
//! [`CompanyProfile`]: trusthoop_core::CompanyProfile

pub mod config;
pub mod engine;
pub mod telemetry;

pub use config::*;
pub use engine::*;
pub use telemetry::*;
