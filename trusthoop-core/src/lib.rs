//! TrustHoop Core - deterministic trust scoring for employers and recruiters
//!
//! This crate provides the pure scoring pipeline:
//! - Source/factor catalog and the two fixed weight tables (CTS, RLS)
//! - Evidence signals with content-derived ids
//! - Authenticity filter for discussion-platform signals
//! - Aggregation into factor scores, composites, verdict and transparency report
//!
//! Nothing here performs I/O; collection lives in `trusthoop-sources`.

pub mod aggregate;
pub mod authenticity;
pub mod catalog;
pub mod profile;
pub mod query;
pub mod signals;

pub use aggregate::*;
pub use authenticity::*;
pub use catalog::*;
pub use profile::*;
pub use query::*;
pub use signals::*;

/// Subject used when the caller submits an empty name
pub const DEFAULT_SUBJECT: &str = "Innovate Inc.";

/// Longest accepted subject name, in characters
pub const MAX_SUBJECT_LEN: usize = 120;

/// Industry reported when no source provides one
pub const UNKNOWN_INDUSTRY: &str = "Unknown";
