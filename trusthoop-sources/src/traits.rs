//! Common traits for evidence sources

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use trusthoop_core::{Factor, Signal, Source};

/// Errors from source fetches.
///
/// These never abort a query: the engine logs them and treats the pair as
/// missing.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SourceError::Parse(err.to_string())
        } else {
            SourceError::Network(err.to_string())
        }
    }
}

/// Read-only fetch interface for one external source
#[async_trait]
pub trait SignalSource: Send + Sync {
    /// Which catalog source this adapter speaks for
    fn source(&self) -> Source;

    /// Fetch signals for one subject and factor
    async fn fetch(&self, subject: &str, factor: Factor) -> Result<Vec<Signal>, SourceError>;

    /// Industry the source associates with the subject, if it knows one
    async fn industry(&self, _subject: &str) -> Option<String> {
        None
    }
}

/// Thread-safe reference to a source adapter
pub type SharedSource = Arc<dyn SignalSource>;
