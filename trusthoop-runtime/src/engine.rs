//! Trust Engine
//!
//! Owns the registered sources and runs queries:
//! - every (source, factor) fetch is an independent future
//! - fetches are bounded by a semaphore and individually timed out
//! - a failed or slow fetch contributes nothing; the query still completes

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use trusthoop_core::{
    aggregate, all_pairs, normalize_subject, CompanyProfile, Factor, QueryError, Signal,
    UNKNOWN_INDUSTRY,
};
use trusthoop_sources::{LlmError, ProfileSummarizer, SharedSource};

use crate::EngineConfig;

/// Query-time engine errors. Configuration problems surface from
/// [`EngineConfig::build_engine`] instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid query: {0}")]
    Query(#[from] QueryError),

    #[error("Summary failed: {0}")]
    Summary(#[from] LlmError),
}

/// Query engine over a set of evidence sources
pub struct TrustEngine {
    default_subject: String,
    fetch_timeout: Duration,
    permits: Arc<Semaphore>,
    sources: Vec<SharedSource>,
    summarizer: Option<ProfileSummarizer>,
}

impl TrustEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            default_subject: config.default_subject.clone(),
            fetch_timeout: Duration::from_millis(config.fetch_timeout_ms),
            permits: Arc::new(Semaphore::new(config.max_concurrent_fetches.max(1))),
            sources: Vec::new(),
            summarizer: None,
        }
    }

    /// Register a source adapter. Registration order decides industry precedence.
    pub fn with_source(mut self, source: SharedSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_summarizer(mut self, summarizer: ProfileSummarizer) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn has_summarizer(&self) -> bool {
        self.summarizer.is_some()
    }

    /// Assess a subject. Only a malformed name fails; missing evidence
    /// lowers scores instead.
    pub async fn assess(&self, raw_name: &str) -> Result<CompanyProfile, EngineError> {
        let name = normalize_subject(raw_name, &self.default_subject)?;
        let span = info_span!("query", id = %Uuid::new_v4(), subject = %name);

        let profile = async {
            info!("Assessing {} across {} sources", name, self.sources.len());

            let (signals, industry) =
                tokio::join!(self.collect(&name), self.resolve_industry(&name));
            let assessment = aggregate(&signals);

            info!(
                "CTS {} RLS {} ({}) from {} signals, {} filtered",
                assessment.company.score,
                assessment.recruiter.score,
                assessment.verdict,
                signals.len(),
                assessment.transparency.filtered_signals.len()
            );

            assessment.into_profile(name.clone(), industry)
        }
        .instrument(span)
        .await;

        Ok(profile)
    }

    /// Narrate a profile. `Ok(None)` when no summarizer is configured.
    pub async fn summarize(&self, profile: &CompanyProfile) -> Result<Option<String>, EngineError> {
        match &self.summarizer {
            Some(summarizer) => Ok(Some(summarizer.summarize(profile).await?)),
            None => Ok(None),
        }
    }

    async fn collect(&self, subject: &str) -> Vec<Signal> {
        let pairs = all_pairs();
        let fetches = self.sources.iter().flat_map(|adapter| {
            pairs
                .iter()
                .filter(move |(source, _)| *source == adapter.source())
                .map(move |(_, factor)| self.fetch_pair(adapter, subject, *factor))
        });

        join_all(fetches).await.into_iter().flatten().collect()
    }

    async fn fetch_pair(&self, adapter: &SharedSource, subject: &str, factor: Factor) -> Vec<Signal> {
        let source = adapter.source();
        let Ok(_permit) = self.permits.acquire().await else {
            return Vec::new();
        };

        match timeout(self.fetch_timeout, adapter.fetch(subject, factor)).await {
            Ok(Ok(signals)) => {
                let total = signals.len();
                let matching: Vec<Signal> = signals
                    .into_iter()
                    .filter(|s| s.source == source && s.factor == factor)
                    .collect();
                if matching.len() != total {
                    warn!(
                        "{} returned {} signals outside ({}, {})",
                        source,
                        total - matching.len(),
                        source,
                        factor
                    );
                }
                debug!("{} / {}: {} signals", source, factor, matching.len());
                matching
            }
            Ok(Err(e)) => {
                warn!("{} / {} unavailable: {}", source, factor, e);
                Vec::new()
            }
            Err(_) => {
                warn!(
                    "{} / {} timed out after {}ms",
                    source,
                    factor,
                    self.fetch_timeout.as_millis()
                );
                Vec::new()
            }
        }
    }

    async fn resolve_industry(&self, subject: &str) -> String {
        let lookups = self.sources.iter().map(|adapter| async move {
            timeout(self.fetch_timeout, adapter.industry(subject))
                .await
                .ok()
                .flatten()
        });

        join_all(lookups)
            .await
            .into_iter()
            .flatten()
            .map(|industry| industry.trim().to_string())
            .find(|industry| !industry.is_empty())
            .unwrap_or_else(|| UNKNOWN_INDUSTRY.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use trusthoop_core::Source;
    use trusthoop_sources::{LlmBackend, SignalSource, SourceError};

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SignalSource for CountingSource {
        fn source(&self) -> Source {
            Source::Reddit
        }

        async fn fetch(&self, _subject: &str, _factor: Factor) -> Result<Vec<Signal>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_fetches_only_mapped_pairs() {
        let counter = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let engine = TrustEngine::new(&EngineConfig::default()).with_source(counter.clone());

        engine.assess("Acme").await.unwrap();
        // Reddit: External Sentiment, Red Flag Index, External Reputation
        assert_eq!(counter.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_malformed_name_skips_fetch() {
        let counter = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let engine = TrustEngine::new(&EngineConfig::default()).with_source(counter.clone());

        let result = engine.assess("bad\u{0000}name").await;
        assert!(matches!(result, Err(EngineError::Query(QueryError::ControlCharacter))));
        assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
    }

    /// A Glassdoor adapter that answers with Tofler evidence
    struct StraySource;

    #[async_trait]
    impl SignalSource for StraySource {
        fn source(&self) -> Source {
            Source::Glassdoor
        }

        async fn fetch(&self, _subject: &str, _factor: Factor) -> Result<Vec<Signal>, SourceError> {
            Ok(vec![Signal::builder(Source::Tofler, Factor::FinancialStability, 90.0)
                .observed_at_unix(0)
                .build()])
        }
    }

    #[tokio::test]
    async fn test_mismatched_signals_are_dropped() {
        let engine = TrustEngine::new(&EngineConfig::default()).with_source(Arc::new(StraySource));

        let profile = engine.assess("Acme").await.unwrap();
        assert_eq!(profile.cts_score, 0);
        assert!(profile.data_summary.used.is_empty());
    }

    struct RateLimitedBackend;

    #[async_trait]
    impl LlmBackend for RateLimitedBackend {
        async fn generate(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
            Err(LlmError::RateLimited)
        }

        fn model_name(&self) -> &str {
            "rate-limited"
        }
    }

    #[tokio::test]
    async fn test_summary_failure_keeps_profile() {
        let engine = TrustEngine::new(&EngineConfig::default())
            .with_summarizer(ProfileSummarizer::new(Arc::new(RateLimitedBackend)));

        let profile = engine.assess("Acme").await.unwrap();
        let err = engine.summarize(&profile).await.unwrap_err();
        assert!(matches!(err, EngineError::Summary(LlmError::RateLimited)));
        assert_eq!(err.to_string(), "Summary failed: Rate limited");
    }

    #[tokio::test]
    async fn test_summarize_without_summarizer() {
        let engine = TrustEngine::new(&EngineConfig::default());
        let profile = engine.assess("Acme").await.unwrap();
        assert!(engine.summarize(&profile).await.unwrap().is_none());
    }
}
