//! In-memory source adapter
//!
//! Serves pre-recorded signals, keyed by subject and factor. Used for
//! offline runs and as a deterministic stand-in for live sources in tests.
//!
//! ```toml
//! source = "Reddit"
//!
//! [[subjects]]
//! name = "Acme Corp"
//! industry = "Fintech"
//!
//! [[subjects.signals]]
//! factor = "sentiment"
//! value = 72.0
//! engagement = { views = 15000, upvotes = 240, downvotes = 20, comments = 8 }
//! ```

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use trusthoop_core::{Engagement, Factor, Signal, Source};

use crate::{SignalSource, SourceError};

/// Observation time for fixture signals that do not pin one, so ids stay stable
const FIXTURE_EPOCH: i64 = 0;

fn subject_key(subject: &str) -> String {
    subject.trim().to_lowercase()
}

/// Source adapter answering from a fixed table
#[derive(Debug, Clone)]
pub struct StaticSource {
    source: Source,
    signals: HashMap<(String, Factor), Vec<Signal>>,
    industries: HashMap<String, String>,
}

impl StaticSource {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            signals: HashMap::new(),
            industries: HashMap::new(),
        }
    }

    /// Add a signal for `subject`; the signal's own factor decides where it lands
    pub fn with_signal(mut self, subject: &str, signal: Signal) -> Self {
        self.signals
            .entry((subject_key(subject), signal.factor))
            .or_default()
            .push(signal);
        self
    }

    /// Build and add a signal with the given value and engagement
    pub fn with_value(
        self,
        subject: &str,
        factor: Factor,
        value: f64,
        engagement: Option<Engagement>,
    ) -> Self {
        let mut builder = Signal::builder(self.source, factor, value).observed_at_unix(FIXTURE_EPOCH);
        if let Some(engagement) = engagement {
            builder = builder.engagement(engagement);
        }
        let signal = builder.build();
        self.with_signal(subject, signal)
    }

    pub fn with_industry(mut self, subject: &str, industry: &str) -> Self {
        self.industries
            .insert(subject_key(subject), industry.to_string());
        self
    }

    /// Parse a fixture document
    pub fn from_toml(content: &str) -> Result<Self, SourceError> {
        let file: FixtureFile =
            toml::from_str(content).map_err(|e| SourceError::Parse(e.to_string()))?;

        let mut source = Self::new(file.source);
        for subject in file.subjects {
            if let Some(industry) = subject.industry.as_deref() {
                source = source.with_industry(&subject.name, industry);
            }
            for raw in subject.signals {
                let factor = Factor::from_key(&raw.factor).ok_or_else(|| {
                    SourceError::Parse(format!("unknown factor key '{}'", raw.factor))
                })?;
                let mut builder = Signal::builder(file.source, factor, raw.value)
                    .observed_at_unix(raw.observed_at_unix.unwrap_or(FIXTURE_EPOCH));
                if let Some(engagement) = raw.engagement {
                    builder = builder.engagement(engagement);
                }
                source = source.with_signal(&subject.name, builder.build());
            }
        }
        Ok(source)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            SourceError::Config(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Number of stored signals across all subjects
    pub fn len(&self) -> usize {
        self.signals.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SignalSource for StaticSource {
    fn source(&self) -> Source {
        self.source
    }

    async fn fetch(&self, subject: &str, factor: Factor) -> Result<Vec<Signal>, SourceError> {
        Ok(self
            .signals
            .get(&(subject_key(subject), factor))
            .cloned()
            .unwrap_or_default())
    }

    async fn industry(&self, subject: &str) -> Option<String> {
        self.industries.get(&subject_key(subject)).cloned()
    }
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    source: Source,
    #[serde(default)]
    subjects: Vec<FixtureSubject>,
}

#[derive(Debug, Deserialize)]
struct FixtureSubject {
    name: String,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    signals: Vec<FixtureSignal>,
}

#[derive(Debug, Deserialize)]
struct FixtureSignal {
    factor: String,
    value: f64,
    #[serde(default)]
    engagement: Option<Engagement>,
    #[serde(default)]
    observed_at_unix: Option<i64>,
}
