//! Engine configuration
//!
//! ```toml
//! fetch_timeout_ms = 5000
//! max_concurrent_fetches = 8
//! default_subject = "Innovate Inc."
//!
//! [[sources]]
//! source = "Glassdoor"
//! url = "https://reviews.example.com/{factor}?company={subject}"
//! api_key_env = "GLASSDOOR_API_KEY"
//!
//! [[sources]]
//! source = "Reddit"
//! fixture = "fixtures/reddit.toml"
//!
//! [summarizer]
//! provider = "anthropic"
//! model = "claude-3-5-haiku-latest"
//! api_key_env = "ANTHROPIC_API_KEY"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use trusthoop_core::{Source, DEFAULT_SUBJECT};
use trusthoop_sources::{
    create_anthropic_backend, create_backend, AnthropicConfig, HttpSource, HttpSourceConfig,
    OpenAIBackendConfig, ProfileSummarizer, SharedBackend, SharedSource, SignalSource,
    StaticSource,
};

use crate::TrustEngine;

/// Top-level engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Per-fetch timeout in milliseconds
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
    /// Subject used when a query name is empty
    #[serde(default = "default_subject")]
    pub default_subject: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
    #[serde(default)]
    pub summarizer: Option<SummarizerEntry>,
}

fn default_fetch_timeout_ms() -> u64 {
    5_000
}

fn default_max_concurrent_fetches() -> usize {
    8
}

fn default_subject() -> String {
    DEFAULT_SUBJECT.to_string()
}

fn default_user_agent() -> String {
    format!("trusthoop/{}", env!("CARGO_PKG_VERSION"))
}

fn default_enabled() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: default_fetch_timeout_ms(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            default_subject: default_subject(),
            user_agent: default_user_agent(),
            sources: Vec::new(),
            summarizer: None,
        }
    }
}

/// One `[[sources]]` entry: either a live HTTP endpoint or a fixture file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Catalog name, e.g. "Glassdoor" or "MCA Portal"
    pub source: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub industry_url: Option<String>,
    #[serde(default)]
    pub fixture: Option<PathBuf>,
    /// Environment variable holding a bearer token
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryProvider {
    Anthropic,
    OpenAI,
    OpenRouter,
}

/// Optional `[summarizer]` block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerEntry {
    pub provider: SummaryProvider,
    pub model: String,
    pub api_key_env: String,
    /// Override for OpenAI-compatible or Anthropic endpoints
    #[serde(default)]
    pub base_url: Option<String>,
}

impl EngineConfig {
    /// Load from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load from `path` if it exists, otherwise use defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        if config.max_concurrent_fetches == 0 {
            bail!("max_concurrent_fetches must be at least 1");
        }
        for entry in &config.sources {
            if Source::parse(&entry.source).is_none() {
                bail!("unknown source '{}'", entry.source);
            }
        }
        Ok(config)
    }

    /// Build an engine with every enabled source and the optional summarizer
    pub fn build_engine(&self) -> Result<TrustEngine> {
        let mut engine = TrustEngine::new(self);

        for entry in self.sources.iter().filter(|e| e.enabled) {
            let adapter = self.build_source(entry)?;
            info!("Registered source {}", adapter.source());
            engine = engine.with_source(adapter);
        }

        if let Some(summary) = &self.summarizer {
            match build_backend(summary) {
                Ok(backend) => engine = engine.with_summarizer(ProfileSummarizer::new(backend)),
                Err(e) => warn!("Summarizer disabled: {:#}", e),
            }
        }

        Ok(engine)
    }

    fn build_source(&self, entry: &SourceEntry) -> Result<SharedSource> {
        let Some(source) = Source::parse(&entry.source) else {
            bail!("unknown source '{}'", entry.source);
        };

        match (&entry.url, &entry.fixture) {
            (Some(url), None) => {
                let api_key = entry
                    .api_key_env
                    .as_deref()
                    .and_then(|name| std::env::var(name).ok());
                let mut config = HttpSourceConfig::new(source, url)
                    .with_api_key(api_key)
                    .with_user_agent(&self.user_agent)
                    .with_timeout_secs(self.fetch_timeout_ms.div_ceil(1000).max(1));
                if let Some(industry_url) = &entry.industry_url {
                    config = config.with_industry_url(industry_url);
                }
                let adapter = HttpSource::new(config)
                    .with_context(|| format!("configuring source {}", source))?;
                Ok(Arc::new(adapter))
            }
            (None, Some(path)) => {
                let adapter = StaticSource::from_path(path)
                    .with_context(|| format!("loading fixture for {}", source))?;
                if adapter.source() != source {
                    bail!(
                        "fixture {} is for {}, not {}",
                        path.display(),
                        adapter.source(),
                        source
                    );
                }
                Ok(Arc::new(adapter))
            }
            (Some(_), Some(_)) => bail!("source {} sets both url and fixture", source),
            (None, None) => bail!("source {} needs a url or a fixture", source),
        }
    }
}

fn build_backend(entry: &SummarizerEntry) -> Result<SharedBackend> {
    let api_key = std::env::var(&entry.api_key_env)
        .with_context(|| format!("{} is not set", entry.api_key_env))?;

    let backend = match entry.provider {
        SummaryProvider::Anthropic => {
            let mut config = AnthropicConfig::new(&api_key, &entry.model);
            if let Some(base_url) = &entry.base_url {
                config = config.with_base_url(base_url);
            }
            create_anthropic_backend(config)?
        }
        SummaryProvider::OpenAI => {
            let mut config = OpenAIBackendConfig::openai(&api_key, &entry.model);
            config.base_url = entry.base_url.clone();
            create_backend(config)?
        }
        SummaryProvider::OpenRouter => {
            create_backend(OpenAIBackendConfig::openrouter(&api_key, &entry.model))?
        }
    };
    Ok(backend)
}
