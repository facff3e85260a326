//! HTTP JSON source adapter
//!
//! Fetches signals from a JSON endpoint described by a URL template:
//! - `{subject}` is replaced with the url-encoded subject name
//! - `{factor}` is replaced with the factor key (`culture`, `financial`, ...)
//!
//! Expected body:
//! `{ "industry": "...", "signals": [ { "value": 72.0, "engagement": {...}, "observed_at": "..." } ] }`

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use trusthoop_core::{Engagement, Factor, Signal, Source};

use crate::{SignalSource, SourceError};

const DEFAULT_USER_AGENT: &str = "trusthoop/0.1";

/// Configuration for one HTTP-backed source
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    pub source: Source,
    /// URL template with `{subject}` and `{factor}` placeholders
    pub url: String,
    /// Optional URL template (only `{subject}`) returning `{ "industry": "..." }`
    pub industry_url: Option<String>,
    /// Sent as a bearer token when present
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl HttpSourceConfig {
    pub fn new(source: Source, url: &str) -> Self {
        Self {
            source,
            url: url.to_string(),
            industry_url: None,
            api_key: None,
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_industry_url(mut self, url: &str) -> Self {
        self.industry_url = Some(url.to_string());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }
}

/// Source adapter backed by a JSON HTTP endpoint
pub struct HttpSource {
    config: HttpSourceConfig,
    client: Client,
}

impl HttpSource {
    pub fn new(config: HttpSourceConfig) -> Result<Self, SourceError> {
        if !config.url.contains("{subject}") {
            return Err(SourceError::Config(format!(
                "{} url template has no {{subject}} placeholder",
                config.source
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SourceError::Config(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn signals_url(&self, subject: &str, factor: Factor) -> String {
        self.config
            .url
            .replace("{subject}", &urlencoding::encode(subject))
            .replace("{factor}", factor.key())
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, SourceError> {
        let mut request = self.client.get(url).header("Accept", "application/json");
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        response.json::<T>().await.map_err(SourceError::from)
    }
}

#[async_trait]
impl SignalSource for HttpSource {
    fn source(&self) -> Source {
        self.config.source
    }

    async fn fetch(&self, subject: &str, factor: Factor) -> Result<Vec<Signal>, SourceError> {
        let url = self.signals_url(subject, factor);
        debug!("{} fetching {}", self.config.source, url);

        let body: SignalsResponse = self.get_json(&url).await?;
        let signals = body
            .signals
            .into_iter()
            .map(|raw| {
                let mut builder = Signal::builder(self.config.source, factor, raw.value);
                if let Some(engagement) = raw.engagement {
                    builder = builder.engagement(engagement);
                }
                if let Some(at) = raw.observed_at {
                    builder = builder.observed_at(at);
                }
                builder.build()
            })
            .collect();

        Ok(signals)
    }

    async fn industry(&self, subject: &str) -> Option<String> {
        let template = self.config.industry_url.as_ref()?;
        let url = template.replace("{subject}", &urlencoding::encode(subject));
        match self.get_json::<IndustryResponse>(&url).await {
            Ok(body) => body.industry.filter(|i| !i.trim().is_empty()),
            Err(e) => {
                debug!("{} industry lookup failed: {}", self.config.source, e);
                None
            }
        }
    }
}

// Wire types
#[derive(Debug, Deserialize)]
struct SignalsResponse {
    #[serde(default)]
    signals: Vec<RawSignal>,
}

#[derive(Debug, Deserialize)]
struct RawSignal {
    value: f64,
    #[serde(default)]
    engagement: Option<Engagement>,
    #[serde(default)]
    observed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct IndustryResponse {
    #[serde(default)]
    industry: Option<String>,
}
