//! LLM backend abstraction for profile narration
//!
//! Supports OpenAI-compatible APIs (OpenAI, OpenRouter, local servers) and
//! Anthropic Claude. Backends only ever see an already-computed profile.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Summaries are short; this caps cost rather than length
const SUMMARY_MAX_TOKENS: u32 = 1024;

/// LLM backend errors
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Empty response")]
    EmptyResponse,
}

fn api_error(err: impl Display) -> LlmError {
    LlmError::Api(err.to_string())
}

/// Keep only non-blank completion text
fn non_empty(text: Option<String>) -> Result<String, LlmError> {
    text.filter(|t| !t.trim().is_empty())
        .ok_or(LlmError::EmptyResponse)
}

/// Generic LLM backend trait
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generate a completion with system prompt
    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError>;

    fn model_name(&self) -> &str;
}

/// OpenAI-compatible backend configuration
#[derive(Debug, Clone)]
pub struct OpenAIBackendConfig {
    pub api_key: String,
    /// Base URL (for OpenRouter, local servers, etc.)
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for OpenAIBackendConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            max_tokens: SUMMARY_MAX_TOKENS,
        }
    }
}

impl OpenAIBackendConfig {
    pub fn openai(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            ..Default::default()
        }
    }

    pub fn openrouter(api_key: &str, model: &str) -> Self {
        Self::openai(api_key, model).with_base_url(OPENROUTER_BASE_URL)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }
}

/// OpenAI-compatible LLM backend
pub struct OpenAIBackend {
    client: Client<OpenAIConfig>,
    config: OpenAIBackendConfig,
}

impl OpenAIBackend {
    pub fn new(config: OpenAIBackendConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() {
            return Err(LlmError::Config("missing API key".into()));
        }

        let api = OpenAIConfig::new().with_api_key(&config.api_key);
        let api = match &config.base_url {
            Some(base_url) => api.with_api_base(base_url),
            None => api,
        };

        Ok(Self {
            client: Client::with_config(api),
            config,
        })
    }

    fn request(&self, system: &str, user: &str) -> Result<CreateChatCompletionRequest, LlmError> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()
                .map_err(api_error)?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user)
                .build()
                .map_err(api_error)?
                .into(),
        ];

        CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(messages)
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .build()
            .map_err(api_error)
    }
}

/// Map client errors, singling out rate limiting
fn classify_openai_error(err: OpenAIError) -> LlmError {
    match &err {
        OpenAIError::ApiError(api)
            if [api.code.as_deref(), api.r#type.as_deref()]
                .into_iter()
                .flatten()
                .any(|tag| tag.contains("rate_limit")) =>
        {
            LlmError::RateLimited
        }
        OpenAIError::Reqwest(e) if e.status() == Some(StatusCode::TOO_MANY_REQUESTS) => {
            LlmError::RateLimited
        }
        _ => api_error(&err),
    }
}

#[async_trait]
impl LlmBackend for OpenAIBackend {
    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let request = self.request(system, user)?;

        debug!("Requesting completion from {}", self.config.model);
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(classify_openai_error)?;

        non_empty(
            response
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content),
        )
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Anthropic Claude backend configuration
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl AnthropicConfig {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens: SUMMARY_MAX_TOKENS,
            base_url: ANTHROPIC_BASE_URL.to_string(),
            timeout_secs: 60,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

// Messages API wire types
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Turn<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Turn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Anthropic Claude backend
pub struct AnthropicBackend {
    client: reqwest::Client,
    config: AnthropicConfig,
}

impl AnthropicBackend {
    pub fn new(config: AnthropicConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() {
            return Err(LlmError::Config("missing API key".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Config(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url)
    }
}

#[async_trait]
impl LlmBackend for AnthropicBackend {
    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system,
            messages: [Turn {
                role: "user",
                content: user,
            }],
        };

        debug!("Requesting message from {}", self.config.model);
        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(api_error)?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(LlmError::RateLimited),
            status if !status.is_success() => {
                let detail = response.text().await.unwrap_or_default();
                return Err(LlmError::Api(format!("Anthropic returned {}: {}", status, detail)));
            }
            _ => {}
        }

        let reply: MessagesResponse = response.json().await.map_err(api_error)?;
        non_empty(
            reply
                .content
                .into_iter()
                .find(|block| block.kind == "text")
                .and_then(|block| block.text),
        )
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Thread-safe reference to an LLM backend
pub type SharedBackend = Arc<dyn LlmBackend>;

/// Create a shared OpenAI-compatible backend
pub fn create_backend(config: OpenAIBackendConfig) -> Result<SharedBackend, LlmError> {
    Ok(Arc::new(OpenAIBackend::new(config)?))
}

/// Create a shared Anthropic backend
pub fn create_anthropic_backend(config: AnthropicConfig) -> Result<SharedBackend, LlmError> {
    Ok(Arc::new(AnthropicBackend::new(config)?))
}
