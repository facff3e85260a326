//! Profile summarizer
//!
//! Turns a finished [`CompanyProfile`] into a short narrative. The model is
//! handed the serialized profile and nothing else; it cannot change scores,
//! and its output is never fed back into aggregation.

use tracing::info;
use trusthoop_core::CompanyProfile;

use crate::{LlmError, SharedBackend};

/// System prompt for profile narration
const SUMMARIZER_SYSTEM_PROMPT: &str = r#"
You are an analyst writing a brief trust summary of an employer for a job seeker.

Rules:
1. Use only the JSON profile provided; do not invent facts or sources
2. Never restate scores differently from the profile (ctsScore, rlsScore, riskVerdict)
3. Mention the strongest and weakest factors by name
4. If dataSummary.missing is long, say the assessment is based on limited evidence
5. If dataSummary.filteredSignals is non-empty, note that some discussion posts were discarded as unreliable
6. Keep it under 150 words, plain prose, no headings

PROFILE:
"#;

/// Narrates a computed profile through an LLM backend
pub struct ProfileSummarizer {
    backend: SharedBackend,
}

impl ProfileSummarizer {
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    pub async fn summarize(&self, profile: &CompanyProfile) -> Result<String, LlmError> {
        let input = profile
            .to_json()
            .map_err(|e| LlmError::Api(format!("profile serialization failed: {}", e)))?;

        info!(
            "Summarizing profile for {} with {}",
            profile.name,
            self.backend.model_name()
        );
        let summary = self.backend.generate(SUMMARIZER_SYSTEM_PROMPT, &input).await?;
        Ok(summary.trim().to_string())
    }
}
