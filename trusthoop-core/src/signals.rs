//! Evidence signals
//!
//! A signal is one observation for one factor from one source:
//! - carries an observed value on the 0-100 scale (not yet clamped)
//! - social signals also carry engagement metrics for the authenticity gates
//! - the id is derived from content, so identical evidence gets identical ids

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Factor, Source};

/// Engagement metrics reported by discussion platforms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    /// Thread or answer view count
    #[serde(default)]
    pub views: u64,
    /// Size of the hosting community (subreddit members, etc.)
    #[serde(default)]
    pub audience: u64,
    #[serde(default)]
    pub upvotes: u64,
    #[serde(default)]
    pub downvotes: u64,
    #[serde(default)]
    pub comments: u32,
    /// Distinct participants corroborating the claim
    #[serde(default)]
    pub confirming_users: u32,
}

impl Engagement {
    /// Share of positive reactions, 0.0 when nobody reacted
    pub fn upvote_ratio(&self) -> f64 {
        let up = self.upvotes as f64;
        let total = up + self.downvotes as f64;
        if total == 0.0 {
            return 0.0;
        }
        up / total
    }

    /// Upvotes minus downvotes, saturating at the `i64` bounds
    pub fn net_upvotes(&self) -> i64 {
        let net = self.upvotes as i128 - self.downvotes as i128;
        net.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }
}

/// One observation feeding one factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Content-derived id (`sig_` + 16 hex chars)
    pub id: String,
    pub source: Source,
    pub factor: Factor,
    /// Observed score, nominally 0-100
    pub value: f64,
    pub engagement: Option<Engagement>,
    pub observed_at: DateTime<Utc>,
}

impl Signal {
    /// Create a new signal builder
    pub fn builder(source: Source, factor: Factor, value: f64) -> SignalBuilder {
        SignalBuilder::new(source, factor, value)
    }

    /// "Source (Factor)" label used in transparency entries
    pub fn pair_label(&self) -> String {
        pair_label(self.source, self.factor)
    }

    fn compute_id(
        source: Source,
        factor: Factor,
        value: f64,
        engagement: Option<&Engagement>,
        observed_at: DateTime<Utc>,
    ) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source.name().as_bytes());
        hasher.update(b"|");
        hasher.update(factor.key().as_bytes());
        hasher.update(b"|");
        hasher.update(value.to_bits().to_le_bytes());
        hasher.update(b"|");
        let engagement_json = engagement
            .and_then(|e| serde_json::to_string(e).ok())
            .unwrap_or_default();
        hasher.update(engagement_json.as_bytes());
        hasher.update(b"|");
        hasher.update(observed_at.timestamp_millis().to_le_bytes());
        format!("sig_{}", &format!("{:x}", hasher.finalize())[..16])
    }
}

/// "Source (Factor)" label for a pair
pub fn pair_label(source: Source, factor: Factor) -> String {
    format!("{} ({})", source.name(), factor.name())
}

/// Builder for signals
pub struct SignalBuilder {
    source: Source,
    factor: Factor,
    value: f64,
    engagement: Option<Engagement>,
    observed_at: Option<DateTime<Utc>>,
}

impl SignalBuilder {
    pub fn new(source: Source, factor: Factor, value: f64) -> Self {
        Self {
            source,
            factor,
            value,
            engagement: None,
            observed_at: None,
        }
    }

    pub fn engagement(mut self, engagement: Engagement) -> Self {
        self.engagement = Some(engagement);
        self
    }

    pub fn observed_at(mut self, observed_at: DateTime<Utc>) -> Self {
        self.observed_at = Some(observed_at);
        self
    }

    /// Pin the observation time to a unix timestamp (seconds)
    pub fn observed_at_unix(self, secs: i64) -> Self {
        match Utc.timestamp_opt(secs, 0).single() {
            Some(at) => self.observed_at(at),
            None => self,
        }
    }

    pub fn build(self) -> Signal {
        // NaN would poison the mean; treat it as no evidence of quality
        let value = if self.value.is_nan() { 0.0 } else { self.value };
        let observed_at = self.observed_at.unwrap_or_else(Utc::now);
        let id = Signal::compute_id(
            self.source,
            self.factor,
            value,
            self.engagement.as_ref(),
            observed_at,
        );

        Signal {
            id,
            source: self.source,
            factor: self.factor,
            value,
            engagement: self.engagement,
            observed_at,
        }
    }
}
