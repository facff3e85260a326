//! Authenticity filter for discussion-platform signals
//!
//! Only Reddit, Quora and Blind signals are screened. A signal is admitted
//! when it clears the credibility band and all three gates:
//! - **Popularity**: platform-specific minimum reach
//! - **Reliability**: upvote ratio >= 70% AND net upvotes >= 20
//! - **Confirmation**: >= 5 comments OR >= 3 confirming users
//!
//! The credibility band (from absolute upvotes) is checked first; the
//! lowest band discards the signal whatever the gates would say.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Engagement, Signal, Source};

pub const REDDIT_MIN_VIEWS: u64 = 10_000;
pub const REDDIT_MIN_AUDIENCE: u64 = 100_000;
pub const QUORA_MIN_VIEWS: u64 = 2_000;
pub const BLIND_MIN_COMMENTS: u32 = 5;

pub const MIN_UPVOTE_RATIO: f64 = 0.70;
pub const MIN_NET_UPVOTES: i64 = 20;

pub const MIN_CONFIRMING_COMMENTS: u32 = 5;
pub const MIN_CONFIRMING_USERS: u32 = 3;

/// Authenticity checks a signal can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gate {
    Popularity,
    Reliability,
    Confirmation,
    Credibility,
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Gate::Popularity => "popularity",
            Gate::Reliability => "reliability",
            Gate::Confirmation => "confirmation",
            Gate::Credibility => "credibility",
        };
        f.write_str(name)
    }
}

/// Step function over absolute upvotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredibilityBand {
    /// < 20 upvotes: discarded
    Discard,
    /// 20-49 upvotes
    Low,
    /// 50-199 upvotes
    Standard,
    /// >= 200 upvotes
    High,
}

impl CredibilityBand {
    pub fn for_upvotes(upvotes: u64) -> Self {
        match upvotes {
            0..=19 => CredibilityBand::Discard,
            20..=49 => CredibilityBand::Low,
            50..=199 => CredibilityBand::Standard,
            _ => CredibilityBand::High,
        }
    }

    pub fn multiplier(&self) -> Option<f64> {
        match self {
            CredibilityBand::Discard => None,
            CredibilityBand::Low => Some(0.8),
            CredibilityBand::Standard => Some(1.0),
            CredibilityBand::High => Some(1.2),
        }
    }
}

/// Outcome of screening one signal
#[derive(Debug, Clone, PartialEq)]
pub enum Screening {
    Admitted { multiplier: f64 },
    Rejected { gate: Gate, detail: String },
}

impl Screening {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Screening::Admitted { .. })
    }
}

/// A signal that cleared screening, with its scaled contribution
#[derive(Debug, Clone, PartialEq)]
pub struct AdmittedSignal {
    pub signal: Signal,
    pub multiplier: f64,
    /// `value * multiplier`, clamped to [0, 100]
    pub contribution: f64,
}

/// A signal that failed screening
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedSignal {
    pub signal: Signal,
    pub gate: Gate,
    pub detail: String,
}

impl RejectedSignal {
    /// Transparency entry describing why the signal was discarded
    pub fn describe(&self) -> String {
        format!(
            "{} {}: {} gate failed, {}",
            self.signal.pair_label(),
            self.signal.id,
            self.gate,
            self.detail
        )
    }
}

/// Signals partitioned by the filter
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub admitted: Vec<AdmittedSignal>,
    pub rejected: Vec<RejectedSignal>,
}

/// Screen one signal. Non-social sources pass with multiplier 1.0.
pub fn screen(signal: &Signal) -> Screening {
    if !signal.source.is_social() {
        return Screening::Admitted { multiplier: 1.0 };
    }

    let engagement = match &signal.engagement {
        Some(e) => e,
        None => {
            return Screening::Rejected {
                gate: Gate::Popularity,
                detail: "no engagement metrics reported".to_string(),
            }
        }
    };

    let band = CredibilityBand::for_upvotes(engagement.upvotes);
    let multiplier = match band.multiplier() {
        Some(m) => m,
        None => {
            return Screening::Rejected {
                gate: Gate::Credibility,
                detail: format!("{} upvotes < 20", engagement.upvotes),
            }
        }
    };

    if let Some(detail) = popularity_failure(signal.source, engagement) {
        return Screening::Rejected {
            gate: Gate::Popularity,
            detail,
        };
    }
    if let Some(detail) = reliability_failure(engagement) {
        return Screening::Rejected {
            gate: Gate::Reliability,
            detail,
        };
    }
    if let Some(detail) = confirmation_failure(engagement) {
        return Screening::Rejected {
            gate: Gate::Confirmation,
            detail,
        };
    }

    Screening::Admitted { multiplier }
}

/// Screen every signal and partition the result
pub fn filter_signals(signals: &[Signal]) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();
    for signal in signals {
        match screen(signal) {
            Screening::Admitted { multiplier } => {
                let contribution = (signal.value * multiplier).clamp(0.0, 100.0);
                outcome.admitted.push(AdmittedSignal {
                    signal: signal.clone(),
                    multiplier,
                    contribution,
                });
            }
            Screening::Rejected { gate, detail } => {
                tracing::debug!(
                    "Discarded {} from {}: {} gate ({})",
                    signal.id,
                    signal.source,
                    gate,
                    detail
                );
                outcome.rejected.push(RejectedSignal {
                    signal: signal.clone(),
                    gate,
                    detail,
                });
            }
        }
    }
    outcome
}

fn popularity_failure(source: Source, e: &Engagement) -> Option<String> {
    match source {
        Source::Reddit => {
            if e.views >= REDDIT_MIN_VIEWS || e.audience >= REDDIT_MIN_AUDIENCE {
                None
            } else {
                Some(format!(
                    "{} views < {} and community {} < {}",
                    e.views, REDDIT_MIN_VIEWS, e.audience, REDDIT_MIN_AUDIENCE
                ))
            }
        }
        Source::Quora => (e.views < QUORA_MIN_VIEWS)
            .then(|| format!("{} views < {}", e.views, QUORA_MIN_VIEWS)),
        Source::Blind => (e.comments < BLIND_MIN_COMMENTS)
            .then(|| format!("{} comments < {}", e.comments, BLIND_MIN_COMMENTS)),
        _ => None,
    }
}

fn reliability_failure(e: &Engagement) -> Option<String> {
    let ratio = e.upvote_ratio();
    if ratio < MIN_UPVOTE_RATIO {
        return Some(format!("upvote ratio {:.2} < {:.2}", ratio, MIN_UPVOTE_RATIO));
    }
    let net = e.net_upvotes();
    if net < MIN_NET_UPVOTES {
        return Some(format!("net upvotes {} < {}", net, MIN_NET_UPVOTES));
    }
    None
}

fn confirmation_failure(e: &Engagement) -> Option<String> {
    if e.comments >= MIN_CONFIRMING_COMMENTS || e.confirming_users >= MIN_CONFIRMING_USERS {
        None
    } else {
        Some(format!(
            "{} comments < {} and {} confirming users < {}",
            e.comments, MIN_CONFIRMING_COMMENTS, e.confirming_users, MIN_CONFIRMING_USERS
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Factor;

    fn reddit(value: f64, engagement: Engagement) -> Signal {
        Signal::builder(Source::Reddit, Factor::ExternalSentiment, value)
            .engagement(engagement)
            .observed_at_unix(1_700_000_000)
            .build()
    }

    fn popular() -> Engagement {
        Engagement {
            views: 25_000,
            audience: 0,
            upvotes: 220,
            downvotes: 73,
            comments: 6,
            confirming_users: 0,
        }
    }

    #[test]
    fn test_admission_high_band_capped() {
        let signal = reddit(90.0, popular());
        assert!((signal.engagement.unwrap().upvote_ratio() - 0.75).abs() < 0.01);

        let outcome = filter_signals(&[signal]);
        assert_eq!(outcome.rejected.len(), 0);
        let admitted = &outcome.admitted[0];
        assert_eq!(admitted.multiplier, 1.2);
        // 90 * 1.2 = 108, capped
        assert_eq!(admitted.contribution, 100.0);
    }

    #[test]
    fn test_net_19_discarded_in_lowest_band() {
        let signal = reddit(
            80.0,
            Engagement {
                views: 50_000,
                upvotes: 19,
                downvotes: 0,
                comments: 12,
                confirming_users: 4,
                ..Default::default()
            },
        );
        match screen(&signal) {
            Screening::Rejected { gate, .. } => assert_eq!(gate, Gate::Credibility),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(CredibilityBand::for_upvotes(19), CredibilityBand::Discard);
        assert_eq!(CredibilityBand::for_upvotes(20).multiplier(), Some(0.8));
        assert_eq!(CredibilityBand::for_upvotes(49).multiplier(), Some(0.8));
        assert_eq!(CredibilityBand::for_upvotes(50).multiplier(), Some(1.0));
        assert_eq!(CredibilityBand::for_upvotes(199).multiplier(), Some(1.0));
        assert_eq!(CredibilityBand::for_upvotes(200).multiplier(), Some(1.2));
    }

    #[test]
    fn test_popularity_per_platform() {
        let mut e = popular();
        e.views = 9_999;
        assert!(!screen(&reddit(50.0, e)).is_admitted());

        // community size alone is enough on Reddit
        e.audience = 100_000;
        assert!(screen(&reddit(50.0, e)).is_admitted());

        let quora = Signal::builder(Source::Quora, Factor::ExternalSentiment, 60.0)
            .engagement(Engagement {
                views: 1_999,
                ..popular()
            })
            .build();
        assert!(matches!(
            screen(&quora),
            Screening::Rejected {
                gate: Gate::Popularity,
                ..
            }
        ));

        let blind = Signal::builder(Source::Blind, Factor::EmployerRedFlagIndex, 30.0)
            .engagement(Engagement {
                comments: 4,
                confirming_users: 3,
                ..popular()
            })
            .build();
        assert!(matches!(
            screen(&blind),
            Screening::Rejected {
                gate: Gate::Popularity,
                ..
            }
        ));
    }

    #[test]
    fn test_reliability_gate() {
        let low_ratio = Engagement {
            upvotes: 60,
            downvotes: 40,
            ..popular()
        };
        assert!(matches!(
            screen(&reddit(70.0, low_ratio)),
            Screening::Rejected {
                gate: Gate::Reliability,
                ..
            }
        ));

        let exact_ratio = Engagement {
            upvotes: 70,
            downvotes: 30,
            ..popular()
        };
        assert!(screen(&reddit(70.0, exact_ratio)).is_admitted());
    }

    #[test]
    fn test_confirmation_gate() {
        let e = Engagement {
            comments: 4,
            confirming_users: 2,
            ..popular()
        };
        assert!(matches!(
            screen(&reddit(70.0, e)),
            Screening::Rejected {
                gate: Gate::Confirmation,
                ..
            }
        ));

        let by_users = Engagement {
            comments: 0,
            confirming_users: 3,
            ..popular()
        };
        assert!(screen(&reddit(70.0, by_users)).is_admitted());
    }

    #[test]
    fn test_missing_engagement_rejected() {
        let signal = Signal::builder(Source::Blind, Factor::ExternalSentiment, 90.0).build();
        assert!(matches!(
            screen(&signal),
            Screening::Rejected {
                gate: Gate::Popularity,
                ..
            }
        ));
    }

    #[test]
    fn test_non_social_passes_unfiltered() {
        let signal = Signal::builder(Source::McaPortal, Factor::FinancialStability, 150.0).build();
        let outcome = filter_signals(&[signal]);
        assert_eq!(outcome.admitted.len(), 1);
        assert_eq!(outcome.admitted[0].multiplier, 1.0);
        assert_eq!(outcome.admitted[0].contribution, 100.0);
    }

    #[test]
    fn test_low_band_scales_down() {
        let e = Engagement {
            upvotes: 30,
            downvotes: 5,
            ..popular()
        };
        let outcome = filter_signals(&[reddit(50.0, e)]);
        assert_eq!(outcome.admitted[0].multiplier, 0.8);
        assert!((outcome.admitted[0].contribution - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejection_description() {
        let e = Engagement {
            upvotes: 5,
            ..popular()
        };
        let outcome = filter_signals(&[reddit(50.0, e)]);
        let entry = outcome.rejected[0].describe();
        assert!(entry.starts_with("Reddit (External Sentiment) sig_"));
        assert!(entry.contains("credibility gate failed"));
    }
}
