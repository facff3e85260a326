//! Score aggregation
//!
//! Turns screened signals into factor scores and the two composites:
//! - FactorScore = rounded mean of admitted contributions, 0 without evidence
//! - CompositeScore = round(sum(score * weight) / 100)
//! - RiskVerdict from the company composite: >= 75 Low, >= 50 Medium, else High
//!
//! Aggregation never fails; absence of data is a valid all-zero outcome.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::authenticity::{filter_signals, AdmittedSignal};
use crate::{pair_label, tables, CompanyProfile, Factor, Signal, TransparencyReport, WeightTable};

pub const LOW_RISK_THRESHOLD: u8 = 75;
pub const MEDIUM_RISK_THRESHOLD: u8 = 50;

/// Score for one factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorScore {
    pub factor: Factor,
    /// 0-100
    pub score: u8,
    /// Percentage weight within its composite
    pub weight: u8,
    /// Number of admitted signals behind the score
    pub evidence: usize,
}

/// Discrete risk verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskVerdict {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskVerdict {
    pub fn from_score(score: u8) -> Self {
        if score >= LOW_RISK_THRESHOLD {
            RiskVerdict::Low
        } else if score >= MEDIUM_RISK_THRESHOLD {
            RiskVerdict::Medium
        } else {
            RiskVerdict::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskVerdict::Low => "Low Risk",
            RiskVerdict::Medium => "Medium Risk",
            RiskVerdict::High => "High Risk",
        }
    }
}

impl fmt::Display for RiskVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Factor scores and composite for one weight table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeScore {
    pub table: &'static WeightTable,
    pub factors: Vec<FactorScore>,
    /// 0-100
    pub score: u8,
}

/// Mean of contributions, rounded half away from zero and clamped to [0, 100]
pub fn factor_score(contributions: &[f64]) -> u8 {
    if contributions.is_empty() {
        return 0;
    }
    let sum: f64 = contributions.iter().map(|c| c.clamp(0.0, 100.0)).sum();
    let mean = sum / contributions.len() as f64;
    mean.round().clamp(0.0, 100.0) as u8
}

/// Weighted composite in integer arithmetic, rounding half up
pub fn composite_score(factors: &[FactorScore]) -> u8 {
    let weighted: u32 = factors
        .iter()
        .map(|f| f.score.min(100) as u32 * f.weight as u32)
        .sum();
    ((weighted + 50) / 100).min(100) as u8
}

/// Score one weight table from admitted signals
pub fn score_table(table: &'static WeightTable, admitted: &[AdmittedSignal]) -> CompositeScore {
    let factors: Vec<FactorScore> = table
        .factors
        .iter()
        .map(|spec| {
            let contributions: Vec<f64> = admitted
                .iter()
                .filter(|a| a.signal.factor == spec.factor && spec.sources.contains(&a.signal.source))
                .map(|a| a.contribution)
                .collect();
            FactorScore {
                factor: spec.factor,
                score: factor_score(&contributions),
                weight: spec.weight,
                evidence: contributions.len(),
            }
        })
        .collect();

    let score = composite_score(&factors);
    CompositeScore {
        table,
        factors,
        score,
    }
}

/// Full output of one aggregation run
#[derive(Debug, Clone)]
pub struct Assessment {
    pub company: CompositeScore,
    pub recruiter: CompositeScore,
    pub verdict: RiskVerdict,
    pub transparency: TransparencyReport,
}

impl Assessment {
    pub fn into_profile(self, name: impl Into<String>, industry: impl Into<String>) -> CompanyProfile {
        CompanyProfile::from_assessment(name.into(), industry.into(), self)
    }
}

/// Filter and aggregate a batch of signals.
///
/// Signals are ordered by id first so the result does not depend on the
/// order they were collected in, and repeated ids are counted once. Signals whose (source, factor) pair is not
/// in either table are ignored.
pub fn aggregate(signals: &[Signal]) -> Assessment {
    let known: HashSet<_> = crate::all_pairs().into_iter().collect();
    let mut ordered: Vec<Signal> = signals
        .iter()
        .filter(|s| {
            let ok = known.contains(&(s.source, s.factor));
            if !ok {
                tracing::warn!("Ignoring {} for unmapped pair {}", s.id, s.pair_label());
            }
            ok
        })
        .cloned()
        .collect();
    ordered.sort_by(|a, b| a.id.cmp(&b.id).then(a.pair_label().cmp(&b.pair_label())));
    // Same id means same content; count it once on both the admitted and rejected paths
    ordered.dedup_by(|b, a| a.id == b.id);

    let outcome = filter_signals(&ordered);
    let [company_table, recruiter_table] = tables();
    let company = score_table(company_table, &outcome.admitted);
    let recruiter = score_table(recruiter_table, &outcome.admitted);

    let mut admitted_per_pair: BTreeMap<String, usize> = BTreeMap::new();
    for a in &outcome.admitted {
        *admitted_per_pair.entry(a.signal.pair_label()).or_default() += 1;
    }

    let mut transparency = TransparencyReport::default();
    for (source, factor) in crate::all_pairs() {
        let label = pair_label(source, factor);
        if admitted_per_pair.contains_key(&label) {
            transparency.add_used(label);
        } else {
            transparency.add_missing(label);
        }
    }
    for rejected in &outcome.rejected {
        transparency.add_filtered(rejected.describe());
    }
    transparency.filtered_signals.sort();

    let verdict = RiskVerdict::from_score(company.score);
    tracing::debug!(
        "Aggregated {} signals ({} admitted, {} filtered): CTS {} RLS {} ({})",
        ordered.len(),
        outcome.admitted.len(),
        outcome.rejected.len(),
        company.score,
        recruiter.score,
        verdict
    );

    Assessment {
        company,
        recruiter,
        verdict,
        transparency,
    }
}
