//! Company profile: the serialized result of one query

use serde::{Deserialize, Serialize};

use crate::{Assessment, RiskVerdict};

/// Where the evidence came from and what was thrown away
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransparencyReport {
    /// (source, factor) pairs backed by at least one admitted signal
    pub used: Vec<String>,
    /// (source, factor) pairs without admitted signals
    pub missing: Vec<String>,
    /// One entry per signal discarded by the authenticity filter
    pub filtered_signals: Vec<String>,
}

impl TransparencyReport {
    pub fn add_used(&mut self, entry: String) {
        push_unique(&mut self.used, entry);
    }

    pub fn add_missing(&mut self, entry: String) {
        push_unique(&mut self.missing, entry);
    }

    pub fn add_filtered(&mut self, entry: String) {
        push_unique(&mut self.filtered_signals, entry);
    }

    /// True when no entry appears in more than one category
    pub fn is_disjoint(&self) -> bool {
        let in_other = |entry: &String, others: [&Vec<String>; 2]| {
            others.iter().any(|list| list.contains(entry))
        };
        !self
            .used
            .iter()
            .any(|e| in_other(e, [&self.missing, &self.filtered_signals]))
            && !self
                .missing
                .iter()
                .any(|e| in_other(e, [&self.used, &self.filtered_signals]))
    }
}

fn push_unique(list: &mut Vec<String>, entry: String) {
    if !list.contains(&entry) {
        list.push(entry);
    }
}

/// One row of the factor breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub name: String,
    pub score: u8,
    pub weight: u8,
}

/// Point-in-time trust snapshot for one subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub name: String,
    pub industry: String,
    pub cts_score: u8,
    pub rls_score: u8,
    pub risk_verdict: RiskVerdict,
    /// Company factors first, then recruiter factors, in table order
    pub factor_breakdown: Vec<FactorBreakdown>,
    pub data_summary: TransparencyReport,
}

impl CompanyProfile {
    pub fn from_assessment(name: String, industry: String, assessment: Assessment) -> Self {
        let factor_breakdown = assessment
            .company
            .factors
            .iter()
            .chain(assessment.recruiter.factors.iter())
            .map(|f| FactorBreakdown {
                name: f.factor.name().to_string(),
                score: f.score,
                weight: f.weight,
            })
            .collect();

        Self {
            name,
            industry,
            cts_score: assessment.company.score,
            rls_score: assessment.recruiter.score,
            risk_verdict: assessment.verdict,
            factor_breakdown,
            data_summary: assessment.transparency,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate;

    #[test]
    fn test_serialized_field_set() {
        let profile = aggregate(&[]).into_profile("Innovate Inc.", "Unknown");
        let value = serde_json::to_value(&profile).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "ctsScore",
                "dataSummary",
                "factorBreakdown",
                "industry",
                "name",
                "riskVerdict",
                "rlsScore"
            ]
        );
        assert_eq!(value["riskVerdict"], "High Risk");
        assert_eq!(value["factorBreakdown"].as_array().unwrap().len(), 10);
        assert_eq!(value["factorBreakdown"][0]["name"], "Culture & Work Environment");
        assert_eq!(value["factorBreakdown"][0]["weight"], 19);

        let summary = value["dataSummary"].as_object().unwrap();
        assert!(summary.contains_key("used"));
        assert!(summary.contains_key("missing"));
        assert!(summary.contains_key("filteredSignals"));
    }

    #[test]
    fn test_round_trip_verdict_literal() {
        let json = r#""Medium Risk""#;
        let verdict: RiskVerdict = serde_json::from_str(json).unwrap();
        assert_eq!(verdict, RiskVerdict::Medium);
    }

    #[test]
    fn test_report_dedups_and_checks_disjointness() {
        let mut report = TransparencyReport::default();
        report.add_used("Glassdoor (Outcome Metrics)".into());
        report.add_used("Glassdoor (Outcome Metrics)".into());
        report.add_missing("Indeed (Outcome Metrics)".into());
        assert_eq!(report.used.len(), 1);
        assert!(report.is_disjoint());

        report.add_missing("Glassdoor (Outcome Metrics)".into());
        assert!(!report.is_disjoint());
    }
}
