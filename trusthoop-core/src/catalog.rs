//! Source and factor catalog
//!
//! The two fixed weight tables that drive every score:
//! - **CTS** (Company Trust Score): five employer factors
//! - **RLS** (Recruiter Legitimacy Score): five recruiter factors
//!
//! Each factor names the sources allowed to feed it. A (source, factor)
//! pair is the unit the collector fetches and the transparency report
//! accounts for.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Named external evidence sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    Glassdoor,
    AmbitionBox,
    Comparably,
    #[serde(rename = "MCA Portal")]
    McaPortal,
    Tofler,
    InstaFinancials,
    #[serde(rename = "GST Registry")]
    GstRegistry,
    #[serde(rename = "Survey APIs")]
    SurveyApis,
    #[serde(rename = "Form Inputs")]
    FormInputs,
    Reddit,
    Quora,
    Blind,
    #[serde(rename = "Layoffs.fyi")]
    LayoffsFyi,
    #[serde(rename = "Complaint Portals")]
    ComplaintPortals,
    Naukri,
    Indeed,
    #[serde(rename = "DNS Verification")]
    DnsVerification,
    #[serde(rename = "LinkedIn Organization")]
    LinkedInOrganization,
    #[serde(rename = "Recruiter Logs")]
    RecruiterLogs,
    #[serde(rename = "Offered Documents")]
    OfferedDocuments,
}

/// Broad class of a source; only `Social` is subject to authenticity gates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceClass {
    Review,
    FinancialRegistry,
    Registry,
    Survey,
    Social,
    IncidentReport,
    JobBoard,
    Verification,
    ComplianceRecord,
}

impl Source {
    /// Every known source, in catalog order
    pub const ALL: [Source; 20] = [
        Source::Glassdoor,
        Source::AmbitionBox,
        Source::Comparably,
        Source::McaPortal,
        Source::Tofler,
        Source::InstaFinancials,
        Source::GstRegistry,
        Source::SurveyApis,
        Source::FormInputs,
        Source::Reddit,
        Source::Quora,
        Source::Blind,
        Source::LayoffsFyi,
        Source::ComplaintPortals,
        Source::Naukri,
        Source::Indeed,
        Source::DnsVerification,
        Source::LinkedInOrganization,
        Source::RecruiterLogs,
        Source::OfferedDocuments,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Source::Glassdoor => "Glassdoor",
            Source::AmbitionBox => "AmbitionBox",
            Source::Comparably => "Comparably",
            Source::McaPortal => "MCA Portal",
            Source::Tofler => "Tofler",
            Source::InstaFinancials => "InstaFinancials",
            Source::GstRegistry => "GST Registry",
            Source::SurveyApis => "Survey APIs",
            Source::FormInputs => "Form Inputs",
            Source::Reddit => "Reddit",
            Source::Quora => "Quora",
            Source::Blind => "Blind",
            Source::LayoffsFyi => "Layoffs.fyi",
            Source::ComplaintPortals => "Complaint Portals",
            Source::Naukri => "Naukri",
            Source::Indeed => "Indeed",
            Source::DnsVerification => "DNS Verification",
            Source::LinkedInOrganization => "LinkedIn Organization",
            Source::RecruiterLogs => "Recruiter Logs",
            Source::OfferedDocuments => "Offered Documents",
        }
    }

    pub fn class(&self) -> SourceClass {
        match self {
            Source::Glassdoor | Source::AmbitionBox | Source::Comparably => SourceClass::Review,
            Source::McaPortal | Source::Tofler | Source::InstaFinancials => {
                SourceClass::FinancialRegistry
            }
            Source::GstRegistry => SourceClass::Registry,
            Source::SurveyApis | Source::FormInputs => SourceClass::Survey,
            Source::Reddit | Source::Quora | Source::Blind => SourceClass::Social,
            Source::LayoffsFyi | Source::ComplaintPortals => SourceClass::IncidentReport,
            Source::Naukri | Source::Indeed => SourceClass::JobBoard,
            Source::DnsVerification | Source::LinkedInOrganization => SourceClass::Verification,
            Source::RecruiterLogs | Source::OfferedDocuments => SourceClass::ComplianceRecord,
        }
    }

    pub fn is_social(&self) -> bool {
        self.class() == SourceClass::Social
    }

    /// Case-insensitive lookup by display name or identifier
    pub fn parse(value: &str) -> Option<Source> {
        let wanted = normalize_key(value);
        Source::ALL.into_iter().find(|source| {
            normalize_key(source.name()) == wanted || normalize_key(&format!("{:?}", source)) == wanted
        })
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which composite a factor belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Company,
    Recruiter,
}

impl SubjectKind {
    pub fn table(&self) -> &'static WeightTable {
        match self {
            SubjectKind::Company => &COMPANY_TABLE,
            SubjectKind::Recruiter => &RECRUITER_TABLE,
        }
    }
}

/// Named scoring categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    // Company Trust Score
    CultureWorkEnvironment,
    FinancialStability,
    CandidateExperience,
    ExternalSentiment,
    EmployerRedFlagIndex,
    // Recruiter Legitimacy Score
    OutcomeMetrics,
    CandidateSatisfaction,
    ExternalReputation,
    IdentityDomainVerification,
    ProcessTransparency,
}

impl Factor {
    pub fn name(&self) -> &'static str {
        match self {
            Factor::CultureWorkEnvironment => "Culture & Work Environment",
            Factor::FinancialStability => "Financial Stability",
            Factor::CandidateExperience => "Candidate Experience (NPS)",
            Factor::ExternalSentiment => "External Sentiment",
            Factor::EmployerRedFlagIndex => "Employer Red Flag Index",
            Factor::OutcomeMetrics => "Outcome Metrics",
            Factor::CandidateSatisfaction => "Candidate Satisfaction",
            Factor::ExternalReputation => "External Reputation",
            Factor::IdentityDomainVerification => "Identity & Domain Verification",
            Factor::ProcessTransparency => "Process Transparency & Compliance",
        }
    }

    pub fn subject_kind(&self) -> SubjectKind {
        match self {
            Factor::CultureWorkEnvironment
            | Factor::FinancialStability
            | Factor::CandidateExperience
            | Factor::ExternalSentiment
            | Factor::EmployerRedFlagIndex => SubjectKind::Company,
            Factor::OutcomeMetrics
            | Factor::CandidateSatisfaction
            | Factor::ExternalReputation
            | Factor::IdentityDomainVerification
            | Factor::ProcessTransparency => SubjectKind::Recruiter,
        }
    }

    /// Short machine key, used in URL templates and fixture files
    pub fn key(&self) -> &'static str {
        match self {
            Factor::CultureWorkEnvironment => "culture",
            Factor::FinancialStability => "financial",
            Factor::CandidateExperience => "nps",
            Factor::ExternalSentiment => "sentiment",
            Factor::EmployerRedFlagIndex => "red_flags",
            Factor::OutcomeMetrics => "outcomes",
            Factor::CandidateSatisfaction => "satisfaction",
            Factor::ExternalReputation => "reputation",
            Factor::IdentityDomainVerification => "identity",
            Factor::ProcessTransparency => "transparency",
        }
    }

    pub fn from_key(key: &str) -> Option<Factor> {
        let wanted = key.trim().to_ascii_lowercase();
        COMPANY_TABLE
            .factors
            .iter()
            .chain(RECRUITER_TABLE.factors.iter())
            .map(|spec| spec.factor)
            .find(|factor| factor.key() == wanted)
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of a weight table
#[derive(Debug, Clone, Copy)]
pub struct FactorSpec {
    pub factor: Factor,
    /// Percentage contribution to the composite
    pub weight: u8,
    pub sources: &'static [Source],
}

/// Fixed factor -> weight mapping for one composite
#[derive(Debug)]
pub struct WeightTable {
    pub kind: SubjectKind,
    pub factors: &'static [FactorSpec],
}

impl WeightTable {
    pub fn total_weight(&self) -> u32 {
        self.factors.iter().map(|spec| spec.weight as u32).sum()
    }

    pub fn weight_of(&self, factor: Factor) -> Option<u8> {
        self.factors
            .iter()
            .find(|spec| spec.factor == factor)
            .map(|spec| spec.weight)
    }

    /// (source, factor) pairs in table order
    pub fn pairs(&self) -> impl Iterator<Item = (Source, Factor)> + '_ {
        self.factors
            .iter()
            .flat_map(|spec| spec.sources.iter().map(move |source| (*source, spec.factor)))
    }
}

impl PartialEq for WeightTable {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for WeightTable {}

// Original rule set weighted 17/30/15/13/15 (sums to 90); rescaled to 100
// by largest remainder.
pub static COMPANY_TABLE: WeightTable = WeightTable {
    kind: SubjectKind::Company,
    factors: &[
        FactorSpec {
            factor: Factor::CultureWorkEnvironment,
            weight: 19,
            sources: &[Source::Glassdoor, Source::AmbitionBox],
        },
        FactorSpec {
            factor: Factor::FinancialStability,
            weight: 33,
            sources: &[Source::McaPortal, Source::Tofler, Source::InstaFinancials],
        },
        FactorSpec {
            factor: Factor::CandidateExperience,
            weight: 17,
            sources: &[Source::SurveyApis, Source::FormInputs],
        },
        FactorSpec {
            factor: Factor::ExternalSentiment,
            weight: 14,
            sources: &[Source::Reddit, Source::Quora, Source::Blind],
        },
        FactorSpec {
            factor: Factor::EmployerRedFlagIndex,
            weight: 17,
            sources: &[Source::Blind, Source::LayoffsFyi, Source::Reddit],
        },
    ],
};

pub static RECRUITER_TABLE: WeightTable = WeightTable {
    kind: SubjectKind::Recruiter,
    factors: &[
        FactorSpec {
            factor: Factor::OutcomeMetrics,
            weight: 25,
            sources: &[Source::Naukri, Source::Glassdoor, Source::Indeed],
        },
        FactorSpec {
            factor: Factor::CandidateSatisfaction,
            weight: 30,
            sources: &[Source::Indeed, Source::Comparably],
        },
        FactorSpec {
            factor: Factor::ExternalReputation,
            weight: 20,
            sources: &[Source::Reddit, Source::ComplaintPortals],
        },
        FactorSpec {
            factor: Factor::IdentityDomainVerification,
            weight: 15,
            sources: &[
                Source::DnsVerification,
                Source::GstRegistry,
                Source::McaPortal,
                Source::LinkedInOrganization,
            ],
        },
        FactorSpec {
            factor: Factor::ProcessTransparency,
            weight: 10,
            sources: &[Source::RecruiterLogs, Source::OfferedDocuments],
        },
    ],
};

/// Both tables, company first
pub fn tables() -> [&'static WeightTable; 2] {
    [&COMPANY_TABLE, &RECRUITER_TABLE]
}

/// Every (source, factor) pair across both tables, company first
pub fn all_pairs() -> Vec<(Source, Factor)> {
    tables().iter().flat_map(|table| table.pairs()).collect()
}

fn normalize_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_tables_sum_to_100() {
        for table in tables() {
            assert_eq!(table.total_weight(), 100, "{:?} table", table.kind);
        }
    }

    #[test]
    fn test_factors_belong_to_their_table() {
        for table in tables() {
            for spec in table.factors {
                assert_eq!(spec.factor.subject_kind(), table.kind);
                assert!(!spec.sources.is_empty());
            }
        }
    }

    #[test]
    fn test_pairs_cover_both_tables() {
        let pairs = all_pairs();
        assert_eq!(pairs.len(), 13 + 13);
        assert_eq!(pairs[0], (Source::Glassdoor, Factor::CultureWorkEnvironment));
        assert!(pairs.contains(&(Source::Glassdoor, Factor::OutcomeMetrics)));
    }

    #[test]
    fn test_source_parse() {
        assert_eq!(Source::parse("layoffs.fyi"), Some(Source::LayoffsFyi));
        assert_eq!(Source::parse("MCA Portal"), Some(Source::McaPortal));
        assert_eq!(Source::parse("mca_portal"), Some(Source::McaPortal));
        assert_eq!(Source::parse("myspace"), None);
    }

    #[test]
    fn test_only_three_social_platforms() {
        let social: Vec<_> = Source::ALL.into_iter().filter(|s| s.is_social()).collect();
        assert_eq!(social, vec![Source::Reddit, Source::Quora, Source::Blind]);
    }

    #[test]
    fn test_factor_keys_round_trip() {
        for table in tables() {
            for spec in table.factors {
                assert_eq!(Factor::from_key(spec.factor.key()), Some(spec.factor));
            }
        }
    }
}
