use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of resolving user input (company name or domain) to a domain.
/// Immutable once created by the identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainIdentity {
    pub original_input: String,
    /// Lowercased hostname without scheme, `www.` prefix, or trailing slash.
    pub clean_domain: String,
    pub subdomain: Option<String>,
    pub root_domain: String,
    pub tld: String,
    /// True when DNS verification found at least one address record.
    pub is_valid: bool,
}

/// The kinds of legal documents the engine locates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyType {
    Privacy,
    Terms,
    Cookies,
    Security,
    Gdpr,
    Ccpa,
    Ai,
    AcceptableUse,
}

impl PolicyType {
    pub const ALL: [PolicyType; 8] = [
        PolicyType::Privacy,
        PolicyType::Terms,
        PolicyType::Cookies,
        PolicyType::Security,
        PolicyType::Gdpr,
        PolicyType::Ccpa,
        PolicyType::Ai,
        PolicyType::AcceptableUse,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PolicyType::Privacy => "Privacy Policy",
            PolicyType::Terms => "Terms of Service",
            PolicyType::Cookies => "Cookie Policy",
            PolicyType::Security => "Security Policy",
            PolicyType::Gdpr => "GDPR Notice",
            PolicyType::Ccpa => "CCPA Notice",
            PolicyType::Ai => "AI Policy",
            PolicyType::AcceptableUse => "Acceptable Use Policy",
        }
    }

    /// Well-known URL paths where this document type is commonly published.
    pub fn standard_paths(&self) -> &'static [&'static str] {
        match self {
            PolicyType::Privacy => &[
                "/privacy",
                "/privacy-policy",
                "/privacy-notice",
                "/privacy-statement",
                "/legal/privacy",
                "/legal/privacy-policy",
                "/policies/privacy",
                "/datenschutz",
                "/datenschutzerklaerung",
                "/politique-de-confidentialite",
                "/privacidad",
            ],
            PolicyType::Terms => &[
                "/terms",
                "/terms-of-service",
                "/terms-of-use",
                "/terms-and-conditions",
                "/legal/terms",
                "/tos",
                "/agb",
                "/conditions-generales",
            ],
            PolicyType::Cookies => &[
                "/cookies",
                "/cookie-policy",
                "/legal/cookies",
                "/cookie-richtlinie",
            ],
            PolicyType::Security => &["/security", "/legal/security", "/trust/security"],
            PolicyType::Gdpr => &["/gdpr", "/legal/gdpr", "/dsgvo"],
            PolicyType::Ccpa => &[
                "/ccpa",
                "/legal/ccpa",
                "/your-california-privacy-rights",
                "/do-not-sell",
            ],
            PolicyType::Ai => &["/ai-policy", "/legal/ai", "/responsible-ai"],
            PolicyType::AcceptableUse => &[
                "/acceptable-use",
                "/acceptable-use-policy",
                "/legal/aup",
                "/aup",
            ],
        }
    }

    /// Keywords expected in the body of a genuine document of this type.
    pub fn validation_keywords(&self) -> &'static [&'static str] {
        match self {
            PolicyType::Privacy => &[
                "personal data",
                "personal information",
                "data protection",
                "data controller",
                "third parties",
                "your rights",
            ],
            PolicyType::Terms => &[
                "agreement",
                "liability",
                "termination",
                "governing law",
                "warranty",
            ],
            PolicyType::Cookies => &["cookies", "tracking", "consent", "browser settings"],
            PolicyType::Security => &["security", "encryption", "vulnerability", "incident"],
            PolicyType::Gdpr => &[
                "gdpr",
                "general data protection regulation",
                "lawful basis",
                "data subject",
            ],
            PolicyType::Ccpa => &[
                "ccpa",
                "california consumer privacy act",
                "do not sell",
                "california residents",
            ],
            PolicyType::Ai => &["artificial intelligence", "machine learning", "model", "training data"],
            PolicyType::AcceptableUse => &["acceptable use", "prohibited", "abuse", "misuse"],
        }
    }
}

impl std::fmt::Display for PolicyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyType::Privacy => write!(f, "privacy"),
            PolicyType::Terms => write!(f, "terms"),
            PolicyType::Cookies => write!(f, "cookies"),
            PolicyType::Security => write!(f, "security"),
            PolicyType::Gdpr => write!(f, "gdpr"),
            PolicyType::Ccpa => write!(f, "ccpa"),
            PolicyType::Ai => write!(f, "ai"),
            PolicyType::AcceptableUse => write!(f, "acceptable_use"),
        }
    }
}

impl std::str::FromStr for PolicyType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "privacy" => Ok(Self::Privacy),
            "terms" => Ok(Self::Terms),
            "cookies" => Ok(Self::Cookies),
            "security" => Ok(Self::Security),
            "gdpr" => Ok(Self::Gdpr),
            "ccpa" => Ok(Self::Ccpa),
            "ai" => Ok(Self::Ai),
            "acceptable_use" => Ok(Self::AcceptableUse),
            other => Err(format!("unknown PolicyType: {other}")),
        }
    }
}

/// Where a candidate URL came from. Ordered by strategy precedence for
/// stable tie-breaks when confidences are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    SpecialDomain,
    FooterLink,
    LegalHub,
    NavLink,
    DirectFetch,
    StandardPath,
    Sitemap,
    SearchFallback,
    DeepScan,
}

impl CandidateSource {
    /// Tie-break rank: lower wins at equal confidence.
    pub fn rank(&self) -> u8 {
        match self {
            CandidateSource::SpecialDomain => 0,
            CandidateSource::FooterLink => 1,
            CandidateSource::LegalHub => 2,
            CandidateSource::NavLink => 3,
            CandidateSource::DirectFetch => 4,
            CandidateSource::StandardPath => 5,
            CandidateSource::Sitemap => 6,
            CandidateSource::SearchFallback => 7,
            CandidateSource::DeepScan => 8,
        }
    }
}

impl std::fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CandidateSource::SpecialDomain => "special_domain",
            CandidateSource::FooterLink => "footer_link",
            CandidateSource::LegalHub => "legal_hub",
            CandidateSource::NavLink => "nav_link",
            CandidateSource::DirectFetch => "direct_fetch",
            CandidateSource::StandardPath => "standard_path",
            CandidateSource::Sitemap => "sitemap",
            CandidateSource::SearchFallback => "search_fallback",
            CandidateSource::DeepScan => "deep_scan",
        };
        write!(f, "{s}")
    }
}

/// Page section a link was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkContext {
    Footer,
    LegalHub,
    Nav,
    Body,
    Unknown,
}

/// A proposed policy URL with provenance and confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyCandidate {
    pub url: String,
    pub policy_type: PolicyType,
    pub source: CandidateSource,
    /// 0–100.
    pub confidence: u8,
    pub found_at: DateTime<Utc>,
    /// Human-readable trail of how the candidate was produced and adjusted.
    pub method_detail: String,
    pub link_text: Option<String>,
    pub context: Option<LinkContext>,
    pub neural_score: Option<f64>,
}

impl PolicyCandidate {
    pub fn new(url: impl Into<String>, policy_type: PolicyType, source: CandidateSource, confidence: u8) -> Self {
        Self {
            url: url.into(),
            policy_type,
            source,
            confidence: confidence.min(100),
            found_at: Utc::now(),
            method_detail: String::new(),
            link_text: None,
            context: None,
            neural_score: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.method_detail = detail.into();
        self
    }

    pub fn with_link_text(mut self, text: impl Into<String>) -> Self {
        self.link_text = Some(text.into());
        self
    }

    pub fn with_context(mut self, context: LinkContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// Per-run accounting: what each strategy produced and how much HTTP the
/// run cost. Attached to every `DiscoveryResult`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryStats {
    /// Candidates produced per strategy/worker, keyed by name. Parallel
    /// shards of the same strategy accumulate into one entry.
    pub candidates_per_strategy: BTreeMap<String, u32>,
    /// HTTP requests issued during the run (probes, fetches, validation).
    pub http_requests: u64,
}

impl DiscoveryStats {
    pub fn record(&mut self, strategy: &str, candidates: usize) {
        *self
            .candidates_per_strategy
            .entry(strategy.to_string())
            .or_default() += candidates as u32;
    }
}

/// Final output of a discovery run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryResult {
    pub success: bool,
    pub domain: String,
    /// At most one chosen candidate per requested policy type.
    pub policies: Vec<PolicyCandidate>,
    pub candidates_considered: usize,
    pub elapsed_ms: u64,
    pub stats: DiscoveryStats,
    pub error: Option<String>,
}

impl DiscoveryResult {
    pub fn failure(domain: impl Into<String>, error: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            success: false,
            domain: domain.into(),
            policies: Vec::new(),
            candidates_considered: 0,
            elapsed_ms,
            stats: DiscoveryStats::default(),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn policy_type_round_trips_through_display() {
        for pt in PolicyType::ALL {
            assert_eq!(PolicyType::from_str(&pt.to_string()).unwrap(), pt);
        }
    }

    #[test]
    fn source_ranks_are_distinct() {
        let sources = [
            CandidateSource::SpecialDomain,
            CandidateSource::FooterLink,
            CandidateSource::LegalHub,
            CandidateSource::NavLink,
            CandidateSource::DirectFetch,
            CandidateSource::StandardPath,
            CandidateSource::Sitemap,
            CandidateSource::SearchFallback,
            CandidateSource::DeepScan,
        ];
        let mut ranks: Vec<u8> = sources.iter().map(|s| s.rank()).collect();
        ranks.sort();
        ranks.dedup();
        assert_eq!(ranks.len(), sources.len());
    }

    #[test]
    fn candidate_confidence_is_capped() {
        let c = PolicyCandidate::new(
            "https://example.com/privacy",
            PolicyType::Privacy,
            CandidateSource::StandardPath,
            200,
        );
        assert_eq!(c.confidence, 100);
    }

    #[test]
    fn stats_accumulate_per_strategy() {
        let mut stats = DiscoveryStats::default();
        stats.record("standard_path", 2);
        stats.record("standard_path", 3);
        stats.record("homepage", 0);
        assert_eq!(stats.candidates_per_strategy["standard_path"], 5);
        assert_eq!(stats.candidates_per_strategy["homepage"], 0);
    }

    #[test]
    fn every_type_has_paths_and_keywords() {
        for pt in PolicyType::ALL {
            assert!(!pt.standard_paths().is_empty(), "{pt} has no paths");
            assert!(!pt.validation_keywords().is_empty(), "{pt} has no keywords");
            for p in pt.standard_paths() {
                assert!(p.starts_with('/'), "{p} must be absolute");
            }
        }
    }
}
