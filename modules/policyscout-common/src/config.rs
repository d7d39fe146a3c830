use std::time::Duration;

use crate::types::PolicyType;

/// Default browser user agent sent on ordinary requests.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Googlebot user agent for hosts that reject browser UAs but serve crawlers.
pub const GOOGLEBOT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

/// Privacy paths probed by the StandardPath strategy, most common first.
/// Carried on `Config::standard_paths`; non-privacy documents use the
/// per-type lists on `PolicyType`.
pub const STANDARD_PATHS: &[&str] = &[
    "/privacy",
    "/privacy-policy",
    "/privacy-notice",
    "/privacy-statement",
    "/legal/privacy",
    "/legal/privacy-policy",
    "/policies/privacy",
    "/about/privacy",
    "/privacypolicy",
    "/datenschutz",
    "/datenschutzerklaerung",
    "/politique-de-confidentialite",
    "/privacidad",
    "/informativa-privacy",
    "/privacyverklaring",
];

/// Footer link vocabulary: anchor words that mark a legal/policy footer
/// link. Carried on `Config::footer_vocab`; the DirectFetch regex pass
/// qualifies anchors against it alongside the TLD-biased privacy terms.
pub const FOOTER_VOCAB: &[&str] = &[
    "privacy",
    "legal",
    "terms",
    "cookies",
    "datenschutz",
    "impressum",
    "rechtliches",
    "confidentialite",
    "mentions legales",
    "privacidad",
    "aviso legal",
    "integritet",
    "personvern",
    "tietosuoja",
];

/// Fallback token set for content validation's quick-reject: a body is
/// only rejected for missing vocabulary when both the multilingual
/// superset and this list produce zero hits.
pub const REQUIRED_KEYWORDS: &[&str] = &[
    "personal data",
    "personal information",
    "data protection",
    "privacy",
    "cookies",
];

/// Immutable engine configuration. Built once, passed by reference,
/// never mutated at runtime.
#[derive(Debug, Clone)]
pub struct Config {
    pub user_agent: String,
    pub googlebot_user_agent: String,
    pub accept: String,
    pub accept_language: String,

    pub homepage_timeout: Duration,
    pub probe_timeout: Duration,
    pub validation_timeout: Duration,
    /// Wall-clock cap for a whole `discover` call in parallel mode.
    pub discovery_timeout: Duration,

    pub max_strategy_workers: usize,
    pub max_probe_concurrency: usize,
    pub max_sitemaps: usize,
    pub deep_scan_depth: usize,

    /// Bodies shorter than this are rejected outright by validation.
    pub min_content_length: usize,
    /// Sequential mode stops fanning out once a candidate reaches this.
    pub early_stop_confidence: u8,
    /// Policy types a discovery run tries to fill by default.
    pub requested_types: Vec<PolicyType>,

    /// Privacy paths for the StandardPath strategy.
    pub standard_paths: &'static [&'static str],
    /// Anchor vocabulary for the DirectFetch footer pass.
    pub footer_vocab: &'static [&'static str],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            googlebot_user_agent: GOOGLEBOT_USER_AGENT.to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                .to_string(),
            accept_language: "en,de;q=0.9,fr;q=0.8,es;q=0.7".to_string(),
            homepage_timeout: Duration::from_secs(15),
            probe_timeout: Duration::from_secs(6),
            validation_timeout: Duration::from_secs(10),
            discovery_timeout: Duration::from_secs(15),
            max_strategy_workers: 10,
            max_probe_concurrency: 5,
            max_sitemaps: 3,
            deep_scan_depth: 2,
            min_content_length: 200,
            early_stop_confidence: 85,
            requested_types: vec![PolicyType::Privacy, PolicyType::Terms],
            standard_paths: STANDARD_PATHS,
            footer_vocab: FOOTER_VOCAB,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let cfg = Config::default();
        assert_eq!(cfg.discovery_timeout, Duration::from_secs(15));
        assert_eq!(cfg.max_strategy_workers, 10);
        assert_eq!(cfg.early_stop_confidence, 85);
        assert!(cfg.requested_types.contains(&PolicyType::Privacy));
        assert_eq!(cfg.standard_paths, STANDARD_PATHS);
        assert_eq!(cfg.footer_vocab, FOOTER_VOCAB);
    }

    #[test]
    fn standard_paths_are_absolute_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for p in STANDARD_PATHS {
            assert!(p.starts_with('/'));
            assert!(seen.insert(p), "duplicate path {p}");
        }
    }
}
