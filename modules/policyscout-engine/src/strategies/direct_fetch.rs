//! DirectFetch strategy: a lighter regex pass over the homepage footer,
//! followed by verifying GETs of the most promising links. For the
//! Meta-family hosts it instead probes known-good paths directly, since
//! those sites only serve policy pages to crawler user agents.

use std::sync::Arc;
use std::sync::LazyLock;

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, info, warn};
use url::Url;

use policyscout_common::multilingual::{privacy_terms_for_url, score_link_text, score_privacy_url};
use policyscout_common::special_domains::uses_googlebot;
use policyscout_common::{
    CandidateSource, Config, PolicyCandidate, PolicyScoutError, PolicyType,
};
use policyscout_net::HttpClient;

use crate::html::{extract_title, html_to_text, is_auth_url};

use super::{passes_domain_gate, Strategy};

/// Paths known to work on the Googlebot-only hosts.
const GOOGLEBOT_PATHS: &[&str] = &[
    "/privacy/policy/",
    "/privacy/policy",
    "/legal/terms",
    "/privacy/center/",
    "/about/privacy",
];

/// Phrases that mark a login wall rather than a policy page.
const LOGIN_INDICATORS: &[&str] = &[
    "enter your password",
    "forgot password",
    "sign in to continue",
    "log in to continue",
    "create an account",
    "remember me",
];

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a[^>]+href\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a>"#)
        .expect("valid anchor pattern")
});

static TAG_STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));

const MAX_VERIFIED: usize = 3;

pub struct DirectFetch {
    client: HttpClient,
    config: Arc<Config>,
}

impl DirectFetch {
    pub fn new(client: HttpClient, config: Arc<Config>) -> Self {
        Self { client, config }
    }

    /// Regex pass over raw homepage HTML: anchors whose text hits the
    /// TLD-biased privacy vocabulary or the configured footer vocabulary,
    /// or whose href scores as a privacy path, scored and ranked.
    fn footer_privacy_links(
        html: &str,
        base_url: &str,
        footer_vocab: &[&str],
    ) -> Vec<(String, i32)> {
        let base = match Url::parse(base_url) {
            Ok(u) => u,
            Err(_) => return Vec::new(),
        };
        let terms = privacy_terms_for_url(base_url);

        let mut links: Vec<(String, i32)> = Vec::new();
        for cap in ANCHOR_RE.captures_iter(html) {
            let href = cap[1].trim();
            let text = TAG_STRIP_RE.replace_all(&cap[2], " ");
            let text = text.trim().to_lowercase();

            let text_hit = terms.iter().any(|t| text.contains(t))
                || footer_vocab.iter().any(|v| text.contains(v));
            let url_score = score_privacy_url(href) as i32;
            if !text_hit && url_score == 0 {
                continue;
            }

            let resolved = match base.join(href) {
                Ok(u) if u.scheme() == "http" || u.scheme() == "https" => u.to_string(),
                _ => continue,
            };

            let score = score_link_text(&text) as i32 + url_score;
            links.push((resolved, score));
        }

        links.sort_by(|a, b| b.1.cmp(&a.1));
        let mut seen = std::collections::HashSet::new();
        links.retain(|(url, _)| seen.insert(url.clone()));
        links
    }

    /// Verifying GET: 200, not a login redirect, enough privacy indicators
    /// in the body, and fewer than two login markers.
    async fn verify(&self, url: &str, domain: &str, googlebot: bool) -> Option<PolicyCandidate> {
        let page = match self.client.get(url, self.config.validation_timeout).await {
            Ok(page) => page,
            Err(PolicyScoutError::RateLimited { host, .. }) => {
                warn!(host, url, "Verification rate limited");
                return None;
            }
            Err(e) => {
                debug!(url, error = %e, "Verification fetch failed");
                return None;
            }
        };

        if page.status != 200 || is_auth_url(&page.final_url) {
            return None;
        }
        // Redirects may have moved us; the landing URL must pass the gate too.
        if !passes_domain_gate(&page.final_url, domain) {
            return None;
        }
        if page.body.len() < self.config.min_content_length {
            return None;
        }

        let text = html_to_text(&page.body).to_lowercase();
        let terms = privacy_terms_for_url(url);
        let indicators = terms.iter().filter(|t| text.contains(*t)).count();
        let required = if googlebot { 1 } else { 2 };
        if indicators < required {
            return None;
        }
        let login_markers = LOGIN_INDICATORS.iter().filter(|m| text.contains(*m)).count();
        if login_markers >= 2 {
            return None;
        }

        let mut confidence: i32 = 75;
        let lower_url = url.to_lowercase();
        if lower_url.contains("privacy")
            || policyscout_common::special_domains::special_domain_policies(domain).is_some()
        {
            confidence += 10;
        }
        if indicators >= 4 {
            confidence += 5;
        }
        if extract_title(&page.body)
            .map(|t| t.to_lowercase().contains("privacy"))
            .unwrap_or(false)
        {
            confidence += 5;
        }
        if googlebot {
            confidence += 3;
        }

        Some(
            PolicyCandidate::new(
                &page.final_url,
                PolicyType::Privacy,
                CandidateSource::DirectFetch,
                confidence.min(98) as u8,
            )
            .with_detail(format!("direct fetch verified, {indicators} indicators")),
        )
    }
}

#[async_trait]
impl Strategy for DirectFetch {
    fn name(&self) -> &'static str {
        "direct_fetch"
    }

    async fn execute(&self, domain: &str) -> Result<Vec<PolicyCandidate>> {
        let googlebot = uses_googlebot(domain);

        let urls: Vec<String> = if googlebot {
            GOOGLEBOT_PATHS
                .iter()
                .map(|p| format!("https://{domain}{p}"))
                .collect()
        } else {
            let base_url = format!("https://{domain}/");
            let page = match self.client.get(&base_url, self.config.homepage_timeout).await {
                Ok(page) if page.is_success() => page,
                Ok(page) => {
                    debug!(domain, status = page.status, "Homepage returned non-200");
                    return Ok(Vec::new());
                }
                Err(PolicyScoutError::RateLimited { host, .. }) => {
                    warn!(host, "Homepage fetch rate limited");
                    return Ok(Vec::new());
                }
                Err(e) => return Err(e.into()),
            };
            Self::footer_privacy_links(&page.body, &page.final_url, self.config.footer_vocab)
                .into_iter()
                .map(|(url, _)| url)
                .collect()
        };

        let mut candidates = Vec::new();
        for url in urls
            .iter()
            .filter(|u| passes_domain_gate(u, domain))
            .take(MAX_VERIFIED)
        {
            if let Some(candidate) = self.verify(url, domain, googlebot).await {
                candidates.push(candidate);
            }
        }

        info!(
            domain,
            googlebot,
            candidates = candidates.len(),
            "Direct fetch complete"
        );
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use policyscout_common::config::FOOTER_VOCAB;

    #[test]
    fn footer_regex_pass_finds_and_ranks_privacy_links() {
        let html = r#"
            <footer>
                <a href="/about">About us</a>
                <a href="/legal/privacy-policy">Privacy Policy</a>
                <a href="/datenschutz"><span>Datenschutz</span></a>
            </footer>
        "#;
        let links = DirectFetch::footer_privacy_links(html, "https://example.de/", FOOTER_VOCAB);
        assert_eq!(links.len(), 2);
        // Both qualify; the stronger-scoring one leads.
        assert!(links[0].1 >= links[1].1);
        assert!(links.iter().any(|(u, _)| u == "https://example.de/legal/privacy-policy"));
        assert!(links.iter().any(|(u, _)| u == "https://example.de/datenschutz"));
    }

    #[test]
    fn footer_vocab_qualifies_anchors_without_privacy_terms() {
        // "Impressum" is footer vocabulary but not a privacy term, and the
        // href alone scores zero.
        let html = r#"<a href="/imprint">Impressum</a>"#;
        let links = DirectFetch::footer_privacy_links(html, "https://example.de/", FOOTER_VOCAB);
        assert_eq!(links.len(), 1);
        let none = DirectFetch::footer_privacy_links(html, "https://example.de/", &[]);
        assert!(none.is_empty());
    }

    #[test]
    fn nested_markup_in_anchor_text_is_stripped() {
        let html = r#"<a href="/privacy"><b>Privacy</b> <i>Policy</i></a>"#;
        let links = DirectFetch::footer_privacy_links(html, "https://example.com/", FOOTER_VOCAB);
        assert_eq!(links.len(), 1);
        assert!(links[0].1 > 0);
    }

    #[test]
    fn googlebot_paths_are_absolute() {
        for p in GOOGLEBOT_PATHS {
            assert!(p.starts_with('/'));
        }
    }

    #[test]
    fn non_privacy_pages_are_ignored() {
        let html = r#"<a href="/careers">Careers</a><a href="/blog">Blog</a>"#;
        assert!(DirectFetch::footer_privacy_links(html, "https://example.com/", FOOTER_VOCAB).is_empty());
    }
}
