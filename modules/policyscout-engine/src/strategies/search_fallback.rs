//! SearchFallback strategy: when nothing on the site itself answers, ask
//! DuckDuckGo (then Bing) for `site:<domain> privacy policy` and keep the
//! top on-domain results at modest confidence.

use std::sync::Arc;
use std::sync::LazyLock;

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, info, warn};
use url::Url;

use policyscout_common::{
    canonical_url_key, host_of, CandidateSource, Config, PolicyCandidate, PolicyScoutError,
    PolicyType,
};
use policyscout_net::HttpClient;

use super::{passes_domain_gate, Strategy};

static RESULT_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href\s*=\s*["'](https?://[^"']+)["']"#).expect("valid href pattern")
});

/// Confidence ladder per engine, by result rank.
const DDG_CONFIDENCE: [u8; 3] = [50, 40, 30];
const BING_CONFIDENCE: [u8; 3] = [45, 35, 25];

pub struct SearchFallback {
    client: HttpClient,
    config: Arc<Config>,
}

impl SearchFallback {
    pub fn new(client: HttpClient, config: Arc<Config>) -> Self {
        Self { client, config }
    }

    /// Extract result URLs that belong to the target domain, unwrap
    /// DuckDuckGo redirect links, skip everything blocked.
    fn on_domain_results(html: &str, domain: &str) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for cap in RESULT_LINK_RE.captures_iter(html) {
            let raw = &cap[1];
            let target = if raw.contains("uddg=") {
                Url::parse(raw)
                    .ok()
                    .and_then(|u| {
                        u.query_pairs()
                            .find(|(k, _)| k == "uddg")
                            .map(|(_, v)| v.into_owned())
                    })
                    .unwrap_or_else(|| raw.to_string())
            } else {
                raw.to_string()
            };

            let host = host_of(&target);
            if host.is_empty() || !(host == domain || host.ends_with(&format!(".{domain}"))) {
                continue;
            }
            if !passes_domain_gate(&target, domain) {
                continue;
            }
            if seen.insert(canonical_url_key(&target)) {
                out.push(target);
            }
        }
        out
    }

    async fn query(&self, url: &str) -> Option<String> {
        match self.client.get(url, self.config.probe_timeout).await {
            Ok(page) if page.is_success() => Some(page.body),
            Ok(page) => {
                debug!(url, status = page.status, "Search endpoint non-200");
                None
            }
            Err(PolicyScoutError::RateLimited { host, .. }) => {
                warn!(host, "Search endpoint rate limited");
                None
            }
            Err(e) => {
                debug!(url, error = %e, "Search query failed");
                None
            }
        }
    }
}

#[async_trait]
impl Strategy for SearchFallback {
    fn name(&self) -> &'static str {
        "search_fallback"
    }

    async fn execute(&self, domain: &str) -> Result<Vec<PolicyCandidate>> {
        let query = format!("site:{domain} privacy policy");
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();

        let ddg_url = format!("https://html.duckduckgo.com/html/?q={encoded}");
        let mut results = Vec::new();
        let mut ladder: &[u8] = &DDG_CONFIDENCE;

        if let Some(body) = self.query(&ddg_url).await {
            results = Self::on_domain_results(&body, domain);
        }
        if results.is_empty() {
            let bing_url = format!("https://www.bing.com/search?q={encoded}");
            if let Some(body) = self.query(&bing_url).await {
                results = Self::on_domain_results(&body, domain);
                ladder = &BING_CONFIDENCE;
            }
        }

        let candidates: Vec<PolicyCandidate> = results
            .into_iter()
            .take(ladder.len())
            .zip(ladder.iter())
            .map(|(url, confidence)| {
                PolicyCandidate::new(&url, PolicyType::Privacy, CandidateSource::SearchFallback, *confidence)
                    .with_detail("site-scoped web search result")
            })
            .collect();

        info!(domain, candidates = candidates.len(), "Search fallback complete");
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_on_domain_results() {
        let html = r#"
            <a href="https://acme.com/privacy-policy">Acme privacy</a>
            <a href="https://www.linkedin.com/company/acme">Acme LinkedIn</a>
            <a href="https://other.com/privacy">Other site</a>
            <a href="https://docs.acme.com/legal/privacy">Docs privacy</a>
        "#;
        let results = SearchFallback::on_domain_results(html, "acme.com");
        assert_eq!(results.len(), 2);
        assert!(results[0].contains("acme.com"));
    }

    #[test]
    fn unwraps_ddg_redirects() {
        let html = r#"<a href="https://duckduckgo.com/l/?uddg=https%3A%2F%2Facme.com%2Fprivacy&rut=x">r</a>"#;
        let results = SearchFallback::on_domain_results(html, "acme.com");
        assert_eq!(results, vec!["https://acme.com/privacy".to_string()]);
    }

    #[test]
    fn dedups_repeated_results() {
        let html = r#"
            <a href="https://acme.com/privacy">one</a>
            <a href="https://acme.com/privacy/">two</a>
        "#;
        let results = SearchFallback::on_domain_results(html, "acme.com");
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn confidence_ladders_are_descending() {
        assert!(DDG_CONFIDENCE.windows(2).all(|w| w[0] > w[1]));
        assert!(BING_CONFIDENCE.windows(2).all(|w| w[0] > w[1]));
        assert!(DDG_CONFIDENCE[0] > BING_CONFIDENCE[0]);
    }
}
