//! Multi-engine company-name resolution. Fires Google's "I'm Feeling
//! Lucky" redirect, Bing, and the DuckDuckGo HTML endpoint in parallel,
//! then picks the hostname the engines agree on.

use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

use futures::future;
use regex::Regex;
use tracing::{debug, info, warn};
use url::Url;

use policyscout_common::validator::is_blocked_domain;
use policyscout_common::{host_of, normalize_host};
use policyscout_net::HttpClient;

const ENGINE_TIMEOUT: Duration = Duration::from_secs(8);

/// Hosts that belong to search engines themselves; a redirect landing on
/// one of these means the engine gave us nothing.
const ENGINE_HOSTS: &[&str] = &[
    "google.com",
    "bing.com",
    "duckduckgo.com",
    "yahoo.com",
    "baidu.com",
    "yandex.com",
];

static RESULT_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href\s*=\s*["'](https?://[^"']+)["']"#).expect("valid href pattern")
});

#[derive(Debug, Clone)]
pub struct EngineResult {
    pub engine: &'static str,
    pub domain: String,
    /// Per-engine confidence in its own answer.
    pub confidence: u8,
    pub elapsed_ms: u64,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Consensus {
    pub domain: String,
    /// Mean per-engine confidence scaled by the agreement multiplier.
    pub confidence: u8,
    pub agreeing_engines: usize,
}

fn is_engine_host(host: &str) -> bool {
    let h = normalize_host(host);
    ENGINE_HOSTS.iter().any(|e| h == *e || h.ends_with(&format!(".{e}")))
}

/// First hostname in an HTML blob that is neither a search engine nor
/// blocklisted.
fn first_result_host(html: &str) -> Option<String> {
    for cap in RESULT_LINK_RE.captures_iter(html) {
        let raw = &cap[1];
        // DuckDuckGo wraps results in a /l/?uddg=<encoded> redirect.
        let target = if raw.contains("uddg=") {
            match Url::parse(raw) {
                Ok(u) => u
                    .query_pairs()
                    .find(|(k, _)| k == "uddg")
                    .map(|(_, v)| v.into_owned()),
                Err(_) => None,
            }
            .unwrap_or_else(|| raw.to_string())
        } else {
            raw.to_string()
        };

        let host = host_of(&target);
        if host.is_empty() || is_engine_host(&host) || is_blocked_domain(&host) {
            continue;
        }
        return Some(host);
    }
    None
}

pub struct SearchResolver {
    client: HttpClient,
}

impl SearchResolver {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    async fn query_google_lucky(&self, name: &str) -> EngineResult {
        let started = std::time::Instant::now();
        let query = format!("{name} official website");
        let url = format!(
            "https://www.google.com/search?btnI=1&q={}",
            urlencode(&query)
        );
        let mut result = EngineResult {
            engine: "google",
            domain: String::new(),
            confidence: 85,
            elapsed_ms: 0,
            error: None,
        };
        match self.client.get(&url, ENGINE_TIMEOUT).await {
            Ok(page) => {
                // The lucky redirect lands directly on the answer; otherwise
                // fall back to the first organic result link.
                let landed = host_of(&page.final_url);
                if !landed.is_empty() && !is_engine_host(&landed) && !is_blocked_domain(&landed) {
                    result.domain = landed;
                } else if let Some(host) = first_result_host(&page.body) {
                    result.domain = host;
                    result.confidence = 70;
                } else {
                    result.error = Some("no usable result".to_string());
                }
            }
            Err(e) => result.error = Some(e.to_string()),
        }
        result.elapsed_ms = started.elapsed().as_millis() as u64;
        result
    }

    async fn query_bing(&self, name: &str) -> EngineResult {
        let started = std::time::Instant::now();
        let query = format!("{name} official site");
        let url = format!("https://www.bing.com/search?q={}", urlencode(&query));
        let mut result = EngineResult {
            engine: "bing",
            domain: String::new(),
            confidence: 75,
            elapsed_ms: 0,
            error: None,
        };
        match self.client.get(&url, ENGINE_TIMEOUT).await {
            Ok(page) if page.is_success() => match first_result_host(&page.body) {
                Some(host) => result.domain = host,
                None => result.error = Some("no usable result".to_string()),
            },
            Ok(page) => result.error = Some(format!("HTTP {}", page.status)),
            Err(e) => result.error = Some(e.to_string()),
        }
        result.elapsed_ms = started.elapsed().as_millis() as u64;
        result
    }

    async fn query_duckduckgo(&self, name: &str) -> EngineResult {
        let started = std::time::Instant::now();
        let query = format!("{name} official website");
        let url = format!("https://html.duckduckgo.com/html/?q={}", urlencode(&query));
        let mut result = EngineResult {
            engine: "duckduckgo",
            domain: String::new(),
            confidence: 70,
            elapsed_ms: 0,
            error: None,
        };
        match self.client.get(&url, ENGINE_TIMEOUT).await {
            Ok(page) if page.is_success() => match first_result_host(&page.body) {
                Some(host) => result.domain = host,
                None => result.error = Some("no usable result".to_string()),
            },
            Ok(page) => result.error = Some(format!("HTTP {}", page.status)),
            Err(e) => result.error = Some(e.to_string()),
        }
        result.elapsed_ms = started.elapsed().as_millis() as u64;
        result
    }

    /// Run all three engines concurrently and combine their answers.
    pub async fn resolve(&self, name: &str) -> Option<Consensus> {
        let (google, bing, ddg) = future::join3(
            self.query_google_lucky(name),
            self.query_bing(name),
            self.query_duckduckgo(name),
        )
        .await;

        for r in [&google, &bing, &ddg] {
            match &r.error {
                Some(e) => debug!(engine = r.engine, error = %e, "Engine gave no answer"),
                None => debug!(engine = r.engine, domain = %r.domain, ms = r.elapsed_ms, "Engine answered"),
            }
        }

        let consensus = combine([google, bing, ddg]);
        match &consensus {
            Some(c) => info!(
                name,
                domain = %c.domain,
                confidence = c.confidence,
                engines = c.agreeing_engines,
                "Search consensus reached"
            ),
            None => warn!(name, "No engine produced a usable domain"),
        }
        consensus
    }
}

/// Group engine answers by hostname, score each group
/// `engines × 30 + mean(confidence)`, and pick the winner. The final
/// confidence is the group mean scaled by the agreement multiplier.
fn combine(results: [EngineResult; 3]) -> Option<Consensus> {
    let mut groups: HashMap<String, Vec<u8>> = HashMap::new();
    for r in results.iter().filter(|r| r.error.is_none() && !r.domain.is_empty()) {
        groups.entry(r.domain.to_lowercase()).or_default().push(r.confidence);
    }
    if groups.is_empty() {
        return None;
    }

    let (domain, confidences) = groups.into_iter().max_by(|(_, a), (_, b)| {
        let score = |v: &Vec<u8>| {
            v.len() as f64 * 30.0 + v.iter().map(|c| *c as f64).sum::<f64>() / v.len() as f64
        };
        score(a).total_cmp(&score(b))
    })?;

    let mean = confidences.iter().map(|c| *c as f64).sum::<f64>() / confidences.len() as f64;
    let multiplier = match confidences.len() {
        3 => 1.0,
        2 => 0.85,
        _ => 0.60,
    };

    Some(Consensus {
        domain,
        confidence: (mean * multiplier).round().clamp(0.0, 100.0) as u8,
        agreeing_engines: confidences.len(),
    })
}

fn urlencode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(engine: &'static str, domain: &str, confidence: u8) -> EngineResult {
        EngineResult {
            engine,
            domain: domain.to_string(),
            confidence,
            elapsed_ms: 10,
            error: if domain.is_empty() {
                Some("nothing".to_string())
            } else {
                None
            },
        }
    }

    #[test]
    fn three_way_agreement_keeps_full_confidence() {
        let consensus = combine([
            result("google", "acme.com", 85),
            result("bing", "acme.com", 75),
            result("duckduckgo", "acme.com", 70),
        ])
        .unwrap();
        assert_eq!(consensus.domain, "acme.com");
        assert_eq!(consensus.agreeing_engines, 3);
        // mean(85,75,70) ≈ 76.7, multiplier 1.0
        assert_eq!(consensus.confidence, 77);
    }

    #[test]
    fn two_way_agreement_beats_a_lone_engine() {
        let consensus = combine([
            result("google", "wrong.com", 85),
            result("bing", "acme.com", 75),
            result("duckduckgo", "acme.com", 70),
        ])
        .unwrap();
        assert_eq!(consensus.domain, "acme.com");
        assert_eq!(consensus.agreeing_engines, 2);
        // mean(75,70) = 72.5 × 0.85 ≈ 62
        assert_eq!(consensus.confidence, 62);
    }

    #[test]
    fn single_engine_is_discounted() {
        let consensus = combine([
            result("google", "", 85),
            result("bing", "", 75),
            result("duckduckgo", "acme.com", 70),
        ])
        .unwrap();
        assert_eq!(consensus.agreeing_engines, 1);
        assert_eq!(consensus.confidence, 42); // 70 × 0.60
    }

    #[test]
    fn all_failures_yield_none() {
        assert!(combine([
            result("google", "", 85),
            result("bing", "", 75),
            result("duckduckgo", "", 70),
        ])
        .is_none());
    }

    #[test]
    fn first_result_host_skips_engines_and_blocked() {
        let html = r#"
            <a href="https://www.google.com/preferences">settings</a>
            <a href="https://www.linkedin.com/company/acme-fictional-corp">Acme on LinkedIn</a>
            <a href="https://acme-fictional-corp.com/about">Acme</a>
        "#;
        assert_eq!(
            first_result_host(html).as_deref(),
            Some("acme-fictional-corp.com")
        );
    }

    #[test]
    fn duckduckgo_redirects_are_unwrapped() {
        let html = r#"<a class="result__a" href="https://duckduckgo.com/l/?uddg=https%3A%2F%2Facme.com%2F&rut=abc">Acme</a>"#;
        assert_eq!(first_result_host(html).as_deref(), Some("acme.com"));
    }

    #[test]
    fn urlencode_spaces() {
        assert_eq!(urlencode("acme corp official"), "acme+corp+official");
    }
}
