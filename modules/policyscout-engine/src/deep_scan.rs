//! Deep-link refinement: starting from an already-found policy URL, follow
//! a bounded set of promising in-domain links to locate the more specific
//! nested document (hub page → actual policy text). Tuned for the German
//! `/datenschutz/` → `/datenschutz/datenschutzerklaerung/` shape but with a
//! language-generic fallback.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use policyscout_common::multilingual::{score_link_text, score_privacy_url};
use policyscout_common::{canonical_url_key, Config, PolicyScoutError};
use policyscout_net::HttpClient;

use crate::html::{extract_content_links, html_to_text};
use crate::strategies::passes_domain_gate;

/// Body phrases that mark a hub/landing page linking to the real documents.
const HUB_INDICATORS: &[&str] = &[
    "overview",
    "übersicht",
    "uebersicht",
    "choose a topic",
    "select a topic",
    "learn more about",
    "weitere informationen",
    "mehr erfahren",
];

/// Indicator families for genuine policy text. Five total hits across the
/// families classify a page as an actual policy.
const ACTUAL_POLICY_INDICATORS: &[&str] = &[
    "art. 6",
    "art. 13",
    "article 6",
    "article 13",
    "gdpr",
    "dsgvo",
    "data subject rights",
    "betroffenenrechte",
    "lawful basis",
    "rechtsgrundlage",
    "legitimate interest",
    "berechtigtes interesse",
    "right to erasure",
    "recht auf löschung",
    "verantwortlicher",
    "data controller",
    "supervisory authority",
    "aufsichtsbehörde",
    "retention period",
    "speicherdauer",
];

/// German-specific nested paths probed directly from the start URL.
const GERMAN_NESTED_PATHS: &[&str] = &["datenschutzerklaerung", "datenschutzhinweise"];

/// Language-generic nested paths.
const GENERIC_NESTED_PATHS: &[&str] = &["privacy-policy", "privacy-statement", "privacy-notice"];

/// Strongest nested URL patterns and their link-score bonuses.
const NESTED_BONUS: &[(&str, i32)] = &[
    ("datenschutzerklaerung", 40),
    ("datenschutzerklärung", 40),
    ("privacy-policy", 35),
    ("privacy-statement", 35),
    ("privacy-notice", 35),
];

/// Links followed per page; bounds each branch to `1 + 5·depth` visits.
const LINKS_PER_PAGE: usize = 5;

const MIN_NESTED_BODY_BYTES: usize = 2048;

#[derive(Debug, Clone)]
pub struct DeepScanResult {
    pub url: String,
    pub confidence: u8,
    pub reason: String,
    pub depth: usize,
}

struct PageClass {
    is_hub: bool,
    is_actual_policy: bool,
    indicator_hits: usize,
}

fn classify_body(text_lower: &str) -> PageClass {
    let is_hub = HUB_INDICATORS.iter().any(|h| text_lower.contains(h));
    let indicator_hits: usize = ACTUAL_POLICY_INDICATORS
        .iter()
        .map(|i| text_lower.matches(i).count())
        .sum();
    PageClass {
        is_hub,
        is_actual_policy: indicator_hits >= 5,
        indicator_hits,
    }
}

fn nested_bonus(url_lower: &str) -> i32 {
    NESTED_BONUS
        .iter()
        .filter(|(fragment, _)| url_lower.contains(fragment))
        .map(|(_, bonus)| *bonus)
        .max()
        .unwrap_or(0)
}

pub struct DeepLinkScanner {
    client: HttpClient,
    config: Arc<Config>,
}

impl DeepLinkScanner {
    pub fn new(client: HttpClient, config: Arc<Config>) -> Self {
        Self { client, config }
    }

    /// Scan from `start_url` down to `max_depth`, returning the best
    /// refinement that strictly beats `current_confidence`.
    pub async fn refine(
        &self,
        start_url: &str,
        domain: &str,
        current_confidence: u8,
    ) -> Option<DeepScanResult> {
        let max_depth = self.config.deep_scan_depth;
        let mut visited: HashSet<String> = HashSet::new();
        let mut results: Vec<DeepScanResult> = Vec::new();

        // (url, depth, arrived_from_hub)
        let mut queue: VecDeque<(String, usize, bool)> = VecDeque::new();
        queue.push_back((start_url.to_string(), 0, false));

        while let Some((url, depth, from_hub)) = queue.pop_front() {
            if !visited.insert(canonical_url_key(&url)) {
                continue;
            }

            let page = match self.client.get(&url, self.config.validation_timeout).await {
                Ok(page) if page.is_success() => page,
                Ok(page) => {
                    debug!(url, status = page.status, "Deep scan page not fetchable");
                    continue;
                }
                Err(PolicyScoutError::RateLimited { host, .. }) => {
                    // 429 aborts this branch entirely.
                    warn!(host, url, "Deep scan branch aborted by rate limit");
                    continue;
                }
                Err(e) => {
                    debug!(url, error = %e, "Deep scan fetch failed");
                    continue;
                }
            };

            let text = html_to_text(&page.body).to_lowercase();
            let class = classify_body(&text);

            if class.is_actual_policy && depth > 0 && passes_domain_gate(&page.final_url, domain) {
                let url_lower = page.final_url.to_lowercase();
                let score = score_privacy_url(&url_lower) as i32 + nested_bonus(&url_lower);
                let hub_bonus = if from_hub { 15 } else { 0 };
                let confidence = (50 + score + hub_bonus + 10).clamp(0, 98) as u8;
                results.push(DeepScanResult {
                    url: page.final_url.clone(),
                    confidence,
                    reason: format!("{} policy indicators at depth {depth}", class.indicator_hits),
                    depth,
                });
            }

            if depth >= max_depth {
                continue;
            }

            // Harvest and rank in-domain links.
            let mut scored: Vec<(String, String, i32)> = extract_content_links(&page.body, &page.final_url)
                .into_iter()
                .filter(|l| passes_domain_gate(&l.url, domain))
                .map(|l| {
                    let url_lower = l.url.to_lowercase();
                    let score = score_link_text(&l.text) as i32
                        + score_privacy_url(&url_lower) as i32
                        + nested_bonus(&url_lower);
                    (l.url, l.text, score)
                })
                .filter(|(_, _, score)| *score > 0)
                .collect();
            scored.sort_by(|a, b| b.2.cmp(&a.2));

            for (link_url, _text, score) in scored.into_iter().take(LINKS_PER_PAGE) {
                let hub_bonus = if class.is_hub { 15 } else { 0 };
                let depth_bonus = if depth > 0 { 10 } else { 0 };
                let link_confidence = (50 + score + hub_bonus + depth_bonus).clamp(0, 98);

                if link_confidence >= 70 {
                    results.push(DeepScanResult {
                        url: link_url.clone(),
                        confidence: link_confidence as u8,
                        reason: format!("scored link (score {score}) at depth {depth}"),
                        depth,
                    });
                }
                if link_confidence >= 60 {
                    queue.push_back((link_url, depth + 1, class.is_hub));
                }
            }

            // Direct nested-path probes fire once, from the start page.
            if depth == 0 {
                let probed = self.probe_nested_paths(&page.final_url, domain, &mut visited).await;
                results.extend(probed);
            }
        }

        let best = results
            .into_iter()
            .filter(|r| r.confidence > current_confidence)
            .max_by_key(|r| r.confidence);

        match &best {
            Some(r) => info!(
                start_url,
                refined = %r.url,
                confidence = r.confidence,
                "Deep scan found a better policy URL"
            ),
            None => debug!(start_url, "Deep scan found nothing better"),
        }
        best
    }

    /// Probe `<base>/<nested>` for the fixed nested paths. A 200 with a
    /// substantial body full of policy indicators is a strong hit.
    async fn probe_nested_paths(
        &self,
        base_url: &str,
        domain: &str,
        visited: &mut HashSet<String>,
    ) -> Vec<DeepScanResult> {
        let base = match Url::parse(base_url) {
            Ok(u) => u,
            Err(_) => return Vec::new(),
        };
        let base_path = base.path().trim_end_matches('/');

        let mut out = Vec::new();
        let german_then_generic = GERMAN_NESTED_PATHS
            .iter()
            .map(|p| (*p, true))
            .chain(GENERIC_NESTED_PATHS.iter().map(|p| (*p, false)));

        for (nested, is_german) in german_then_generic {
            let mut probe_url = base.clone();
            probe_url.set_path(&format!("{base_path}/{nested}/"));
            let probe_url = probe_url.to_string();

            if !passes_domain_gate(&probe_url, domain) {
                continue;
            }
            if !visited.insert(canonical_url_key(&probe_url)) {
                continue;
            }

            let page = match self.client.get(&probe_url, self.config.validation_timeout).await {
                Ok(page) if page.is_success() => page,
                Ok(_) => continue,
                Err(e) => {
                    debug!(url = probe_url.as_str(), error = %e, "Nested probe failed");
                    continue;
                }
            };

            if page.body.len() <= MIN_NESTED_BODY_BYTES {
                continue;
            }
            if !passes_domain_gate(&page.final_url, domain) {
                continue;
            }
            let text = html_to_text(&page.body).to_lowercase();
            if !classify_body(&text).is_actual_policy {
                continue;
            }

            out.push(DeepScanResult {
                url: page.final_url.clone(),
                confidence: if is_german { 95 } else { 85 },
                reason: format!("direct nested probe /{nested}/"),
                depth: 1,
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hub_and_policy_classification() {
        let hub = "datenschutz übersicht — choose a topic below to learn more about our policies";
        let class = classify_body(hub);
        assert!(class.is_hub);
        assert!(!class.is_actual_policy);

        let policy = "verantwortlicher gemäß dsgvo. rechtsgrundlage ist art. 6 dsgvo. \
                      betroffenenrechte: recht auf löschung. aufsichtsbehörde zuständig. \
                      speicherdauer richtet sich nach gesetzlichen vorgaben.";
        let class = classify_body(policy);
        assert!(class.is_actual_policy, "hits: {}", class.indicator_hits);
    }

    #[test]
    fn short_marketing_text_is_neither() {
        let class = classify_body("welcome to our website. we sell widgets.");
        assert!(!class.is_hub);
        assert!(!class.is_actual_policy);
    }

    #[test]
    fn nested_bonus_prefers_german_explicit_paths() {
        assert_eq!(nested_bonus("https://a.de/datenschutz/datenschutzerklaerung/"), 40);
        assert_eq!(nested_bonus("https://a.com/legal/privacy-policy"), 35);
        assert_eq!(nested_bonus("https://a.com/about"), 0);
    }

    #[test]
    fn german_hub_link_clears_the_record_threshold() {
        // Scenario: hub page at depth 0 links to the explicit German policy.
        let url = "https://www.berenberg.de/datenschutz/datenschutzerklaerung/";
        let score = score_link_text("datenschutzerklärung") as i32
            + score_privacy_url(url) as i32
            + nested_bonus(url);
        let confidence = (50 + score + 15).clamp(0, 98);
        assert!(confidence >= 95, "confidence {confidence}");
    }
}
