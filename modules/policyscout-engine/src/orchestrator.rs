//! Discovery orchestration: special-domain shortcut, strategy fan-out
//! (sequential or parallel worker pool), candidate merge/rank, content
//! validation, and deep-scan refinement.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use tracing::{debug, info, warn};

use policyscout_common::special_domains::special_domain_policies;
use policyscout_common::{
    canonical_url_key, CandidateSource, Config, DiscoveryResult, DiscoveryStats, PolicyCandidate,
    PolicyScoutError, PolicyType,
};
use policyscout_net::{HttpClient, RateLimiter};
use policyscout_neural::NeuralScorer;

use crate::content_validator::{should_deep_search, validate};
use crate::deep_scan::DeepLinkScanner;
use crate::html::{html_to_text, is_auth_url};
use crate::strategies::{
    DirectFetch, HomepageScraper, SearchFallback, SitemapStrategy, StandardPath, Strategy,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryMode {
    /// Strategies run in order with an early stop on a confident hit.
    Sequential,
    /// Up to ten pinned workers race under the overall wall-clock cap, with
    /// sequential mode as the fallback.
    Parallel,
}

/// Paths probed by the parallel mode's legal-hub worker.
const LEGAL_HUB_PATHS: &[&str] = &["/legal", "/legal/", "/policies", "/legal/privacy"];

/// Alternates tried when the chosen candidate fails validation.
const DEEP_SEARCH_ALTERNATES: usize = 4;

pub struct DiscoveryEngine {
    client: HttpClient,
    config: Arc<Config>,
    scorer: Option<Arc<NeuralScorer>>,
}

impl DiscoveryEngine {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let limiter = Arc::new(RateLimiter::new());
        let client = HttpClient::new(limiter, &config);
        Self {
            client,
            config,
            scorer: None,
        }
    }

    pub fn with_scorer(mut self, scorer: Arc<NeuralScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub async fn discover(&self, domain: &str) -> DiscoveryResult {
        self.discover_with_mode(domain, DiscoveryMode::Sequential).await
    }

    pub async fn discover_with_mode(&self, domain: &str, mode: DiscoveryMode) -> DiscoveryResult {
        let started = Instant::now();
        let requests_before = self.client.request_count();
        let mut stats = DiscoveryStats::default();
        let domain = domain.trim().trim_start_matches("www.").to_lowercase();

        // Phase 0: special-domain shortcut, no HTTP at all.
        if let Some(policies) = special_domain_policies(&domain) {
            let chosen: Vec<PolicyCandidate> = self
                .config
                .requested_types
                .iter()
                .filter_map(|requested| {
                    policies
                        .iter()
                        .find(|(t, _)| t == requested)
                        .map(|(t, url)| {
                            PolicyCandidate::new(*url, *t, CandidateSource::SpecialDomain, 99)
                                .with_detail("hard-coded special domain")
                        })
                })
                .collect();
            if !chosen.is_empty() {
                info!(domain, policies = chosen.len(), "Special domain shortcut");
                stats.record("special_domain", chosen.len());
                return DiscoveryResult {
                    success: true,
                    domain,
                    candidates_considered: chosen.len(),
                    policies: chosen,
                    elapsed_ms: started.elapsed().as_millis() as u64,
                    stats,
                    error: None,
                };
            }
        }

        // Phase 1: strategy fan-out.
        let candidates = match mode {
            DiscoveryMode::Sequential => self.run_sequential(&domain, &mut stats).await,
            DiscoveryMode::Parallel => {
                let capped = tokio::time::timeout(
                    self.config.discovery_timeout,
                    self.run_parallel(&domain, &mut stats),
                )
                .await;
                match capped {
                    Ok(candidates) if !candidates.is_empty() => candidates,
                    Ok(_) => {
                        info!(domain = domain.as_str(), "Parallel mode empty, falling back to sequential");
                        self.run_sequential(&domain, &mut stats).await
                    }
                    Err(_) => {
                        warn!(domain = domain.as_str(), "Parallel mode hit the wall clock, falling back to sequential");
                        self.run_sequential(&domain, &mut stats).await
                    }
                }
            }
        };

        if candidates.is_empty() {
            stats.http_requests = self.client.request_count() - requests_before;
            let mut result = DiscoveryResult::failure(
                &domain,
                "no strategy produced a candidate",
                started.elapsed().as_millis() as u64,
            );
            result.stats = stats;
            return result;
        }

        // Phase 2: merge, dedup, rank.
        let ranked = merge_and_rank(candidates);
        let considered = ranked.len();

        // Phase 3 + 4 per requested type.
        let mut policies = Vec::new();
        for policy_type in &self.config.requested_types {
            let of_type: Vec<&PolicyCandidate> =
                ranked.iter().filter(|c| c.policy_type == *policy_type).collect();
            let Some(best) = of_type.first() else {
                continue;
            };
            let alternates: Vec<PolicyCandidate> =
                of_type.iter().skip(1).map(|c| (*c).clone()).collect();

            let mut chosen = self.validate_choice((*best).clone(), &alternates).await;

            if *policy_type == PolicyType::Privacy {
                let scanner = DeepLinkScanner::new(self.client.clone(), self.config.clone());
                if let Some(refined) = scanner
                    .refine(&chosen.url, &domain, chosen.confidence)
                    .await
                {
                    chosen = PolicyCandidate::new(
                        &refined.url,
                        PolicyType::Privacy,
                        CandidateSource::DeepScan,
                        refined.confidence,
                    )
                    .with_detail(format!(
                        "{}; deep scan: {}",
                        chosen.method_detail, refined.reason
                    ));
                }
            }

            policies.push(chosen);
        }

        let success = !policies.is_empty();
        stats.http_requests = self.client.request_count() - requests_before;
        info!(
            domain = domain.as_str(),
            policies = policies.len(),
            considered,
            http_requests = stats.http_requests,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Discovery complete"
        );
        DiscoveryResult {
            success,
            domain,
            policies,
            candidates_considered: considered,
            elapsed_ms: started.elapsed().as_millis() as u64,
            stats,
            error: None,
        }
    }

    fn strategies(&self) -> Vec<Box<dyn Strategy>> {
        vec![
            Box::new(HomepageScraper::new(
                self.client.clone(),
                self.config.clone(),
                self.scorer.clone(),
            )),
            Box::new(DirectFetch::new(self.client.clone(), self.config.clone())),
            Box::new(StandardPath::new(self.client.clone(), self.config.clone())),
            Box::new(SitemapStrategy::new(self.client.clone(), self.config.clone())),
            Box::new(SearchFallback::new(self.client.clone(), self.config.clone())),
        ]
    }

    async fn run_sequential(
        &self,
        domain: &str,
        stats: &mut DiscoveryStats,
    ) -> Vec<PolicyCandidate> {
        let mut collected: Vec<PolicyCandidate> = Vec::new();
        for strategy in self.strategies() {
            match strategy.execute(domain).await {
                Ok(candidates) => {
                    debug!(
                        domain,
                        strategy = strategy.name(),
                        candidates = candidates.len(),
                        "Strategy finished"
                    );
                    stats.record(strategy.name(), candidates.len());
                    collected.extend(candidates);
                }
                Err(e) => {
                    // A failed strategy never aborts the pipeline.
                    warn!(domain, strategy = strategy.name(), error = %e, "Strategy failed, skipping");
                    stats.record(strategy.name(), 0);
                }
            }
            if collected
                .iter()
                .any(|c| c.confidence >= self.config.early_stop_confidence)
            {
                debug!(domain, "Early stop: confident candidate found");
                break;
            }
        }
        collected
    }

    /// Ten pinned workers: two homepage variants, sitemap, legal hub, four
    /// direct-probe shards split by policy type, search, and a reserved
    /// deep-scan slot (deep scan itself runs after validation).
    async fn run_parallel(
        &self,
        domain: &str,
        stats: &mut DiscoveryStats,
    ) -> Vec<PolicyCandidate> {
        let client = self.client.clone();
        let config = self.config.clone();

        let type_shards: [Vec<PolicyType>; 4] = [
            vec![PolicyType::Privacy, PolicyType::Gdpr],
            vec![PolicyType::Terms, PolicyType::AcceptableUse],
            vec![PolicyType::Cookies, PolicyType::Ccpa],
            vec![PolicyType::Security, PolicyType::Ai],
        ];

        let mut workers: Vec<BoxFuture<'_, anyhow::Result<Vec<PolicyCandidate>>>> = Vec::new();
        let mut labels: Vec<&'static str> = Vec::new();

        let homepage =
            HomepageScraper::new(client.clone(), config.clone(), self.scorer.clone());
        let domain_owned = domain.to_string();
        labels.push("homepage");
        workers.push(async move { homepage.execute(&domain_owned).await }.boxed());

        let homepage_www =
            HomepageScraper::new(client.clone(), config.clone(), self.scorer.clone());
        let www_domain = format!("www.{domain}");
        let domain_owned = domain.to_string();
        labels.push("homepage_www");
        workers.push(
            async move {
                // Same domain gate; the www host just gives redirect-shy sites
                // a second chance.
                let mut candidates = homepage_www.execute(&www_domain).await?;
                candidates.retain(|c| crate::strategies::passes_domain_gate(&c.url, &domain_owned));
                Ok(candidates)
            }
            .boxed(),
        );

        let sitemap = SitemapStrategy::new(client.clone(), config.clone());
        let domain_owned = domain.to_string();
        labels.push("sitemap");
        workers.push(async move { sitemap.execute(&domain_owned).await }.boxed());

        let hub_client = client.clone();
        let hub_config = config.clone();
        let domain_owned = domain.to_string();
        labels.push("legal_hub");
        workers.push(
            async move { probe_legal_hub(&hub_client, &hub_config, &domain_owned).await }.boxed(),
        );

        for shard in type_shards {
            let probe = StandardPath::for_types(client.clone(), config.clone(), shard);
            let domain_owned = domain.to_string();
            labels.push("standard_path");
            workers.push(async move { probe.execute(&domain_owned).await }.boxed());
        }

        let search = SearchFallback::new(client.clone(), config.clone());
        let domain_owned = domain.to_string();
        labels.push("search_fallback");
        workers.push(async move { search.execute(&domain_owned).await }.boxed());

        // Reserved deep-scan worker slot: deep scanning needs a validated
        // starting URL, so this worker idles by design.
        labels.push("deep_scan");
        workers.push(async move { Ok(Vec::new()) }.boxed());

        let results = join_all(workers).await;
        let mut collected = Vec::new();
        for (label, result) in labels.into_iter().zip(results) {
            match result {
                Ok(candidates) => {
                    stats.record(label, candidates.len());
                    collected.extend(candidates);
                }
                Err(e) => {
                    warn!(domain, worker = label, error = %e, "Parallel worker failed, skipping");
                    stats.record(label, 0);
                }
            }
        }
        collected
    }

    /// Phase 3: fetch the chosen candidate and confirm its body actually
    /// reads like a policy, falling back to ranked alternates when it
    /// doesn't.
    async fn validate_choice(
        &self,
        mut candidate: PolicyCandidate,
        alternates: &[PolicyCandidate],
    ) -> PolicyCandidate {
        let outcome = self
            .client
            .get(&candidate.url, self.config.validation_timeout)
            .await;

        let page = match outcome {
            Err(PolicyScoutError::RateLimited { host, .. }) => {
                // Inconclusive: cooled down, not disproven. No deep search.
                debug!(host, url = candidate.url.as_str(), "Validation rate limited, keeping candidate");
                candidate.method_detail.push_str("; validation inconclusive (429)");
                return candidate;
            }
            Err(e) => {
                debug!(url = candidate.url.as_str(), error = %e, "Validation fetch failed, keeping candidate");
                candidate.method_detail.push_str("; validation inconclusive (network)");
                return candidate;
            }
            Ok(page) => page,
        };

        if page.status == 200 && !is_auth_url(&page.final_url) {
            let text = html_to_text(&page.body);
            let report = validate(&text);
            if report.is_valid {
                let boost = (report.confidence / 10).min(10);
                candidate.confidence = (candidate.confidence.saturating_add(boost)).min(98);
                candidate
                    .method_detail
                    .push_str(&format!("; content validated ({})", report.confidence));
                return candidate;
            }
            if should_deep_search(&text) {
                debug!(url = candidate.url.as_str(), "Validation failed, trying alternates");
                if let Some(replacement) = self.first_valid_alternate(alternates).await {
                    return replacement;
                }
            }
        }

        // Invalid with no better alternative: degrade but keep an answer.
        candidate.confidence = candidate.confidence.saturating_sub(20).max(30);
        candidate.method_detail.push_str("; content validation failed");
        candidate
    }

    async fn first_valid_alternate(
        &self,
        alternates: &[PolicyCandidate],
    ) -> Option<PolicyCandidate> {
        for alternate in alternates.iter().take(DEEP_SEARCH_ALTERNATES) {
            let page = match self
                .client
                .get(&alternate.url, self.config.validation_timeout)
                .await
            {
                Ok(page) if page.status == 200 => page,
                Ok(_) => continue,
                Err(e) => {
                    debug!(url = alternate.url.as_str(), error = %e, "Alternate fetch failed");
                    continue;
                }
            };
            let report = validate(&html_to_text(&page.body));
            if report.is_valid {
                let mut chosen = alternate.clone();
                chosen.confidence = chosen.confidence.max(report.confidence).min(98);
                chosen.method_detail.push_str("; replaced invalid best candidate");
                return Some(chosen);
            }
        }
        None
    }
}

/// HEAD-probe the common legal-hub paths; hits come back at modest
/// confidence for validation and deep scanning to refine.
async fn probe_legal_hub(
    client: &HttpClient,
    config: &Arc<Config>,
    domain: &str,
) -> anyhow::Result<Vec<PolicyCandidate>> {
    let mut out = Vec::new();
    for path in LEGAL_HUB_PATHS {
        let url = format!("https://{domain}{path}");
        match client.head(&url, config.probe_timeout).await {
            Ok(probe) if probe.status == 200 && probe.is_html() && !is_auth_url(&probe.final_url) => {
                out.push(
                    PolicyCandidate::new(
                        &probe.final_url,
                        PolicyType::Privacy,
                        CandidateSource::LegalHub,
                        70,
                    )
                    .with_detail("legal hub path responded"),
                );
            }
            Ok(_) => {}
            Err(e) => debug!(url, error = %e, "Legal hub probe failed"),
        }
    }
    Ok(out)
}

/// Deduplicate by canonical URL (keeping the highest-confidence copy) and
/// sort by confidence descending with the source order as a stable
/// tie-break.
pub fn merge_and_rank(candidates: Vec<PolicyCandidate>) -> Vec<PolicyCandidate> {
    let mut by_url: HashMap<String, PolicyCandidate> = HashMap::new();
    for candidate in candidates {
        let key = canonical_url_key(&candidate.url);
        match by_url.get(&key) {
            Some(existing) if existing.confidence >= candidate.confidence => {}
            _ => {
                by_url.insert(key, candidate);
            }
        }
    }
    let mut ranked: Vec<PolicyCandidate> = by_url.into_values().collect();
    ranked.sort_by(|a, b| {
        b.confidence
            .cmp(&a.confidence)
            .then(a.source.rank().cmp(&b.source.rank()))
            .then(a.url.cmp(&b.url))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(url: &str, source: CandidateSource, confidence: u8) -> PolicyCandidate {
        PolicyCandidate::new(url, PolicyType::Privacy, source, confidence)
    }

    #[test]
    fn merge_dedups_case_and_trailing_slash() {
        let ranked = merge_and_rank(vec![
            candidate("https://a.com/privacy", CandidateSource::StandardPath, 80),
            candidate("https://a.com/Privacy/", CandidateSource::Sitemap, 90),
            candidate("https://a.com/legal/privacy", CandidateSource::FooterLink, 85),
        ]);
        assert_eq!(ranked.len(), 2);
        // Higher-confidence duplicate survives the merge.
        assert_eq!(ranked[0].confidence, 90);
        assert_eq!(ranked[0].source, CandidateSource::Sitemap);
    }

    #[test]
    fn rank_ties_break_on_source_order() {
        let ranked = merge_and_rank(vec![
            candidate("https://a.com/one", CandidateSource::Sitemap, 80),
            candidate("https://a.com/two", CandidateSource::FooterLink, 80),
            candidate("https://a.com/three", CandidateSource::SearchFallback, 80),
        ]);
        assert_eq!(ranked[0].source, CandidateSource::FooterLink);
        assert_eq!(ranked[1].source, CandidateSource::Sitemap);
        assert_eq!(ranked[2].source, CandidateSource::SearchFallback);
    }

    #[tokio::test]
    async fn special_domain_shortcut_needs_no_network() {
        let engine = DiscoveryEngine::new(Config::default());
        let result = engine.discover("netflix.com").await;
        assert!(result.success);
        let privacy = result
            .policies
            .iter()
            .find(|p| p.policy_type == PolicyType::Privacy)
            .unwrap();
        assert_eq!(privacy.url, "https://help.netflix.com/legal/privacy");
        assert_eq!(privacy.confidence, 99);
        assert_eq!(privacy.source, CandidateSource::SpecialDomain);
        let terms = result
            .policies
            .iter()
            .find(|p| p.policy_type == PolicyType::Terms)
            .unwrap();
        assert_eq!(terms.url, "https://help.netflix.com/legal/termsofuse");

        assert_eq!(result.stats.http_requests, 0);
        assert_eq!(result.stats.candidates_per_strategy["special_domain"], 2);
    }

    #[tokio::test]
    async fn www_prefix_also_hits_the_shortcut() {
        let engine = DiscoveryEngine::new(Config::default());
        let result = engine.discover("www.netflix.com").await;
        assert!(result.success);
        assert_eq!(result.policies[0].confidence, 99);
    }

    #[test]
    fn final_policies_respect_confidence_floor() {
        // The degrade path: invalid content subtracts 20 but floors at 30.
        let mut c = candidate("https://a.com/privacy", CandidateSource::SearchFallback, 40);
        c.confidence = c.confidence.saturating_sub(20).max(30);
        assert_eq!(c.confidence, 30);
        let mut c = candidate("https://a.com/privacy", CandidateSource::SearchFallback, 90);
        c.confidence = c.confidence.saturating_sub(20).max(30);
        assert_eq!(c.confidence, 70);
    }
}
