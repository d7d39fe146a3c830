//! StandardPath strategy: concurrent HEAD probes of the configured
//! standard paths against both the bare and `www.` hosts. Cheap, no
//! parsing, and a hit is a strong signal.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use policyscout_common::special_domains::special_domain_policies;
use policyscout_common::{
    canonical_url_key, CandidateSource, Config, PolicyCandidate, PolicyType,
};
use policyscout_net::HttpClient;

use crate::html::is_auth_url;

use super::{passes_domain_gate, Strategy};

pub struct StandardPath {
    client: HttpClient,
    config: Arc<Config>,
    /// Policy types this instance probes for. The parallel orchestrator
    /// shards one instance per type group.
    types: Vec<PolicyType>,
}

impl StandardPath {
    pub fn new(client: HttpClient, config: Arc<Config>) -> Self {
        let types = config.requested_types.clone();
        Self {
            client,
            config,
            types,
        }
    }

    pub fn for_types(client: HttpClient, config: Arc<Config>, types: Vec<PolicyType>) -> Self {
        Self {
            client,
            config,
            types,
        }
    }

    /// Try a special-domain override with a verifying GET before probing.
    async fn try_special_override(&self, domain: &str) -> Vec<PolicyCandidate> {
        let Some(policies) = special_domain_policies(domain) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for (policy_type, url) in policies {
            if !self.types.contains(policy_type) {
                continue;
            }
            match self.client.get(url, self.config.validation_timeout).await {
                Ok(page) if page.is_success() => {
                    out.push(
                        PolicyCandidate::new(
                            &page.final_url,
                            *policy_type,
                            CandidateSource::SpecialDomain,
                            95,
                        )
                        .with_detail("special-domain override, fetch verified"),
                    );
                }
                Ok(page) => debug!(url, status = page.status, "Special override not verifiable"),
                Err(e) => debug!(url, error = %e, "Special override fetch failed"),
            }
        }
        out
    }
}

#[async_trait]
impl Strategy for StandardPath {
    fn name(&self) -> &'static str {
        "standard_path"
    }

    async fn execute(&self, domain: &str) -> Result<Vec<PolicyCandidate>> {
        let overrides = self.try_special_override(domain).await;
        if !overrides.is_empty() {
            return Ok(overrides);
        }

        // (url, type) pairs across both host variants. Privacy probes come
        // from the configured standard-paths list; other document types use
        // their per-type catalogs.
        let mut probes: Vec<(String, PolicyType)> = Vec::new();
        for policy_type in &self.types {
            let paths: &[&str] = if *policy_type == PolicyType::Privacy {
                self.config.standard_paths
            } else {
                policy_type.standard_paths()
            };
            for path in paths {
                for host in [domain.to_string(), format!("www.{domain}")] {
                    probes.push((format!("https://{host}{path}"), *policy_type));
                }
            }
        }

        let client = self.client.clone();
        let timeout = self.config.probe_timeout;
        let results: Vec<Option<(String, PolicyType)>> =
            stream::iter(probes.into_iter().map(|(url, policy_type)| {
                let client = client.clone();
                async move {
                    match client.head(&url, timeout).await {
                        Ok(probe)
                            if probe.status == 200
                                && probe.is_html()
                                && !is_auth_url(&probe.final_url) =>
                        {
                            Some((probe.final_url, policy_type))
                        }
                        Ok(_) => None,
                        Err(e) => {
                            debug!(url, error = %e, "HEAD probe failed");
                            None
                        }
                    }
                }
            }))
            .buffer_unordered(self.config.max_probe_concurrency)
            .collect()
            .await;

        let mut seen = std::collections::HashSet::new();
        let candidates: Vec<PolicyCandidate> = results
            .into_iter()
            .flatten()
            .filter(|(url, _)| passes_domain_gate(url, domain))
            .filter(|(url, _)| seen.insert(canonical_url_key(url)))
            .map(|(url, policy_type)| {
                PolicyCandidate::new(&url, policy_type, CandidateSource::StandardPath, 80)
                    .with_detail("standard path probe returned 200 HTML")
            })
            .collect();

        info!(domain, candidates = candidates.len(), "Standard path probing complete");
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use policyscout_common::{Config, PolicyType};

    #[test]
    fn configured_privacy_paths_cover_both_spellings() {
        let config = Config::default();
        assert!(config.standard_paths.contains(&"/privacy"));
        assert!(config.standard_paths.contains(&"/privacy-policy"));
        assert!(config.standard_paths.contains(&"/datenschutz"));
        // Around fifteen paths, per the probing contract.
        assert!((12..=20).contains(&config.standard_paths.len()));
    }

    #[test]
    fn other_types_use_their_own_catalogs() {
        assert!(PolicyType::Terms.standard_paths().contains(&"/terms"));
        assert!(PolicyType::Cookies.standard_paths().contains(&"/cookie-policy"));
    }
}
