//! Sitemap strategy: read robots.txt for sitemap directives, pull the
//! sitemap XML, and keep URLs whose paths look legal-ish. Handles one
//! level of `<sitemapindex>` recursion.

use std::sync::Arc;
use std::sync::LazyLock;

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, info};

use policyscout_common::{
    canonical_url_key, CandidateSource, Config, PolicyCandidate, PolicyType,
};
use policyscout_net::HttpClient;

use super::{passes_domain_gate, Strategy};

static LOC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<loc>\s*([^<\s][^<]*?)\s*</loc>").expect("valid loc pattern"));

/// Path substrings that mark a sitemap URL as potentially legal content.
const LEGAL_FRAGMENTS: &[&str] = &["privacy", "legal", "terms", "datenschutz"];

pub struct SitemapStrategy {
    client: HttpClient,
    config: Arc<Config>,
}

impl SitemapStrategy {
    pub fn new(client: HttpClient, config: Arc<Config>) -> Self {
        Self { client, config }
    }

    fn extract_locs(xml: &str) -> Vec<String> {
        LOC_RE
            .captures_iter(xml)
            .map(|cap| cap[1].trim().to_string())
            .collect()
    }

    fn classify(url: &str) -> PolicyType {
        let lower = url.to_lowercase();
        if lower.contains("terms") || lower.contains("agb") {
            PolicyType::Terms
        } else if lower.contains("cookie") {
            PolicyType::Cookies
        } else {
            PolicyType::Privacy
        }
    }

    /// Sitemap URLs from robots.txt `Sitemap:` directives, defaulting to
    /// `/sitemap.xml`.
    async fn sitemap_urls(&self, domain: &str) -> Vec<String> {
        let robots_url = format!("https://{domain}/robots.txt");
        let mut urls = Vec::new();
        if let Ok(page) = self.client.get(&robots_url, self.config.probe_timeout).await {
            if page.is_success() {
                for line in page.body.lines() {
                    if let Some(rest) = line.trim().strip_prefix("Sitemap:") {
                        let url = rest.trim();
                        if !url.is_empty() {
                            urls.push(url.to_string());
                        }
                    }
                }
            }
        }
        if urls.is_empty() {
            urls.push(format!("https://{domain}/sitemap.xml"));
        }
        urls.truncate(self.config.max_sitemaps);
        urls
    }
}

#[async_trait]
impl Strategy for SitemapStrategy {
    fn name(&self) -> &'static str {
        "sitemap"
    }

    async fn execute(&self, domain: &str) -> Result<Vec<PolicyCandidate>> {
        let sitemap_urls = self.sitemap_urls(domain).await;
        let mut fetches_left = self.config.max_sitemaps;
        let mut page_urls: Vec<String> = Vec::new();

        for sitemap_url in &sitemap_urls {
            if fetches_left == 0 {
                break;
            }
            fetches_left -= 1;

            let xml = match self.client.get(sitemap_url, self.config.probe_timeout).await {
                Ok(page) if page.is_success() => page.body,
                Ok(page) => {
                    debug!(sitemap_url, status = page.status, "Sitemap fetch non-200");
                    continue;
                }
                Err(e) => {
                    debug!(sitemap_url, error = %e, "Sitemap fetch failed");
                    continue;
                }
            };

            let locs = Self::extract_locs(&xml);
            if xml.contains("<sitemapindex") {
                // One level of recursion: fetch the first child sitemap only.
                if let Some(child) = locs.first() {
                    if fetches_left > 0 {
                        fetches_left -= 1;
                        if let Ok(page) = self.client.get(child, self.config.probe_timeout).await {
                            if page.is_success() {
                                page_urls.extend(Self::extract_locs(&page.body));
                            }
                        }
                    }
                }
            } else {
                page_urls.extend(locs);
            }
        }

        let mut seen = std::collections::HashSet::new();
        let candidates: Vec<PolicyCandidate> = page_urls
            .into_iter()
            .filter(|url| {
                let lower = url.to_lowercase();
                LEGAL_FRAGMENTS.iter().any(|f| lower.contains(f))
            })
            .filter(|url| passes_domain_gate(url, domain))
            .filter(|url| seen.insert(canonical_url_key(url)))
            .map(|url| {
                let policy_type = Self::classify(&url);
                PolicyCandidate::new(&url, policy_type, CandidateSource::Sitemap, 90)
                    .with_detail("listed in sitemap")
            })
            .collect();

        info!(domain, candidates = candidates.len(), "Sitemap scan complete");
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_locs_from_urlset() {
        let xml = r#"<?xml version="1.0"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                <url><loc>https://example.com/</loc></url>
                <url><loc> https://example.com/legal/privacy </loc></url>
                <url><loc>https://example.com/blog/post</loc></url>
            </urlset>"#;
        let locs = SitemapStrategy::extract_locs(xml);
        assert_eq!(locs.len(), 3);
        assert_eq!(locs[1], "https://example.com/legal/privacy");
    }

    #[test]
    fn extracts_child_sitemaps_from_index() {
        let xml = r#"<sitemapindex>
            <sitemap><loc>https://example.com/sitemap-pages.xml</loc></sitemap>
            <sitemap><loc>https://example.com/sitemap-blog.xml</loc></sitemap>
        </sitemapindex>"#;
        let locs = SitemapStrategy::extract_locs(xml);
        assert_eq!(locs[0], "https://example.com/sitemap-pages.xml");
    }

    #[test]
    fn classification_by_path() {
        assert_eq!(
            SitemapStrategy::classify("https://a.com/legal/terms-of-service"),
            PolicyType::Terms
        );
        assert_eq!(
            SitemapStrategy::classify("https://a.com/cookie-policy"),
            PolicyType::Cookies
        );
        assert_eq!(
            SitemapStrategy::classify("https://a.com/privacy"),
            PolicyType::Privacy
        );
    }
}
