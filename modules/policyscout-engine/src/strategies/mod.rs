//! Candidate-producing strategies. Each strategy independently proposes
//! policy URLs for a domain; the orchestrator merges and validates them.
//! All HTTP goes through the shared rate-limited client, and every emitted
//! candidate has already passed the domain validator.

use anyhow::Result;
use async_trait::async_trait;

use policyscout_common::validator::{is_blocked_url, validate_url_for_domain};
use policyscout_common::PolicyCandidate;

pub mod direct_fetch;
pub mod homepage;
pub mod search_fallback;
pub mod sitemap;
pub mod standard_path;

pub use direct_fetch::DirectFetch;
pub use homepage::HomepageScraper;
pub use search_fallback::SearchFallback;
pub use sitemap::SitemapStrategy;
pub use standard_path::StandardPath;

#[async_trait]
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;
    async fn execute(&self, domain: &str) -> Result<Vec<PolicyCandidate>>;
}

/// Final gate before a strategy may emit a candidate URL.
pub fn passes_domain_gate(url: &str, domain: &str) -> bool {
    !is_blocked_url(url) && validate_url_for_domain(url, domain).is_valid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_rejects_blocked_and_foreign_urls() {
        assert!(passes_domain_gate(
            "https://vercel.com/legal/privacy-policy",
            "vercel.com"
        ));
        assert!(!passes_domain_gate(
            "https://www.linkedin.com/company/vercel",
            "vercel.com"
        ));
        assert!(!passes_domain_gate("https://evil.com/privacy", "vercel.com"));
    }
}
