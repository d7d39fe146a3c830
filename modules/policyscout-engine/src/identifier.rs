//! Input resolution: turn a company name or a domain-ish string into a
//! DNS-verified `DomainIdentity`. Alias-table hits resolve offline; bare
//! names fall back to search consensus, then TLD guessing.

use std::time::Duration;

use tracing::{debug, info, warn};

use policyscout_common::domain::split_domain;
use policyscout_common::{DomainIdentity, PolicyScoutError};
use policyscout_net::dns::verify_domain;
use policyscout_net::HttpClient;

use crate::aliases;
use crate::search::SearchResolver;

/// TLDs tried, in order, when nothing else resolves a bare name.
const GUESS_TLDS: &[&str] = &[".com", ".net", ".org", ".io", ".co", ".app"];

const GUESS_TIMEOUT: Duration = Duration::from_secs(4);

pub struct Identifier {
    client: HttpClient,
    resolver: SearchResolver,
}

impl Identifier {
    pub fn new(client: HttpClient) -> Self {
        let resolver = SearchResolver::new(client.clone());
        Self { client, resolver }
    }

    /// Resolve `input` to a verified domain identity.
    pub async fn identify(&self, input: &str) -> Result<DomainIdentity, PolicyScoutError> {
        let normalized = normalize_input(input);
        if normalized.is_empty() {
            return Err(PolicyScoutError::Resolution(input.to_string()));
        }

        // A dot and no interior whitespace means the input already is a domain.
        if normalized.contains('.') && !normalized.contains(char::is_whitespace) {
            return self.verify(input, &normalized, true).await;
        }

        // 1. Known-alias table — deterministic and offline.
        if let Some(domain) = aliases::lookup(&normalized) {
            info!(input, domain, "Resolved via alias table");
            return self.verify(input, domain, true).await;
        }

        // 2. Multi-engine search consensus.
        if let Some(consensus) = self.resolver.resolve(&normalized).await {
            debug!(input, domain = %consensus.domain, "Resolved via search consensus");
            return self.verify(input, &consensus.domain, true).await;
        }

        // 3. TLD guessing.
        let compact: String = normalized
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '-')
            .collect();
        if compact.is_empty() {
            return Err(PolicyScoutError::Resolution(input.to_string()));
        }
        for tld in GUESS_TLDS {
            let candidate = format!("{compact}{tld}");
            if self.probe(&candidate).await {
                info!(input, domain = %candidate, "Resolved via TLD guess");
                return self.verify(input, &candidate, true).await;
            }
        }

        // Last resort: assume .com, unverified.
        warn!(input, "Falling back to unverified .com guess");
        self.verify(input, &format!("{compact}.com"), false).await
    }

    /// HEAD-probe `https://<domain>` then `https://www.<domain>`.
    async fn probe(&self, domain: &str) -> bool {
        for host in [domain.to_string(), format!("www.{domain}")] {
            let url = format!("https://{host}/");
            match self.client.head(&url, GUESS_TIMEOUT).await {
                Ok(probe) if probe.status < 500 => return true,
                Ok(_) => {}
                Err(e) => debug!(url, error = %e, "TLD probe failed"),
            }
        }
        false
    }

    /// DNS-verify and assemble the identity. `require_dns` is false only for
    /// the final unverified `.com` fallback.
    async fn verify(
        &self,
        original: &str,
        domain: &str,
        require_dns: bool,
    ) -> Result<DomainIdentity, PolicyScoutError> {
        let clean = normalize_input(domain);
        let parts = split_domain(&clean);

        let is_valid = if require_dns {
            let outcome = verify_domain(&clean).await;
            if !outcome.is_resolved() {
                warn!(domain = %clean, ?outcome, "DNS verification failed");
                return Err(PolicyScoutError::Resolution(original.to_string()));
            }
            true
        } else {
            false
        };

        Ok(DomainIdentity {
            original_input: original.to_string(),
            clean_domain: clean,
            subdomain: parts.subdomain,
            root_domain: parts.root_domain,
            tld: parts.tld,
            is_valid,
        })
    }
}

/// Lowercase, trim, strip scheme, `www.` prefix, path, and trailing slash.
pub fn normalize_input(input: &str) -> String {
    let mut s = input.trim().to_lowercase();
    for prefix in ["https://", "http://"] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest.to_string();
        }
    }
    if let Some(rest) = s.strip_prefix("www.") {
        s = rest.to_string();
    }
    // Keep only the host part when a path or query tagged along.
    if s.contains('.') {
        if let Some(idx) = s.find(['/', '?', '#']) {
            s.truncate(idx);
        }
    }
    s.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_strips_scheme_www_and_path() {
        assert_eq!(normalize_input("https://www.Netflix.com/"), "netflix.com");
        assert_eq!(normalize_input("  HTTP://example.de/datenschutz  "), "example.de");
        assert_eq!(normalize_input("vercel.com?utm=x"), "vercel.com");
        assert_eq!(normalize_input("Acme Corp"), "acme corp");
        assert_eq!(normalize_input(""), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        for input in ["https://www.Netflix.com/", "help.netflix.com", "Acme Corp"] {
            let once = normalize_input(input);
            assert_eq!(normalize_input(&once), once);
        }
    }

    #[test]
    fn dotted_input_is_treated_as_domain() {
        // The dot heuristic: anything with a dot and no spaces skips name
        // resolution entirely.
        assert!("netflix.com".contains('.'));
        assert!(!"netflix.com".contains(char::is_whitespace));
        assert!(!"acme corp".contains('.') || "acme corp".contains(char::is_whitespace));
    }
}
