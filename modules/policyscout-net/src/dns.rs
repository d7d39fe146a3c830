//! DNS verification for resolved domains: a domain is considered live when
//! any address record (IPv4 or IPv6) resolves via the system resolver.

use std::time::Duration;

use tracing::debug;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DnsOutcome {
    /// At least one A record.
    Ipv4,
    /// AAAA records only.
    Ipv6Only,
    /// The name resolved but returned no addresses.
    NoRecords,
    /// Resolution failed (NXDOMAIN, resolver error, timeout).
    NoSuchHost,
}

impl DnsOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, DnsOutcome::Ipv4 | DnsOutcome::Ipv6Only)
    }
}

/// Resolve `domain` through the OS resolver, preferring A over AAAA in the
/// reported outcome. Never panics, never raises.
pub async fn verify_domain(domain: &str) -> DnsOutcome {
    let lookup = tokio::time::timeout(LOOKUP_TIMEOUT, tokio::net::lookup_host((domain, 443u16)));
    match lookup.await {
        Ok(Ok(addrs)) => {
            let mut saw_v6 = false;
            for addr in addrs {
                if addr.is_ipv4() {
                    debug!(domain, %addr, "DNS verified (A)");
                    return DnsOutcome::Ipv4;
                }
                saw_v6 = true;
            }
            if saw_v6 {
                debug!(domain, "DNS verified (AAAA only)");
                DnsOutcome::Ipv6Only
            } else {
                DnsOutcome::NoRecords
            }
        }
        Ok(Err(e)) => {
            debug!(domain, error = %e, "DNS lookup failed");
            DnsOutcome::NoSuchHost
        }
        Err(_) => {
            debug!(domain, "DNS lookup timed out");
            DnsOutcome::NoSuchHost
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn nonsense_tld_does_not_resolve() {
        let outcome = verify_domain("definitely-not-a-real-host.invalid").await;
        assert!(!outcome.is_resolved());
    }

    #[test]
    fn outcome_classification() {
        assert!(DnsOutcome::Ipv4.is_resolved());
        assert!(DnsOutcome::Ipv6Only.is_resolved());
        assert!(!DnsOutcome::NoRecords.is_resolved());
        assert!(!DnsOutcome::NoSuchHost.is_resolved());
    }
}
