//! Hostname splitting with awareness of multi-part public suffixes.

/// Country-code suffixes that occupy two labels. Registrable domains under
/// these keep three labels (`example.co.uk`).
const MULTI_PART_SUFFIXES: &[&str] = &[
    "co.uk", "org.uk", "ac.uk", "gov.uk", "me.uk", "net.uk",
    "com.au", "net.au", "org.au", "gov.au",
    "co.nz", "org.nz", "govt.nz",
    "co.jp", "or.jp", "ne.jp", "go.jp",
    "com.br", "com.mx", "com.ar", "com.co", "com.pe",
    "co.in", "net.in", "org.in",
    "com.sg", "com.hk", "com.tw", "com.my", "co.id", "com.ph", "co.th",
    "co.za", "org.za", "com.ng", "co.ke",
    "com.tr", "com.pl", "com.cn", "co.kr", "com.vn", "com.ua",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainParts {
    pub subdomain: Option<String>,
    /// Registrable domain, e.g. `example.com` or `example.co.uk`.
    pub root_domain: String,
    /// Effective TLD, e.g. `com` or `co.uk`.
    pub tld: String,
}

/// Split a bare hostname (no scheme) into subdomain / registrable domain / TLD.
/// Hosts with fewer than two labels come back unchanged with an empty TLD.
pub fn split_domain(host: &str) -> DomainParts {
    let host = host.trim_matches('.').to_lowercase();
    let labels: Vec<&str> = host.split('.').collect();

    if labels.len() < 2 {
        return DomainParts {
            subdomain: None,
            root_domain: host.clone(),
            tld: String::new(),
        };
    }

    let last_two = labels[labels.len() - 2..].join(".");
    let (tld, root_label_idx) = if labels.len() >= 3 && MULTI_PART_SUFFIXES.contains(&last_two.as_str()) {
        (last_two, labels.len() - 3)
    } else {
        (labels[labels.len() - 1].to_string(), labels.len() - 2)
    };

    let root_domain = format!("{}.{}", labels[root_label_idx], tld);
    let subdomain = if root_label_idx > 0 {
        Some(labels[..root_label_idx].join("."))
    } else {
        None
    };

    DomainParts {
        subdomain,
        root_domain,
        tld,
    }
}

/// Registrable domain of a host (`help.netflix.com` → `netflix.com`).
pub fn root_domain_of(host: &str) -> String {
    split_domain(host).root_domain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_simple_com() {
        let parts = split_domain("netflix.com");
        assert_eq!(parts.subdomain, None);
        assert_eq!(parts.root_domain, "netflix.com");
        assert_eq!(parts.tld, "com");
    }

    #[test]
    fn splits_subdomain() {
        let parts = split_domain("help.netflix.com");
        assert_eq!(parts.subdomain.as_deref(), Some("help"));
        assert_eq!(parts.root_domain, "netflix.com");
    }

    #[test]
    fn handles_multi_part_suffix() {
        let parts = split_domain("www.bbc.co.uk");
        assert_eq!(parts.subdomain.as_deref(), Some("www"));
        assert_eq!(parts.root_domain, "bbc.co.uk");
        assert_eq!(parts.tld, "co.uk");
    }

    #[test]
    fn bare_co_uk_registrable() {
        let parts = split_domain("bbc.co.uk");
        assert_eq!(parts.subdomain, None);
        assert_eq!(parts.root_domain, "bbc.co.uk");
    }

    #[test]
    fn single_label_passes_through() {
        let parts = split_domain("localhost");
        assert_eq!(parts.root_domain, "localhost");
        assert_eq!(parts.tld, "");
    }
}
