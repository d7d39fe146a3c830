pub mod config;
pub mod domain;
pub mod error;
pub mod multilingual;
pub mod special_domains;
pub mod types;
pub mod validator;

pub use config::Config;
pub use error::PolicyScoutError;
pub use types::*;

/// Normalize a host for rate-limit keys and blocklist lookups:
/// lowercase + strip leading `www.`.
///
/// ```
/// assert_eq!(policyscout_common::normalize_host("WWW.Example.COM"), "example.com");
/// assert_eq!(policyscout_common::normalize_host("docs.example.com"), "docs.example.com");
/// ```
pub fn normalize_host(host: &str) -> String {
    let h = host.to_lowercase();
    h.strip_prefix("www.").unwrap_or(&h).to_string()
}

/// Extract the normalized host from a URL string. Empty string on parse failure.
pub fn host_of(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(normalize_host))
        .unwrap_or_default()
}

/// Canonical form used for candidate dedup and visited sets:
/// lowercased scheme+host+path with the trailing slash stripped.
pub fn canonical_url_key(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(u) => {
            let host = u.host_str().unwrap_or_default().to_lowercase();
            let path = u.path().trim_end_matches('/');
            format!("{}://{}{}", u.scheme(), host, path.to_lowercase())
        }
        Err(_) => url.trim_end_matches('/').to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_key_strips_slash_and_case() {
        assert_eq!(
            canonical_url_key("https://Example.com/Legal/Privacy/"),
            "https://example.com/legal/privacy"
        );
        assert_eq!(
            canonical_url_key("https://example.com/legal/privacy"),
            canonical_url_key("HTTPS://EXAMPLE.COM/legal/privacy/"),
        );
    }

    #[test]
    fn host_of_handles_garbage() {
        assert_eq!(host_of("not a url"), "");
        assert_eq!(host_of("https://www.Site.de/a/b"), "site.de");
    }
}
