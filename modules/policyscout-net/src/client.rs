//! Rate-limited HTTP client wrapper. Sends the configured browser UA (or
//! Googlebot for the Meta-family allow-list), follows redirects, never
//! raises on non-2xx, and routes 429s into the rate limiter's cooldown.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::header;
use tracing::{debug, warn};

use policyscout_common::special_domains::uses_googlebot;
use policyscout_common::{host_of, Config, PolicyScoutError};

use crate::rate_limiter::RateLimiter;

/// Outcome of a GET: final URL after redirects, status, and body.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outcome of a HEAD probe.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
}

impl ProbeResult {
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.contains("text/html") || ct.contains("application/xhtml"))
            .unwrap_or(false)
    }
}

#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    limiter: Arc<RateLimiter>,
    /// Requests issued through this client (clones share the counter).
    requests: Arc<AtomicU64>,
    user_agent: String,
    googlebot_user_agent: String,
    accept: String,
    accept_language: String,
}

impl HttpClient {
    pub fn new(limiter: Arc<RateLimiter>, config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .expect("reqwest client construction cannot fail with static options");
        Self {
            client,
            limiter,
            requests: Arc::new(AtomicU64::new(0)),
            user_agent: config.user_agent.clone(),
            googlebot_user_agent: config.googlebot_user_agent.clone(),
            accept: config.accept.clone(),
            accept_language: config.accept_language.clone(),
        }
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Total requests issued through this client and its clones.
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    fn ua_for(&self, url: &str) -> &str {
        if uses_googlebot(&host_of(url)) {
            &self.googlebot_user_agent
        } else {
            &self.user_agent
        }
    }

    /// Rate-limited GET. Returns `RateLimited` on 429 (after recording the
    /// cooldown), `Network` on transport failure. Any other status is
    /// returned as a `FetchedPage` for the caller to inspect.
    pub async fn get(&self, url: &str, timeout: Duration) -> Result<FetchedPage, PolicyScoutError> {
        self.limiter.enforce(url).await;
        self.requests.fetch_add(1, Ordering::Relaxed);

        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .header(header::USER_AGENT, self.ua_for(url))
            .header(header::ACCEPT, &self.accept)
            .header(header::ACCEPT_LANGUAGE, &self.accept_language)
            .send()
            .await
            .map_err(|e| PolicyScoutError::Network(format!("GET {url}: {e}")))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());
            let wait = self.limiter.handle_rate_limited(url, retry_after.as_deref());
            return Err(PolicyScoutError::RateLimited {
                host: host_of(url),
                wait_secs: wait.as_secs(),
            });
        }

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response
            .text()
            .await
            .map_err(|e| PolicyScoutError::Network(format!("body of {url}: {e}")))?;

        Ok(FetchedPage {
            final_url,
            status,
            content_type,
            body,
        })
    }

    /// Rate-limited HEAD probe. Same 429 handling as `get`.
    pub async fn head(&self, url: &str, timeout: Duration) -> Result<ProbeResult, PolicyScoutError> {
        self.limiter.enforce(url).await;
        self.requests.fetch_add(1, Ordering::Relaxed);

        debug!(url, "HEAD");
        let response = self
            .client
            .head(url)
            .timeout(timeout)
            .header(header::USER_AGENT, self.ua_for(url))
            .header(header::ACCEPT, &self.accept)
            .header(header::ACCEPT_LANGUAGE, &self.accept_language)
            .send()
            .await
            .map_err(|e| PolicyScoutError::Network(format!("HEAD {url}: {e}")))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());
            let wait = self.limiter.handle_rate_limited(url, retry_after.as_deref());
            warn!(url, wait_secs = wait.as_secs(), "HEAD probe rate limited");
            return Err(PolicyScoutError::RateLimited {
                host: host_of(url),
                wait_secs: wait.as_secs(),
            });
        }

        Ok(ProbeResult {
            final_url: response.url().to_string(),
            status: response.status().as_u16(),
            content_type: response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn googlebot_ua_only_for_meta_family() {
        let limiter = Arc::new(RateLimiter::new());
        let client = HttpClient::new(limiter, &Config::default());
        assert!(client.ua_for("https://www.facebook.com/privacy").contains("Googlebot"));
        assert!(client.ua_for("https://www.instagram.com/legal").contains("Googlebot"));
        assert!(!client.ua_for("https://vercel.com/").contains("Googlebot"));
    }

    #[test]
    fn clones_share_the_request_counter() {
        let limiter = Arc::new(RateLimiter::new());
        let client = HttpClient::new(limiter, &Config::default());
        let clone = client.clone();
        assert!(Arc::ptr_eq(&client.requests, &clone.requests));
        assert_eq!(client.request_count(), 0);
    }

    #[test]
    fn probe_result_detects_html() {
        let html = ProbeResult {
            final_url: "https://example.com/privacy".into(),
            status: 200,
            content_type: Some("text/html; charset=utf-8".into()),
        };
        assert!(html.is_html());

        let pdf = ProbeResult {
            final_url: "https://example.com/privacy.pdf".into(),
            status: 200,
            content_type: Some("application/pdf".into()),
        };
        assert!(!pdf.is_html());

        let missing = ProbeResult {
            final_url: "https://example.com/".into(),
            status: 200,
            content_type: None,
        };
        assert!(!missing.is_html());
    }
}
