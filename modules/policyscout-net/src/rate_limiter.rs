//! Process-wide per-host request gate. Enforces inter-request spacing, a
//! rolling burst window, and 429 cooldowns. Cooperative: every HTTP request
//! must call `enforce` first.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;
use tracing::{debug, warn};

use policyscout_common::host_of;

/// Minimum spacing between two requests to the same host.
pub const MIN_INTERVAL: Duration = Duration::from_secs(2);
/// Rolling window for burst accounting.
pub const BURST_WINDOW: Duration = Duration::from_secs(15);
/// Requests allowed per host within one burst window.
pub const MAX_REQUESTS_PER_WINDOW: u32 = 5;
/// Default cooldown after a 429.
pub const COOLDOWN: Duration = Duration::from_secs(30);

#[derive(Default)]
struct HostState {
    last_request: Option<Instant>,
    window_started: Option<Instant>,
    window_count: u32,
    cooldown_until: Option<Instant>,
}

/// What `enforce` must do next for a host. Sleeps happen with the map
/// unlocked; the state is re-read afterwards.
enum Gate {
    Proceed,
    Sleep(Duration),
}

pub struct RateLimiter {
    hosts: Mutex<HashMap<String, HostState>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            hosts: Mutex::new(HashMap::new()),
        }
    }

    /// Block until a request to `url`'s host is allowed, then record it.
    /// The internal mutex is never held across a sleep.
    pub async fn enforce(&self, url: &str) {
        let host = host_of(url);
        if host.is_empty() {
            return;
        }

        loop {
            let gate = {
                let mut map = self.hosts.lock().expect("rate limiter mutex poisoned");
                let state = map.entry(host.clone()).or_default();
                Self::check(state, Instant::now())
            };

            match gate {
                Gate::Proceed => return,
                Gate::Sleep(wait) => {
                    debug!(host = host.as_str(), wait_ms = wait.as_millis() as u64, "Rate limit gate");
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    /// Examine state at `now`; either record the request or report how long
    /// to sleep. Mutates state only on proceed (and for window expiry).
    fn check(state: &mut HostState, now: Instant) -> Gate {
        // 1. Active cooldown from a 429.
        if let Some(until) = state.cooldown_until {
            if until > now {
                let jitter = Duration::from_millis(rand::rng().random_range(0..500));
                return Gate::Sleep(until - now + jitter);
            }
            state.cooldown_until = None;
        }

        // 2. Burst window accounting.
        if let Some(started) = state.window_started {
            let elapsed = now - started;
            if elapsed >= BURST_WINDOW {
                state.window_started = None;
                state.window_count = 0;
            } else if state.window_count >= MAX_REQUESTS_PER_WINDOW {
                return Gate::Sleep(BURST_WINDOW - elapsed);
            }
        }

        // 3. Inter-request spacing (no jitter).
        if let Some(last) = state.last_request {
            let since = now - last;
            if since < MIN_INTERVAL {
                return Gate::Sleep(MIN_INTERVAL - since);
            }
        }

        // 4. Record.
        state.last_request = Some(now);
        if state.window_started.is_none() {
            state.window_started = Some(now);
        }
        state.window_count += 1;
        Gate::Proceed
    }

    /// Record a 429 for `url`'s host. The cooldown is the larger of the
    /// parsed `Retry-After` value (clamped to 1–60 s) and the default
    /// cooldown. Returns the wait that was applied.
    pub fn handle_rate_limited(&self, url: &str, retry_after: Option<&str>) -> Duration {
        let host = host_of(url);
        let parsed = retry_after.and_then(parse_retry_after).unwrap_or(Duration::ZERO);
        let wait = parsed.max(COOLDOWN);

        warn!(
            host = host.as_str(),
            wait_secs = wait.as_secs(),
            "Received 429, entering cooldown"
        );

        let mut map = self.hosts.lock().expect("rate limiter mutex poisoned");
        let state = map.entry(host).or_default();
        state.cooldown_until = Some(Instant::now() + wait);
        state.window_started = None;
        state.window_count = 0;
        wait
    }

    /// Drop tracking state for one host, or for every host.
    pub fn clear(&self, host: Option<&str>) {
        let mut map = self.hosts.lock().expect("rate limiter mutex poisoned");
        match host {
            Some(h) => {
                map.remove(&policyscout_common::normalize_host(h));
            }
            None => map.clear(),
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a `Retry-After` header: integer seconds or an HTTP date.
/// Clamped to [1 s, 60 s]. None if unparseable.
fn parse_retry_after(value: &str) -> Option<Duration> {
    let value = value.trim();
    let secs = if let Ok(n) = value.parse::<i64>() {
        n
    } else if let Ok(when) = chrono::DateTime::parse_from_rfc2822(value) {
        (when.with_timezone(&chrono::Utc) - chrono::Utc::now()).num_seconds()
    } else {
        return None;
    };
    Some(Duration::from_secs(secs.clamp(1, 60) as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/privacy";

    #[test]
    fn parses_integer_and_clamps() {
        assert_eq!(parse_retry_after("5"), Some(Duration::from_secs(5)));
        assert_eq!(parse_retry_after("0"), Some(Duration::from_secs(1)));
        assert_eq!(parse_retry_after("600"), Some(Duration::from_secs(60)));
        assert_eq!(parse_retry_after("not a number or date"), None);
    }

    #[test]
    fn parses_http_date() {
        let future = chrono::Utc::now() + chrono::Duration::seconds(20);
        let header = future.to_rfc2822();
        let wait = parse_retry_after(&header).unwrap();
        assert!(wait >= Duration::from_secs(18) && wait <= Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn enforces_min_interval() {
        let limiter = RateLimiter::new();
        let t0 = Instant::now();
        limiter.enforce(URL).await;
        limiter.enforce(URL).await;
        assert!(Instant::now() - t0 >= MIN_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn different_hosts_do_not_interfere() {
        let limiter = RateLimiter::new();
        let t0 = Instant::now();
        limiter.enforce("https://a.com/").await;
        limiter.enforce("https://b.com/").await;
        // No spacing applies across distinct hosts.
        assert!(Instant::now() - t0 < MIN_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn burst_window_caps_requests() {
        let limiter = RateLimiter::new();
        let t0 = Instant::now();
        for _ in 0..MAX_REQUESTS_PER_WINDOW + 1 {
            limiter.enforce(URL).await;
        }
        // The sixth request cannot land inside the first burst window.
        assert!(Instant::now() - t0 >= BURST_WINDOW);
    }

    #[tokio::test(start_paused = true)]
    async fn cooldown_applies_after_429() {
        let limiter = RateLimiter::new();
        limiter.enforce(URL).await;
        let wait = limiter.handle_rate_limited(URL, Some("5"));
        // Retry-After of 5s loses to the 30s default cooldown.
        assert_eq!(wait, COOLDOWN);

        let t0 = Instant::now();
        limiter.enforce(URL).await;
        assert!(Instant::now() - t0 >= COOLDOWN);
    }

    #[tokio::test(start_paused = true)]
    async fn long_retry_after_beats_default_cooldown() {
        let limiter = RateLimiter::new();
        let wait = limiter.handle_rate_limited(URL, Some("45"));
        assert_eq!(wait, Duration::from_secs(45));
    }

    #[tokio::test(start_paused = true)]
    async fn clear_resets_tracking() {
        let limiter = RateLimiter::new();
        limiter.enforce(URL).await;
        limiter.clear(Some("example.com"));
        let t0 = Instant::now();
        limiter.enforce(URL).await;
        assert!(Instant::now() - t0 < MIN_INTERVAL);
    }

    #[test]
    fn www_and_bare_host_share_state() {
        let limiter = RateLimiter::new();
        limiter.handle_rate_limited("https://www.example.com/x", None);
        let map = limiter.hosts.lock().unwrap();
        assert!(map.contains_key("example.com"));
        assert_eq!(map.len(), 1);
    }
}
