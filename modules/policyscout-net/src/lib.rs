pub mod client;
pub mod dns;
pub mod rate_limiter;

pub use client::{FetchedPage, HttpClient, ProbeResult};
pub use rate_limiter::RateLimiter;
