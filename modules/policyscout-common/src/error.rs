use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolicyScoutError {
    #[error("Could not resolve '{0}' to a verifiable domain")]
    Resolution(String),

    #[error("Strategy error: {0}")]
    Strategy(String),

    #[error("Rate limited by {host}, cooling down {wait_secs}s")]
    RateLimited { host: String, wait_secs: u64 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Validation inconclusive: {0}")]
    Inconclusive(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Feature vector must have {expected} entries, got {actual}")]
    Dimension { expected: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
