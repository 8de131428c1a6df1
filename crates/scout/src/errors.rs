use thiserror::Error;

/// Pipeline-level error type.
///
/// Failures scoped to a single query or a single candidate are caught and
/// logged at that scope; only wiring-level failures (cache store unusable,
/// misconfiguration) propagate out of the pipeline.
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("remote API error (status {status}): {message}")]
    Remote { status: u16, message: String },

    #[error("API quota exhausted (retry already attempted)")]
    QuotaExhausted,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt cache entry for key {key}")]
    CacheCorruption { key: String },

    #[error("cache store error: {0}")]
    CacheStore(#[from] std::io::Error),

    #[error("profile fetch failed for '{login}': {reason}")]
    MissingProfile { login: String, reason: String },

    #[error("requirements extraction failed: {0}")]
    Extraction(String),
}

impl ScoutError {
    /// True for the quota-exhaustion signal that triggers the one-shot
    /// cooldown retry in the fetch client.
    pub fn is_quota(&self) -> bool {
        match self {
            ScoutError::QuotaExhausted => true,
            ScoutError::Remote { status, message } => {
                (*status == 403 || *status == 429) && message.to_lowercase().contains("rate limit")
            }
            _ => false,
        }
    }
}
