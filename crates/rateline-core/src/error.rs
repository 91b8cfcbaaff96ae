use thiserror::Error;

/// Application-wide error types for rateline.
///
/// Nothing in this taxonomy is fatal to a run: network and back-calculation
/// failures are caught at the target-iteration boundary, logged, and reduce
/// the live-record count that feeds the fallback decision.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed (non-2xx after retries exhausted).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Back-calculation denominator is non-positive: an appreciation figure
    /// at or below -100% cannot yield a meaningful historical price.
    #[error("Invalid appreciation {pct}% for {locality}: denominator would be non-positive")]
    InvalidAppreciation { locality: String, pct: f64 },

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Returns true if this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::NetworkError(_) | AppError::Timeout(_) => true,
            AppError::HttpError(msg) => {
                msg.contains("429")
                    || msg.contains("500")
                    || msg.contains("502")
                    || msg.contains("503")
                    || msg.contains("504")
            }
            _ => false,
        }
    }
}
