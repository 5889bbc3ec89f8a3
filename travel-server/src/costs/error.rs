//! Cost service error types.

/// Errors that can occur when querying the cost service.
#[derive(Debug, thiserror::Error)]
pub enum CostError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Service returned a negative or non-finite amount
    #[error("invalid amount {amount} for {what}")]
    InvalidAmount { what: &'static str, amount: f64 },
}
