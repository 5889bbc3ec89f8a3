//! Provider client error types.

/// Errors from the routing and pricing provider clients.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Body did not match the expected shape; `body` keeps its start.
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Error status code or error payload
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("rate limited by provider")]
    RateLimited,

    /// Rejected key or token
    #[error("unauthorized (invalid credentials)")]
    Unauthorized,

    #[error("not configured: {0}")]
    NotConfigured(String),

    /// Recorded response missing or unreadable
    #[error("recorded fixture error: {0}")]
    Fixture(String),
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_ref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}

/// Map a non-success HTTP status to a provider error.
pub(crate) fn status_error(status: reqwest::StatusCode, body: String) -> ProviderError {
    match status {
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            ProviderError::Unauthorized
        }
        reqwest::StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
        _ => ProviderError::Api {
            status: status.as_u16(),
            message: body,
        },
    }
}

/// Parse a JSON body, keeping the start of the body for diagnostics.
pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })
}
