//! Client-credentials token cache for the flight API.

use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

use super::error::{ProviderError, parse_json, status_error};
use super::types::TokenResponse;

/// Refresh tokens this long before the provider says they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self, now: Instant) -> bool {
        now + EXPIRY_MARGIN < self.expires_at
    }
}

/// Issues and caches bearer tokens for one API account.
///
/// There is no process-wide token: each client is handed the provider it
/// should authenticate with. A token is fetched on first use, reused until
/// shortly before expiry, and discarded by `invalidate` when the API
/// rejects it.
#[derive(Debug)]
pub struct CredentialProvider {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    cached: RwLock<Option<CachedToken>>,
}

impl CredentialProvider {
    pub fn new(
        http: reqwest::Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            cached: RwLock::new(None),
        }
    }

    /// A provider that already holds `token`, valid for `ttl`.
    pub fn with_token(mut self, token: impl Into<String>, ttl: Duration) -> Self {
        self.cached = RwLock::new(Some(CachedToken {
            value: token.into(),
            expires_at: Instant::now() + ttl,
        }));
        self
    }

    /// Current bearer token, fetching a new one if needed.
    pub async fn token(&self) -> Result<String, ProviderError> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Instant::now())) {
                return Ok(token.value.clone());
            }
        }

        let mut cached = self.cached.write().await;
        // Another task may have refreshed while we waited for the write lock
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Instant::now())) {
            return Ok(token.value.clone());
        }

        let fresh = self.fetch().await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    /// Forget the cached token so the next call fetches a new one.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }

    async fn fetch(&self) -> Result<CachedToken, ProviderError> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(ProviderError::NotConfigured(
                "flight API client id/secret missing".to_string(),
            ));
        }

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        let body = response.text().await?;
        let token: TokenResponse = parse_json(&body)?;
        debug!(expires_in = token.expires_in, "fetched flight API token");

        Ok(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }
}
