//! Cost service HTTP client.

use serde::Deserialize;
use tracing::debug;

use crate::domain::TransitMode;

use super::CostLookup;
use super::error::CostError;

/// Default base URL for the cost service.
const DEFAULT_BASE_URL: &str = "http://localhost:8090";

/// Body of every cost endpoint.
#[derive(Debug, Deserialize)]
struct CostResponse {
    cost: f64,
}

/// Configuration for the cost service client.
#[derive(Debug, Clone)]
pub struct CostClientConfig {
    /// Base URL for the service
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl CostClientConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for CostClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the toll, fuel and transit-fare endpoints.
#[derive(Debug, Clone)]
pub struct CostClient {
    http: reqwest::Client,
    base_url: String,
}

impl CostClient {
    pub fn new(config: CostClientConfig) -> Result<Self, CostError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(
        &self,
        what: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<f64, CostError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CostError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let parsed: CostResponse = serde_json::from_str(&body).map_err(|e| CostError::Json {
            message: e.to_string(),
        })?;

        if !parsed.cost.is_finite() || parsed.cost < 0.0 {
            return Err(CostError::InvalidAmount {
                what,
                amount: parsed.cost,
            });
        }

        debug!(what, cost = parsed.cost, "fetched cost");
        Ok(parsed.cost)
    }
}

impl CostLookup for CostClient {
    async fn toll_cost(&self, origin: &str) -> Result<f64, CostError> {
        self.fetch("toll", "toll", &[("origin", origin.to_string())])
            .await
    }

    async fn fuel_cost_per_liter(&self, origin: &str) -> Result<f64, CostError> {
        self.fetch("fuel", "fuel", &[("origin", origin.to_string())])
            .await
    }

    async fn transit_cost(
        &self,
        origin: &str,
        destination: &str,
        mode: TransitMode,
        distance_km: f64,
    ) -> Result<f64, CostError> {
        self.fetch(
            "transit fare",
            "transit",
            &[
                ("origin", origin.to_string()),
                ("destination", destination.to_string()),
                ("mode", mode.as_query().to_string()),
                ("distance", format!("{distance_km:.3}")),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = CostClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn config_builder() {
        let config = CostClientConfig::new()
            .with_base_url("http://costs.internal:9000/")
            .with_timeout(3);
        assert_eq!(config.base_url, "http://costs.internal:9000/");
        assert_eq!(config.timeout_secs, 3);
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client =
            CostClient::new(CostClientConfig::new().with_base_url("http://localhost:1/")).unwrap();
        assert_eq!(client.base_url, "http://localhost:1");
    }

    #[test]
    fn cost_response_shape() {
        let parsed: CostResponse = serde_json::from_str(r#"{"cost": 12.5}"#).unwrap();
        assert_eq!(parsed.cost, 12.5);
    }
}
