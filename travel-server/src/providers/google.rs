//! Google Maps HTTP client: transit directions, distance matrix and
//! reverse geocoding.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{Coordinates, RoadMode, TransitMode};
use crate::places::{Geocoder, PlaceError};

use super::error::{ProviderError, parse_json, status_error};
use super::types::{DirectionsResponse, DistanceMatrixResponse, GeocodeResponse};

/// Default base URL for the Maps web services.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Configuration for the Maps client.
#[derive(Debug, Clone)]
pub struct GoogleMapsConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GoogleMapsConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
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

/// Maps web-services client.
#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Format coordinates the way the Maps API expects them.
fn latlng(c: Coordinates) -> String {
    format!("{:.6},{:.6}", c.lat, c.lon)
}

/// Map the `status` field of a Maps response to an error.
///
/// `OK` and `ZERO_RESULTS` are successes; an empty result is for the
/// normalizers to judge.
fn check_api_status(status: &str, message: Option<&str>) -> Result<(), ProviderError> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        "REQUEST_DENIED" => Err(ProviderError::Unauthorized),
        "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => Err(ProviderError::RateLimited),
        other => Err(ProviderError::Api {
            status: 200,
            message: match message {
                Some(m) => format!("{other}: {m}"),
                None => other.to_string(),
            },
        }),
    }
}

impl GoogleMapsClient {
    pub fn new(config: GoogleMapsConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "Maps API key missing".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        let body = response.text().await?;
        parse_json(&body)
    }

    /// Transit directions departing at `departure`.
    pub async fn directions(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        departure: DateTime<Utc>,
        mode: TransitMode,
    ) -> Result<DirectionsResponse, ProviderError> {
        let response: DirectionsResponse = self
            .get_json(
                "directions/json",
                &[
                    ("origin", latlng(origin)),
                    ("destination", latlng(destination)),
                    ("mode", "transit".to_string()),
                    ("transit_mode", mode.as_query().to_string()),
                    ("departure_time", departure.timestamp().to_string()),
                ],
            )
            .await?;

        check_api_status(&response.status, response.error_message.as_deref())?;
        debug!(%mode, routes = response.routes.len(), "fetched transit directions");
        Ok(response)
    }

    /// Road distance and duration for a single origin/destination pair.
    pub async fn distance_matrix(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        mode: RoadMode,
    ) -> Result<DistanceMatrixResponse, ProviderError> {
        let response: DistanceMatrixResponse = self
            .get_json(
                "distancematrix/json",
                &[
                    ("origins", latlng(origin)),
                    ("destinations", latlng(destination)),
                    ("mode", mode.as_query().to_string()),
                ],
            )
            .await?;

        check_api_status(&response.status, response.error_message.as_deref())?;
        debug!(%mode, rows = response.rows.len(), "fetched distance matrix");
        Ok(response)
    }

    /// Reverse geocode coordinates, restricted to country results.
    pub async fn reverse_geocode(
        &self,
        location: Coordinates,
    ) -> Result<GeocodeResponse, ProviderError> {
        let response: GeocodeResponse = self
            .get_json(
                "geocode/json",
                &[
                    ("latlng", latlng(location)),
                    ("result_type", "country".to_string()),
                ],
            )
            .await?;

        check_api_status(&response.status, None)?;
        Ok(response)
    }
}

impl Geocoder for GoogleMapsClient {
    async fn country_at(&self, location: Coordinates) -> Result<Option<String>, PlaceError> {
        Ok(self.reverse_geocode(location).await?.country())
    }
}
