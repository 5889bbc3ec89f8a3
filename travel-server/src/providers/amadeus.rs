//! Amadeus self-service HTTP client: airport lookup and flight offers.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::Coordinates;

use super::auth::CredentialProvider;
use super::error::{ProviderError, parse_json, status_error};
use super::types::{AirportInfo, FlightOffersResponse, FlightSearch, Location, LocationsResponse};

/// Default base URL (the self-service test environment).
const DEFAULT_BASE_URL: &str = "https://test.api.amadeus.com";

/// Search radius for the nearest-airport lookup.
const AIRPORT_RADIUS_KM: u32 = 500;

/// Configuration for the flight client.
#[derive(Debug, Clone)]
pub struct AmadeusConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl AmadeusConfig {
    /// Create a new config with the given client credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
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

    fn http(&self) -> Result<reqwest::Client, ProviderError> {
        Ok(reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .build()?)
    }

    /// Credential provider for this account's token endpoint.
    pub fn credential_provider(&self) -> Result<CredentialProvider, ProviderError> {
        Ok(CredentialProvider::new(
            self.http()?,
            format!(
                "{}/v1/security/oauth2/token",
                self.base_url.trim_end_matches('/')
            ),
            &self.client_id,
            &self.client_secret,
        ))
    }
}

/// Flight search client.
///
/// Every request carries a bearer token from the shared
/// [`CredentialProvider`]. A request rejected with 401 invalidates the
/// token and is retried exactly once.
#[derive(Debug, Clone)]
pub struct AmadeusClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialProvider>,
}

impl AmadeusClient {
    pub fn new(
        config: &AmadeusConfig,
        credentials: Arc<CredentialProvider>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            http: config.http()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let token = self.credentials.token().await?;
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(query)
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

    async fn get_authorized<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        match self.get_once(path, query).await {
            Err(ProviderError::Unauthorized) => {
                warn!(path, "flight API rejected token, refreshing once");
                self.credentials.invalidate().await;
                self.get_once(path, query).await
            }
            other => other,
        }
    }

    /// The airport closest to `location`.
    pub async fn nearest_airport(&self, location: Coordinates) -> Result<Location, ProviderError> {
        let response: LocationsResponse = self
            .get_authorized(
                "v1/reference-data/locations/airports",
                &[
                    ("latitude", format!("{:.4}", location.lat)),
                    ("longitude", format!("{:.4}", location.lon)),
                    ("radius", AIRPORT_RADIUS_KM.to_string()),
                    ("sort", "distance".to_string()),
                    ("page[limit]", "1".to_string()),
                ],
            )
            .await?;

        response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Api {
                status: 404,
                message: format!(
                    "no airport within {AIRPORT_RADIUS_KM} km of {:.4},{:.4}",
                    location.lat, location.lon
                ),
            })
    }

    /// Look up an airport by IATA code.
    pub async fn airport(&self, iata: &str) -> Result<Option<Location>, ProviderError> {
        let response: LocationsResponse = self
            .get_authorized(
                "v1/reference-data/locations",
                &[
                    ("subType", "AIRPORT".to_string()),
                    ("keyword", iata.to_string()),
                ],
            )
            .await?;

        Ok(response.data.into_iter().find(|l| l.iata_code == iata))
    }

    /// One-way offers for one adult.
    pub async fn flight_offers(
        &self,
        origin_iata: &str,
        destination_iata: &str,
        date: NaiveDate,
        max_offers: u32,
        currency: &str,
    ) -> Result<FlightOffersResponse, ProviderError> {
        self.get_authorized(
            "v2/shopping/flight-offers",
            &[
                ("originLocationCode", origin_iata.to_string()),
                ("destinationLocationCode", destination_iata.to_string()),
                ("departureDate", date.format("%Y-%m-%d").to_string()),
                ("adults", "1".to_string()),
                ("max", max_offers.to_string()),
                ("currencyCode", currency.to_string()),
            ],
        )
        .await
    }

    /// Offers between the airports nearest to two points, together with
    /// every airport the offers' first itineraries touch.
    pub async fn search(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        date: NaiveDate,
        max_offers: u32,
        currency: &str,
    ) -> Result<FlightSearch, ProviderError> {
        let (from, to) = tokio::try_join!(
            self.nearest_airport(origin),
            self.nearest_airport(destination)
        )?;
        debug!(from = %from.iata_code, to = %to.iata_code, "nearest airports");

        let offers = self
            .flight_offers(&from.iata_code, &to.iata_code, date, max_offers, currency)
            .await?;

        let mut airports: HashMap<String, AirportInfo> = HashMap::new();
        for location in [&from, &to] {
            if let Some(info) = location.airport_info() {
                airports.insert(location.iata_code.clone(), info);
            }
        }

        let missing: BTreeSet<&str> = offers
            .data
            .iter()
            .filter_map(|o| o.itineraries.first())
            .flat_map(|i| i.segments.iter())
            .flat_map(|s| [s.departure.iata_code.as_str(), s.arrival.iata_code.as_str()])
            .filter(|code| !airports.contains_key(*code))
            .collect();

        let lookups = join_all(missing.iter().map(|code| self.airport(code))).await;
        for (code, result) in missing.iter().zip(lookups) {
            match result {
                Ok(Some(location)) => {
                    if let Some(info) = location.airport_info() {
                        airports.insert(location.iata_code.clone(), info);
                    }
                }
                Ok(None) => warn!(code, "airport not found"),
                Err(e) => warn!(code, error = %e, "airport lookup failed"),
            }
        }

        Ok(FlightSearch { offers, airports })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_server::{Request, TestServer};

    const TOKEN_PATH: &str = "/v1/security/oauth2/token";
    const LOOKUP_PATH: &str = "/v1/reference-data/locations";

    /// Token endpoint handing out `tok-0`, `tok-1`, ...
    fn token(req: &Request) -> (u16, String) {
        (
            200,
            format!(
                r#"{{"access_token":"tok-{}","expires_in":3600,"token_type":"Bearer"}}"#,
                req.seen
            ),
        )
    }

    const CDG: &str = r#"{"data":[{"iataCode":"CDG","name":"CHARLES DE GAULLE"}]}"#;

    fn client(server: &TestServer) -> AmadeusClient {
        let config = AmadeusConfig::new("id", "secret")
            .with_base_url(&server.base_url)
            .with_timeout(5);
        let credentials = Arc::new(config.credential_provider().unwrap());
        AmadeusClient::new(&config, credentials).unwrap()
    }

    #[tokio::test]
    async fn rejected_token_is_refreshed_once() {
        let server = TestServer::start(|req| match req.path.as_str() {
            TOKEN_PATH => token(req),
            // Only the second token is accepted
            LOOKUP_PATH if req.bearer.as_deref() == Some("tok-1") => (200, CDG.to_string()),
            LOOKUP_PATH => (401, r#"{"errors":[]}"#.to_string()),
            _ => (404, String::new()),
        })
        .await;

        let airport = client(&server).airport("CDG").await.unwrap();

        assert_eq!(airport.map(|l| l.iata_code).as_deref(), Some("CDG"));
        assert_eq!(server.hits(TOKEN_PATH), 2);
        assert_eq!(server.hits(LOOKUP_PATH), 2);
    }

    #[tokio::test]
    async fn second_rejection_is_unauthorized() {
        let server = TestServer::start(|req| match req.path.as_str() {
            TOKEN_PATH => token(req),
            _ => (401, String::new()),
        })
        .await;

        let result = client(&server).airport("CDG").await;

        assert!(matches!(result, Err(ProviderError::Unauthorized)));
        assert_eq!(server.hits(TOKEN_PATH), 2);
        assert_eq!(server.hits(LOOKUP_PATH), 2);
    }

    #[tokio::test]
    async fn valid_token_is_not_refreshed() {
        let server = TestServer::start(|req| match req.path.as_str() {
            TOKEN_PATH => token(req),
            _ => (200, CDG.to_string()),
        })
        .await;
        let client = client(&server);

        client.airport("CDG").await.unwrap();
        client.airport("CDG").await.unwrap();

        assert_eq!(server.hits(TOKEN_PATH), 1);
        assert_eq!(server.hits(LOOKUP_PATH), 2);
    }

    #[tokio::test]
    async fn server_error_keeps_body() {
        let server = TestServer::start(|req| match req.path.as_str() {
            TOKEN_PATH => token(req),
            _ => (500, "upstream down".to_string()),
        })
        .await;

        match client(&server).airport("CDG").await {
            Err(ProviderError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(server.hits(LOOKUP_PATH), 1);
    }

    #[test]
    fn config_builder() {
        let config = AmadeusConfig::new("id", "secret")
            .with_base_url("http://localhost:9999")
            .with_timeout(7);
        assert_eq!(config.client_id, "id");
        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.timeout_secs, 7);
    }

    #[test]
    fn token_url_derived_from_base() {
        let config = AmadeusConfig::new("id", "secret").with_base_url("http://flights.test/");
        let creds = config.credential_provider().unwrap();
        assert!(format!("{creds:?}").contains("http://flights.test/v1/security/oauth2/token"));
    }
}
