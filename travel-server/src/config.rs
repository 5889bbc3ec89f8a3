//! Application configuration from the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::costs::CostClientConfig;
use crate::itinerary::SearchConfig;
use crate::providers::{AmadeusConfig, GoogleMapsConfig};

/// Default per-provider timeout when `PROVIDER_TIMEOUT_SECS` is unset.
const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingEnvVar(&'static str),

    #[error("{var} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Where itinerary data comes from.
#[derive(Debug, Clone)]
pub enum Backend {
    /// Provider responses recorded as JSON files in a directory.
    Recorded(PathBuf),
    /// The live maps and flight APIs.
    Live {
        maps: GoogleMapsConfig,
        flights: AmadeusConfig,
    },
}

/// Settings read from the environment.
///
/// Every variable is optional on its own; [`AppConfig::backend`] decides
/// which ones are required together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub google_maps_api_key: Option<String>,
    pub amadeus_client_id: Option<String>,
    pub amadeus_client_secret: Option<String>,
    /// Base URL of the cost service; fixed costs are used when unset.
    pub cost_service_url: Option<String>,
    pub provider_timeout: Option<Duration>,
    pub recorded_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read settings through `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let provider_timeout = get("PROVIDER_TIMEOUT_SECS")
            .map(|value| match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                _ => Err(ConfigError::InvalidTimeout {
                    var: "PROVIDER_TIMEOUT_SECS",
                    value,
                }),
            })
            .transpose()?;

        Ok(Self {
            google_maps_api_key: get("GOOGLE_MAPS_API_KEY"),
            amadeus_client_id: get("AMADEUS_CLIENT_ID"),
            amadeus_client_secret: get("AMADEUS_CLIENT_SECRET"),
            cost_service_url: get("COST_SERVICE_URL"),
            provider_timeout,
            recorded_dir: get("TRAVEL_RECORDED_DIR").map(PathBuf::from),
        })
    }

    /// Recorded data if a directory is configured, otherwise the live APIs.
    ///
    /// # Errors
    ///
    /// Returns `Err` naming the first missing credential for live mode.
    pub fn backend(&self) -> Result<Backend, ConfigError> {
        if let Some(dir) = &self.recorded_dir {
            return Ok(Backend::Recorded(dir.clone()));
        }

        let key = self
            .google_maps_api_key
            .as_ref()
            .ok_or(ConfigError::MissingEnvVar("GOOGLE_MAPS_API_KEY"))?;
        let id = self
            .amadeus_client_id
            .as_ref()
            .ok_or(ConfigError::MissingEnvVar("AMADEUS_CLIENT_ID"))?;
        let secret = self
            .amadeus_client_secret
            .as_ref()
            .ok_or(ConfigError::MissingEnvVar("AMADEUS_CLIENT_SECRET"))?;

        let timeout = self.timeout().as_secs();
        Ok(Backend::Live {
            maps: GoogleMapsConfig::new(key).with_timeout(timeout),
            flights: AmadeusConfig::new(id, secret).with_timeout(timeout),
        })
    }

    pub fn cost_client(&self) -> Option<CostClientConfig> {
        self.cost_service_url.as_ref().map(|url| {
            CostClientConfig::new()
                .with_base_url(url)
                .with_timeout(self.timeout().as_secs())
        })
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig::default().with_timeout(self.timeout())
    }

    fn timeout(&self) -> Duration {
        self.provider_timeout.unwrap_or(DEFAULT_PROVIDER_TIMEOUT)
    }
}
