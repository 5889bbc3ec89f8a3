//! Recorded provider responses for development without API keys.
//!
//! Loads one JSON file per mode from a directory and serves it for every
//! query, whatever the origin and destination.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{RoadMode, TransitMode};
use crate::itinerary::SearchQuery;

use super::error::ProviderError;
use super::source::ItinerarySource;
use super::types::{DirectionsResponse, DistanceMatrixResponse, FlightSearch};

#[derive(Debug, Default)]
struct Recorded {
    plane: Option<FlightSearch>,
    car: Option<DistanceMatrixResponse>,
    bike: Option<DistanceMatrixResponse>,
    train: Option<DirectionsResponse>,
    bus: Option<DirectionsResponse>,
}

impl Recorded {
    fn is_empty(&self) -> bool {
        self.plane.is_none()
            && self.car.is_none()
            && self.bike.is_none()
            && self.train.is_none()
            && self.bus.is_none()
    }
}

/// Serves responses recorded to `plane.json`, `car.json`, `bike.json`,
/// `train.json` and `bus.json`.
///
/// Modes without a file fail with [`ProviderError::Fixture`], which drops
/// that option from the search like any other provider failure.
#[derive(Debug, Clone, Default)]
pub struct RecordedSource {
    recorded: Arc<Recorded>,
}

/// Load `dir/name`, or `None` if the file does not exist.
fn load<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Option<T>, ProviderError> {
    let path = dir.join(name);
    if !path.is_file() {
        return Ok(None);
    }

    let json = std::fs::read_to_string(&path)
        .map_err(|e| ProviderError::Fixture(format!("failed to read {path:?}: {e}")))?;

    let parsed = serde_json::from_str(&json)
        .map_err(|e| ProviderError::Fixture(format!("failed to parse {path:?}: {e}")))?;

    debug!(?path, "loaded recorded response");
    Ok(Some(parsed))
}

fn missing(mode: &str) -> ProviderError {
    ProviderError::Fixture(format!("no recorded {mode} response"))
}

impl RecordedSource {
    /// Load recorded responses from a directory.
    ///
    /// Fails if the directory holds none of the expected files.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ProviderError::Fixture(format!(
                "recorded data directory {dir:?} does not exist"
            )));
        }

        let recorded = Recorded {
            plane: load(dir, "plane.json")?,
            car: load(dir, "car.json")?,
            bike: load(dir, "bike.json")?,
            train: load(dir, "train.json")?,
            bus: load(dir, "bus.json")?,
        };

        if recorded.is_empty() {
            return Err(ProviderError::Fixture(format!(
                "no recorded responses found in {dir:?}"
            )));
        }

        Ok(Self {
            recorded: Arc::new(recorded),
        })
    }

    /// Build a source from in-memory responses.
    pub fn from_parts(
        plane: Option<FlightSearch>,
        car: Option<DistanceMatrixResponse>,
        bike: Option<DistanceMatrixResponse>,
        train: Option<DirectionsResponse>,
        bus: Option<DirectionsResponse>,
    ) -> Self {
        Self {
            recorded: Arc::new(Recorded {
                plane,
                car,
                bike,
                train,
                bus,
            }),
        }
    }
}

impl ItinerarySource for RecordedSource {
    async fn flight_offers(
        &self,
        _query: &SearchQuery,
        _max_offers: u32,
        _currency: &str,
    ) -> Result<FlightSearch, ProviderError> {
        self.recorded.plane.clone().ok_or_else(|| missing("plane"))
    }

    async fn distance_matrix(
        &self,
        _query: &SearchQuery,
        mode: RoadMode,
    ) -> Result<DistanceMatrixResponse, ProviderError> {
        let recorded = match mode {
            RoadMode::Driving => &self.recorded.car,
            RoadMode::Bicycling => &self.recorded.bike,
        };
        recorded.clone().ok_or_else(|| missing(mode.as_query()))
    }

    async fn transit_directions(
        &self,
        _query: &SearchQuery,
        mode: TransitMode,
    ) -> Result<DirectionsResponse, ProviderError> {
        let recorded = match mode {
            TransitMode::Train => &self.recorded.train,
            TransitMode::Bus => &self.recorded.bus,
        };
        recorded.clone().ok_or_else(|| missing(mode.as_query()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::segment::fixtures::{at, place};
    use crate::domain::Direction;

    fn query() -> SearchQuery {
        SearchQuery::new(place(1, "Lyon"), place(2, "Paris"), at(9, 0), Direction::Outward)
    }

    const CAR: &str = r#"{
        "status": "OK",
        "origin_addresses": ["Lyon, France"],
        "destination_addresses": ["Paris, France"],
        "rows": [{ "elements": [{
            "status": "OK",
            "distance": { "text": "465 km", "value": 465000 },
            "duration": { "text": "4 hours 30 mins", "value": 16200 }
        }] }]
    }"#;

    #[tokio::test]
    async fn loads_present_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("car.json"), CAR).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let source = RecordedSource::load(dir.path()).unwrap();
        let car = source
            .distance_matrix(&query(), RoadMode::Driving)
            .await
            .unwrap();
        assert_eq!(car.rows[0].elements[0].status, "OK");

        assert!(matches!(
            source.distance_matrix(&query(), RoadMode::Bicycling).await,
            Err(ProviderError::Fixture(_))
        ));
        assert!(matches!(
            source.transit_directions(&query(), TransitMode::Bus).await,
            Err(ProviderError::Fixture(_))
        ));
    }

    #[test]
    fn empty_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RecordedSource::load(dir.path()),
            Err(ProviderError::Fixture(_))
        ));
    }

    #[test]
    fn malformed_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("train.json"), "{ not json").unwrap();
        match RecordedSource::load(dir.path()) {
            Err(ProviderError::Fixture(msg)) => assert!(msg.contains("failed to parse")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_directory_rejected() {
        assert!(RecordedSource::load("/definitely/not/here").is_err());
    }
}
