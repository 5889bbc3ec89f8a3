//! The `ItinerarySource` seam between the aggregator and the providers.

use crate::domain::{RoadMode, TransitMode};
use crate::itinerary::SearchQuery;

use super::amadeus::AmadeusClient;
use super::error::ProviderError;
use super::google::GoogleMapsClient;
use super::types::{DirectionsResponse, DistanceMatrixResponse, FlightSearch};

/// Raw provider data for one search, one method per provider family.
pub trait ItinerarySource {
    async fn flight_offers(
        &self,
        query: &SearchQuery,
        max_offers: u32,
        currency: &str,
    ) -> Result<FlightSearch, ProviderError>;

    async fn distance_matrix(
        &self,
        query: &SearchQuery,
        mode: RoadMode,
    ) -> Result<DistanceMatrixResponse, ProviderError>;

    async fn transit_directions(
        &self,
        query: &SearchQuery,
        mode: TransitMode,
    ) -> Result<DirectionsResponse, ProviderError>;
}

/// Live HTTP providers: Maps for ground modes, Amadeus for flights.
#[derive(Debug, Clone)]
pub struct LiveSource {
    maps: GoogleMapsClient,
    flights: AmadeusClient,
}

impl LiveSource {
    pub fn new(maps: GoogleMapsClient, flights: AmadeusClient) -> Self {
        Self { maps, flights }
    }

    /// The Maps client, which also serves as the reverse geocoder.
    pub fn maps(&self) -> &GoogleMapsClient {
        &self.maps
    }
}

impl ItinerarySource for LiveSource {
    async fn flight_offers(
        &self,
        query: &SearchQuery,
        max_offers: u32,
        currency: &str,
    ) -> Result<FlightSearch, ProviderError> {
        self.flights
            .search(
                query.origin.location,
                query.destination.location,
                query.departure.date_naive(),
                max_offers,
                currency,
            )
            .await
    }

    async fn distance_matrix(
        &self,
        query: &SearchQuery,
        mode: RoadMode,
    ) -> Result<DistanceMatrixResponse, ProviderError> {
        self.maps
            .distance_matrix(query.origin.location, query.destination.location, mode)
            .await
    }

    async fn transit_directions(
        &self,
        query: &SearchQuery,
        mode: TransitMode,
    ) -> Result<DirectionsResponse, ProviderError> {
        self.maps
            .directions(
                query.origin.location,
                query.destination.location,
                query.departure,
                mode,
            )
            .await
    }
}
