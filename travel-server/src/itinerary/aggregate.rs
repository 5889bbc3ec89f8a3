//! Concurrent provider fetches, sequential normalization.

use std::future::Future;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::costs::CostLookup;
use crate::domain::{ItineraryOption, RoadMode, TransitMode, Vehicle};
use crate::places::{Geocoder, PlaceDirectory};
use crate::providers::{
    Collaborators, ItinerarySource, OptionError, ProviderError, ProviderResponse, normalize,
};

use super::config::SearchConfig;
use super::request::SearchQuery;

/// Keep the successful options, logging why the others were dropped.
///
/// Order is preserved. An empty result is valid.
pub fn aggregate_options(
    results: impl IntoIterator<Item = (Vehicle, Result<ItineraryOption, OptionError>)>,
) -> Vec<ItineraryOption> {
    let mut options = Vec::new();
    for (mode, result) in results {
        match result {
            Ok(option) => {
                debug!(
                    %mode,
                    segments = option.segments().len(),
                    co2_kg = option.total_co2_kg(),
                    "keeping itinerary option"
                );
                options.push(option);
            }
            Err(e) => warn!(%mode, error = %e, "discarding itinerary option"),
        }
    }
    options
}

/// Runs searches against one source with one set of collaborators.
pub struct Aggregator<S, G, D, C> {
    source: S,
    geocoder: G,
    places: D,
    costs: C,
    config: SearchConfig,
}

impl<S, G, D, C> Aggregator<S, G, D, C>
where
    S: ItinerarySource,
    G: Geocoder,
    D: PlaceDirectory,
    C: CostLookup,
{
    pub fn new(source: S, geocoder: G, places: D, costs: C, config: SearchConfig) -> Self {
        Self {
            source,
            geocoder,
            places,
            costs,
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The place directory options are resolved against.
    pub fn places(&self) -> &D {
        &self.places
    }

    /// Fetch one provider's response under the configured timeout.
    ///
    /// Returns `None` if the mode is disabled.
    async fn fetch<F>(
        &self,
        mode: Vehicle,
        request: F,
    ) -> Option<Result<ProviderResponse, OptionError>>
    where
        F: Future<Output = Result<ProviderResponse, ProviderError>>,
    {
        if !self.config.is_enabled(mode) {
            return None;
        }

        let started = Instant::now();
        let result = match tokio::time::timeout(self.config.provider_timeout, request).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(OptionError::Provider(e)),
            Err(_) => Err(OptionError::Timeout(mode)),
        };

        debug!(
            %mode,
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "provider fetch finished"
        );
        Some(result)
    }

    /// Search every enabled mode for `query`.
    ///
    /// Fetches run concurrently. Normalization runs afterwards in the order
    /// plane, bike, car, train, bus, so that places created for airports
    /// are reused by the ground modes.
    pub async fn search(&self, query: &SearchQuery) -> Vec<ItineraryOption> {
        let max_offers = self.config.max_flight_offers;
        let currency = self.config.currency.as_str();
        let source = &self.source;

        let (plane, bike, car, train, bus) = tokio::join!(
            self.fetch(Vehicle::Plane, async {
                source
                    .flight_offers(query, max_offers, currency)
                    .await
                    .map(ProviderResponse::Plane)
            }),
            self.fetch(Vehicle::Bike, async {
                source
                    .distance_matrix(query, RoadMode::Bicycling)
                    .await
                    .map(ProviderResponse::Bike)
            }),
            self.fetch(Vehicle::Car, async {
                source
                    .distance_matrix(query, RoadMode::Driving)
                    .await
                    .map(ProviderResponse::Car)
            }),
            self.fetch(Vehicle::Train, async {
                source
                    .transit_directions(query, TransitMode::Train)
                    .await
                    .map(ProviderResponse::Train)
            }),
            self.fetch(Vehicle::Bus, async {
                source
                    .transit_directions(query, TransitMode::Bus)
                    .await
                    .map(ProviderResponse::Bus)
            }),
        );

        let ctx = Collaborators::new(&self.geocoder, &self.places, &self.costs);
        let fetched = [
            (Vehicle::Plane, plane),
            (Vehicle::Bike, bike),
            (Vehicle::Car, car),
            (Vehicle::Train, train),
            (Vehicle::Bus, bus),
        ];

        let mut results = Vec::with_capacity(fetched.len());
        for (mode, response) in fetched {
            let Some(response) = response else {
                continue;
            };
            let result = match response {
                Ok(response) => normalize(&response, query, &ctx).await,
                Err(e) => Err(e),
            };
            results.push((mode, result));
        }

        let options = aggregate_options(results);
        info!(
            origin = %query.origin,
            destination = %query.destination,
            direction = %query.direction,
            options = options.len(),
            "itinerary search finished"
        );
        options
    }

    /// Search the outward trip and, if `return_departure` is given, the
    /// way back.
    pub async fn search_round_trip(
        &self,
        query: &SearchQuery,
        return_departure: Option<DateTime<Utc>>,
    ) -> (Vec<ItineraryOption>, Vec<ItineraryOption>) {
        let outward = self.search(query).await;
        let inbound = match return_departure {
            Some(departure) => self.search(&query.reversed(departure)).await,
            None => Vec::new(),
        };
        (outward, inbound)
    }
}
