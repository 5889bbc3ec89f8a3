//! Conversion from provider responses to itinerary options.
//!
//! Each provider family has its own normalizer. All of them:
//! - Validate the raw response before touching any collaborator, so a
//!   malformed response never produces a partial option
//! - Resolve stops and airports to canonical places
//! - Attach CO2 and price to each segment
//! - Pin the first and last non-walking segments to the queried places
//! - Number the segments 1..N

mod flight;
mod road;
mod transit;

pub use flight::{normalize_flight, parse_iso_duration};
pub use road::normalize_road;
pub use transit::normalize_transit;

use chrono::Duration;

use crate::costs::CostError;
use crate::domain::{DomainError, ItineraryOption, Place, Segment, TransitMode, Vehicle};
use crate::itinerary::SearchQuery;
use crate::places::PlaceError;

use super::error::ProviderError;
use super::types::{DirectionsResponse, ProviderResponse};

/// Malformed or incomplete provider data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("step {step}: missing {field}")]
    MissingField { step: usize, field: &'static str },

    #[error("step {step}: vehicle type {vehicle_type} is not a {mode}")]
    UnknownVehicleType {
        step: usize,
        vehicle_type: String,
        mode: TransitMode,
    },

    #[error("step {step}: unexpected travel mode {travel_mode}")]
    UnexpectedTravelMode { step: usize, travel_mode: String },

    #[error("no route in response (status {status})")]
    NoRoute { status: String },

    #[error("route has no transit step")]
    NoTransitStep,

    #[error("distance matrix element status {0}")]
    ElementStatus(String),

    #[error("airport {0} missing from airport table")]
    UnknownAirport(String),

    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    #[error("invalid time: {0}")]
    InvalidTime(String),

    #[error("no flight offer with a valid price")]
    NoOffer,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Why one itinerary option was discarded.
#[derive(Debug, thiserror::Error)]
pub enum OptionError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("provider failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("place resolution failed: {0}")]
    Place(#[from] PlaceError),

    #[error("cost lookup failed: {0}")]
    Cost(#[from] CostError),

    #[error("{0} provider timed out")]
    Timeout(Vehicle),
}

impl From<DomainError> for OptionError {
    fn from(err: DomainError) -> Self {
        OptionError::Validation(ValidationError::Domain(err))
    }
}

/// A provider duration in seconds, rounded to whole seconds.
pub(crate) fn whole_seconds(secs: f64) -> Result<Duration, ValidationError> {
    Duration::try_seconds(secs.round() as i64)
        .ok_or_else(|| ValidationError::InvalidDuration(format!("{secs} s")))
}

/// The services a normalizer needs besides the response itself.
pub struct Collaborators<'a, G, D, C> {
    pub geocoder: &'a G,
    pub places: &'a D,
    pub costs: &'a C,
}

impl<'a, G, D, C> Collaborators<'a, G, D, C> {
    pub fn new(geocoder: &'a G, places: &'a D, costs: &'a C) -> Self {
        Self {
            geocoder,
            places,
            costs,
        }
    }
}

/// Set the departure of the first non-walking segment to `origin` and the
/// destination of the last one to `destination`.
///
/// Walking segments are left untouched.
pub(crate) fn pin_endpoints<'s, I>(segments: I, origin: &Place, destination: &Place)
where
    I: DoubleEndedIterator<Item = &'s mut Segment>,
{
    let mut rides = segments.filter(|s| !s.is_walk());
    match (rides.next(), rides.next_back()) {
        (Some(first), Some(last)) => {
            first.departure = origin.clone();
            last.destination = destination.clone();
        }
        (Some(only), None) => {
            only.departure = origin.clone();
            only.destination = destination.clone();
        }
        _ => {}
    }
}

/// Steps of the first route, across all of its legs.
fn first_route_steps(
    response: &DirectionsResponse,
) -> Result<Vec<super::types::DirectionsStep>, ValidationError> {
    let route = response.routes.first().ok_or_else(|| ValidationError::NoRoute {
        status: response.status.clone(),
    })?;

    let steps: Vec<_> = route
        .legs
        .iter()
        .flat_map(|leg| leg.steps.iter().cloned())
        .collect();

    if steps.is_empty() {
        return Err(ValidationError::NoRoute {
            status: response.status.clone(),
        });
    }
    Ok(steps)
}

/// Convert one provider response into an itinerary option.
pub async fn normalize<G, D, C>(
    response: &ProviderResponse,
    query: &SearchQuery,
    ctx: &Collaborators<'_, G, D, C>,
) -> Result<ItineraryOption, OptionError>
where
    G: crate::places::Geocoder,
    D: crate::places::PlaceDirectory,
    C: crate::costs::CostLookup,
{
    use crate::domain::RoadMode;

    let segments = match response {
        ProviderResponse::Plane(search) => normalize_flight(search, query, ctx).await?,
        ProviderResponse::Car(matrix) => {
            normalize_road(matrix, query, RoadMode::Driving, ctx).await?
        }
        ProviderResponse::Bike(matrix) => {
            normalize_road(matrix, query, RoadMode::Bicycling, ctx).await?
        }
        ProviderResponse::Train(directions) => {
            let steps = first_route_steps(directions)?;
            normalize_transit(&steps, query, TransitMode::Train, ctx).await?
        }
        ProviderResponse::Bus(directions) => {
            let steps = first_route_steps(directions)?;
            normalize_transit(&steps, query, TransitMode::Bus, ctx).await?
        }
    };

    Ok(ItineraryOption::new(response.vehicle(), segments)?)
}
