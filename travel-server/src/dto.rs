//! Data transfer objects for search requests and JSON output.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Coordinates, Direction, ItineraryOption, Place, Segment, Travel, Vehicle};
use crate::score::Badge;
use crate::store::{UserScore, UserStats};

/// A place as typed in a request: name, optional country and position.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceRequest {
    pub name: String,
    pub country: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl PlaceRequest {
    pub fn location(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// Request to search itineraries between two places.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub origin: PlaceRequest,
    pub destination: PlaceRequest,

    /// Outward departure time
    pub departure: DateTime<Utc>,

    /// Departure of the way back, for round trips
    #[serde(default)]
    pub return_departure: Option<DateTime<Utc>>,
}

/// Response for an itinerary search.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub outward: Vec<OptionResult>,
    pub inbound: Vec<OptionResult>,
}

impl SearchResponse {
    pub fn new(outward: &[ItineraryOption], inbound: &[ItineraryOption]) -> Self {
        Self {
            outward: outward.iter().map(OptionResult::from_option).collect(),
            inbound: inbound.iter().map(OptionResult::from_option).collect(),
        }
    }
}

/// One itinerary option with its totals.
#[derive(Debug, Serialize)]
pub struct OptionResult {
    /// Dominant mode of the option
    pub mode: Vehicle,
    pub departure_time: String,
    pub arrival_time: String,
    /// Sum of segment durations in minutes
    pub duration_mins: i64,
    pub total_price: f64,
    pub total_co2_kg: f64,
    pub total_distance_km: f64,
    pub segments: Vec<SegmentResult>,
}

/// A segment for display.
#[derive(Debug, Serialize)]
pub struct SegmentResult {
    pub num_segment: u32,
    pub departure: PlaceInfo,
    pub destination: PlaceInfo,
    pub departure_time: String,
    pub duration_mins: i64,
    pub vehicle: Vehicle,
    pub description: String,
    pub price: f64,
    pub co2_kg: f64,
    pub distance_km: f64,
    pub direction: Direction,
}

/// Place reference for display.
#[derive(Debug, Serialize)]
pub struct PlaceInfo {
    pub id: u64,
    pub name: String,
    pub country: Option<String>,
}

/// A stored travel with its totals.
#[derive(Debug, Serialize)]
pub struct TravelResult {
    pub id: u64,
    pub user: u64,
    pub confirmed: bool,
    pub co2_compensated: f64,
    pub total_co2_kg: f64,
    pub total_distance_km: f64,
    pub total_price: f64,
    pub segments: Vec<SegmentResult>,
}

/// A user's score, statistics and badges.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub score: UserScore,
    pub total_score: f64,
    pub stats: UserStats,
    pub badges: Vec<Badge>,
}

impl UserSummary {
    pub fn new(score: UserScore, stats: UserStats, badges: Vec<Badge>) -> Self {
        Self {
            total_score: score.total(),
            score,
            stats,
            badges,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl OptionResult {
    pub fn from_option(option: &ItineraryOption) -> Self {
        Self {
            mode: option.mode(),
            departure_time: format_time(&option.departure_time()),
            arrival_time: format_time(&option.arrival_time()),
            duration_mins: option.total_duration().num_minutes(),
            total_price: option.total_price(),
            total_co2_kg: option.total_co2_kg(),
            total_distance_km: option.total_distance_km(),
            segments: option
                .segments()
                .iter()
                .map(SegmentResult::from_segment)
                .collect(),
        }
    }
}

impl SegmentResult {
    pub fn from_segment(segment: &Segment) -> Self {
        Self {
            num_segment: segment.num_segment,
            departure: PlaceInfo::from_place(&segment.departure),
            destination: PlaceInfo::from_place(&segment.destination),
            departure_time: format_time(&segment.departure_time),
            duration_mins: segment.duration.num_minutes(),
            vehicle: segment.vehicle,
            description: segment.description.clone(),
            price: segment.price,
            co2_kg: segment.co2_kg,
            distance_km: segment.distance_km,
            direction: segment.direction,
        }
    }
}

impl PlaceInfo {
    pub fn from_place(place: &Place) -> Self {
        Self {
            id: place.id.0,
            name: place.name.clone(),
            country: place.country.clone(),
        }
    }
}

impl TravelResult {
    pub fn from_travel(travel: &Travel) -> Self {
        Self {
            id: travel.id().0,
            user: travel.user().0,
            confirmed: travel.is_confirmed(),
            co2_compensated: travel.co2_compensated(),
            total_co2_kg: travel.total_co2_kg(),
            total_distance_km: travel.total_distance_km(),
            total_price: travel.total_price(),
            segments: travel
                .segments()
                .iter()
                .map(SegmentResult::from_segment)
                .collect(),
        }
    }
}

/// Format a timestamp as RFC 3339 with whole seconds.
fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}
