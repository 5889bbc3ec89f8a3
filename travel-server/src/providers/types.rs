//! Provider response DTOs.
//!
//! These types map directly to the JSON returned by the directions,
//! distance-matrix, geocoding and flight-offer APIs. They use `Option`
//! liberally because providers omit fields rather than sending nulls, and
//! the normalizers decide which absences are fatal.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::Coordinates;

// ---------------------------------------------------------------------------
// Directions (transit)
// ---------------------------------------------------------------------------

/// Response from the directions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    /// Top-level status: "OK", "ZERO_RESULTS", "REQUEST_DENIED", ...
    pub status: String,

    #[serde(default)]
    pub routes: Vec<Route>,

    pub error_message: Option<String>,
}

/// One alternative route.
#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub legs: Vec<RouteLeg>,

    pub summary: Option<String>,
}

/// A route leg between two waypoints. Without waypoints there is one leg.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteLeg {
    #[serde(default)]
    pub steps: Vec<DirectionsStep>,

    pub distance: Option<TextValue>,

    pub duration: Option<TextValue>,
}

/// A raw step: either walking or riding a transit line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectionsStep {
    /// "WALKING" or "TRANSIT".
    pub travel_mode: Option<String>,

    /// Distance in metres.
    pub distance: Option<TextValue>,

    /// Duration in seconds.
    pub duration: Option<TextValue>,

    pub html_instructions: Option<String>,

    /// Present on transit steps only.
    pub transit_details: Option<TransitDetails>,
}

/// A `{ "text": ..., "value": ... }` pair.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextValue {
    pub text: Option<String>,
    pub value: Option<f64>,
}

impl TextValue {
    pub fn of(value: f64) -> Self {
        Self {
            text: None,
            value: Some(value),
        }
    }
}

/// Transit-specific part of a step.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransitDetails {
    pub departure_stop: Option<TransitStop>,
    pub arrival_stop: Option<TransitStop>,
    pub departure_time: Option<TransitTime>,
    pub arrival_time: Option<TransitTime>,
    pub headsign: Option<String>,
    pub num_stops: Option<u32>,
    pub line: Option<TransitLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransitStop {
    pub name: Option<String>,
    pub location: Option<LatLng>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for Coordinates {
    fn from(p: LatLng) -> Self {
        Coordinates::new(p.lat, p.lng)
    }
}

/// A scheduled time; `value` is seconds since the Unix epoch.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitTime {
    pub value: Option<i64>,
    pub text: Option<String>,
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransitLine {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub vehicle: Option<LineVehicle>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineVehicle {
    /// Vehicle type, e.g. "HEAVY_RAIL", "BUS".
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Distance matrix (car, bike)
// ---------------------------------------------------------------------------

/// Response from the distance-matrix endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DistanceMatrixResponse {
    pub status: String,

    #[serde(default)]
    pub origin_addresses: Vec<String>,

    #[serde(default)]
    pub destination_addresses: Vec<String>,

    #[serde(default)]
    pub rows: Vec<MatrixRow>,

    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatrixRow {
    #[serde(default)]
    pub elements: Vec<MatrixElement>,
}

/// One origin/destination cell.
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixElement {
    /// "OK", "NOT_FOUND", "ZERO_RESULTS", ...
    pub status: String,
    /// Distance in metres.
    pub distance: Option<TextValue>,
    /// Duration in seconds.
    pub duration: Option<TextValue>,
}

// ---------------------------------------------------------------------------
// Reverse geocoding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,

    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    pub formatted_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl GeocodeResponse {
    /// Country name of the most specific result, if any.
    pub fn country(&self) -> Option<String> {
        self.results
            .iter()
            .flat_map(|r| r.address_components.iter())
            .find(|c| c.types.iter().any(|t| t == "country"))
            .map(|c| c.long_name.clone())
    }
}

// ---------------------------------------------------------------------------
// Flight offers
// ---------------------------------------------------------------------------

/// OAuth token response of the flight API.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
    pub token_type: Option<String>,
}

/// Response from the flight-offers search endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffersResponse {
    #[serde(default)]
    pub data: Vec<FlightOffer>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    pub id: String,

    #[serde(default)]
    pub itineraries: Vec<FlightItinerary>,

    pub price: OfferPrice,
}

/// One bound of an offer (the outward bound for one-way searches).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightItinerary {
    /// ISO-8601 duration, e.g. "PT7H35M".
    pub duration: Option<String>,

    #[serde(default)]
    pub segments: Vec<FlightSegment>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSegment {
    pub departure: FlightEndpoint,
    pub arrival: FlightEndpoint,
    pub carrier_code: Option<String>,
    pub number: Option<String>,
    /// ISO-8601 duration of this flight.
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightEndpoint {
    pub iata_code: String,
    /// Local date-time, e.g. "2024-03-15T10:25:00".
    pub at: String,
    pub terminal: Option<String>,
}

/// Offer price. The API sends amounts as decimal strings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferPrice {
    pub currency: String,
    pub total: String,
    pub grand_total: Option<String>,
}

impl OfferPrice {
    /// Grand total if present, else total, parsed as a number.
    pub fn amount(&self) -> Option<f64> {
        self.grand_total
            .as_deref()
            .unwrap_or(&self.total)
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Response from the location (airport) lookup endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationsResponse {
    #[serde(default)]
    pub data: Vec<Location>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub iata_code: String,
    pub name: String,
    pub detailed_name: Option<String>,
    pub geo_code: Option<GeoCode>,
    pub address: Option<LocationAddress>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GeoCode {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationAddress {
    pub city_name: Option<String>,
    pub country_name: Option<String>,
    pub country_code: Option<String>,
}

/// Airport metadata needed to resolve flight endpoints to places.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AirportInfo {
    pub name: String,
    pub country: Option<String>,
    pub location: Coordinates,
}

impl Location {
    /// Airport metadata, if the lookup returned coordinates.
    pub fn airport_info(&self) -> Option<AirportInfo> {
        let geo = self.geo_code?;
        let address = self.address.as_ref();
        Some(AirportInfo {
            name: address
                .and_then(|a| a.city_name.clone())
                .unwrap_or_else(|| self.name.clone()),
            country: address.and_then(|a| a.country_name.clone()),
            location: Coordinates::new(geo.latitude, geo.longitude),
        })
    }
}

/// Flight offers together with the airports they reference, keyed by IATA
/// code.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlightSearch {
    pub offers: FlightOffersResponse,
    #[serde(default)]
    pub airports: HashMap<String, AirportInfo>,
}

// ---------------------------------------------------------------------------
// Tagged union
// ---------------------------------------------------------------------------

/// A raw response from one provider, tagged by the mode it was fetched for.
///
/// Each variant is converted by its own normalizer.
#[derive(Debug, Clone)]
pub enum ProviderResponse {
    Plane(FlightSearch),
    Bike(DistanceMatrixResponse),
    Car(DistanceMatrixResponse),
    Train(DirectionsResponse),
    Bus(DirectionsResponse),
}

impl ProviderResponse {
    /// The vehicle kind this response was fetched for.
    pub fn vehicle(&self) -> crate::domain::Vehicle {
        use crate::domain::Vehicle;
        match self {
            ProviderResponse::Plane(_) => Vehicle::Plane,
            ProviderResponse::Bike(_) => Vehicle::Bike,
            ProviderResponse::Car(_) => Vehicle::Car,
            ProviderResponse::Train(_) => Vehicle::Train,
            ProviderResponse::Bus(_) => Vehicle::Bus,
        }
    }
}
