//! Flight offers to plane segments.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::domain::{Place, Segment, Vehicle, renumber};
use crate::emission::{apportion_flight_price, plane_co2};
use crate::itinerary::SearchQuery;
use crate::places::{Geocoder, PlaceDirectory, PlaceError, find_or_create, resolve_place};
use crate::providers::types::{AirportInfo, FlightSearch};

use super::{Collaborators, OptionError, ValidationError, pin_endpoints};

/// Parse an ISO-8601 duration such as `PT7H35M` or `P1DT2H`.
///
/// Only whole days, hours, minutes and seconds are supported.
///
/// # Examples
///
/// ```
/// use chrono::Duration;
/// use travel_server::providers::convert::parse_iso_duration;
///
/// assert_eq!(parse_iso_duration("PT1H15M"), Some(Duration::minutes(75)));
/// assert_eq!(parse_iso_duration("PT45M"), Some(Duration::minutes(45)));
/// assert_eq!(parse_iso_duration("P1DT2H"), Some(Duration::hours(26)));
/// assert_eq!(parse_iso_duration("1H"), None);
/// ```
pub fn parse_iso_duration(s: &str) -> Option<Duration> {
    let rest = s.strip_prefix('P')?;
    let (date_part, time_part) = rest.split_once('T').unwrap_or((rest, ""));
    if date_part.is_empty() && time_part.is_empty() {
        return None;
    }

    let days = sum_units(date_part, &[('D', 86_400)])?;
    let time = sum_units(time_part, &[('H', 3_600), ('M', 60), ('S', 1)])?;
    Duration::try_seconds(days.checked_add(time)?)
}

/// Sum `<number><unit>` groups into seconds.
fn sum_units(part: &str, units: &[(char, i64)]) -> Option<i64> {
    let mut total: i64 = 0;
    let mut digits = String::new();

    for c in part.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let (_, secs) = units.iter().find(|(unit, _)| *unit == c)?;
        let n: i64 = digits.parse().ok()?;
        digits.clear();
        total = total.checked_add(n.checked_mul(*secs)?)?;
    }

    digits.is_empty().then_some(total)
}

/// Offer times are airport-local without an offset; they are taken as UTC.
fn parse_offer_time(at: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(at, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|t| t.and_utc())
}

/// A validated flight, before place resolution.
struct Hop<'r> {
    from: &'r AirportInfo,
    to: &'r AirportInfo,
    departure_time: DateTime<Utc>,
    duration: Duration,
    description: String,
}

async fn airport_place<G, D>(
    info: &AirportInfo,
    geocoder: &G,
    places: &D,
) -> Result<Place, PlaceError>
where
    G: Geocoder,
    D: PlaceDirectory,
{
    match info.country.as_deref() {
        Some(country) => find_or_create(places, &info.name, Some(country), info.location).await,
        None => resolve_place(geocoder, places, &info.name, info.location).await,
    }
}

/// Convert the cheapest offer's first itinerary into plane segments.
///
/// Offers without a parseable price are ignored. The offer's total is
/// split across its flights by great-circle distance.
pub async fn normalize_flight<G, D, C>(
    search: &FlightSearch,
    query: &SearchQuery,
    ctx: &Collaborators<'_, G, D, C>,
) -> Result<Vec<Segment>, OptionError>
where
    G: Geocoder,
    D: PlaceDirectory,
{
    let (offer, total) = search
        .offers
        .data
        .iter()
        .filter_map(|offer| offer.price.amount().map(|amount| (offer, amount)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .ok_or(ValidationError::NoOffer)?;

    let itinerary = offer
        .itineraries
        .first()
        .ok_or(ValidationError::MissingField {
            step: 0,
            field: "itineraries",
        })?;
    if itinerary.segments.is_empty() {
        return Err(ValidationError::MissingField {
            step: 0,
            field: "segments",
        }
        .into());
    }

    let mut hops = Vec::with_capacity(itinerary.segments.len());
    for (i, flight) in itinerary.segments.iter().enumerate() {
        let airport = |code: &String| {
            search
                .airports
                .get(code)
                .ok_or_else(|| ValidationError::UnknownAirport(code.clone()))
        };
        let from = airport(&flight.departure.iata_code)?;
        let to = airport(&flight.arrival.iata_code)?;

        let departure_time = parse_offer_time(&flight.departure.at)
            .ok_or_else(|| ValidationError::InvalidTime(flight.departure.at.clone()))?;

        let raw_duration = flight
            .duration
            .as_deref()
            .ok_or(ValidationError::MissingField {
                step: i,
                field: "duration",
            })?;
        let duration = parse_iso_duration(raw_duration)
            .ok_or_else(|| ValidationError::InvalidDuration(raw_duration.to_string()))?;

        hops.push(Hop {
            from,
            to,
            departure_time,
            duration,
            description: format!(
                "{}{}",
                flight.carrier_code.as_deref().unwrap_or_default(),
                flight.number.as_deref().unwrap_or_default()
            ),
        });
    }

    let legs: Vec<_> = hops
        .iter()
        .map(|h| (h.from.location, h.to.location))
        .collect();
    let prices = apportion_flight_price(total, &legs);

    let mut segments = Vec::with_capacity(hops.len());
    for (hop, price) in hops.into_iter().zip(prices) {
        let departure = airport_place(hop.from, ctx.geocoder, ctx.places).await?;
        let destination = airport_place(hop.to, ctx.geocoder, ctx.places).await?;

        segments.push(Segment {
            num_segment: 0,
            distance_km: hop.from.location.haversine_km(&hop.to.location),
            departure,
            destination,
            departure_time: hop.departure_time,
            duration: hop.duration,
            vehicle: Vehicle::Plane,
            description: hop.description,
            price,
            co2_kg: plane_co2(hop.duration),
            direction: query.direction,
        });
    }

    pin_endpoints(segments.iter_mut(), &query.origin, &query.destination);
    renumber(&mut segments);
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costs::FixedCosts;
    use crate::domain::Direction;
    use crate::domain::segment::fixtures::{at, place};
    use crate::places::{InMemoryPlaces, StaticGeocoder};

    const SEARCH: &str = r#"{
        "offers": { "data": [
            {
                "id": "1",
                "itineraries": [{ "duration": "PT3H", "segments": [
                    { "departure": { "iataCode": "LYS", "at": "2024-03-15T07:00:00" },
                      "arrival": { "iataCode": "CDG", "at": "2024-03-15T08:10:00" },
                      "carrierCode": "AF", "number": "7641", "duration": "PT1H10M" }
                ]}],
                "price": { "currency": "EUR", "total": "320.00" }
            },
            {
                "id": "2",
                "itineraries": [{ "duration": "PT2H40M", "segments": [
                    { "departure": { "iataCode": "LYS", "at": "2024-03-15T09:00:00" },
                      "arrival": { "iataCode": "FRA", "at": "2024-03-15T10:15:00" },
                      "carrierCode": "LH", "number": "1077", "duration": "PT1H15M" },
                    { "departure": { "iataCode": "FRA", "at": "2024-03-15T11:00:00" },
                      "arrival": { "iataCode": "CDG", "at": "2024-03-15T12:05:00" },
                      "carrierCode": "LH", "number": "1028", "duration": "PT1H5M" }
                ]}],
                "price": { "currency": "EUR", "total": "180.00", "grandTotal": "190.00" }
            },
            {
                "id": "3",
                "itineraries": [],
                "price": { "currency": "EUR", "total": "unknown" }
            }
        ]},
        "airports": {
            "LYS": { "name": "LYON", "country": "FRANCE", "location": { "lat": 45.7256, "lon": 5.0811 } },
            "FRA": { "name": "FRANKFURT", "country": "GERMANY", "location": { "lat": 50.0379, "lon": 8.5622 } },
            "CDG": { "name": "PARIS", "country": "FRANCE", "location": { "lat": 49.0097, "lon": 2.5479 } }
        }
    }"#;

    fn query() -> SearchQuery {
        SearchQuery::new(
            place(100, "Lyon"),
            place(200, "Paris"),
            at(6, 0),
            Direction::Outward,
        )
    }

    async fn run(search: &FlightSearch) -> Result<Vec<Segment>, OptionError> {
        let geocoder = StaticGeocoder::new(None);
        let places = InMemoryPlaces::new();
        let costs = FixedCosts::default();
        let ctx = Collaborators::new(&geocoder, &places, &costs);
        normalize_flight(search, &query(), &ctx).await
    }

    #[tokio::test]
    async fn cheapest_offer_converted() {
        let search: FlightSearch = serde_json::from_str(SEARCH).unwrap();
        let segs = run(&search).await.unwrap();

        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].description, "LH1077");
        assert_eq!(segs[1].description, "LH1028");
        assert_eq!(segs[0].departure_time, at(9, 0));
        assert_eq!(segs[0].duration, Duration::minutes(75));
        assert_eq!(segs[0].num_segment, 1);
        assert_eq!(segs[1].num_segment, 2);

        // Pinned to the queried cities, connection airport kept
        assert_eq!(segs[0].departure, query().origin);
        assert_eq!(segs[1].destination, query().destination);
        assert_eq!(segs[0].destination.name, "FRANKFURT");
        assert_eq!(segs[1].departure.name, "FRANKFURT");

        let total: f64 = segs.iter().map(|s| s.price).sum();
        assert!((total - 190.0).abs() < 1e-9);
        assert!(segs.iter().all(|s| s.vehicle == Vehicle::Plane));
        assert!((segs[0].co2_kg - plane_co2(Duration::minutes(75))).abs() < 1e-9);
        assert!(segs[0].distance_km > 400.0);
    }

    #[tokio::test]
    async fn airport_missing_from_table_rejected() {
        let mut search: FlightSearch = serde_json::from_str(SEARCH).unwrap();
        search.airports.remove("FRA");
        let err = run(&search).await.unwrap_err();
        assert!(matches!(
            err,
            OptionError::Validation(ValidationError::UnknownAirport(ref code)) if code == "FRA"
        ));
    }

    #[tokio::test]
    async fn no_priced_offer_rejected() {
        let mut search: FlightSearch = serde_json::from_str(SEARCH).unwrap();
        search.offers.data.retain(|o| o.id == "3");
        assert!(matches!(
            run(&search).await,
            Err(OptionError::Validation(ValidationError::NoOffer))
        ));
    }

    #[tokio::test]
    async fn bad_duration_rejected() {
        let mut search: FlightSearch = serde_json::from_str(SEARCH).unwrap();
        search.offers.data[1].itineraries[0].segments[0].duration = Some("75 minutes".into());
        assert!(matches!(
            run(&search).await,
            Err(OptionError::Validation(ValidationError::InvalidDuration(_)))
        ));
    }

    #[test]
    fn iso_duration_edge_cases() {
        assert_eq!(parse_iso_duration("PT30S"), Some(Duration::seconds(30)));
        assert_eq!(parse_iso_duration("P2D"), Some(Duration::days(2)));
        assert_eq!(parse_iso_duration("PT"), None);
        assert_eq!(parse_iso_duration("P"), None);
        assert_eq!(parse_iso_duration("PT5X"), None);
        assert_eq!(parse_iso_duration("PT12"), None);
        assert_eq!(parse_iso_duration("PTH"), None);
        assert_eq!(parse_iso_duration("PT99999999999999999S"), None);
        assert_eq!(parse_iso_duration("P999999999999999D"), None);
    }

    #[test]
    fn offer_time_is_utc() {
        assert_eq!(parse_offer_time("2024-03-15T10:25:00"), Some(at(10, 25)));
        assert_eq!(parse_offer_time("2024-03-15 10:25"), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn hours_and_minutes(h in 0i64..48, m in 0i64..60) {
                let s = format!("PT{h}H{m}M");
                prop_assert_eq!(parse_iso_duration(&s), Some(Duration::minutes(h * 60 + m)));
            }
        }
    }
}
