//! Distance-matrix results to a single car or bike segment.

use crate::costs::CostLookup;
use crate::domain::{RoadMode, Segment, renumber};
use crate::emission::{car_price, co2_for};
use crate::itinerary::SearchQuery;
use crate::providers::types::DistanceMatrixResponse;

use super::{Collaborators, OptionError, ValidationError, pin_endpoints, whole_seconds};

/// Convert the first matrix element into one door-to-door segment.
///
/// Car segments are priced from the fuel price and toll total at the
/// origin; bike segments are free.
pub async fn normalize_road<G, D, C>(
    matrix: &DistanceMatrixResponse,
    query: &SearchQuery,
    mode: RoadMode,
    ctx: &Collaborators<'_, G, D, C>,
) -> Result<Vec<Segment>, OptionError>
where
    C: CostLookup,
{
    let element = matrix
        .rows
        .first()
        .and_then(|row| row.elements.first())
        .ok_or_else(|| ValidationError::NoRoute {
            status: matrix.status.clone(),
        })?;

    if element.status != "OK" {
        return Err(ValidationError::ElementStatus(element.status.clone()).into());
    }

    let metres = element
        .distance
        .as_ref()
        .and_then(|d| d.value)
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or(ValidationError::MissingField {
            step: 0,
            field: "distance",
        })?;
    let secs = element
        .duration
        .as_ref()
        .and_then(|d| d.value)
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or(ValidationError::MissingField {
            step: 0,
            field: "duration",
        })?;

    let distance_km = metres / 1000.0;
    let duration = whole_seconds(secs)?;
    let vehicle = mode.vehicle();

    let price = match mode {
        RoadMode::Driving => {
            let origin = query.origin.name.as_str();
            let (fuel, toll) = tokio::try_join!(
                ctx.costs.fuel_cost_per_liter(origin),
                ctx.costs.toll_cost(origin)
            )?;
            car_price(distance_km, fuel, toll)
        }
        RoadMode::Bicycling => 0.0,
    };

    let verb = match mode {
        RoadMode::Driving => "Drive",
        RoadMode::Bicycling => "Cycle",
    };

    let mut segments = vec![Segment {
        num_segment: 0,
        departure: query.origin.clone(),
        destination: query.destination.clone(),
        departure_time: query.departure,
        duration,
        vehicle,
        description: format!("{verb} to {}", query.destination.name),
        price,
        co2_kg: co2_for(vehicle, distance_km, duration),
        distance_km,
        direction: query.direction,
    }];

    pin_endpoints(segments.iter_mut(), &query.origin, &query.destination);
    renumber(&mut segments);
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::costs::FixedCosts;
    use crate::domain::segment::fixtures::{at, place};
    use crate::domain::{Direction, Vehicle};
    use crate::places::{InMemoryPlaces, StaticGeocoder};

    fn matrix(element: &str) -> DistanceMatrixResponse {
        let json = format!(
            r#"{{ "status": "OK", "rows": [{{ "elements": [{element}] }}] }}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    const OK: &str = r#"{
        "status": "OK",
        "distance": { "text": "465 km", "value": 465000 },
        "duration": { "text": "4 hours 30 mins", "value": 16200 }
    }"#;

    fn query() -> SearchQuery {
        SearchQuery::new(
            place(100, "Lyon"),
            place(200, "Paris"),
            at(8, 0),
            Direction::Return,
        )
    }

    async fn run(
        matrix: &DistanceMatrixResponse,
        mode: RoadMode,
    ) -> Result<Vec<Segment>, OptionError> {
        let geocoder = StaticGeocoder::default();
        let places = InMemoryPlaces::new();
        let costs = FixedCosts {
            toll: 35.0,
            fuel_per_liter: 1.8,
            ..FixedCosts::default()
        };
        let ctx = Collaborators::new(&geocoder, &places, &costs);
        normalize_road(matrix, &query(), mode, &ctx).await
    }

    #[tokio::test]
    async fn car_segment_priced_with_fuel_and_toll() {
        let segs = run(&matrix(OK), RoadMode::Driving).await.unwrap();
        assert_eq!(segs.len(), 1);
        let s = &segs[0];
        assert_eq!(s.vehicle, Vehicle::Car);
        assert_eq!(s.num_segment, 1);
        assert_eq!(s.direction, Direction::Return);
        assert_eq!(s.duration, Duration::minutes(270));
        assert!((s.distance_km - 465.0).abs() < 1e-9);
        assert!((s.co2_kg - 93.0).abs() < 1e-9);
        // 465 km / 15 km/l * 1.8 + 35
        assert!((s.price - 90.8).abs() < 1e-9);
        assert_eq!(s.departure, query().origin);
        assert_eq!(s.destination, query().destination);
    }

    #[tokio::test]
    async fn bike_segment_is_free_and_clean() {
        let segs = run(&matrix(OK), RoadMode::Bicycling).await.unwrap();
        assert_eq!(segs[0].vehicle, Vehicle::Bike);
        assert_eq!(segs[0].price, 0.0);
        assert_eq!(segs[0].co2_kg, 0.0);
        assert_eq!(segs[0].description, "Cycle to Paris");
    }

    #[tokio::test]
    async fn element_status_not_ok_rejected() {
        let m = matrix(r#"{ "status": "ZERO_RESULTS" }"#);
        assert!(matches!(
            run(&m, RoadMode::Driving).await,
            Err(OptionError::Validation(ValidationError::ElementStatus(s))) if s == "ZERO_RESULTS"
        ));
    }

    #[tokio::test]
    async fn missing_duration_rejected() {
        let m = matrix(r#"{ "status": "OK", "distance": { "value": 1000 } }"#);
        assert!(matches!(
            run(&m, RoadMode::Bicycling).await,
            Err(OptionError::Validation(ValidationError::MissingField {
                field: "duration",
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn unrepresentable_duration_rejected() {
        let m = matrix(
            r#"{ "status": "OK", "distance": { "value": 1000 }, "duration": { "value": 1e17 } }"#,
        );
        assert!(matches!(
            run(&m, RoadMode::Driving).await,
            Err(OptionError::Validation(ValidationError::InvalidDuration(_)))
        ));
    }

    #[tokio::test]
    async fn empty_matrix_is_no_route() {
        let m: DistanceMatrixResponse =
            serde_json::from_str(r#"{ "status": "OK", "rows": [] }"#).unwrap();
        assert!(matches!(
            run(&m, RoadMode::Driving).await,
            Err(OptionError::Validation(ValidationError::NoRoute { .. }))
        ));
    }
}
