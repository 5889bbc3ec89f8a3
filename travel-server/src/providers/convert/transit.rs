//! Transit directions (train and bus) to segments.
//!
//! A directions route is a list of walking and transit steps. Conversion
//! runs in a fixed order:
//!
//! 1. Validate every step; one bad transit step rejects the whole route
//! 2. Resolve the stops of each transit step to places
//! 3. Attach CO2 and fare to each transit segment
//! 4. Pin the first and last transit segments to the queried places
//! 5. Merge each run of consecutive walks into one walk
//! 6. Fill in each walk's places and departure time from its neighbours
//! 7. Number the result 1..N

use chrono::{DateTime, Duration, Utc};

use crate::costs::CostLookup;
use crate::domain::{Coordinates, Place, Segment, TransitMode, Vehicle, renumber};
use crate::emission::co2_for;
use crate::itinerary::SearchQuery;
use crate::places::{Geocoder, PlaceDirectory, resolve_place};
use crate::providers::types::{DirectionsStep, TextValue, TransitStop};

use super::{Collaborators, OptionError, ValidationError, pin_endpoints, whole_seconds};

/// A provider stop, before place resolution.
#[derive(Debug)]
struct Stop<'r> {
    name: &'r str,
    location: Coordinates,
}

/// A validated transit step.
#[derive(Debug)]
struct RideStep<'r> {
    description: String,
    departure_time: DateTime<Utc>,
    from: Stop<'r>,
    to: Stop<'r>,
    distance_km: f64,
    duration: Duration,
}

/// A walk whose places and time are not known yet.
#[derive(Debug, Clone)]
struct WalkStep {
    description: String,
    distance_km: f64,
    duration: Duration,
}

impl WalkStep {
    fn absorb(&mut self, other: WalkStep) -> Result<(), ValidationError> {
        self.duration = self
            .duration
            .checked_add(&other.duration)
            .ok_or_else(|| ValidationError::InvalidDuration("combined walk".to_string()))?;
        self.distance_km += other.distance_km;
        if self.description.is_empty() {
            self.description = other.description;
        } else if !other.description.is_empty() {
            self.description = format!("{}; {}", self.description, other.description);
        }
        Ok(())
    }
}

#[derive(Debug)]
enum RawStep<'r> {
    Walk(WalkStep),
    Ride(RideStep<'r>),
}

/// A step after place resolution. Walks stay unresolved until backfill.
#[derive(Debug)]
enum Draft {
    Walk(WalkStep),
    Ride(Segment),
}

impl Draft {
    fn ride(&self) -> Option<&Segment> {
        match self {
            Draft::Ride(s) => Some(s),
            Draft::Walk(_) => None,
        }
    }

    fn ride_mut(&mut self) -> Option<&mut Segment> {
        match self {
            Draft::Ride(s) => Some(s),
            Draft::Walk(_) => None,
        }
    }
}

/// A finite, non-negative `value`.
fn amount(tv: Option<&TextValue>) -> Option<f64> {
    tv.and_then(|tv| tv.value)
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn stop<'r>(
    step: usize,
    stop: Option<&'r TransitStop>,
    name_field: &'static str,
    location_field: &'static str,
) -> Result<Stop<'r>, ValidationError> {
    let name = stop
        .and_then(|s| s.name.as_deref())
        .filter(|n| !n.trim().is_empty())
        .ok_or(ValidationError::MissingField {
            step,
            field: name_field,
        })?;
    let location = stop
        .and_then(|s| s.location)
        .ok_or(ValidationError::MissingField {
            step,
            field: location_field,
        })?;
    Ok(Stop {
        name,
        location: location.into(),
    })
}

fn validate_ride(
    index: usize,
    step: &DirectionsStep,
    mode: TransitMode,
) -> Result<RideStep<'_>, ValidationError> {
    let missing = |field| ValidationError::MissingField { step: index, field };

    let details = step
        .transit_details
        .as_ref()
        .ok_or_else(|| missing("transit_details"))?;
    let line = details.line.as_ref().ok_or_else(|| missing("line"))?;
    let vehicle_type = line
        .vehicle
        .as_ref()
        .and_then(|v| v.vehicle_type.as_deref())
        .ok_or_else(|| missing("line.vehicle.type"))?;

    if !mode.accepts(vehicle_type) {
        return Err(ValidationError::UnknownVehicleType {
            step: index,
            vehicle_type: vehicle_type.to_string(),
            mode,
        });
    }

    let timestamp = details
        .departure_time
        .as_ref()
        .and_then(|t| t.value)
        .ok_or_else(|| missing("departure_time"))?;
    let departure_time = DateTime::from_timestamp(timestamp, 0)
        .ok_or_else(|| ValidationError::InvalidTime(timestamp.to_string()))?;

    let from = stop(
        index,
        details.departure_stop.as_ref(),
        "departure_stop.name",
        "departure_stop.location",
    )?;
    let to = stop(
        index,
        details.arrival_stop.as_ref(),
        "arrival_stop.name",
        "arrival_stop.location",
    )?;

    let distance_m = amount(step.distance.as_ref()).ok_or_else(|| missing("distance"))?;
    let duration_s = amount(step.duration.as_ref()).ok_or_else(|| missing("duration"))?;

    let line_name = line
        .short_name
        .as_deref()
        .or(line.name.as_deref())
        .unwrap_or(vehicle_type);
    let description = match details.headsign.as_deref() {
        Some(headsign) => format!("{line_name} towards {headsign}"),
        None => line_name.to_string(),
    };

    Ok(RideStep {
        description,
        departure_time,
        from,
        to,
        distance_km: distance_m / 1000.0,
        duration: whole_seconds(duration_s)?,
    })
}

fn validate_step(
    index: usize,
    step: &DirectionsStep,
    mode: TransitMode,
) -> Result<RawStep<'_>, ValidationError> {
    let travel_mode = step
        .travel_mode
        .as_deref()
        .ok_or(ValidationError::MissingField {
            step: index,
            field: "travel_mode",
        })?;

    match travel_mode {
        "WALKING" => Ok(RawStep::Walk(WalkStep {
            description: step
                .html_instructions
                .clone()
                .unwrap_or_else(|| "Walk".to_string()),
            distance_km: amount(step.distance.as_ref()).unwrap_or(0.0) / 1000.0,
            duration: whole_seconds(amount(step.duration.as_ref()).unwrap_or(0.0))?,
        })),
        "TRANSIT" => validate_ride(index, step, mode).map(RawStep::Ride),
        other => Err(ValidationError::UnexpectedTravelMode {
            step: index,
            travel_mode: other.to_string(),
        }),
    }
}

async fn ride_segment<G, D, C>(
    ride: RideStep<'_>,
    query: &SearchQuery,
    mode: TransitMode,
    ctx: &Collaborators<'_, G, D, C>,
) -> Result<Segment, OptionError>
where
    G: Geocoder,
    D: PlaceDirectory,
    C: CostLookup,
{
    let departure = resolve_place(ctx.geocoder, ctx.places, ride.from.name, ride.from.location).await?;
    let destination = resolve_place(ctx.geocoder, ctx.places, ride.to.name, ride.to.location).await?;

    let vehicle = mode.vehicle();
    let co2_kg = co2_for(vehicle, ride.distance_km, ride.duration);
    let price = ctx
        .costs
        .transit_cost(&departure.name, &destination.name, mode, ride.distance_km)
        .await?;

    Ok(Segment {
        num_segment: 0,
        departure,
        destination,
        departure_time: ride.departure_time,
        duration: ride.duration,
        vehicle,
        description: ride.description,
        price,
        co2_kg,
        distance_km: ride.distance_km,
        direction: query.direction,
    })
}

/// Merge each maximal run of consecutive walks into a single walk.
fn compact_walks(drafts: Vec<Draft>) -> Result<Vec<Draft>, ValidationError> {
    let mut out: Vec<Draft> = Vec::with_capacity(drafts.len());
    for draft in drafts {
        match draft {
            Draft::Walk(walk) => match out.last_mut() {
                Some(Draft::Walk(prev)) => prev.absorb(walk)?,
                _ => out.push(Draft::Walk(walk)),
            },
            ride => out.push(ride),
        }
    }
    Ok(out)
}

/// Turn every draft into a segment, taking each walk's places and time
/// from its neighbours (or the queried places at either end).
fn backfill_walks(drafts: &[Draft], query: &SearchQuery) -> Result<Vec<Segment>, ValidationError> {
    drafts
        .iter()
        .enumerate()
        .map(|(i, draft)| match draft {
            Draft::Ride(segment) => Ok(segment.clone()),
            Draft::Walk(walk) => {
                let prev = i.checked_sub(1).and_then(|j| drafts[j].ride());
                let next = drafts.get(i + 1).and_then(Draft::ride);
                walk_segment(walk, prev, next, query)
            }
        })
        .collect()
}

fn walk_segment(
    walk: &WalkStep,
    prev: Option<&Segment>,
    next: Option<&Segment>,
    query: &SearchQuery,
) -> Result<Segment, ValidationError> {
    let departure: Place = prev.map_or_else(|| query.origin.clone(), |p| p.destination.clone());
    let destination: Place = next.map_or_else(|| query.destination.clone(), |n| n.departure.clone());
    let departure_time = match (prev, next) {
        (_, Some(next)) => next.departure_time.checked_sub_signed(walk.duration),
        (Some(prev), None) => prev.departure_time.checked_add_signed(prev.duration),
        (None, None) => Some(query.departure),
    }
    .ok_or_else(|| ValidationError::InvalidTime(format!("walk: {}", walk.description)))?;

    Ok(Segment {
        num_segment: 0,
        departure,
        destination,
        departure_time,
        duration: walk.duration,
        vehicle: Vehicle::Walk,
        description: walk.description.clone(),
        price: 0.0,
        co2_kg: 0.0,
        distance_km: walk.distance_km,
        direction: query.direction,
    })
}

/// Convert the steps of one transit route into numbered segments.
///
/// # Errors
///
/// Fails without creating any place record if a step is malformed, a
/// vehicle type does not belong to `mode`, or the route has no transit
/// step. Place resolution and fare lookup failures also fail the route.
pub async fn normalize_transit<G, D, C>(
    steps: &[DirectionsStep],
    query: &SearchQuery,
    mode: TransitMode,
    ctx: &Collaborators<'_, G, D, C>,
) -> Result<Vec<Segment>, OptionError>
where
    G: Geocoder,
    D: PlaceDirectory,
    C: CostLookup,
{
    let raw = steps
        .iter()
        .enumerate()
        .map(|(i, step)| validate_step(i, step, mode))
        .collect::<Result<Vec<_>, _>>()?;

    if !raw.iter().any(|s| matches!(s, RawStep::Ride(_))) {
        return Err(ValidationError::NoTransitStep.into());
    }

    let mut drafts = Vec::with_capacity(raw.len());
    for step in raw {
        drafts.push(match step {
            RawStep::Walk(walk) => Draft::Walk(walk),
            RawStep::Ride(ride) => Draft::Ride(ride_segment(ride, query, mode, ctx).await?),
        });
    }

    pin_endpoints(
        drafts.iter_mut().filter_map(Draft::ride_mut),
        &query.origin,
        &query.destination,
    );

    let drafts = compact_walks(drafts)?;
    let mut segments = backfill_walks(&drafts, query)?;
    renumber(&mut segments);
    Ok(segments)
}
