//! Itinerary options.
//!
//! An `ItineraryOption` is one complete candidate way of travelling between
//! two places, dominated by a single mode (plane, bike, car, train or bus).

use chrono::{DateTime, Duration, Utc};

use super::{DomainError, Segment, Vehicle, check_numbering};

/// One candidate itinerary returned by a search.
///
/// # Invariants
///
/// - At least one segment
/// - Segments are numbered 1..N within their direction
/// - Every arrival time and the total duration are representable
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryOption {
    mode: Vehicle,
    segments: Vec<Segment>,
}

impl ItineraryOption {
    /// Construct an option, validating its segment numbering.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `segments` is empty, not contiguously numbered, or
    /// runs past the supported time range.
    pub fn new(mode: Vehicle, segments: Vec<Segment>) -> Result<Self, DomainError> {
        if segments.is_empty() {
            return Err(DomainError::EmptyItinerary);
        }
        check_numbering(&segments)?;

        let mut total = Duration::zero();
        for s in &segments {
            total = total
                .checked_add(&s.duration)
                .filter(|_| s.departure_time.checked_add_signed(s.duration).is_some())
                .ok_or(DomainError::TimeOutOfRange(s.num_segment))?;
        }
        Ok(Self { mode, segments })
    }

    /// The dominant mode this option was produced for.
    pub fn mode(&self) -> Vehicle {
        self.mode
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    pub fn total_price(&self) -> f64 {
        self.segments.iter().map(|s| s.price).sum()
    }

    pub fn total_co2_kg(&self) -> f64 {
        self.segments.iter().map(|s| s.co2_kg).sum()
    }

    pub fn total_distance_km(&self) -> f64 {
        self.segments.iter().map(|s| s.distance_km).sum()
    }

    /// Sum of segment durations (excludes waiting between segments).
    pub fn total_duration(&self) -> Duration {
        self.segments
            .iter()
            .fold(Duration::zero(), |acc, s| acc + s.duration)
    }

    /// Departure of the first segment.
    pub fn departure_time(&self) -> DateTime<Utc> {
        self.segments[0].departure_time
    }

    /// Arrival of the last segment.
    pub fn arrival_time(&self) -> DateTime<Utc> {
        self.segments[self.segments.len() - 1].arrival_time()
    }
}
