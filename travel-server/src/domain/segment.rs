//! Journey segments.
//!
//! A `Segment` is one leg of a journey travelled with a single vehicle.
//! Segments of one direction are numbered 1..N without gaps.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{DomainError, Place, Vehicle};

/// Whether a segment belongs to the outward or the return trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outward,
    Return,
}

impl Direction {
    pub fn is_outward(&self) -> bool {
        matches!(self, Direction::Outward)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Outward => f.write_str("outward"),
            Direction::Return => f.write_str("return"),
        }
    }
}

/// One traversed leg of a journey.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Position within its direction, starting at 1.
    pub num_segment: u32,
    pub departure: Place,
    pub destination: Place,
    /// Scheduled departure.
    pub departure_time: DateTime<Utc>,
    pub duration: Duration,
    pub vehicle: Vehicle,
    pub description: String,
    /// Price in the search currency.
    pub price: f64,
    /// CO2 emitted in kilograms.
    pub co2_kg: f64,
    pub distance_km: f64,
    pub direction: Direction,
}

impl Segment {
    /// Scheduled arrival (departure plus duration).
    pub fn arrival_time(&self) -> DateTime<Utc> {
        self.departure_time + self.duration
    }

    pub fn is_walk(&self) -> bool {
        self.vehicle.is_walk()
    }
}

/// Reassign `num_segment` to 1..N in slice order.
pub fn renumber(segments: &mut [Segment]) {
    for (idx, segment) in segments.iter_mut().enumerate() {
        segment.num_segment = idx as u32 + 1;
    }
}

/// Check that segments are outward-then-return and each direction is
/// numbered 1..N in order.
///
/// # Errors
///
/// Returns `Err` if a return segment precedes an outward one, or if a
/// direction's numbering skips, repeats, or does not start at 1.
pub fn check_numbering(segments: &[Segment]) -> Result<(), DomainError> {
    let mut seen_return = false;
    let mut expected_outward = 1;
    let mut expected_return = 1;

    for segment in segments {
        let expected = match segment.direction {
            Direction::Outward => {
                if seen_return {
                    return Err(DomainError::DirectionOrder);
                }
                &mut expected_outward
            }
            Direction::Return => {
                seen_return = true;
                &mut expected_return
            }
        };

        if segment.num_segment != *expected {
            return Err(DomainError::NumberingGap {
                direction: segment.direction,
                expected: *expected,
                found: segment.num_segment,
            });
        }
        *expected += 1;
    }

    Ok(())
}
