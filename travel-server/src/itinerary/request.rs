//! Search queries.

use chrono::{DateTime, Utc};

use crate::domain::{Direction, Place};

/// One itinerary search between two resolved places.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub origin: Place,
    pub destination: Place,
    /// Earliest departure.
    pub departure: DateTime<Utc>,
    /// Whether the options found are the outward or the return leg.
    pub direction: Direction,
}

impl SearchQuery {
    pub fn new(
        origin: Place,
        destination: Place,
        departure: DateTime<Utc>,
        direction: Direction,
    ) -> Self {
        Self {
            origin,
            destination,
            departure,
            direction,
        }
    }

    /// The query for the way back, departing at `departure`.
    pub fn reversed(&self, departure: DateTime<Utc>) -> Self {
        Self {
            origin: self.destination.clone(),
            destination: self.origin.clone(),
            departure,
            direction: Direction::Return,
        }
    }
}
