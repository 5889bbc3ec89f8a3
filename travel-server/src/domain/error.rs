//! Domain error types.
//!
//! These errors represent validation failures and data inconsistencies
//! in the domain layer. They are distinct from provider/IO errors.

use super::Direction;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Segment numbers within one direction are not 1..N
    #[error("{direction} segments are not contiguously numbered: expected {expected}, found {found}")]
    NumberingGap {
        direction: Direction,
        expected: u32,
        found: u32,
    },

    /// A travel or itinerary has no segments
    #[error("itinerary must have at least one segment")]
    EmptyItinerary,

    /// Return segments appear before outward ones
    #[error("outward segments must precede return segments")]
    DirectionOrder,

    /// Compensation is negative or exceeds the emitted CO2
    #[error("compensation {compensated} kg outside 0..={emitted} kg")]
    InvalidCompensation { compensated: f64, emitted: f64 },

    /// A segment arrives outside the representable time range, or the
    /// durations do not add up to a representable total
    #[error("segment {0} ends outside the supported time range")]
    TimeOutOfRange(u32),

    /// Rating outside 1..=5
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),
}
