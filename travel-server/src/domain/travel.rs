//! Persisted travels.
//!
//! A `Travel` is a trip a user has chosen: the outward segments followed by
//! the optional return segments, plus how much of its CO2 has been
//! compensated and whether the trip is confirmed.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Direction, DomainError, Segment, check_numbering, renumber};

/// Identifier of a stored travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TravelId(pub u64);

/// Identifier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for TravelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A trip owned by a user.
///
/// # Invariants
///
/// - At least one segment
/// - Outward segments precede return segments, each numbered 1..N
/// - `0 <= co2_compensated <= total_co2_kg()`
#[derive(Debug, Clone, PartialEq)]
pub struct Travel {
    id: TravelId,
    user: UserId,
    segments: Vec<Segment>,
    co2_compensated: f64,
    confirmed: bool,
}

impl Travel {
    /// Build an unconfirmed, uncompensated travel from the chosen outward
    /// segments and optional return segments.
    ///
    /// Direction flags and numbering are normalised: every outward segment is
    /// flagged outward and numbered from 1, likewise for the return list.
    ///
    /// # Errors
    ///
    /// Returns `Err` if both lists are empty.
    pub fn new(
        id: TravelId,
        user: UserId,
        mut outward: Vec<Segment>,
        mut inbound: Vec<Segment>,
    ) -> Result<Self, DomainError> {
        if outward.is_empty() && inbound.is_empty() {
            return Err(DomainError::EmptyItinerary);
        }

        for s in &mut outward {
            s.direction = Direction::Outward;
        }
        for s in &mut inbound {
            s.direction = Direction::Return;
        }
        renumber(&mut outward);
        renumber(&mut inbound);

        let mut segments = outward;
        segments.extend(inbound);
        check_numbering(&segments)?;

        Ok(Self {
            id,
            user,
            segments,
            co2_compensated: 0.0,
            confirmed: false,
        })
    }

    pub fn id(&self) -> TravelId {
        self.id
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn outward(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.direction.is_outward())
    }

    pub fn inbound(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| !s.direction.is_outward())
    }

    pub fn is_round_trip(&self) -> bool {
        self.inbound().next().is_some()
    }

    pub fn co2_compensated(&self) -> f64 {
        self.co2_compensated
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn total_distance_km(&self) -> f64 {
        self.segments.iter().map(|s| s.distance_km).sum()
    }

    pub fn total_co2_kg(&self) -> f64 {
        self.segments.iter().map(|s| s.co2_kg).sum()
    }

    pub fn total_price(&self) -> f64 {
        self.segments.iter().map(|s| s.price).sum()
    }

    /// Check a candidate compensation amount against this travel's emissions.
    pub fn validate_compensation(&self, compensated: f64) -> Result<(), DomainError> {
        let emitted = self.total_co2_kg();
        if !compensated.is_finite() || compensated < 0.0 || compensated > emitted + f64::EPSILON {
            return Err(DomainError::InvalidCompensation {
                compensated,
                emitted,
            });
        }
        Ok(())
    }

    /// Set the compensated CO2 amount in kilograms.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the amount is negative or exceeds the emitted CO2.
    pub fn set_compensation(&mut self, compensated: f64) -> Result<(), DomainError> {
        self.validate_compensation(compensated)?;
        self.co2_compensated = compensated;
        Ok(())
    }

    pub fn set_confirmed(&mut self, confirmed: bool) {
        self.confirmed = confirmed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Vehicle;
    use crate::domain::segment::fixtures::*;

    fn travel() -> Travel {
        Travel::new(
            TravelId(1),
            UserId(7),
            vec![
                segment(5, Vehicle::Walk, 0.5, 0.0),
                segment(6, Vehicle::Train, 300.0, 10.5),
            ],
            vec![segment(1, Vehicle::Car, 320.0, 64.0)],
        )
        .unwrap()
    }

    #[test]
    fn construction_normalises_numbering_and_direction() {
        let t = travel();
        let outward: Vec<u32> = t.outward().map(|s| s.num_segment).collect();
        let inbound: Vec<u32> = t.inbound().map(|s| s.num_segment).collect();
        assert_eq!(outward, vec![1, 2]);
        assert_eq!(inbound, vec![1]);
        assert!(t.is_round_trip());
        assert!(!t.is_confirmed());
        assert_eq!(t.co2_compensated(), 0.0);
    }

    #[test]
    fn totals_cover_both_directions() {
        let t = travel();
        assert!((t.total_distance_km() - 620.5).abs() < 1e-9);
        assert!((t.total_co2_kg() - 74.5).abs() < 1e-9);
    }

    #[test]
    fn empty_travel_rejected() {
        let err = Travel::new(TravelId(1), UserId(1), vec![], vec![]).unwrap_err();
        assert_eq!(err, DomainError::EmptyItinerary);
    }

    #[test]
    fn compensation_bounds() {
        let mut t = travel();
        assert!(t.set_compensation(-1.0).is_err());
        assert!(t.set_compensation(74.6).is_err());
        assert!(t.set_compensation(f64::NAN).is_err());
        t.set_compensation(74.5).unwrap();
        assert_eq!(t.co2_compensated(), 74.5);
    }

    #[test]
    fn one_way_is_not_round_trip() {
        let t = Travel::new(
            TravelId(2),
            UserId(1),
            vec![segment(1, Vehicle::Bike, 12.0, 0.0)],
            vec![],
        )
        .unwrap();
        assert!(!t.is_round_trip());
    }
}
