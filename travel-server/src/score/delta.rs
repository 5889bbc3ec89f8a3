//! Score components and deltas.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Travel;

use super::coefficient::travel_coefficient;
use super::error::ScoreError;

/// Travels up to this total distance count as short-distance.
pub const SHORT_DISTANCE_KM: f64 = 800.0;

/// Score per compensated kilogram of CO2.
pub const COMPENSATION_RATE: f64 = 0.12;

/// Flat bonus for offsetting all of a travel's CO2.
pub const FULL_OFFSET_BONUS: f64 = 2.0;

/// Compensation within this many kilograms of the emissions is a full offset.
const OFFSET_TOLERANCE_KG: f64 = 1e-6;

/// Which of a user's two score totals a travel feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceBucket {
    Short,
    Long,
}

impl DistanceBucket {
    /// Bucket for a travel's total distance.
    ///
    /// # Examples
    ///
    /// ```
    /// use travel_server::score::DistanceBucket;
    ///
    /// assert_eq!(DistanceBucket::for_distance(800.0), DistanceBucket::Short);
    /// assert_eq!(DistanceBucket::for_distance(800.1), DistanceBucket::Long);
    /// ```
    pub fn for_distance(distance_km: f64) -> Self {
        if distance_km <= SHORT_DISTANCE_KM {
            DistanceBucket::Short
        } else {
            DistanceBucket::Long
        }
    }
}

impl fmt::Display for DistanceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceBucket::Short => f.write_str("short"),
            DistanceBucket::Long => f.write_str("long"),
        }
    }
}

/// A signed change to one of a user's score buckets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreDelta {
    pub value: f64,
    pub bucket: DistanceBucket,
}

impl ScoreDelta {
    pub fn zero(bucket: DistanceBucket) -> Self {
        Self { value: 0.0, bucket }
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }
}

/// Reward for confirming a travel: low-carbon distance per kilogram.
///
/// A travel without emissions earns `coefficient * distance`.
pub fn confirmation_component(coefficient: f64, distance_km: f64, co2_kg: f64) -> f64 {
    if co2_kg <= 0.0 {
        coefficient * distance_km
    } else {
        coefficient * distance_km / co2_kg
    }
}

/// Returns true if `compensated` offsets all of a non-zero `emitted`.
pub fn is_fully_offset(compensated: f64, emitted: f64) -> bool {
    emitted > 0.0 && (compensated - emitted).abs() <= OFFSET_TOLERANCE_KG
}

/// Reward for compensating CO2, including the full-offset bonus.
pub fn compensation_component(compensated: f64, emitted: f64) -> f64 {
    let bonus = if is_fully_offset(compensated, emitted) {
        FULL_OFFSET_BONUS
    } else {
        0.0
    };
    COMPENSATION_RATE * compensated + bonus
}

/// What a travel in the given state adds to its owner's score.
///
/// Unconfirmed travels contribute nothing.
pub fn contribution(
    coefficient: f64,
    distance_km: f64,
    emitted: f64,
    compensated: f64,
    confirmed: bool,
) -> f64 {
    if !confirmed {
        return 0.0;
    }
    confirmation_component(coefficient, distance_km, emitted)
        + compensation_component(compensated, emitted)
}

/// Score change from moving `travel` to a new compensation and
/// confirmation state.
///
/// # Errors
///
/// - [`ScoreError::Domain`] if `new_compensation` is outside
///   `0..=travel.total_co2_kg()`
/// - [`ScoreError::Degenerate`] if the travel covers no distance
pub fn compute_score_delta(
    travel: &Travel,
    new_compensation: f64,
    new_confirmed: bool,
) -> Result<ScoreDelta, ScoreError> {
    travel.validate_compensation(new_compensation)?;

    let distance = travel.total_distance_km();
    let emitted = travel.total_co2_kg();
    let coefficient = travel_coefficient(travel.segments())?;

    let before = contribution(
        coefficient,
        distance,
        emitted,
        travel.co2_compensated(),
        travel.is_confirmed(),
    );
    let after = contribution(
        coefficient,
        distance,
        emitted,
        new_compensation,
        new_confirmed,
    );

    Ok(ScoreDelta {
        value: after - before,
        bucket: DistanceBucket::for_distance(distance),
    })
}

/// Score change from deleting `travel`: its whole contribution, negated.
pub fn deletion_delta(travel: &Travel) -> Result<ScoreDelta, ScoreError> {
    compute_score_delta(travel, travel.co2_compensated(), false)
}
