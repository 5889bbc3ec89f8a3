//! Eco-score and badges.
//!
//! A confirmed travel contributes to its owner's score in two parts: a
//! confirmation component rewarding low-carbon distance, and a
//! compensation component rewarding offset CO2. Scores are kept per
//! distance bucket (short trips up to 800 km, long trips beyond).
//!
//! Every score change is expressed as a delta between the travel's
//! contribution before and after a mutation, so that confirming,
//! unconfirming, compensating and deleting compose without drift.

mod badge;
mod coefficient;
mod delta;
mod error;

pub use badge::{Badge, BadgeKind, Tier, compute_badges};
pub use coefficient::{travel_coefficient, vehicle_weight};
pub use delta::{
    COMPENSATION_RATE, DistanceBucket, FULL_OFFSET_BONUS, SHORT_DISTANCE_KM, ScoreDelta,
    compensation_component, compute_score_delta, confirmation_component, contribution,
    deletion_delta, is_fully_offset,
};
pub use error::ScoreError;
