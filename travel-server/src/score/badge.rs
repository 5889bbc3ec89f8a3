//! Badges derived from a user's travel totals.

use serde::{Deserialize, Serialize};

/// Badge level. Ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Low,
    Mid,
    High,
}

/// What a badge rewards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    /// Total kilometres travelled
    Distance,
    /// Kilometres per kilogram of CO2
    EcoChoice,
    /// Share of emitted CO2 that was compensated
    Compensation,
    /// Number of travels
    TravelCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Badge {
    pub kind: BadgeKind,
    pub tier: Tier,
}

const DISTANCE_KM: [f64; 3] = [3_000.0, 5_000.0, 10_000.0];
const ECO_KM_PER_KG: [f64; 3] = [15.0, 20.0, 30.0];
const COMPENSATION_RATIO: [f64; 3] = [0.2, 0.5, 0.8];
const TRAVEL_COUNT: [f64; 3] = [5.0, 10.0, 30.0];

/// Highest tier whose threshold `value` reaches; thresholds are inclusive.
fn tier(value: f64, [low, mid, high]: [f64; 3]) -> Option<Tier> {
    if value >= high {
        Some(Tier::High)
    } else if value >= mid {
        Some(Tier::Mid)
    } else if value >= low {
        Some(Tier::Low)
    } else {
        None
    }
}

/// Badges earned by a user's totals.
///
/// A user who travelled without emitting anything has the highest
/// eco-choice tier. Users with no distance get no eco-choice badge, and
/// users with no emissions no compensation badge.
///
/// # Examples
///
/// ```
/// use travel_server::score::{Badge, BadgeKind, Tier, compute_badges};
///
/// let badges = compute_badges(3_000.0, 600.0, 0.0, 1);
/// assert_eq!(badges, vec![Badge { kind: BadgeKind::Distance, tier: Tier::Low }]);
/// assert!(compute_badges(2_999.99, 600.0, 0.0, 1).is_empty());
/// ```
pub fn compute_badges(
    distance_km: f64,
    co2_emitted_kg: f64,
    co2_compensated_kg: f64,
    travel_count: u32,
) -> Vec<Badge> {
    let eco_ratio = if distance_km <= 0.0 {
        None
    } else if co2_emitted_kg <= 0.0 {
        Some(f64::INFINITY)
    } else {
        Some(distance_km / co2_emitted_kg)
    };

    let compensation_ratio = (co2_emitted_kg > 0.0).then(|| co2_compensated_kg / co2_emitted_kg);

    [
        (BadgeKind::Distance, Some(distance_km), DISTANCE_KM),
        (BadgeKind::EcoChoice, eco_ratio, ECO_KM_PER_KG),
        (BadgeKind::Compensation, compensation_ratio, COMPENSATION_RATIO),
        (BadgeKind::TravelCount, Some(f64::from(travel_count)), TRAVEL_COUNT),
    ]
    .into_iter()
    .filter_map(|(kind, value, thresholds)| {
        value
            .and_then(|v| tier(v, thresholds))
            .map(|tier| Badge { kind, tier })
    })
    .collect()
}
