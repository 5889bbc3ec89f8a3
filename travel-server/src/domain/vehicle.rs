//! Vehicle kinds and provider vehicle-type classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown vehicle kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid vehicle kind: {0}")]
pub struct InvalidVehicle(String);

/// The vehicle used for one segment of a journey.
///
/// # Examples
///
/// ```
/// use travel_server::domain::Vehicle;
///
/// let v: Vehicle = "train".parse().unwrap();
/// assert_eq!(v, Vehicle::Train);
/// assert_eq!(v.to_string(), "train");
/// assert!("boat".parse::<Vehicle>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vehicle {
    Car,
    Bike,
    Plane,
    Train,
    Bus,
    Walk,
}

impl Vehicle {
    /// All vehicle kinds, in provider query order.
    pub const ALL: [Vehicle; 6] = [
        Vehicle::Plane,
        Vehicle::Bike,
        Vehicle::Car,
        Vehicle::Train,
        Vehicle::Bus,
        Vehicle::Walk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Vehicle::Car => "car",
            Vehicle::Bike => "bike",
            Vehicle::Plane => "plane",
            Vehicle::Train => "train",
            Vehicle::Bus => "bus",
            Vehicle::Walk => "walk",
        }
    }

    /// Returns true for walking connector legs.
    pub fn is_walk(&self) -> bool {
        matches!(self, Vehicle::Walk)
    }

    /// Returns true for public transit (train or bus).
    pub fn is_transit(&self) -> bool {
        matches!(self, Vehicle::Train | Vehicle::Bus)
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vehicle {
    type Err = InvalidVehicle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "car" => Ok(Vehicle::Car),
            "bike" => Ok(Vehicle::Bike),
            "plane" => Ok(Vehicle::Plane),
            "train" => Ok(Vehicle::Train),
            "bus" => Ok(Vehicle::Bus),
            "walk" => Ok(Vehicle::Walk),
            _ => Err(InvalidVehicle(s.to_string())),
        }
    }
}

/// Provider vehicle types accepted as a bus.
const BUS_TYPES: &[&str] = &["BUS", "INTERCITY_BUS", "SHARE_TAXI", "TROLLEYBUS"];

/// Provider vehicle types accepted as a train.
const TRAIN_TYPES: &[&str] = &[
    "COMMUTER_TRAIN",
    "HEAVY_RAIL",
    "HIGH_SPEED_TRAIN",
    "LONG_DISTANCE_TRAIN",
    "METRO_RAIL",
    "MONORAIL",
    "RAIL",
    "SUBWAY",
    "TRAM",
];

/// The transit mode requested from a directions provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitMode {
    Train,
    Bus,
}

impl TransitMode {
    /// Value of the provider's `transit_mode` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            TransitMode::Train => "train",
            TransitMode::Bus => "bus",
        }
    }

    pub fn vehicle(&self) -> Vehicle {
        match self {
            TransitMode::Train => Vehicle::Train,
            TransitMode::Bus => Vehicle::Bus,
        }
    }

    /// Returns true if a provider-reported vehicle type belongs to this mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use travel_server::domain::TransitMode;
    ///
    /// assert!(TransitMode::Train.accepts("HIGH_SPEED_TRAIN"));
    /// assert!(TransitMode::Bus.accepts("TROLLEYBUS"));
    /// assert!(!TransitMode::Bus.accepts("SUBWAY"));
    /// assert!(!TransitMode::Train.accepts("FERRY"));
    /// ```
    pub fn accepts(&self, vehicle_type: &str) -> bool {
        let allowed = match self {
            TransitMode::Train => TRAIN_TYPES,
            TransitMode::Bus => BUS_TYPES,
        };
        allowed.contains(&vehicle_type)
    }
}

impl fmt::Display for TransitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

/// The road mode requested from a distance-matrix provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadMode {
    Driving,
    Bicycling,
}

impl RoadMode {
    /// Value of the provider's `mode` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            RoadMode::Driving => "driving",
            RoadMode::Bicycling => "bicycling",
        }
    }

    pub fn vehicle(&self) -> Vehicle {
        match self {
            RoadMode::Driving => Vehicle::Car,
            RoadMode::Bicycling => Vehicle::Bike,
        }
    }
}

impl fmt::Display for RoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}
