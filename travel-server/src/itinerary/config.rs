//! Search configuration for the itinerary aggregator.

use std::time::Duration;

use crate::domain::Vehicle;

/// Configuration parameters for itinerary search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Upper bound on each provider fetch.
    /// A fetch that takes longer drops only that provider's option.
    pub provider_timeout: Duration,

    /// Maximum number of flight offers to request.
    pub max_flight_offers: u32,

    /// ISO-4217 currency for prices.
    pub currency: String,

    /// Modes to query. Walking is never queried on its own.
    pub modes: Vec<Vehicle>,
}

impl SearchConfig {
    /// Returns true if `vehicle` should be queried.
    pub fn is_enabled(&self, vehicle: Vehicle) -> bool {
        !vehicle.is_walk() && self.modes.contains(&vehicle)
    }

    /// Set the per-provider timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Restrict the search to the given modes.
    pub fn with_modes(mut self, modes: impl IntoIterator<Item = Vehicle>) -> Self {
        self.modes = modes.into_iter().collect();
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(10),
            max_flight_offers: 5,
            currency: "EUR".to_string(),
            modes: vec![
                Vehicle::Plane,
                Vehicle::Bike,
                Vehicle::Car,
                Vehicle::Train,
                Vehicle::Bus,
            ],
        }
    }
}
