//! Fixed-rate costs for offline runs and tests.

use crate::domain::TransitMode;

use super::CostLookup;
use super::error::CostError;

/// Costs from constant rates instead of a live service.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedCosts {
    pub toll: f64,
    pub fuel_per_liter: f64,
    pub train_per_km: f64,
    pub bus_per_km: f64,
}

impl Default for FixedCosts {
    fn default() -> Self {
        Self {
            toll: 0.0,
            fuel_per_liter: 1.8,
            train_per_km: 0.12,
            bus_per_km: 0.06,
        }
    }
}

impl CostLookup for FixedCosts {
    async fn toll_cost(&self, _origin: &str) -> Result<f64, CostError> {
        Ok(self.toll)
    }

    async fn fuel_cost_per_liter(&self, _origin: &str) -> Result<f64, CostError> {
        Ok(self.fuel_per_liter)
    }

    async fn transit_cost(
        &self,
        _origin: &str,
        _destination: &str,
        mode: TransitMode,
        distance_km: f64,
    ) -> Result<f64, CostError> {
        let rate = match mode {
            TransitMode::Train => self.train_per_km,
            TransitMode::Bus => self.bus_per_km,
        };
        Ok(rate * distance_km)
    }
}
