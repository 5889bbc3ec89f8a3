//! Toll, fuel and transit-fare lookups.
//!
//! Car prices need a toll total and a fuel price for the originating
//! place; transit prices come from a fare lookup per segment. The
//! `CostLookup` trait abstracts the cost service so normalizers can be
//! tested with fixed rates.

mod client;
mod error;
mod fixed;

pub use client::{CostClient, CostClientConfig};
pub use error::CostError;
pub use fixed::FixedCosts;

use crate::domain::TransitMode;

/// Source of monetary costs used by the price calculators.
pub trait CostLookup {
    /// Total toll cost for a drive starting at `origin`.
    async fn toll_cost(&self, origin: &str) -> Result<f64, CostError>;

    /// Fuel price per liter at `origin`.
    async fn fuel_cost_per_liter(&self, origin: &str) -> Result<f64, CostError>;

    /// Fare for a transit segment.
    async fn transit_cost(
        &self,
        origin: &str,
        destination: &str,
        mode: TransitMode,
        distance_km: f64,
    ) -> Result<f64, CostError>;
}
