//! CO2 emission per vehicle kind.

use chrono::Duration;

use crate::domain::Vehicle;

/// Kilograms of CO2 per car-kilometre.
pub const CAR_KG_PER_KM: f64 = 0.2;

/// Kilograms of CO2 per passenger-kilometre by train.
pub const TRAIN_KG_PER_KM: f64 = 0.035;

/// Kilograms of CO2 per passenger-kilometre by bus.
pub const BUS_KG_PER_KM: f64 = 0.03;

/// Per-passenger fuel-burn regression in flight minutes, lowest order first.
const PLANE_COEFFICIENTS: [f64; 5] = [30.0, 1.0, 5e-4, -1e-6, 1e-9];

pub fn car_co2(distance_km: f64) -> f64 {
    CAR_KG_PER_KM * distance_km
}

pub fn train_co2(distance_km: f64) -> f64 {
    TRAIN_KG_PER_KM * distance_km
}

pub fn bus_co2(distance_km: f64) -> f64 {
    BUS_KG_PER_KM * distance_km
}

/// CO2 of one passenger on a flight of the given duration.
///
/// Quartic regression in minutes; a flight with no duration emits nothing.
///
/// # Examples
///
/// ```
/// use chrono::Duration;
/// use travel_server::emission::plane_co2;
///
/// let one_hour = plane_co2(Duration::minutes(60));
/// assert!((one_hour - 91.59696).abs() < 1e-6);
/// assert_eq!(plane_co2(Duration::zero()), 0.0);
/// ```
pub fn plane_co2(duration: Duration) -> f64 {
    let minutes = duration.num_seconds() as f64 / 60.0;
    if minutes <= 0.0 {
        return 0.0;
    }
    // Horner evaluation, highest order first
    PLANE_COEFFICIENTS
        .iter()
        .rev()
        .fold(0.0, |acc, c| acc * minutes + c)
}

/// CO2 for any vehicle kind.
///
/// Distance drives road and rail emissions; duration drives flights.
/// Bikes and walks emit nothing.
pub fn co2_for(vehicle: Vehicle, distance_km: f64, duration: Duration) -> f64 {
    match vehicle {
        Vehicle::Car => car_co2(distance_km),
        Vehicle::Train => train_co2(distance_km),
        Vehicle::Bus => bus_co2(distance_km),
        Vehicle::Plane => plane_co2(duration),
        Vehicle::Bike | Vehicle::Walk => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_modes() {
        assert!((car_co2(100.0) - 20.0).abs() < 1e-9);
        assert!((train_co2(100.0) - 3.5).abs() < 1e-9);
        assert!((bus_co2(100.0) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn human_powered_modes_emit_nothing() {
        assert_eq!(co2_for(Vehicle::Bike, 40.0, Duration::hours(2)), 0.0);
        assert_eq!(co2_for(Vehicle::Walk, 2.0, Duration::minutes(25)), 0.0);
    }

    #[test]
    fn plane_polynomial_values() {
        // 30 + 180 + 16.2 - 5.832 + 1.04976
        let three_hours = plane_co2(Duration::minutes(180));
        assert!((three_hours - 221.41776).abs() < 1e-6);
    }

    #[test]
    fn plane_ignores_distance() {
        let d = Duration::minutes(90);
        assert_eq!(co2_for(Vehicle::Plane, 10.0, d), co2_for(Vehicle::Plane, 9000.0, d));
    }

    #[test]
    fn plane_negative_duration_is_zero() {
        assert_eq!(plane_co2(Duration::minutes(-5)), 0.0);
    }
}
