//! Emission and price calculators.
//!
//! Pure, deterministic functions mapping a vehicle and a distance or
//! duration to kilograms of CO2 and to a monetary cost. Inputs are trusted:
//! negative distances are rejected upstream by the normalizers.

mod co2;
mod price;

pub use co2::{
    BUS_KG_PER_KM, CAR_KG_PER_KM, TRAIN_KG_PER_KM, bus_co2, car_co2, co2_for, plane_co2,
    train_co2,
};
pub use price::{CAR_KM_PER_LITER, apportion_flight_price, car_price};
