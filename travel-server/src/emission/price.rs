//! Monetary cost per vehicle kind.

use crate::domain::Coordinates;

/// Assumed fuel economy of a car.
pub const CAR_KM_PER_LITER: f64 = 15.0;

/// Cost of driving `distance_km` given a fuel price and a toll total.
///
/// # Examples
///
/// ```
/// use travel_server::emission::car_price;
///
/// // 300 km at 15 km/l is 20 litres
/// assert!((car_price(300.0, 1.8, 12.0) - 48.0).abs() < 1e-9);
/// ```
pub fn car_price(distance_km: f64, fuel_cost_per_liter: f64, toll_cost: f64) -> f64 {
    distance_km / CAR_KM_PER_LITER * fuel_cost_per_liter + toll_cost
}

/// Split an offer's total price across its legs in proportion to each leg's
/// great-circle length.
///
/// Legs are `(from, to)` coordinate pairs. If every leg has zero length the
/// total is split evenly. Returns one price per leg, summing to `total`; the
/// last leg takes whatever the others leave, so a single leg gets exactly
/// `total`.
pub fn apportion_flight_price(total: f64, legs: &[(Coordinates, Coordinates)]) -> Vec<f64> {
    let Some(last) = legs.len().checked_sub(1) else {
        return Vec::new();
    };

    let mut weights: Vec<f64> = legs.iter().map(|(a, b)| a.haversine_km(b)).collect();
    let mut sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        weights = vec![1.0; legs.len()];
        sum = legs.len() as f64;
    }

    let mut prices: Vec<f64> = weights[..last].iter().map(|w| total * w / sum).collect();
    let assigned: f64 = prices.iter().sum();
    prices.push((total - assigned).max(0.0));
    prices
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn coords() -> impl Strategy<Value = Coordinates> {
        (-80.0f64..80.0, -179.0f64..179.0).prop_map(|(lat, lon)| Coordinates::new(lat, lon))
    }

    proptest! {
        /// Apportioned prices always add back up to the total
        #[test]
        fn shares_sum_to_total(
            total in 0.0f64..10_000.0,
            legs in proptest::collection::vec((coords(), coords()), 1..6),
        ) {
            let prices = apportion_flight_price(total, &legs);
            prop_assert_eq!(prices.len(), legs.len());
            let sum: f64 = prices.iter().sum();
            prop_assert!((sum - total).abs() < 1e-6);
            prop_assert!(prices.iter().all(|p| *p >= 0.0));
        }
    }
}
