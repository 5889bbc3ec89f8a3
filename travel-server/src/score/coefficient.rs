//! Distance-weighted eco coefficient.

use crate::domain::{Segment, Vehicle};

use super::error::ScoreError;

/// Score weight of one kilometre by `vehicle`.
///
/// Public transit is rewarded; every other mode, human-powered or not,
/// gets the base weight.
pub fn vehicle_weight(vehicle: Vehicle) -> f64 {
    match vehicle {
        Vehicle::Train | Vehicle::Bus => 0.44,
        Vehicle::Car | Vehicle::Bike | Vehicle::Plane | Vehicle::Walk => 0.05,
    }
}

/// Distance-weighted mean of the vehicle weights of `segments`.
///
/// # Errors
///
/// [`ScoreError::Degenerate`] if the segments cover no distance.
///
/// # Examples
///
/// ```
/// use travel_server::score::travel_coefficient;
///
/// assert!(travel_coefficient(&[]).is_err());
/// ```
pub fn travel_coefficient(segments: &[Segment]) -> Result<f64, ScoreError> {
    let total: f64 = segments.iter().map(|s| s.distance_km).sum();
    if total <= 0.0 {
        return Err(ScoreError::Degenerate);
    }

    let weighted: f64 = segments
        .iter()
        .map(|s| vehicle_weight(s.vehicle) * s.distance_km)
        .sum();
    Ok(weighted / total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::segment::fixtures::segment;

    #[test]
    fn single_mode_is_its_weight() {
        let segs = vec![segment(1, Vehicle::Train, 300.0, 10.5)];
        assert!((travel_coefficient(&segs).unwrap() - 0.44).abs() < 1e-12);

        let segs = vec![segment(1, Vehicle::Car, 300.0, 60.0)];
        assert!((travel_coefficient(&segs).unwrap() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn blend_by_distance() {
        // 100 km by bus, 300 km by car: (0.44*100 + 0.05*300) / 400
        let segs = vec![
            segment(1, Vehicle::Bus, 100.0, 3.0),
            segment(2, Vehicle::Car, 300.0, 60.0),
        ];
        let expected = (44.0 + 15.0) / 400.0;
        assert!((travel_coefficient(&segs).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn walking_counts_at_base_weight() {
        let segs = vec![
            segment(1, Vehicle::Walk, 1.0, 0.0),
            segment(2, Vehicle::Train, 99.0, 3.465),
        ];
        let expected = (0.05 + 0.44 * 99.0) / 100.0;
        assert!((travel_coefficient(&segs).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn zero_distance_is_degenerate() {
        let segs = vec![segment(1, Vehicle::Walk, 0.0, 0.0)];
        assert_eq!(travel_coefficient(&segs), Err(ScoreError::Degenerate));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn vehicles() -> impl Strategy<Value = Vehicle> {
            prop::sample::select(Vehicle::ALL.to_vec())
        }

        proptest! {
            #[test]
            fn coefficient_within_weight_range(
                legs in prop::collection::vec((vehicles(), 0.1f64..5_000.0), 1..8)
            ) {
                let segs: Vec<_> = legs
                    .iter()
                    .enumerate()
                    .map(|(i, (v, d))| segment(i as u32 + 1, *v, *d, 0.0))
                    .collect();
                let c = travel_coefficient(&segs).unwrap();
                prop_assert!((0.05 - 1e-12..=0.44 + 1e-12).contains(&c));
            }
        }
    }
}
