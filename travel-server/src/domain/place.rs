//! Place records and coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances.
const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Identifier of a stored place record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlaceId(pub u64);

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in kilometres (haversine formula).
    ///
    /// # Examples
    ///
    /// ```
    /// use travel_server::domain::Coordinates;
    ///
    /// let paris = Coordinates::new(48.8566, 2.3522);
    /// let london = Coordinates::new(51.5074, -0.1278);
    /// let km = paris.haversine_km(&london);
    /// assert!((km - 343.5).abs() < 1.0);
    /// ```
    pub fn haversine_km(&self, other: &Coordinates) -> f64 {
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();
        let a = (dlat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

/// A resolved place (city, station, stop or airport).
///
/// The country is optional: reverse geocoding does not always yield one,
/// and stops in international waters or unlabelled areas have none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub country: Option<String>,
    pub location: Coordinates,
}

impl Place {
    pub fn new(
        id: PlaceId,
        name: impl Into<String>,
        country: Option<String>,
        location: Coordinates,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            country,
            location,
        }
    }

    /// Returns true if this place has the given name and country.
    ///
    /// Names compare case-insensitively; a missing country only matches
    /// another missing country.
    pub fn matches(&self, name: &str, country: Option<&str>) -> bool {
        self.name.eq_ignore_ascii_case(name)
            && match (self.country.as_deref(), country) {
                (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                (None, None) => true,
                _ => false,
            }
    }

    /// Great-circle distance to another place in kilometres.
    pub fn distance_km(&self, other: &Place) -> f64 {
        self.location.haversine_km(&other.location)
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country {
            Some(country) => write!(f, "{} ({})", self.name, country),
            None => f.write_str(&self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> Place {
        Place::new(
            PlaceId(1),
            "Paris",
            Some("France".into()),
            Coordinates::new(48.8566, 2.3522),
        )
    }

    #[test]
    fn haversine_one_degree_at_equator() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.0, 1.0);
        assert!((a.haversine_km(&b) - 111.195).abs() < 0.2);
    }

    #[test]
    fn haversine_is_zero_for_same_point() {
        let a = Coordinates::new(45.0, 7.0);
        assert_eq!(a.haversine_km(&a), 0.0);
    }

    #[test]
    fn matches_is_case_insensitive() {
        let p = paris();
        assert!(p.matches("paris", Some("FRANCE")));
        assert!(!p.matches("Paris", None));
        assert!(!p.matches("Lyon", Some("France")));
    }

    #[test]
    fn missing_country_matches_missing_country() {
        let p = Place::new(PlaceId(2), "Nowhere", None, Coordinates::new(0.0, 0.0));
        assert!(p.matches("Nowhere", None));
        assert!(!p.matches("Nowhere", Some("France")));
    }

    #[test]
    fn display() {
        assert_eq!(paris().to_string(), "Paris (France)");
        let p = Place::new(PlaceId(2), "Nowhere", None, Coordinates::new(0.0, 0.0));
        assert_eq!(p.to_string(), "Nowhere");
    }
}
