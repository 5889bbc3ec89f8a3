//! In-memory place directory.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use crate::domain::{Coordinates, Place, PlaceId};

use super::directory::{Geocoder, PlaceDirectory};
use super::error::PlaceError;

/// Thread-safe in-memory place records.
///
/// Cloning shares the same underlying records.
#[derive(Clone, Default)]
pub struct InMemoryPlaces {
    inner: Arc<RwLock<BTreeMap<PlaceId, Place>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryPlaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory pre-populated with the given places.
    ///
    /// New ids continue after the largest existing one.
    pub fn with_places(places: impl IntoIterator<Item = Place>) -> Self {
        let map: BTreeMap<PlaceId, Place> = places.into_iter().map(|p| (p.id, p)).collect();
        let next = map.keys().next_back().map_or(0, |id| id.0);
        Self {
            inner: Arc::new(RwLock::new(map)),
            next_id: Arc::new(AtomicU64::new(next)),
        }
    }

    /// Number of stored places.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

impl PlaceDirectory for InMemoryPlaces {
    async fn get(&self, id: PlaceId) -> Result<Option<Place>, PlaceError> {
        Ok(self.inner.read().await.get(&id).cloned())
    }

    async fn find(&self, name: &str, country: Option<&str>) -> Result<Option<Place>, PlaceError> {
        let guard = self.inner.read().await;
        Ok(guard.values().find(|p| p.matches(name, country)).cloned())
    }

    async fn create(
        &self,
        name: &str,
        country: Option<&str>,
        location: Coordinates,
    ) -> Result<Place, PlaceError> {
        let id = PlaceId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let place = Place::new(id, name, country.map(str::to_string), location);
        self.inner.write().await.insert(id, place.clone());
        Ok(place)
    }
}

/// A geocoder that answers the same country everywhere.
///
/// Used for recorded-fixture runs and tests, where no geocoding API is
/// available.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    country: Option<String>,
}

impl StaticGeocoder {
    pub fn new(country: Option<String>) -> Self {
        Self { country }
    }
}

impl Geocoder for StaticGeocoder {
    async fn country_at(&self, _location: Coordinates) -> Result<Option<String>, PlaceError> {
        Ok(self.country.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::{find_or_create, resolve_place};

    fn lyon() -> Coordinates {
        Coordinates::new(45.76, 4.86)
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let places = InMemoryPlaces::new();
        let a = places.create("Lyon", Some("France"), lyon()).await.unwrap();
        let b = places.create("Grenoble", Some("France"), lyon()).await.unwrap();
        assert_eq!(a.id, PlaceId(1));
        assert_eq!(b.id, PlaceId(2));
        assert_eq!(places.len().await, 2);
    }

    #[tokio::test]
    async fn with_places_continues_ids() {
        let existing = Place::new(PlaceId(41), "Paris", Some("France".into()), lyon());
        let places = InMemoryPlaces::with_places([existing]);
        let created = places.create("Lyon", None, lyon()).await.unwrap();
        assert_eq!(created.id, PlaceId(42));
    }

    #[tokio::test]
    async fn find_or_create_reuses_by_name_and_country() {
        let places = InMemoryPlaces::new();
        let first = find_or_create(&places, "Lyon", Some("France"), lyon())
            .await
            .unwrap();
        let again = find_or_create(&places, "LYON", Some("france"), lyon())
            .await
            .unwrap();
        assert_eq!(first.id, again.id);
        assert_eq!(places.len().await, 1);
    }

    #[tokio::test]
    async fn same_name_other_country_is_new_place() {
        let places = InMemoryPlaces::new();
        let fr = find_or_create(&places, "Valence", Some("France"), lyon())
            .await
            .unwrap();
        let es = find_or_create(&places, "Valence", Some("Spain"), lyon())
            .await
            .unwrap();
        assert_ne!(fr.id, es.id);
    }

    #[tokio::test]
    async fn empty_name_rejected() {
        let places = InMemoryPlaces::new();
        let err = find_or_create(&places, "  ", None, lyon()).await.unwrap_err();
        assert!(matches!(err, PlaceError::EmptyName));
    }

    #[tokio::test]
    async fn resolve_uses_geocoded_country() {
        let places = InMemoryPlaces::new();
        let geocoder = StaticGeocoder::new(Some("France".into()));
        let place = resolve_place(&geocoder, &places, "Lyon Part-Dieu", lyon())
            .await
            .unwrap();
        assert_eq!(place.country.as_deref(), Some("France"));
        assert_eq!(place.location, lyon());
        assert_eq!(
            places.get(place.id).await.unwrap().map(|p| p.name),
            Some("Lyon Part-Dieu".to_string())
        );
    }
}
