//! Place lookup traits and the find-or-create resolution routine.

use tracing::trace;

use crate::domain::{Coordinates, Place, PlaceId};

use super::error::PlaceError;

/// Reverse geocoding: which country is at these coordinates?
pub trait Geocoder {
    async fn country_at(&self, location: Coordinates) -> Result<Option<String>, PlaceError>;
}

/// Storage of canonical place records.
pub trait PlaceDirectory {
    async fn get(&self, id: PlaceId) -> Result<Option<Place>, PlaceError>;

    /// Find a place by name and country.
    async fn find(&self, name: &str, country: Option<&str>) -> Result<Option<Place>, PlaceError>;

    /// Create a new place record.
    async fn create(
        &self,
        name: &str,
        country: Option<&str>,
        location: Coordinates,
    ) -> Result<Place, PlaceError>;
}

/// Reuse the place matching `name` and `country`, or create it.
///
/// This is a read-then-create sequence without locking: two concurrent
/// callers resolving the same new place may both create a record. Duplicate
/// records are harmless to every consumer.
pub async fn find_or_create<D: PlaceDirectory>(
    places: &D,
    name: &str,
    country: Option<&str>,
    location: Coordinates,
) -> Result<Place, PlaceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PlaceError::EmptyName);
    }

    if let Some(existing) = places.find(name, country).await? {
        trace!(place = %existing, "reusing place record");
        return Ok(existing);
    }

    let created = places.create(name, country, location).await?;
    trace!(place = %created, id = %created.id, "created place record");
    Ok(created)
}

/// Resolve a provider-reported stop to a canonical place by name and
/// coordinates, reverse-geocoding its country.
pub async fn resolve_place<G: Geocoder, D: PlaceDirectory>(
    geocoder: &G,
    places: &D,
    name: &str,
    location: Coordinates,
) -> Result<Place, PlaceError> {
    let country = geocoder.country_at(location).await?;
    find_or_create(places, name, country.as_deref(), location).await
}
