//! Place directory and resolution.
//!
//! Stops, stations and airports reported by providers are resolved to
//! canonical place records: the country is reverse-geocoded from the
//! coordinates, an existing record with the same name and country is
//! reused, and otherwise a new record is created.

mod directory;
mod error;
mod memory;

pub use directory::{Geocoder, PlaceDirectory, find_or_create, resolve_place};
pub use error::PlaceError;
pub use memory::{InMemoryPlaces, StaticGeocoder};
