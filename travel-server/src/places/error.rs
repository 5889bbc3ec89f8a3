//! Place directory error types.

use crate::domain::PlaceId;
use crate::providers::ProviderError;

/// Errors that can occur when looking up or creating places.
#[derive(Debug, thiserror::Error)]
pub enum PlaceError {
    /// Reverse geocoding failed
    #[error("reverse geocoding failed: {0}")]
    Geocode(#[from] ProviderError),

    /// Referenced place does not exist
    #[error("place {0} not found")]
    NotFound(PlaceId),

    /// Place name was empty
    #[error("place name must not be empty")]
    EmptyName,
}
