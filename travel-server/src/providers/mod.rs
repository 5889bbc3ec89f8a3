//! Routing and pricing providers.
//!
//! Three provider families feed a search:
//! - Flight offers (Amadeus), authenticated with a client-credentials
//!   token that is refreshed once on HTTP 401
//! - Distance matrix for car and bike (Google Maps)
//! - Transit directions for train and bus (Google Maps)
//!
//! Raw responses are kept as provider DTOs until one of the normalizers in
//! [`convert`] turns them into segments.

mod amadeus;
mod auth;
pub mod convert;
mod error;
mod google;
mod recorded;
mod source;
#[cfg(test)]
mod test_server;
pub mod types;

pub use amadeus::{AmadeusClient, AmadeusConfig};
pub use auth::CredentialProvider;
pub use convert::{Collaborators, OptionError, ValidationError, normalize};
pub use error::ProviderError;
pub use google::{GoogleMapsClient, GoogleMapsConfig};
pub use recorded::RecordedSource;
pub use source::{ItinerarySource, LiveSource};
pub use types::{DirectionsResponse, DistanceMatrixResponse, FlightSearch, ProviderResponse};
