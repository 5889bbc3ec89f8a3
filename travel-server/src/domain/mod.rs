//! Domain types for the travel planner.
//!
//! This module contains the core domain model: places, vehicles, segments,
//! itinerary options, travels and reviews. Types enforce their invariants
//! at construction time, so code that receives them can trust their validity.

mod error;
mod itinerary;
mod place;
mod review;
pub(crate) mod segment;
mod travel;
mod vehicle;

pub use error::DomainError;
pub use itinerary::ItineraryOption;
pub use place::{Coordinates, Place, PlaceId};
pub use review::{Rating, RatingAverages, Ratings, Review, ReviewId, ReviewsAggregated};
pub use segment::{Direction, Segment, check_numbering, renumber};
pub use travel::{Travel, TravelId, UserId};
pub use vehicle::{InvalidVehicle, RoadMode, TransitMode, Vehicle};
