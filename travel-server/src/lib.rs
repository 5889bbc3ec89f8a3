//! Eco-travel planning server.
//!
//! Searches door-to-door itineraries by plane, car, bike, train and bus,
//! normalizes every provider's answer into priced segments with their CO2
//! emissions, and scores the travels users confirm and offset.

pub mod cache;
pub mod config;
pub mod costs;
pub mod domain;
pub mod dto;
pub mod emission;
pub mod itinerary;
pub mod places;
pub mod providers;
pub mod score;
pub mod store;
