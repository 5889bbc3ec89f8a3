//! Multi-modal itinerary search.
//!
//! Queries every enabled provider for one origin/destination pair and
//! returns the options that survive normalization. A failing or slow
//! provider only removes its own option.

mod aggregate;
mod config;
mod request;

pub use aggregate::{Aggregator, aggregate_options};
pub use config::SearchConfig;
pub use request::SearchQuery;
