//! In-memory stores for travels, scores and reviews.
//!
//! Each store keeps all of its state behind one `RwLock`, so a mutation
//! and its derived updates (score deltas, review aggregates) happen under
//! the same write guard and are never observed half-applied.

mod error;
mod review;
mod travel;

pub use error::StoreError;
pub use review::ReviewStore;
pub use travel::{TravelStore, TravelUpdate, UserScore, UserStats};
