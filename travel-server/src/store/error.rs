//! Store error types.

use crate::domain::{DomainError, ReviewId, TravelId};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("travel {0} not found")]
    TravelNotFound(TravelId),

    #[error("review {0} not found")]
    ReviewNotFound(ReviewId),

    /// Invalid input: empty travel, compensation or rating out of range
    #[error(transparent)]
    Domain(#[from] DomainError),
}
