//! Score computation errors.

use crate::domain::DomainError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    /// The travel covers no distance, so no coefficient exists
    #[error("travel has zero distance")]
    Degenerate,

    #[error(transparent)]
    Domain(#[from] DomainError),
}
