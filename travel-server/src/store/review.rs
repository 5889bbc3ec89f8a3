//! City reviews and their per-city aggregates.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{PlaceId, RatingAverages, Ratings, Review, ReviewId, ReviewsAggregated, UserId};

use super::error::StoreError;

#[derive(Debug, Default)]
struct State {
    reviews: BTreeMap<ReviewId, Review>,
    aggregates: HashMap<PlaceId, ReviewsAggregated>,
    next_id: u64,
}

/// Review storage.
///
/// A city's aggregate is created by its first review, updated with every
/// change, and dropped with its last review.
#[derive(Debug, Clone, Default)]
pub struct ReviewStore {
    state: Arc<RwLock<State>>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(
        &self,
        user: UserId,
        city: PlaceId,
        ratings: Ratings,
        comment: impl Into<String>,
    ) -> Review {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let review = Review {
            id: ReviewId(state.next_id),
            user,
            city,
            ratings,
            comment: comment.into(),
        };

        state
            .aggregates
            .entry(city)
            .or_insert_with(|| ReviewsAggregated::new(city))
            .add(&ratings);
        state.reviews.insert(review.id, review.clone());

        debug!(review = %review.id, %city, "created review");
        review
    }

    pub async fn get(&self, id: ReviewId) -> Result<Review, StoreError> {
        self.state
            .read()
            .await
            .reviews
            .get(&id)
            .cloned()
            .ok_or(StoreError::ReviewNotFound(id))
    }

    /// Replace a review's ratings, and its comment if one is given.
    pub async fn update(
        &self,
        id: ReviewId,
        ratings: Ratings,
        comment: Option<String>,
    ) -> Result<Review, StoreError> {
        let mut guard = self.state.write().await;
        let State {
            reviews,
            aggregates,
            ..
        } = &mut *guard;

        let review = reviews.get_mut(&id).ok_or(StoreError::ReviewNotFound(id))?;
        aggregates
            .entry(review.city)
            .or_insert_with(|| ReviewsAggregated::new(review.city))
            .replace(&review.ratings, &ratings);

        review.ratings = ratings;
        if let Some(comment) = comment {
            review.comment = comment;
        }
        Ok(review.clone())
    }

    pub async fn delete(&self, id: ReviewId) -> Result<Review, StoreError> {
        let mut guard = self.state.write().await;
        let State {
            reviews,
            aggregates,
            ..
        } = &mut *guard;

        let review = reviews.remove(&id).ok_or(StoreError::ReviewNotFound(id))?;
        if let Some(aggregate) = aggregates.get_mut(&review.city) {
            aggregate.remove(&review.ratings);
            if aggregate.is_empty() {
                aggregates.remove(&review.city);
            }
        }

        debug!(review = %id, city = %review.city, "deleted review");
        Ok(review)
    }

    /// All reviews of `city`, oldest first.
    pub async fn for_city(&self, city: PlaceId) -> Vec<Review> {
        self.state
            .read()
            .await
            .reviews
            .values()
            .filter(|r| r.city == city)
            .cloned()
            .collect()
    }

    pub async fn aggregate(&self, city: PlaceId) -> Option<ReviewsAggregated> {
        self.state.read().await.aggregates.get(&city).cloned()
    }

    pub async fn averages(&self, city: PlaceId) -> Option<RatingAverages> {
        self.aggregate(city).await.and_then(|a| a.averages())
    }
}
