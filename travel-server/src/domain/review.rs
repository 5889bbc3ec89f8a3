//! City reviews and their per-city aggregates.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{DomainError, PlaceId, UserId};

/// A rating between 1 and 5 inclusive.
///
/// # Examples
///
/// ```
/// use travel_server::domain::Rating;
///
/// assert_eq!(Rating::new(4).unwrap().value(), 4);
/// assert!(Rating::new(0).is_err());
/// assert!(Rating::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if (1..=5).contains(&value) {
            Ok(Rating(value))
        } else {
            Err(DomainError::InvalidRating(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// The three rated dimensions of a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratings {
    pub safety: Rating,
    pub culture: Rating,
    pub cost: Rating,
}

impl Ratings {
    /// Validate three raw ratings.
    pub fn new(safety: u8, culture: u8, cost: u8) -> Result<Self, DomainError> {
        Ok(Self {
            safety: Rating::new(safety)?,
            culture: Rating::new(culture)?,
            cost: Rating::new(cost)?,
        })
    }
}

/// Identifier of a stored review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReviewId(pub u64);

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user's review of a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub user: UserId,
    pub city: PlaceId,
    pub ratings: Ratings,
    pub comment: String,
}

/// Average ratings of a city.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingAverages {
    pub safety: f64,
    pub culture: f64,
    pub cost: f64,
    pub count: u64,
}

/// Running sums and count of all reviews of one city.
///
/// Never created on its own: it is created by the first review of a city
/// and kept in step with every review mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewsAggregated {
    pub city: PlaceId,
    pub safety_sum: u64,
    pub culture_sum: u64,
    pub cost_sum: u64,
    pub count: u64,
}

impl ReviewsAggregated {
    pub fn new(city: PlaceId) -> Self {
        Self {
            city,
            safety_sum: 0,
            culture_sum: 0,
            cost_sum: 0,
            count: 0,
        }
    }

    /// Account for a new review.
    pub fn add(&mut self, ratings: &Ratings) {
        self.safety_sum += u64::from(ratings.safety.value());
        self.culture_sum += u64::from(ratings.culture.value());
        self.cost_sum += u64::from(ratings.cost.value());
        self.count += 1;
    }

    /// Remove a previously added review.
    pub fn remove(&mut self, ratings: &Ratings) {
        self.safety_sum = self
            .safety_sum
            .saturating_sub(u64::from(ratings.safety.value()));
        self.culture_sum = self
            .culture_sum
            .saturating_sub(u64::from(ratings.culture.value()));
        self.cost_sum = self.cost_sum.saturating_sub(u64::from(ratings.cost.value()));
        self.count = self.count.saturating_sub(1);
    }

    /// Swap an existing review's ratings for new ones.
    pub fn replace(&mut self, old: &Ratings, new: &Ratings) {
        self.remove(old);
        self.add(new);
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Average per dimension, or `None` if there are no reviews.
    pub fn averages(&self) -> Option<RatingAverages> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(RatingAverages {
            safety: self.safety_sum as f64 / n,
            culture: self.culture_sum as f64 / n,
            cost: self.cost_sum as f64 / n,
            count: self.count,
        })
    }
}
