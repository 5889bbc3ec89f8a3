//! Travels and the per-user scores they feed.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{Segment, Travel, TravelId, UserId};
use crate::score::{
    Badge, DistanceBucket, ScoreDelta, ScoreError, compute_badges, compute_score_delta,
    deletion_delta,
};

use super::error::StoreError;

/// A user's score, split by travel distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UserScore {
    pub short_distance: f64,
    pub long_distance: f64,
}

impl UserScore {
    pub fn total(&self) -> f64 {
        self.short_distance + self.long_distance
    }

    fn apply(&mut self, delta: ScoreDelta) {
        match delta.bucket {
            DistanceBucket::Short => self.short_distance += delta.value,
            DistanceBucket::Long => self.long_distance += delta.value,
        }
    }
}

/// Totals over a user's confirmed travels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UserStats {
    pub travel_count: u32,
    pub distance_km: f64,
    pub co2_emitted_kg: f64,
    pub co2_compensated_kg: f64,
}

/// Requested changes to a travel. `None` leaves a field as it is.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TravelUpdate {
    pub co2_compensated: Option<f64>,
    pub confirmed: Option<bool>,
}

#[derive(Debug, Default)]
struct State {
    travels: BTreeMap<TravelId, Travel>,
    scores: HashMap<UserId, UserScore>,
    next_id: u64,
}

/// Turn a score computation into the delta to apply, if any.
///
/// Zero-distance travels have no score; their changes are applied without
/// touching the owner's score.
fn score_change(
    travel: TravelId,
    result: Result<ScoreDelta, ScoreError>,
) -> Result<Option<ScoreDelta>, StoreError> {
    match result {
        Ok(delta) => Ok(Some(delta)),
        Err(ScoreError::Degenerate) => {
            debug!(%travel, "zero-distance travel, score unchanged");
            Ok(None)
        }
        Err(ScoreError::Domain(e)) => Err(e.into()),
    }
}

/// Travel storage with transactional score updates.
///
/// Cloning shares the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct TravelStore {
    state: Arc<RwLock<State>>,
}

impl TravelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new unconfirmed travel from outward and optional return
    /// segments.
    pub async fn create(
        &self,
        user: UserId,
        outward: Vec<Segment>,
        inbound: Vec<Segment>,
    ) -> Result<Travel, StoreError> {
        let mut state = self.state.write().await;
        let id = TravelId(state.next_id + 1);
        let travel = Travel::new(id, user, outward, inbound)?;

        state.next_id += 1;
        state.travels.insert(id, travel.clone());
        debug!(travel = %id, %user, segments = travel.segments().len(), "created travel");
        Ok(travel)
    }

    pub async fn get(&self, id: TravelId) -> Result<Travel, StoreError> {
        self.state
            .read()
            .await
            .travels
            .get(&id)
            .cloned()
            .ok_or(StoreError::TravelNotFound(id))
    }

    /// All travels of `user`, oldest first.
    pub async fn list(&self, user: UserId) -> Vec<Travel> {
        self.state
            .read()
            .await
            .travels
            .values()
            .filter(|t| t.user() == user)
            .cloned()
            .collect()
    }

    /// Change a travel's compensation and/or confirmation and apply the
    /// resulting score delta to its owner.
    ///
    /// Nothing changes if the new compensation is invalid.
    pub async fn update(&self, id: TravelId, update: TravelUpdate) -> Result<Travel, StoreError> {
        let mut guard = self.state.write().await;
        let State {
            travels, scores, ..
        } = &mut *guard;

        let travel = travels.get_mut(&id).ok_or(StoreError::TravelNotFound(id))?;
        let compensation = update
            .co2_compensated
            .unwrap_or_else(|| travel.co2_compensated());
        let confirmed = update.confirmed.unwrap_or_else(|| travel.is_confirmed());

        let change = score_change(id, compute_score_delta(travel, compensation, confirmed))?;

        travel.set_compensation(compensation)?;
        travel.set_confirmed(confirmed);

        if let Some(delta) = change.filter(|d| !d.is_zero()) {
            scores.entry(travel.user()).or_default().apply(delta);
            debug!(
                travel = %id,
                delta = delta.value,
                bucket = %delta.bucket,
                "applied score delta"
            );
        }

        Ok(travel.clone())
    }

    /// Delete a travel and its segments, reversing its score contribution.
    pub async fn delete(&self, id: TravelId) -> Result<Travel, StoreError> {
        let mut guard = self.state.write().await;
        let State {
            travels, scores, ..
        } = &mut *guard;

        let travel = travels.remove(&id).ok_or(StoreError::TravelNotFound(id))?;
        if let Some(delta) = score_change(id, deletion_delta(&travel))?.filter(|d| !d.is_zero()) {
            scores.entry(travel.user()).or_default().apply(delta);
        }

        debug!(travel = %id, "deleted travel");
        Ok(travel)
    }

    pub async fn score(&self, user: UserId) -> UserScore {
        self.state
            .read()
            .await
            .scores
            .get(&user)
            .copied()
            .unwrap_or_default()
    }

    /// Totals over the user's confirmed travels.
    pub async fn stats(&self, user: UserId) -> UserStats {
        let state = self.state.read().await;
        state
            .travels
            .values()
            .filter(|t| t.user() == user && t.is_confirmed())
            .fold(UserStats::default(), |mut acc, t| {
                acc.travel_count += 1;
                acc.distance_km += t.total_distance_km();
                acc.co2_emitted_kg += t.total_co2_kg();
                acc.co2_compensated_kg += t.co2_compensated();
                acc
            })
    }

    pub async fn badges(&self, user: UserId) -> Vec<Badge> {
        let stats = self.stats(user).await;
        compute_badges(
            stats.distance_km,
            stats.co2_emitted_kg,
            stats.co2_compensated_kg,
            stats.travel_count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::segment::fixtures::segment;
    use crate::domain::{DomainError, Vehicle};
    use crate::score::{BadgeKind, FULL_OFFSET_BONUS, Tier};

    const ALICE: UserId = UserId(1);
    const BOB: UserId = UserId(2);

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// 1000 km by train, 35 kg CO2: long-distance, coefficient 0.44.
    fn long_train() -> Vec<Segment> {
        vec![segment(1, Vehicle::Train, 1000.0, 35.0)]
    }

    fn confirm() -> TravelUpdate {
        TravelUpdate {
            confirmed: Some(true),
            ..TravelUpdate::default()
        }
    }

    fn compensate(kg: f64) -> TravelUpdate {
        TravelUpdate {
            co2_compensated: Some(kg),
            ..TravelUpdate::default()
        }
    }

    #[tokio::test]
    async fn create_get_list() {
        let store = TravelStore::new();
        let a = store.create(ALICE, long_train(), vec![]).await.unwrap();
        let b = store
            .create(
                ALICE,
                vec![segment(1, Vehicle::Car, 100.0, 20.0)],
                vec![segment(1, Vehicle::Car, 100.0, 20.0)],
            )
            .await
            .unwrap();
        store.create(BOB, long_train(), vec![]).await.unwrap();

        assert_ne!(a.id(), b.id());
        assert_eq!(store.get(b.id()).await.unwrap(), b);
        assert!(b.is_round_trip());
        assert_eq!(store.list(ALICE).await.len(), 2);
        assert_eq!(store.list(BOB).await.len(), 1);
        assert_eq!(
            store.get(TravelId(99)).await,
            Err(StoreError::TravelNotFound(TravelId(99)))
        );
    }

    #[tokio::test]
    async fn empty_travel_rejected() {
        let store = TravelStore::new();
        assert_eq!(
            store.create(ALICE, vec![], vec![]).await,
            Err(StoreError::Domain(DomainError::EmptyItinerary))
        );
    }

    #[tokio::test]
    async fn confirmation_scores_long_bucket() {
        let store = TravelStore::new();
        let t = store.create(ALICE, long_train(), vec![]).await.unwrap();
        assert_eq!(store.score(ALICE).await, UserScore::default());

        store.update(t.id(), confirm()).await.unwrap();
        let score = store.score(ALICE).await;
        assert!(close(score.long_distance, 0.44 * 1000.0 / 35.0));
        assert_eq!(score.short_distance, 0.0);
    }

    #[tokio::test]
    async fn compensation_before_confirmation_counts_once_confirmed() {
        let store = TravelStore::new();
        let t = store.create(ALICE, long_train(), vec![]).await.unwrap();

        store.update(t.id(), compensate(10.0)).await.unwrap();
        assert_eq!(store.score(ALICE).await.total(), 0.0);

        store.update(t.id(), confirm()).await.unwrap();
        let expected = 0.44 * 1000.0 / 35.0 + 0.12 * 10.0;
        assert!(close(store.score(ALICE).await.total(), expected));
    }

    #[tokio::test]
    async fn full_offset_bonus_once() {
        let store = TravelStore::new();
        let t = store.create(ALICE, long_train(), vec![]).await.unwrap();
        store.update(t.id(), confirm()).await.unwrap();
        let confirmed = store.score(ALICE).await.total();

        store.update(t.id(), compensate(35.0)).await.unwrap();
        store.update(t.id(), compensate(35.0)).await.unwrap();
        let expected = confirmed + 0.12 * 35.0 + FULL_OFFSET_BONUS;
        assert!(close(store.score(ALICE).await.total(), expected));
    }

    #[tokio::test]
    async fn invalid_compensation_changes_nothing() {
        let store = TravelStore::new();
        let t = store.create(ALICE, long_train(), vec![]).await.unwrap();

        let err = store
            .update(
                t.id(),
                TravelUpdate {
                    co2_compensated: Some(50.0),
                    confirmed: Some(true),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(DomainError::InvalidCompensation { .. })
        ));

        let stored = store.get(t.id()).await.unwrap();
        assert!(!stored.is_confirmed());
        assert_eq!(stored.co2_compensated(), 0.0);
        assert_eq!(store.score(ALICE).await.total(), 0.0);
    }

    #[tokio::test]
    async fn delete_reverses_contribution() {
        let store = TravelStore::new();
        let kept = store
            .create(ALICE, vec![segment(1, Vehicle::Bus, 200.0, 6.0)], vec![])
            .await
            .unwrap();
        let t = store.create(ALICE, long_train(), vec![]).await.unwrap();
        store.update(kept.id(), confirm()).await.unwrap();
        let before = store.score(ALICE).await;

        store.update(t.id(), confirm()).await.unwrap();
        store.update(t.id(), compensate(35.0)).await.unwrap();
        store.delete(t.id()).await.unwrap();

        let after = store.score(ALICE).await;
        assert!(close(after.long_distance, before.long_distance));
        assert!(close(after.short_distance, before.short_distance));
        assert!(store.get(t.id()).await.is_err());
        assert_eq!(
            store.delete(t.id()).await,
            Err(StoreError::TravelNotFound(t.id()))
        );
    }

    #[tokio::test]
    async fn deleting_unconfirmed_travel_keeps_score() {
        let store = TravelStore::new();
        let t = store.create(ALICE, long_train(), vec![]).await.unwrap();
        store.delete(t.id()).await.unwrap();
        assert_eq!(store.score(ALICE).await, UserScore::default());
    }

    #[tokio::test]
    async fn zero_distance_travel_updates_without_score() {
        let store = TravelStore::new();
        let t = store
            .create(ALICE, vec![segment(1, Vehicle::Walk, 0.0, 0.0)], vec![])
            .await
            .unwrap();
        let updated = store.update(t.id(), confirm()).await.unwrap();
        assert!(updated.is_confirmed());
        assert_eq!(store.score(ALICE).await, UserScore::default());
    }

    #[tokio::test]
    async fn stats_and_badges_count_confirmed_only() {
        let store = TravelStore::new();
        for _ in 0..5 {
            let t = store
                .create(ALICE, vec![segment(1, Vehicle::Train, 700.0, 24.5)], vec![])
                .await
                .unwrap();
            store.update(t.id(), confirm()).await.unwrap();
        }
        store.create(ALICE, long_train(), vec![]).await.unwrap();

        let stats = store.stats(ALICE).await;
        assert_eq!(stats.travel_count, 5);
        assert!(close(stats.distance_km, 3500.0));
        assert!(close(stats.co2_emitted_kg, 122.5));

        let badges = store.badges(ALICE).await;
        assert!(badges.contains(&Badge {
            kind: BadgeKind::Distance,
            tier: Tier::Low
        }));
        assert!(badges.contains(&Badge {
            kind: BadgeKind::TravelCount,
            tier: Tier::Low
        }));
        // 3500 km / 122.5 kg is about 28.6 km/kg
        assert!(badges.contains(&Badge {
            kind: BadgeKind::EcoChoice,
            tier: Tier::Mid
        }));
        assert!(store.badges(BOB).await.is_empty());
    }

    #[tokio::test]
    async fn short_and_long_buckets_separate() {
        let store = TravelStore::new();
        let short = store
            .create(ALICE, vec![segment(1, Vehicle::Train, 800.0, 28.0)], vec![])
            .await
            .unwrap();
        store.update(short.id(), confirm()).await.unwrap();

        let score = store.score(ALICE).await;
        assert!(close(score.short_distance, 0.44 * 800.0 / 28.0));
        assert_eq!(score.long_distance, 0.0);
    }
}
