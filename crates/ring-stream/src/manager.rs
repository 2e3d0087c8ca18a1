//! The streaming subscription manager: subscribe, pose updates,
//! unsubscribe, and connection teardown.

use crate::error::{Result, StreamError};
use crate::fill::{spawn_fill, ChunkFillEvent};
use crate::subscription::{compute_chunk_window, SubscriptionState, UserId};
use dashmap::DashMap;
use ring_core::{ChunkDelta, ChunkId, Pose, PoseRequest};
use ring_storage::{ChunkGenerator, ChunkStore};
use ring_zones::{zone_window_query, ZoneDelta, ZoneFeature, ZoneId, ZoneSource};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::info;
use uuid::Uuid;

/// Outcome of a successful `subscribe` call: the synchronous ack payload.
/// Chunk geometry for the window arrives later, nearest-first, on the
/// returned [`mpsc::UnboundedReceiver`].
pub struct SubscribeOutcome {
    /// Newly assigned subscription identifier.
    pub subscription_id: Uuid,
    /// The full initial chunk window.
    pub chunk_window: BTreeSet<ChunkId>,
    /// The full initial zone window, as an all-additions delta.
    pub zone_delta: ZoneDelta,
    /// Delta sequence number for this ack (starts at 1).
    pub sequence: u64,
}

/// Outcome of a successful `update_pose` call.
pub struct UpdateOutcome {
    /// Chunks added to / removed from the window by this move.
    pub chunk_delta: ChunkDelta,
    /// Zones added to / removed from the window by this move.
    pub zone_delta: ZoneDelta,
    /// Delta sequence number for this update.
    pub sequence: u64,
}

struct SubscriptionHandle {
    state: Arc<Mutex<SubscriptionState>>,
    fill_tx: mpsc::UnboundedSender<ChunkFillEvent>,
}

/// Owns every live subscription on this node and drives window
/// computation, delta computation, and nearest-first chunk fill.
pub struct StreamingManager {
    chunk_store: Arc<dyn ChunkStore>,
    chunk_generator: Arc<dyn ChunkGenerator>,
    zone_source: Arc<dyn ZoneSource + Send + Sync>,
    subscriptions: DashMap<Uuid, SubscriptionHandle>,
    by_user: DashMap<UserId, HashSet<Uuid>>,
}

impl StreamingManager {
    /// Construct a manager over the given storage/generation/zone
    /// collaborators.
    pub fn new(
        chunk_store: Arc<dyn ChunkStore>,
        chunk_generator: Arc<dyn ChunkGenerator>,
        zone_source: Arc<dyn ZoneSource + Send + Sync>,
    ) -> Self {
        Self {
            chunk_store,
            chunk_generator,
            zone_source,
            subscriptions: DashMap::new(),
            by_user: DashMap::new(),
        }
    }

    /// Number of live subscriptions, across all users.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Open a new subscription for `user_id` at `pose_request`, with the
    /// given window radius and width (both metres). Returns the
    /// synchronous ack payload and a receiver that will carry this
    /// subscription's chunk geometry as it is fetched or generated.
    pub async fn subscribe(
        &self,
        user_id: UserId,
        pose_request: &PoseRequest,
        radius_meters: f64,
        width_meters: f64,
    ) -> Result<(SubscribeOutcome, mpsc::UnboundedReceiver<ChunkFillEvent>)> {
        if radius_meters <= 0.0 || width_meters <= 0.0 {
            return Err(StreamError::InvalidWindow(
                "radius and width must be positive".to_string(),
            ));
        }

        let pose = Pose::from_request(pose_request)?;
        let chunk_window = compute_chunk_window(&pose, radius_meters);
        let zones = zone_window_query(
            self.zone_source.as_ref(),
            pose.floor,
            pose.s,
            pose.r,
            radius_meters,
            width_meters,
            &None,
        )?;

        let subscription_id = Uuid::new_v4();
        let mut state = SubscriptionState::new(
            user_id.clone(),
            subscription_id,
            pose,
            radius_meters,
            width_meters,
        );
        state.chunk_window = chunk_window.clone();
        state.zone_window = zones.iter().map(|z| z.id).collect();
        let sequence = state.next_sequence();
        let generation = state.generation();

        let (fill_tx, fill_rx) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(state));

        self.subscriptions.insert(
            subscription_id,
            SubscriptionHandle {
                state: state.clone(),
                fill_tx: fill_tx.clone(),
            },
        );
        self.by_user
            .entry(user_id.clone())
            .or_default()
            .insert(subscription_id);

        spawn_fill(
            self.chunk_store.clone(),
            self.chunk_generator.clone(),
            state,
            fill_tx,
            pose,
            chunk_window.iter().copied().collect(),
            generation,
        );

        info!(%subscription_id, %user_id, "subscription opened");

        Ok((
            SubscribeOutcome {
                subscription_id,
                chunk_window,
                zone_delta: ZoneDelta { added: zones, removed: Vec::new() },
                sequence,
            },
            fill_rx,
        ))
    }

    /// Apply a pose update to an existing subscription, recomputing its
    /// window and returning the chunk/zone deltas. Cancels and replaces
    /// any in-flight chunk fill from a prior window.
    pub async fn update_pose(
        &self,
        user_id: &str,
        subscription_id: Uuid,
        pose_request: &PoseRequest,
    ) -> Result<UpdateOutcome> {
        let (state, fill_tx) = self.get_owned_handle(user_id, subscription_id).await?;
        let pose = Pose::from_request(pose_request)?;

        let mut guard = state.lock().await;
        let new_chunk_window = compute_chunk_window(&pose, guard.radius_meters);
        let zones = zone_window_query(
            self.zone_source.as_ref(),
            pose.floor,
            pose.s,
            pose.r,
            guard.radius_meters,
            guard.width_meters,
            &None,
        )?;
        let new_zone_ids: HashSet<ZoneId> = zones.iter().map(|z| z.id).collect();

        let chunk_delta = ChunkDelta::between(&guard.chunk_window, &new_chunk_window);
        let removed_zone_ids: Vec<ZoneId> = guard
            .zone_window
            .iter()
            .filter(|id| !new_zone_ids.contains(id))
            .copied()
            .collect();
        let added_zones: Vec<ZoneFeature> = zones
            .into_iter()
            .filter(|z| !guard.zone_window.contains(&z.id))
            .collect();

        guard.pose = pose;
        guard.chunk_window = new_chunk_window;
        guard.zone_window = new_zone_ids.into_iter().collect();
        let sequence = guard.next_sequence();
        let generation = guard.bump_generation();
        let added_chunks: Vec<ChunkId> = chunk_delta.added.clone();
        drop(guard);

        spawn_fill(
            self.chunk_store.clone(),
            self.chunk_generator.clone(),
            state,
            fill_tx,
            pose,
            added_chunks,
            generation,
        );

        Ok(UpdateOutcome {
            chunk_delta,
            zone_delta: ZoneDelta { added: added_zones, removed: removed_zone_ids },
            sequence,
        })
    }

    /// Close a single subscription. Cancels any in-flight fill.
    pub async fn unsubscribe(&self, user_id: &str, subscription_id: Uuid) -> Result<()> {
        let (state, _fill_tx) = self.get_owned_handle(user_id, subscription_id).await?;
        state.lock().await.bump_generation();
        self.subscriptions.remove(&subscription_id);
        if let Some(mut set) = self.by_user.get_mut(user_id) {
            set.remove(&subscription_id);
        }
        info!(%subscription_id, %user_id, "subscription closed");
        Ok(())
    }

    /// Close every subscription owned by `user_id`, e.g. on connection
    /// drop.
    pub async fn drop_connection(&self, user_id: &str) {
        let Some((_, subscription_ids)) = self.by_user.remove(user_id) else {
            return;
        };
        for subscription_id in subscription_ids {
            if let Some((_, handle)) = self.subscriptions.remove(&subscription_id) {
                handle.state.lock().await.bump_generation();
            }
        }
        info!(%user_id, "dropped all subscriptions for connection");
    }

    /// Resolve a subscription's state and fill sender, checking that
    /// `user_id` owns it. Distinguishes "no such subscription" from
    /// "that subscription belongs to someone else".
    async fn get_owned_handle(
        &self,
        user_id: &str,
        subscription_id: Uuid,
    ) -> Result<(Arc<Mutex<SubscriptionState>>, mpsc::UnboundedSender<ChunkFillEvent>)> {
        let (state, fill_tx) = {
            let handle = self
                .subscriptions
                .get(&subscription_id)
                .ok_or(StreamError::SubscriptionNotFound(subscription_id))?;
            (handle.state.clone(), handle.fill_tx.clone())
        };

        if state.lock().await.user_id != user_id {
            return Err(StreamError::OwnershipViolation {
                subscription_id,
                caller: user_id.to_string(),
            });
        }

        Ok((state, fill_tx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ring_storage::{InMemoryChunkStore, InMemoryZoneStore, ProceduralChunkGenerator};

    fn manager() -> StreamingManager {
        StreamingManager::new(
            Arc::new(InMemoryChunkStore::new()),
            Arc::new(ProceduralChunkGenerator::new()),
            Arc::new(InMemoryZoneStore::new()),
        )
    }

    fn pose_request(s: f64) -> PoseRequest {
        PoseRequest {
            arc_length: Some(s),
            r: Some(0.0),
            z: 0.0,
            active_floor: 0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn subscribe_returns_a_centered_window_and_fills_chunks() {
        let mgr = manager();
        let (outcome, mut rx) = mgr
            .subscribe("user-1".to_string(), &pose_request(500.0), 2_500.0, 400.0)
            .await
            .unwrap();

        assert_eq!(outcome.chunk_window.len(), 7);
        assert_eq!(outcome.sequence, 1);

        let mut received = 0;
        while let Some(event) = rx.recv().await {
            assert!(outcome.chunk_window.contains(&event.chunk_id));
            received += 1;
            if received == outcome.chunk_window.len() {
                break;
            }
        }
        assert_eq!(received, outcome.chunk_window.len());
    }

    #[tokio::test]
    async fn update_pose_reports_added_and_removed_chunks() {
        let mgr = manager();
        let (outcome, _rx) = mgr
            .subscribe("user-1".to_string(), &pose_request(500.0), 1_000.0, 400.0)
            .await
            .unwrap();

        let update = mgr
            .update_pose("user-1", outcome.subscription_id, &pose_request(10_500.0))
            .await
            .unwrap();

        assert!(!update.chunk_delta.added.is_empty());
        assert!(!update.chunk_delta.removed.is_empty());
        assert_eq!(update.sequence, 2);
    }

    #[tokio::test]
    async fn update_pose_rejects_the_wrong_owner() {
        let mgr = manager();
        let (outcome, _rx) = mgr
            .subscribe("user-1".to_string(), &pose_request(500.0), 1_000.0, 400.0)
            .await
            .unwrap();

        let err = mgr
            .update_pose("someone-else", outcome.subscription_id, &pose_request(600.0))
            .await
            .unwrap_err();
        assert!(matches!(err, StreamError::OwnershipViolation { .. }));
    }

    #[tokio::test]
    async fn unsubscribe_removes_the_subscription() {
        let mgr = manager();
        let (outcome, _rx) = mgr
            .subscribe("user-1".to_string(), &pose_request(500.0), 1_000.0, 400.0)
            .await
            .unwrap();

        mgr.unsubscribe("user-1", outcome.subscription_id).await.unwrap();
        assert_eq!(mgr.subscription_count(), 0);

        let err = mgr
            .update_pose("user-1", outcome.subscription_id, &pose_request(600.0))
            .await
            .unwrap_err();
        assert!(matches!(err, StreamError::SubscriptionNotFound(_)));
    }

    #[tokio::test]
    async fn drop_connection_closes_every_subscription_for_a_user() {
        let mgr = manager();
        let (a, _rx_a) = mgr
            .subscribe("user-1".to_string(), &pose_request(500.0), 1_000.0, 400.0)
            .await
            .unwrap();
        let (b, _rx_b) = mgr
            .subscribe("user-1".to_string(), &pose_request(9_000.0), 1_000.0, 400.0)
            .await
            .unwrap();
        assert_eq!(mgr.subscription_count(), 2);

        mgr.drop_connection("user-1").await;
        assert_eq!(mgr.subscription_count(), 0);
        let _ = (a.subscription_id, b.subscription_id);
    }
}
