//! Per-subscription state and chunk/zone window computation.

use ring_core::{
    chunk_base_arc_length, chunk_index_from_ring_arc, constants, wrap_distance, ChunkId, Pose,
};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Identifies the user a subscription belongs to.
pub type UserId = String;

/// Tracks one connection's live view of the ring: its pose, window
/// radius/width, and the chunk/zone sets it was last sent.
pub struct SubscriptionState {
    /// Owning user.
    pub user_id: UserId,
    /// Subscription identifier.
    pub subscription_id: Uuid,
    /// Most recently accepted pose.
    pub pose: Pose,
    /// Window radius, metres.
    pub radius_meters: f64,
    /// Window width (radial), metres.
    pub width_meters: f64,
    /// Chunk identifiers most recently acknowledged to the client.
    pub chunk_window: BTreeSet<ChunkId>,
    /// Zone identifiers most recently acknowledged to the client.
    pub zone_window: BTreeSet<u64>,
    /// Monotonically increasing delta sequence number.
    pub sequence: u64,
    /// Bumped on every pose update/unsubscribe to cancel stale in-flight
    /// chunk fills started from a prior window.
    pub fill_generation: AtomicU64,
}

impl SubscriptionState {
    /// Construct fresh subscription state with an empty window; the
    /// caller is expected to compute and assign the initial window.
    pub fn new(
        user_id: UserId,
        subscription_id: Uuid,
        pose: Pose,
        radius_meters: f64,
        width_meters: f64,
    ) -> Self {
        Self {
            user_id,
            subscription_id,
            pose,
            radius_meters,
            width_meters,
            chunk_window: BTreeSet::new(),
            zone_window: BTreeSet::new(),
            sequence: 0,
            fill_generation: AtomicU64::new(0),
        }
    }

    /// Current fill generation, for a fill task to compare against when
    /// deciding whether it has been superseded.
    pub fn generation(&self) -> u64 {
        self.fill_generation.load(Ordering::SeqCst)
    }

    /// Bump the fill generation, invalidating any fill task spawned
    /// against an earlier value.
    pub fn bump_generation(&self) -> u64 {
        self.fill_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Next delta sequence number, incrementing the counter.
    pub fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }
}

/// Number of chunks either side of the subscriber's own chunk that fall
/// within `radius_meters`, rounded outward so the window never excludes a
/// chunk that partially overlaps the radius.
pub fn chunk_half_span(radius_meters: f64) -> u32 {
    (radius_meters / constants::CHUNK_LENGTH).ceil().max(0.0) as u32
}

/// Compute the wrap-aware set of chunk identifiers within `radius_meters`
/// of `pose`, on `pose.floor`.
pub fn compute_chunk_window(pose: &Pose, radius_meters: f64) -> BTreeSet<ChunkId> {
    let center_index = chunk_index_from_ring_arc(pose.s);
    let half_span = chunk_half_span(radius_meters) as i64;
    let chunks_per_floor = constants::CHUNKS_PER_FLOOR as i64;

    (-half_span..=half_span)
        .map(|offset| {
            let idx = (center_index as i64 + offset).rem_euclid(chunks_per_floor) as u32;
            ChunkId::new(pose.floor, idx)
        })
        .collect()
}

/// Order newly added chunks nearest-first by wrap-aware arc distance from
/// the subscriber's current position, so close chunks fill before far
/// ones.
pub fn nearest_first(pose: &Pose, mut chunks: Vec<ChunkId>) -> Vec<ChunkId> {
    chunks.sort_by(|a, b| {
        let da = wrap_distance(pose.s, chunk_base_arc_length(a.chunk_index));
        let db = wrap_distance(pose.s, chunk_base_arc_length(b.chunk_index));
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    });
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use ring_core::PoseRequest;

    fn pose_at(s: f64) -> Pose {
        Pose::from_request(&PoseRequest {
            arc_length: Some(s),
            r: Some(0.0),
            z: 0.0,
            active_floor: 0,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn chunk_window_has_odd_size_centered_on_pose() {
        let pose = pose_at(500.0);
        let window = compute_chunk_window(&pose, 2_500.0);
        // half_span = ceil(2500/1000) = 3, so 2*3+1 = 7 chunks.
        assert_eq!(window.len(), 7);
        assert!(window.contains(&ChunkId::new(0, 0)));
    }

    #[test]
    fn chunk_window_wraps_at_the_seam() {
        let pose = pose_at(5.0); // chunk_index 0, near s=0 seam
        let window = compute_chunk_window(&pose, 1_500.0);
        let max_index = constants::CHUNKS_PER_FLOOR - 1;
        assert!(window.contains(&ChunkId::new(0, max_index)));
        assert!(window.contains(&ChunkId::new(0, 0)));
        assert!(window.contains(&ChunkId::new(0, 1)));
    }
}
