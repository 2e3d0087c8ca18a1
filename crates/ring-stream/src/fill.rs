//! Nearest-first asynchronous chunk geometry fill.
//!
//! When a subscription's chunk window grows, the newly added chunks are
//! fetched (or generated, on a storage miss) and pushed to the
//! subscriber nearest-first, one at a time, so the chunks the client is
//! about to walk onto arrive before ones still far away. A fill task
//! checks the owning subscription's generation counter before every
//! fetch and stops silently if it has been superseded by a later pose
//! update or an unsubscribe.

use crate::subscription::{nearest_first, SubscriptionState};
use ring_core::{ChunkId, ChunkMetadata, Pose, StructureFeature};
use ring_storage::{ChunkGenerator, ChunkStore};
use ring_zones::ZoneFeature;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

/// One chunk's full payload, ready to be framed as an outbound
/// `stream_delta` by the protocol layer.
#[derive(Debug, Clone)]
pub struct ChunkFillEvent {
    /// The chunk this payload belongs to.
    pub chunk_id: ChunkId,
    /// Gzip-compressed `CHNK` wire bytes (see `ring-codec`).
    pub geometry: Vec<u8>,
    /// Version, timestamp, width, and seed metadata for this geometry.
    pub metadata: ChunkMetadata,
    /// Zone features embedded with this chunk, if any.
    pub zones: Vec<ZoneFeature>,
    /// Structure features embedded with this chunk, if any.
    pub structures: Vec<StructureFeature>,
}

/// Spawn the fill task for a batch of newly added chunks. Returns
/// immediately; delivery happens on the background task.
pub fn spawn_fill(
    chunk_store: Arc<dyn ChunkStore>,
    chunk_generator: Arc<dyn ChunkGenerator>,
    state: Arc<Mutex<SubscriptionState>>,
    fill_tx: mpsc::UnboundedSender<ChunkFillEvent>,
    pose: Pose,
    added: Vec<ChunkId>,
    generation_at_spawn: u64,
) {
    if added.is_empty() {
        return;
    }
    tokio::spawn(async move {
        let ordered = nearest_first(&pose, added);
        for chunk_id in ordered {
            {
                let guard = state.lock().await;
                if guard.generation() != generation_at_spawn {
                    debug!(
                        subscription_id = %guard.subscription_id,
                        "fill superseded, stopping before chunk {chunk_id}"
                    );
                    return;
                }
            }

            let payload = match chunk_store.get_chunk(chunk_id).await {
                Ok(Some(payload)) => payload,
                Ok(None) => match chunk_generator.generate(chunk_id).await {
                    Ok(payload) => {
                        if let Err(e) = chunk_store.put_chunk(payload.clone()).await {
                            warn!(%chunk_id, error = %e, "failed to cache generated chunk");
                        }
                        payload
                    }
                    Err(e) => {
                        warn!(%chunk_id, error = %e, "chunk generation failed, skipping");
                        continue;
                    }
                },
                Err(e) => {
                    warn!(%chunk_id, error = %e, "chunk store lookup failed, skipping");
                    continue;
                }
            };

            if fill_tx
                .send(ChunkFillEvent {
                    chunk_id,
                    geometry: payload.geometry,
                    metadata: payload.metadata,
                    zones: payload.zones,
                    structures: payload.structures,
                })
                .is_err()
            {
                // Receiver dropped: connection is gone.
                return;
            }
        }
    });
}
