//! Chunk geometry storage and procedural generation collaborator
//! contracts, plus an in-memory reference implementation of each.

use crate::error::Result;
use crate::payload::ChunkPayload;
use async_trait::async_trait;
use dashmap::DashMap;
use ring_core::ChunkId;

/// Collaborator contract for chunk geometry storage. Implementations
/// store and retrieve full chunk payloads, keyed by [`ChunkId`].
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Fetch the stored payload for `id`, if any.
    async fn get_chunk(&self, id: ChunkId) -> Result<Option<ChunkPayload>>;

    /// Persist a payload, overwriting any prior value for its identifier.
    async fn put_chunk(&self, payload: ChunkPayload) -> Result<()>;
}

/// Collaborator contract for procedural chunk generation, invoked when a
/// requested chunk is not yet present in storage.
#[async_trait]
pub trait ChunkGenerator: Send + Sync {
    /// Deterministically generate the full payload for `id`.
    async fn generate(&self, id: ChunkId) -> Result<ChunkPayload>;
}

/// A `DashMap`-backed [`ChunkStore`] suitable for tests and for running a
/// single streaming node without a persistent backend.
#[derive(Debug, Default)]
pub struct InMemoryChunkStore {
    chunks: DashMap<ChunkId, ChunkPayload>,
}

impl InMemoryChunkStore {
    /// Construct an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chunks currently cached.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True if no chunks are cached.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[async_trait]
impl ChunkStore for InMemoryChunkStore {
    async fn get_chunk(&self, id: ChunkId) -> Result<Option<ChunkPayload>> {
        Ok(self.chunks.get(&id).map(|entry| entry.value().clone()))
    }

    async fn put_chunk(&self, payload: ChunkPayload) -> Result<()> {
        self.chunks.insert(payload.id, payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ring_core::ChunkMetadata;

    fn payload(id: ChunkId, geometry: Vec<u8>) -> ChunkPayload {
        ChunkPayload {
            id,
            geometry,
            metadata: ChunkMetadata::default(),
            zones: Vec::new(),
            structures: Vec::new(),
        }
    }

    #[tokio::test]
    async fn stores_and_retrieves_a_chunk() {
        let store = InMemoryChunkStore::new();
        let id = ChunkId::new(0, 42);
        assert!(store.get_chunk(id).await.unwrap().is_none());

        store.put_chunk(payload(id, vec![1, 2, 3])).await.unwrap();
        assert_eq!(
            store.get_chunk(id).await.unwrap().map(|p| p.geometry),
            Some(vec![1, 2, 3])
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn overwrites_existing_chunk() {
        let store = InMemoryChunkStore::new();
        let id = ChunkId::new(0, 42);
        store.put_chunk(payload(id, vec![1])).await.unwrap();
        store.put_chunk(payload(id, vec![2])).await.unwrap();
        assert_eq!(
            store.get_chunk(id).await.unwrap().map(|p| p.geometry),
            Some(vec![2])
        );
    }
}
