//! The chunk payload: what storage persists and the generator produces
//! for one chunk.

use ring_core::{ChunkId, ChunkMetadata, StructureFeature};
use ring_zones::ZoneFeature;

/// A chunk's full payload: identifier, compressed geometry, metadata,
/// and any zone/structure features embedded with it.
///
/// Zones and structures here are always empty in this workspace's
/// adapters — the streaming manager delivers them separately, as its own
/// zone window, rather than embedded per chunk. Both shapes are valid
/// per the wire contract; a consumer must accept either.
#[derive(Debug, Clone)]
pub struct ChunkPayload {
    /// The chunk this payload describes.
    pub id: ChunkId,
    /// Gzip-compressed `CHNK` wire bytes (see `ring-codec`).
    pub geometry: Vec<u8>,
    /// Version, timestamp, width, and seed metadata for this geometry.
    pub metadata: ChunkMetadata,
    /// Zone features embedded with this chunk, if any.
    pub zones: Vec<ZoneFeature>,
    /// Structure features embedded with this chunk, if any.
    pub structures: Vec<StructureFeature>,
}
