//! Chunk payload metadata and structure features.

use serde::{Deserialize, Serialize};

/// Metadata block carried alongside a chunk's compressed geometry:
/// a version number, a last-modified timestamp, the chunk's width, and
/// the procedural seed it was generated from, if any.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Monotonically increasing version number for this chunk's geometry.
    pub version: u32,
    /// Last modification timestamp, milliseconds since the Unix epoch.
    pub last_modified_ms: u64,
    /// Chunk width, metres. Usually `CHUNK_LENGTH`, but stations and other
    /// irregular chunks may report a different value.
    pub chunk_width_meters: f64,
    /// Procedural seed this chunk was generated from, if it was
    /// procedurally generated rather than authored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedural_seed: Option<u64>,
}

/// A structure feature: a built object whose position lies within a
/// chunk. Unlike zone features, structures are points, not polygons, and
/// carry no enumerated type — the source system's structure catalogue is
/// open-ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureFeature {
    /// Unique structure identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Structure type, as a free-form catalogue key (e.g. `"beacon"`,
    /// `"station-gate"`).
    pub structure_type: String,
    /// Floor this structure is defined on.
    pub floor: i32,
    /// Arc-length position, metres.
    pub s: f64,
    /// Radial offset, metres.
    pub r: f64,
    /// Vertical offset, metres.
    pub z: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_defaults_have_no_seed() {
        let metadata = ChunkMetadata::default();
        assert!(metadata.procedural_seed.is_none());
    }
}
