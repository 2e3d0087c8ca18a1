//! Deterministic placeholder procedural chunk generation.

use crate::chunk_store::ChunkGenerator;
use crate::error::Result;
use crate::payload::ChunkPayload;
use async_trait::async_trait;
use ring_codec::{encode_chunk_mesh, ChunkMesh, Vertex};
use ring_core::{chunk_base_arc_length, constants, ChunkId, ChunkMetadata};

/// Generates a flat quad spanning one chunk's arc length and the ring's
/// width, at `z = 0`. Stands in for a real terrain/structure generator
/// until one is wired in; every call for the same [`ChunkId`] returns
/// byte-identical geometry.
#[derive(Debug, Default)]
pub struct ProceduralChunkGenerator;

impl ProceduralChunkGenerator {
    /// Construct a new generator.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChunkGenerator for ProceduralChunkGenerator {
    async fn generate(&self, id: ChunkId) -> Result<ChunkPayload> {
        let s0 = chunk_base_arc_length(id.chunk_index);
        let s1 = s0 + constants::CHUNK_LENGTH;
        let half_width = constants::RING_WIDTH / 2.0;
        let height = id.floor as f64 * constants::FLOOR_HEIGHT;

        let mesh = ChunkMesh {
            vertices: vec![
                Vertex { x: s0, y: height, z: -half_width },
                Vertex { x: s1, y: height, z: -half_width },
                Vertex { x: s1, y: height, z: half_width },
                Vertex { x: s0, y: height, z: half_width },
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        };

        let geometry = encode_chunk_mesh(&mesh)?;
        Ok(ChunkPayload {
            id,
            geometry,
            metadata: ChunkMetadata {
                version: 1,
                last_modified_ms: 0,
                chunk_width_meters: constants::CHUNK_LENGTH,
                procedural_seed: Some(id.chunk_index as u64),
            },
            zones: Vec::new(),
            structures: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn generation_is_deterministic() {
        let gen = ProceduralChunkGenerator::new();
        let id = ChunkId::new(2, 1000);
        let a = gen.generate(id).await.unwrap();
        let b = gen.generate(id).await.unwrap();
        assert_eq!(a.geometry, b.geometry);
        assert_eq!(a.metadata.procedural_seed, b.metadata.procedural_seed);
    }

    #[tokio::test]
    async fn generated_geometry_decodes() {
        let gen = ProceduralChunkGenerator::new();
        let id = ChunkId::new(0, 263_999);
        let payload = gen.generate(id).await.unwrap();
        let mesh = ring_codec::decode_chunk_mesh(&payload.geometry).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
        assert_eq!(payload.metadata.procedural_seed, Some(263_999));
        assert!(payload.zones.is_empty());
        assert!(payload.structures.is_empty());
    }
}
