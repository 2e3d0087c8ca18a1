//! The `CHNK` wire format: a fixed 24-byte header, a quantized vertex
//! buffer, and an index buffer, gzip-compressed as a single stream.

use crate::error::{CodecError, Result};
use crate::mesh::{ChunkMesh, Vertex};
use crate::quant::{dequantize, quantize, Q_X, Q_Y, Q_Z};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};
use tracing::trace;

const MAGIC: &[u8; 4] = b"CHNK";
const FORMAT_VERSION: u8 = 1;
const HEADER_LEN: usize = 24;
const GZIP_LEVEL: u32 = 6;

/// Parsed header fields, exposed for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkGeometryHeader {
    /// Format version this stream was written with.
    pub version: u8,
    /// Reserved bit flags; zero in this build.
    pub format_flags: u8,
    /// Number of vertices in the vertex buffer.
    pub vertex_count: u16,
    /// Number of indices in the index buffer.
    pub index_count: u16,
    /// Quantized X offset shared by every vertex in this chunk, in units
    /// of [`crate::quant::Q_X`].
    pub base_x_quant: i64,
}

/// Gzip-compress a [`ChunkMesh`] into the `CHNK` wire format.
pub fn encode_chunk_mesh(mesh: &ChunkMesh) -> Result<Vec<u8>> {
    if mesh.vertices.len() > ChunkMesh::MAX_VERTICES {
        return Err(CodecError::LimitExceeded(format!(
            "{} vertices exceeds the {} vertex limit",
            mesh.vertices.len(),
            ChunkMesh::MAX_VERTICES
        )));
    }
    if mesh.indices.len() > ChunkMesh::MAX_INDICES {
        return Err(CodecError::LimitExceeded(format!(
            "{} indices exceeds the {} index limit",
            mesh.indices.len(),
            ChunkMesh::MAX_INDICES
        )));
    }

    let base_x_quant = mesh
        .vertices
        .first()
        .map(|v| quantize(v.x, Q_X))
        .unwrap_or(0);

    let mut raw = Vec::with_capacity(HEADER_LEN + mesh.vertices.len() * 12 + mesh.indices.len() * 2);
    raw.extend_from_slice(MAGIC);
    raw.push(FORMAT_VERSION);
    raw.push(0); // format_flags
    raw.extend_from_slice(&(mesh.vertices.len() as u16).to_le_bytes());
    raw.extend_from_slice(&(mesh.indices.len() as u16).to_le_bytes());
    raw.extend_from_slice(&base_x_quant.to_le_bytes());
    raw.extend_from_slice(&[0u8; 6]); // reserved

    for vertex in &mesh.vertices {
        let x_quant = quantize(vertex.x, Q_X);
        let x_rel = x_quant - base_x_quant;
        let x_rel = i32::try_from(x_rel).map_err(|_| CodecError::VertexOverflow)?;
        let y_quant = i32::try_from(quantize(vertex.y, Q_Y)).map_err(|_| CodecError::VertexOverflow)?;
        let z_quant = i32::try_from(quantize(vertex.z, Q_Z)).map_err(|_| CodecError::VertexOverflow)?;
        raw.extend_from_slice(&x_rel.to_le_bytes());
        raw.extend_from_slice(&y_quant.to_le_bytes());
        raw.extend_from_slice(&z_quant.to_le_bytes());
    }

    for &index in &mesh.indices {
        raw.extend_from_slice(&index.to_le_bytes());
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(GZIP_LEVEL));
    encoder.write_all(&raw)?;
    let compressed = encoder.finish()?;
    trace!(
        raw_len = raw.len(),
        compressed_len = compressed.len(),
        "encoded chunk geometry"
    );
    Ok(compressed)
}

/// Decompress a `CHNK` wire stream and parse just its header, without
/// materializing the vertex or index buffers. Used for diagnostics and
/// tests that only care about the quantization base.
pub fn decode_chunk_geometry_header(bytes: &[u8]) -> Result<ChunkGeometryHeader> {
    let mut decoder = GzDecoder::new(bytes);
    let mut raw = Vec::new();
    decoder.read_to_end(&mut raw)?;
    parse_header(&raw)
}

fn parse_header(raw: &[u8]) -> Result<ChunkGeometryHeader> {
    if raw.len() < HEADER_LEN {
        return Err(CodecError::CorruptedStream(format!(
            "stream of {} bytes shorter than {}-byte header",
            raw.len(),
            HEADER_LEN
        )));
    }

    if &raw[0..4] != MAGIC {
        return Err(CodecError::BadMagic);
    }

    let version = raw[4];
    if version != FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }

    let format_flags = raw[5];
    let vertex_count = u16::from_le_bytes([raw[6], raw[7]]);
    let index_count = u16::from_le_bytes([raw[8], raw[9]]);
    let base_x_quant = i64::from_le_bytes(raw[10..18].try_into().unwrap());

    Ok(ChunkGeometryHeader {
        version,
        format_flags,
        vertex_count,
        index_count,
        base_x_quant,
    })
}

/// Decompress and parse a `CHNK` wire stream back into a [`ChunkMesh`].
pub fn decode_chunk_mesh(bytes: &[u8]) -> Result<ChunkMesh> {
    let mut decoder = GzDecoder::new(bytes);
    let mut raw = Vec::new();
    decoder.read_to_end(&mut raw)?;
    let header = parse_header(&raw)?;

    let vertices_start = HEADER_LEN;
    let vertices_len = vertex_count as usize * 12;
    let indices_start = vertices_start + vertices_len;
    let indices_len = index_count as usize * 2;
    let end = indices_start + indices_len;

    if raw.len() < end {
        return Err(CodecError::CorruptedStream(format!(
            "stream of {} bytes too short for declared {} vertices and {} indices",
            raw.len(),
            vertex_count,
            index_count
        )));
    }

    let mut vertices = Vec::with_capacity(vertex_count as usize);
    for i in 0..vertex_count as usize {
        let off = vertices_start + i * 12;
        let x_rel = i32::from_le_bytes(raw[off..off + 4].try_into().unwrap());
        let y_quant = i32::from_le_bytes(raw[off + 4..off + 8].try_into().unwrap());
        let z_quant = i32::from_le_bytes(raw[off + 8..off + 12].try_into().unwrap());
        let x_quant = header.base_x_quant + x_rel as i64;
        vertices.push(Vertex {
            x: dequantize(x_quant, Q_X),
            y: dequantize(y_quant as i64, Q_Y),
            z: dequantize(z_quant as i64, Q_Z),
        });
    }

    let mut indices = Vec::with_capacity(index_count as usize);
    for i in 0..index_count as usize {
        let off = indices_start + i * 2;
        indices.push(u16::from_le_bytes([raw[off], raw[off + 1]]));
    }

    Ok(ChunkMesh { vertices, indices })
}
