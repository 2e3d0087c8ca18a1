//! # Ring Codec
//!
//! The quantized binary geometry format chunk meshes are streamed in:
//! a small fixed header, a relative-X-encoded vertex buffer, an index
//! buffer, all gzip-compressed as a single stream.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod format;
pub mod mesh;
pub mod quant;

pub use error::{CodecError, Result};
pub use format::{
    decode_chunk_geometry_header, decode_chunk_mesh, encode_chunk_mesh, ChunkGeometryHeader,
};
pub use mesh::{ChunkMesh, Vertex};
pub use quant::{dequantize, quantize, Q_X, Q_Y, Q_Z};
