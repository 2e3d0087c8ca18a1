//! # Ring Storage
//!
//! Collaborator contracts for chunk geometry storage, procedural chunk
//! generation, and zone storage, plus `DashMap`-backed in-memory
//! implementations of each suitable for tests and single-node
//! deployments.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunk_store;
pub mod error;
pub mod generator;
pub mod payload;
pub mod zone_store;

pub use chunk_store::{ChunkGenerator, ChunkStore, InMemoryChunkStore};
pub use error::{Result, StorageError};
pub use generator::ProceduralChunkGenerator;
pub use payload::ChunkPayload;
pub use zone_store::InMemoryZoneStore;
