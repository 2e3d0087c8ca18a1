//! # Ring Core
//!
//! Coordinate model and domain value types for the ring-world streaming
//! core: the three interconvertible coordinate frames (ER0, RingPolar,
//! RingArc), chunk indexing, the wrap-aware metric, and the canonical
//! client pose.
//!
//! Every other crate in this workspace (`ring-codec`, `ring-zones`,
//! `ring-stream`, `ring-protocol`) depends on this crate and treats its
//! conversions as the single source of truth for "what does a coordinate
//! on the ring mean".

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunk;
pub mod constants;
pub mod error;
pub mod frames;
pub mod pose;
pub mod structure;

pub use chunk::{ChunkDelta, ChunkId};
pub use error::{CoreError, Result};
pub use frames::{
    chunk_base_arc_length, chunk_index_from_ring_arc, er0_from_ring_polar, normalize_s,
    ring_arc_from_legacy_x, ring_arc_from_polar, ring_polar_from_arc, ring_polar_from_er0,
    wrap_distance, Er0, RingArc, RingPolar,
};
pub use pose::{Pose, PoseRequest};
pub use structure::{ChunkMetadata, StructureFeature};
