//! Chunk identifiers and chunk-level deltas.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A chunk identifier: a floor index plus a chunk index on that floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkId {
    /// Floor index. May be negative.
    pub floor: i32,
    /// Chunk index on that floor, in `[0, CHUNKS_PER_FLOOR)`.
    pub chunk_index: u32,
}

impl ChunkId {
    /// Construct a new chunk identifier.
    pub fn new(floor: i32, chunk_index: u32) -> Self {
        Self { floor, chunk_index }
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.floor, self.chunk_index)
    }
}

impl FromStr for ChunkId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (floor_str, index_str) = s
            .split_once('_')
            .ok_or_else(|| CoreError::MalformedChunkId(s.to_string()))?;
        let floor = floor_str
            .parse::<i32>()
            .map_err(|_| CoreError::MalformedChunkId(s.to_string()))?;
        let chunk_index = index_str
            .parse::<u32>()
            .map_err(|_| CoreError::MalformedChunkId(s.to_string()))?;
        Ok(ChunkId::new(floor, chunk_index))
    }
}

impl Serialize for ChunkId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChunkId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The set of chunk identifiers added and removed between two windows.
/// `added` and `removed` never intersect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkDelta {
    /// Chunk identifiers newly in the window.
    pub added: Vec<ChunkId>,
    /// Chunk identifiers no longer in the window.
    pub removed: Vec<ChunkId>,
}

impl ChunkDelta {
    /// Compute the delta between an old and a new chunk window.
    pub fn between(old: &BTreeSet<ChunkId>, new: &BTreeSet<ChunkId>) -> Self {
        let added = new.difference(old).copied().collect();
        let removed = old.difference(new).copied().collect();
        Self { added, removed }
    }

    /// True if this delta carries no changes.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_round_trip() {
        let id = ChunkId::new(0, 263_999);
        let s = id.to_string();
        assert_eq!(s, "0_263999");
        let parsed: ChunkId = s.parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn negative_floor_round_trips() {
        let id = ChunkId::new(-2, 5);
        let parsed: ChunkId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn malformed_id_rejected() {
        assert!("garbage".parse::<ChunkId>().is_err());
        assert!("1_not_a_number".parse::<ChunkId>().is_err());
    }

    #[test]
    fn delta_partitions_windows() {
        let old: BTreeSet<ChunkId> = [ChunkId::new(0, 1), ChunkId::new(0, 2)].into_iter().collect();
        let new: BTreeSet<ChunkId> = [ChunkId::new(0, 2), ChunkId::new(0, 3)].into_iter().collect();
        let delta = ChunkDelta::between(&old, &new);
        assert_eq!(delta.added, vec![ChunkId::new(0, 3)]);
        assert_eq!(delta.removed, vec![ChunkId::new(0, 1)]);

        let added: BTreeSet<_> = delta.added.iter().copied().collect();
        let removed: BTreeSet<_> = delta.removed.iter().copied().collect();
        assert!(added.is_disjoint(&removed));

        let mut reconstructed = old.clone();
        for id in &delta.removed {
            reconstructed.remove(id);
        }
        for id in &delta.added {
            reconstructed.insert(*id);
        }
        assert_eq!(reconstructed, new);
    }
}
