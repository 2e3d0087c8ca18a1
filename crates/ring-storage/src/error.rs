//! Error types for the storage collaborator contracts.

use thiserror::Error;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors a chunk or zone storage/generation collaborator can return.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing store is unreachable or returned an unexpected error.
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    /// Procedural generation failed for a requested chunk.
    #[error("generation failed for chunk {0}: {1}")]
    GenerationFailed(String, String),

    /// The codec rejected geometry produced by a generator.
    #[error("codec error: {0}")]
    Codec(#[from] ring_codec::CodecError),
}
