//! Error types for the chunk geometry codec.

use thiserror::Error;

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors that can occur while encoding or decoding chunk geometry.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The stream did not start with the `CHNK` magic bytes.
    #[error("bad magic bytes: expected CHNK")]
    BadMagic,

    /// The format version in the header is not supported by this build.
    #[error("unsupported format version: {0}")]
    UnsupportedVersion(u8),

    /// A vertex's relative-X offset from `base_x_quant` does not fit in 32
    /// bits, i.e. the mesh spans more than the encoder can represent.
    #[error("vertex x offset overflows 32 bits relative to chunk base")]
    VertexOverflow,

    /// A mesh exceeded the encoder's declared vertex or index limits.
    #[error("mesh exceeds encoder limits: {0}")]
    LimitExceeded(String),

    /// The gzip stream or header could not be parsed.
    #[error("corrupted geometry stream: {0}")]
    CorruptedStream(String),

    /// Gzip (de)compression failed.
    #[error("gzip I/O error: {0}")]
    Io(#[from] std::io::Error),
}
