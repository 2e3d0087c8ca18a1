//! Error types for the coordinate model.

use thiserror::Error;

/// Result type for coordinate model operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while working with ring coordinates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A coordinate component was NaN or infinite.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// A pose failed validation (non-finite component, bad floor).
    #[error("invalid pose: {0}")]
    InvalidPose(String),

    /// A chunk identifier string could not be parsed.
    #[error("malformed chunk identifier: {0}")]
    MalformedChunkId(String),
}

impl CoreError {
    /// The stable wire error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::InvalidCoordinate(_) => "InvalidCoordinate",
            CoreError::InvalidPose(_) => "InvalidPose",
            CoreError::MalformedChunkId(_) => "InvalidCoordinate",
        }
    }
}
