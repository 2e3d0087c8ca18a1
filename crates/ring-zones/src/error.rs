//! Error types for the zone window query.

use thiserror::Error;

/// Result type for zone query operations.
pub type Result<T> = std::result::Result<T, ZoneError>;

/// Errors that can occur while querying or building zone windows.
#[derive(Error, Debug)]
pub enum ZoneError {
    /// The underlying zone storage collaborator failed.
    #[error("zone storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A radius or width parameter was out of range.
    #[error("invalid window parameter: {0}")]
    InvalidWindow(String),
}
