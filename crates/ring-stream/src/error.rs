//! Error types for the streaming subscription manager.

use thiserror::Error;

/// Result type for streaming manager operations.
pub type Result<T> = std::result::Result<T, StreamError>;

/// Errors that can occur while managing streaming subscriptions.
#[derive(Error, Debug)]
pub enum StreamError {
    /// No subscription exists with the given identifier.
    #[error("subscription not found: {0}")]
    SubscriptionNotFound(uuid::Uuid),

    /// The caller does not own the subscription it tried to act on.
    #[error("user {caller} does not own subscription {subscription_id}")]
    OwnershipViolation {
        /// The subscription the caller attempted to act on.
        subscription_id: uuid::Uuid,
        /// The user that attempted the action.
        caller: String,
    },

    /// The requested window parameters (radius/width) were invalid.
    #[error("invalid window parameters: {0}")]
    InvalidWindow(String),

    /// The submitted pose was invalid.
    #[error("invalid pose: {0}")]
    InvalidPose(#[from] ring_core::CoreError),

    /// A zone window query failed.
    #[error("zone query failed: {0}")]
    ZoneQuery(#[from] ring_zones::ZoneError),

    /// Chunk storage or generation failed.
    #[error("chunk storage failed: {0}")]
    ChunkStorage(#[from] ring_storage::StorageError),
}
