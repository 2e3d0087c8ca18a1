//! Error types for connection authentication.

use thiserror::Error;

/// Result type for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors an [`crate::Authenticator`] can return.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No credential was present on the connection context.
    #[error("missing credential")]
    MissingCredential,

    /// The credential was present but invalid, expired, or malformed.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// The authenticator's own configuration is invalid (e.g. a secret
    /// too short to be used for signing).
    #[error("authenticator misconfigured: {0}")]
    Configuration(String),
}
