//! Errors produced while loading or validating server configuration.

use thiserror::Error;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors from loading or validating a [`crate::RingServerConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The `config` crate failed to build or deserialize the layered
    /// configuration.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A loaded configuration failed a semantic check (a value that
    /// deserializes fine but doesn't make sense, e.g. port 0).
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
