//! # Ring Config
//!
//! Layered configuration for the ring-world streaming server: defaults,
//! an optional config file, then environment variables.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod loader;
pub mod model;

pub use error::{ConfigError, Result};
pub use model::{AuthConfig, LoggingConfig, RingServerConfig, StorageConfig, StreamingConfig};
