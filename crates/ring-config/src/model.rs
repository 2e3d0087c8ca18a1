//! The configuration model: one struct per concern, mirroring how
//! `ring-server` wires collaborators together.

use serde::{Deserialize, Serialize};

/// Top-level server configuration, composed from defaults, an optional
/// config file, and environment variables (in that order of increasing
/// precedence).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingServerConfig {
    /// Interface to bind the WebSocket listener to.
    pub host: String,
    /// Port to bind the WebSocket listener to.
    pub port: u16,
    /// Maximum number of simultaneously open connections.
    pub max_connections: usize,
    /// Per-connection streaming tunables.
    pub streaming: StreamingConfig,
    /// Authentication tunables.
    pub auth: AuthConfig,
    /// Chunk/zone storage backend selection.
    pub storage: StorageConfig,
    /// Logging tunables.
    pub logging: LoggingConfig,
}

/// Keepalive and backpressure tunables for every connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingConfig {
    /// Seconds between WebSocket pings.
    pub ping_interval_secs: u64,
    /// Seconds without a pong before a connection is considered dead.
    pub pong_timeout_secs: u64,
    /// Capacity of each connection's outbound message queue.
    pub outbound_queue_capacity: usize,
}

/// Authentication tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Whether JWT authentication is enforced. When `false`, every
    /// connection is accepted under a fixed development user id — never
    /// set this in production.
    pub enabled: bool,
    /// HMAC secret used to validate HS256 JWTs. Must be at least 32
    /// bytes; see `ring_auth::JwtAuthenticator::new`.
    pub jwt_secret: String,
}

/// Chunk storage and generation backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend identifier. Only `"memory"` is implemented; present as a
    /// field so a persistent backend can be selected later without a
    /// breaking config change.
    pub backend: String,
}

/// Logging tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `"info"` or
    /// `"ring_protocol=debug,info"`.
    pub level: String,
}

impl Default for RingServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_connections: 10_000,
            streaming: StreamingConfig::default(),
            auth: AuthConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            ping_interval_secs: 30,
            pong_timeout_secs: 60,
            outbound_queue_capacity: 256,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            jwt_secret: "change-me-in-production-change-me".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = RingServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.streaming.outbound_queue_capacity, 256);
    }
}
