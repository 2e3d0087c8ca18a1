//! Layered loading: defaults, an optional config file, then environment
//! variables, each source overriding the last.

use crate::error::{ConfigError, Result};
use crate::model::RingServerConfig;

/// Environment variable prefix. `RING_WORLD__STREAMING__PING_INTERVAL_SECS`
/// overrides `streaming.ping_interval_secs`, for example.
const ENV_PREFIX: &str = "RING_WORLD";

impl RingServerConfig {
    /// Load configuration from `.env` (if present), `config/ring-server.*`
    /// (if present), and environment variables, in ascending precedence,
    /// then validate the result.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&RingServerConfig::default())?)
            .add_source(config::File::with_name("config/ring-server").required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: RingServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check that a fully-loaded configuration is internally consistent.
    /// This catches values that deserialize fine but make no sense (port
    /// 0, an empty queue, an under-length JWT secret) before they reach
    /// the server.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be nonzero".to_string()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "max_connections must be positive".to_string(),
            ));
        }
        if self.streaming.outbound_queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "streaming.outbound_queue_capacity must be positive".to_string(),
            ));
        }
        if self.streaming.ping_interval_secs >= self.streaming.pong_timeout_secs {
            return Err(ConfigError::Invalid(
                "streaming.ping_interval_secs must be less than pong_timeout_secs".to_string(),
            ));
        }
        if self.auth.enabled && self.auth.jwt_secret.len() < 32 {
            return Err(ConfigError::Invalid(
                "auth.jwt_secret must be at least 32 bytes when auth is enabled".to_string(),
            ));
        }
        if self.auth.enabled && self.auth.jwt_secret == "change-me-in-production-change-me" {
            tracing::warn!("using the default JWT secret; set RING_WORLD__AUTH__JWT_SECRET");
        }
        if self.storage.backend != "memory" {
            return Err(ConfigError::Invalid(format!(
                "unknown storage backend {:?}; only \"memory\" is implemented",
                self.storage.backend
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_validates() {
        assert!(RingServerConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_a_zero_port() {
        let mut config = RingServerConfig::default();
        config.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_a_short_jwt_secret() {
        let mut config = RingServerConfig::default();
        config.auth.jwt_secret = "too-short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_a_ping_interval_not_shorter_than_the_pong_timeout() {
        let mut config = RingServerConfig::default();
        config.streaming.ping_interval_secs = 60;
        config.streaming.pong_timeout_secs = 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_an_unknown_storage_backend() {
        let mut config = RingServerConfig::default();
        config.storage.backend = "redis".to_string();
        assert!(config.validate().is_err());
    }
}
