//! Binary entry point: load configuration, wire the storage/auth/
//! streaming collaborators together, and run the WebSocket accept loop.

use clap::Parser;
use ring_auth::{Authenticator, JwtAuthenticator, StaticAuthenticator};
use ring_config::RingServerConfig;
use ring_protocol::{ConnectionConfig, ServerConfig, StreamServer};
use ring_storage::{InMemoryChunkStore, InMemoryZoneStore, ProceduralChunkGenerator};
use ring_stream::StreamingManager;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Command-line overrides, applied on top of the loaded configuration.
/// Both are optional: with neither set, `ring-config`'s layered defaults
/// and environment variables are used unchanged.
#[derive(Parser)]
#[command(name = "ring-server", about = "Ring-world chunk/zone streaming server")]
struct Cli {
    /// Override the bind host from configuration.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port from configuration.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = RingServerConfig::load()?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!(
        host = %config.host,
        port = config.port,
        "loaded configuration"
    );

    let authenticator = build_authenticator(&config)?;

    // Only the in-memory backend is implemented today; `ring_config`
    // rejects any other `storage.backend` value before we get here.
    let chunk_store = Arc::new(InMemoryChunkStore::new());
    let chunk_generator = Arc::new(ProceduralChunkGenerator::new());
    let zone_source = Arc::new(InMemoryZoneStore::new());

    let streaming = Arc::new(StreamingManager::new(chunk_store, chunk_generator, zone_source));

    let addr = format!("{}:{}", config.host, config.port).parse()?;
    let server_config = ServerConfig {
        addr,
        max_connections: config.max_connections,
        connection: ConnectionConfig {
            ping_interval: Duration::from_secs(config.streaming.ping_interval_secs),
            pong_timeout: Duration::from_secs(config.streaming.pong_timeout_secs),
            outbound_queue_capacity: config.streaming.outbound_queue_capacity,
        },
    };

    let server = Arc::new(StreamServer::new(server_config, streaming, authenticator));
    server.run().await?;

    Ok(())
}

/// Build the connection authenticator named by `config.auth`. When auth
/// is disabled (local development only), every connection presenting
/// the fixed token `"dev-token"` is accepted as `"dev-user"` — there is
/// no way to disable authentication outright without a token, since
/// `ring_auth::Authenticator` always requires one.
fn build_authenticator(config: &RingServerConfig) -> anyhow::Result<Arc<dyn Authenticator>> {
    if config.auth.enabled {
        Ok(Arc::new(JwtAuthenticator::new(config.auth.jwt_secret.as_bytes())?))
    } else {
        tracing::warn!("authentication disabled; accepting only the fixed dev token");
        Ok(Arc::new(
            StaticAuthenticator::new().with_token("dev-token", "dev-user"),
        ))
    }
}
