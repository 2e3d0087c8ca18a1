//! The WebSocket accept loop: binds a listener, enforces a connection
//! cap, and spawns [`handle_connection`] for each accepted socket.

use crate::connection::{handle_connection, ConnectionConfig};
use crate::error::Result;
use ring_auth::Authenticator;
use ring_stream::StreamingManager;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Server-wide tunables: where to bind, how many connections to allow,
/// and the per-connection keepalive/backpressure policy.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the listener to.
    pub addr: SocketAddr,
    /// Maximum number of simultaneously open connections.
    pub max_connections: usize,
    /// Per-connection keepalive and backpressure tunables.
    pub connection: ConnectionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".parse().unwrap(),
            max_connections: 10_000,
            connection: ConnectionConfig::default(),
        }
    }
}

/// The streaming WebSocket server: owns the listener and the shared
/// collaborators every connection dispatches into.
pub struct StreamServer {
    config: ServerConfig,
    streaming: Arc<StreamingManager>,
    authenticator: Arc<dyn Authenticator>,
    active_connections: Arc<AtomicUsize>,
}

impl StreamServer {
    /// Build a server over the given streaming manager and authenticator.
    pub fn new(
        config: ServerConfig,
        streaming: Arc<StreamingManager>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            config,
            streaming,
            authenticator,
            active_connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of connections currently accepted and being served.
    pub fn active_connections(&self) -> usize {
        self.active_connections.load(Ordering::Relaxed)
    }

    /// Bind the listener and accept connections until the process is
    /// terminated or the listener errors out.
    pub async fn run(self: Arc<Self>) -> Result<()> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        info!(addr = %self.config.addr, "ring-protocol server listening");

        loop {
            let (stream, addr) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                    continue;
                }
            };

            if self.active_connections() >= self.config.max_connections {
                warn!(%addr, "connection limit reached, rejecting");
                continue;
            }

            let streaming = self.streaming.clone();
            let authenticator = self.authenticator.clone();
            let connection_config = self.config.connection;
            let active_connections = self.active_connections.clone();

            active_connections.fetch_add(1, Ordering::Relaxed);
            tokio::spawn(async move {
                if let Err(e) =
                    handle_connection(stream, addr, streaming, authenticator, connection_config)
                        .await
                {
                    error!(%addr, error = %e, "connection terminated with error");
                }
                active_connections.fetch_sub(1, Ordering::Relaxed);
            });
        }
    }
}
