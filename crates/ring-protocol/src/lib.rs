//! # Ring Protocol
//!
//! The WebSocket wire protocol for ring-world chunk/zone streaming:
//! message framing, per-connection handshake authentication, a
//! single-writer bounded send loop with ping/pong keepalive, and
//! dispatch of inbound messages onto a `ring_stream::StreamingManager`.
//!
//! Wire message shapes live in [`messages`]; connection-level behaviour
//! lives in [`connection`]; the accept loop lives in [`server`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod connection;
pub mod error;
pub mod messages;
pub mod server;
pub mod testclient;

pub use connection::{handle_connection, ConnectionConfig};
pub use error::{ProtocolError, Result};
pub use messages::{ClientMessage, ServerMessage};
pub use server::{ServerConfig, StreamServer};
pub use testclient::TestClient;
