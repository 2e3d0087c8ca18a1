//! Error types for the WebSocket wire protocol layer.

use thiserror::Error;

/// Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors that can occur handling a streaming connection.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The underlying WebSocket connection failed.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// A frame's JSON payload did not match any known message shape.
    #[error("malformed message: {0}")]
    MalformedMessage(#[from] serde_json::Error),

    /// The connection failed authentication and was refused.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(#[from] ring_auth::AuthError),

    /// I/O error accepting or reading the connection.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
