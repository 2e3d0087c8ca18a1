//! A minimal WebSocket client for exercising a running [`StreamServer`]
//! in integration tests. Deliberately bare: no reconnection, no
//! backoff — a real client's concerns belong in its own crate.

use crate::error::Result;
use crate::messages::{ClientMessage, ServerMessage};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// A single test connection to a streaming server.
pub struct TestClient {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    /// Connect to `url` (e.g. `ws://127.0.0.1:8080/?token=...`).
    pub async fn connect(url: &str) -> Result<Self> {
        let (socket, _response) = connect_async(url).await?;
        Ok(Self { socket })
    }

    /// Send one client message as a JSON text frame.
    pub async fn send(&mut self, message: &ClientMessage) -> Result<()> {
        let json = serde_json::to_string(message)?;
        self.socket.send(Message::Text(json)).await?;
        Ok(())
    }

    /// Wait for the next server message, skipping ping/pong/close frames.
    pub async fn recv(&mut self) -> Option<Result<ServerMessage>> {
        loop {
            match self.socket.next().await? {
                Ok(Message::Text(text)) => {
                    return Some(serde_json::from_str(&text).map_err(Into::into));
                }
                Ok(Message::Close(_)) => return None,
                Ok(_) => continue,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
