//! Per-connection WebSocket handling: handshake authentication, a
//! single-writer bounded send loop, ping/pong keepalive, and dispatch
//! of inbound streaming messages onto a [`StreamingManager`].

use crate::error::{ProtocolError, Result};
use crate::messages::{
    AddedChunk, ClientMessage, ErrorMessage, ServerMessage, StreamAckMessage, StreamDeltaMessage,
    StreamPoseAckMessage,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use ring_auth::{Authenticator, ConnectionContext};
use ring_core::ChunkDelta;
use ring_stream::StreamingManager;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{interval, Instant};
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};
use tokio_tungstenite::tungstenite::protocol::Message;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Tunables for a single connection's keepalive and backpressure policy.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionConfig {
    /// How often to send a WebSocket ping.
    pub ping_interval: Duration,
    /// How long without a pong before the connection is considered dead.
    pub pong_timeout: Duration,
    /// Capacity of the per-connection outbound queue. Once full, further
    /// sends block (for the fill forwarder) or are dropped (for pings),
    /// applying backpressure to a slow client instead of buffering
    /// unboundedly.
    pub outbound_queue_capacity: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            ping_interval: Duration::from_secs(30),
            pong_timeout: Duration::from_secs(60),
            outbound_queue_capacity: 256,
        }
    }
}

/// Accept and drive one WebSocket connection to completion. Returns once
/// the socket closes or a fatal protocol error occurs; all subscriptions
/// opened on this connection are closed on return.
pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    streaming: Arc<StreamingManager>,
    authenticator: Arc<dyn Authenticator>,
    config: ConnectionConfig,
) -> Result<()> {
    let captured_token: Arc<parking_lot::Mutex<Option<String>>> = Arc::new(parking_lot::Mutex::new(None));
    let captured_token_cb = captured_token.clone();
    let ws_stream = tokio_tungstenite::accept_hdr_async(
        stream,
        move |req: &Request, resp: Response| {
            if let Some(token) = extract_token(req.uri().query()) {
                *captured_token_cb.lock() = Some(token);
            }
            Ok(resp)
        },
    )
    .await?;

    let token = captured_token.lock().clone();
    let user_id = authenticator
        .authenticate(&ConnectionContext {
            token,
            remote_addr: Some(addr.to_string()),
        })
        .await
        .map_err(ProtocolError::AuthenticationFailed)?;

    info!(%user_id, %addr, "connection authenticated");

    let (mut ws_tx, mut ws_rx) = ws_stream.split();
    let (tx, mut rx) = mpsc::channel::<Message>(config.outbound_queue_capacity);

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_tx.send(msg).await.is_err() {
                break;
            }
        }
    });

    let last_pong = Arc::new(parking_lot::Mutex::new(Instant::now()));
    let ping_task = {
        let tx = tx.clone();
        let last_pong = last_pong.clone();
        let ping_interval = config.ping_interval;
        let pong_timeout = config.pong_timeout;
        tokio::spawn(async move {
            let mut ticker = interval(ping_interval);
            loop {
                ticker.tick().await;
                if last_pong.lock().elapsed() > pong_timeout {
                    warn!("connection ping timeout, closing");
                    break;
                }
                if tx.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }
        })
    };

    // Tracks the sequence number of each subscription's most recent
    // window change, so chunk fill events arriving asynchronously (after
    // the fill task has already confirmed they belong to the current
    // generation) are stamped with the right sequence.
    let sequences: Arc<DashMap<Uuid, Arc<AtomicU64>>> = Arc::new(DashMap::new());

    while let Some(frame) = ws_rx.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                if let Err(e) = dispatch(
                    &text,
                    &user_id,
                    &streaming,
                    &sequences,
                    &tx,
                )
                .await
                {
                    debug!(error = %e, "error dispatching client message");
                }
            }
            Ok(Message::Ping(data)) => {
                let _ = tx.send(Message::Pong(data)).await;
            }
            Ok(Message::Pong(_)) => {
                *last_pong.lock() = Instant::now();
            }
            Ok(Message::Close(_)) => {
                info!(%user_id, "client closed connection");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                error!(%user_id, error = %e, "WebSocket read error");
                break;
            }
        }
    }

    send_task.abort();
    ping_task.abort();
    streaming.drop_connection(&user_id).await;
    info!(%user_id, "connection closed, subscriptions dropped");

    Ok(())
}

async fn dispatch(
    text: &str,
    user_id: &str,
    streaming: &Arc<StreamingManager>,
    sequences: &Arc<DashMap<Uuid, Arc<AtomicU64>>>,
    tx: &mpsc::Sender<Message>,
) -> Result<()> {
    let message: ClientMessage = serde_json::from_str(text)?;

    match message {
        ClientMessage::StreamSubscribe(req) => {
            match streaming
                .subscribe(user_id.to_string(), &req.pose, req.radius_meters, req.width_meters)
                .await
            {
                Ok((outcome, fill_rx)) => {
                    let sequence = Arc::new(AtomicU64::new(outcome.sequence));
                    sequences.insert(outcome.subscription_id, sequence.clone());

                    send(
                        tx,
                        ServerMessage::StreamAck(StreamAckMessage {
                            subscription_id: outcome.subscription_id,
                            chunk_delta: ChunkDelta {
                                added: outcome.chunk_window.into_iter().collect(),
                                removed: Vec::new(),
                            },
                            zone_delta: outcome.zone_delta,
                            sequence: outcome.sequence,
                        }),
                    )
                    .await;

                    spawn_fill_forwarder(outcome.subscription_id, sequence, fill_rx, tx.clone());
                }
                Err(e) => send_error(tx, &e.to_string(), error_code(&e), None).await,
            }
        }
        ClientMessage::StreamUpdatePose(req) => {
            match streaming
                .update_pose(user_id, req.subscription_id, &req.pose)
                .await
            {
                Ok(outcome) => {
                    if let Some(sequence) = sequences.get(&req.subscription_id) {
                        sequence.store(outcome.sequence, Ordering::SeqCst);
                    }

                    send(
                        tx,
                        ServerMessage::StreamPoseAck(StreamPoseAckMessage {
                            subscription_id: req.subscription_id,
                            chunk_delta: outcome.chunk_delta,
                            sequence: outcome.sequence,
                        }),
                    )
                    .await;

                    if !outcome.zone_delta.is_empty() {
                        send(
                            tx,
                            ServerMessage::StreamDelta(StreamDeltaMessage {
                                subscription_id: req.subscription_id,
                                sequence: outcome.sequence,
                                added_chunks: Vec::new(),
                                removed_chunks: Vec::new(),
                                zone_delta: outcome.zone_delta,
                            }),
                        )
                        .await;
                    }
                }
                Err(e) => {
                    send_error(tx, &e.to_string(), error_code(&e), Some(req.subscription_id)).await
                }
            }
        }
        ClientMessage::StreamUnsubscribe(req) => {
            match streaming.unsubscribe(user_id, req.subscription_id).await {
                Ok(()) => {
                    sequences.remove(&req.subscription_id);
                }
                Err(e) => {
                    send_error(tx, &e.to_string(), error_code(&e), Some(req.subscription_id)).await
                }
            }
        }
    }

    Ok(())
}

fn spawn_fill_forwarder(
    subscription_id: Uuid,
    sequence: Arc<AtomicU64>,
    mut fill_rx: mpsc::UnboundedReceiver<ring_stream::ChunkFillEvent>,
    tx: mpsc::Sender<Message>,
) {
    tokio::spawn(async move {
        while let Some(event) = fill_rx.recv().await {
            let delta = ServerMessage::StreamDelta(StreamDeltaMessage {
                subscription_id,
                sequence: sequence.load(Ordering::SeqCst),
                added_chunks: vec![AddedChunk {
                    chunk_id: event.chunk_id,
                    geometry_base64: BASE64.encode(event.geometry),
                    metadata: event.metadata,
                    zones: event.zones,
                    structures: event.structures,
                }],
                removed_chunks: Vec::new(),
                zone_delta: Default::default(),
            });
            if send(&tx, delta).await.is_err() {
                break;
            }
        }
    });
}

async fn send(tx: &mpsc::Sender<Message>, message: ServerMessage) -> std::result::Result<(), ()> {
    let json = match serde_json::to_string(&message) {
        Ok(json) => json,
        Err(e) => {
            error!(error = %e, "failed to serialize outbound message");
            return Err(());
        }
    };
    tx.send(Message::Text(json)).await.map_err(|_| ())
}

async fn send_error(
    tx: &mpsc::Sender<Message>,
    message: &str,
    code: &'static str,
    subscription_id: Option<Uuid>,
) {
    let _ = send(
        tx,
        ServerMessage::Error(ErrorMessage {
            code: code.to_string(),
            message: message.to_string(),
            subscription_id,
        }),
    )
    .await;
}

fn error_code(err: &ring_stream::StreamError) -> &'static str {
    match err {
        ring_stream::StreamError::SubscriptionNotFound(_) => "SubscriptionNotFound",
        ring_stream::StreamError::OwnershipViolation { .. } => "OwnershipViolation",
        ring_stream::StreamError::InvalidWindow(_) => "InvalidWindow",
        ring_stream::StreamError::InvalidPose(_) => "InvalidPose",
        ring_stream::StreamError::ZoneQuery(_) => "ZoneQueryFailed",
        ring_stream::StreamError::ChunkStorage(_) => "ChunkStorageFailed",
    }
}

fn extract_token(query: Option<&str>) -> Option<String> {
    query?.split('&').find_map(|pair| {
        pair.strip_prefix("token=")
            .map(|v| v.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_token_from_query_string() {
        assert_eq!(
            extract_token(Some("token=abc&other=1")),
            Some("abc".to_string())
        );
        assert_eq!(extract_token(Some("other=1")), None);
        assert_eq!(extract_token(None), None);
    }
}
