//! The streaming wire message taxonomy: three inbound message kinds and
//! four outbound kinds, all framed as tagged JSON.

use ring_core::{ChunkDelta, ChunkId, ChunkMetadata, PoseRequest, StructureFeature};
use ring_zones::{ZoneDelta, ZoneFeature};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client-to-server streaming messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Open a new subscription centred on a pose, with a window radius
    /// and width.
    StreamSubscribe(SubscribeRequest),
    /// Move an existing subscription's pose, recomputing its window.
    StreamUpdatePose(UpdatePoseRequest),
    /// Close an existing subscription.
    StreamUnsubscribe(UnsubscribeRequest),
}

/// Payload of a `stream_subscribe` message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeRequest {
    /// Initial pose.
    pub pose: PoseRequest,
    /// Window radius, metres.
    pub radius_meters: f64,
    /// Window width (radial extent), metres.
    pub width_meters: f64,
}

/// Payload of a `stream_update_pose` message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePoseRequest {
    /// Subscription to move.
    pub subscription_id: Uuid,
    /// New pose.
    pub pose: PoseRequest,
}

/// Payload of a `stream_unsubscribe` message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsubscribeRequest {
    /// Subscription to close.
    pub subscription_id: Uuid,
}

/// Server-to-client streaming messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Synchronous acknowledgement of a `stream_subscribe`: the full
    /// initial chunk window as an all-additions delta (identifiers only —
    /// geometry follows asynchronously via `stream_delta`) and the full
    /// initial zone window.
    StreamAck(StreamAckMessage),
    /// Synchronous acknowledgement of a `stream_update_pose`: the chunk
    /// identifier delta (added/removed) for this move. Bodies for added
    /// chunks follow as one or more `stream_delta` messages.
    StreamPoseAck(StreamPoseAckMessage),
    /// An incremental change to a subscription's chunk or zone window.
    /// Sent once immediately after a pose update (carrying removed
    /// chunks and the zone delta) and again, nearest-first, once per
    /// newly added chunk as its geometry becomes available.
    StreamDelta(StreamDeltaMessage),
    /// A request could not be honoured.
    Error(ErrorMessage),
}

/// A single added chunk, with its encoded geometry and metadata ready to
/// render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddedChunk {
    /// The chunk this payload belongs to.
    pub chunk_id: ChunkId,
    /// Base64-encoded `ring-codec` `CHNK` wire bytes.
    pub geometry_base64: String,
    /// Version, timestamp, width, and seed metadata for this geometry.
    pub metadata: ChunkMetadata,
    /// Zone features embedded with this chunk, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub zones: Vec<ZoneFeature>,
    /// Structure features embedded with this chunk, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub structures: Vec<StructureFeature>,
}

/// Payload of a `stream_ack` message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamAckMessage {
    /// The subscription this ack confirms.
    pub subscription_id: Uuid,
    /// The initial chunk window, as an all-additions delta (identifiers
    /// only — geometry arrives later via `stream_delta`).
    pub chunk_delta: ChunkDelta,
    /// The full initial zone window.
    pub zone_delta: ZoneDelta,
    /// Delta sequence number (starts at 1).
    pub sequence: u64,
}

/// Payload of a `stream_pose_ack` message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamPoseAckMessage {
    /// The subscription whose pose was updated.
    pub subscription_id: Uuid,
    /// Chunk identifiers added to and removed from the window by this
    /// move. Bodies for added identifiers arrive later via `stream_delta`.
    pub chunk_delta: ChunkDelta,
    /// Delta sequence number for this move.
    pub sequence: u64,
}

/// Payload of a `stream_delta` message.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StreamDeltaMessage {
    /// The subscription this delta belongs to.
    pub subscription_id: Uuid,
    /// Delta sequence number, matching the `stream_pose_ack` (or
    /// `stream_ack`) that introduced this window change.
    pub sequence: u64,
    /// Chunks newly in the window, with geometry. Usually a single
    /// entry: the fill task sends one `stream_delta` per chunk.
    #[serde(default)]
    pub added_chunks: Vec<AddedChunk>,
    /// Chunks no longer in the window.
    #[serde(default)]
    pub removed_chunks: Vec<ChunkId>,
    /// Zone changes for this window move. Empty on a per-chunk fill
    /// message; populated on the delta sent immediately after a
    /// `stream_pose_ack`.
    #[serde(default)]
    pub zone_delta: ZoneDelta,
}

/// Payload of an `error` message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    /// Stable machine-readable error code.
    pub code: String,
    /// Human-readable detail.
    pub message: String,
    /// The subscription the error relates to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<Uuid>,
}
