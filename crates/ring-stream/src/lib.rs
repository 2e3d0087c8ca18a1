//! # Ring Stream
//!
//! The streaming subscription manager: per-connection pose tracking,
//! wrap-aware chunk and zone window computation, delta computation
//! between windows, and nearest-first asynchronous chunk geometry fill
//! with cancellation on pose update or unsubscribe.
//!
//! This crate has no knowledge of WebSockets or wire framing — that is
//! `ring-protocol`'s job. It only manages subscription state and
//! produces chunk/zone deltas plus a stream of filled chunk geometry.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod fill;
pub mod manager;
pub mod subscription;

pub use error::{Result, StreamError};
pub use fill::ChunkFillEvent;
pub use manager::{StreamingManager, SubscribeOutcome, UpdateOutcome};
pub use subscription::{compute_chunk_window, nearest_first, SubscriptionState, UserId};
