//! World constants shared by every component of the streaming core.

/// Circumference of the ring, in metres.
pub const RING_CIRCUMFERENCE: f64 = 264_000_000.0;

/// Length of a single chunk along the ring, in metres.
pub const CHUNK_LENGTH: f64 = 1_000.0;

/// Number of chunks per floor.
pub const CHUNKS_PER_FLOOR: u32 = 264_000;

/// Vertical spacing between floor indices, in metres.
pub const FLOOR_HEIGHT: f64 = 20.0;

/// Radius of the Kongo anchor hub, in metres; anchor of theta = 0.
pub const KONGO_HUB_RADIUS: f64 = 6_878_137.0;

/// Radial ring radius, derived from the circumference.
pub const RING_RADIUS: f64 = RING_CIRCUMFERENCE / (2.0 * std::f64::consts::PI);

/// Maximum subscription width, in metres, by policy.
pub const RING_WIDTH: f64 = 5_000.0;
