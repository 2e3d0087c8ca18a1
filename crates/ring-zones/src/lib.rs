//! # Ring Zones
//!
//! Zone feature types and the ring-wrap-aware zone window query. Zones are
//! polygons authored in RingArc `(s, r)` space; the window query here
//! handles the seam at `s = 0` the same way chunk windowing does, by
//! splitting a straddling query into two half-box queries against a
//! [`ZoneSource`] collaborator.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod query;
pub mod zone;

pub use error::{Result, ZoneError};
pub use query::{
    zone_window_query, ArcRange, RadialRange, VisibilityFilter, ZoneSource, MAX_ZONES_PER_WINDOW,
    MAX_ZONE_VERTICES,
};
pub use zone::{ZoneDelta, ZoneFeature, ZoneId, ZoneMetadata, ZoneType};
