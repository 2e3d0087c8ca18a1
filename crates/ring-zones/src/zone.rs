//! Zone feature value types.

use geo_types::Polygon;
use serde::{Deserialize, Serialize};

/// Unique identifier for a zone feature.
pub type ZoneId = u64;

/// Zone type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoneType {
    /// Residential zoning.
    Residential,
    /// Commercial zoning.
    Commercial,
    /// Industrial zoning.
    Industrial,
    /// Mixed-use zoning.
    MixedUse,
    /// Park / green space.
    Park,
    /// Agricultural zoning.
    Agricultural,
    /// Restricted / no-build zoning.
    Restricted,
    /// Explicitly unzoned.
    Dezone,
}

/// Authoring and provenance metadata for a zone feature.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneMetadata {
    /// Author identifier, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Creation timestamp, milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Last modification timestamp, milliseconds since the Unix epoch.
    pub updated_at: u64,
    /// Chunk identifier this zone's record originated from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_chunk: Option<String>,
}

/// A zone feature: a polygon in RingArc `(s, r)` coordinates, with type,
/// floor, and provenance metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneFeature {
    /// Unique zone identifier.
    pub id: ZoneId,
    /// Display name.
    pub name: String,
    /// Zone type.
    pub zone_type: ZoneType,
    /// Floor this zone is defined on.
    pub floor: i32,
    /// True if this is a system-managed (non-player-editable) zone.
    pub system_zone: bool,
    /// Outer ring (and optional holes) in RingArc `(s, r)` coordinates.
    /// Vertex count per ring is capped at 128 by policy.
    #[serde(with = "polygon_serde")]
    pub polygon: Polygon<f64>,
    /// Free-form properties bag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
    /// Authoring/provenance metadata.
    pub metadata: ZoneMetadata,
}

impl ZoneFeature {
    /// Maximum vertices allowed per polygon ring, by policy.
    pub const MAX_VERTICES_PER_RING: usize = 128;

    /// The axis-aligned bounding box of this zone's polygon, in `(s, r)`
    /// space, using `geo`'s bounding rect computation.
    pub fn bounds(&self) -> Option<geo_types::Rect<f64>> {
        use geo::BoundingRect;
        self.polygon.bounding_rect()
    }
}

/// Zone delta: full features for additions, identifiers only for removals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneDelta {
    /// Zone features newly in the window.
    pub added: Vec<ZoneFeature>,
    /// Zone identifiers no longer in the window.
    pub removed: Vec<ZoneId>,
}

impl ZoneDelta {
    /// True if this delta carries no changes.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Serde support for `geo_types::Polygon`, which does not implement
/// `Serialize`/`Deserialize` for our purposes as a ring-of-rings list.
mod polygon_serde {
    use geo_types::{Coord, LineString, Polygon};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Wire {
        exterior: Vec<[f64; 2]>,
        interiors: Vec<Vec<[f64; 2]>>,
    }

    pub fn serialize<S: Serializer>(poly: &Polygon<f64>, s: S) -> Result<S::Ok, S::Error> {
        let exterior = poly.exterior().coords().map(|c| [c.x, c.y]).collect();
        let interiors = poly
            .interiors()
            .iter()
            .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
            .collect();
        Wire { exterior, interiors }.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Polygon<f64>, D::Error> {
        let wire = Wire::deserialize(d)?;
        let exterior = LineString::from(
            wire.exterior
                .into_iter()
                .map(|[x, y]| Coord { x, y })
                .collect::<Vec<_>>(),
        );
        let interiors = wire
            .interiors
            .into_iter()
            .map(|ring| {
                LineString::from(
                    ring.into_iter()
                        .map(|[x, y]| Coord { x, y })
                        .collect::<Vec<_>>(),
                )
            })
            .collect();
        Ok(Polygon::new(exterior, interiors))
    }
}
