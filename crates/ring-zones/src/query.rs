//! Ring-wrap-aware zone window query.
//!
//! Builds one or two bounding boxes for a pose/radius/width window, queries
//! a [`ZoneSource`] collaborator for each, deduplicates by zone identifier,
//! filters by floor and visibility, and caps the result size.

use crate::error::Result;
use crate::zone::{ZoneFeature, ZoneId, ZoneType};
use ring_core::normalize_s;
use std::collections::HashSet;
use tracing::warn;

/// Maximum number of zones returned for a single window query.
pub const MAX_ZONES_PER_WINDOW: usize = 256;

/// Maximum total vertex count across all zones returned for a window query.
pub const MAX_ZONE_VERTICES: usize = 8192;

/// An inclusive arc-length range, already normalised into `[0, C)` on both
/// ends. `start <= end`; a range that would wrap is represented by the
/// caller issuing two of these (see [`zone_window_query`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcRange {
    /// Range start (inclusive), in metres.
    pub start: f64,
    /// Range end (inclusive), in metres.
    pub end: f64,
}

/// An inclusive radial range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialRange {
    /// Range low bound (inclusive), in metres.
    pub low: f64,
    /// Range high bound (inclusive), in metres.
    pub high: f64,
}

/// Collaborator contract for zone storage: given a floor and a
/// non-wrapping arc/radial window, return the zones whose bounding boxes
/// intersect it. Implementations must accept a full-ring query
/// (`start == 0`, covering the whole circumference).
pub trait ZoneSource {
    /// Query zones on `floor` whose polygon bounding box intersects
    /// `s_range` x `y_range`.
    fn query_zones(
        &self,
        floor: i32,
        s_range: ArcRange,
        y_range: RadialRange,
    ) -> Result<Vec<ZoneFeature>>;
}

/// Optional visibility policy applied after the spatial query. `None`
/// (the system default) means all zone types are visible.
pub type VisibilityFilter = Option<HashSet<ZoneType>>;

/// Run the ring-wrap-aware zone window query described in the streaming
/// core's zone query component.
pub fn zone_window_query(
    source: &dyn ZoneSource,
    floor: i32,
    pose_s: f64,
    pose_r: f64,
    radius_meters: f64,
    width_meters: f64,
    visibility: &VisibilityFilter,
) -> Result<Vec<ZoneFeature>> {
    let y_range = RadialRange {
        low: pose_r - width_meters / 2.0,
        high: pose_r + width_meters / 2.0,
    };

    let half_circumference = ring_core::constants::RING_CIRCUMFERENCE / 2.0;

    let mut raw = if radius_meters >= half_circumference {
        // Degenerate case: the window covers the whole ring.
        source.query_zones(
            floor,
            ArcRange {
                start: 0.0,
                end: ring_core::constants::RING_CIRCUMFERENCE,
            },
            y_range,
        )?
    } else {
        let s_min = normalize_s(pose_s - radius_meters);
        let s_max = normalize_s(pose_s + radius_meters);

        if s_min <= s_max {
            source.query_zones(floor, ArcRange { start: s_min, end: s_max }, y_range)?
        } else {
            // The window straddles the seam: issue two half-box queries and
            // dedup the union by zone identifier.
            let mut first = source.query_zones(
                floor,
                ArcRange {
                    start: s_min,
                    end: ring_core::constants::RING_CIRCUMFERENCE,
                },
                y_range,
            )?;
            let second = source.query_zones(floor, ArcRange { start: 0.0, end: s_max }, y_range)?;

            let mut seen: HashSet<ZoneId> = first.iter().map(|z| z.id).collect();
            for zone in second {
                if seen.insert(zone.id) {
                    first.push(zone);
                }
            }
            first
        }
    };

    raw.retain(|z| z.floor == floor);

    if let Some(allowed) = visibility {
        raw.retain(|z| allowed.contains(&z.zone_type));
    }

    // Dedup defensively in case the source itself returns duplicates across
    // calls (e.g. a zone whose bbox touches both half-boxes).
    let mut seen: HashSet<ZoneId> = HashSet::new();
    raw.retain(|z| seen.insert(z.id));

    apply_caps(&mut raw);

    Ok(raw)
}

fn apply_caps(zones: &mut Vec<ZoneFeature>) {
    if zones.len() > MAX_ZONES_PER_WINDOW {
        warn!(
            "zone window query truncated from {} to {} zones (MaxZonesPerWindow)",
            zones.len(),
            MAX_ZONES_PER_WINDOW
        );
        zones.truncate(MAX_ZONES_PER_WINDOW);
    }

    let mut total_vertices = 0usize;
    let mut cutoff = zones.len();
    for (i, zone) in zones.iter().enumerate() {
        let vertex_count = zone.polygon.exterior().0.len()
            + zone
                .polygon
                .interiors()
                .iter()
                .map(|r| r.0.len())
                .sum::<usize>();
        if total_vertices + vertex_count > MAX_ZONE_VERTICES {
            cutoff = i;
            break;
        }
        total_vertices += vertex_count;
    }
    if cutoff < zones.len() {
        warn!(
            "zone window query truncated from {} to {} zones (MaxZoneVertices)",
            zones.len(),
            cutoff
        );
        zones.truncate(cutoff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::ZoneMetadata;
    use geo_types::{Coord, LineString, Polygon};

    struct FakeSource {
        zones: Vec<ZoneFeature>,
    }

    fn make_zone(id: ZoneId, floor: i32, s: f64) -> ZoneFeature {
        let exterior = LineString::from(vec![
            Coord { x: s, y: -1.0 },
            Coord { x: s + 1.0, y: -1.0 },
            Coord { x: s + 1.0, y: 1.0 },
            Coord { x: s, y: 1.0 },
            Coord { x: s, y: -1.0 },
        ]);
        ZoneFeature {
            id,
            name: format!("zone-{id}"),
            zone_type: ZoneType::Residential,
            floor,
            system_zone: false,
            polygon: Polygon::new(exterior, vec![]),
            properties: None,
            metadata: ZoneMetadata::default(),
        }
    }

    impl ZoneSource for FakeSource {
        fn query_zones(
            &self,
            floor: i32,
            s_range: ArcRange,
            _y_range: RadialRange,
        ) -> Result<Vec<ZoneFeature>> {
            Ok(self
                .zones
                .iter()
                .filter(|z| z.floor == floor)
                .filter(|z| {
                    if s_range.start <= s_range.end {
                        z.polygon.exterior().0[0].x >= s_range.start
                            && z.polygon.exterior().0[0].x <= s_range.end
                    } else {
                        false
                    }
                })
                .cloned()
                .collect())
        }
    }

    #[test]
    fn non_wrapping_query_returns_single_box_result() {
        let source = FakeSource {
            zones: vec![make_zone(1, 0, 100.0), make_zone(2, 0, 5000.0)],
        };
        let result =
            zone_window_query(&source, 0, 150.0, 0.0, 100.0, 400.0, &None).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 1);
    }

    #[test]
    fn seam_crossing_query_dedupes_union() {
        let c = ring_core::constants::RING_CIRCUMFERENCE;
        let source = FakeSource {
            zones: vec![make_zone(1, 0, c - 10.0), make_zone(2, 0, 5.0)],
        };
        // pose near the seam with a radius that straddles s=0.
        let result = zone_window_query(&source, 0, 2.0, 0.0, 20.0, 400.0, &None).unwrap();
        let ids: HashSet<_> = result.iter().map(|z| z.id).collect();
        assert_eq!(ids, [1u64, 2u64].into_iter().collect());
    }

    #[test]
    fn floor_filter_excludes_other_floors() {
        let source = FakeSource {
            zones: vec![make_zone(1, 0, 100.0), make_zone(2, 1, 100.0)],
        };
        let result =
            zone_window_query(&source, 0, 150.0, 0.0, 100.0, 400.0, &None).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].floor, 0);
    }

    #[test]
    fn full_ring_degenerate_case() {
        let c = ring_core::constants::RING_CIRCUMFERENCE;
        let source = FakeSource {
            zones: vec![make_zone(1, 0, 100.0), make_zone(2, 0, c - 100.0)],
        };
        let result = zone_window_query(&source, 0, 0.0, 0.0, c / 2.0, 400.0, &None).unwrap();
        assert_eq!(result.len(), 2);
    }
}
