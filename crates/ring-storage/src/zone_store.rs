//! In-memory reference implementation of the zone storage collaborator
//! contract ([`ring_zones::ZoneSource`]).

use dashmap::DashMap;
use parking_lot::RwLock;
use ring_zones::{ArcRange, RadialRange, ZoneFeature, ZoneId, ZoneSource};

/// A `DashMap`-backed zone store. Zones are kept in a flat list per floor
/// and filtered linearly on query; adequate for tests and single-node
/// deployments, not for production-scale zone counts.
#[derive(Debug, Default)]
pub struct InMemoryZoneStore {
    by_floor: DashMap<i32, RwLock<Vec<ZoneFeature>>>,
}

impl InMemoryZoneStore {
    /// Construct an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a zone feature by identifier.
    pub fn put_zone(&self, zone: ZoneFeature) {
        let mut floor_zones = self
            .by_floor
            .entry(zone.floor)
            .or_insert_with(|| RwLock::new(Vec::new()));
        let mut guard = floor_zones.write();
        if let Some(existing) = guard.iter_mut().find(|z| z.id == zone.id) {
            *existing = zone;
        } else {
            guard.push(zone);
        }
    }

    /// Remove a zone by identifier, returning true if it was present.
    pub fn remove_zone(&self, floor: i32, id: ZoneId) -> bool {
        if let Some(floor_zones) = self.by_floor.get(&floor) {
            let mut guard = floor_zones.write();
            let before = guard.len();
            guard.retain(|z| z.id != id);
            return guard.len() != before;
        }
        false
    }
}

impl ZoneSource for InMemoryZoneStore {
    fn query_zones(
        &self,
        floor: i32,
        s_range: ArcRange,
        y_range: RadialRange,
    ) -> ring_zones::Result<Vec<ZoneFeature>> {
        let Some(floor_zones) = self.by_floor.get(&floor) else {
            return Ok(Vec::new());
        };
        let guard = floor_zones.read();
        Ok(guard
            .iter()
            .filter(|zone| match zone.bounds() {
                Some(bbox) => {
                    bbox.max().x >= s_range.start
                        && bbox.min().x <= s_range.end
                        && bbox.max().y >= y_range.low
                        && bbox.min().y <= y_range.high
                }
                None => false,
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{Coord, LineString, Polygon};
    use ring_zones::{ZoneMetadata, ZoneType};

    fn rect_zone(id: ZoneId, floor: i32, s0: f64, s1: f64) -> ZoneFeature {
        let exterior = LineString::from(vec![
            Coord { x: s0, y: -10.0 },
            Coord { x: s1, y: -10.0 },
            Coord { x: s1, y: 10.0 },
            Coord { x: s0, y: 10.0 },
            Coord { x: s0, y: -10.0 },
        ]);
        ZoneFeature {
            id,
            name: format!("zone-{id}"),
            zone_type: ZoneType::Park,
            floor,
            system_zone: false,
            polygon: Polygon::new(exterior, vec![]),
            properties: None,
            metadata: ZoneMetadata::default(),
        }
    }

    #[test]
    fn put_then_query_finds_overlapping_zone() {
        let store = InMemoryZoneStore::new();
        store.put_zone(rect_zone(1, 0, 100.0, 200.0));

        let result = store
            .query_zones(
                0,
                ArcRange { start: 150.0, end: 160.0 },
                RadialRange { low: -5.0, high: 5.0 },
            )
            .unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn remove_zone_drops_it_from_future_queries() {
        let store = InMemoryZoneStore::new();
        store.put_zone(rect_zone(1, 0, 100.0, 200.0));
        assert!(store.remove_zone(0, 1));

        let result = store
            .query_zones(
                0,
                ArcRange { start: 150.0, end: 160.0 },
                RadialRange { low: -5.0, high: 5.0 },
            )
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn different_floor_is_not_visible() {
        let store = InMemoryZoneStore::new();
        store.put_zone(rect_zone(1, 0, 100.0, 200.0));

        let result = store
            .query_zones(
                1,
                ArcRange { start: 150.0, end: 160.0 },
                RadialRange { low: -5.0, high: 5.0 },
            )
            .unwrap();
        assert!(result.is_empty());
    }
}
