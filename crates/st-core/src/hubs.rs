//! Static trunk-hub registry.
//!
//! Hubs are fixed, process-wide transfer points used for cross-city trunk
//! routing: a cross-city shipment travels origin → nearest hub → nearest
//! hub to destination → destination.  The registry is read-only at runtime
//! and never persisted; with a handful of entries a linear nearest scan is
//! all the spatial indexing this needs.

use crate::GeoPoint;

/// A named transfer point.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Hub {
    pub name:  String,
    pub coord: GeoPoint,
}

/// Immutable name → coordinate registry of trunk hubs.
#[derive(Debug, Clone, Default)]
pub struct HubRegistry {
    hubs: Vec<Hub>,
}

impl HubRegistry {
    pub fn new(hubs: Vec<Hub>) -> Self {
        Self { hubs }
    }

    /// The built-in mainline network: one transfer centre per major region.
    pub fn mainline() -> Self {
        let hub = |name: &str, lon: f64, lat: f64| Hub {
            name:  name.to_string(),
            coord: GeoPoint::new(lon, lat),
        };
        Self::new(vec![
            hub("北京转运中心", 116.407_4, 39.904_2),
            hub("上海转运中心", 121.473_7, 31.230_4),
            hub("广州转运中心", 113.264_4, 23.129_1),
            hub("成都转运中心", 104.066_5, 30.572_8),
            hub("武汉转运中心", 114.305_5, 30.592_8),
            hub("西安转运中心", 108.948_4, 34.263_2),
            hub("沈阳转运中心", 123.431_5, 41.805_7),
            hub("郑州转运中心", 113.625_4, 34.746_6),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hub> {
        self.hubs.iter()
    }

    pub fn len(&self) -> usize {
        self.hubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hubs.is_empty()
    }

    /// Look a hub up by exact name.
    pub fn get(&self, name: &str) -> Option<&Hub> {
        self.hubs.iter().find(|h| h.name == name)
    }

    /// The hub geometrically nearest to `point` (straight-line distance).
    ///
    /// Ties break toward the earlier registry entry, so selection is
    /// deterministic.  Returns `None` only for an empty registry.
    pub fn nearest(&self, point: GeoPoint) -> Option<&Hub> {
        self.hubs
            .iter()
            .min_by(|a, b| {
                let da = a.coord.distance_m(point);
                let db = b.coord.distance_m(point);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}
