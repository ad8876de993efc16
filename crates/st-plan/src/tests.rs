//! Unit tests for st-plan.

use std::sync::Arc;

use st_core::{EngineConfig, GeoPoint, Hub, HubRegistry};
use st_provider::StaticProvider;

use crate::{address, RoutePlanner};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn p(lon: f64, lat: f64) -> GeoPoint {
    GeoPoint::new(lon, lat)
}

const BEIJING_ADDR: &str = "北京市朝阳区望京街10号";
const BEIJING_ADDR_2: &str = "北京市海淀区中关村大街1号";
const WUHAN_ADDR: &str = "湖北省武汉市洪山区珞瑜路1037号";

/// Provider with Beijing/Wuhan fixtures; routes are straight lines.
fn provider() -> StaticProvider {
    StaticProvider::new()
        .with_address(BEIJING_ADDR, p(116.47, 39.99))
        .with_address(BEIJING_ADDR_2, p(116.31, 39.98))
        .with_address(WUHAN_ADDR, p(114.40, 30.51))
        .with_address("武汉", p(114.305, 30.593))
}

fn planner() -> RoutePlanner<StaticProvider> {
    RoutePlanner::new(Arc::new(provider()), HubRegistry::mainline(), EngineConfig::default())
}

// ── Address parsing ───────────────────────────────────────────────────────────

mod addresses {
    use super::*;

    #[test]
    fn municipality_city_token() {
        assert_eq!(address::city_token(BEIJING_ADDR).as_deref(), Some("北京"));
    }

    #[test]
    fn province_prefixed_city_token() {
        assert_eq!(address::city_token(WUHAN_ADDR).as_deref(), Some("武汉"));
    }

    #[test]
    fn no_city_marker_yields_none() {
        assert_eq!(address::city_token("某某某某某某"), None);
    }

    #[test]
    fn province_extraction() {
        assert_eq!(address::province_of(WUHAN_ADDR).as_deref(), Some("湖北省"));
        assert_eq!(address::province_of(BEIJING_ADDR).as_deref(), Some("北京市"));
        assert_eq!(address::province_of("某地"), None);
    }

    #[test]
    fn district_extraction() {
        assert_eq!(address::district_of(BEIJING_ADDR).as_deref(), Some("朝阳区"));
        assert_eq!(address::district_of(WUHAN_ADDR).as_deref(), Some("洪山区"));
    }

    #[test]
    fn district_hub_is_city_qualified() {
        assert_eq!(
            address::district_hub_of(WUHAN_ADDR).as_deref(),
            Some("武汉市洪山区")
        );
        // 朝阳区 exists in several cities; the hub key disambiguates.
        assert_eq!(
            address::district_hub_of(BEIJING_ADDR).as_deref(),
            Some("北京市朝阳区")
        );
    }

    #[test]
    fn same_city_containment() {
        assert!(address::same_city(BEIJING_ADDR, BEIJING_ADDR_2));
        assert!(!address::same_city(BEIJING_ADDR, WUHAN_ADDR));
        // Suffix variants still match by containment.
        assert!(address::same_city("武汉市武昌区", "湖北省武汉市洪山区"));
    }
}

// ── RoutePlanner ──────────────────────────────────────────────────────────────

mod plan {
    use super::*;

    #[tokio::test]
    async fn same_city_shortcut() {
        let plan = planner().plan(BEIJING_ADDR, BEIJING_ADDR_2, false).await.unwrap();
        assert!(plan.same_city);
        assert!(plan.transit_stops.is_empty());
        assert!(plan.district_hub.is_none());
        assert_eq!(plan.path[0], plan.start);
        assert!(!plan.path.is_empty());
    }

    #[tokio::test]
    async fn near_zero_distance_is_two_point_segment() {
        let plan = planner().plan(BEIJING_ADDR, BEIJING_ADDR, false).await.unwrap();
        assert!(plan.same_city);
        assert_eq!(plan.path.len(), 2);
        assert!(plan.transit_stops.is_empty());
    }

    #[tokio::test]
    async fn cross_city_routes_through_hubs() {
        let plan = planner().plan(BEIJING_ADDR, WUHAN_ADDR, true).await.unwrap();
        assert!(!plan.same_city);
        assert_eq!(plan.district_hub.as_deref(), Some("武汉市洪山区"));
        assert_eq!(plan.province.as_deref(), Some("湖北省"));
        assert_eq!(plan.path[0], plan.start);

        // Both trunk hubs appear as transit stops, in path order.
        let names: Vec<_> = plan.transit_stops.iter().map(|s| s.hub.as_str()).collect();
        assert_eq!(names, vec!["北京转运中心", "武汉转运中心"]);
        assert!(plan.transit_stops[0].path_index < plan.transit_stops[1].path_index);
        assert!(plan.transit_stops.iter().all(|s| !s.passed));
    }

    #[tokio::test]
    async fn intermediate_hub_on_the_trunk_becomes_a_stop() {
        let hub = |name: &str, lon: f64, lat: f64| Hub {
            name:  name.to_string(),
            coord: p(lon, lat),
        };
        // The middle hub sits exactly on the 华北 → 江南 trunk leg.
        let registry = HubRegistry::new(vec![
            hub("华北转运中心", 116.40, 39.90),
            hub("华中转运中心", 115.352_5, 35.246_5),
            hub("江南转运中心", 114.305, 30.593),
        ]);
        let planner = RoutePlanner::new(Arc::new(provider()), registry, EngineConfig::default());
        let plan = planner.plan(BEIJING_ADDR, WUHAN_ADDR, true).await.unwrap();

        let names: Vec<_> = plan.transit_stops.iter().map(|s| s.hub.as_str()).collect();
        assert_eq!(names, vec!["华北转运中心", "华中转运中心", "江南转运中心"]);
    }

    #[tokio::test]
    async fn cross_city_path_is_bounded() {
        let cfg = EngineConfig { max_path_points: 40, ..EngineConfig::default() };
        let planner = RoutePlanner::new(Arc::new(provider()), HubRegistry::mainline(), cfg);
        let plan = planner.plan(BEIJING_ADDR, WUHAN_ADDR, false).await.unwrap();
        assert!(plan.path.len() <= 40);
        assert_eq!(plan.path[0], plan.start);
    }

    #[tokio::test]
    async fn ungeocodable_addresses_fall_back_not_fail() {
        // Neither address is registered: both geocodes degrade to the fixed
        // fallback coordinate, which also makes this a near-zero-distance
        // same-place plan.
        let planner =
            RoutePlanner::new(Arc::new(StaticProvider::new()), HubRegistry::mainline(), EngineConfig::default());
        let plan = planner.plan("未知甲", "未知乙", false).await.unwrap();
        assert_eq!(plan.start, st_provider::FALLBACK_COORD);
        assert_eq!(plan.path.len(), 2);
    }

    #[tokio::test]
    async fn empty_registry_fails_cross_city_only() {
        let planner =
            RoutePlanner::new(Arc::new(provider()), HubRegistry::default(), EngineConfig::default());
        assert!(planner.plan(BEIJING_ADDR, WUHAN_ADDR, false).await.is_err());
        assert!(planner.plan(BEIJING_ADDR, BEIJING_ADDR_2, false).await.is_ok());
    }

    #[tokio::test]
    async fn into_shipment_carries_plan_fields() {
        let plan = planner().plan(BEIJING_ADDR, WUHAN_ADDR, true).await.unwrap();
        let dest = plan.end;
        let shipment = plan.into_shipment(st_core::OrderId::new(), BEIJING_ADDR, WUHAN_ADDR);
        assert_eq!(shipment.dest, dest);
        assert_eq!(shipment.current_position, shipment.start);
        assert!(!shipment.same_city);
        assert_eq!(shipment.district_hub.as_deref(), Some("武汉市洪山区"));
    }
}
