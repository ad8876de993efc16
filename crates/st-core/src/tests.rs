//! Unit tests for st-core.

use crate::{geo, GeoPoint, HubRegistry, OrderId, PickupCode, Shipment, ShipmentStatus, TrackEvent};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn p(lon: f64, lat: f64) -> GeoPoint {
    GeoPoint::new(lon, lat)
}

/// Minimal cross-city shipment with a short synthetic path.
fn shipment(path: Vec<GeoPoint>) -> Shipment {
    let start = path.first().copied().unwrap_or_default();
    let dest = path.last().copied().unwrap_or_default();
    Shipment::new(
        OrderId::new(),
        "北京市朝阳区望京街10号".to_string(),
        "武汉市洪山区珞瑜路1037号".to_string(),
        start,
        dest,
        path,
        vec![],
        Some("湖北省".to_string()),
        Some("武汉市洪山区".to_string()),
        false,
    )
}

// ── geo ───────────────────────────────────────────────────────────────────────

mod geo_points {
    use super::*;

    #[test]
    fn distance_zero_for_same_point() {
        let a = p(116.4, 39.9);
        assert!(a.distance_m(a) < 1e-6);
    }

    #[test]
    fn distance_one_degree_longitude_at_equator() {
        // One degree of longitude at the equator is ~111.19 km.
        let d = p(0.0, 0.0).distance_m(p(1.0, 0.0));
        assert!((d - 111_195.0).abs() < 200.0, "got {d}");
    }

    #[test]
    fn coincides_respects_epsilon() {
        let a = p(116.4, 39.9);
        assert!(a.coincides(p(116.400_000_4, 39.9), 1e-6));
        assert!(!a.coincides(p(116.401, 39.9), 1e-6));
    }
}

mod straight_line {
    use super::*;

    #[test]
    fn endpoints_and_length_are_exact() {
        let from = p(116.4, 39.9);
        let to = p(114.3, 30.6);
        let line = geo::straight_line(from, to, 60);
        assert_eq!(line.len(), 61);
        assert_eq!(line[0], from);
        assert_eq!(*line.last().unwrap(), to);
    }

    #[test]
    fn zero_steps_clamps_to_segment() {
        let line = geo::straight_line(p(0.0, 0.0), p(1.0, 1.0), 0);
        assert_eq!(line.len(), 2);
    }

    #[test]
    fn points_are_evenly_spaced() {
        let line = geo::straight_line(p(0.0, 0.0), p(0.0, 1.0), 10);
        for w in line.windows(2) {
            assert!((w[1].lat - w[0].lat - 0.1).abs() < 1e-9);
        }
    }
}

mod nearest_index {
    use super::*;

    #[test]
    fn finds_exact_point() {
        let path: Vec<_> = (0..10).map(|i| p(i as f64 * 0.01, 0.0)).collect();
        assert_eq!(geo::nearest_index(&path, path[7]), 7);
    }

    #[test]
    fn finds_closest_between_points() {
        let path = vec![p(0.0, 0.0), p(0.01, 0.0), p(0.02, 0.0)];
        assert_eq!(geo::nearest_index(&path, p(0.011, 0.0)), 1);
    }

    #[test]
    fn empty_path_returns_zero() {
        assert_eq!(geo::nearest_index(&[], p(1.0, 1.0)), 0);
    }
}

mod downsample {
    use super::*;

    #[test]
    fn short_path_unchanged() {
        let path: Vec<_> = (0..10).map(|i| p(i as f64, 0.0)).collect();
        assert_eq!(geo::downsample(&path, 300), path);
    }

    #[test]
    fn long_path_bounded_with_endpoints_kept() {
        for len in [301usize, 999, 5_000, 10_000] {
            let path: Vec<_> = (0..len).map(|i| p(i as f64 * 1e-4, 0.0)).collect();
            let down = geo::downsample(&path, 300);
            assert!(down.len() <= 300, "len {len} → {}", down.len());
            assert_eq!(down[0], path[0]);
            assert_eq!(*down.last().unwrap(), *path.last().unwrap());
        }
    }
}

mod splice_append {
    use super::*;

    #[test]
    fn coinciding_boundary_point_is_dropped() {
        let mut path = vec![p(0.0, 0.0), p(1.0, 1.0)];
        geo::splice_append(&mut path, vec![p(1.0, 1.0), p(2.0, 2.0)], 1e-6);
        assert_eq!(path, vec![p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)]);
    }

    #[test]
    fn distinct_boundary_points_are_kept() {
        let mut path = vec![p(0.0, 0.0)];
        geo::splice_append(&mut path, vec![p(5.0, 5.0), p(6.0, 6.0)], 1e-6);
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn appending_to_empty_path() {
        let mut path = Vec::new();
        geo::splice_append(&mut path, vec![p(1.0, 1.0)], 1e-6);
        assert_eq!(path, vec![p(1.0, 1.0)]);
    }
}

mod centroid {
    use super::*;

    #[test]
    fn mean_of_points() {
        let c = geo::centroid(&[p(0.0, 0.0), p(2.0, 4.0)]).unwrap();
        assert_eq!(c, p(1.0, 2.0));
    }

    #[test]
    fn empty_is_none() {
        assert!(geo::centroid(&[]).is_none());
    }
}

// ── HubRegistry ───────────────────────────────────────────────────────────────

mod hub_registry {
    use super::*;

    #[test]
    fn nearest_picks_geometrically_closest() {
        let hubs = HubRegistry::mainline();
        // Near Wuhan city centre.
        let h = hubs.nearest(p(114.30, 30.59)).unwrap();
        assert_eq!(h.name, "武汉转运中心");
    }

    #[test]
    fn get_by_name() {
        let hubs = HubRegistry::mainline();
        assert!(hubs.get("北京转运中心").is_some());
        assert!(hubs.get("不存在").is_none());
    }

    #[test]
    fn empty_registry_has_no_nearest() {
        assert!(HubRegistry::default().nearest(p(0.0, 0.0)).is_none());
    }
}

// ── Shipment ──────────────────────────────────────────────────────────────────

mod shipment_model {
    use super::*;

    #[test]
    fn new_shipment_starts_shipped_at_path_start() {
        let s = shipment(vec![p(0.0, 0.0), p(1.0, 1.0)]);
        assert_eq!(s.status, ShipmentStatus::Shipped);
        assert_eq!(s.current_position, p(0.0, 0.0));
        assert!(s.events.is_empty());
        assert!(s.hub_arrival_at.is_none());
        assert!(s.pickup.is_none());
    }

    #[test]
    fn delivered_event_detection() {
        let mut s = shipment(vec![p(0.0, 0.0), p(1.0, 1.0)]);
        assert!(!s.has_delivered_event());
        s.events.push(TrackEvent::system("a", "in transit", ShipmentStatus::Shipped));
        assert!(!s.has_delivered_event());
        s.events.push(TrackEvent::system("b", "delivered", ShipmentStatus::Delivered));
        assert!(s.has_delivered_event());
    }

    #[test]
    fn status_display_matches_wire_names() {
        assert_eq!(ShipmentStatus::WaitingForDelivery.to_string(), "waiting_for_delivery");
        assert_eq!(ShipmentStatus::Delivered.to_string(), "delivered");
    }

    #[test]
    fn only_delivered_is_terminal() {
        assert!(ShipmentStatus::Delivered.is_terminal());
        assert!(!ShipmentStatus::Shipped.is_terminal());
        assert!(!ShipmentStatus::WaitingForDelivery.is_terminal());
        assert!(!ShipmentStatus::Delivering.is_terminal());
    }
}

mod pickup_code {
    use super::*;

    #[test]
    fn six_digits_and_expiry_window() {
        let c = PickupCode::issue();
        assert_eq!(c.code.len(), 6);
        assert!(c.code.chars().all(|ch| ch.is_ascii_digit()));
        let window = c.expires_at - c.issued_at;
        assert_eq!(window.num_hours(), PickupCode::VALID_HOURS);
    }
}
