//! Unit tests for st-provider.

use st_core::GeoPoint;

use crate::{
    amap::{parse_point, parse_polyline},
    fallback, fixture::StaticProvider, RouteProvider, RouteStrategy,
};

fn p(lon: f64, lat: f64) -> GeoPoint {
    GeoPoint::new(lon, lat)
}

// ── Wire parsing ──────────────────────────────────────────────────────────────

mod wire {
    use super::*;

    #[test]
    fn point_roundtrip() {
        let pt = parse_point("116.481028,39.989643").unwrap();
        assert!((pt.lon - 116.481_028).abs() < 1e-9);
        assert!((pt.lat - 39.989_643).abs() < 1e-9);
    }

    #[test]
    fn point_rejects_garbage() {
        assert!(parse_point("").is_err());
        assert!(parse_point("116.48").is_err());
        assert!(parse_point("abc,def").is_err());
    }

    #[test]
    fn polyline_splits_on_semicolons() {
        let pts = parse_polyline("0,0;1,1;2,2").unwrap();
        assert_eq!(pts.len(), 3);
        assert_eq!(pts[2], p(2.0, 2.0));
    }

    #[test]
    fn polyline_skips_trailing_separator() {
        let pts = parse_polyline("0,0;1,1;").unwrap();
        assert_eq!(pts.len(), 2);
    }
}

// ── StaticProvider ────────────────────────────────────────────────────────────

mod static_provider {
    use super::*;

    #[tokio::test]
    async fn geocode_hits_registered_address() {
        let provider = StaticProvider::new().with_address("北京市朝阳区", p(116.44, 39.92));
        let coord = provider.geocode("北京市朝阳区").await.unwrap();
        assert_eq!(coord, p(116.44, 39.92));
    }

    #[tokio::test]
    async fn geocode_unknown_address_errors() {
        let provider = StaticProvider::new();
        assert!(provider.geocode("不存在的地址").await.is_err());
    }

    #[tokio::test]
    async fn routes_are_straight_lines() {
        let provider = StaticProvider::new().with_line_steps(10);
        let path = provider
            .drive_route(p(0.0, 0.0), p(1.0, 0.0), RouteStrategy::Fastest)
            .await
            .unwrap();
        assert_eq!(path.len(), 11);
        assert_eq!(path[0], p(0.0, 0.0));
        assert_eq!(*path.last().unwrap(), p(1.0, 0.0));
    }
}

// ── Fallback degradation ──────────────────────────────────────────────────────

mod degradation {
    use super::*;

    #[tokio::test]
    async fn geocode_failure_yields_fixed_coordinate() {
        let provider = StaticProvider::new();
        let coord = fallback::geocode_or_default(&provider, "未注册地址").await;
        assert_eq!(coord, fallback::FALLBACK_COORD);
    }

    #[tokio::test]
    async fn route_failure_yields_deterministic_line() {
        let provider = StaticProvider::new().failing_routes();
        let from = p(116.4, 39.9);
        let to = p(114.3, 30.6);

        let a = fallback::route_or_line(&provider, from, to, RouteStrategy::Trunk, 60).await;
        let b = fallback::route_or_line(&provider, from, to, RouteStrategy::Trunk, 60).await;

        // First/last points equal the inputs, length is steps + 1, and the
        // degradation is byte-for-byte repeatable.
        assert_eq!(a.len(), 61);
        assert_eq!(a[0], from);
        assert_eq!(*a.last().unwrap(), to);
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn route_success_passes_through() {
        let provider = StaticProvider::new().with_line_steps(5);
        let path =
            fallback::route_or_line(&provider, p(0.0, 0.0), p(1.0, 1.0), RouteStrategy::Fastest, 60)
                .await;
        assert_eq!(path.len(), 6); // provider result, not the 61-point fallback
    }
}
