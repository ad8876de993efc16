//! Deterministic degradation for provider failures.
//!
//! Per the error-handling design, provider unavailability is always
//! recovered locally: a failed geocode yields a fixed default coordinate
//! and a failed route yields an evenly spaced straight-line polyline.
//! Either way a warning is logged and the caller proceeds — no provider
//! failure is ever surfaced as a shipment-level error.

use st_core::{geo, GeoPoint};
use tracing::warn;

use crate::{RouteProvider, RouteStrategy};

/// Coordinate used when an address cannot be geocoded at all.
pub const FALLBACK_COORD: GeoPoint = GeoPoint { lon: 116.397_428, lat: 39.909_23 };

/// Geocode `address`, degrading to [`FALLBACK_COORD`] on any failure.
pub async fn geocode_or_default<P: RouteProvider>(provider: &P, address: &str) -> GeoPoint {
    match provider.geocode(address).await {
        Ok(coord) => coord,
        Err(error) => {
            warn!(%address, %error, "geocoding failed, using fallback coordinate");
            FALLBACK_COORD
        }
    }
}

/// Compute a drivable route, degrading to a straight line with
/// `line_steps + 1` points on any failure (including an empty result,
/// which the engine must never observe).
pub async fn route_or_line<P: RouteProvider>(
    provider:   &P,
    from:       GeoPoint,
    to:         GeoPoint,
    strategy:   RouteStrategy,
    line_steps: usize,
) -> Vec<GeoPoint> {
    match provider.drive_route(from, to, strategy).await {
        Ok(path) if !path.is_empty() => path,
        Ok(_) => {
            warn!(%from, %to, "provider returned an empty route, using straight line");
            geo::straight_line(from, to, line_steps)
        }
        Err(error) => {
            warn!(%from, %to, %error, "route computation failed, using straight line");
            geo::straight_line(from, to, line_steps)
        }
    }
}
