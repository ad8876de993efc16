//! The `RouteProvider` trait.

use std::future::Future;

use st_core::GeoPoint;

use crate::ProviderResult;

/// Routing preference hint passed through to the provider.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStrategy {
    /// Fastest drivable route — the default for local legs.
    Fastest,
    /// Long-haul trunk leg between transfer hubs.
    Trunk,
}

/// Abstraction over an external geocoding / driving-direction service.
///
/// All methods return `Send` futures so the trait can be used from spawned
/// tokio tasks.  Implementations must be cheap to share behind an `Arc`.
///
/// Both operations are assumed unreliable; callers degrade through
/// [`crate::fallback`] rather than propagating failures shipment-level.
pub trait RouteProvider: Send + Sync {
    /// Resolve a free-text address to a coordinate.
    fn geocode<'a>(
        &'a self,
        address: &'a str,
    ) -> impl Future<Output = ProviderResult<GeoPoint>> + Send + 'a;

    /// Compute a drivable polyline between two coordinates.
    ///
    /// A successful result is never empty.
    fn drive_route(
        &self,
        from: GeoPoint,
        to: GeoPoint,
        strategy: RouteStrategy,
    ) -> impl Future<Output = ProviderResult<Vec<GeoPoint>>> + Send + '_;
}
