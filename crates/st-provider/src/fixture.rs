//! `StaticProvider` — deterministic in-memory provider for tests and demos.

use std::collections::HashMap;

use st_core::{geo, GeoPoint};

use crate::{ProviderError, ProviderResult, RouteProvider, RouteStrategy};

/// An in-memory [`RouteProvider`]: geocoding resolves against a fixed
/// address table and routes are straight lines.
///
/// `failing_routes` makes every `drive_route` call fail, which is how the
/// degradation paths are exercised without a network.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    addresses:      HashMap<String, GeoPoint>,
    line_steps:     usize,
    failing_routes: bool,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self { line_steps: 30, ..Self::default() }
    }

    /// Register an address → coordinate mapping.
    pub fn with_address(mut self, address: impl Into<String>, coord: GeoPoint) -> Self {
        self.addresses.insert(address.into(), coord);
        self
    }

    /// Interior step count for generated routes (default 30).
    pub fn with_line_steps(mut self, steps: usize) -> Self {
        self.line_steps = steps;
        self
    }

    /// Make every `drive_route` call fail.
    pub fn failing_routes(mut self) -> Self {
        self.failing_routes = true;
        self
    }
}

impl RouteProvider for StaticProvider {
    async fn geocode(&self, address: &str) -> ProviderResult<GeoPoint> {
        self.addresses
            .get(address)
            .copied()
            .ok_or_else(|| ProviderError::NoResult(address.to_string()))
    }

    async fn drive_route(
        &self,
        from: GeoPoint,
        to: GeoPoint,
        _strategy: RouteStrategy,
    ) -> ProviderResult<Vec<GeoPoint>> {
        if self.failing_routes {
            return Err(ProviderError::Malformed("routes disabled for this fixture".into()));
        }
        Ok(geo::straight_line(from, to, self.line_steps.max(1)))
    }
}
