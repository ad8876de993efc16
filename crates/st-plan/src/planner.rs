//! `RoutePlanner` — composes provider calls into a full shipment path.

use std::sync::Arc;

use st_core::{geo, EngineConfig, GeoPoint, HubRegistry, OrderId, Shipment, TransitStop};
use st_provider::{fallback, RouteProvider, RouteStrategy};
use tracing::debug;

use crate::{address, PlanError, PlanResult};

// ── PlannedRoute ──────────────────────────────────────────────────────────────

/// Everything the planner derives for one shipment.
#[derive(Debug, Clone)]
pub struct PlannedRoute {
    /// Geocoded origin coordinate.
    pub start: GeoPoint,
    /// Geocoded destination coordinate (the recipient, not the city seat).
    pub end: GeoPoint,
    /// Downsampled path the simulation engine will replay.  For cross-city
    /// shipments this ends at the destination-area hub / city seat; the
    /// last-mile leg is attached by dispatch.
    pub path: Vec<GeoPoint>,
    /// Trunk hubs mapped onto `path`, sorted by path index.
    pub transit_stops: Vec<TransitStop>,
    pub district_hub: Option<String>,
    pub province: Option<String>,
    pub same_city: bool,
}

impl PlannedRoute {
    /// Materialise a fresh shipment record from this plan.
    pub fn into_shipment(self, order_id: OrderId, origin_address: &str, dest_address: &str) -> Shipment {
        Shipment::new(
            order_id,
            origin_address.to_string(),
            dest_address.to_string(),
            self.start,
            self.end,
            self.path,
            self.transit_stops,
            self.province,
            self.district_hub,
            self.same_city,
        )
    }
}

// ── RoutePlanner ──────────────────────────────────────────────────────────────

/// Plans shipment paths against a [`RouteProvider`] and the static hub
/// registry.
pub struct RoutePlanner<P> {
    provider: Arc<P>,
    hubs:     HubRegistry,
    config:   EngineConfig,
}

impl<P: RouteProvider> RoutePlanner<P> {
    pub fn new(provider: Arc<P>, hubs: HubRegistry, config: EngineConfig) -> Self {
        Self { provider, hubs, config }
    }

    /// Plan a route from `origin` to `dest`.
    ///
    /// `trunk` selects the provider strategy hint for long hub-to-hub legs.
    /// Provider failures degrade internally; the only error is an empty hub
    /// registry on a cross-city plan.
    pub async fn plan(&self, origin: &str, dest: &str, trunk: bool) -> PlanResult<PlannedRoute> {
        let start = fallback::geocode_or_default(self.provider.as_ref(), origin).await;
        let end = fallback::geocode_or_default(self.provider.as_ref(), dest).await;

        let same_city = address::same_city(origin, dest);
        let province = address::province_of(dest);

        // Near-zero distance: the route is the trivial two-point segment,
        // no polyline call at all.
        if start.distance_m(end) <= self.config.same_place_epsilon_m {
            return Ok(PlannedRoute {
                start,
                end,
                path: vec![start, end],
                transit_stops: vec![],
                district_hub: None,
                province,
                same_city: true,
            });
        }

        if same_city {
            let path = fallback::route_or_line(
                self.provider.as_ref(),
                start,
                end,
                RouteStrategy::Fastest,
                self.config.fallback_line_steps,
            )
            .await;
            return Ok(PlannedRoute {
                start,
                end,
                path: geo::downsample(&path, self.config.max_path_points),
                transit_stops: vec![],
                district_hub: None,
                province,
                same_city: true,
            });
        }

        self.plan_cross_city(origin, dest, start, end, trunk, province).await
    }

    async fn plan_cross_city(
        &self,
        origin: &str,
        dest: &str,
        start: GeoPoint,
        end: GeoPoint,
        trunk: bool,
        province: Option<String>,
    ) -> PlanResult<PlannedRoute> {
        // Trunk legs aim at the destination city's administrative seat so
        // hub selection isn't skewed by a recipient on the city outskirts.
        // If the seat cannot be resolved, the raw destination stands in.
        let target = match address::city_token(dest) {
            Some(city) => self.provider.geocode(&city).await.unwrap_or(end),
            None => end,
        };

        let origin_hub = self.hubs.nearest(start).ok_or(PlanError::NoHubs)?;
        let dest_hub = self.hubs.nearest(target).ok_or(PlanError::NoHubs)?;
        debug!(%origin, %dest, origin_hub = %origin_hub.name, dest_hub = %dest_hub.name, "cross-city plan");

        let trunk_strategy = if trunk { RouteStrategy::Trunk } else { RouteStrategy::Fastest };
        let steps = self.config.fallback_line_steps;
        let eps = self.config.splice_epsilon_deg;

        // origin → origin hub → destination-area hub → target, spliced so
        // coinciding segment boundaries don't produce duplicate points.
        let mut path = fallback::route_or_line(
            self.provider.as_ref(), start, origin_hub.coord, RouteStrategy::Fastest, steps,
        )
        .await;
        if origin_hub.name != dest_hub.name {
            let mid = fallback::route_or_line(
                self.provider.as_ref(), origin_hub.coord, dest_hub.coord, trunk_strategy, steps,
            )
            .await;
            geo::splice_append(&mut path, mid, eps);
        }
        let last = fallback::route_or_line(
            self.provider.as_ref(), dest_hub.coord, target, RouteStrategy::Fastest, steps,
        )
        .await;
        geo::splice_append(&mut path, last, eps);

        let path = geo::downsample(&path, self.config.max_path_points);
        let transit_stops = self.map_transit_stops(&path);

        Ok(PlannedRoute {
            start,
            end,
            path,
            transit_stops,
            district_hub: address::district_hub_of(dest),
            province,
            same_city: false,
        })
    }

    /// Map every registry hub onto its nearest path index, keeping only
    /// hubs within the mapping threshold, sorted by index.  The whole
    /// registry is scanned, so intermediate trunk hubs the route passes
    /// near become stops too, not just the two selected endpoints.
    fn map_transit_stops(&self, path: &[GeoPoint]) -> Vec<TransitStop> {
        if path.is_empty() {
            return vec![];
        }
        let mut stops: Vec<TransitStop> = Vec::new();
        for hub in self.hubs.iter() {
            let idx = geo::nearest_index(path, hub.coord);
            if path[idx].distance_m(hub.coord) <= self.config.transit_map_threshold_m {
                stops.push(TransitStop { path_index: idx, hub: hub.name.clone(), passed: false });
            }
        }
        stops.sort_by_key(|s| s.path_index);
        stops
    }
}
