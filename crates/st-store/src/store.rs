//! The `ShipmentStore` trait and the partial-update type.

use std::future::Future;

use chrono::{DateTime, Utc};
use st_core::{
    GeoPoint, OrderId, PickupCode, Shipment, ShipmentId, ShipmentStatus, TrackEvent, TransitStop,
};

// ── Partial update ────────────────────────────────────────────────────────────

/// Field-wise partial update for [`ShipmentStore::update_fields`].
///
/// `None` fields are left untouched.  Track events are *not* updatable this
/// way — history is append-only through
/// [`append_event`](ShipmentStore::append_event).
#[derive(Debug, Clone, Default)]
pub struct ShipmentPatch {
    pub path:             Option<Vec<GeoPoint>>,
    pub current_position: Option<GeoPoint>,
    pub transit_stops:    Option<Vec<TransitStop>>,
    pub status:           Option<ShipmentStatus>,
    pub hub_arrival_at:   Option<DateTime<Utc>>,
    pub pickup:           Option<PickupCode>,
    pub batch_seq:        Option<u32>,
}

impl ShipmentPatch {
    pub fn position(position: GeoPoint) -> Self {
        Self { current_position: Some(position), ..Self::default() }
    }

    pub fn status(status: ShipmentStatus) -> Self {
        Self { status: Some(status), ..Self::default() }
    }

    /// Apply this patch to a shipment record in place.
    pub fn apply_to(self, shipment: &mut Shipment) {
        if let Some(path) = self.path {
            shipment.path = path;
        }
        if let Some(position) = self.current_position {
            shipment.current_position = position;
        }
        if let Some(stops) = self.transit_stops {
            shipment.transit_stops = stops;
        }
        if let Some(status) = self.status {
            shipment.status = status;
        }
        if let Some(at) = self.hub_arrival_at {
            shipment.hub_arrival_at = Some(at);
        }
        if let Some(pickup) = self.pickup {
            // Issued once; never replaced for a shipment.
            shipment.pickup.get_or_insert(pickup);
        }
        if let Some(seq) = self.batch_seq {
            shipment.batch_seq = Some(seq);
        }
    }
}

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Abstraction over the persistent shipment store.
///
/// All operations are assumed atomic at the single-document level; the
/// engine never needs multi-document transactions.  `create` must reject a
/// second active shipment for the same order.
///
/// All methods return `Send` futures so the trait can be used from spawned
/// tokio tasks.
pub trait ShipmentStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a new shipment.  Fails if the order already has one.
    fn create(
        &self,
        shipment: Shipment,
    ) -> impl Future<Output = Result<Shipment, Self::Error>> + Send + '_;

    fn find_by_id(
        &self,
        id: ShipmentId,
    ) -> impl Future<Output = Result<Option<Shipment>, Self::Error>> + Send + '_;

    fn find_by_order(
        &self,
        order: OrderId,
    ) -> impl Future<Output = Result<Option<Shipment>, Self::Error>> + Send + '_;

    /// All shipments at `district_hub` with the given status.
    fn find_by_hub_and_status<'a>(
        &'a self,
        district_hub: &'a str,
        status: ShipmentStatus,
    ) -> impl Future<Output = Result<Vec<Shipment>, Self::Error>> + Send + 'a;

    /// Apply a partial update to one shipment.
    fn update_fields(
        &self,
        id: ShipmentId,
        patch: ShipmentPatch,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

    /// Append one entry to a shipment's tracking history.
    fn append_event(
        &self,
        id: ShipmentId,
        event: TrackEvent,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

    /// Distinct district-hub names having at least one shipment with the
    /// given status.
    fn distinct_hubs_with_status(
        &self,
        status: ShipmentStatus,
    ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;
}
