//! The shipment record — the unit of work every other component reads and
//! mutates.
//!
//! # Lifecycle
//!
//! ```text
//! shipped ──(cross-city, path end)──▶ waiting_for_delivery
//!    │                                        │ (batch dispatch)
//!    │ (same-city, path end)                  ▼
//!    └──────────────▶ delivered ◀──(path end)─ delivering
//! ```
//!
//! `delivered` is terminal: once reached, no position or state mutation may
//! occur, and the `delivered` track event appears at most once.  The history
//! list is append-only — events are never rewritten.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::{GeoPoint, OrderId, ShipmentId};

// ── Status ────────────────────────────────────────────────────────────────────

/// Lifecycle state of a shipment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    /// In motion along the planned path (initial state).
    Shipped,
    /// Arrived at the destination district hub, awaiting batch dispatch.
    /// Cross-city shipments only — same-city shipments skip straight to
    /// `Delivered`.
    WaitingForDelivery,
    /// Out on a last-mile route after dispatch.
    Delivering,
    /// Terminal.
    Delivered,
}

impl ShipmentStatus {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, ShipmentStatus::Delivered)
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ShipmentStatus::Shipped            => "shipped",
            ShipmentStatus::WaitingForDelivery => "waiting_for_delivery",
            ShipmentStatus::Delivering         => "delivering",
            ShipmentStatus::Delivered          => "delivered",
        };
        f.write_str(s)
    }
}

// ── Track events ──────────────────────────────────────────────────────────────

/// One entry in a shipment's append-only tracking history.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrackEvent {
    pub time:        DateTime<Utc>,
    /// Human-readable location ("北京转运中心", an address, …).
    pub location:    String,
    pub description: String,
    /// Lifecycle status the shipment carried when the event was recorded.
    pub status:      ShipmentStatus,
    /// Who recorded the event; the engine always writes `"system"`.
    pub operator:    String,
}

impl TrackEvent {
    pub fn system(location: impl Into<String>, description: impl Into<String>, status: ShipmentStatus) -> Self {
        Self {
            time:        Utc::now(),
            location:    location.into(),
            description: description.into(),
            status,
            operator:    "system".to_string(),
        }
    }
}

// ── Transit stops ─────────────────────────────────────────────────────────────

/// A waypoint marking passage through a trunk hub.
///
/// Passing a transit stop emits a track event but is *not* a lifecycle
/// transition.  `passed` is persisted so a re-armed shipment does not
/// re-announce hubs it already cleared.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitStop {
    /// Index into the shipment's path nearest to the hub.
    pub path_index: usize,
    /// Hub name from the static registry.
    pub hub:        String,
    pub passed:     bool,
}

// ── Pickup code ───────────────────────────────────────────────────────────────

/// Short collection code issued once when a cross-city shipment reaches its
/// district hub.  Immutable thereafter.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PickupCode {
    pub code:       String,
    pub issued_at:  DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PickupCode {
    /// Validity window of an issued code.
    pub const VALID_HOURS: i64 = 72;

    /// Issue a fresh 6-digit code valid for [`Self::VALID_HOURS`].
    pub fn issue() -> Self {
        let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
        let now = Utc::now();
        Self {
            code:       format!("{code:06}"),
            issued_at:  now,
            expires_at: now + Duration::hours(Self::VALID_HOURS),
        }
    }
}

// ── Shipment ──────────────────────────────────────────────────────────────────

/// The persisted record of one order's physical delivery progress.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Shipment {
    pub id:       ShipmentId,
    /// Exactly one active shipment exists per order (store-enforced).
    pub order_id: OrderId,

    // Addresses and fields derived from them by the route planner.
    pub origin_address: String,
    pub dest_address:   String,
    pub dest_province:  Option<String>,
    /// Locality-level aggregation point used for last-mile batching.
    pub district_hub:   Option<String>,
    pub same_city:      bool,

    // Route.  `path` is non-empty whenever status is `shipped`/`delivering`.
    pub start: GeoPoint,
    pub dest:  GeoPoint,
    pub path:  Vec<GeoPoint>,
    /// Last known coordinate — always a point on (or the start of) `path`.
    /// A coordinate rather than an index: the path can be replaced by
    /// dispatch, so resume re-locates it by nearest-point search.
    pub current_position: GeoPoint,
    pub transit_stops:    Vec<TransitStop>,

    pub status: ShipmentStatus,
    /// Append-only tracking history.
    pub events: Vec<TrackEvent>,

    /// Set once, on entering `waiting_for_delivery`.
    pub hub_arrival_at: Option<DateTime<Utc>>,
    pub pickup:         Option<PickupCode>,
    /// Visiting-order position allocated at batch dispatch.
    pub batch_seq:      Option<u32>,

    pub created_at: DateTime<Utc>,
}

impl Shipment {
    /// A freshly created shipment in `shipped` state, positioned at the
    /// start of its path.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        order_id:       OrderId,
        origin_address: String,
        dest_address:   String,
        start:          GeoPoint,
        dest:           GeoPoint,
        path:           Vec<GeoPoint>,
        transit_stops:  Vec<TransitStop>,
        dest_province:  Option<String>,
        district_hub:   Option<String>,
        same_city:      bool,
    ) -> Self {
        Self {
            id: ShipmentId::new(),
            order_id,
            origin_address,
            dest_address,
            dest_province,
            district_hub,
            same_city,
            start,
            dest,
            path,
            current_position: start,
            transit_stops,
            status: ShipmentStatus::Shipped,
            events: Vec::new(),
            hub_arrival_at: None,
            pickup: None,
            batch_seq: None,
            created_at: Utc::now(),
        }
    }

    /// `true` once a `delivered` event has been recorded.  Guards the
    /// at-most-once terminal-event invariant.
    pub fn has_delivered_event(&self) -> bool {
        self.events
            .iter()
            .any(|e| e.status == ShipmentStatus::Delivered)
    }

    /// Transit stops not yet announced, in path order.
    pub fn pending_stops(&self) -> impl Iterator<Item = &TransitStop> {
        self.transit_stops.iter().filter(|s| !s.passed)
    }
}
