//! `st-events` — the event-broadcaster boundary.
//!
//! The engine publishes position deltas, status changes, and appended
//! tracking events through the [`EventSink`] trait and never assumes a
//! subscriber is present — publication is always best-effort and
//! infallible from the publisher's point of view.
//!
//! [`BroadcastSink`] is the default transport: a `tokio::sync::broadcast`
//! channel the embedding application fans out to its push layer
//! (websockets, SSE, …).  [`NoopSink`] drops everything; use it when no
//! subscriber exists.

use st_core::{GeoPoint, Shipment, ShipmentId, ShipmentStatus, TrackEvent};
use tokio::sync::broadcast;


// ── Signal ────────────────────────────────────────────────────────────────────

/// One delta published by the engine.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackSignal {
    /// The shipment moved.
    Position {
        shipment: ShipmentId,
        coord:    GeoPoint,
    },
    /// The shipment changed lifecycle state; carries the full record so
    /// subscribers need no follow-up read.
    StatusChange {
        shipment: ShipmentId,
        status:   ShipmentStatus,
        record:   Box<Shipment>,
    },
    /// A tracking-history entry was appended.
    EventAdded {
        shipment: ShipmentId,
        event:    TrackEvent,
    },
}

// ── Sink trait ────────────────────────────────────────────────────────────────

/// Best-effort fan-out of engine deltas.
///
/// Implementations must never block the caller meaningfully and must
/// swallow delivery failures — a missing subscriber is the normal case.
pub trait EventSink: Send + Sync {
    fn publish_position(&self, shipment: ShipmentId, coord: GeoPoint);

    fn publish_status(&self, shipment: ShipmentId, status: ShipmentStatus, record: &Shipment);

    fn publish_track_event(&self, shipment: ShipmentId, event: &TrackEvent);
}

// ── BroadcastSink ─────────────────────────────────────────────────────────────

/// [`EventSink`] over a tokio broadcast channel.
pub struct BroadcastSink {
    tx: broadcast::Sender<TrackSignal>,
}

impl BroadcastSink {
    /// `capacity` bounds how far a slow subscriber may lag before it starts
    /// missing signals.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TrackSignal> {
        self.tx.subscribe()
    }

    fn send(&self, signal: TrackSignal) {
        // Err means no live receivers; best-effort, so ignore.
        let _ = self.tx.send(signal);
    }
}

impl EventSink for BroadcastSink {
    fn publish_position(&self, shipment: ShipmentId, coord: GeoPoint) {
        self.send(TrackSignal::Position { shipment, coord });
    }

    fn publish_status(&self, shipment: ShipmentId, status: ShipmentStatus, record: &Shipment) {
        self.send(TrackSignal::StatusChange { shipment, status, record: Box::new(record.clone()) });
    }

    fn publish_track_event(&self, shipment: ShipmentId, event: &TrackEvent) {
        self.send(TrackSignal::EventAdded { shipment, event: event.clone() });
    }
}

// ── NoopSink ──────────────────────────────────────────────────────────────────

/// An [`EventSink`] that drops every signal.
#[derive(Debug, Default, Clone)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn publish_position(&self, _shipment: ShipmentId, _coord: GeoPoint) {}
    fn publish_status(&self, _shipment: ShipmentId, _status: ShipmentStatus, _record: &Shipment) {}
    fn publish_track_event(&self, _shipment: ShipmentId, _event: &TrackEvent) {}
}
