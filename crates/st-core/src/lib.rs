//! `st-core` — foundational types for the `rust_st` shipment-tracking engine.
//!
//! This crate is a dependency of every other `st-*` crate.  It intentionally
//! has no `st-*` dependencies and no async machinery — everything here is
//! plain data plus geometry.
//!
//! # What lives here
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`ids`]      | `ShipmentId`, `OrderId`                                 |
//! | [`geo`]      | `GeoPoint`, haversine distance, polyline helpers        |
//! | [`hubs`]     | `Hub`, `HubRegistry` — static trunk transfer centres    |
//! | [`config`]   | `EngineConfig` — every process-wide tuning constant     |
//! | [`shipment`] | `Shipment`, `ShipmentStatus`, `TrackEvent`, `PickupCode`|

pub mod config;
pub mod geo;
pub mod hubs;
pub mod ids;
pub mod shipment;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::EngineConfig;
pub use geo::GeoPoint;
pub use hubs::{Hub, HubRegistry};
pub use ids::{OrderId, ShipmentId};
pub use shipment::{PickupCode, Shipment, ShipmentStatus, TrackEvent, TransitStop};
