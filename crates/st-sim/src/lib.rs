//! `st-sim` — the movement-simulation engine.
//!
//! For each active shipment, a dedicated tokio task replays the shipment's
//! precomputed path at a fixed tick interval: one path point per tick,
//! geofenced transit events along the way, and a lifecycle transition at
//! path end.  "Movement" is deterministic replay — this is not a telemetry
//! system.
//!
//! # Concurrency model
//!
//! One independent timer task per active shipment, supervised in a registry
//! keyed by shipment id.  Within one shipment, ticks are strictly ordered
//! (a single task awaits its own interval); across shipments nothing is
//! ordered.  [`SimEngine::arm`] always cancels any prior task for the same
//! shipment before starting a new one, so timers can never duplicate.
//!
//! # Crate layout
//!
//! | Module     | Contents                                   |
//! |------------|--------------------------------------------|
//! | [`engine`] | `SimEngine` — arm/disarm, tick loop        |
//! | [`error`]  | `SimError`, `SimResult<T>`                 |

pub mod engine;
pub mod error;


pub use engine::SimEngine;
pub use error::{SimError, SimResult};
