//! `st-plan` — the route planner.
//!
//! Composes provider calls into a full shipment path:
//!
//! ```text
//! same-city:  origin ───────────────────────────────▶ destination
//! cross-city: origin ─▶ nearest hub ─[trunk]─▶ destination-area hub ─▶ seat
//! ```
//!
//! and decides same-city vs. cross-city handling from the two addresses'
//! city tokens.  Cross-city paths end at the destination city's
//! administrative seat; the last-mile leg to the recipient is attached later
//! by the dispatch scheduler.
//!
//! # Crate layout
//!
//! | Module      | Contents                                               |
//! |-------------|--------------------------------------------------------|
//! | [`address`] | City-token / province / district extraction            |
//! | [`planner`] | `RoutePlanner`, `PlannedRoute`                         |
//! | [`error`]   | `PlanError`, `PlanResult<T>`                           |

pub mod address;
pub mod error;
pub mod planner;

#[cfg(test)]
mod tests;

pub use error::{PlanError, PlanResult};
pub use planner::{PlannedRoute, RoutePlanner};
