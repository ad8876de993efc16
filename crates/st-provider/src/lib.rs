//! `st-provider` — the geocoding & route provider boundary.
//!
//! # Pluggability
//!
//! The planner and dispatcher call routing via the [`RouteProvider`] trait,
//! so applications can swap the real HTTP client for a fixture or a custom
//! backend without touching the engine.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`provider`] | `RouteProvider` trait, `RouteStrategy`                   |
//! | [`amap`]     | `AmapProvider` — reqwest client for the AMap web service |
//! | [`fixture`]  | `StaticProvider` — deterministic in-memory double        |
//! | [`fallback`] | Degradation helpers: fixed coordinate, straight line     |
//! | [`error`]    | `ProviderError`, `ProviderResult<T>`                     |
//!
//! # Unreliability contract
//!
//! Both provider operations must be treated as unreliable (timeouts,
//! malformed responses, rate limiting).  Callers go through the [`fallback`]
//! helpers, which absorb every failure into a deterministic substitute so
//! the rest of the engine never observes a missing coordinate or an empty
//! path.

pub mod amap;
pub mod error;
pub mod fallback;
pub mod fixture;
pub mod provider;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use amap::AmapProvider;
pub use error::{ProviderError, ProviderResult};
pub use fallback::{geocode_or_default, route_or_line, FALLBACK_COORD};
pub use fixture::StaticProvider;
pub use provider::{RouteProvider, RouteStrategy};
