//! Engine-wide tuning constants.
//!
//! Everything a deployment might want to tune lives in one struct so the
//! embedding application can load it from TOML/JSON and thread it through
//! the planner, simulation engine, and dispatcher.  `Default` gives the
//! production values; tests shrink the timing fields to keep runs fast.

use std::time::Duration;

/// Process-wide configuration for the tracking engine.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EngineConfig {
    /// Simulation tick interval in milliseconds.  One path point is
    /// consumed per tick.
    pub tick_interval_ms: u64,

    /// Persist `current_position` every N ticks (position deltas are still
    /// published every tick).  Bounds store write volume.
    pub persist_every_ticks: u32,

    /// Dispatch scheduler hub-scan period in milliseconds.
    pub scan_period_ms: u64,

    /// Batch dispatch triggers when a hub holds at least this many waiting
    /// shipments …
    pub hub_capacity: usize,

    /// … or when any waiting shipment has sat at the hub longer than this
    /// many seconds.
    pub hub_timeout_secs: i64,

    /// Fixed delay between consecutive route-provider calls inside one
    /// batch, in milliseconds.  Respects the provider's rate limit.
    pub provider_delay_ms: u64,

    /// Maximum points kept per shipment path after downsampling.
    pub max_path_points: usize,

    /// A hub maps onto a path as a transit stop only if the nearest path
    /// point is within this many metres of the hub.
    pub transit_map_threshold_m: f64,

    /// A transit stop fires when the tick index is within this many points
    /// of the stop's path index.
    pub transit_window: usize,

    /// Resume guard: a `delivering` shipment whose nearest-point index
    /// lands within this many points of the path end restarts from 0.
    pub near_end_guard_points: usize,

    /// Delay before re-arming dispatched shipments, in milliseconds (lets
    /// broadcaster subscribers settle on the status change first).
    pub rearm_settle_ms: u64,

    /// How long a hub's dispatch lock is held after a batch completes, in
    /// milliseconds.  Absorbs immediately-following scheduler scans.
    pub unlock_cooldown_ms: u64,

    /// Interior step count of the straight-line fallback polyline (the
    /// fallback always has `fallback_line_steps + 1` points).
    pub fallback_line_steps: usize,

    /// Two coordinates closer than this are treated as the same place:
    /// the route is the trivial two-point segment, no provider call.
    pub same_place_epsilon_m: f64,

    /// Segment-boundary splice tolerance in degrees.
    pub splice_epsilon_deg: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms:        1_000,
            persist_every_ticks:     5,
            scan_period_ms:          30_000,
            hub_capacity:            5,
            hub_timeout_secs:        600,
            provider_delay_ms:       350,
            max_path_points:         300,
            transit_map_threshold_m: 30_000.0,
            transit_window:          2,
            near_end_guard_points:   3,
            rearm_settle_ms:         500,
            unlock_cooldown_ms:      2_000,
            fallback_line_steps:     60,
            same_place_epsilon_m:    1.0,
            splice_epsilon_deg:      1e-6,
        }
    }
}

impl EngineConfig {
    #[inline]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[inline]
    pub fn scan_period(&self) -> Duration {
        Duration::from_millis(self.scan_period_ms)
    }

    #[inline]
    pub fn provider_delay(&self) -> Duration {
        Duration::from_millis(self.provider_delay_ms)
    }

    #[inline]
    pub fn rearm_settle(&self) -> Duration {
        Duration::from_millis(self.rearm_settle_ms)
    }

    #[inline]
    pub fn unlock_cooldown(&self) -> Duration {
        Duration::from_millis(self.unlock_cooldown_ms)
    }

    /// A configuration with all delays collapsed — used by tests and demos
    /// that drive many shipment lifecycles in a short wall-clock window.
    pub fn fast() -> Self {
        Self {
            tick_interval_ms:  10,
            scan_period_ms:    50,
            provider_delay_ms: 0,
            rearm_settle_ms:   0,
            unlock_cooldown_ms: 20,
            ..Self::default()
        }
    }
}
