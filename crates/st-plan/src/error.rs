//! Planner error type.

use thiserror::Error;

/// Errors produced by `st-plan`.
///
/// Provider failures never appear here — they degrade to deterministic
/// fallbacks inside the planner.  The only hard failure is a configuration
/// problem the planner cannot route around.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("hub registry is empty; cross-city planning needs at least one hub")]
    NoHubs,
}

/// Shorthand result type for `st-plan`.
pub type PlanResult<T> = Result<T, PlanError>;
