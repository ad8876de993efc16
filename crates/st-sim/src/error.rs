//! Simulation-engine error type.

use thiserror::Error;

/// Errors produced inside a tick.
///
/// These never escape the engine: a failed tick is logged and skipped, and
/// the shipment is retried on its next tick.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SimError {
    pub fn store<E: std::error::Error + Send + Sync + 'static>(error: E) -> Self {
        Self::Store(Box::new(error))
    }
}

/// Shorthand result type for `st-sim`.
pub type SimResult<T> = Result<T, SimError>;
