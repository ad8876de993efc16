//! Dispatch-scheduler error type.

use thiserror::Error;

/// Errors produced while evaluating or dispatching a hub batch.
///
/// Like simulation ticks, hub checks are retried on the next scan, so
/// these are logged by the scheduler loop rather than propagated out.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl DispatchError {
    pub fn store<E: std::error::Error + Send + Sync + 'static>(error: E) -> Self {
        Self::Store(Box::new(error))
    }
}

/// Shorthand result type for `st-dispatch`.
pub type DispatchResult<T> = Result<T, DispatchError>;
