//! Provider-boundary error type.

use thiserror::Error;

/// Errors produced by `st-provider` backends.
///
/// None of these escape the engine: every call site degrades to the
/// deterministic fallback in [`crate::fallback`] after logging.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider rejected request: {info} (status {code})")]
    Rejected { code: String, info: String },

    #[error("no result for address {0:?}")]
    NoResult(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Shorthand result type for `st-provider`.
pub type ProviderResult<T> = Result<T, ProviderError>;
