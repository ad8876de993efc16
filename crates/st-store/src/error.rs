//! Store error type.

use st_core::{OrderId, ShipmentId};
use thiserror::Error;

/// Errors produced by the in-memory backend (and a reasonable vocabulary
/// for other backends).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("shipment {0} not found")]
    NotFound(ShipmentId),

    #[error("order {0} already has an active shipment")]
    DuplicateOrder(OrderId),
}

/// Shorthand result type for `st-store`.
pub type StoreResult<T> = Result<T, StoreError>;
