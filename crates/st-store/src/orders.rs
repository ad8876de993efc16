//! The order-subsystem boundary.

use std::future::Future;

use st_core::OrderId;

/// Minimal view of an order as far as this engine cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRef {
    pub id:        OrderId,
    pub delivered: bool,
}

/// What the tracking engine consumes from the order subsystem.
///
/// `mark_delivered` is called fire-and-forget when a shipment reaches its
/// terminal state; callers log failures and never retry.
pub trait OrderService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn find_order(
        &self,
        id: OrderId,
    ) -> impl Future<Output = Result<Option<OrderRef>, Self::Error>> + Send + '_;

    fn mark_delivered(
        &self,
        id: OrderId,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ── NoopOrders ────────────────────────────────────────────────────────────────

/// An [`OrderService`] that accepts everything.  For tests and demos where
/// no real order subsystem is wired in.
#[derive(Debug, Default, Clone)]
pub struct NoopOrders;

impl OrderService for NoopOrders {
    type Error = std::convert::Infallible;

    async fn find_order(&self, id: OrderId) -> Result<Option<OrderRef>, Self::Error> {
        Ok(Some(OrderRef { id, delivered: false }))
    }

    async fn mark_delivered(&self, _id: OrderId) -> Result<(), Self::Error> {
        Ok(())
    }
}
