//! In-memory `ShipmentStore` backend.

use std::collections::HashMap;

use st_core::{OrderId, Shipment, ShipmentId, ShipmentStatus, TrackEvent};
use tokio::sync::RwLock;

use crate::{ShipmentPatch, ShipmentStore, StoreError};

/// `RwLock<HashMap>`-backed store.
///
/// Serialising all writers through one lock is stronger than the
/// single-document atomicity the engine assumes — callers must not rely on
/// the extra strength, since a real backend won't provide it.
#[derive(Default)]
pub struct MemoryStore {
    shipments: RwLock<HashMap<ShipmentId, Shipment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored shipments (diagnostics/tests).
    pub async fn len(&self) -> usize {
        self.shipments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.shipments.read().await.is_empty()
    }
}

impl ShipmentStore for MemoryStore {
    type Error = StoreError;

    async fn create(&self, shipment: Shipment) -> Result<Shipment, StoreError> {
        let mut map = self.shipments.write().await;
        if map.values().any(|s| s.order_id == shipment.order_id) {
            return Err(StoreError::DuplicateOrder(shipment.order_id));
        }
        map.insert(shipment.id, shipment.clone());
        Ok(shipment)
    }

    async fn find_by_id(&self, id: ShipmentId) -> Result<Option<Shipment>, StoreError> {
        Ok(self.shipments.read().await.get(&id).cloned())
    }

    async fn find_by_order(&self, order: OrderId) -> Result<Option<Shipment>, StoreError> {
        Ok(self
            .shipments
            .read()
            .await
            .values()
            .find(|s| s.order_id == order)
            .cloned())
    }

    async fn find_by_hub_and_status(
        &self,
        district_hub: &str,
        status: ShipmentStatus,
    ) -> Result<Vec<Shipment>, StoreError> {
        Ok(self
            .shipments
            .read()
            .await
            .values()
            .filter(|s| s.status == status && s.district_hub.as_deref() == Some(district_hub))
            .cloned()
            .collect())
    }

    async fn update_fields(&self, id: ShipmentId, patch: ShipmentPatch) -> Result<(), StoreError> {
        let mut map = self.shipments.write().await;
        let shipment = map.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        patch.apply_to(shipment);
        Ok(())
    }

    async fn append_event(&self, id: ShipmentId, event: TrackEvent) -> Result<(), StoreError> {
        let mut map = self.shipments.write().await;
        let shipment = map.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        shipment.events.push(event);
        Ok(())
    }

    async fn distinct_hubs_with_status(
        &self,
        status: ShipmentStatus,
    ) -> Result<Vec<String>, StoreError> {
        let map = self.shipments.read().await;
        let mut hubs: Vec<String> = map
            .values()
            .filter(|s| s.status == status)
            .filter_map(|s| s.district_hub.clone())
            .collect();
        hubs.sort();
        hubs.dedup();
        Ok(hubs)
    }
}
