//! `SimEngine` — supervised per-shipment tick tasks.

use std::{
    collections::HashMap,
    ops::ControlFlow,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

use chrono::Utc;
use st_core::{geo, EngineConfig, PickupCode, Shipment, ShipmentId, ShipmentStatus, TrackEvent};
use st_events::EventSink;
use st_store::{OrderService, ShipmentPatch, ShipmentStore};
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{SimError, SimResult};

/// One registry entry: the task's generation plus its handle.  The
/// generation lets a finishing task prove the entry is still its own
/// before removing it — a re-arm may already have replaced it.
struct ArmedTask {
    generation: u64,
    handle:     JoinHandle<()>,
}

/// The movement-simulation engine.
///
/// Owns the process-scoped set of active simulations; other components
/// interact with it only through [`arm`](SimEngine::arm) and
/// [`disarm`](SimEngine::disarm).
pub struct SimEngine<S, O, E> {
    store:  Arc<S>,
    orders: Arc<O>,
    sink:   Arc<E>,
    config: EngineConfig,

    tasks:           Mutex<HashMap<ShipmentId, ArmedTask>>,
    next_generation: AtomicU64,

    /// Where hub-arrival notifications go; the dispatch scheduler listens
    /// on the other end.  `None` means arrivals wait for the periodic scan.
    hub_check: Option<tokio::sync::mpsc::UnboundedSender<String>>,
}

impl<S, O, E> SimEngine<S, O, E>
where
    S: ShipmentStore + 'static,
    O: OrderService + 'static,
    E: EventSink + 'static,
{
    pub fn new(store: Arc<S>, orders: Arc<O>, sink: Arc<E>, config: EngineConfig) -> Self {
        Self {
            store,
            orders,
            sink,
            config,
            tasks: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(0),
            hub_check: None,
        }
    }

    /// Wire the hub-check channel the dispatch scheduler listens on.
    pub fn with_hub_check(mut self, tx: tokio::sync::mpsc::UnboundedSender<String>) -> Self {
        self.hub_check = Some(tx);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ── Arm / disarm ──────────────────────────────────────────────────────

    /// Begin (or restart) tick-based advancement for `shipment`.
    ///
    /// Idempotent: any prior task for the same shipment is cancelled
    /// before the replacement is spawned, so no two timers can ever race
    /// on one shipment's index.  The abort, spawn, and registry insert all
    /// happen under the registry lock; a replacement that finishes
    /// instantly blocks in [`release`](SimEngine::release) until its entry
    /// is in place.
    pub fn arm(self: &Arc<Self>, shipment: ShipmentId) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let mut tasks = self.tasks_guard();
        if let Some(prior) = tasks.remove(&shipment) {
            prior.handle.abort();
            debug!(%shipment, "re-armed, prior timer cancelled");
        }

        let engine = Arc::clone(self);
        let handle = tokio::spawn(async move {
            engine.drive(shipment, generation).await;
        });
        tasks.insert(shipment, ArmedTask { generation, handle });
    }

    /// Stop advancing `shipment`.  No-op if it is not armed.
    pub fn disarm(&self, shipment: ShipmentId) {
        if let Some(task) = self.tasks_guard().remove(&shipment) {
            task.handle.abort();
            debug!(%shipment, "disarmed");
        }
    }

    /// Number of currently armed shipments.
    pub fn armed_count(&self) -> usize {
        self.tasks_guard().len()
    }

    pub fn is_armed(&self, shipment: ShipmentId) -> bool {
        self.tasks_guard().contains_key(&shipment)
    }

    fn tasks_guard(&self) -> MutexGuard<'_, HashMap<ShipmentId, ArmedTask>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop this task's registry entry, unless a re-arm already replaced it.
    fn release(&self, shipment: ShipmentId, generation: u64) {
        let mut tasks = self.tasks_guard();
        if tasks.get(&shipment).is_some_and(|t| t.generation == generation) {
            tasks.remove(&shipment);
        }
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    async fn drive(self: Arc<Self>, shipment: ShipmentId, generation: u64) {
        let Some(mut index) = self.resume_index(shipment).await else {
            self.release(shipment, generation);
            return;
        };
        debug!(%shipment, index, "simulation armed");

        let mut interval = tokio::time::interval(self.config.tick_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks_since_persist = 0u32;

        loop {
            interval.tick().await;
            match self.step(shipment, &mut index, &mut ticks_since_persist).await {
                Ok(ControlFlow::Continue(())) => {}
                Ok(ControlFlow::Break(())) => break,
                Err(error) => {
                    // Tick-level failures are absorbed: skip this tick and
                    // retry on the next one.
                    warn!(%shipment, %error, "tick failed, skipping");
                }
            }
        }
        self.release(shipment, generation);
    }

    /// Locate where ticking should resume on the (possibly replaced) path.
    ///
    /// Nearest-point search rather than a stored index: dispatch swaps the
    /// path wholesale, so a persisted index cannot be trusted.  The
    /// `delivering`-near-end special case works around trunk and last-mile
    /// legs visually overlapping near the hub, which would otherwise read
    /// as an instant arrival on resume.
    async fn resume_index(&self, shipment: ShipmentId) -> Option<usize> {
        let record = match self.store.find_by_id(shipment).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!(%shipment, "cannot arm: shipment not found");
                return None;
            }
            Err(error) => {
                warn!(%shipment, %error, "cannot arm: store read failed");
                return None;
            }
        };
        if record.status.is_terminal() {
            return None;
        }
        if record.path.is_empty() {
            warn!(%shipment, "cannot arm: empty path");
            return None;
        }

        let mut index = geo::nearest_index(&record.path, record.current_position);
        if record.status == ShipmentStatus::Delivering
            && record.path.len() - index <= self.config.near_end_guard_points
        {
            debug!(%shipment, index, "near-end resume guard hit, restarting from 0");
            index = 0;
        }
        Some(index)
    }

    /// One tick: read fresh state, advance or finalise.
    async fn step(
        &self,
        shipment: ShipmentId,
        index: &mut usize,
        ticks_since_persist: &mut u32,
    ) -> SimResult<ControlFlow<()>> {
        let record = match self.store.find_by_id(shipment).await.map_err(SimError::store)? {
            Some(record) => record,
            None => {
                warn!(%shipment, "shipment disappeared, stopping its timer");
                return Ok(ControlFlow::Break(()));
            }
        };
        // Terminal means some other path already finalised; no further
        // position or state mutation is allowed.
        if record.status.is_terminal() {
            return Ok(ControlFlow::Break(()));
        }
        if record.path.is_empty() {
            warn!(%shipment, "empty path, skipping tick");
            return Ok(ControlFlow::Continue(()));
        }

        if *index >= record.path.len() {
            self.finalize(&record).await?;
            return Ok(ControlFlow::Break(()));
        }

        let position = record.path[*index];

        if !record.same_city && record.status == ShipmentStatus::Shipped {
            self.announce_transit_stops(&record, *index).await?;
        }

        // Persist on a throttled cadence to bound write volume; the
        // position delta itself is published every tick.
        *ticks_since_persist += 1;
        if *ticks_since_persist >= self.config.persist_every_ticks {
            *ticks_since_persist = 0;
            self.store
                .update_fields(shipment, ShipmentPatch::position(position))
                .await
                .map_err(SimError::store)?;
        }
        self.sink.publish_position(shipment, position);

        *index += 1;
        Ok(ControlFlow::Continue(()))
    }

    /// Emit "passed through hub" events for transit stops within the
    /// detection window of the current index.  Not a lifecycle change.
    async fn announce_transit_stops(&self, record: &Shipment, index: usize) -> SimResult<()> {
        let window = self.config.transit_window;
        let due: Vec<String> = record
            .pending_stops()
            .filter(|stop| stop.path_index.abs_diff(index) <= window)
            .map(|stop| stop.hub.clone())
            .collect();
        if due.is_empty() {
            return Ok(());
        }

        let mut stops = record.transit_stops.clone();
        for stop in stops.iter_mut().filter(|s| due.contains(&s.hub)) {
            stop.passed = true;
        }
        let patch = ShipmentPatch { transit_stops: Some(stops), ..ShipmentPatch::default() };
        self.store.update_fields(record.id, patch).await.map_err(SimError::store)?;

        for hub in due {
            let event = TrackEvent::system(
                hub.clone(),
                format!("快件途经 {hub}"),
                ShipmentStatus::Shipped,
            );
            self.store
                .append_event(record.id, event.clone())
                .await
                .map_err(SimError::store)?;
            self.sink.publish_track_event(record.id, &event);
            info!(shipment = %record.id, %hub, "passed through hub");
        }
        Ok(())
    }

    // ── Path-end finalisation ─────────────────────────────────────────────

    /// The shipment consumed its whole path — apply the state machine.
    async fn finalize(&self, record: &Shipment) -> SimResult<()> {
        if record.same_city || record.status == ShipmentStatus::Delivering {
            self.deliver(record).await
        } else {
            self.arrive_at_hub(record).await
        }
    }

    /// `shipped → delivered` (same-city) or `delivering → delivered`.
    async fn deliver(&self, record: &Shipment) -> SimResult<()> {
        let id = record.id;

        // Terminal event appears at most once, even if finalisation runs
        // again on a resumed or inconsistently-stored shipment.
        if !record.has_delivered_event() {
            let event = TrackEvent::system(
                record.dest_address.clone(),
                "快件已签收，感谢您的耐心等待",
                ShipmentStatus::Delivered,
            );
            self.store
                .append_event(id, event.clone())
                .await
                .map_err(SimError::store)?;
            self.sink.publish_track_event(id, &event);
        }

        let mut patch = ShipmentPatch::status(ShipmentStatus::Delivered);
        patch.current_position = record.path.last().copied();
        self.store.update_fields(id, patch).await.map_err(SimError::store)?;
        self.publish_status(id).await;
        info!(shipment = %id, order = %record.order_id, "delivered");

        // Best-effort order update: fire-and-forget, never retried here.
        let orders = Arc::clone(&self.orders);
        let order_id = record.order_id;
        tokio::spawn(async move {
            if let Err(error) = orders.mark_delivered(order_id).await {
                warn!(order = %order_id, %error, "failed to mark order delivered");
            }
        });
        Ok(())
    }

    /// `shipped → waiting_for_delivery` (cross-city hub arrival).
    async fn arrive_at_hub(&self, record: &Shipment) -> SimResult<()> {
        let id = record.id;
        let hub = record
            .district_hub
            .clone()
            .unwrap_or_else(|| record.dest_address.clone());

        // Issued once; a resume after a partial arrival keeps the old code.
        let pickup = record.pickup.clone().unwrap_or_else(PickupCode::issue);

        let mut patch = ShipmentPatch::status(ShipmentStatus::WaitingForDelivery);
        patch.current_position = record.path.last().copied();
        patch.hub_arrival_at = Some(Utc::now());
        patch.pickup = Some(pickup.clone());
        self.store.update_fields(id, patch).await.map_err(SimError::store)?;

        let event = TrackEvent::system(
            hub.clone(),
            format!("快件已到达 {hub}，等待派送，取件码 {}", pickup.code),
            ShipmentStatus::WaitingForDelivery,
        );
        self.store.append_event(id, event.clone()).await.map_err(SimError::store)?;
        self.sink.publish_track_event(id, &event);
        self.publish_status(id).await;
        info!(shipment = %id, %hub, "arrived at district hub");

        if record.district_hub.is_none() {
            warn!(shipment = %id, "no district hub parsed; only the periodic scan can dispatch it");
        } else if let Some(tx) = &self.hub_check {
            // Dropped receiver just means no scheduler is running.
            let _ = tx.send(hub);
        }
        Ok(())
    }

    /// Publish a status change with the current full record.
    async fn publish_status(&self, shipment: ShipmentId) {
        if let Ok(Some(record)) = self.store.find_by_id(shipment).await {
            self.sink.publish_status(shipment, record.status, &record);
        }
    }
}
