//! `Dispatcher` — hub evaluation and batch last-mile dispatch.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use chrono::Utc;
use st_core::{geo, EngineConfig, GeoPoint, Shipment, ShipmentId, ShipmentStatus, TrackEvent};
use st_events::EventSink;
use st_provider::{fallback, RouteProvider, RouteStrategy};
use st_sim::SimEngine;
use st_store::{OrderService, ShipmentPatch, ShipmentStore};
use tokio::{sync::mpsc, time::MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{DispatchError, DispatchResult};

/// The dispatch scheduler.
///
/// Watches district hubs for shipments in `waiting_for_delivery` and, once
/// a hub's trigger condition holds, routes one courier tour over the whole
/// batch and hands the shipments back to the simulation engine as
/// `delivering`.
pub struct Dispatcher<S, O, E, P> {
    engine:   Arc<SimEngine<S, O, E>>,
    store:    Arc<S>,
    provider: Arc<P>,
    sink:     Arc<E>,
    config:   EngineConfig,

    /// Hubs with a batch evaluation or post-batch cooldown in flight.
    busy: Mutex<HashSet<String>>,
}

impl<S, O, E, P> Dispatcher<S, O, E, P>
where
    S: ShipmentStore + 'static,
    O: OrderService + 'static,
    E: EventSink + 'static,
    P: RouteProvider + 'static,
{
    pub fn new(
        engine:   Arc<SimEngine<S, O, E>>,
        store:    Arc<S>,
        provider: Arc<P>,
        sink:     Arc<E>,
    ) -> Self {
        let config = engine.config().clone();
        Self { engine, store, provider, sink, config, busy: Mutex::new(HashSet::new()) }
    }

    // ── Scheduler loop ────────────────────────────────────────────────────

    /// Run the scheduler until its task is cancelled.
    ///
    /// Hubs are evaluated on a fixed scan period and immediately on each
    /// hub-arrival notification from the engine.  A closed notification
    /// channel leaves the periodic scan as the only trigger.
    pub async fn run(self: Arc<Self>, mut hub_checks: mpsc::UnboundedReceiver<String>) {
        let mut scan = tokio::time::interval(self.config.scan_period());
        scan.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(period_ms = self.config.scan_period_ms, "dispatch scheduler running");

        loop {
            tokio::select! {
                _ = scan.tick() => self.scan_once().await,
                Some(hub) = hub_checks.recv() => {
                    debug!(%hub, "hub arrival notification");
                    if let Err(error) = self.check_hub(&hub).await {
                        warn!(%hub, %error, "hub check failed");
                    }
                }
            }
        }
    }

    /// One pass over every hub that currently holds waiting shipments.
    async fn scan_once(self: &Arc<Self>) {
        let status = ShipmentStatus::WaitingForDelivery;
        let hubs = match self.store.distinct_hubs_with_status(status).await {
            Ok(hubs) => hubs,
            Err(error) => {
                warn!(%error, "hub scan query failed");
                return;
            }
        };
        for hub in hubs {
            if let Err(error) = self.check_hub(&hub).await {
                warn!(%hub, %error, "hub check failed");
            }
        }
    }

    // ── Hub evaluation ────────────────────────────────────────────────────

    /// Evaluate one hub and dispatch a batch if its trigger condition
    /// holds.
    ///
    /// At most one evaluation per hub runs at a time; a concurrent call
    /// for the same hub returns immediately without touching the batch.
    pub async fn check_hub(self: &Arc<Self>, hub: &str) -> DispatchResult<()> {
        if !self.busy_guard().insert(hub.to_string()) {
            debug!(%hub, "hub already being dispatched, skipping");
            return Ok(());
        }

        let outcome = self.dispatch_if_due(hub).await;
        match &outcome {
            Ok(true) => {
                // Hold the hub lock through the cooldown so the scans that
                // land right behind the batch don't re-evaluate stale state.
                let dispatcher = Arc::clone(self);
                let hub = hub.to_string();
                tokio::spawn(async move {
                    tokio::time::sleep(dispatcher.config.unlock_cooldown()).await;
                    dispatcher.busy_guard().remove(&hub);
                });
            }
            _ => {
                self.busy_guard().remove(hub);
            }
        }
        outcome.map(|_| ())
    }

    fn busy_guard(&self) -> MutexGuard<'_, HashSet<String>> {
        self.busy.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if a batch was dispatched.
    ///
    /// The trigger is either capacity (at least `hub_capacity` waiting
    /// shipments) or age (any shipment waiting longer than
    /// `hub_timeout_secs`), whichever comes first.
    async fn dispatch_if_due(&self, hub: &str) -> DispatchResult<bool> {
        let waiting = self
            .store
            .find_by_hub_and_status(hub, ShipmentStatus::WaitingForDelivery)
            .await
            .map_err(DispatchError::store)?;
        if waiting.is_empty() {
            return Ok(false);
        }

        let now = Utc::now();
        let timed_out = waiting.iter().any(|s| {
            s.hub_arrival_at
                .is_some_and(|at| (now - at).num_seconds() >= self.config.hub_timeout_secs)
        });
        if waiting.len() < self.config.hub_capacity && !timed_out {
            debug!(%hub, waiting = waiting.len(), "below capacity and nothing timed out");
            return Ok(false);
        }

        info!(%hub, count = waiting.len(), timed_out, "dispatching batch");
        self.dispatch_batch(hub, &waiting).await;
        Ok(true)
    }

    // ── Batch dispatch ────────────────────────────────────────────────────

    /// Route one courier tour over the whole batch and flip every shipment
    /// to `delivering`.
    ///
    /// The tour starts at the centroid of the batch's current positions
    /// (the hub, for all practical purposes) and visits every destination
    /// in greedy nearest-neighbour order.  Each shipment's new path is its
    /// trunk path plus the tour prefix that ends at its own destination.
    ///
    /// A store write failing for one shipment (deleted out from under the
    /// batch, say) skips that stop only; the rest of the tour still goes
    /// out, and everything that did flip to `delivering` is re-armed.
    async fn dispatch_batch(&self, hub: &str, waiting: &[Shipment]) {
        let positions: Vec<GeoPoint> = waiting.iter().map(|s| s.current_position).collect();
        let Some(start) = geo::centroid(&positions) else {
            return;
        };
        let eps = self.config.splice_epsilon_deg;

        let order = nearest_neighbour_tour(start, waiting);
        let mut pacer = CallPacer::new(self.config.provider_delay());

        let mut tour = vec![start];
        let mut prev = start;
        let mut dispatched: Vec<ShipmentId> = Vec::with_capacity(order.len());

        for (seq, &idx) in order.iter().enumerate() {
            let shipment = &waiting[idx];
            pacer.pace().await;
            let leg = fallback::route_or_line(
                self.provider.as_ref(),
                prev,
                shipment.dest,
                RouteStrategy::Fastest,
                self.config.fallback_line_steps,
            )
            .await;
            geo::splice_append(&mut tour, leg, eps);
            prev = shipment.dest;

            let mut path = shipment.path.clone();
            geo::splice_append(&mut path, tour.clone(), eps);

            let mut patch = ShipmentPatch::status(ShipmentStatus::Delivering);
            patch.path = Some(geo::downsample(&path, self.config.max_path_points));
            patch.current_position = Some(start);
            patch.batch_seq = Some(seq as u32);
            if let Err(error) = self.store.update_fields(shipment.id, patch).await {
                warn!(shipment = %shipment.id, %error, "batch update failed, skipping shipment");
                continue;
            }
            dispatched.push(shipment.id);

            let event = TrackEvent::system(
                hub.to_string(),
                "快件已安排派送，派件员正在派送途中",
                ShipmentStatus::Delivering,
            );
            match self.store.append_event(shipment.id, event.clone()).await {
                Ok(()) => self.sink.publish_track_event(shipment.id, &event),
                Err(error) => {
                    warn!(shipment = %shipment.id, %error, "dispatch event not recorded");
                }
            }
            if let Ok(Some(record)) = self.store.find_by_id(shipment.id).await {
                self.sink.publish_status(shipment.id, record.status, &record);
            }
            debug!(shipment = %shipment.id, seq, "dispatched in batch");
        }

        // Let status-change subscribers settle before positions start
        // streaming again.
        tokio::time::sleep(self.config.rearm_settle()).await;
        for id in dispatched {
            self.engine.arm(id);
        }
    }
}

/// Concurrency-1 pacing gate for consecutive provider calls within a
/// batch.  The first call passes immediately; each subsequent call waits
/// until `delay` has elapsed since the previous one.
pub(crate) struct CallPacer {
    delay: Duration,
    last:  Option<tokio::time::Instant>,
}

impl CallPacer {
    pub(crate) fn new(delay: Duration) -> Self {
        Self { delay, last: None }
    }

    pub(crate) async fn pace(&mut self) {
        if let Some(last) = self.last {
            tokio::time::sleep_until(last + self.delay).await;
        }
        self.last = Some(tokio::time::Instant::now());
    }
}

/// Greedy nearest-neighbour visiting order over the batch's destination
/// coordinates, starting from `start`.  Every shipment appears exactly
/// once.
pub(crate) fn nearest_neighbour_tour(start: GeoPoint, shipments: &[Shipment]) -> Vec<usize> {
    let mut remaining: Vec<usize> = (0..shipments.len()).collect();
    let mut order = Vec::with_capacity(remaining.len());
    let mut at = start;

    while !remaining.is_empty() {
        let Some(pos) = (0..remaining.len()).min_by(|&i, &j| {
            let di = shipments[remaining[i]].dest.distance_m(at);
            let dj = shipments[remaining[j]].dest.distance_m(at);
            di.total_cmp(&dj)
        }) else {
            break;
        };
        let idx = remaining.swap_remove(pos);
        at = shipments[idx].dest;
        order.push(idx);
    }
    order
}
