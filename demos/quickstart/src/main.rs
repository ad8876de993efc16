//! End-to-end walkthrough of the tracking engine.
//!
//! Plans two shipments against a fixture provider (no network), replays
//! them through the simulation engine, and lets the dispatch scheduler
//! batch the cross-city one out of its district hub.  Every signal the
//! engine publishes is echoed through tracing.
//!
//! ```
//! RUST_LOG=info cargo run -p quickstart
//! ```

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use st_core::{
    EngineConfig, GeoPoint, HubRegistry, OrderId, Shipment, ShipmentId, ShipmentStatus,
};
use st_dispatch::Dispatcher;
use st_events::{BroadcastSink, TrackSignal};
use st_plan::RoutePlanner;
use st_provider::StaticProvider;
use st_sim::SimEngine;
use st_store::{MemoryStore, NoopOrders, ShipmentStore};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

const BEIJING_ADDR: &str = "北京市朝阳区望京街10号";
const BEIJING_ADDR_2: &str = "北京市海淀区中关村大街1号";
const WUHAN_ADDR: &str = "湖北省武汉市洪山区珞瑜路1037号";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Demo timing: fast enough to watch, slow enough to read the log.
    let config = EngineConfig {
        tick_interval_ms:  100,
        scan_period_ms:    500,
        hub_capacity:      1,
        provider_delay_ms: 0,
        rearm_settle_ms:   50,
        unlock_cooldown_ms: 100,
        ..EngineConfig::default()
    };

    let provider = Arc::new(
        StaticProvider::new()
            .with_address(BEIJING_ADDR, GeoPoint::new(116.47, 39.99))
            .with_address(BEIJING_ADDR_2, GeoPoint::new(116.31, 39.98))
            .with_address(WUHAN_ADDR, GeoPoint::new(114.40, 30.51))
            .with_address("武汉", GeoPoint::new(114.305, 30.593)),
    );

    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(BroadcastSink::new(4096));
    let (hub_tx, hub_rx) = tokio::sync::mpsc::unbounded_channel();

    let engine = Arc::new(
        SimEngine::new(
            Arc::clone(&store),
            Arc::new(NoopOrders),
            Arc::clone(&sink),
            config.clone(),
        )
        .with_hub_check(hub_tx),
    );
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&engine),
        Arc::clone(&store),
        Arc::clone(&provider),
        Arc::clone(&sink),
    ));
    tokio::spawn(Arc::clone(&dispatcher).run(hub_rx));
    spawn_signal_logger(&sink);

    let planner = RoutePlanner::new(provider, HubRegistry::mainline(), config);

    // Cross-city: trunk leg through the transfer centres, then a hub wait
    // and a dispatched last mile.
    let plan = planner.plan(BEIJING_ADDR, WUHAN_ADDR, true).await?;
    let cross = store
        .create(plan.into_shipment(OrderId::new(), BEIJING_ADDR, WUHAN_ADDR))
        .await?;
    info!(shipment = %cross.id, points = cross.path.len(), "cross-city shipment created");
    engine.arm(cross.id);

    // Same-city: one leg, straight to delivered.
    let plan = planner.plan(BEIJING_ADDR, BEIJING_ADDR_2, false).await?;
    let local = store
        .create(plan.into_shipment(OrderId::new(), BEIJING_ADDR, BEIJING_ADDR_2))
        .await?;
    info!(shipment = %local.id, points = local.path.len(), "same-city shipment created");
    engine.arm(local.id);

    let local = wait_delivered(&store, local.id).await?;
    info!(shipment = %local.id, events = local.events.len(), "same-city delivered");

    let cross = wait_delivered(&store, cross.id).await?;
    let code = cross.pickup.as_ref().map(|p| p.code.as_str()).unwrap_or("-");
    info!(
        shipment = %cross.id,
        pickup_code = code,
        batch_seq = cross.batch_seq,
        events = cross.events.len(),
        "cross-city delivered"
    );

    for event in &cross.events {
        info!(at = %event.location, "  {}", event.description);
    }
    Ok(())
}

/// Echo every published signal through tracing.
fn spawn_signal_logger(sink: &BroadcastSink) {
    let mut rx = sink.subscribe();
    tokio::spawn(async move {
        while let Ok(signal) = rx.recv().await {
            match signal {
                TrackSignal::Position { shipment, coord } => {
                    info!(%shipment, %coord, "position");
                }
                TrackSignal::StatusChange { shipment, status, .. } => {
                    info!(%shipment, %status, "status change");
                }
                TrackSignal::EventAdded { shipment, event } => {
                    info!(%shipment, at = %event.location, "{}", event.description);
                }
            }
        }
    });
}

async fn wait_delivered(store: &MemoryStore, id: ShipmentId) -> Result<Shipment> {
    loop {
        tokio::time::sleep(Duration::from_millis(100)).await;
        if let Some(s) = store.find_by_id(id).await? {
            if s.status == ShipmentStatus::Delivered {
                return Ok(s);
            }
        }
    }
}
