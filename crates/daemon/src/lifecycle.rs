// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, shutdown, recovery.

use std::fs::File;
use std::io::Write;
use std::time::Instant;

use fs2::FileExt;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use ts_adapters::{BusError, JsonlBusAdapter, NoOpBusAdapter, TracedBusAdapter};
use ts_core::{BusKind, Config, ConfigError, SystemClock, UuidIdGen};
use ts_engine::{EventPublisher, PublisherConfig, SweepSupervisor, TradeService};
use ts_storage::{StoreError, WalPrimaryStore, WalSecondaryStore};

/// Trade service with the daemon's concrete stores
pub type DaemonService = TradeService<WalPrimaryStore, WalSecondaryStore, SystemClock, UuidIdGen>;

/// Daemon state during operation
pub struct DaemonState {
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    pub service: DaemonService,
    shutdown_tx: watch::Sender<bool>,
    supervisor: Option<JoinHandle<()>>,
    /// When daemon started
    pub start_time: Instant,
}

impl DaemonState {
    /// Shutdown the daemon gracefully
    pub async fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");

        // 1. Stop the sweep schedule; a run in progress finishes first
        let _ = self.shutdown_tx.send(true);
        if let Some(supervisor) = self.supervisor.take() {
            if let Err(e) = supervisor.await {
                warn!("Sweep supervisor ended abnormally: {}", e);
            }
        }

        // 2. Deliver queued events
        self.service.publisher().shutdown().await;

        // 3. Remove PID file
        if self.config.lock_path().exists() {
            if let Err(e) = std::fs::remove_file(self.config.lock_path()) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        // 4. Lock file is released automatically when self.lock_file is dropped

        info!(
            uptime_secs = self.start_time.elapsed().as_secs(),
            "Daemon shutdown complete"
        );
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine log directory")]
    NoLogDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Bus error: {0}")]
    Bus(#[from] BusError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon
pub async fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    match startup_inner(config).await {
        Ok(state) => Ok(state),
        Err(e) => {
            // Another daemon owns the lock file; leave it alone
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

/// Inner startup logic - cleanup_on_failure called if this fails
async fn startup_inner(config: &Config) -> Result<DaemonState, LifecycleError> {
    // 1. Create data directory
    std::fs::create_dir_all(&config.data_dir)?;

    // 2. Acquire lock file FIRST - prevents two daemons replaying the same WALs
    let mut lock_file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(config.lock_path())?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    // Write PID to lock file
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    // 3. Load stores from their WALs
    let primary = WalPrimaryStore::open(&config.primary_wal_path())?;
    let secondary = WalSecondaryStore::open(&config.secondary_wal_path())?;

    info!(
        "Loaded stores: {} primary records, {} secondary rows",
        primary.len(),
        secondary.len()
    );

    // 4. Reconcile (log warnings only)
    reconcile_stores(&primary, &secondary);

    // 5. Set up the bus (wrapped with tracing for observability)
    let publisher_config = PublisherConfig::from(&config.bus);
    let publisher = match config.bus.kind {
        BusKind::Jsonl => {
            let bus = TracedBusAdapter::new(JsonlBusAdapter::open(&config.bus_path())?);
            info!("Publishing events to {}", config.bus_path().display());
            EventPublisher::spawn(bus, publisher_config, SystemClock, UuidIdGen)
        }
        BusKind::None => {
            info!("Event publishing disabled");
            EventPublisher::spawn(
                TracedBusAdapter::new(NoOpBusAdapter::new()),
                publisher_config,
                SystemClock,
                UuidIdGen,
            )
        }
    };

    // 6. Create service
    let service = TradeService::new(primary, secondary, publisher, SystemClock);

    // 7. Start the sweep schedule
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let supervisor = if config.sweep.enabled {
        let supervisor =
            SweepSupervisor::new(service.sweeper().clone(), config.sweep.schedule, SystemClock)
                .run_on_startup(config.sweep.run_on_startup);
        Some(supervisor.spawn(shutdown_rx))
    } else {
        info!("Expiration sweep disabled");
        None
    };

    info!("Daemon started with data dir: {}", config.data_dir.display());

    Ok(DaemonState {
        config: config.clone(),
        lock_file,
        service,
        shutdown_tx,
        supervisor,
        start_time: Instant::now(),
    })
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &Config) {
    // Remove PID/lock file
    if config.lock_path().exists() {
        let _ = std::fs::remove_file(config.lock_path());
    }
}

/// Compare the stores after replay
///
/// The secondary store is written after the primary, so a crash between the
/// two writes leaves it behind. That is tolerated; it is only reported here.
fn reconcile_stores(primary: &WalPrimaryStore, secondary: &WalSecondaryStore) {
    if primary.len() != secondary.len() {
        warn!(
            "Secondary store has {} rows for {} primary records (lagging copy)",
            secondary.len(),
            primary.len()
        );
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
