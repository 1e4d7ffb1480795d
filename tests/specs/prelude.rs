//! Shared helpers for trade store specs

#![allow(dead_code)]

pub use chrono::NaiveDate;
pub use ts_core::{NewTrade, TradeRecord};
pub use ts_engine::{ErrorKind, SweepReport};

use tempfile::TempDir;
use ts_adapters::FakeBusAdapter;
use ts_core::{FakeClock, SequentialIdGen};
use ts_engine::{EventPublisher, PublisherConfig, TradeService};
use ts_storage::{PrimaryStore, WalPrimaryStore, WalSecondaryStore};

pub type SpecService = TradeService<WalPrimaryStore, WalSecondaryStore, FakeClock, SequentialIdGen>;

/// A trade store over a temporary data directory, frozen at 2026-10-16
pub struct Store {
    dir: TempDir,
    clock: FakeClock,
    bus: FakeBusAdapter,
    pub service: SpecService,
}

impl Store {
    pub fn empty() -> Self {
        let dir = TempDir::new().unwrap();
        let clock = FakeClock::on(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        let bus = FakeBusAdapter::new();
        let service = open_service(&dir, &clock, &bus);
        Self {
            dir,
            clock,
            bus,
            service,
        }
    }

    /// Stop the service and open a fresh one over the same WAL files
    pub async fn reopen(&mut self) {
        self.service.publisher().shutdown().await;
        self.service = open_service(&self.dir, &self.clock, &self.bus);
    }

    pub fn today(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    pub fn tomorrow(&self) -> NaiveDate {
        self.today().succ_opt().unwrap()
    }

    pub fn yesterday(&self) -> NaiveDate {
        self.today().pred_opt().unwrap()
    }

    pub fn trade(&self, trade_id: &str, version: u32, maturity: NaiveDate) -> NewTrade {
        NewTrade::new(trade_id, version, "CP-1", "B1", maturity)
    }

    /// Write a record straight into the primary store, skipping validation
    pub async fn seed(&self, record: TradeRecord) {
        self.service.primary().insert(&record).await.unwrap();
    }

    /// Published events as `(kind, key)` pairs, in delivery order
    pub async fn events(&self) -> Vec<(String, String)> {
        self.service.publisher().flush().await;
        self.bus
            .calls()
            .iter()
            .map(|call| {
                let kind = call.json()["kind"].as_str().unwrap_or_default().to_string();
                (kind, call.key.clone())
            })
            .collect()
    }

    pub async fn latest(&self, trade_id: &str) -> Option<TradeRecord> {
        self.service.get_latest(trade_id).await.unwrap()
    }

    pub async fn versions(&self, trade_id: &str) -> Vec<u32> {
        self.service
            .list_versions(trade_id)
            .await
            .unwrap()
            .iter()
            .map(|r| r.version)
            .collect()
    }
}

fn open_service(dir: &TempDir, clock: &FakeClock, bus: &FakeBusAdapter) -> SpecService {
    let primary = WalPrimaryStore::open(&dir.path().join("primary.wal")).unwrap();
    let secondary = WalSecondaryStore::open(&dir.path().join("secondary.wal")).unwrap();
    let publisher = EventPublisher::spawn(
        bus.clone(),
        PublisherConfig::default(),
        clock.clone(),
        SequentialIdGen::default(),
    );
    TradeService::new(primary, secondary, publisher, clock.clone())
}
