// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake stores for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::error::StoreError;
use crate::operation::{PrimaryOp, SecondaryOp};
use crate::primary::PrimaryStore;
use crate::secondary::{SecondaryRecord, SecondaryStore};
use crate::state::{PrimaryState, SecondaryState};
use crate::wal::WalError;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::io;
use std::sync::{Arc, Mutex};
use ts_core::{TradeKey, TradeRecord};

/// Recorded primary store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryCall {
    Get(TradeKey),
    GetAllVersions(String),
    GetAll,
    GetExpiredCandidates(NaiveDate),
    Insert(TradeKey),
    Save(TradeKey),
}

impl PrimaryCall {
    pub fn is_write(&self) -> bool {
        matches!(self, PrimaryCall::Insert(_) | PrimaryCall::Save(_))
    }
}

#[derive(Default)]
struct PrimaryFailures {
    reads: bool,
    inserts: bool,
    saves: bool,
    save_keys: HashSet<TradeKey>,
    stale_reads: bool,
    panic_candidates: bool,
    frozen_candidates: Option<Option<Vec<TradeRecord>>>,
}

#[derive(Default)]
struct FakePrimaryInner {
    state: PrimaryState,
    calls: Vec<PrimaryCall>,
    failures: PrimaryFailures,
}

/// In-memory primary store with call recording and failure injection
#[derive(Clone, Default)]
pub struct FakePrimaryStore {
    inner: Arc<Mutex<FakePrimaryInner>>,
}

impl FakePrimaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakePrimaryInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Put a record straight into the store, skipping every check
    pub fn seed(&self, record: TradeRecord) {
        self.lock().state.apply(&PrimaryOp::Save { record });
    }

    /// Snapshot of every stored record
    pub fn records(&self) -> Vec<TradeRecord> {
        self.lock().state.all()
    }

    pub fn record(&self, trade_id: &str, version: u32) -> Option<TradeRecord> {
        self.lock().state.get(trade_id, version).cloned()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<PrimaryCall> {
        self.lock().calls.clone()
    }

    pub fn write_calls(&self) -> Vec<PrimaryCall> {
        self.calls().into_iter().filter(PrimaryCall::is_write).collect()
    }

    /// Make every read fail
    pub fn fail_reads(&self, fail: bool) {
        self.lock().failures.reads = fail;
    }

    /// Make every insert fail
    pub fn fail_inserts(&self, fail: bool) {
        self.lock().failures.inserts = fail;
    }

    /// Make every save fail
    pub fn fail_saves(&self, fail: bool) {
        self.lock().failures.saves = fail;
    }

    /// Make saves of one record identity fail
    pub fn fail_save_of(&self, key: TradeKey) {
        self.lock().failures.save_keys.insert(key);
    }

    /// Make version reads return nothing, as if another writer's insert had
    /// not been visible yet
    pub fn stale_reads(&self, stale: bool) {
        self.lock().failures.stale_reads = stale;
    }

    /// Make candidate queries panic
    pub fn panic_on_candidates(&self, panic: bool) {
        self.lock().failures.panic_candidates = panic;
    }

    /// Make candidate queries keep returning the first result taken after
    /// this call, as if another sweep had fetched the same list
    pub fn freeze_candidates(&self) {
        self.lock().failures.frozen_candidates = Some(None);
    }
}

fn unavailable(what: &str) -> StoreError {
    StoreError::Wal(WalError::Io(io::Error::other(format!(
        "injected {} failure",
        what
    ))))
}

#[async_trait]
impl PrimaryStore for FakePrimaryStore {
    async fn get(&self, trade_id: &str, version: u32) -> Result<Option<TradeRecord>, StoreError> {
        let mut inner = self.lock();
        inner
            .calls
            .push(PrimaryCall::Get(TradeKey::new(trade_id, version)));
        if inner.failures.reads {
            return Err(unavailable("read"));
        }
        Ok(inner.state.get(trade_id, version).cloned())
    }

    async fn get_all_versions(&self, trade_id: &str) -> Result<Vec<TradeRecord>, StoreError> {
        let mut inner = self.lock();
        inner
            .calls
            .push(PrimaryCall::GetAllVersions(trade_id.to_string()));
        if inner.failures.reads {
            return Err(unavailable("read"));
        }
        if inner.failures.stale_reads {
            return Ok(Vec::new());
        }
        Ok(inner.state.versions(trade_id))
    }

    async fn get_all(&self) -> Result<Vec<TradeRecord>, StoreError> {
        let mut inner = self.lock();
        inner.calls.push(PrimaryCall::GetAll);
        if inner.failures.reads {
            return Err(unavailable("read"));
        }
        Ok(inner.state.all())
    }

    #[allow(clippy::panic)]
    async fn get_expired_candidates(
        &self,
        as_of: NaiveDate,
    ) -> Result<Vec<TradeRecord>, StoreError> {
        let mut inner = self.lock();
        inner.calls.push(PrimaryCall::GetExpiredCandidates(as_of));
        if inner.failures.panic_candidates {
            drop(inner);
            panic!("injected candidate query panic");
        }
        if inner.failures.reads {
            return Err(unavailable("read"));
        }
        let current = inner.state.expiry_candidates(as_of);
        match &mut inner.failures.frozen_candidates {
            Some(Some(frozen)) => Ok(frozen.clone()),
            Some(slot @ None) => Ok(slot.insert(current).clone()),
            None => Ok(current),
        }
    }

    async fn insert(&self, record: &TradeRecord) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.calls.push(PrimaryCall::Insert(record.key()));
        if inner.failures.inserts {
            return Err(unavailable("insert"));
        }
        inner.state.check_insert(record)?;
        inner.state.apply(&PrimaryOp::Save {
            record: record.clone(),
        });
        Ok(())
    }

    async fn save(&self, record: &TradeRecord) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.calls.push(PrimaryCall::Save(record.key()));
        if inner.failures.saves || inner.failures.save_keys.contains(&record.key()) {
            return Err(unavailable("save"));
        }
        inner.state.check_save(record)?;
        inner.state.apply(&PrimaryOp::Save {
            record: record.clone(),
        });
        Ok(())
    }
}

#[derive(Default)]
struct FakeSecondaryInner {
    state: SecondaryState,
    saves: Vec<TradeKey>,
    fail_writes: bool,
}

/// In-memory secondary store with call recording and failure injection
#[derive(Clone, Default)]
pub struct FakeSecondaryStore {
    inner: Arc<Mutex<FakeSecondaryInner>>,
}

impl FakeSecondaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeSecondaryInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Identities passed to `save`, including failed attempts
    pub fn saves(&self) -> Vec<TradeKey> {
        self.lock().saves.clone()
    }

    pub fn rows(&self) -> Vec<SecondaryRecord> {
        self.lock().state.all()
    }

    pub fn row(&self, key: &TradeKey) -> Option<SecondaryRecord> {
        self.lock().state.get(key).cloned()
    }

    /// Make every write fail
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }
}

#[async_trait]
impl SecondaryStore for FakeSecondaryStore {
    async fn save(&self, record: &TradeRecord) -> Result<SecondaryRecord, StoreError> {
        let mut inner = self.lock();
        inner.saves.push(record.key());
        if inner.fail_writes {
            return Err(unavailable("secondary write"));
        }
        let row = SecondaryRecord::from_trade(inner.state.row_id_for(&record.key()), record);
        inner.state.apply(&SecondaryOp::Upsert { row: row.clone() });
        Ok(row)
    }

    async fn get_all(&self) -> Result<Vec<SecondaryRecord>, StoreError> {
        Ok(self.lock().state.all())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
