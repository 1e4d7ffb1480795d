// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Primary (authoritative) trade store

use crate::error::StoreError;
use crate::operation::PrimaryOp;
use crate::state::PrimaryState;
use crate::wal::Wal;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::Path;
use std::sync::{Arc, Mutex};
use ts_core::TradeRecord;

/// Authoritative store for trade records.
///
/// All validation reads go here. `insert` is the only way a new record
/// instance enters the store and is an atomic compare-and-set.
#[async_trait]
pub trait PrimaryStore: Clone + Send + Sync + 'static {
    async fn get(&self, trade_id: &str, version: u32) -> Result<Option<TradeRecord>, StoreError>;

    /// All versions of a trade, newest first
    async fn get_all_versions(&self, trade_id: &str) -> Result<Vec<TradeRecord>, StoreError>;

    async fn get_all(&self) -> Result<Vec<TradeRecord>, StoreError>;

    /// Non-expired records whose maturity date is before `as_of`
    async fn get_expired_candidates(
        &self,
        as_of: NaiveDate,
    ) -> Result<Vec<TradeRecord>, StoreError>;

    /// Store a new record instance, failing with a conflict if any version
    /// at or above `record.version` is already stored for the trade
    async fn insert(&self, record: &TradeRecord) -> Result<(), StoreError>;

    /// Rewrite an existing, still active record instance. Fails with
    /// `AlreadyExpired` when the stored copy is already expired, so only one
    /// of several racing expiries commits.
    async fn save(&self, record: &TradeRecord) -> Result<(), StoreError>;
}

struct Inner {
    wal: Option<Wal<PrimaryOp>>,
    state: PrimaryState,
}

impl Inner {
    fn commit(&mut self, op: PrimaryOp) -> Result<(), StoreError> {
        // Log first so a failed append leaves the state untouched
        if let Some(wal) = self.wal.as_mut() {
            wal.append(&op)?;
        }
        self.state.apply(&op);
        Ok(())
    }
}

/// Primary store backed by a write-ahead log and an in-memory materialized view.
///
/// Writes append and sync the log while holding a std mutex, blocking the
/// calling worker thread for the duration of the fsync.
#[derive(Clone)]
pub struct WalPrimaryStore {
    inner: Arc<Mutex<Inner>>,
}

impl WalPrimaryStore {
    /// Open the store at `path`, replaying any existing log
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let mut state = PrimaryState::default();
        for op in Wal::<PrimaryOp>::replay(path)? {
            state.apply(&op);
        }
        let wal = Wal::open(path)?;
        Ok(Self::from_parts(Some(wal), state))
    }

    /// A store with no durable log
    pub fn in_memory() -> Self {
        Self::from_parts(None, PrimaryState::default())
    }

    fn from_parts(wal: Option<Wal<PrimaryOp>>, state: PrimaryState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner { wal, state })),
        }
    }

    /// Number of stored record instances
    pub fn len(&self) -> usize {
        self.read(|state| state.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read<R>(&self, f: impl FnOnce(&PrimaryState) -> R) -> R {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&inner.state)
    }
}

#[async_trait]
impl PrimaryStore for WalPrimaryStore {
    async fn get(&self, trade_id: &str, version: u32) -> Result<Option<TradeRecord>, StoreError> {
        Ok(self.read(|state| state.get(trade_id, version).cloned()))
    }

    async fn get_all_versions(&self, trade_id: &str) -> Result<Vec<TradeRecord>, StoreError> {
        Ok(self.read(|state| state.versions(trade_id)))
    }

    async fn get_all(&self) -> Result<Vec<TradeRecord>, StoreError> {
        Ok(self.read(PrimaryState::all))
    }

    async fn get_expired_candidates(
        &self,
        as_of: NaiveDate,
    ) -> Result<Vec<TradeRecord>, StoreError> {
        Ok(self.read(|state| state.expiry_candidates(as_of)))
    }

    async fn insert(&self, record: &TradeRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.state.check_insert(record)?;
        inner.commit(PrimaryOp::Save {
            record: record.clone(),
        })
    }

    async fn save(&self, record: &TradeRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.state.check_save(record)?;
        inner.commit(PrimaryOp::Save {
            record: record.clone(),
        })
    }
}

#[cfg(test)]
#[path = "primary_tests.rs"]
mod tests;
