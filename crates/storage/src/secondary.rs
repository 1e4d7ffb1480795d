// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Secondary (derived) trade store
//!
//! Holds a denormalized copy of every record committed to the primary store,
//! keyed by a surrogate row id instead of the trade identity. Writes are
//! best-effort from the coordinator's point of view, so this store may lag.

use crate::error::StoreError;
use crate::operation::SecondaryOp;
use crate::state::SecondaryState;
use crate::wal::Wal;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use ts_core::{TradeKey, TradeRecord};

/// A flattened trade row with its own surrogate key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryRecord {
    pub row_id: u64,
    pub trade_id: String,
    pub version: u32,
    pub counter_party_id: String,
    pub book_id: String,
    pub maturity_date: NaiveDate,
    pub created_date: NaiveDate,
    pub expired: bool,
}

impl SecondaryRecord {
    pub fn from_trade(row_id: u64, record: &TradeRecord) -> Self {
        Self {
            row_id,
            trade_id: record.trade_id.clone(),
            version: record.version,
            counter_party_id: record.counter_party_id.clone(),
            book_id: record.book_id.clone(),
            maturity_date: record.maturity_date,
            created_date: record.created_date,
            expired: record.expired,
        }
    }

    pub fn key(&self) -> TradeKey {
        TradeKey::new(self.trade_id.clone(), self.version)
    }

    pub fn to_trade(&self) -> TradeRecord {
        TradeRecord {
            trade_id: self.trade_id.clone(),
            version: self.version,
            counter_party_id: self.counter_party_id.clone(),
            book_id: self.book_id.clone(),
            maturity_date: self.maturity_date,
            created_date: self.created_date,
            expired: self.expired,
        }
    }
}

/// Derived store written after every successful primary write
#[async_trait]
pub trait SecondaryStore: Clone + Send + Sync + 'static {
    /// Write the derived copy of `record`. A trade identity seen before
    /// updates its existing row; a new one gets the next row id.
    async fn save(&self, record: &TradeRecord) -> Result<SecondaryRecord, StoreError>;

    /// Every row, in row-id order
    async fn get_all(&self) -> Result<Vec<SecondaryRecord>, StoreError>;
}

struct Inner {
    wal: Option<Wal<SecondaryOp>>,
    state: SecondaryState,
}

/// Secondary store backed by its own write-ahead log. Like the primary, a
/// write holds the lock through the log fsync.
#[derive(Clone)]
pub struct WalSecondaryStore {
    inner: Arc<Mutex<Inner>>,
}

impl WalSecondaryStore {
    /// Open the store at `path`, replaying any existing log
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let mut state = SecondaryState::default();
        for op in Wal::<SecondaryOp>::replay(path)? {
            state.apply(&op);
        }
        let wal = Wal::open(path)?;
        Ok(Self::from_parts(Some(wal), state))
    }

    /// A store with no durable log
    pub fn in_memory() -> Self {
        Self::from_parts(None, SecondaryState::default())
    }

    fn from_parts(wal: Option<Wal<SecondaryOp>>, state: SecondaryState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner { wal, state })),
        }
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SecondaryStore for WalSecondaryStore {
    async fn save(&self, record: &TradeRecord) -> Result<SecondaryRecord, StoreError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let row_id = inner.state.row_id_for(&record.key());
        let op = SecondaryOp::Upsert {
            row: SecondaryRecord::from_trade(row_id, record),
        };
        if let Some(wal) = inner.wal.as_mut() {
            wal.append(&op)?;
        }
        inner.state.apply(&op);
        let SecondaryOp::Upsert { row } = op;
        Ok(row)
    }

    async fn get_all(&self) -> Result<Vec<SecondaryRecord>, StoreError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner.state.all())
    }
}

#[cfg(test)]
#[path = "secondary_tests.rs"]
mod tests;
