// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state from WAL replay

use crate::error::StoreError;
use crate::operation::{PrimaryOp, SecondaryOp};
use crate::secondary::SecondaryRecord;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use ts_core::{TradeKey, TradeRecord};

/// Primary records, grouped by trade id and ordered by version
#[derive(Debug, Default, Clone)]
pub struct PrimaryState {
    trades: HashMap<String, BTreeMap<u32, TradeRecord>>,
}

impl PrimaryState {
    /// Apply an operation to update the state
    pub fn apply(&mut self, op: &PrimaryOp) {
        match op {
            PrimaryOp::Save { record } => {
                self.trades
                    .entry(record.trade_id.clone())
                    .or_default()
                    .insert(record.version, record.clone());
            }
        }
    }

    pub fn get(&self, trade_id: &str, version: u32) -> Option<&TradeRecord> {
        self.trades.get(trade_id)?.get(&version)
    }

    /// Highest stored version of a trade
    pub fn latest(&self, trade_id: &str) -> Option<&TradeRecord> {
        self.trades.get(trade_id)?.values().next_back()
    }

    /// All versions of a trade, newest first
    pub fn versions(&self, trade_id: &str) -> Vec<TradeRecord> {
        self.trades
            .get(trade_id)
            .map(|versions| versions.values().rev().cloned().collect())
            .unwrap_or_default()
    }

    /// Every record, ordered by trade id then newest version first
    pub fn all(&self) -> Vec<TradeRecord> {
        let mut ids: Vec<_> = self.trades.keys().collect();
        ids.sort();
        ids.into_iter().flat_map(|id| self.versions(id)).collect()
    }

    /// Non-expired records whose maturity date is before `as_of`
    pub fn expiry_candidates(&self, as_of: NaiveDate) -> Vec<TradeRecord> {
        self.all()
            .into_iter()
            .filter(|r| r.is_due_for_expiry(as_of))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.trades.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Precondition for a first write: no stored version at or above this one
    pub fn check_insert(&self, record: &TradeRecord) -> Result<(), StoreError> {
        let Some(versions) = self.trades.get(&record.trade_id) else {
            return Ok(());
        };
        if versions.contains_key(&record.version) {
            return Err(StoreError::VersionExists(record.key()));
        }
        match versions.keys().next_back() {
            Some(&latest) if latest > record.version => Err(StoreError::StaleVersion {
                key: record.key(),
                latest,
            }),
            _ => Ok(()),
        }
    }

    /// Precondition for rewriting a stored record: it must exist and must
    /// not be expired yet. Expiry is terminal, so the stored flag decides,
    /// never the caller's copy.
    pub fn check_save(&self, record: &TradeRecord) -> Result<(), StoreError> {
        match self.get(&record.trade_id, record.version) {
            None => Err(StoreError::NotFound(record.key())),
            Some(stored) if stored.expired && record.expired => {
                Err(StoreError::AlreadyExpired(record.key()))
            }
            Some(stored) if stored.expired => Err(StoreError::ExpiredReversal(record.key())),
            Some(_) => Ok(()),
        }
    }
}

/// Secondary rows, keyed by surrogate row id
#[derive(Debug, Default, Clone)]
pub struct SecondaryState {
    rows: BTreeMap<u64, SecondaryRecord>,
    by_key: HashMap<TradeKey, u64>,
}

impl SecondaryState {
    /// Apply an operation to update the state
    pub fn apply(&mut self, op: &SecondaryOp) {
        match op {
            SecondaryOp::Upsert { row } => {
                self.by_key.insert(row.key(), row.row_id);
                self.rows.insert(row.row_id, row.clone());
            }
        }
    }

    /// Row id for a trade identity, assigning the next free one if unseen
    pub fn row_id_for(&self, key: &TradeKey) -> u64 {
        match self.by_key.get(key) {
            Some(id) => *id,
            None => self.rows.keys().next_back().map_or(1, |last| last + 1),
        }
    }

    pub fn get(&self, key: &TradeKey) -> Option<&SecondaryRecord> {
        self.rows.get(self.by_key.get(key)?)
    }

    /// Every row in row-id order
    pub fn all(&self) -> Vec<SecondaryRecord> {
        self.rows.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
