// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trade records and their identity
//!
//! A trade is an immutable, versioned record. `(trade_id, version)` names one
//! record instance; a new version is a new instance, never an update in place.
//! The only mutation a stored record ever sees is the `expired` flag flipping
//! from `false` to `true`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identity of one trade record instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TradeKey {
    pub trade_id: String,
    pub version: u32,
}

impl TradeKey {
    pub fn new(trade_id: impl Into<String>, version: u32) -> Self {
        Self {
            trade_id: trade_id.into(),
            version,
        }
    }
}

impl fmt::Display for TradeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:v{}", self.trade_id, self.version)
    }
}

/// A trade as submitted by a caller, before the system stamps it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTrade {
    pub trade_id: String,
    pub version: u32,
    pub counter_party_id: String,
    pub book_id: String,
    pub maturity_date: NaiveDate,
}

impl NewTrade {
    pub fn new(
        trade_id: impl Into<String>,
        version: u32,
        counter_party_id: impl Into<String>,
        book_id: impl Into<String>,
        maturity_date: NaiveDate,
    ) -> Self {
        Self {
            trade_id: trade_id.into(),
            version,
            counter_party_id: counter_party_id.into(),
            book_id: book_id.into(),
            maturity_date,
        }
    }

    pub fn key(&self) -> TradeKey {
        TradeKey::new(self.trade_id.clone(), self.version)
    }

    /// Stamp the submission as accepted on `created_date`
    pub fn accept(self, created_date: NaiveDate) -> TradeRecord {
        TradeRecord {
            trade_id: self.trade_id,
            version: self.version,
            counter_party_id: self.counter_party_id,
            book_id: self.book_id,
            maturity_date: self.maturity_date,
            created_date,
            expired: false,
        }
    }
}

/// A stored trade record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub trade_id: String,
    pub version: u32,
    pub counter_party_id: String,
    pub book_id: String,
    pub maturity_date: NaiveDate,
    pub created_date: NaiveDate,
    #[serde(default)]
    pub expired: bool,
}

impl TradeRecord {
    pub fn key(&self) -> TradeKey {
        TradeKey::new(self.trade_id.clone(), self.version)
    }

    pub fn state(&self) -> TradeState {
        if self.expired {
            TradeState::Expired
        } else {
            TradeState::Active
        }
    }

    /// True when the maturity date lies strictly before `as_of` and the
    /// record has not been expired yet.
    pub fn is_due_for_expiry(&self, as_of: NaiveDate) -> bool {
        !self.expired && self.maturity_date < as_of
    }

    /// The same record with the expired flag set
    pub fn into_expired(self) -> Self {
        Self {
            expired: true,
            ..self
        }
    }
}

impl fmt::Display for TradeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (book {}, cp {}, matures {}, {})",
            self.key(),
            self.book_id,
            self.counter_party_id,
            self.maturity_date,
            self.state()
        )
    }
}

/// Lifecycle state of a stored record. `Expired` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeState {
    Active,
    Expired,
}

impl fmt::Display for TradeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeState::Active => write!(f, "active"),
            TradeState::Expired => write!(f, "expired"),
        }
    }
}

#[cfg(test)]
#[path = "trade_tests.rs"]
mod tests;
