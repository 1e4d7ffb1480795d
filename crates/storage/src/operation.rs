// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operations persisted to the store WALs

use crate::secondary::SecondaryRecord;
use serde::{Deserialize, Serialize};
use ts_core::TradeRecord;

/// Primary store operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimaryOp {
    /// Write a record instance (first write or expired-flag update)
    Save { record: TradeRecord },
}

/// Secondary store operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecondaryOp {
    /// Insert or replace a denormalized row
    Upsert { row: SecondaryRecord },
}
