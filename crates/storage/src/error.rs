// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store error types

use crate::WalError;
use thiserror::Error;
use ts_core::TradeKey;

/// Errors returned by primary and secondary stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("wal error: {0}")]
    Wal(#[from] WalError),
    #[error("trade {0} already exists")]
    VersionExists(TradeKey),
    #[error("trade {key} is not newer than stored version {latest}")]
    StaleVersion { key: TradeKey, latest: u32 },
    #[error("trade {0} not found")]
    NotFound(TradeKey),
    #[error("trade {0} is expired and cannot be reactivated")]
    ExpiredReversal(TradeKey),
    #[error("trade {0} is already expired")]
    AlreadyExpired(TradeKey),
}

impl StoreError {
    /// True when an insert lost the compare-and-set against stored versions
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::VersionExists(_) | StoreError::StaleVersion { .. }
        )
    }
}
