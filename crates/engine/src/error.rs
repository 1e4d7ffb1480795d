// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the persistence pipeline

use thiserror::Error;
use ts_core::{Rejection, RejectionClass};
use ts_storage::StoreError;

/// Coarse classification of a failed submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller data is wrong; resubmitting unchanged will fail again
    Validation,
    /// The version lost against stored state
    Conflict,
    /// The primary store could not be read or written; safe to retry
    Persistence,
}

/// Errors returned by [`crate::Coordinator::submit`]
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("invalid trade: {0}")]
    Validation(Rejection),
    #[error("version conflict: {0}")]
    Conflict(Rejection),
    #[error("persistence failed: {0}")]
    Persistence(StoreError),
}

impl SubmitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SubmitError::Validation(_) => ErrorKind::Validation,
            SubmitError::Conflict(_) => ErrorKind::Conflict,
            SubmitError::Persistence(_) => ErrorKind::Persistence,
        }
    }
}

impl From<Rejection> for SubmitError {
    fn from(rejection: Rejection) -> Self {
        match rejection.class() {
            RejectionClass::Validation => SubmitError::Validation(rejection),
            RejectionClass::Conflict => SubmitError::Conflict(rejection),
        }
    }
}

/// A lost compare-and-set insert reads as the rejection the validator
/// would have produced against the winning write.
impl From<StoreError> for SubmitError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VersionExists(key) => SubmitError::Conflict(Rejection::DuplicateVersion {
                trade_id: key.trade_id,
                version: key.version,
            }),
            StoreError::StaleVersion { key, latest } => {
                SubmitError::Conflict(Rejection::NonMonotonicVersion {
                    trade_id: key.trade_id,
                    version: key.version,
                    latest,
                })
            }
            other => SubmitError::Persistence(other),
        }
    }
}

/// Errors returned by [`crate::Coordinator::expire`]
#[derive(Debug, Error)]
pub enum ExpireError {
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

/// Errors that abort a whole sweep run
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("failed to query expiry candidates: {0}")]
    Candidates(#[source] StoreError),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
