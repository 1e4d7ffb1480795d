// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Version validation for trade submissions.
//!
//! Pure rules, no I/O. The caller reads the stored versions for the trade id
//! and the current date, and this module decides whether the submission may
//! be written. Rules run in two groups:
//! - Input rules, checkable without storage (presence, version range, maturity)
//! - Identity rules, checked against stored versions (duplicate, monotonic)

use crate::trade::NewTrade;
use chrono::NaiveDate;
use thiserror::Error;

/// Why a submission was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("version must be a positive integer, got {0}")]
    InvalidVersion(u32),

    #[error("maturity date {maturity_date} is before {today}")]
    PastMaturityDate {
        maturity_date: NaiveDate,
        today: NaiveDate,
    },

    #[error("trade {trade_id} version {version} already exists")]
    DuplicateVersion { trade_id: String, version: u32 },

    #[error("trade {trade_id} version {version} is not greater than latest version {latest}")]
    NonMonotonicVersion {
        trade_id: String,
        version: u32,
        latest: u32,
    },
}

/// Coarse classification a caller acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionClass {
    /// Fix the input and resubmit
    Validation,
    /// Resubmit with a corrected version
    Conflict,
}

impl Rejection {
    pub fn class(&self) -> RejectionClass {
        match self {
            Rejection::MissingField(_)
            | Rejection::InvalidVersion(_)
            | Rejection::PastMaturityDate { .. } => RejectionClass::Validation,
            Rejection::DuplicateVersion { .. } | Rejection::NonMonotonicVersion { .. } => {
                RejectionClass::Conflict
            }
        }
    }
}

/// Decide whether `candidate` may be stored.
///
/// `existing_versions` are the versions currently stored for
/// `candidate.trade_id`, in any order.
pub fn validate(
    candidate: &NewTrade,
    existing_versions: &[u32],
    today: NaiveDate,
) -> Result<(), Rejection> {
    validate_input(candidate, today)?;
    validate_identity(candidate, existing_versions)
}

/// Rules that need no stored state
pub fn validate_input(candidate: &NewTrade, today: NaiveDate) -> Result<(), Rejection> {
    if candidate.trade_id.trim().is_empty() {
        return Err(Rejection::MissingField("trade_id"));
    }
    if candidate.counter_party_id.trim().is_empty() {
        return Err(Rejection::MissingField("counter_party_id"));
    }
    if candidate.book_id.trim().is_empty() {
        return Err(Rejection::MissingField("book_id"));
    }
    if candidate.version == 0 {
        return Err(Rejection::InvalidVersion(candidate.version));
    }
    if candidate.maturity_date < today {
        return Err(Rejection::PastMaturityDate {
            maturity_date: candidate.maturity_date,
            today,
        });
    }
    Ok(())
}

/// Duplicate and monotonic-version rules
pub fn validate_identity(candidate: &NewTrade, existing_versions: &[u32]) -> Result<(), Rejection> {
    if existing_versions.contains(&candidate.version) {
        return Err(Rejection::DuplicateVersion {
            trade_id: candidate.trade_id.clone(),
            version: candidate.version,
        });
    }

    match existing_versions.iter().max() {
        Some(&latest) if candidate.version <= latest => Err(Rejection::NonMonotonicVersion {
            trade_id: candidate.trade_id.clone(),
            version: candidate.version,
            latest,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
