// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expiration sweep
//!
//! One pass over every active trade whose maturity date is before `as_of`,
//! expiring each through the coordinator. Candidates are handled one at a
//! time and a failure on one never stops the rest.

use crate::coordinator::Coordinator;
use crate::error::SweepError;
use chrono::NaiveDate;
use tracing::Instrument;
use ts_core::{Clock, IdGen};
use ts_storage::{PrimaryStore, SecondaryStore};

/// Outcome of one sweep pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub candidates: usize,
    pub expired: usize,
    /// Candidates another writer expired first
    pub skipped: usize,
    pub failed: usize,
}

impl SweepReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Runs expiration passes against the primary store
#[derive(Clone)]
pub struct Sweeper<P, S, C, I> {
    coordinator: Coordinator<P, S, C, I>,
}

impl<P, S, C, I> Sweeper<P, S, C, I>
where
    P: PrimaryStore,
    S: SecondaryStore,
    C: Clock,
    I: IdGen,
{
    pub fn new(coordinator: Coordinator<P, S, C, I>) -> Self {
        Self { coordinator }
    }

    /// Expire every active trade maturing before `as_of`
    pub async fn run_once(&self, as_of: NaiveDate) -> Result<SweepReport, SweepError> {
        let span = tracing::info_span!("trade.sweep", %as_of);

        async move {
            let start = std::time::Instant::now();
            let candidates = self
                .coordinator
                .primary()
                .get_expired_candidates(as_of)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "failed to query expiry candidates");
                    SweepError::Candidates(e)
                })?;

            let mut report = SweepReport {
                candidates: candidates.len(),
                ..SweepReport::default()
            };

            for record in &candidates {
                match self.coordinator.expire(record).await {
                    Ok(Some(_)) => report.expired += 1,
                    Ok(None) => report.skipped += 1,
                    Err(e) => {
                        report.failed += 1;
                        tracing::error!(trade = %record.key(), error = %e, "expire failed");
                    }
                }
            }

            tracing::info!(
                candidates = report.candidates,
                expired = report.expired,
                skipped = report.skipped,
                failed = report.failed,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "sweep complete"
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }

    /// Sweep as of the coordinator clock's current date
    pub async fn run_today(&self) -> Result<SweepReport, SweepError> {
        self.run_once(self.coordinator.clock().today()).await
    }
}

#[cfg(test)]
#[path = "sweeper_tests.rs"]
mod tests;
