// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence coordinator
//!
//! Drives a trade through validation, the primary write, the secondary
//! mirror, and event publication. Only the primary write (and the read that
//! precedes validation) can fail a call; the mirror and the event are
//! best effort and only show up in the logs.

use crate::error::{ExpireError, SubmitError};
use crate::publisher::EventPublisher;
use tracing::Instrument;
use ts_core::{validate, Clock, EventKind, IdGen, NewTrade, TradeRecord};
use ts_storage::{PrimaryStore, SecondaryStore, StoreError};

/// Orchestrates writes across the primary store, secondary store, and bus
#[derive(Clone)]
pub struct Coordinator<P, S, C, I> {
    primary: P,
    secondary: S,
    publisher: EventPublisher<C, I>,
    clock: C,
}

impl<P, S, C, I> Coordinator<P, S, C, I>
where
    P: PrimaryStore,
    S: SecondaryStore,
    C: Clock,
    I: IdGen,
{
    pub fn new(primary: P, secondary: S, publisher: EventPublisher<C, I>, clock: C) -> Self {
        Self {
            primary,
            secondary,
            publisher,
            clock,
        }
    }

    /// Validate and store a new trade version
    pub async fn submit(&self, candidate: NewTrade) -> Result<TradeRecord, SubmitError> {
        let span = tracing::info_span!("trade.submit", trade = %candidate.key());

        async move {
            let start = std::time::Instant::now();
            let result = self.submit_inner(candidate).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(record) => tracing::info!(elapsed_ms, maturity = %record.maturity_date, "trade stored"),
                Err(SubmitError::Persistence(e)) => {
                    tracing::error!(elapsed_ms, error = %e, "trade not stored")
                }
                Err(e) => tracing::warn!(elapsed_ms, kind = ?e.kind(), error = %e, "trade rejected"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn submit_inner(&self, candidate: NewTrade) -> Result<TradeRecord, SubmitError> {
        let today = self.clock.today();

        let existing: Vec<u32> = self
            .primary
            .get_all_versions(&candidate.trade_id)
            .await?
            .iter()
            .map(|r| r.version)
            .collect();
        validate(&candidate, &existing, today)?;

        let record = candidate.accept(today);
        // Conditional insert; a concurrent writer of the same trade surfaces as a conflict
        self.primary.insert(&record).await?;

        self.mirror(&record).await;
        self.publisher.publish(&record, EventKind::Created);
        Ok(record)
    }

    /// Flip `expired` on a stored trade.
    ///
    /// Returns the expired record when this call made the transition, or
    /// `None` when the stored copy was already expired. Only the call that
    /// makes the transition mirrors it and publishes `Expired`.
    pub async fn expire(&self, record: &TradeRecord) -> Result<Option<TradeRecord>, ExpireError> {
        let span = tracing::info_span!("trade.expire", trade = %record.key());

        async move {
            if record.expired {
                tracing::debug!("already expired");
                return Ok(None);
            }

            let expired = record.clone().into_expired();
            match self.primary.save(&expired).await {
                Ok(()) => {}
                Err(StoreError::AlreadyExpired(_)) => {
                    tracing::debug!("expired by another writer");
                    return Ok(None);
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to expire trade");
                    return Err(e.into());
                }
            }

            self.mirror(&expired).await;
            self.publisher.publish(&expired, EventKind::Expired);
            tracing::info!(maturity = %expired.maturity_date, "trade expired");
            Ok(Some(expired))
        }
        .instrument(span)
        .await
    }

    async fn mirror(&self, record: &TradeRecord) {
        match self.secondary.save(record).await {
            Ok(row) => tracing::debug!(row_id = row.row_id, "secondary copy written"),
            Err(e) => tracing::error!(error = %e, "secondary write failed"),
        }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn secondary(&self) -> &S {
        &self.secondary
    }

    pub fn publisher(&self) -> &EventPublisher<C, I> {
        &self.publisher
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
