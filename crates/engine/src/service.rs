// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trade service: the operations exposed to callers

use crate::coordinator::Coordinator;
use crate::error::{SubmitError, SweepError};
use crate::publisher::EventPublisher;
use crate::sweeper::{SweepReport, Sweeper};
use chrono::NaiveDate;
use ts_core::{Clock, IdGen, NewTrade, TradeRecord};
use ts_storage::{PrimaryStore, SecondaryStore, StoreError};

/// Facade over the coordinator, the stores, and the sweeper
#[derive(Clone)]
pub struct TradeService<P, S, C, I> {
    coordinator: Coordinator<P, S, C, I>,
    sweeper: Sweeper<P, S, C, I>,
}

impl<P, S, C, I> TradeService<P, S, C, I>
where
    P: PrimaryStore,
    S: SecondaryStore,
    C: Clock,
    I: IdGen,
{
    pub fn new(primary: P, secondary: S, publisher: EventPublisher<C, I>, clock: C) -> Self {
        let coordinator = Coordinator::new(primary, secondary, publisher, clock);
        Self {
            sweeper: Sweeper::new(coordinator.clone()),
            coordinator,
        }
    }

    /// Submit a new trade version
    pub async fn create_record(&self, trade: NewTrade) -> Result<TradeRecord, SubmitError> {
        self.coordinator.submit(trade).await
    }

    /// Highest stored version of a trade
    pub async fn get_latest(&self, trade_id: &str) -> Result<Option<TradeRecord>, StoreError> {
        let versions = self.coordinator.primary().get_all_versions(trade_id).await?;
        Ok(versions.into_iter().max_by_key(|r| r.version))
    }

    pub async fn get_exact(
        &self,
        trade_id: &str,
        version: u32,
    ) -> Result<Option<TradeRecord>, StoreError> {
        self.coordinator.primary().get(trade_id, version).await
    }

    /// Every stored version of a trade, newest first
    pub async fn list_versions(&self, trade_id: &str) -> Result<Vec<TradeRecord>, StoreError> {
        let mut versions = self.coordinator.primary().get_all_versions(trade_id).await?;
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(versions)
    }

    pub async fn list_primary(&self) -> Result<Vec<TradeRecord>, StoreError> {
        self.coordinator.primary().get_all().await
    }

    /// Contents of the secondary store as trade records
    pub async fn list_secondary(&self) -> Result<Vec<TradeRecord>, StoreError> {
        let rows = self.coordinator.secondary().get_all().await?;
        Ok(rows.iter().map(|row| row.to_trade()).collect())
    }

    /// Run one expiration pass now
    pub async fn expire_due(&self, as_of: NaiveDate) -> Result<SweepReport, SweepError> {
        self.sweeper.run_once(as_of).await
    }

    pub fn primary(&self) -> &P {
        self.coordinator.primary()
    }

    pub fn sweeper(&self) -> &Sweeper<P, S, C, I> {
        &self.sweeper
    }

    pub fn publisher(&self) -> &EventPublisher<C, I> {
        self.coordinator.publisher()
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
