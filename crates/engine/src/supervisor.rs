// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recurring sweep trigger
//!
//! Each run executes in its own task. An error or a panic in a run is
//! logged and the next tick is always scheduled.

use crate::sweeper::{SweepReport, Sweeper};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use ts_core::{Clock, IdGen, Schedule};
use ts_storage::{PrimaryStore, SecondaryStore};

/// Drives a [`Sweeper`] on a [`Schedule`] until shut down
pub struct SweepSupervisor<P, S, C, I> {
    sweeper: Sweeper<P, S, C, I>,
    schedule: Schedule,
    clock: C,
    run_on_startup: bool,
}

impl<P, S, C, I> SweepSupervisor<P, S, C, I>
where
    P: PrimaryStore,
    S: SecondaryStore,
    C: Clock,
    I: IdGen,
{
    pub fn new(sweeper: Sweeper<P, S, C, I>, schedule: Schedule, clock: C) -> Self {
        Self {
            sweeper,
            schedule,
            clock,
            run_on_startup: false,
        }
    }

    /// Also sweep once immediately, before the first scheduled tick
    pub fn run_on_startup(mut self, enabled: bool) -> Self {
        self.run_on_startup = enabled;
        self
    }

    /// Run the schedule on a background task
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Run the schedule until `shutdown` flips or its sender is dropped
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(schedule = %self.schedule, "sweep supervisor started");

        if self.run_on_startup {
            self.tick().await;
        }

        loop {
            if *shutdown.borrow() {
                break;
            }

            let delay = self.schedule.delay_after(self.clock.now());
            tracing::debug!(delay_secs = delay.as_secs(), "next sweep scheduled");

            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    self.tick().await;
                }
                _ = shutdown.changed() => {
                    break;
                }
            }
        }

        tracing::info!("sweep supervisor stopped");
    }

    /// One isolated sweep run
    async fn tick(&self) -> Option<SweepReport> {
        let sweeper = self.sweeper.clone();
        let as_of = self.clock.today();

        match tokio::spawn(async move { sweeper.run_once(as_of).await }).await {
            Ok(Ok(report)) => Some(report),
            Ok(Err(e)) => {
                tracing::error!(%as_of, error = %e, "sweep failed");
                None
            }
            Err(e) => {
                tracing::error!(%as_of, error = %e, "sweep task aborted");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
