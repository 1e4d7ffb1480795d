// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recurring schedule for the expiration sweep
//!
//! Two shapes are supported:
//! - `{ every = "1h" }` runs at a fixed interval after each tick
//! - `{ daily = "00:00:00" }` runs once a day at a UTC time of day

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("schedule interval must be greater than zero")]
    ZeroInterval,
    #[error("schedule interval {0:?} is out of range")]
    IntervalOutOfRange(Duration),
}

/// When the sweep fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schedule {
    /// Fixed interval between ticks
    Every(#[serde(with = "humantime_serde")] Duration),
    /// Once a day at the given UTC time
    Daily(NaiveTime),
}

impl Schedule {
    pub fn hourly() -> Self {
        Schedule::Every(Duration::from_secs(3600))
    }

    pub fn midnight() -> Self {
        Schedule::Daily(NaiveTime::MIN)
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        match self {
            Schedule::Every(interval) if interval.is_zero() => Err(ScheduleError::ZeroInterval),
            Schedule::Every(interval) => chrono::Duration::from_std(*interval)
                .map(|_| ())
                .map_err(|_| ScheduleError::IntervalOutOfRange(*interval)),
            Schedule::Daily(_) => Ok(()),
        }
    }

    /// The first fire time strictly after `now`
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Schedule::Every(interval) => {
                let step = chrono::Duration::from_std(*interval)
                    .unwrap_or_else(|_| chrono::Duration::days(1));
                now + step
            }
            Schedule::Daily(at) => {
                let today = now.date_naive().and_time(*at).and_utc();
                if today > now {
                    today
                } else {
                    today + chrono::Duration::days(1)
                }
            }
        }
    }

    /// How long to wait from `now` until the next fire time
    pub fn delay_after(&self, now: DateTime<Utc>) -> Duration {
        (self.next_after(now) - now).to_std().unwrap_or(Duration::ZERO)
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::midnight()
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schedule::Every(interval) => {
                write!(f, "every {}", humantime::format_duration(*interval))
            }
            Schedule::Daily(at) => write!(f, "daily at {} UTC", at.format("%H:%M:%S")),
        }
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
