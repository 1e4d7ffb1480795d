// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ts-core: domain model for the trade store
//!
//! This crate provides:
//! - Trade records, their identity, and lifecycle state
//! - The pure version validator
//! - Trade events published on state changes
//! - Clock and id abstractions for deterministic tests
//! - Sweep schedule and daemon configuration

pub mod clock;
pub mod config;
pub mod event;
pub mod id;
pub mod schedule;
pub mod trade;
pub mod validate;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{BusConfig, BusKind, Config, ConfigError, SweepConfig};
pub use event::{EventKind, TradeEvent};
pub use id::{EventId, IdGen, SequentialIdGen, UuidIdGen};
pub use schedule::{Schedule, ScheduleError};
pub use trade::{NewTrade, TradeKey, TradeRecord, TradeState};
pub use validate::{validate, Rejection, RejectionClass};
