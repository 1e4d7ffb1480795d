// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Trade store persistence pipeline

mod coordinator;
mod error;
mod publisher;
mod service;
mod supervisor;
mod sweeper;

pub use coordinator::Coordinator;
pub use error::{ErrorKind, ExpireError, SubmitError, SweepError};
pub use publisher::{EventPublisher, PublisherConfig};
pub use service::TradeService;
pub use supervisor::SweepSupervisor;
pub use sweeper::{SweepReport, Sweeper};
