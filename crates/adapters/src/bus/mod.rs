// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message bus transport adapters

mod jsonl;
mod noop;

pub use jsonl::{BusRecord, JsonlBusAdapter};
pub use noop::NoOpBusAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{BusCall, FakeBusAdapter};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from bus operations
#[derive(Debug, Error)]
pub enum BusError {
    #[error("bus I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("bus encoding error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("send rejected: {0}")]
    Rejected(String),
}

/// Adapter for delivering keyed messages to a topic
#[async_trait]
pub trait BusAdapter: Clone + Send + Sync + 'static {
    /// Send one message. No retry and no acknowledgement beyond the
    /// transport accepting the bytes.
    async fn send(&self, topic: &str, key: &str, payload: &[u8]) -> Result<(), BusError>;
}
