// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op bus adapter for when event publishing is disabled.

use super::{BusAdapter, BusError};
use async_trait::async_trait;

/// Bus adapter that discards every message.
///
/// Used when `bus.kind = "none"`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpBusAdapter;

impl NoOpBusAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BusAdapter for NoOpBusAdapter {
    async fn send(&self, _topic: &str, _key: &str, _payload: &[u8]) -> Result<(), BusError> {
        Ok(())
    }
}
