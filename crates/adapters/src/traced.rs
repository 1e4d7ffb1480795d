// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::bus::{BusAdapter, BusError};
use async_trait::async_trait;
use tracing::Instrument;

/// Wrapper that adds tracing to any BusAdapter
#[derive(Clone)]
pub struct TracedBusAdapter<B> {
    inner: B,
}

impl<B> TracedBusAdapter<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<B: BusAdapter> BusAdapter for TracedBusAdapter<B> {
    async fn send(&self, topic: &str, key: &str, payload: &[u8]) -> Result<(), BusError> {
        let span = tracing::info_span!("bus.send", topic, key);

        async move {
            tracing::debug!(payload_len = payload.len(), "sending");

            // Precondition: brokers reject unnamed topics
            if topic.is_empty() {
                tracing::error!("topic is empty");
                return Err(BusError::Rejected("topic must not be empty".to_string()));
            }

            let start = std::time::Instant::now();
            let result = self.inner.send(topic, key, payload).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "message sent"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "send failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
