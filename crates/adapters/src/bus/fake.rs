// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake bus adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{BusAdapter, BusError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Recorded bus message
#[derive(Debug, Clone)]
pub struct BusCall {
    pub topic: String,
    pub key: String,
    pub payload: Vec<u8>,
}

impl BusCall {
    /// Payload decoded as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.payload).unwrap_or(serde_json::Value::Null)
    }
}

/// Fake bus adapter for testing
#[derive(Clone, Default)]
pub struct FakeBusAdapter {
    calls: Arc<Mutex<Vec<BusCall>>>,
    fail: Arc<AtomicBool>,
}

impl FakeBusAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all messages that were accepted
    pub fn calls(&self) -> Vec<BusCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make every send fail
    pub fn fail_sends(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl BusAdapter for FakeBusAdapter {
    async fn send(&self, topic: &str, key: &str, payload: &[u8]) -> Result<(), BusError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(BusError::Rejected("injected send failure".to_string()));
        }
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(BusCall {
                topic: topic.to_string(),
                key: key.to_string(),
                payload: payload.to_vec(),
            });
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
