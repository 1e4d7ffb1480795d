// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-lines bus adapter
//!
//! Appends one line per message to a local file. Stands in for a broker in
//! single-node deployments and keeps an inspectable trail of every event.

use super::{BusAdapter, BusError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// One line of the event file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusRecord {
    pub topic: String,
    pub key: String,
    /// JSON payloads are embedded as-is, anything else as a lossy string
    pub payload: serde_json::Value,
}

impl BusRecord {
    fn new(topic: &str, key: &str, payload: &[u8]) -> Self {
        let payload = serde_json::from_slice(payload).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(payload).into_owned())
        });
        Self {
            topic: topic.to_string(),
            key: key.to_string(),
            payload,
        }
    }
}

/// Bus adapter writing messages to a JSON-lines file
#[derive(Clone)]
pub struct JsonlBusAdapter {
    file: Arc<Mutex<tokio::fs::File>>,
}

impl JsonlBusAdapter {
    /// Open (or create) the event file for appending
    pub fn open(path: &Path) -> Result<Self, BusError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self {
            file: Arc::new(Mutex::new(tokio::fs::File::from_std(file))),
        })
    }

    /// Read every message written to an event file
    pub fn read_all(path: &Path) -> Result<Vec<BusRecord>, BusError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        content
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| serde_json::from_str(line).map_err(BusError::from))
            .collect()
    }
}

#[async_trait]
impl BusAdapter for JsonlBusAdapter {
    async fn send(&self, topic: &str, key: &str, payload: &[u8]) -> Result<(), BusError> {
        let mut line = serde_json::to_vec(&BusRecord::new(topic, key, payload))?;
        line.push(b'\n');

        let mut file = self.file.lock().await;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "jsonl_tests.rs"]
mod tests;
