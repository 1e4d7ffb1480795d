// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trade state-change events announced on the message bus

use crate::id::EventId;
use crate::trade::TradeRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which transition an event announces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Created,
    Expired,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Created => "trade:created",
            EventKind::Expired => "trade:expired",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload published for every trade state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub event_id: EventId,
    pub kind: EventKind,
    pub record: TradeRecord,
    pub emitted_at: DateTime<Utc>,
}

impl TradeEvent {
    pub fn new(
        event_id: EventId,
        kind: EventKind,
        record: TradeRecord,
        emitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id,
            kind,
            record,
            emitted_at,
        }
    }

    /// Partition key on the bus. Keying by trade id keeps every version of
    /// a trade on one partition, in submission order.
    pub fn key(&self) -> &str {
        &self.record.trade_id
    }

    pub fn to_payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
