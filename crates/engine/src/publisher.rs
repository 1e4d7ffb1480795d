// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fire-and-forget trade event publisher
//!
//! Events are queued on a bounded channel and handed to the bus transport by
//! a single background task, so callers only ever pay for the enqueue and
//! delivery keeps submission order. Delivery is at most once: a full queue,
//! a stopped publisher, or a transport error all drop the event with a log.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use ts_adapters::BusAdapter;
use ts_core::config::{BusConfig, DEFAULT_TOPIC};
use ts_core::{Clock, EventKind, IdGen, TradeEvent, TradeRecord};

/// Publisher settings
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    pub topic: String,
    pub queue_capacity: usize,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            queue_capacity: 1024,
        }
    }
}

impl From<&BusConfig> for PublisherConfig {
    fn from(bus: &BusConfig) -> Self {
        Self {
            topic: bus.topic.clone(),
            queue_capacity: bus.queue_capacity,
        }
    }
}

enum Envelope {
    Event(TradeEvent),
    /// Acknowledged once every earlier envelope has been handled
    Flush(oneshot::Sender<()>),
}

/// Handle for publishing trade events. Clones share one queue and worker.
#[derive(Clone)]
pub struct EventPublisher<C, I> {
    tx: Arc<Mutex<Option<mpsc::Sender<Envelope>>>>,
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
    dropped: Arc<AtomicU64>,
    clock: C,
    id_gen: I,
}

impl<C: Clock, I: IdGen> EventPublisher<C, I> {
    /// Start the delivery worker on the current tokio runtime
    pub fn spawn<B: BusAdapter>(bus: B, config: PublisherConfig, clock: C, id_gen: I) -> Self {
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let worker = tokio::spawn(deliver_all(bus, config.topic, rx));

        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
            worker: Arc::new(Mutex::new(Some(worker))),
            dropped: Arc::new(AtomicU64::new(0)),
            clock,
            id_gen,
        }
    }

    /// Queue an event for `record`. Never waits on the transport.
    pub fn publish(&self, record: &TradeRecord, kind: EventKind) {
        let event = TradeEvent::new(
            self.id_gen.next_id(),
            kind,
            record.clone(),
            self.clock.now(),
        );

        let guard = self.tx.lock().unwrap_or_else(|e| e.into_inner());
        let Some(tx) = guard.as_ref() else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(trade = %record.key(), kind = %kind, "publisher stopped, dropping event");
            return;
        };

        match tx.try_send(Envelope::Event(event)) {
            Ok(()) => {
                tracing::debug!(trade = %record.key(), kind = %kind, "event queued");
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(trade = %record.key(), kind = %kind, "event queue full, dropping event");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(trade = %record.key(), kind = %kind, "publisher stopped, dropping event");
            }
        }
    }

    /// Wait until every event queued before this call has reached the transport
    pub async fn flush(&self) {
        let tx = self
            .tx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .cloned();
        let Some(tx) = tx else {
            return;
        };

        let (ack, done) = oneshot::channel();
        if tx.send(Envelope::Flush(ack)).await.is_ok() {
            let _ = done.await;
        }
    }

    /// Close the queue, deliver what is already queued, and stop the worker
    pub async fn shutdown(&self) {
        drop(self.tx.lock().unwrap_or_else(|e| e.into_inner()).take());

        let worker = self.worker.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                tracing::error!(error = %e, "publisher worker failed");
            }
        }
        tracing::info!(dropped = self.dropped(), "publisher stopped");
    }

    /// Events dropped because the queue was full or closed
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

async fn deliver_all<B: BusAdapter>(bus: B, topic: String, mut rx: mpsc::Receiver<Envelope>) {
    while let Some(envelope) = rx.recv().await {
        match envelope {
            Envelope::Event(event) => deliver(&bus, &topic, &event).await,
            Envelope::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
}

async fn deliver<B: BusAdapter>(bus: &B, topic: &str, event: &TradeEvent) {
    let payload = match event.to_payload() {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(event_id = %event.event_id, error = %e, "failed to encode event");
            return;
        }
    };

    match bus.send(topic, event.key(), &payload).await {
        Ok(()) => tracing::debug!(event_id = %event.event_id, kind = %event.kind, "event published"),
        Err(e) => tracing::error!(
            event_id = %event.event_id,
            trade = %event.record.key(),
            kind = %event.kind,
            error = %e,
            "failed to publish event"
        ),
    }
}

#[cfg(test)]
#[path = "publisher_tests.rs"]
mod tests;
