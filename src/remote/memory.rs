//! In-memory remote queue for tests and local development.

use crate::client::RemoteQueueClient;
use crate::error::RemoteQueueError;
use crate::message::{MessageId, ReceiptHandle, RemoteMessage};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(20);

/// In-process queue with SQS-like delivery semantics
///
/// Messages become invisible while in flight and return to the available
/// pool when their visibility timeout lapses, keeping their message id but
/// getting a fresh receipt handle on the next delivery. `delete` is strict:
/// a handle that is unknown or whose delivery has lapsed is rejected, so
/// tests can prove an operation never issued a duplicate delete.
#[derive(Debug)]
pub struct InMemoryRemoteQueue {
    state: Mutex<QueueState>,
    visibility_timeout: Duration,
}

#[derive(Debug, Default)]
struct QueueState {
    available: VecDeque<StoredMessage>,
    in_flight: HashMap<ReceiptHandle, InFlightMessage>,
}

#[derive(Debug, Clone)]
struct StoredMessage {
    message_id: MessageId,
    body: String,
}

#[derive(Debug)]
struct InFlightMessage {
    message: StoredMessage,
    invisible_until: DateTime<Utc>,
}

impl InMemoryRemoteQueue {
    /// Create an empty queue with a 30 second visibility timeout
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            visibility_timeout: Duration::seconds(30),
        }
    }

    /// Set the visibility timeout applied to deliveries
    pub fn with_visibility_timeout(mut self, visibility_timeout: Duration) -> Self {
        self.visibility_timeout = visibility_timeout;
        self
    }

    /// Number of messages currently available for delivery
    pub fn available_len(&self) -> usize {
        let mut state = self.lock();
        reclaim_expired(&mut state, Utc::now());
        state.available.len()
    }

    /// Number of messages currently invisible because a delivery is in flight
    pub fn in_flight_len(&self) -> usize {
        let mut state = self.lock();
        reclaim_expired(&mut state, Utc::now());
        state.in_flight.len()
    }

    fn try_deliver(&self, max_messages: u32) -> Vec<RemoteMessage> {
        let now = Utc::now();
        let mut state = self.lock();
        reclaim_expired(&mut state, now);

        let mut delivered = Vec::new();
        while delivered.len() < max_messages as usize {
            let Some(message) = state.available.pop_front() else {
                break;
            };

            let receipt = ReceiptHandle::new(uuid::Uuid::new_v4().to_string());
            state.in_flight.insert(
                receipt.clone(),
                InFlightMessage {
                    message: message.clone(),
                    invisible_until: now + self.visibility_timeout,
                },
            );
            delivered.push(RemoteMessage::new(
                message.message_id,
                receipt,
                message.body,
            ));
        }

        delivered
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryRemoteQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Move lapsed deliveries back to the available pool
fn reclaim_expired(state: &mut QueueState, now: DateTime<Utc>) {
    let expired: Vec<ReceiptHandle> = state
        .in_flight
        .iter()
        .filter(|(_, in_flight)| in_flight.invisible_until <= now)
        .map(|(receipt, _)| receipt.clone())
        .collect();

    for receipt in expired {
        if let Some(in_flight) = state.in_flight.remove(&receipt) {
            state.available.push_front(in_flight.message);
        }
    }
}

#[async_trait]
impl RemoteQueueClient for InMemoryRemoteQueue {
    async fn send(&self, body: &str) -> Result<MessageId, RemoteQueueError> {
        let message_id = MessageId::new(uuid::Uuid::new_v4().to_string());
        let mut state = self.lock();
        state.available.push_back(StoredMessage {
            message_id: message_id.clone(),
            body: body.to_string(),
        });

        Ok(message_id)
    }

    async fn receive(
        &self,
        max_messages: u32,
        wait: Duration,
    ) -> Result<Vec<RemoteMessage>, RemoteQueueError> {
        let deadline = Utc::now() + wait;

        loop {
            let delivered = self.try_deliver(max_messages);
            if !delivered.is_empty() {
                return Ok(delivered);
            }

            if Utc::now() >= deadline {
                return Ok(Vec::new());
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn delete(&self, receipt: &ReceiptHandle) -> Result<(), RemoteQueueError> {
        let mut state = self.lock();
        reclaim_expired(&mut state, Utc::now());

        if state.in_flight.remove(receipt).is_none() {
            return Err(RemoteQueueError::InvalidReceipt {
                message: format!("No in-flight delivery for receipt '{}'", receipt.as_str()),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
