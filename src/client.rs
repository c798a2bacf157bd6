//! Remote queue boundary.

use crate::error::RemoteQueueError;
use crate::message::{MessageId, ReceiptHandle, RemoteMessage};
use async_trait::async_trait;
use chrono::Duration;

/// Operations the driver needs from a remote message queue
///
/// Implementations are bound to exactly one queue at construction; no
/// operation names a queue. The trait is object safe so drivers can share an
/// implementation behind `Arc<dyn RemoteQueueClient>`.
#[async_trait]
pub trait RemoteQueueClient: Send + Sync {
    /// Place a new message on the queue and return the id the queue assigned
    async fn send(&self, body: &str) -> Result<MessageId, RemoteQueueError>;

    /// Receive up to `max_messages` messages, long-polling for at most `wait`
    ///
    /// An empty vector means the queue had nothing to deliver within the
    /// wait. Transport and service failures are errors, never an empty
    /// result.
    async fn receive(
        &self,
        max_messages: u32,
        wait: Duration,
    ) -> Result<Vec<RemoteMessage>, RemoteQueueError>;

    /// Delete a delivered message using the receipt handle of its delivery
    async fn delete(&self, receipt: &ReceiptHandle) -> Result<(), RemoteQueueError>;
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
