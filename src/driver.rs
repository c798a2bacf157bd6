//! The queue driver: framework queue operations over a remote queue client.

use crate::client::RemoteQueueClient;
use crate::config::{DriverConfig, SqsConfig};
use crate::error::{ConfigError, DeleteError, DriverError, ReceiveError, SendError};
use crate::job::{JobData, JobId};
use crate::registry::{HandleRegistry, InFlightRecord};
use crate::remote::sqs::SqsClient;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Queue contract the job framework drives
///
/// Five operations over jobs addressed by `JobId`. Implementations provide
/// at-least-once semantics: a job that is dequeued but never acknowledged
/// becomes deliverable again once the remote queue's visibility timeout
/// lapses.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Decode the payload of an in-flight job
    ///
    /// Fails with `DriverError::UnknownJob` when `id` was never produced by
    /// `dequeue_next` or has already been acknowledged.
    async fn fetch(&self, id: &JobId) -> Result<JobData, DriverError>;

    /// Encode a payload and place it on the remote queue as a new message
    ///
    /// The remote queue assigns its own message id; `id` is only the
    /// caller's name for the job and never reaches the wire.
    async fn store(&self, id: &JobId, data: &JobData) -> Result<(), DriverError>;

    /// Mark an in-flight job complete and delete its remote message
    ///
    /// Idempotent: acknowledging an id with no live record succeeds without
    /// touching the remote queue.
    async fn acknowledge(&self, id: &JobId) -> Result<(), DriverError>;

    /// Pop the next available job, if any
    ///
    /// `Ok(None)` means the queue had nothing to deliver within the
    /// configured wait; remote faults are errors.
    async fn dequeue_next(&self) -> Result<Option<JobId>, DriverError>;

    /// Hand an in-progress job back to the queue
    ///
    /// The remote queue cannot take a delivered message back early, so this
    /// always succeeds without doing anything; the message reappears on its
    /// own once the visibility timeout lapses.
    async fn requeue_visible(&self, id: &JobId) -> Result<(), DriverError>;
}

/// Driver binding the framework's queue contract to one remote queue
///
/// Stateless apart from its configuration; every per-job fact lives in the
/// shared `HandleRegistry`.
#[derive(Clone)]
pub struct QueueDriver {
    client: Arc<dyn RemoteQueueClient>,
    registry: Arc<HandleRegistry>,
    config: DriverConfig,
}

impl QueueDriver {
    /// Create a driver over an existing client and registry
    pub fn new(
        client: Arc<dyn RemoteQueueClient>,
        registry: Arc<HandleRegistry>,
        config: DriverConfig,
    ) -> Self {
        Self {
            client,
            registry,
            config,
        }
    }

    /// Registry this driver records in-flight jobs in
    pub fn registry(&self) -> &Arc<HandleRegistry> {
        &self.registry
    }
}

impl std::fmt::Debug for QueueDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueDriver")
            .field("in_flight", &self.registry.len())
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl JobQueue for QueueDriver {
    async fn fetch(&self, id: &JobId) -> Result<JobData, DriverError> {
        let record = match self.registry.lookup(id) {
            Some(record) => record,
            None => {
                return Err(DriverError::UnknownJob {
                    job_id: id.clone(),
                })
            }
        };

        let data = serde_json::from_str(&record.raw_body).map_err(|source| DriverError::Decode {
            job_id: id.clone(),
            source,
        })?;

        debug!(job_id = %id, "Fetched payload for in-flight job");
        Ok(data)
    }

    async fn store(&self, id: &JobId, data: &JobData) -> Result<(), DriverError> {
        let body = serde_json::to_string(data).map_err(|source| DriverError::Encode {
            job_id: id.clone(),
            source,
        })?;

        let message_id = self
            .client
            .send(&body)
            .await
            .map_err(SendError::from_remote)?;

        info!(message_id = %message_id, job_id = %id, "Stored job on remote queue");
        Ok(())
    }

    async fn acknowledge(&self, id: &JobId) -> Result<(), DriverError> {
        // Evict before the remote call so the record is gone on every exit
        // path and a racing second acknowledge sees nothing to do.
        let record = match self.registry.evict(id) {
            Some(record) => record,
            None => {
                debug!(job_id = %id, "Acknowledge for unregistered job id; treating as already acknowledged");
                return Ok(());
            }
        };

        if let Err(source) = self.client.delete(&record.receipt_handle).await {
            warn!(
                job_id = %id,
                error = %source,
                "Remote delete failed; the message reappears after its visibility timeout"
            );
            return Err(DeleteError::from(source).into());
        }

        info!(job_id = %id, "Acknowledged job; remote message deleted");
        Ok(())
    }

    async fn dequeue_next(&self) -> Result<Option<JobId>, DriverError> {
        let messages = self
            .client
            .receive(1, self.config.receive_wait)
            .await
            .map_err(ReceiveError::from)?;

        let message = match messages.into_iter().next() {
            Some(message) => message,
            None => return Ok(None),
        };

        let job_id = JobId::from(message.message_id);
        self.registry.register(InFlightRecord::new(
            job_id.clone(),
            message.receipt_handle,
            message.body,
        ));

        info!(job_id = %job_id, "Popped job from remote queue");
        Ok(Some(job_id))
    }

    async fn requeue_visible(&self, id: &JobId) -> Result<(), DriverError> {
        debug!(job_id = %id, "Requeue requested; leaving redelivery to the visibility timeout");
        Ok(())
    }
}

/// Factory owning the shared registry and remote client, handing out drivers
///
/// Every driver made by one provider shares the same registry, so a job
/// popped through one driver can be fetched and acknowledged through
/// another.
pub struct QueueDriverProvider {
    client: Arc<dyn RemoteQueueClient>,
    registry: Arc<HandleRegistry>,
    config: DriverConfig,
}

impl QueueDriverProvider {
    /// Create a provider over an existing remote client
    pub fn new(client: Arc<dyn RemoteQueueClient>, config: DriverConfig) -> Self {
        Self {
            client,
            registry: Arc::new(HandleRegistry::new()),
            config,
        }
    }

    /// Create a provider backed by a real SQS client
    pub fn for_sqs(sqs: SqsConfig, config: DriverConfig) -> Result<Self, ConfigError> {
        let client = SqsClient::new(sqs)?;
        Ok(Self::new(Arc::new(client), config))
    }

    /// Create a driver wired to the provider's client and registry
    pub fn make_driver(&self) -> QueueDriver {
        QueueDriver::new(
            Arc::clone(&self.client),
            Arc::clone(&self.registry),
            self.config.clone(),
        )
    }

    /// Registry shared by this provider's drivers
    pub fn registry(&self) -> &Arc<HandleRegistry> {
        &self.registry
    }

    /// Release driver resources
    ///
    /// Nothing outlives the client's drop; the hook exists so hosts with an
    /// explicit shutdown phase have somewhere to call.
    pub fn shutdown(&self) {
        debug!("Queue driver provider shutting down; nothing to release");
    }
}

impl std::fmt::Debug for QueueDriverProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueDriverProvider")
            .field("in_flight", &self.registry.len())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
