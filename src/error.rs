//! Error types for driver and remote queue operations.

use crate::job::JobId;
use thiserror::Error;

/// Error surfaced to the job framework by driver operations
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("No in-flight job registered under id '{job_id}'")]
    UnknownJob { job_id: JobId },

    #[error("Payload for job '{job_id}' is not valid payload JSON: {source}")]
    Decode {
        job_id: JobId,
        #[source]
        source: serde_json::Error,
    },

    #[error("Payload for job '{job_id}' could not be encoded: {source}")]
    Encode {
        job_id: JobId,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store failed: {0}")]
    Send(#[from] SendError),

    #[error("Dequeue failed: {0}")]
    Receive(#[from] ReceiveError),

    #[error("Acknowledge failed: {0}")]
    Delete(#[from] DeleteError),
}

impl DriverError {
    /// Check if error is transient and the operation may succeed if retried
    pub fn is_transient(&self) -> bool {
        match self {
            Self::UnknownJob { .. } => false,
            Self::Decode { .. } => false,
            Self::Encode { .. } => false,
            Self::Send(e) => e.is_transient(),
            Self::Receive(e) => e.is_transient(),
            Self::Delete(e) => e.is_transient(),
        }
    }
}

/// Failure to place a new message on the remote queue
#[derive(Debug, Error)]
pub enum SendError {
    /// Network or service fault; resending the same payload may succeed
    #[error("Transient send failure: {source}")]
    Transient {
        #[source]
        source: RemoteQueueError,
    },

    /// The payload or request was rejected; resending cannot succeed
    #[error("Permanent send failure: {source}")]
    Permanent {
        #[source]
        source: RemoteQueueError,
    },
}

impl SendError {
    /// Classify a remote failure by whether a resend could succeed
    pub fn from_remote(source: RemoteQueueError) -> Self {
        if source.is_transient() {
            Self::Transient { source }
        } else {
            Self::Permanent { source }
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

/// Failure while polling the remote queue for the next message
///
/// Never stands in for an empty queue; `dequeue_next` reports an empty queue
/// as `Ok(None)`.
#[derive(Debug, Error)]
#[error("Receive from remote queue failed: {source}")]
pub struct ReceiveError {
    #[from]
    pub source: RemoteQueueError,
}

impl ReceiveError {
    pub fn is_transient(&self) -> bool {
        self.source.is_transient()
    }
}

/// Failure to delete an acknowledged job's remote message
///
/// By the time this error is returned the registry record is already gone;
/// the remote message reappears once its visibility timeout lapses.
#[derive(Debug, Error)]
#[error("Delete of remote message failed: {source}")]
pub struct DeleteError {
    #[from]
    pub source: RemoteQueueError,
}

impl DeleteError {
    pub fn is_transient(&self) -> bool {
        self.source.is_transient()
    }
}

/// Error raised at the remote queue boundary
#[derive(Debug, Error)]
pub enum RemoteQueueError {
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Remote queue error ({status}): {code} - {message}")]
    Service {
        code: String,
        status: u16,
        message: String,
    },

    #[error("Queue not found: {queue_url}")]
    QueueNotFound { queue_url: String },

    #[error("Invalid receipt handle: {message}")]
    InvalidReceipt { message: String },

    #[error("Message too large: {size} bytes (max: {max_size})")]
    MessageTooLarge { size: usize, max_size: usize },

    #[error("Malformed response from remote queue: {message}")]
    BadResponse { message: String },
}

impl RemoteQueueError {
    /// Check if the failure is transient and a retry could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Authentication { .. } => false,
            Self::Network { .. } => true,
            Self::Service { status, .. } => *status >= 500,
            Self::QueueNotFound { .. } => false,
            Self::InvalidReceipt { .. } => false,
            Self::MessageTooLarge { .. } => false,
            Self::BadResponse { .. } => false,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {key}")]
    Missing { key: String },
}

/// Validation errors for identifier parsing
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    Required { field: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
