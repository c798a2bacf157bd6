//! Message types crossing the remote queue boundary.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier the remote queue assigns to a message
///
/// Lives in the remote id space: `send` returns one, and received messages
/// carry one. The driver converts it into a `JobId` only for messages it has
/// actually delivered to the framework.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    /// Create a message id from the remote queue's string form
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Get the message id as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id and return the underlying string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "message_id".to_string(),
            });
        }

        Ok(Self(s.to_string()))
    }
}

/// Opaque token authorizing deletion of one delivered message
///
/// A handle belongs to a single delivery. When a message is redelivered after
/// its visibility timeout lapses, the new delivery carries a fresh handle and
/// the old one stops working.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceiptHandle(String);

impl ReceiptHandle {
    /// Create a receipt handle from the remote queue's string form
    pub fn new(handle: String) -> Self {
        Self(handle)
    }

    /// Get the handle as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One message delivered by the remote queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMessage {
    /// Remote queue's own id for the message
    pub message_id: MessageId,

    /// Deletion token for this delivery
    pub receipt_handle: ReceiptHandle,

    /// Message body exactly as delivered
    pub body: String,
}

impl RemoteMessage {
    /// Create a delivered-message record
    pub fn new(message_id: MessageId, receipt_handle: ReceiptHandle, body: String) -> Self {
        Self {
            message_id,
            receipt_handle,
            body,
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
