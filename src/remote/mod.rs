//! Remote queue client implementations.
//!
//! This module contains concrete implementations of the `RemoteQueueClient`
//! trait: the AWS SQS client used in production and an in-memory queue for
//! tests and local development.

pub mod memory;
pub mod sqs;

pub use memory::InMemoryRemoteQueue;
pub use sqs::SqsClient;
