//! # SQS Queue Driver
//!
//! Queue driver connecting a pull-based background-job framework to AWS SQS.
//!
//! The framework addresses jobs by identifier, expects to be able to requeue
//! them, and knows nothing about receipt handles. SQS assigns its own message
//! ids, deletes by receipt handle, and re-delivers messages when a visibility
//! timeout lapses instead of supporting an explicit push-back. This library
//! bridges the two models:
//!
//! - Five queue operations: fetch, store, acknowledge, dequeue next, requeue
//! - Process-local handle registry mapping job ids to receipt handles
//! - At-least-once delivery, with redelivery via visibility timeouts
//! - A real SQS client (Signature V4 over HTTP) plus an in-memory queue for
//!   tests and local development
//!
//! ## Module Organization
//!
//! - [`error`] - Error types for driver and remote queue operations
//! - [`job`] - Job identifiers and the job envelope
//! - [`message`] - Message types crossing the remote queue boundary
//! - [`registry`] - In-flight job bookkeeping
//! - [`client`] - Remote queue client trait
//! - [`config`] - Driver and SQS configuration
//! - [`driver`] - The queue driver and its provider
//! - [`remote`] - Remote queue client implementations
//!
//! ## Example
//!
//! ```no_run
//! use sqs_queue_driver::{DriverConfig, JobQueue, QueueDriverProvider, SqsConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sqs = SqsConfig::from_env()?;
//! let provider = QueueDriverProvider::for_sqs(sqs, DriverConfig::default())?;
//! let driver = provider.make_driver();
//!
//! if let Some(job_id) = driver.dequeue_next().await? {
//!     let data = driver.fetch(&job_id).await?;
//!     println!("running {:?}", data.job_name);
//!     driver.acknowledge(&job_id).await?;
//! }
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod job;
pub mod message;
pub mod registry;
pub mod remote;

// Re-export commonly used types at crate root for convenience
pub use client::RemoteQueueClient;
pub use config::{DriverConfig, SqsConfig};
pub use driver::{JobQueue, QueueDriver, QueueDriverProvider};
pub use error::{
    ConfigError, DeleteError, DriverError, ReceiveError, RemoteQueueError, SendError,
    ValidationError,
};
pub use job::{JobData, JobId};
pub use message::{MessageId, ReceiptHandle, RemoteMessage};
pub use registry::{HandleRegistry, InFlightRecord};
pub use remote::{InMemoryRemoteQueue, SqsClient};
