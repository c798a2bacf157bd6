//! Process-local bookkeeping for in-flight jobs.

use crate::job::JobId;
use crate::message::ReceiptHandle;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// State retained for one delivered, not-yet-acknowledged job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InFlightRecord {
    /// Id under which the job was handed to the framework
    pub job_id: JobId,

    /// Deletion token for the delivery that produced this record
    pub receipt_handle: ReceiptHandle,

    /// Message body exactly as delivered; decoded lazily by `fetch`
    pub raw_body: String,
}

impl InFlightRecord {
    /// Create a record for a freshly delivered message
    pub fn new(job_id: JobId, receipt_handle: ReceiptHandle, raw_body: String) -> Self {
        Self {
            job_id,
            receipt_handle,
            raw_body,
        }
    }
}

/// Map from job id to in-flight record, shared by every driver one provider
/// creates
///
/// All access goes through a single mutex domain with short critical
/// sections; callers clone data out and never hold the lock across I/O.
/// Records for jobs that are never acknowledged stay until the process
/// exits.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    records: Mutex<HashMap<JobId, InFlightRecord>>,
}

impl HandleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any live record under the same id
    ///
    /// Replacement is deliberate: a message redelivered after its visibility
    /// timeout can surface under an id that is still registered, and only
    /// the fresh delivery's receipt handle is still valid.
    pub fn register(&self, record: InFlightRecord) {
        self.lock().insert(record.job_id.clone(), record);
    }

    /// Clone out the record for `id`, if one is live
    pub fn lookup(&self, id: &JobId) -> Option<InFlightRecord> {
        self.lock().get(id).cloned()
    }

    /// Remove and return the record for `id`
    ///
    /// When several callers race on the same id, exactly one observes the
    /// record; the rest see `None`.
    pub fn evict(&self, id: &JobId) -> Option<InFlightRecord> {
        self.lock().remove(id)
    }

    /// Number of live in-flight records
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check whether no jobs are in flight
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<JobId, InFlightRecord>> {
        // Every critical section is a single map operation, so a poisoned
        // lock still guards a consistent map.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
