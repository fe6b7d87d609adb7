// Job queue module
//
// The queue is the synchronization boundary between producer call sites and
// the single worker: callers never need external locking.

use crate::models::UploadJob;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Thread-safe, unbounded FIFO queue of [`UploadJob`].
///
/// Insertion order is the processing order: no priority, no dedup. Supports
/// any number of concurrent producers and a single consumer.
#[derive(Debug, Default)]
pub struct JobQueue {
    jobs: Mutex<VecDeque<UploadJob>>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a job to the tail. Never fails.
    pub fn push(&self, job: UploadJob) {
        let mut jobs = self.jobs.lock().unwrap();
        jobs.push_back(job);
        tracing::debug!("{} entries in upload queue", jobs.len());
    }

    /// Remove and return the head job, or `None` if the queue is empty.
    /// Never blocks.
    pub fn try_pop(&self) -> Option<UploadJob> {
        self.jobs.lock().unwrap().pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.lock().unwrap().is_empty()
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }
}
