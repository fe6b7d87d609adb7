// Transfer module
//
// This module provides the TransferManager, the single entry point producers
// use to enqueue upload jobs and consumers use to subscribe to status events.
// It owns the JobQueue and the lifecycle of the one background worker task
// that drains it.

use crate::config::TransferConfig;
use crate::metrics::Metrics;
use crate::models::UploadJob;
use crate::queue::JobQueue;
use crate::services::{UploadOutcome, Uploader};
use camino::Utf8PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::broadcast;

/// API method suffix for replay uploads
const REPLAYS_METHOD: &str = "replays/";

/// Status events emitted while the worker processes the queue
///
/// Events are transient and never stored: they are broadcast at emission time
/// and consumed by zero or more subscribers on their own execution context.
#[derive(Clone, Debug, PartialEq)]
pub enum UploadStatus {
    /// The worker has started transferring a job
    Started { description: String },

    /// The worker is done with a job, successfully or not.
    ///
    /// The explicit `succeeded` flag is a deliberate extension over the
    /// original tool, which emitted the same terminal message for both
    /// outcomes.
    Finished {
        description: String,
        succeeded: bool,
        detail: String,
    },
}

impl UploadStatus {
    /// Render the human-readable status text shown to the operator
    pub fn message(&self) -> String {
        match self {
            Self::Started { description } => format!("Uploading {}...", description),
            Self::Finished {
                description,
                succeeded: true,
                ..
            } => format!("Uploaded {}", description),
            Self::Finished {
                description,
                succeeded: false,
                detail,
            } => format!("Upload of {} failed: {}", description, detail),
        }
    }
}

/// Worker lifecycle state, guarded by a single mutex.
///
/// The matched critical sections "push + transition to Running" and
/// "observe empty + transition to Idle" close the race window between a
/// producer enqueuing a job and the worker deciding to exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerState {
    Idle,
    Running,
}

/// The upload queue manager.
///
/// Accepts upload requests for replay files, serializes them through a single
/// background worker, performs one authenticated multipart upload per job via
/// the injected [`Uploader`], and reports progress asynchronously without
/// blocking the caller.
///
/// Explicitly constructed and dependency-injected: the composition root
/// creates one instance with process-long lifetime and hands out clones
/// (clones share the same queue, worker state and status channel).
///
/// # Guarantees
///
/// - Jobs are processed strictly in enqueue order (FIFO)
/// - At most one worker task is alive at any instant
/// - `enqueue` never blocks on network I/O
/// - A failing upload never halts the worker and is never retried
/// - Status events reach subscribers only through the broadcast channel,
///   never as calls made on the worker's context
pub struct TransferManager<U: Uploader> {
    /// The job queue shared between all producers and the worker
    queue: Arc<JobQueue>,

    /// Worker lifecycle state machine
    worker_state: Arc<Mutex<WorkerState>>,

    /// Broadcast channel for emitting upload status events
    status_tx: broadcast::Sender<UploadStatus>,

    /// Collaborator performing the actual network transfer
    uploader: Arc<U>,

    /// Remote endpoint and credential, read-only
    config: Arc<TransferConfig>,

    /// Performance and invariant instrumentation
    metrics: Arc<Metrics>,

    /// Handle used to spawn the worker task
    handle: tokio::runtime::Handle,
}

impl<U: Uploader> TransferManager<U> {
    /// Create a new TransferManager.
    ///
    /// # Arguments
    /// * `config` - remote API base URL and optional upload key
    /// * `uploader` - the transfer collaborator (production: [`crate::services::HttpUploader`])
    /// * `handle` - tokio runtime handle the worker task is spawned on
    pub fn new(config: TransferConfig, uploader: U, handle: tokio::runtime::Handle) -> Self {
        let (status_tx, _) = broadcast::channel(100);
        Self {
            queue: Arc::new(JobQueue::new()),
            worker_state: Arc::new(Mutex::new(WorkerState::Idle)),
            status_tx,
            uploader: Arc::new(uploader),
            config: Arc::new(config),
            metrics: Arc::new(Metrics::new()),
            handle,
        }
    }

    /// Enqueue a replay file for upload. Asynchronous and non-blocking: the
    /// job is pushed onto the queue and picked up by the worker in FIFO
    /// order.
    ///
    /// Ensures a worker is active: if none is running, exactly one is
    /// started; concurrent callers never start two.
    pub fn enqueue(&self, job: UploadJob) {
        self.queue.push(job);
        self.metrics.record_job_enqueued();
        self.ensure_worker();
    }

    /// Convenience form of [`enqueue`](Self::enqueue) taking the raw fields
    pub fn enqueue_file(
        &self,
        file_path: impl Into<Utf8PathBuf>,
        description: impl Into<String>,
    ) {
        self.enqueue(UploadJob::new(file_path, description));
    }

    /// Subscribe to upload status events.
    ///
    /// Returns a receiver the subscriber drains on its own schedule; worker
    /// code never executes on the subscriber's behalf.
    pub fn subscribe(&self) -> broadcast::Receiver<UploadStatus> {
        self.status_tx.subscribe()
    }

    /// Whether no worker task is currently active
    pub fn is_idle(&self) -> bool {
        *self.worker_state.lock().unwrap() == WorkerState::Idle
    }

    /// Number of jobs waiting in the queue (excluding the one in flight)
    pub fn queued_jobs(&self) -> usize {
        self.queue.len()
    }

    /// Instrumentation counters
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Start the worker task unless one is already running.
    ///
    /// The Idle -> Running transition happens under the worker-state lock,
    /// so two concurrent `enqueue` calls can never both spawn.
    fn ensure_worker(&self) {
        let mut state = self.worker_state.lock().unwrap();
        if *state == WorkerState::Running {
            return;
        }

        *state = WorkerState::Running;
        self.metrics.record_worker_started();
        drop(state);

        let manager = self.clone();
        self.handle.spawn(async move {
            manager.drain().await;
        });
    }

    /// Worker loop: drain the queue one job at a time, then exit.
    ///
    /// The emptiness check before exit re-acquires the worker-state lock and
    /// re-checks the queue, so a job pushed after an empty `try_pop` but
    /// before the Running -> Idle transition is still picked up by this
    /// worker instead of being stranded.
    async fn drain(self) {
        tracing::debug!("Upload worker started");

        loop {
            let job = match self.queue.try_pop() {
                Some(job) => job,
                None => {
                    let mut state = self.worker_state.lock().unwrap();
                    if !self.queue.is_empty() {
                        // An enqueue raced our emptiness check; keep going.
                        continue;
                    }
                    *state = WorkerState::Idle;
                    self.metrics.record_worker_exited();
                    break;
                }
            };

            self.process_job(job).await;
        }

        tracing::debug!("Upload worker exited");
    }

    /// Perform one upload and emit its Started/Finished status pair.
    ///
    /// Best-effort, no-retry: whatever the outcome, the job is consumed and
    /// the loop advances to the next one.
    async fn process_job(&self, job: UploadJob) {
        let endpoint = self.config.api_endpoint(REPLAYS_METHOD);

        self.emit(UploadStatus::Started {
            description: job.description().to_string(),
        });
        tracing::info!("Uploading {} ({})", job.description(), job.file_path());

        let start = Instant::now();
        let outcome = self
            .uploader
            .upload(&endpoint, job.file_path(), self.config.upload_key())
            .await;
        self.metrics.record_transfer_time(start.elapsed());

        match &outcome {
            UploadOutcome::Completed { .. } => {
                self.metrics.record_upload_completed();
                tracing::info!("Uploaded {}", job.description());
            }
            UploadOutcome::Failed { error } => {
                self.metrics.record_upload_failed();
                tracing::error!("Upload of {} failed: {}", job.description(), error);
            }
        }

        self.emit(UploadStatus::Finished {
            description: job.description().to_string(),
            succeeded: outcome.succeeded(),
            detail: outcome.detail(),
        });
    }

    fn emit(&self, status: UploadStatus) {
        tracing::debug!("Transfer update: {}", status.message());
        match self.status_tx.send(status) {
            Ok(_) => self.metrics.record_status_broadcast(),
            // It's OK if no one is listening
            Err(_) => self.metrics.record_status_broadcast_error(),
        }
    }
}

// Manual Clone implementation: U itself need not be Clone, clones share the
// same Arc internals.
impl<U: Uploader> Clone for TransferManager<U> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
            worker_state: Arc::clone(&self.worker_state),
            status_tx: self.status_tx.clone(),
            uploader: Arc::clone(&self.uploader),
            config: Arc::clone(&self.config),
            metrics: Arc::clone(&self.metrics),
            handle: self.handle.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Uploader double that records endpoints and always succeeds
    struct RecordingUploader {
        calls: AtomicUsize,
    }

    impl RecordingUploader {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Uploader for RecordingUploader {
        fn upload(
            &self,
            _endpoint: &str,
            _file_path: &Utf8Path,
            _upload_key: Option<&str>,
        ) -> impl Future<Output = UploadOutcome> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            async { UploadOutcome::Completed { response_body: "{}".to_string() } }
        }
    }

    fn test_config() -> TransferConfig {
        TransferConfig::new("https://example.test/api/", Some("key".to_string()))
    }

    #[test]
    fn test_status_message_rendering() {
        let started = UploadStatus::Started {
            description: "Match 1".to_string(),
        };
        assert_eq!(started.message(), "Uploading Match 1...");

        let finished = UploadStatus::Finished {
            description: "Match 1".to_string(),
            succeeded: true,
            detail: "{}".to_string(),
        };
        assert_eq!(finished.message(), "Uploaded Match 1");

        let failed = UploadStatus::Finished {
            description: "Match 1".to_string(),
            succeeded: false,
            detail: "connection refused".to_string(),
        };
        assert_eq!(
            failed.message(),
            "Upload of Match 1 failed: connection refused"
        );
    }

    #[tokio::test]
    async fn test_manager_starts_idle() {
        let manager = TransferManager::new(
            test_config(),
            RecordingUploader::new(),
            tokio::runtime::Handle::current(),
        );

        assert!(manager.is_idle());
        assert_eq!(manager.queued_jobs(), 0);
    }

    #[tokio::test]
    async fn test_enqueue_processes_job_and_returns_to_idle() {
        let manager = TransferManager::new(
            test_config(),
            RecordingUploader::new(),
            tokio::runtime::Handle::current(),
        );
        let mut rx = manager.subscribe();

        manager.enqueue(UploadJob::new("/replays/a.replay", "Replay A"));

        let started = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            started,
            UploadStatus::Started {
                description: "Replay A".to_string()
            }
        );

        let finished = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(
            finished,
            UploadStatus::Finished { succeeded: true, .. }
        ));

        // The worker exits once the queue is drained
        tokio::time::timeout(Duration::from_secs(5), async {
            while !manager.is_idle() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();

        assert_eq!(manager.metrics().uploads_completed(), 1);
    }

    #[tokio::test]
    async fn test_clone_shares_queue_and_state() {
        let manager = TransferManager::new(
            test_config(),
            RecordingUploader::new(),
            tokio::runtime::Handle::current(),
        );
        let clone = manager.clone();
        let mut rx = manager.subscribe();

        clone.enqueue(UploadJob::new("/replays/b.replay", "Replay B"));

        let started = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(started, UploadStatus::Started { .. }));
    }
}
