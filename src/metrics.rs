// Performance metrics module
//
// Provides lightweight metrics tracking for monitoring the upload pipeline

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Transfer pipeline metrics
///
/// Uses atomic operations for thread-safe metric tracking without locks.
/// Counters are collected throughout the process lifetime and can be logged
/// on shutdown for performance analysis. The active/max worker gauges also
/// instrument the single-worker invariant for tests.
#[derive(Debug)]
pub struct Metrics {
    /// Total number of jobs pushed onto the queue
    jobs_enqueued: AtomicUsize,

    /// Total number of uploads that completed successfully
    uploads_completed: AtomicUsize,

    /// Total number of uploads that failed
    uploads_failed: AtomicUsize,

    /// Total transfer time in milliseconds
    total_transfer_time_ms: AtomicU64,

    /// Number of worker tasks spawned over the process lifetime
    worker_spawns: AtomicU64,

    /// Number of worker tasks currently alive
    active_workers: AtomicUsize,

    /// Highest number of simultaneously alive worker tasks ever observed
    max_active_workers: AtomicUsize,

    /// Number of status broadcasts delivered to at least one subscriber
    status_broadcasts: AtomicU64,

    /// Number of status broadcasts with no subscriber listening
    status_broadcast_errors: AtomicU64,

    /// Process start time
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            jobs_enqueued: AtomicUsize::new(0),
            uploads_completed: AtomicUsize::new(0),
            uploads_failed: AtomicUsize::new(0),
            total_transfer_time_ms: AtomicU64::new(0),
            worker_spawns: AtomicU64::new(0),
            active_workers: AtomicUsize::new(0),
            max_active_workers: AtomicUsize::new(0),
            status_broadcasts: AtomicU64::new(0),
            status_broadcast_errors: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a job being enqueued
    pub fn record_job_enqueued(&self) {
        self.jobs_enqueued.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful upload
    pub fn record_upload_completed(&self) {
        self.uploads_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed upload
    pub fn record_upload_failed(&self) {
        self.uploads_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the wall time of a single transfer
    pub fn record_transfer_time(&self, duration: Duration) {
        self.total_transfer_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record a worker task starting
    pub fn record_worker_started(&self) {
        self.worker_spawns.fetch_add(1, Ordering::SeqCst);
        let active = self.active_workers.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active_workers.fetch_max(active, Ordering::SeqCst);
    }

    /// Record a worker task exiting
    pub fn record_worker_exited(&self) {
        self.active_workers.fetch_sub(1, Ordering::SeqCst);
    }

    /// Record a status broadcast
    pub fn record_status_broadcast(&self) {
        self.status_broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a status broadcast that reached no subscriber
    pub fn record_status_broadcast_error(&self) {
        self.status_broadcast_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn jobs_enqueued(&self) -> usize {
        self.jobs_enqueued.load(Ordering::Relaxed)
    }

    pub fn uploads_completed(&self) -> usize {
        self.uploads_completed.load(Ordering::Relaxed)
    }

    pub fn uploads_failed(&self) -> usize {
        self.uploads_failed.load(Ordering::Relaxed)
    }

    pub fn worker_spawns(&self) -> u64 {
        self.worker_spawns.load(Ordering::SeqCst)
    }

    pub fn active_workers(&self) -> usize {
        self.active_workers.load(Ordering::SeqCst)
    }

    pub fn max_active_workers(&self) -> usize {
        self.max_active_workers.load(Ordering::SeqCst)
    }

    /// Get total uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Get average transfer time per completed upload in milliseconds
    pub fn avg_transfer_time_ms(&self) -> f64 {
        let total = self.total_transfer_time_ms.load(Ordering::Relaxed);
        let count = self.uploads_completed.load(Ordering::Relaxed)
            + self.uploads_failed.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Transfer Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Jobs: {} enqueued, {} uploaded, {} failed",
            self.jobs_enqueued(),
            self.uploads_completed(),
            self.uploads_failed()
        );
        tracing::info!(
            "Total transfer time: {:.2}s (avg: {:.2}ms per upload)",
            self.total_transfer_time_ms.load(Ordering::Relaxed) as f64 / 1000.0,
            self.avg_transfer_time_ms()
        );
        tracing::info!(
            "Workers: {} spawned, max {} concurrent",
            self.worker_spawns(),
            self.max_active_workers()
        );
        tracing::info!(
            "Status broadcasts: {} delivered, {} with no listener",
            self.status_broadcasts.load(Ordering::Relaxed),
            self.status_broadcast_errors.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
