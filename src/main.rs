//! ReplaySync - Upload Queue Manager for recorded game-session replays
//!
//! Composition-root entry point. The original tool wrapped this core in a
//! desktop GUI; this binary wires the same pieces together and drives them
//! from the command line instead:
//! - Logging infrastructure (file rotation + console output)
//! - Tokio async runtime (worker task execution and network I/O)
//! - Configuration loading ([`ConfigManager`])
//! - The transfer core ([`TransferManager`] + [`HttpUploader`])
//!
//! Threading model:
//! - **Main thread**: enqueues the requested files, then drains status
//!   events from the broadcast channel (the caller context of the core)
//! - **Worker task**: at most one, spawned on the tokio runtime, performs
//!   the multipart uploads strictly in enqueue order
//!
//! # Configuration
//!
//! Expected in `ReplaySync Data/ReplaySync Config.yaml`:
//! - `API URL`: remote service base URL
//! - `Upload Key`: credential sent as `Authorization: Token <key>`
//! - `Debug Mode`: switches log verbosity

use anyhow::Result;
use camino::Utf8PathBuf;
use replaysync::config::TransferConfig;
use replaysync::services::HttpUploader;
use replaysync::{APP_NAME, ConfigManager, TransferManager, VERSION};

fn main() -> Result<()> {
    // Load configuration first so its debug flag can drive log verbosity
    let config_manager = ConfigManager::new("ReplaySync Data")?;
    let settings = config_manager.load_settings()?;

    let _guard = replaysync::logging::setup_logging_with_console(
        "logs",
        "replaysync",
        settings.debug_mode,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let files: Vec<Utf8PathBuf> = std::env::args().skip(1).map(Utf8PathBuf::from).collect();
    if files.is_empty() {
        eprintln!("Usage: {} <replay file> [<replay file> ...]", APP_NAME);
        return Ok(());
    }

    if !settings.has_upload_key() {
        tracing::warn!("No upload key configured; uploading without authorization");
    }

    // Create tokio runtime for the worker task and network I/O
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("replaysync-worker")
        .build()?;

    let uploader = HttpUploader::new()?;
    let manager = TransferManager::new(
        TransferConfig::from(&settings),
        uploader,
        runtime.handle().clone(),
    );

    // Subscribe before enqueuing so no status event is missed
    let mut status_rx = manager.subscribe();

    for file in &files {
        let description = file.file_stem().unwrap_or(file.as_str()).to_string();
        manager.enqueue_file(file.clone(), description);
    }

    tracing::info!("{} file(s) enqueued", files.len());

    // Drain status events on the main thread until every job has finished.
    // Completion is judged from the manager's counters, not from received
    // events: the broadcast channel drops events when the display lags, so
    // counting Finished messages could undercount and never terminate.
    // Any job still in flight when the operator aborts is abandoned.
    let total = files.len();
    loop {
        loop {
            match status_rx.try_recv() {
                Ok(status) => println!("{}", status.message()),
                Err(tokio::sync::broadcast::error::TryRecvError::Lagged(missed)) => {
                    tracing::warn!("Status display lagged; {} event(s) dropped", missed);
                }
                Err(tokio::sync::broadcast::error::TryRecvError::Empty) => break,
                Err(tokio::sync::broadcast::error::TryRecvError::Closed) => break,
            }
        }

        let metrics = manager.metrics();
        if manager.is_idle() && metrics.uploads_completed() + metrics.uploads_failed() >= total {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(50));
    }

    manager.metrics().log_summary();

    runtime.shutdown_timeout(std::time::Duration::from_secs(5));
    tracing::info!("Shutdown complete");

    Ok(())
}
