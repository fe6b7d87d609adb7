// ReplaySync - Upload Queue Manager for recorded game-session replays
//
// This is the library crate containing the core business logic and data structures.
// The binary crate (main.rs) provides the composition-root entry point.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod queue;
pub mod services;
pub mod transfer;

// Re-export commonly used types for convenience
pub use config::{ConfigManager, TransferConfig};
pub use models::{UploadJob, UploaderSettings};
pub use queue::JobQueue;
pub use services::{HttpUploader, UploadOutcome, Uploader};
pub use transfer::{TransferManager, UploadStatus};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
