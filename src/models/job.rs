use camino::{Utf8Path, Utf8PathBuf};

/// One pending file upload request.
///
/// Immutable once enqueued. The job is owned by the [`crate::queue::JobQueue`]
/// until dequeued, then moves by value into the worker for the duration of its
/// processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJob {
    /// Absolute path to the local replay file
    file_path: Utf8PathBuf,

    /// Human-readable label used in status messages
    description: String,
}

impl UploadJob {
    pub fn new(file_path: impl Into<Utf8PathBuf>, description: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            description: description.into(),
        }
    }

    pub fn file_path(&self) -> &Utf8Path {
        &self.file_path
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
