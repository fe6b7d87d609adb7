// Data model module
//
// Plain data carried between the producer side (whatever constructs upload
// requests) and the transfer core. No behavior beyond construction helpers.

pub mod job;
pub mod settings;

pub use job::UploadJob;
pub use settings::UploaderSettings;
