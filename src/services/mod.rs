//! Services module - network transfer logic for replay uploads.
//!
//! The services are **framework-agnostic** and have no dependencies on the
//! queue or worker layer, making them testable and reusable.
//!
//! # Components
//!
//! - [`Uploader`]: the seam between the worker loop and the network. The
//!   worker only ever sees an [`UploadOutcome`]; nothing unwinds across the
//!   thread boundary.
//! - [`HttpUploader`]: the production implementation. Performs one
//!   authenticated multipart form POST per call and reports the raw response
//!   body or a structured [`TransferError`].
//!
//! # Design Philosophy
//!
//! - **Stateless**: one upload per call, all inputs are explicit parameters
//! - **Async**: uses tokio/reqwest for non-blocking network I/O
//! - **Infallible surface**: transport failures become outcome values, never
//!   panics or propagated errors

pub mod upload;

pub use upload::{HttpUploader, TransferError, UploadOutcome, Uploader};
