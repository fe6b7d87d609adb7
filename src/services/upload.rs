use anyhow::{Context, Result};
use camino::Utf8Path;
use reqwest::multipart;
use std::future::Future;
use thiserror::Error;

/// Errors that can occur during a single upload attempt
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Failed to read {path}: {message}")]
    FileRead { path: String, message: String },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Server returned {status}: {body}")]
    HttpStatus { status: u16, body: String },
}

/// Result of a single upload attempt.
///
/// Always a value, never an unwound error: the worker loop's continuation
/// guarantee depends on every upload call returning normally.
#[derive(Debug)]
pub enum UploadOutcome {
    /// The transfer completed and the server accepted it
    Completed { response_body: String },

    /// The transfer did not complete
    Failed { error: TransferError },
}

impl UploadOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Human-readable detail: the raw response body on success, the error
    /// description on failure
    pub fn detail(&self) -> String {
        match self {
            Self::Completed { response_body } => response_body.clone(),
            Self::Failed { error } => error.to_string(),
        }
    }
}

/// One authenticated multipart file upload against a remote endpoint.
///
/// This is the collaborator contract consumed by the worker loop; tests
/// inject their own implementations through this seam.
pub trait Uploader: Send + Sync + 'static {
    fn upload(
        &self,
        endpoint: &str,
        file_path: &Utf8Path,
        upload_key: Option<&str>,
    ) -> impl Future<Output = UploadOutcome> + Send;
}

/// Production uploader backed by reqwest.
///
/// Performs a multipart form POST with the file as the `file` field and an
/// `Authorization: Token <key>` header when a key is supplied. Redirects are
/// followed (reqwest default).
///
/// TLS peer verification is DISABLED for this client. This reproduces the
/// behavior of the original transfer code and is not a recommendation; see
/// DESIGN.md before changing it.
pub struct HttpUploader {
    client: reqwest::Client,
}

impl HttpUploader {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }

    async fn perform(
        &self,
        endpoint: &str,
        file_path: &Utf8Path,
        upload_key: Option<&str>,
    ) -> std::result::Result<String, TransferError> {
        let file_bytes =
            tokio::fs::read(file_path)
                .await
                .map_err(|e| TransferError::FileRead {
                    path: file_path.to_string(),
                    message: e.to_string(),
                })?;

        let file_name = file_path.file_name().unwrap_or("replay").to_string();
        let part = multipart::Part::bytes(file_bytes).file_name(file_name);
        let form = multipart::Form::new().part("file", part);

        let mut request = self.client.post(endpoint).multipart(form);
        if let Some(key) = upload_key {
            request = request.header("Authorization", format!("Token {key}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransferError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransferError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(TransferError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        // The response handling layer is out of scope; only check that the
        // body is structurally well-formed JSON and log when it is not.
        if serde_json::from_str::<serde_json::Value>(&body).is_err() {
            tracing::warn!("Server response is not well-formed JSON: {}", body);
        } else {
            tracing::debug!("Server: {}", body);
        }

        Ok(body)
    }
}

impl Uploader for HttpUploader {
    fn upload(
        &self,
        endpoint: &str,
        file_path: &Utf8Path,
        upload_key: Option<&str>,
    ) -> impl Future<Output = UploadOutcome> + Send {
        async move {
            match self.perform(endpoint, file_path, upload_key).await {
                Ok(response_body) => UploadOutcome::Completed { response_body },
                Err(error) => UploadOutcome::Failed { error },
            }
        }
    }
}
