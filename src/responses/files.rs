//! File upload against the files endpoint.
//!
//! Uploaded bytes live server-side under a file identifier; multimodal
//! input references that identifier instead of resending the bytes.

use serde::Deserialize;

use crate::core::error::LlmError;
use crate::provider::constants;
use crate::responses::client::{ProviderConfig, ResponsesClient};

/// Why a file is being uploaded. The service routes storage and retention
/// by this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilePurpose {
    UserData,
    Assistants,
    Vision,
    Batch,
    #[serde(rename = "fine-tune")]
    FineTune,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for FilePurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            FilePurpose::UserData => "user_data",
            FilePurpose::Assistants => "assistants",
            FilePurpose::Vision => "vision",
            FilePurpose::Batch => "batch",
            FilePurpose::FineTune => "fine-tune",
            FilePurpose::Unknown => "unknown",
        };
        write!(f, "{tag}")
    }
}

/// Local bytes headed for the files endpoint.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub purpose: FilePurpose,
}

impl FileUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>, purpose: FilePurpose) -> Self {
        Self {
            filename: filename.into(),
            bytes,
            purpose,
        }
    }

    /// Upload destined for use as model input (PDFs, images).
    pub fn user_data(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(filename, bytes, FilePurpose::UserData)
    }
}

/// Stored file as reported by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct FileObject {
    pub id: String,
    pub filename: String,
    pub purpose: FilePurpose,
    /// Size in bytes.
    #[serde(default)]
    pub bytes: Option<u64>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl<P: ProviderConfig> ResponsesClient<P> {
    /// Push local bytes to the files endpoint, returning the identifier
    /// later turns can reference.
    #[tracing::instrument(
        name = "files_upload",
        skip(self, upload),
        fields(filename = %upload.filename, purpose = %upload.purpose),
        err
    )]
    pub async fn upload_file(&self, upload: FileUpload) -> Result<FileObject, LlmError> {
        let url = self.endpoint_url(constants::FILES_ENDPOINT)?;

        let part = reqwest::multipart::Part::bytes(upload.bytes).file_name(upload.filename);
        let form = reqwest::multipart::Form::new()
            .text("purpose", upload.purpose.to_string())
            .part("file", part);

        self.http().post_multipart(&url, &self.headers(), form).await
    }
}
