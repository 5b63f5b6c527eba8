//! Upload client for the indexing endpoint (`POST /upload`).

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use aroveda_core::{DocumentHandle, FileBlob};

use crate::error::{ClientError, Fault};
use crate::http::{read_json, transport_fault, ServiceClient};

/// Multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// Body of a successful upload response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Identifier assigned to the indexed document.
    #[serde(default)]
    pub filename: Option<String>,
    /// Informational text from the service.
    #[serde(default)]
    pub message: Option<String>,
}

impl UploadReceipt {
    /// The assigned document identifier, if the service returned a non-empty one.
    pub fn document(&self) -> Option<DocumentHandle> {
        self.filename
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .map(DocumentHandle::new)
    }

    /// The informational message, if the service returned a non-empty one.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}

/// Sends documents to the indexing service.
#[async_trait]
pub trait UploadService: Send + Sync {
    async fn upload(&self, file: &FileBlob) -> Result<UploadReceipt, ClientError>;
}

#[derive(Debug, Clone)]
pub struct UploadClient {
    service: ServiceClient,
}

impl UploadClient {
    pub fn new(service: ServiceClient) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UploadService for UploadClient {
    async fn upload(&self, file: &FileBlob) -> Result<UploadReceipt, ClientError> {
        let url = self.service.url("/upload");
        tracing::info!(url = %url, name = %file.name, len = file.len(), "Uploading file");

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(FileBlob::MIME_TYPE)
            .map_err(|e| ClientError::Upload(Fault::Transport(e.to_string())))?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self
            .service
            .http()
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::Upload(transport_fault(&e)))?;

        let receipt: UploadReceipt = read_json(response).await.map_err(ClientError::Upload)?;
        tracing::info!(
            filename = ?receipt.filename,
            message = ?receipt.message,
            "Upload accepted"
        );
        Ok(receipt)
    }
}

// =============================================================================
// Tests
// =============================================================================
