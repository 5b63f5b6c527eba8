//! In-memory service clients for testing without a running backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use aroveda_core::FileBlob;

use crate::error::{ClientError, Fault};
use crate::query::{QueryRequest, QueryService};
use crate::upload::{UploadReceipt, UploadService};

#[derive(Debug, Clone)]
enum QueryReply {
    Answer(Option<String>),
    Fail,
}

#[derive(Debug, Clone)]
enum UploadReply {
    Receipt(UploadReceipt),
    /// Use the uploaded file name as the identifier, with this message.
    EchoName(Option<String>),
    Fail,
}

/// Mock query service with a fixed reply.
///
/// Clones share the request log.
#[derive(Debug, Clone)]
pub struct MockQueryService {
    reply: QueryReply,
    requests: Arc<Mutex<Vec<QueryRequest>>>,
}

impl MockQueryService {
    /// Answers every question with `answer`.
    pub fn answering(answer: &str) -> Self {
        Self::with_reply(QueryReply::Answer(Some(answer.to_string())))
    }

    /// Responds successfully but without an answer field.
    pub fn answering_nothing() -> Self {
        Self::with_reply(QueryReply::Answer(None))
    }

    /// Fails every request with a transport fault.
    pub fn failing() -> Self {
        Self::with_reply(QueryReply::Fail)
    }

    fn with_reply(reply: QueryReply) -> Self {
        Self {
            reply,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl QueryService for MockQueryService {
    async fn query(&self, request: &QueryRequest) -> Result<Option<String>, ClientError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        match &self.reply {
            QueryReply::Answer(answer) => Ok(answer.clone()),
            QueryReply::Fail => Err(ClientError::Network(Fault::Transport(
                "connection refused".to_string(),
            ))),
        }
    }
}

/// Mock upload service with a fixed receipt.
#[derive(Debug, Clone)]
pub struct MockUploadService {
    reply: UploadReply,
    uploads: Arc<Mutex<Vec<String>>>,
    bytes: Arc<AtomicUsize>,
}

impl MockUploadService {
    pub fn returning(receipt: UploadReceipt) -> Self {
        Self::with_reply(UploadReply::Receipt(receipt))
    }

    /// Accepts every upload and echoes the file name back as the identifier.
    pub fn accepting(message: &str) -> Self {
        Self::with_reply(UploadReply::EchoName(Some(message.to_string())))
    }

    pub fn failing() -> Self {
        Self::with_reply(UploadReply::Fail)
    }

    fn with_reply(reply: UploadReply) -> Self {
        Self {
            reply,
            uploads: Arc::new(Mutex::new(Vec::new())),
            bytes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Names of the files uploaded so far, oldest first.
    pub fn uploaded(&self) -> Vec<String> {
        self.uploads.lock().map(|u| u.clone()).unwrap_or_default()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().map(|u| u.len()).unwrap_or(0)
    }

    /// Total bytes received across all uploads.
    pub fn bytes_received(&self) -> usize {
        self.bytes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UploadService for MockUploadService {
    async fn upload(&self, file: &FileBlob) -> Result<UploadReceipt, ClientError> {
        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.push(file.name.clone());
        }
        self.bytes.fetch_add(file.len(), Ordering::SeqCst);
        match &self.reply {
            UploadReply::Receipt(receipt) => Ok(receipt.clone()),
            UploadReply::EchoName(message) => Ok(UploadReceipt {
                filename: Some(file.name.clone()),
                message: message.clone(),
            }),
            UploadReply::Fail => Err(ClientError::Upload(Fault::Status {
                status: 500,
                message: "Error processing PDF".to_string(),
            })),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
