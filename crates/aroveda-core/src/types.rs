use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AroError, Result};

/// Language tag used for queries, synthesis and recognition.
pub const LANGUAGE: &str = "en-US";

// =============================================================================
// Conversation
// =============================================================================

/// Author of a conversation message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Typed, dictated, or upload notices produced by the user.
    User,
    /// Answers, confirmations and faults produced on the service side.
    Bot,
}

impl Role {
    /// Label shown in front of the message text.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Bot => "Bot",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Bot => write!(f, "bot"),
        }
    }
}

/// A single exchanged message. Immutable once appended to the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.role.label(), self.text)
    }
}

// =============================================================================
// Documents
// =============================================================================

/// Identifier assigned by the indexing service to an uploaded document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentHandle {
    pub filename: String,
}

impl DocumentHandle {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

impl fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.filename)
    }
}

/// A file selected for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct FileBlob {
    /// File name as presented to the indexing service.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for FileBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileBlob")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl FileBlob {
    pub const MIME_TYPE: &'static str = "application/pdf";

    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk. The blob takes the final path component as its name.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                AroError::Validation(format!("{} does not name a file", path.display()))
            })?;
        let bytes = tokio::fs::read(path).await?;
        tracing::debug!(name = %name, len = bytes.len(), "File read for upload");
        Ok(Self { name, bytes })
    }

    /// Whether the blob passes the client-side PDF filter (extension based).
    pub fn is_pdf(&self) -> bool {
        Path::new(&self.name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_role_display_and_label() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Bot.to_string(), "bot");
        assert_eq!(Role::User.label(), "You");
        assert_eq!(Role::Bot.label(), "Bot");
    }

    #[test]
    fn test_role_serde_snake_case() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        let role: Role = serde_json::from_str("\"bot\"").unwrap();
        assert_eq!(role, Role::Bot);
    }

    #[test]
    fn test_message_constructors_and_display() {
        let q = Message::user("What is X?");
        assert_eq!(q.role, Role::User);
        assert_eq!(q.to_string(), "You: What is X?");

        let a = Message::bot("42");
        assert_eq!(a.role, Role::Bot);
        assert_eq!(a.to_string(), "Bot: 42");
    }

    #[test]
    fn test_document_handle_display() {
        let handle = DocumentHandle::new("doc1.pdf");
        assert_eq!(handle.filename, "doc1.pdf");
        assert_eq!(handle.to_string(), "doc1.pdf");
    }

    #[test]
    fn test_file_blob_pdf_filter() {
        assert!(FileBlob::new("report.pdf", vec![1]).is_pdf());
        assert!(FileBlob::new("REPORT.PDF", vec![1]).is_pdf());
        assert!(!FileBlob::new("notes.txt", vec![1]).is_pdf());
        assert!(!FileBlob::new("pdf", vec![1]).is_pdf());
        assert!(!FileBlob::new("archive.pdf.zip", vec![1]).is_pdf());
    }

    #[test]
    fn test_file_blob_debug_hides_bytes() {
        let blob = FileBlob::new("a.pdf", vec![0u8; 2048]);
        let dbg = format!("{:?}", blob);
        assert!(dbg.contains("a.pdf"));
        assert!(dbg.contains("2048"));
        assert!(!dbg.contains("[0, 0"));
    }

    #[tokio::test]
    async fn test_file_blob_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manual.pdf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"%PDF-1.4 test").unwrap();

        let blob = FileBlob::from_path(&path).await.unwrap();
        assert_eq!(blob.name, "manual.pdf");
        assert_eq!(blob.len(), 13);
        assert!(blob.is_pdf());
    }

    #[tokio::test]
    async fn test_file_blob_from_missing_path() {
        let result = FileBlob::from_path(Path::new("/does/not/exist.pdf")).await;
        assert!(matches!(result, Err(AroError::Io(_))));
    }
}
