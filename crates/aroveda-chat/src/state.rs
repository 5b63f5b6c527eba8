//! Mutable state of one chat session.

use aroveda_core::{DocumentHandle, FileBlob};

use crate::log::ConversationLog;

/// Input hint once a document has been indexed.
pub const HINT_READY: &str = "Ask a question about your uploaded PDF...";
/// Input hint before any document has been indexed.
pub const HINT_NO_DOCUMENT: &str = "Upload a PDF first...";

/// Everything the session remembers. One instance per session, owned by the
/// controller.
///
/// A query may be issued only while `document` is set and `loading` is false.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub messages: ConversationLog,
    /// A query or upload is in flight.
    pub loading: bool,
    /// Suppresses all speech playback.
    pub muted: bool,
    /// A capture session is open.
    pub listening: bool,
    /// File selected for the next upload.
    pub pending_file: Option<FileBlob>,
    /// Identifier of the indexed document queries refer to.
    pub document: Option<DocumentHandle>,
    /// Text waiting to be sent. Written by typing or speech capture.
    pub input: String,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    /// Whether a question may be sent now.
    pub fn can_query(&self) -> bool {
        self.has_document() && !self.loading
    }

    /// Enabled state of the send control.
    pub fn can_submit(&self) -> bool {
        !self.input.trim().is_empty() && self.can_query()
    }

    /// Enabled state of the upload control.
    pub fn can_upload(&self) -> bool {
        self.pending_file.is_some() && !self.loading
    }

    pub fn input_hint(&self) -> &'static str {
        if self.has_document() {
            HINT_READY
        } else {
            HINT_NO_DOCUMENT
        }
    }
}
