//! Error types for the chat session.
//!
//! Every variant is a notice for the user: nothing was sent and the
//! conversation log is unchanged. Network and upload faults never surface
//! here; the controller records them in the log instead.

use aroveda_core::error::AroError;
use aroveda_speech::SpeechError;

/// Errors from the session controller.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Please upload a PDF file first!")]
    DocumentRequired,
    #[error("Please select a PDF file first!")]
    FileRequired,
    #[error("{0} is not a PDF file.")]
    NotPdf(String),
    #[error("Speech recognition is not supported on this platform.")]
    RecognitionUnsupported,
    #[error("no bot message at position {0}")]
    NoSuchMessage(usize),
    #[error("speech error: {0}")]
    Speech(String),
}

impl ChatError {
    /// Whether the notice comes from a failed precondition on user input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ChatError::DocumentRequired
                | ChatError::FileRequired
                | ChatError::NotPdf(_)
                | ChatError::NoSuchMessage(_)
        )
    }
}

impl From<SpeechError> for ChatError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Unsupported(_) => ChatError::RecognitionUnsupported,
            other => ChatError::Speech(other.to_string()),
        }
    }
}

impl From<ChatError> for AroError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::RecognitionUnsupported | ChatError::Speech(_) => {
                AroError::Speech(err.to_string())
            }
            other => AroError::Validation(other.to_string()),
        }
    }
}
