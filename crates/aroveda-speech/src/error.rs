//! Error types for the speech bridge.

use aroveda_core::error::AroError;

use crate::capability::SpeechCapability;
use crate::state::{CaptureEvent, ListeningState};

/// Errors from speech backends and the listening state machine.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("{0} is not supported on this platform")]
    Unsupported(SpeechCapability),
    #[error("invalid listening transition: {event} while {from}")]
    InvalidTransition {
        from: ListeningState,
        event: CaptureEvent,
    },
    #[error("speech backend failed: {0}")]
    Backend(String),
    #[error("capture timed out after {0}s")]
    Timeout(u64),
}

impl From<SpeechError> for AroError {
    fn from(err: SpeechError) -> Self {
        AroError::Speech(err.to_string())
    }
}
