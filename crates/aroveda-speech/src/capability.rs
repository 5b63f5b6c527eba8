//! Platform speech capabilities.
//!
//! Backends implement `SpeechSynthesizer` and/or `SpeechRecognizer`. Call
//! sites never sniff for platform features; they hold a `Capability` and
//! match on it.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SpeechError;

/// Which half of the speech bridge a capability refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeechCapability {
    Synthesis,
    Recognition,
}

impl fmt::Display for SpeechCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeechCapability::Synthesis => write!(f, "Speech synthesis"),
            SpeechCapability::Recognition => write!(f, "Speech recognition"),
        }
    }
}

/// A platform feature that is either backed by an implementation or absent.
#[derive(Debug, Clone)]
pub enum Capability<T> {
    Supported(T),
    Unsupported,
}

impl<T> Capability<T> {
    pub fn is_supported(&self) -> bool {
        matches!(self, Capability::Supported(_))
    }

    pub fn supported(&self) -> Option<&T> {
        match self {
            Capability::Supported(inner) => Some(inner),
            Capability::Unsupported => None,
        }
    }
}

impl<T> Default for Capability<T> {
    fn default() -> Self {
        Capability::Unsupported
    }
}

impl<T> From<Option<T>> for Capability<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => Capability::Supported(inner),
            None => Capability::Unsupported,
        }
    }
}

/// Text-to-speech backend.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Begin speaking `text`. Returns once the utterance has started, not
    /// when it finishes.
    async fn speak(&self, text: &str, language: &str) -> Result<(), SpeechError>;

    /// Stop the utterance in flight, if any.
    async fn cancel(&self) -> Result<(), SpeechError>;
}

/// Speech-to-text backend.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Run one single-shot (non-continuous) recognition session.
    ///
    /// Returns the alternatives best-first. An empty list means the session
    /// ended without a result.
    async fn recognize(&self, language: &str) -> Result<Vec<String>, SpeechError>;
}

pub type SharedSynthesizer = Arc<dyn SpeechSynthesizer>;
pub type SharedRecognizer = Arc<dyn SpeechRecognizer>;
