//! In-memory speech backends for testing without audio hardware.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::capability::{SpeechRecognizer, SpeechSynthesizer};
use crate::error::SpeechError;

/// Mock synthesizer that records every utterance and cancel request.
///
/// Clones share the same recording, so a test can keep one handle and give
/// the other to the bridge.
#[derive(Debug, Clone, Default)]
pub struct MockSynthesizer {
    utterances: Arc<Mutex<Vec<(String, String)>>>,
    cancels: Arc<AtomicUsize>,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texts spoken so far, oldest first.
    pub fn spoken(&self) -> Vec<String> {
        self.utterances
            .lock()
            .map(|u| u.iter().map(|(text, _)| text.clone()).collect())
            .unwrap_or_default()
    }

    /// Language tags of the utterances, oldest first.
    pub fn languages(&self) -> Vec<String> {
        self.utterances
            .lock()
            .map(|u| u.iter().map(|(_, lang)| lang.clone()).collect())
            .unwrap_or_default()
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn speak(&self, text: &str, language: &str) -> Result<(), SpeechError> {
        let mut utterances = self
            .utterances
            .lock()
            .map_err(|e| SpeechError::Backend(format!("utterance lock poisoned: {}", e)))?;
        utterances.push((text.to_string(), language.to_string()));
        Ok(())
    }

    async fn cancel(&self) -> Result<(), SpeechError> {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Mock recognizer that replays scripted outcomes in order.
///
/// When the script runs dry, each session ends without a result.
#[derive(Debug, Clone, Default)]
pub struct MockRecognizer {
    script: Arc<Mutex<VecDeque<Result<Vec<String>, String>>>>,
    sessions: Arc<AtomicUsize>,
}

impl MockRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recognizer whose first session hears `transcript`.
    pub fn with_transcript(transcript: &str) -> Self {
        let recognizer = Self::new();
        recognizer.push_alternatives(vec![transcript.to_string()]);
        recognizer
    }

    pub fn push_alternatives(&self, alternatives: Vec<String>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Ok(alternatives));
        }
    }

    pub fn push_error(&self, message: &str) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Err(message.to_string()));
        }
    }

    /// Number of recognition sessions opened so far.
    pub fn session_count(&self) -> usize {
        self.sessions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    async fn recognize(&self, _language: &str) -> Result<Vec<String>, SpeechError> {
        self.sessions.fetch_add(1, Ordering::SeqCst);
        let next = self
            .script
            .lock()
            .map_err(|e| SpeechError::Backend(format!("script lock poisoned: {}", e)))?
            .pop_front();
        match next {
            Some(Ok(alternatives)) => Ok(alternatives),
            Some(Err(message)) => Err(SpeechError::Backend(message)),
            None => Ok(Vec::new()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
