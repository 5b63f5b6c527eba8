//! Speech bridge: the single entry point the session uses for speech.
//!
//! Owns one synthesizer capability, one recognizer capability and the
//! listening state machine. The same recognizer handle is reused for every
//! capture session.

use std::sync::Arc;

use aroveda_core::LANGUAGE;

use crate::capability::{
    Capability, SharedRecognizer, SharedSynthesizer, SpeechCapability, SpeechRecognizer,
    SpeechSynthesizer,
};
use crate::error::SpeechError;
use crate::state::{CaptureEvent, ListeningMachine, ListeningState};

pub struct SpeechBridge {
    synthesizer: Capability<SharedSynthesizer>,
    recognizer: Capability<SharedRecognizer>,
    listening: ListeningMachine,
}

impl Default for SpeechBridge {
    fn default() -> Self {
        Self::unsupported()
    }
}

impl std::fmt::Debug for SpeechBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechBridge")
            .field("can_speak", &self.can_speak())
            .field("can_listen", &self.can_listen())
            .field("listening", &self.listening.current())
            .finish()
    }
}

impl SpeechBridge {
    pub fn new(
        synthesizer: Capability<SharedSynthesizer>,
        recognizer: Capability<SharedRecognizer>,
    ) -> Self {
        Self {
            synthesizer,
            recognizer,
            listening: ListeningMachine::new(),
        }
    }

    /// A bridge on a platform with no speech support at all.
    pub fn unsupported() -> Self {
        Self::new(Capability::Unsupported, Capability::Unsupported)
    }

    /// Convenience constructor for concrete backends.
    pub fn with_backends<S, R>(synthesizer: Option<S>, recognizer: Option<R>) -> Self
    where
        S: SpeechSynthesizer + 'static,
        R: SpeechRecognizer + 'static,
    {
        Self::new(
            synthesizer
                .map(|s| Arc::new(s) as SharedSynthesizer)
                .into(),
            recognizer.map(|r| Arc::new(r) as SharedRecognizer).into(),
        )
    }

    pub fn can_speak(&self) -> bool {
        self.synthesizer.is_supported()
    }

    pub fn can_listen(&self) -> bool {
        self.recognizer.is_supported()
    }

    pub fn listening_state(&self) -> ListeningState {
        self.listening.current()
    }

    /// Speak `text`, replacing any utterance in flight.
    ///
    /// No-op without synthesis support. Backend failures are logged, never
    /// returned: playback is best effort.
    pub async fn speak(&self, text: &str) {
        let Some(synthesizer) = self.synthesizer.supported() else {
            tracing::debug!("Speech synthesis unsupported, skipping playback");
            return;
        };
        if let Err(e) = synthesizer.cancel().await {
            tracing::warn!(error = %e, "Failed to cancel previous utterance");
        }
        if let Err(e) = synthesizer.speak(text, LANGUAGE).await {
            tracing::warn!(error = %e, "Speech playback failed");
        }
    }

    /// Stop the utterance in flight, if any.
    pub async fn cancel_speech(&self) {
        if let Some(synthesizer) = self.synthesizer.supported() {
            if let Err(e) = synthesizer.cancel().await {
                tracing::warn!(error = %e, "Failed to cancel utterance");
            }
        }
    }

    /// Run one capture session and return the top transcript.
    ///
    /// Returns `Ok(None)` when the session ends without a result or fails;
    /// failures are logged and the machine is back to Idle either way.
    /// Errors only when recognition is unsupported or a capture is already
    /// open.
    pub async fn start_listening(&mut self) -> Result<Option<String>, SpeechError> {
        let Some(recognizer) = self.recognizer.supported().cloned() else {
            return Err(SpeechError::Unsupported(SpeechCapability::Recognition));
        };

        self.listening.apply(CaptureEvent::Start)?;
        tracing::info!(language = LANGUAGE, "Listening");

        let outcome = recognizer.recognize(LANGUAGE).await;

        // The machine is Capturing here, so each finishing event is valid.
        let transcript = match outcome {
            Ok(alternatives) => match alternatives.into_iter().find(|a| !a.trim().is_empty()) {
                Some(top) => {
                    self.listening.apply(CaptureEvent::Result)?;
                    tracing::info!(text_len = top.len(), "Speech recognized");
                    Some(top)
                }
                None => {
                    self.listening.apply(CaptureEvent::End)?;
                    tracing::debug!("Capture ended without a result");
                    None
                }
            },
            Err(e) => {
                self.listening.apply(CaptureEvent::Error)?;
                tracing::warn!(error = %e, "Speech recognition failed");
                None
            }
        };
        Ok(transcript)
    }

    /// Close a capture session that was abandoned mid-flight.
    pub fn stop_listening(&mut self) {
        if self.listening.is_capturing() {
            if let Err(e) = self.listening.apply(CaptureEvent::End) {
                tracing::warn!(error = %e, "Failed to close capture session");
                self.listening.reset();
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
