//! Session controller: validates user actions, drives the service clients
//! and the speech bridge, and records the conversation.

use std::sync::Arc;

use aroveda_client::{QueryRequest, QueryService, UploadService};
use aroveda_core::{DocumentHandle, FileBlob};
use aroveda_speech::SpeechBridge;

use crate::error::ChatError;
use crate::log::ConversationLog;
use crate::state::SessionState;

/// Bot text when the service answered without an answer.
pub const NO_ANSWER: &str = "No answer returned.";
/// Bot text when a query fails.
pub const QUERY_FAULT: &str = "⚠️ Unable to connect. Try again.";
/// Bot text when an upload fails.
pub const UPLOAD_FAULT: &str = "⚠️ Upload failed. Please try again.";

/// What a submission did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Preconditions not met (blank input, request in flight, nothing
    /// selected); nothing changed.
    Skipped,
    /// The service answered and the reply was appended.
    Completed,
    /// The service call failed and the fixed fault text was appended.
    Faulted,
}

/// Holds the `loading` flag up for one request. The flag drops back when the
/// guard does, including when the submitting future is cancelled mid-await.
struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    fn start(loading: &'a mut bool) -> Self {
        *loading = true;
        Self(loading)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

async fn speak_unless_muted(speech: &SpeechBridge, muted: bool, text: &str) {
    if muted {
        tracing::debug!("Muted, skipping playback");
        return;
    }
    speech.speak(text).await;
}

pub struct SessionController {
    state: SessionState,
    query: Arc<dyn QueryService>,
    upload: Arc<dyn UploadService>,
    speech: SpeechBridge,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state)
            .field("speech", &self.speech)
            .finish_non_exhaustive()
    }
}

impl SessionController {
    pub fn new(
        query: Arc<dyn QueryService>,
        upload: Arc<dyn UploadService>,
        speech: SpeechBridge,
    ) -> Self {
        Self {
            state: SessionState::new(),
            query,
            upload,
            speech,
        }
    }

    /// Convenience constructor for concrete services.
    pub fn with_services<Q, U>(query: Q, upload: U, speech: SpeechBridge) -> Self
    where
        Q: QueryService + 'static,
        U: UploadService + 'static,
    {
        Self::new(Arc::new(query), Arc::new(upload), speech)
    }

    /// Start the session muted or not.
    pub fn muted(mut self, muted: bool) -> Self {
        self.state.muted = muted;
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn messages(&self) -> &ConversationLog {
        &self.state.messages
    }

    pub fn document(&self) -> Option<&DocumentHandle> {
        self.state.document.as_ref()
    }

    pub fn pending_file(&self) -> Option<&FileBlob> {
        self.state.pending_file.as_ref()
    }

    pub fn input(&self) -> &str {
        &self.state.input
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn is_muted(&self) -> bool {
        self.state.muted
    }

    pub fn is_listening(&self) -> bool {
        self.state.listening
    }

    pub fn speech(&self) -> &SpeechBridge {
        &self.speech
    }

    pub fn input_hint(&self) -> &'static str {
        self.state.input_hint()
    }

    pub fn can_submit(&self) -> bool {
        self.state.can_submit()
    }

    pub fn can_upload(&self) -> bool {
        self.state.can_upload()
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Replace the pending input text.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.state.input = text.into();
    }

    /// Store `file` as the pending upload. Only PDFs pass.
    pub fn select_file(&mut self, file: FileBlob) -> Result<(), ChatError> {
        if !file.is_pdf() {
            tracing::debug!(name = %file.name, "Rejected non-PDF selection");
            return Err(ChatError::NotPdf(file.name));
        }
        tracing::info!(name = %file.name, len = file.len(), "File selected");
        self.state.pending_file = Some(file);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Query
    // -------------------------------------------------------------------------

    /// Send the pending input text as a question.
    pub async fn submit_input(&mut self) -> Result<Outcome, ChatError> {
        let text = self.state.input.clone();
        self.submit_question(&text).await
    }

    /// Ask a question about the indexed document.
    ///
    /// Blank text or a request in flight is skipped silently. Without a
    /// document the call is refused with a notice and nothing is sent.
    pub async fn submit_question(&mut self, text: &str) -> Result<Outcome, ChatError> {
        if text.trim().is_empty() || self.state.loading {
            return Ok(Outcome::Skipped);
        }
        let Some(document) = self.state.document.clone() else {
            return Err(ChatError::DocumentRequired);
        };

        let _in_flight = InFlight::start(&mut self.state.loading);
        self.state.messages.push_user(text);
        self.state.input.clear();

        let request = QueryRequest::new(text, &document);
        let outcome = match self.query.query(&request).await {
            Ok(answer) => {
                let reply = answer
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| NO_ANSWER.to_string());
                self.state.messages.push_bot(reply.as_str());
                speak_unless_muted(&self.speech, self.state.muted, &reply).await;
                Outcome::Completed
            }
            Err(e) => {
                tracing::warn!(error = %e, filename = %document, "Query failed");
                self.state.messages.push_bot(QUERY_FAULT);
                Outcome::Faulted
            }
        };
        Ok(outcome)
    }

    // -------------------------------------------------------------------------
    // Upload
    // -------------------------------------------------------------------------

    /// Upload the pending file and index it.
    ///
    /// On success the returned identifier replaces the current document and
    /// the selection is cleared. On failure the selection is kept for a retry.
    pub async fn submit_upload(&mut self) -> Result<Outcome, ChatError> {
        if self.state.loading {
            return Ok(Outcome::Skipped);
        }
        let Some(file) = self.state.pending_file.clone() else {
            return Err(ChatError::FileRequired);
        };

        let _in_flight = InFlight::start(&mut self.state.loading);
        self.state
            .messages
            .push_user(format!("📎 Uploaded file: {}", file.name));

        let outcome = match self.upload.upload(&file).await {
            Ok(receipt) => {
                if let Some(document) = receipt.document() {
                    tracing::info!(filename = %document, "Document indexed");
                    self.state
                        .messages
                        .push_bot(format!("File uploaded and indexed: {}", document));
                    self.state.document = Some(document);
                } else if let Some(message) = receipt.message() {
                    self.state.messages.push_bot(message);
                }
                if let Some(message) = receipt.message() {
                    speak_unless_muted(&self.speech, self.state.muted, message).await;
                }
                self.state.pending_file = None;
                Outcome::Completed
            }
            Err(e) => {
                tracing::warn!(error = %e, name = %file.name, "Upload failed");
                self.state.messages.push_bot(UPLOAD_FAULT);
                Outcome::Faulted
            }
        };
        Ok(outcome)
    }

    // -------------------------------------------------------------------------
    // Speech
    // -------------------------------------------------------------------------

    /// Flip the mute flag. Muting also stops the utterance in flight.
    pub async fn toggle_mute(&mut self) -> bool {
        self.state.muted = !self.state.muted;
        tracing::debug!(muted = self.state.muted, "Mute toggled");
        if self.state.muted {
            self.speech.cancel_speech().await;
        }
        self.state.muted
    }

    /// Open a capture session and write the transcript into the input text.
    ///
    /// Returns the transcript, or `None` when the capture produced nothing.
    /// If a capture is somehow still marked open, it is closed instead.
    pub async fn toggle_listening(&mut self) -> Result<Option<String>, ChatError> {
        if self.state.listening {
            self.speech.stop_listening();
            self.state.listening = false;
            return Ok(None);
        }
        if !self.speech.can_listen() {
            return Err(ChatError::RecognitionUnsupported);
        }

        self.state.listening = true;
        let result = self.speech.start_listening().await;
        self.state.listening = false;

        let transcript = result?;
        if let Some(text) = &transcript {
            self.state.input = text.clone();
        }
        Ok(transcript)
    }

    /// Speak the bot message at `index` again.
    pub async fn replay(&mut self, index: usize) -> Result<(), ChatError> {
        let text = self
            .state
            .messages
            .bot_message(index)
            .map(|m| m.text.clone())
            .ok_or(ChatError::NoSuchMessage(index))?;
        speak_unless_muted(&self.speech, self.state.muted, &text).await;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
