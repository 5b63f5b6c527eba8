//! Listening state machine.
//!
//! One transition per capture event:
//! - Idle -> Capturing (start)
//! - Capturing -> Idle (result, error, or end)
//!
//! There is no terminal state; the machine is reused for every capture in a session.

use std::fmt;

use crate::error::SpeechError;

/// Whether a recognition session is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ListeningState {
    /// No capture in progress. Ready to start.
    #[default]
    Idle,
    /// A single-shot recognition session is open.
    Capturing,
}

impl fmt::Display for ListeningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListeningState::Idle => write!(f, "Idle"),
            ListeningState::Capturing => write!(f, "Capturing"),
        }
    }
}

/// Events raised by a recognition session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureEvent {
    Start,
    Result,
    Error,
    End,
}

impl fmt::Display for CaptureEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureEvent::Start => write!(f, "start"),
            CaptureEvent::Result => write!(f, "result"),
            CaptureEvent::Error => write!(f, "error"),
            CaptureEvent::End => write!(f, "end"),
        }
    }
}

impl ListeningState {
    /// The state reached by applying `event`, or `None` if the event is not
    /// valid in this state.
    pub fn next(&self, event: CaptureEvent) -> Option<ListeningState> {
        match (self, event) {
            (ListeningState::Idle, CaptureEvent::Start) => Some(ListeningState::Capturing),
            (
                ListeningState::Capturing,
                CaptureEvent::Result | CaptureEvent::Error | CaptureEvent::End,
            ) => Some(ListeningState::Idle),
            _ => None,
        }
    }
}

/// Owner of the current listening state.
///
/// All events are validated before being applied; an invalid event leaves
/// the state untouched and returns an error.
#[derive(Debug, Clone, Default)]
pub struct ListeningMachine {
    state: ListeningState,
}

impl ListeningMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ListeningState {
        self.state
    }

    pub fn is_capturing(&self) -> bool {
        self.state == ListeningState::Capturing
    }

    /// Apply a capture event and return the new state.
    pub fn apply(&mut self, event: CaptureEvent) -> Result<ListeningState, SpeechError> {
        match self.state.next(event) {
            Some(next) => {
                tracing::debug!("Listening state: {} -> {} ({})", self.state, next, event);
                self.state = next;
                Ok(next)
            }
            None => Err(SpeechError::InvalidTransition {
                from: self.state,
                event,
            }),
        }
    }

    /// Force the machine back to Idle (used when a capture was abandoned).
    pub fn reset(&mut self) {
        if self.state != ListeningState::Idle {
            tracing::warn!("Listening state machine reset to Idle from {}", self.state);
        }
        self.state = ListeningState::Idle;
    }
}

// =============================================================================
// Tests
// =============================================================================
