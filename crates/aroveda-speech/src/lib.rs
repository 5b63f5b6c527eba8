//! AroVeda Speech crate - speech synthesis and recognition behind capability traits.
//!
//! The `SpeechBridge` exposes a speak/cancel and start/stop contract over
//! whatever the platform offers. Each capability is either `Supported` by a
//! backend or explicitly `Unsupported`. Capture sessions follow a strict
//! state machine: Idle -> Capturing -> Idle.

pub mod bridge;
pub mod capability;
pub mod command;
pub mod error;
pub mod mock;
pub mod state;

pub use bridge::SpeechBridge;
pub use capability::{
    Capability, SharedRecognizer, SharedSynthesizer, SpeechCapability, SpeechRecognizer,
    SpeechSynthesizer,
};
pub use command::{CommandRecognizer, CommandSynthesizer};
pub use error::SpeechError;
pub use mock::{MockRecognizer, MockSynthesizer};
pub use state::{CaptureEvent, ListeningMachine, ListeningState};
