//! AroVeda Chat crate - the session layer of the document chat client.
//!
//! A `SessionController` owns one `SessionState` (conversation log, flags,
//! pending input and file, indexed document) and routes user actions to the
//! query and upload services and the speech bridge. Service faults are
//! recovered here and recorded as fixed bot messages; precondition failures
//! are returned as `ChatError` notices.

pub mod controller;
pub mod error;
pub mod log;
pub mod state;

pub use controller::{Outcome, SessionController, NO_ANSWER, QUERY_FAULT, UPLOAD_FAULT};
pub use error::ChatError;
pub use log::ConversationLog;
pub use state::{SessionState, HINT_NO_DOCUMENT, HINT_READY};
