pub mod config;
pub mod error;
pub mod types;

pub use config::AroConfig;
pub use error::{AroError, Result};
pub use types::*;
