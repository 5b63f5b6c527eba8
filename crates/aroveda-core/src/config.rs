use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AroError, Result};

/// Top-level configuration for the AroVeda client.
///
/// Loaded from `~/.aroveda/config.toml` by default. Each section corresponds
/// to one collaborator of the chat session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AroConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
}

impl AroConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AroConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| AroError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Start the session with speech playback muted.
    pub start_muted: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            start_muted: false,
        }
    }
}

/// Remote indexing and answering service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base address; `/upload` and `/query` are appended to it.
    pub base_url: String,
    /// Per-request timeout in seconds. Indexing a large PDF can take a while.
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Platform speech backends.
///
/// An empty command leaves the corresponding capability unsupported.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Text-to-speech program and its arguments. The text is written to its
    /// stdin, e.g. `["espeak-ng", "--stdin", "-v", "en-us"]`.
    pub synthesis_command: Vec<String>,
    /// Speech-to-text program and leading arguments; the language tag is appended last.
    pub recognition_command: Vec<String>,
    /// Upper bound for a single capture session, in seconds.
    pub max_capture_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            synthesis_command: Vec::new(),
            recognition_command: Vec::new(),
            max_capture_secs: 30,
        }
    }
}
