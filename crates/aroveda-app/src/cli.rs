//! CLI argument definitions for the AroVeda terminal client.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "AROVEDA_CONFIG";

/// AroVeda: chat with a PDF through a remote indexing and answering service.
#[derive(Parser, Debug)]
#[command(name = "aroveda", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Base URL of the service, e.g. http://localhost:8080.
    #[arg(short = 'u', long = "base-url")]
    pub base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Start with speech playback muted.
    #[arg(long = "muted")]
    pub muted: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > AROVEDA_CONFIG env var > ~/.aroveda/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var(CONFIG_ENV) {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Priority: --base-url flag > config file value.
    pub fn resolve_base_url(&self, config_base_url: &str) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| config_base_url.to_string())
    }

    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }

    /// Muted if either the flag or the config file says so.
    pub fn resolve_muted(&self, config_muted: bool) -> bool {
        self.muted || config_muted
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".aroveda").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".aroveda").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_flag_wins() {
        let args = CliArgs::parse_from(["aroveda", "--config", "/tmp/aro.toml"]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/aro.toml"));
    }

    #[test]
    fn test_default_config_path_ends_in_aroveda_dir() {
        let path = default_config_path();
        assert!(path.ends_with("config.toml"));
    }

    #[test]
    fn test_overrides_fall_back_to_config() {
        let args = CliArgs::parse_from(["aroveda"]);
        assert_eq!(
            args.resolve_base_url("http://localhost:8080"),
            "http://localhost:8080"
        );
        assert_eq!(args.resolve_log_level("warn"), "warn");
        assert!(!args.resolve_muted(false));
        assert!(args.resolve_muted(true));
    }

    #[test]
    fn test_flags_override_config() {
        let args = CliArgs::parse_from([
            "aroveda",
            "-u",
            "http://10.0.0.5:9000",
            "--log-level",
            "debug",
            "--muted",
        ]);
        assert_eq!(
            args.resolve_base_url("http://localhost:8080"),
            "http://10.0.0.5:9000"
        );
        assert_eq!(args.resolve_log_level("info"), "debug");
        assert!(args.resolve_muted(false));
    }
}
