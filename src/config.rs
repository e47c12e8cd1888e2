//! Runtime configuration for a duel.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! command-line overrides applied through the `with_*` setters.

use crate::error::ConfigError;
use crate::transport::DEFAULT_RECEIVE_TIMEOUT;
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};
use ttt_board::Mark;

/// Default TCP port shared by server and client.
pub const DEFAULT_PORT: u16 = 5131;

/// Connection and gameplay settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct DuelConfig {
    /// Host the client dials.
    #[serde(default = "default_host")]
    host: String,

    /// Port the server binds and the client dials.
    #[serde(default = "default_port")]
    port: u16,

    /// Receive bound in seconds; silence longer than this ends the session.
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,

    /// Whether the server accepts another client after a session ends.
    #[serde(default = "default_keep_listening")]
    keep_listening: bool,

    /// Mark the client picks without prompting.
    #[serde(default)]
    mark: Option<Mark>,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout_secs() -> u64 {
    DEFAULT_RECEIVE_TIMEOUT.as_secs()
}

fn default_keep_listening() -> bool {
    true
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            keep_listening: default_keep_listening(),
            mark: None,
        }
    }
}

impl DuelConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::new("port must be between 1 and 65535"));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::new("timeout_secs must be at least 1"));
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::new("host must not be empty"));
        }
        Ok(())
    }

    /// Receive bound as a [`Duration`].
    pub fn receive_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_protocol() {
        let config = DuelConfig::default();
        assert_eq!(*config.port(), 5131);
        assert_eq!(config.host(), "localhost");
        assert_eq!(config.receive_timeout(), Duration::from_secs(60));
        assert!(*config.keep_listening());
        assert_eq!(*config.mark(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 6000\nmark = \"O\"").unwrap();

        let config = DuelConfig::from_file(file.path()).unwrap();

        assert_eq!(*config.port(), 6000);
        assert_eq!(*config.mark(), Some(Mark::O));
        assert_eq!(config.host(), "localhost");
        assert_eq!(*config.timeout_secs(), 60);
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 0").unwrap();

        let err = DuelConfig::from_file(file.path()).unwrap_err();

        assert!(err.message.contains("port must be between 1 and 65535"));
    }

    #[test]
    fn unreadable_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DuelConfig::from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(err.message.starts_with("Failed to read config file"));
    }

    #[test]
    fn setters_override() {
        let config = DuelConfig::default()
            .with_port(7000)
            .with_keep_listening(false)
            .with_mark(Some(Mark::X));

        assert_eq!(*config.port(), 7000);
        assert!(!*config.keep_listening());
        assert_eq!(*config.mark(), Some(Mark::X));
    }
}
