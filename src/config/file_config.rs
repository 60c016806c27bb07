//! Configuration file support for paper-browser.
//!
//! # Configuration File Format
//!
//! ```toml
//! [backend]
//! base_url = "http://127.0.0.1:8000"
//! timeout_secs = 30
//! connect_timeout_secs = 10
//! page_size = 25
//!
//! [source]
//! mode = "http"   # or "mock"
//!
//! [preview]
//! enabled = true
//! max_bytes = 20971520
//! max_chars = 4000
//! allow_private_hosts = false
//!
//! [logging]
//! level = "info"
//! format = "text" # or "json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{BackendConfig, Config, LoggingConfig, PreviewConfig, SourceConfig};

/// Configuration file structure
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }

        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }

    pub fn into_config(self) -> Config {
        Config {
            backend: self.backend,
            source: self.source,
            preview: self.preview,
            logging: self.logging,
        }
    }
}

impl From<&Config> for ConfigFile {
    fn from(config: &Config) -> Self {
        Self {
            backend: config.backend.clone(),
            source: config.source.clone(),
            preview: config.preview.clone(),
            logging: config.logging.clone(),
        }
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
