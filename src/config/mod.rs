//! Configuration management.
//!
//! Settings are layered: built-in defaults, then the config file, then
//! `PAPER_BROWSER_*` environment variables (`__` separates section and key,
//! e.g. `PAPER_BROWSER_BACKEND__BASE_URL`). Command-line flags are applied on
//! top by the binary.

mod file_config;

pub use file_config::{ConfigFile, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::Page;
use crate::sources::SourceMode;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "paper-browser.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PAPER_BROWSER";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Paper-index service settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Where papers come from
    #[serde(default)]
    pub source: SourceConfig,

    /// Document preview settings
    #[serde(default)]
    pub preview: PreviewConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Paper-index service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Papers requested per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// First page with the configured size
    pub fn first_page(&self) -> Page {
        Page::new(0, self.page_size.max(1))
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_page_size() -> usize {
    crate::models::DEFAULT_PAGE_SIZE
}

/// Source selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub mode: SourceMode,
}

/// Document preview configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Load previews at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Largest document downloaded for a preview
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,

    /// Characters of extracted text shown
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Allow documents on loopback and private network hosts
    #[serde(default)]
    pub allow_private_hosts: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_bytes: default_max_bytes(),
            max_chars: default_max_chars(),
            allow_private_hosts: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_bytes() -> u64 {
    20 * 1024 * 1024
}

fn default_max_chars() -> usize {
    4000
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from an optional file plus the environment.
///
/// A missing `path` means defaults and environment only.
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

/// Locate the config file: `./paper-browser.toml`, then
/// `<config dir>/paper-browser/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    default_config_path().filter(|p| p.is_file())
}

/// Per-user config file location, whether or not it exists
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("paper-browser").join("config.toml"))
}

/// Directory for the TUI log file
pub fn log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("paper-browser")
}
