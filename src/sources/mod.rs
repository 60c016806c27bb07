//! Paper sources and the data source that mediates between them and the views.
//!
//! A [`PaperSource`] knows how to obtain papers: [`HttpSource`] talks to the
//! paper-index service, [`MockSource`] serves an in-memory catalogue. The
//! [`DataSource`] wraps a source, turns every outcome into a
//! [`ResultSet`](crate::models::ResultSet) and decides which response is current
//! when several requests overlap.
//!
//! # Source selection
//!
//! The source is chosen by `[source] mode` in the config file (`http` or `mock`),
//! the `PAPER_BROWSER_SOURCE__MODE` environment variable, or `--mock` on the
//! command line.

mod data_source;
mod http;
pub mod mock;

pub use data_source::{DataSource, FetchTicket, Fetched};
pub use http::HttpSource;
pub use mock::MockSource;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{Page, Paper};
use crate::utils::ValidationError;

/// Where papers come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// The paper-index service over HTTP
    #[default]
    Http,
    /// Built-in catalogue, no network
    Mock,
}

/// The PaperSource trait defines the interface for every origin of papers.
///
/// Both operations are idempotent reads and safe to retry. Results are returned
/// in the order the origin produced them.
#[async_trait]
pub trait PaperSource: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g. "http", "mock")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Most recently published papers
    async fn latest(&self, page: &Page) -> Result<Vec<Paper>, SourceError>;

    /// Papers matching `keyword`, relevance ordered by the origin.
    ///
    /// `keyword` has already been trimmed and is never empty.
    async fn search(&self, keyword: &str, page: &Page) -> Result<Vec<Paper>, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    /// Request rejected before reaching the network
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Transport failure (DNS, connection, TLS, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// Transport timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Paper not present in the current result set
    #[error("Paper not found: {0}")]
    NotFound(String),
}

impl SourceError {
    /// Whether this is a transport-level failure (anything the network can cause)
    pub fn is_network_failure(&self) -> bool {
        matches!(
            self,
            SourceError::Network(_)
                | SourceError::Status(_)
                | SourceError::Timeout(_)
                | SourceError::Parse(_)
        )
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            SourceError::Status(status.as_u16())
        } else if err.is_decode() {
            SourceError::Parse(err.to_string())
        } else {
            SourceError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

impl From<ValidationError> for SourceError {
    fn from(err: ValidationError) -> Self {
        SourceError::InvalidArgument(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_mentions_code() {
        let err = SourceError::Status(500);
        assert!(err.to_string().contains("500"));
        assert!(err.is_network_failure());
    }

    #[test]
    fn test_invalid_argument_is_not_network_failure() {
        let err: SourceError = ValidationError::EmptyKeyword.into();
        assert!(matches!(err, SourceError::InvalidArgument(_)));
        assert!(!err.is_network_failure());
    }

    #[test]
    fn test_source_mode_serde() {
        let mode: SourceMode = serde_json::from_str("\"mock\"").unwrap();
        assert_eq!(mode, SourceMode::Mock);
        assert_eq!(SourceMode::default(), SourceMode::Http);
    }
}
