//! Paper-index service over HTTP.

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::{normalize_records, Page, Paper, PaperRecord};
use crate::sources::{PaperSource, SourceError};
use crate::utils::{validate_url, HttpClient};

/// Path of the latest-papers endpoint
const LATEST_PATH: &str = "/papers/latest";
/// Path of the keyword search endpoint
const SEARCH_PATH: &str = "/papers/search";

/// Client for the paper-index service
///
/// Endpoints:
/// - `GET /papers/latest?start&max_results`
/// - `GET /papers/search?keyword&start&max_results`
///
/// Both return a JSON array of paper records.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Arc<HttpClient>,
    base_url: String,
}

impl HttpSource {
    /// Create a source for the service at `base_url` with a default client
    pub fn new(base_url: &str) -> Result<Self, SourceError> {
        Self::with_client(Arc::new(HttpClient::new()?), base_url)
    }

    /// Create with a custom HTTP client
    pub fn with_client(client: Arc<HttpClient>, base_url: &str) -> Result<Self, SourceError> {
        let base_url = validate_url(base_url)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn latest_url(&self, page: &Page) -> String {
        format!(
            "{}{}?start={}&max_results={}",
            self.base_url, LATEST_PATH, page.start, page.max_results
        )
    }

    fn search_url(&self, keyword: &str, page: &Page) -> String {
        format!(
            "{}{}?keyword={}&start={}&max_results={}",
            self.base_url,
            SEARCH_PATH,
            urlencoding::encode(keyword),
            page.start,
            page.max_results
        )
    }

    async fn fetch_papers(&self, url: &str) -> Result<Vec<Paper>, SourceError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} returned {}", url, status);
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let records: Vec<PaperRecord> = serde_json::from_slice(&body)?;

        Ok(normalize_records(records))
    }
}

#[async_trait]
impl PaperSource for HttpSource {
    fn id(&self) -> &str {
        "http"
    }

    fn name(&self) -> &str {
        "Paper index service"
    }

    async fn latest(&self, page: &Page) -> Result<Vec<Paper>, SourceError> {
        self.fetch_papers(&self.latest_url(page)).await
    }

    async fn search(&self, keyword: &str, page: &Page) -> Result<Vec<Paper>, SourceError> {
        self.fetch_papers(&self.search_url(keyword, page)).await
    }
}
