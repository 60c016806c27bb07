//! Document preview loading.
//!
//! The terminal cannot embed a PDF viewer, so the preview frame shows the
//! document's text: the file is downloaded (size-capped) and its text is
//! extracted in memory. Nothing from the document is ever executed.

use crate::config::PreviewConfig;
use crate::utils::{excerpt, extract_text, is_private_host, validate_url, HttpClient, PdfExtractError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PreviewError {
    #[error("Invalid document URL: {0}")]
    InvalidUrl(String),

    #[error("Refusing to load document from a private address: {0}")]
    PrivateHost(String),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("Document larger than {0} bytes")]
    TooLarge(u64),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not a PDF document")]
    NotPdf,

    #[error("Could not extract text: {0}")]
    Extract(String),
}

impl From<reqwest::Error> for PreviewError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => PreviewError::Status(status.as_u16()),
            None => PreviewError::Network(err.to_string()),
        }
    }
}

impl From<PdfExtractError> for PreviewError {
    fn from(err: PdfExtractError) -> Self {
        match err {
            PdfExtractError::NotPdf => PreviewError::NotPdf,
            PdfExtractError::ExtractionFailed(msg) => PreviewError::Extract(msg),
        }
    }
}

/// Downloads documents and turns them into preview text
#[derive(Debug, Clone)]
pub struct PreviewLoader {
    client: HttpClient,
    max_bytes: u64,
    max_chars: usize,
    allow_private_hosts: bool,
}

impl PreviewLoader {
    pub fn new(client: HttpClient, config: &PreviewConfig) -> Self {
        Self {
            client,
            max_bytes: config.max_bytes,
            max_chars: config.max_chars,
            allow_private_hosts: config.allow_private_hosts,
        }
    }

    /// Fetch `url` and return at most `max_chars` of its text
    pub async fn load(&self, url: &str) -> Result<String, PreviewError> {
        let url = validate_url(url).map_err(|e| PreviewError::InvalidUrl(e.to_string()))?;
        if !self.allow_private_hosts && is_private_host(&url) {
            return Err(PreviewError::PrivateHost(url));
        }

        let bytes = self.download(&url).await?;
        tracing::debug!(url = %url, bytes = bytes.len(), "Downloaded document for preview");

        // pdf-extract is CPU bound and can panic on malformed input
        let text = tokio::task::spawn_blocking(move || extract_text(&bytes))
            .await
            .map_err(|e| PreviewError::Extract(format!("Task join error: {}", e)))??;

        Ok(excerpt(&text, self.max_chars))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, PreviewError> {
        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PreviewError::Status(status.as_u16()));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_bytes {
                return Err(PreviewError::TooLarge(self.max_bytes));
            }
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if (bytes.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(PreviewError::TooLarge(self.max_bytes));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader(config: PreviewConfig) -> PreviewLoader {
        PreviewLoader::new(HttpClient::new().unwrap(), &config)
    }

    #[tokio::test]
    async fn test_rejects_non_http_url() {
        let result = loader(PreviewConfig::default()).load("file:///etc/passwd").await;
        assert!(matches!(result, Err(PreviewError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_rejects_private_host_by_default() {
        let result = loader(PreviewConfig::default())
            .load("http://127.0.0.1:9/doc.pdf")
            .await;
        assert!(matches!(result, Err(PreviewError::PrivateHost(_))));
    }

    #[tokio::test]
    async fn test_not_pdf() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/doc.pdf")
            .with_status(200)
            .with_body("<html>login required</html>")
            .create_async()
            .await;

        let config = PreviewConfig {
            allow_private_hosts: true,
            ..Default::default()
        };
        let result = loader(config)
            .load(&format!("{}/doc.pdf", server.url()))
            .await;

        assert_eq!(result, Err(PreviewError::NotPdf));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_status_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing.pdf")
            .with_status(404)
            .create_async()
            .await;

        let config = PreviewConfig {
            allow_private_hosts: true,
            ..Default::default()
        };
        let result = loader(config)
            .load(&format!("{}/missing.pdf", server.url()))
            .await;

        assert_eq!(result, Err(PreviewError::Status(404)));
    }

    #[tokio::test]
    async fn test_size_cap() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/big.pdf")
            .with_status(200)
            .with_body(vec![b'x'; 4096])
            .create_async()
            .await;

        let config = PreviewConfig {
            allow_private_hosts: true,
            max_bytes: 1024,
            ..Default::default()
        };
        let result = loader(config)
            .load(&format!("{}/big.pdf", server.url()))
            .await;

        assert_eq!(result, Err(PreviewError::TooLarge(1024)));
    }
}
