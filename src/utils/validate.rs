//! Input validation for search keywords and URLs.
//!
//! Document URLs come from the service and end up being fetched for previews,
//! so only plain absolute http(s) URLs are accepted.

use thiserror::Error;

/// Validation error types
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Search keyword cannot be empty or just whitespace")]
    EmptyKeyword,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL contains potentially dangerous characters")]
    DangerousUrl,
}

/// Trim a search keyword and reject it if nothing is left.
pub fn validate_keyword(keyword: &str) -> Result<String, ValidationError> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(ValidationError::EmptyKeyword);
    }
    Ok(keyword.to_string())
}

/// Validate a URL: absolute, http or https, no control characters.
///
/// Returns the trimmed URL on success.
pub fn validate_url(url: &str) -> Result<String, ValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(ValidationError::InvalidUrl("empty URL".to_string()));
    }

    if url.chars().any(|c| c.is_control()) {
        return Err(ValidationError::DangerousUrl);
    }

    let parsed = url::Url::parse(url).map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ValidationError::InvalidUrl(format!(
                "invalid scheme: {}",
                other
            )))
        }
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::InvalidUrl("missing host".to_string()));
    }

    Ok(url.to_string())
}

/// Whether a URL points at a loopback or private-range host.
///
/// The preview loader refuses these unless explicitly allowed in the config.
pub fn is_private_host(url: &str) -> bool {
    let Ok(parsed) = url::Url::parse(url) else {
        return false;
    };

    match parsed.host() {
        Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(url::Host::Ipv4(ip)) => {
            ip.is_loopback() || ip.is_private() || ip.is_link_local() || ip.is_unspecified()
        }
        Some(url::Host::Ipv6(ip)) => ip.is_loopback() || ip.is_unspecified(),
        None => false,
    }
}
