//! Paper model and the wire record it is normalized from.

use serde::{Deserialize, Serialize};

use crate::utils::validate_url;

/// Title shown when a record arrives without one
pub const UNTITLED: &str = "Untitled";

/// Opaque, stable identifier of a paper within a result set.
///
/// The service may send identifiers as strings or integers; both end up here as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaperId(String);

impl PaperId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaperId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaperId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PaperId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for PaperId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A research paper as presented by the browser
///
/// Papers are immutable once built; views only ever read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    /// Stable identifier, unique within one result set
    pub id: PaperId,

    /// Display title (never empty)
    pub title: String,

    /// Author names in source order
    pub authors: Vec<String>,

    /// Abstract text
    pub summary: String,

    /// Previewable document (usually a PDF)
    pub document_url: Option<String>,

    /// Publication date (ISO format)
    pub published_date: Option<String>,

    /// Last updated date (ISO format)
    pub updated_date: Option<String>,

    /// Subject categories
    pub categories: Vec<String>,
}

impl Paper {
    /// Create a new paper with required fields
    pub fn new(id: impl Into<PaperId>, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: id.into(),
            title: normalize_title(&title),
            authors: Vec::new(),
            summary: String::new(),
            document_url: None,
            published_date: None,
            updated_date: None,
            categories: Vec::new(),
        }
    }

    /// Author names joined for single-line display
    pub fn authors_text(&self) -> String {
        self.authors.join(", ")
    }

    /// Check if paper has a previewable document
    pub fn has_document(&self) -> bool {
        self.document_url.is_some()
    }

    /// Publication year, if a date is known
    pub fn year(&self) -> Option<&str> {
        self.published_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
    }
}

/// Builder for constructing Paper objects
#[derive(Debug, Clone)]
pub struct PaperBuilder {
    paper: Paper,
}

impl PaperBuilder {
    /// Create a new builder with required fields
    pub fn new(id: impl Into<PaperId>, title: impl Into<String>) -> Self {
        Self {
            paper: Paper::new(id, title),
        }
    }

    /// Append an author
    pub fn author(mut self, name: impl Into<String>) -> Self {
        self.paper.authors.push(name.into());
        self
    }

    /// Set all authors
    pub fn authors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paper.authors = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set abstract
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.paper.summary = summary.into();
        self
    }

    /// Set the document URL
    pub fn document_url(mut self, url: impl Into<String>) -> Self {
        self.paper.document_url = Some(url.into());
        self
    }

    /// Set publication date
    pub fn published_date(mut self, date: impl Into<String>) -> Self {
        self.paper.published_date = Some(date.into());
        self
    }

    /// Set updated date
    pub fn updated_date(mut self, date: impl Into<String>) -> Self {
        self.paper.updated_date = Some(date.into());
        self
    }

    /// Add a category
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.paper.categories.push(category.into());
        self
    }

    /// Build the Paper
    pub fn build(self) -> Paper {
        self.paper
    }
}

fn normalize_title(title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title.to_string()
    }
}

/// Identifier as it appears on the wire
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    fn into_text(self) -> Option<String> {
        let text = match self {
            RawId::Text(s) => s.trim().to_string(),
            RawId::Number(n) => n.to_string(),
        };
        (!text.is_empty()).then_some(text)
    }
}

/// Author entry: `{"name": "..."}` from the service, bare strings from older payloads
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AuthorRecord {
    Named { name: String },
    Plain(String),
}

impl AuthorRecord {
    pub fn name(&self) -> &str {
        match self {
            AuthorRecord::Named { name } => name,
            AuthorRecord::Plain(name) => name,
        }
    }
}

/// A paper record exactly as the paper-index service returns it.
///
/// Every spelling of a field is its own slot so a record carrying two of them
/// still decodes; [`into_paper`](Self::into_paper) picks the first usable one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaperRecord {
    #[serde(default)]
    id: Option<RawId>,

    #[serde(default)]
    arxiv_id: Option<RawId>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub authors: Vec<AuthorRecord>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,

    #[serde(default)]
    pub pdf_url: Option<String>,

    #[serde(default, rename = "pdfUrl")]
    pub pdf_url_camel: Option<String>,

    #[serde(default)]
    pub document_url: Option<String>,

    #[serde(default)]
    pub published_date: Option<String>,

    #[serde(default)]
    pub updated_date: Option<String>,

    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

impl PaperRecord {
    /// Raw identifier as text, if the record carried one
    pub fn raw_id(&self) -> Option<String> {
        [&self.id, &self.arxiv_id]
            .into_iter()
            .flatten()
            .find_map(|id| id.clone().into_text())
    }

    /// First document URL that is safe to preview
    fn document_url(&self) -> Option<String> {
        [&self.pdf_url, &self.pdf_url_camel, &self.document_url]
            .into_iter()
            .flatten()
            .find_map(|url| match validate_url(url) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::debug!("Dropping document URL {:?}: {}", url, e);
                    None
                }
            })
    }

    /// Normalize into a [`Paper`].
    ///
    /// `position` is the 1-based position of the record in its response and is
    /// only used to synthesize an id when the record has neither an id nor a document.
    pub fn into_paper(self, position: usize) -> Paper {
        let document_url = self.document_url();

        let id = self
            .raw_id()
            .or_else(|| document_url.clone())
            .unwrap_or_else(|| format!("item-{}", position));

        Paper {
            id: PaperId::new(id),
            title: normalize_title(self.title.as_deref().unwrap_or_default()),
            authors: self
                .authors
                .iter()
                .map(|a| a.name().trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
            summary: self
                .summary
                .or(self.abstract_text)
                .unwrap_or_default()
                .trim()
                .to_string(),
            document_url,
            published_date: self.published_date.filter(|d| !d.trim().is_empty()),
            updated_date: self.updated_date.filter(|d| !d.trim().is_empty()),
            categories: self.categories.unwrap_or_default(),
        }
    }
}

/// Normalize a full response body, preserving order
pub fn normalize_records(records: Vec<PaperRecord>) -> Vec<Paper> {
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| record.into_paper(i + 1))
        .collect()
}
