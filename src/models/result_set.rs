//! Result sets, fetch status and selection.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{Paper, PaperId};

/// Default number of papers requested per page
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// What produced a result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum FetchKind {
    /// Most recent papers
    Latest,
    /// Keyword search (keyword already trimmed)
    Search { keyword: String },
}

impl FetchKind {
    /// Short human-readable label, used for list headers
    pub fn label(&self) -> String {
        match self {
            FetchKind::Latest => "Latest papers".to_string(),
            FetchKind::Search { keyword } => format!("Results for \"{}\"", keyword),
        }
    }
}

/// Pagination window sent with every request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub start: usize,
    pub max_results: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            start: 0,
            max_results: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    pub fn new(start: usize, max_results: usize) -> Self {
        Self { start, max_results }
    }
}

/// Lifecycle status of a result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "reason")]
pub enum FetchStatus {
    Idle,
    Loading,
    Loaded,
    Error(String),
}

/// An ordered batch of papers plus the status of the fetch that produced it.
///
/// A new result set always replaces the previous one wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub papers: Vec<Paper>,
    pub status: FetchStatus,
    pub kind: Option<FetchKind>,
}

impl Default for ResultSet {
    fn default() -> Self {
        Self::idle()
    }
}

impl ResultSet {
    /// Empty set created at startup
    pub fn idle() -> Self {
        Self {
            papers: Vec::new(),
            status: FetchStatus::Idle,
            kind: None,
        }
    }

    /// Placeholder for an in-flight fetch
    pub fn loading(kind: FetchKind) -> Self {
        Self {
            papers: Vec::new(),
            status: FetchStatus::Loading,
            kind: Some(kind),
        }
    }

    /// Successful fetch. Later papers repeating an earlier id are dropped.
    pub fn loaded(kind: FetchKind, papers: Vec<Paper>) -> Self {
        let mut seen: HashSet<PaperId> = HashSet::with_capacity(papers.len());
        let mut unique = Vec::with_capacity(papers.len());
        for paper in papers {
            if seen.insert(paper.id.clone()) {
                unique.push(paper);
            } else {
                tracing::warn!(id = %paper.id, "Dropping paper with duplicate id");
            }
        }

        Self {
            papers: unique,
            status: FetchStatus::Loaded,
            kind: Some(kind),
        }
    }

    /// Failed fetch; never carries papers
    pub fn error(kind: FetchKind, reason: impl Into<String>) -> Self {
        Self {
            papers: Vec::new(),
            status: FetchStatus::Error(reason.into()),
            kind: Some(kind),
        }
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    pub fn is_loaded(&self) -> bool {
        self.status == FetchStatus::Loaded
    }

    /// Failure reason, if the fetch failed
    pub fn error_reason(&self) -> Option<&str> {
        match &self.status {
            FetchStatus::Error(reason) => Some(reason),
            _ => None,
        }
    }

    /// Look up a paper by id
    pub fn get(&self, id: &PaperId) -> Option<&Paper> {
        self.papers.iter().find(|p| &p.id == id)
    }
}

/// The single highlighted paper of the active result set, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(Option<PaperId>);

impl Selection {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn id(&self) -> Option<&PaperId> {
        self.0.as_ref()
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    pub fn set(&mut self, id: PaperId) {
        self.0 = Some(id);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loaded_drops_duplicate_ids() {
        let set = ResultSet::loaded(
            FetchKind::Latest,
            vec![
                Paper::new("1", "A"),
                Paper::new("2", "B"),
                Paper::new("1", "A again"),
            ],
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.papers[0].title, "A");
        assert_eq!(set.papers[1].title, "B");
    }

    #[test]
    fn test_error_set_has_no_papers() {
        let set = ResultSet::error(FetchKind::Latest, "HTTP error! status: 500");
        assert!(set.is_empty());
        assert_eq!(set.error_reason(), Some("HTTP error! status: 500"));
        assert!(!set.is_loaded());
    }

    #[test]
    fn test_fetch_kind_label() {
        assert_eq!(FetchKind::Latest.label(), "Latest papers");
        let kind = FetchKind::Search {
            keyword: "graph".to_string(),
        };
        assert_eq!(kind.label(), "Results for \"graph\"");
    }

    #[test]
    fn test_selection() {
        let mut selection = Selection::none();
        assert!(selection.is_none());
        selection.set(PaperId::from("7"));
        assert_eq!(selection.id(), Some(&PaperId::from("7")));
        selection.clear();
        assert!(selection.is_none());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&FetchStatus::Error("boom".into())).unwrap();
        assert_eq!(json, r#"{"status":"error","reason":"boom"}"#);
    }
}
