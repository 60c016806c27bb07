//! Paper list view.

use crate::models::{FetchKind, FetchStatus, Paper, PaperId, ResultSet};

/// Shown when a search or listing returned nothing
pub const NO_PAPERS: &str = "No papers found.";

/// Shown while a fetch is in flight
pub const LOADING: &str = "Loading papers...";

/// Shown before the first fetch
pub const IDLE_HINT: &str = "Press r to load the latest papers or / to search.";

/// One row of the list
#[derive(Debug, Clone, PartialEq)]
pub struct PaperRow {
    pub id: PaperId,
    pub title: String,
    /// Author names joined with ", "
    pub authors: String,
    pub summary: String,
    pub year: Option<String>,
    pub has_document: bool,
}

impl From<&Paper> for PaperRow {
    fn from(paper: &Paper) -> Self {
        Self {
            id: paper.id.clone(),
            title: paper.title.clone(),
            authors: paper.authors_text(),
            summary: paper.summary.clone(),
            year: paper.year().map(str::to_string),
            has_document: paper.has_document(),
        }
    }
}

/// What the list currently displays
#[derive(Debug, Clone, PartialEq)]
pub enum ListContent {
    Idle,
    Loading,
    Error(String),
    /// Loaded with zero papers
    Empty,
    Rows(Vec<PaperRow>),
}

impl ListContent {
    /// Indicator text for every state except `Rows`
    pub fn indicator(&self) -> Option<String> {
        match self {
            ListContent::Idle => Some(IDLE_HINT.to_string()),
            ListContent::Loading => Some(LOADING.to_string()),
            ListContent::Error(reason) => Some(format!("Error loading papers: {}", reason)),
            ListContent::Empty => Some(NO_PAPERS.to_string()),
            ListContent::Rows(_) => None,
        }
    }

    pub fn rows(&self) -> &[PaperRow] {
        match self {
            ListContent::Rows(rows) => rows,
            _ => &[],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ListContent::Error(_))
    }
}

/// Scrollable list of papers with a highlight cursor.
///
/// Every call to [`render`](Self::render) replaces what is displayed; nothing
/// from an earlier result set survives it.
#[derive(Debug, Clone)]
pub struct PaperListView {
    content: ListContent,
    rendered: Vec<Paper>,
    kind: Option<FetchKind>,
    cursor: usize,
}

impl Default for PaperListView {
    fn default() -> Self {
        Self::new()
    }
}

impl PaperListView {
    pub fn new() -> Self {
        Self {
            content: ListContent::Idle,
            rendered: Vec::new(),
            kind: None,
            cursor: 0,
        }
    }

    /// Display `set`, discarding the previous content
    pub fn render(&mut self, set: &ResultSet) {
        self.content = match &set.status {
            FetchStatus::Idle => ListContent::Idle,
            FetchStatus::Loading => ListContent::Loading,
            FetchStatus::Error(reason) => ListContent::Error(reason.clone()),
            FetchStatus::Loaded if set.papers.is_empty() => ListContent::Empty,
            FetchStatus::Loaded => {
                ListContent::Rows(set.papers.iter().map(PaperRow::from).collect())
            }
        };
        self.rendered = match self.content {
            ListContent::Rows(_) => set.papers.clone(),
            _ => Vec::new(),
        };
        self.kind = set.kind.clone();
        self.cursor = 0;
    }

    /// Paper for a clicked/entered row, if it belongs to the current rendering
    pub fn on_select(&self, id: &PaperId) -> Option<&Paper> {
        self.rendered.iter().find(|p| &p.id == id)
    }

    pub fn content(&self) -> &ListContent {
        &self.content
    }

    pub fn rows(&self) -> &[PaperRow] {
        self.content.rows()
    }

    /// Papers behind the rows
    pub fn papers(&self) -> &[Paper] {
        &self.rendered
    }

    /// Header line for the list pane
    pub fn title(&self) -> String {
        match &self.kind {
            Some(kind) => kind.label(),
            None => "Papers".to_string(),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Paper under the cursor
    pub fn highlighted(&self) -> Option<&Paper> {
        self.rendered.get(self.cursor)
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.rendered.len() {
            self.cursor += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn first(&mut self) {
        self.cursor = 0;
    }

    pub fn last(&mut self) {
        self.cursor = self.rendered.len().saturating_sub(1);
    }
}
