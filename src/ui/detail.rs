//! Detail view for the selected paper, with the embedded document preview.

use serde::Serialize;

use crate::models::{Paper, PaperId};
use crate::ui::preview::PreviewError;

/// Shown when nothing is selected
pub const PLACEHOLDER: &str = "Select a paper to see its details.";

/// Shown in place of the preview frame when a paper has no document
pub const PREVIEW_UNAVAILABLE: &str = "Preview not available";

/// Everything the detail pane shows about one paper
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaperDetail {
    pub id: PaperId,
    pub title: String,
    pub summary: String,
    pub authors: String,
    pub published_date: Option<String>,
    pub updated_date: Option<String>,
    pub categories: Vec<String>,
    pub document_url: Option<String>,
}

impl From<&Paper> for PaperDetail {
    fn from(paper: &Paper) -> Self {
        Self {
            id: paper.id.clone(),
            title: paper.title.clone(),
            summary: paper.summary.clone(),
            authors: paper.authors_text(),
            published_date: paper.published_date.clone(),
            updated_date: paper.updated_date.clone(),
            categories: paper.categories.clone(),
            document_url: paper.document_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailContent {
    Placeholder,
    Paper(PaperDetail),
}

/// Load state of the preview frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase", tag = "state", content = "text")]
pub enum PreviewState {
    /// Previews are switched off; only the URL is shown
    Disabled,
    Loading,
    /// Extracted document text
    Ready(String),
    Failed(String),
}

/// The embedded preview.
///
/// Created the first time a paper with a document is shown and then only
/// re-pointed. `generation` changes on every re-point so late loads for an
/// earlier document can be recognised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewFrame {
    pub src: String,
    pub generation: u64,
    pub state: PreviewState,
}

/// A preview download the caller should start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    pub generation: u64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewChange {
    /// No document: the unavailable indicator replaces the frame
    Unavailable,
    /// Frame already bound to this document
    Kept,
    /// Frame re-pointed without loading (previews disabled)
    Rebound,
    /// Frame re-pointed; load this
    Load(PreviewRequest),
}

/// Result of [`DetailView::render`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailChange {
    /// Same paper already shown
    Unchanged,
    /// Back to the placeholder
    Cleared,
    Shown(PreviewChange),
}

impl DetailChange {
    pub fn preview_request(&self) -> Option<&PreviewRequest> {
        match self {
            DetailChange::Shown(PreviewChange::Load(request)) => Some(request),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetailView {
    content: DetailContent,
    frame: Option<PreviewFrame>,
    frame_visible: bool,
    previews_enabled: bool,
    generation: u64,
}

impl Default for DetailView {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailView {
    pub fn new() -> Self {
        Self {
            content: DetailContent::Placeholder,
            frame: None,
            frame_visible: false,
            previews_enabled: true,
            generation: 0,
        }
    }

    /// Toggle document downloads for the preview frame
    pub fn with_previews(mut self, enabled: bool) -> Self {
        self.previews_enabled = enabled;
        self
    }

    /// Show `paper`, or the placeholder for `None`
    pub fn render(&mut self, paper: Option<&Paper>) -> DetailChange {
        let Some(paper) = paper else {
            if self.content == DetailContent::Placeholder {
                return DetailChange::Unchanged;
            }
            self.content = DetailContent::Placeholder;
            self.frame_visible = false;
            return DetailChange::Cleared;
        };

        if self.shown_id() == Some(&paper.id) {
            return DetailChange::Unchanged;
        }

        self.content = DetailContent::Paper(PaperDetail::from(paper));

        let Some(url) = paper.document_url.as_deref() else {
            self.frame_visible = false;
            return DetailChange::Shown(PreviewChange::Unavailable);
        };

        self.frame_visible = true;
        DetailChange::Shown(self.point_frame(url))
    }

    fn point_frame(&mut self, url: &str) -> PreviewChange {
        if let Some(frame) = &self.frame {
            if frame.src == url {
                return PreviewChange::Kept;
            }
        }

        self.generation += 1;
        let state = if self.previews_enabled {
            PreviewState::Loading
        } else {
            PreviewState::Disabled
        };

        match &mut self.frame {
            Some(frame) => {
                frame.src = url.to_string();
                frame.generation = self.generation;
                frame.state = state;
            }
            None => {
                self.frame = Some(PreviewFrame {
                    src: url.to_string(),
                    generation: self.generation,
                    state,
                });
            }
        }

        if self.previews_enabled {
            PreviewChange::Load(PreviewRequest {
                generation: self.generation,
                url: url.to_string(),
            })
        } else {
            PreviewChange::Rebound
        }
    }

    /// Apply a finished preview load. Returns false if the frame has moved on.
    pub fn preview_loaded(&mut self, generation: u64, result: Result<String, PreviewError>) -> bool {
        match &mut self.frame {
            Some(frame) if frame.generation == generation => {
                frame.state = match result {
                    Ok(text) => PreviewState::Ready(text),
                    Err(err) => PreviewState::Failed(err.to_string()),
                };
                true
            }
            _ => {
                tracing::debug!(generation, "Ignoring preview for a previous document");
                false
            }
        }
    }

    pub fn content(&self) -> &DetailContent {
        &self.content
    }

    /// Id of the paper on display
    pub fn shown_id(&self) -> Option<&PaperId> {
        match &self.content {
            DetailContent::Paper(detail) => Some(&detail.id),
            DetailContent::Placeholder => None,
        }
    }

    /// The preview frame, when it is on screen
    pub fn frame(&self) -> Option<&PreviewFrame> {
        self.frame.as_ref().filter(|_| self.frame_visible)
    }

    /// Whether the "Preview not available" indicator is on screen
    pub fn shows_unavailable(&self) -> bool {
        matches!(&self.content, DetailContent::Paper(d) if d.document_url.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaperBuilder;

    fn with_doc(id: &str, url: &str) -> Paper {
        PaperBuilder::new(id, format!("Paper {}", id))
            .summary("Some abstract")
            .document_url(url)
            .build()
    }

    #[test]
    fn test_placeholder_initially() {
        let detail = DetailView::new();
        assert_eq!(detail.content(), &DetailContent::Placeholder);
        assert!(detail.frame().is_none());
        assert!(!detail.shows_unavailable());
    }

    #[test]
    fn test_render_shows_verbatim_fields() {
        let mut detail = DetailView::new();
        let summary = "x".repeat(10_000);
        let paper = PaperBuilder::new("7", "Long").summary(summary.clone()).build();
        detail.render(Some(&paper));

        match detail.content() {
            DetailContent::Paper(d) => {
                assert_eq!(d.title, "Long");
                assert_eq!(d.summary, summary);
            }
            other => panic!("unexpected content {:?}", other),
        }
    }

    #[test]
    fn test_no_document_shows_unavailable() {
        let mut detail = DetailView::new();
        let paper = Paper::new("1", "No PDF");
        assert_eq!(
            detail.render(Some(&paper)),
            DetailChange::Shown(PreviewChange::Unavailable)
        );
        assert!(detail.frame().is_none());
        assert!(detail.shows_unavailable());
    }

    #[test]
    fn test_frame_reused_and_repointed() {
        let mut detail = DetailView::new();
        let first = detail.render(Some(&with_doc("1", "https://a.example/1.pdf")));
        assert_eq!(first.preview_request().unwrap().generation, 1);

        let second = detail.render(Some(&with_doc("2", "https://a.example/2.pdf")));
        let request = second.preview_request().unwrap();
        assert_eq!(request.generation, 2);
        assert_eq!(request.url, "https://a.example/2.pdf");

        let frame = detail.frame().unwrap();
        assert_eq!(frame.src, "https://a.example/2.pdf");
        assert_eq!(frame.state, PreviewState::Loading);
    }

    #[test]
    fn test_same_document_not_reloaded() {
        let mut detail = DetailView::new();
        detail.render(Some(&with_doc("1", "https://a.example/shared.pdf")));
        let change = detail.render(Some(&with_doc("2", "https://a.example/shared.pdf")));
        assert_eq!(change, DetailChange::Shown(PreviewChange::Kept));
    }

    #[test]
    fn test_same_paper_unchanged() {
        let mut detail = DetailView::new();
        let paper = with_doc("1", "https://a.example/1.pdf");
        detail.render(Some(&paper));
        assert_eq!(detail.render(Some(&paper)), DetailChange::Unchanged);
    }

    #[test]
    fn test_frame_hidden_then_shown_again() {
        let mut detail = DetailView::new();
        detail.render(Some(&with_doc("1", "https://a.example/1.pdf")));
        detail.render(Some(&Paper::new("2", "No PDF")));
        assert!(detail.frame().is_none());

        detail.render(Some(&with_doc("1", "https://a.example/1.pdf")));
        assert!(detail.frame().is_some());
    }

    #[test]
    fn test_late_preview_ignored() {
        let mut detail = DetailView::new();
        detail.render(Some(&with_doc("1", "https://a.example/1.pdf")));
        detail.render(Some(&with_doc("2", "https://a.example/2.pdf")));

        assert!(!detail.preview_loaded(1, Ok("old text".to_string())));
        assert!(detail.preview_loaded(2, Ok("new text".to_string())));
        assert_eq!(
            detail.frame().unwrap().state,
            PreviewState::Ready("new text".to_string())
        );
    }

    #[test]
    fn test_preview_failure_recorded() {
        let mut detail = DetailView::new();
        detail.render(Some(&with_doc("1", "https://a.example/1.pdf")));
        detail.preview_loaded(1, Err(PreviewError::Status(404)));
        match &detail.frame().unwrap().state {
            PreviewState::Failed(msg) => assert!(msg.contains("404")),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_previews_disabled() {
        let mut detail = DetailView::new().with_previews(false);
        let change = detail.render(Some(&with_doc("1", "https://a.example/1.pdf")));
        assert_eq!(change, DetailChange::Shown(PreviewChange::Rebound));
        assert_eq!(detail.frame().unwrap().state, PreviewState::Disabled);
    }

    #[test]
    fn test_clear() {
        let mut detail = DetailView::new();
        detail.render(Some(&with_doc("1", "https://a.example/1.pdf")));
        assert_eq!(detail.render(None), DetailChange::Cleared);
        assert!(detail.frame().is_none());
        assert_eq!(detail.render(None), DetailChange::Unchanged);
    }
}
