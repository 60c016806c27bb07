//! The list and detail views composed into one browser.

use std::sync::Arc;

use crate::models::{FetchKind, PaperId, ResultSet, Selection};
use crate::observe::{BrowserEvent, BrowserObserver, NoopObserver};
use crate::ui::detail::{DetailChange, DetailView};
use crate::ui::list::PaperListView;

/// Master/detail browser state.
///
/// Owns the active result set and the selection. The list and detail views
/// are only ever updated through this type so the two stay consistent.
#[derive(Debug)]
pub struct PaperBrowser {
    active: ResultSet,
    selection: Selection,
    list: PaperListView,
    detail: DetailView,
    observer: Arc<dyn BrowserObserver>,
}

impl Default for PaperBrowser {
    fn default() -> Self {
        Self::new(Arc::new(NoopObserver))
    }
}

impl PaperBrowser {
    pub fn new(observer: Arc<dyn BrowserObserver>) -> Self {
        Self {
            active: ResultSet::idle(),
            selection: Selection::none(),
            list: PaperListView::new(),
            detail: DetailView::new(),
            observer,
        }
    }

    pub fn with_detail(mut self, detail: DetailView) -> Self {
        self.detail = detail;
        self
    }

    /// Show the loading indicator in the list.
    ///
    /// The active set, the selection and the detail view are left alone until
    /// the new set is applied.
    pub fn begin_loading(&mut self, kind: FetchKind) {
        self.list.render(&ResultSet::loading(kind));
    }

    /// Make `set` the active result set
    pub fn apply(&mut self, set: ResultSet) {
        self.active = set;
        self.list.render(&self.active);
        self.detail.render(None);
        if !self.selection.is_none() {
            self.selection.clear();
            self.observer
                .notify(&BrowserEvent::SelectionChanged { id: None });
        }
    }

    /// Select `id`, returning what changed in the detail view.
    ///
    /// `None` means the id is not in the current rendering and nothing changed.
    pub fn select_paper(&mut self, id: &PaperId) -> Option<DetailChange> {
        let paper = self.list.on_select(id)?;
        let change = self.detail.render(Some(paper));

        if self.selection.id() != Some(id) {
            self.selection.set(id.clone());
            self.observer.notify(&BrowserEvent::SelectionChanged {
                id: Some(id.clone()),
            });
        }

        Some(change)
    }

    /// Select `id`; false if it is not in the current rendering
    pub fn select(&mut self, id: &PaperId) -> bool {
        self.select_paper(id).is_some()
    }

    /// Select the paper under the list cursor
    pub fn select_highlighted(&mut self) -> Option<DetailChange> {
        let id = self.list.highlighted()?.id.clone();
        self.select_paper(&id)
    }

    pub fn clear_selection(&mut self) {
        self.detail.render(None);
        if !self.selection.is_none() {
            self.selection.clear();
            self.observer
                .notify(&BrowserEvent::SelectionChanged { id: None });
        }
    }

    pub fn active(&self) -> &ResultSet {
        &self.active
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn list(&self) -> &PaperListView {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut PaperListView {
        &mut self.list
    }

    pub fn detail(&self) -> &DetailView {
        &self.detail
    }

    pub fn detail_mut(&mut self) -> &mut DetailView {
        &mut self.detail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Paper, PaperBuilder};
    use crate::observe::RecordingObserver;
    use crate::ui::detail::DetailContent;

    fn set_ab() -> ResultSet {
        ResultSet::loaded(
            FetchKind::Latest,
            vec![
                PaperBuilder::new(1u64, "A").summary("about A").build(),
                PaperBuilder::new(2u64, "B")
                    .summary("about B")
                    .document_url("https://example.org/b.pdf")
                    .build(),
            ],
        )
    }

    fn shown_title(browser: &PaperBrowser) -> Option<String> {
        match browser.detail().content() {
            DetailContent::Paper(d) => Some(d.title.clone()),
            DetailContent::Placeholder => None,
        }
    }

    #[test]
    fn test_select_present_id() {
        let mut browser = PaperBrowser::default();
        browser.apply(set_ab());
        assert!(browser.select(&PaperId::from("2")));
        assert_eq!(shown_title(&browser).as_deref(), Some("B"));
        assert_eq!(browser.selection().id(), Some(&PaperId::from("2")));
        assert!(browser.detail().frame().is_some());
    }

    #[test]
    fn test_select_absent_id_is_noop() {
        let mut browser = PaperBrowser::default();
        browser.apply(set_ab());
        browser.select(&PaperId::from("1"));
        assert!(!browser.select(&PaperId::from("42")));
        assert_eq!(shown_title(&browser).as_deref(), Some("A"));
        assert_eq!(browser.selection().id(), Some(&PaperId::from("1")));
    }

    #[test]
    fn test_apply_clears_selection() {
        let observer = Arc::new(RecordingObserver::new());
        let mut browser = PaperBrowser::new(observer.clone());
        browser.apply(set_ab());
        browser.select(&PaperId::from("2"));

        browser.apply(ResultSet::loaded(
            FetchKind::Latest,
            vec![Paper::new("3", "C")],
        ));

        assert!(browser.selection().is_none());
        assert_eq!(browser.detail().content(), &DetailContent::Placeholder);
        assert_eq!(
            observer.events(),
            vec![
                BrowserEvent::SelectionChanged {
                    id: Some(PaperId::from("2"))
                },
                BrowserEvent::SelectionChanged { id: None },
            ]
        );
    }

    #[test]
    fn test_loading_keeps_detail() {
        let mut browser = PaperBrowser::default();
        browser.apply(set_ab());
        browser.select(&PaperId::from("2"));

        browser.begin_loading(FetchKind::Latest);

        assert!(browser.list().rows().is_empty());
        assert_eq!(shown_title(&browser).as_deref(), Some("B"));
        assert_eq!(browser.active().len(), 2);
    }

    #[test]
    fn test_select_during_loading_is_noop() {
        let mut browser = PaperBrowser::default();
        browser.apply(set_ab());
        browser.begin_loading(FetchKind::Latest);
        assert!(!browser.select(&PaperId::from("1")));
        assert_eq!(browser.detail().content(), &DetailContent::Placeholder);
    }

    #[test]
    fn test_select_highlighted() {
        let mut browser = PaperBrowser::default();
        browser.apply(set_ab());
        browser.list_mut().move_down();
        let change = browser.select_highlighted().unwrap();
        assert!(change.preview_request().is_some());
        assert_eq!(shown_title(&browser).as_deref(), Some("B"));
    }

    #[test]
    fn test_clear_selection() {
        let mut browser = PaperBrowser::default();
        browser.apply(set_ab());
        browser.select(&PaperId::from("1"));
        browser.clear_selection();
        assert!(browser.selection().is_none());
        assert_eq!(browser.detail().content(), &DetailContent::Placeholder);
    }
}
