use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use crate::sources::{DataSource, FetchTicket};
use crate::ui::browser::PaperBrowser;
use crate::ui::detail::{DetailChange, PreviewRequest};
use crate::ui::preview::PreviewLoader;
use crate::ui::tui::event::AppEvent;
use crate::ui::tui::input::{Action, InputMode};
use crate::ui::tui::theme::Theme;

/// Terminal browser state. Only the UI loop mutates it.
pub struct App {
    pub browser: PaperBrowser,
    pub theme: Theme,
    pub input_mode: InputMode,
    pub search_input: String,
    /// One-line message in the footer (validation errors and the like)
    pub status: Option<String>,
    pub detail_scroll: u16,
    pub should_quit: bool,
    pub tick: usize,
    data: Arc<DataSource>,
    preview: Option<Arc<PreviewLoader>>,
    events: UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(
        browser: PaperBrowser,
        data: Arc<DataSource>,
        preview: Option<Arc<PreviewLoader>>,
        events: UnboundedSender<AppEvent>,
        theme: Theme,
    ) -> Self {
        Self {
            browser,
            theme,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            status: None,
            detail_scroll: 0,
            should_quit: false,
            tick: 0,
            data,
            preview,
            events,
        }
    }

    /// Request the latest papers
    pub fn reload(&mut self) {
        let ticket = self.data.issue_latest();
        self.start_fetch(ticket);
    }

    /// Request a keyword search; an empty keyword only sets the status line
    pub fn search(&mut self, keyword: &str) {
        match self.data.issue_search(keyword) {
            Ok(ticket) => self.start_fetch(ticket),
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn start_fetch(&mut self, ticket: FetchTicket) {
        self.status = None;
        self.browser.begin_loading(ticket.kind.clone());

        let data = self.data.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let fetched = data.run(ticket).await;
            let _ = tx.send(AppEvent::Fetched(fetched));
        });
    }

    fn start_preview(&self, request: &PreviewRequest) {
        let Some(loader) = self.preview.clone() else {
            return;
        };

        let tx = self.events.clone();
        let PreviewRequest { generation, url } = request.clone();
        tokio::spawn(async move {
            let result = loader.load(&url).await;
            let _ = tx.send(AppEvent::PreviewLoaded { generation, result });
        });
    }

    fn after_detail_change(&mut self, change: Option<DetailChange>) {
        let Some(change) = change else {
            return;
        };
        if change != DetailChange::Unchanged {
            self.detail_scroll = 0;
        }
        if let Some(request) = change.preview_request() {
            self.start_preview(request);
        }
    }

    /// Apply a result from a background task
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Fetched(fetched) => {
                if let Some(set) = self.data.accept(fetched) {
                    self.browser.apply(set);
                    self.detail_scroll = 0;
                }
            }
            AppEvent::PreviewLoaded { generation, result } => {
                self.browser.detail_mut().preview_loaded(generation, result);
            }
        }
    }

    /// Whether a fetch is still outstanding
    pub fn is_loading(&self) -> bool {
        matches!(
            self.browser.list().content(),
            crate::ui::list::ListContent::Loading
        )
    }

    /// Handle an action. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        match action {
            Action::None => {}
            Action::Quit => self.should_quit = true,
            Action::MoveUp => self.browser.list_mut().move_up(),
            Action::MoveDown => self.browser.list_mut().move_down(),
            Action::GoTop => self.browser.list_mut().first(),
            Action::GoBottom => self.browser.list_mut().last(),
            Action::Select => {
                let change = self.browser.select_highlighted();
                self.after_detail_change(change);
            }
            Action::ClearSelection => self.browser.clear_selection(),
            Action::Reload => self.reload(),
            Action::StartSearch => {
                self.input_mode = InputMode::Search;
                self.search_input.clear();
                self.status = None;
            }
            Action::SearchInput(c) => self.search_input.push(c),
            Action::SearchBackspace => {
                self.search_input.pop();
            }
            Action::SearchConfirm => {
                self.input_mode = InputMode::Normal;
                let keyword = std::mem::take(&mut self.search_input);
                self.search(&keyword);
            }
            Action::SearchCancel => {
                self.input_mode = InputMode::Normal;
                self.search_input.clear();
            }
            Action::ScrollDetailDown => {
                self.detail_scroll = self.detail_scroll.saturating_add(3);
            }
            Action::ScrollDetailUp => {
                self.detail_scroll = self.detail_scroll.saturating_sub(3);
            }
        }
        self.should_quit
    }

    /// Advance animations
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }
}
