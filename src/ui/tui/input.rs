use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

/// What a key press means to the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    MoveUp,
    MoveDown,
    GoTop,
    GoBottom,
    /// Show the highlighted paper in the detail pane
    Select,
    ClearSelection,
    Reload,
    StartSearch,
    SearchInput(char),
    SearchBackspace,
    SearchConfirm,
    SearchCancel,
    ScrollDetailDown,
    ScrollDetailUp,
}

/// Whether keys go to navigation or to the search prompt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

/// Map a crossterm terminal event to an action, respecting input mode.
pub fn map_event(event: &Event, input_mode: InputMode) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            // Ctrl+C always quits regardless of mode
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Action::Quit;
            }

            match input_mode {
                InputMode::Normal => map_key_normal(key),
                InputMode::Search => map_key_search(key),
            }
        }
        Event::Mouse(mouse) => map_mouse(mouse),
        _ => Action::None,
    }
}

fn map_mouse(mouse: &MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::MoveDown,
        MouseEventKind::ScrollUp => Action::MoveUp,
        _ => Action::None,
    }
}

fn map_key_normal(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('g') | KeyCode::Home => Action::GoTop,
        KeyCode::Char('G') | KeyCode::End => Action::GoBottom,
        KeyCode::Enter => Action::Select,
        KeyCode::Esc => Action::ClearSelection,
        KeyCode::Char('/') => Action::StartSearch,
        KeyCode::Char('r') => Action::Reload,
        KeyCode::PageDown | KeyCode::Char('J') => Action::ScrollDetailDown,
        KeyCode::PageUp | KeyCode::Char('K') => Action::ScrollDetailUp,
        _ => Action::None,
    }
}

fn map_key_search(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::SearchCancel,
        KeyCode::Enter => Action::SearchConfirm,
        KeyCode::Backspace => Action::SearchBackspace,
        KeyCode::Char(c) => Action::SearchInput(c),
        _ => Action::None,
    }
}
