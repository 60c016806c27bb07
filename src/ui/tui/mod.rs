//! Interactive terminal browser.
//!
//! A single UI loop owns all view state. Fetches and preview downloads run on
//! spawned tasks and report back over a channel; the loop applies their
//! results between redraws.

mod app;
mod draw;
mod event;
mod input;
mod theme;

pub use app::App;
pub use event::AppEvent;
pub use input::{map_event, Action, InputMode};
pub use theme::Theme;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::event as term_event;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::sources::DataSource;
use crate::ui::browser::PaperBrowser;
use crate::ui::preview::PreviewLoader;

/// Run the browser until the user quits.
pub async fn run(
    browser: PaperBrowser,
    data: Arc<DataSource>,
    preview: Option<Arc<PreviewLoader>>,
    theme: Theme,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Restore the terminal before the panic message is printed
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // Drain stray input such as the Enter that launched the command
    while term_event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = term_event::read();
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut app = App::new(browser, data, preview, event_tx, theme);
    app.reload();

    let result = event_loop(&mut terminal, &mut app, &mut event_rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| draw::view(f, app))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(event) = maybe_event {
                    app.handle_event(event);
                    while let Ok(event) = event_rx.try_recv() {
                        app.handle_event(event);
                    }
                }
            }
            _ = async {
                if term_event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = term_event::read() {
                        let action = map_event(&evt, app.input_mode);
                        app.update(action);
                    }
                }
            } => {}
        }

        app.on_tick();

        if app.should_quit {
            return Ok(());
        }
    }
}
