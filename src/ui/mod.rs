//! Views of the browser.
//!
//! The list and detail views are plain state: they decide what is displayed
//! and [`tui`] and [`output`] turn that into terminal output. Keeping them free
//! of any drawing code lets the same views back both the interactive browser
//! and the one-shot commands.
//!
//! ```rust
//! use paper_browser::models::{FetchKind, Paper, PaperId, ResultSet};
//! use paper_browser::ui::PaperBrowser;
//!
//! let mut browser = PaperBrowser::default();
//! browser.apply(ResultSet::loaded(
//!     FetchKind::Latest,
//!     vec![Paper::new("1", "A"), Paper::new("2", "B")],
//! ));
//! assert!(browser.select(&PaperId::from("2")));
//! assert!(!browser.select(&PaperId::from("9")));
//! ```

pub mod browser;
pub mod detail;
pub mod list;
pub mod output;
pub mod preview;
pub mod tui;

pub use browser::PaperBrowser;
pub use detail::{DetailChange, DetailContent, DetailView, PreviewFrame, PreviewState};
pub use list::{ListContent, PaperListView, PaperRow};
pub use output::{format_detail, format_list, OutputFormat, Spinner};
pub use preview::{PreviewError, PreviewLoader};
