//! Core data models for papers, result sets and selection.

mod paper;
mod result_set;

pub use paper::{normalize_records, AuthorRecord, Paper, PaperBuilder, PaperId, PaperRecord, UNTITLED};
pub use result_set::{FetchKind, FetchStatus, Page, ResultSet, Selection, DEFAULT_PAGE_SIZE};
