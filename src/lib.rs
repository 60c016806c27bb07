//! # Paper Browser
//!
//! A terminal client for a paper-index service. It fetches the latest papers or
//! keyword search results, and presents them in a list/detail browser with a
//! document preview panel.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Paper, ResultSet, Selection, etc.)
//! - [`sources`]: Paper sources (HTTP backend, in-memory mock) and the [`DataSource`]
//!   that orders their responses
//! - [`observe`]: Structured browser events and observers
//! - [`ui`]: List, detail and composed browser views, plus the terminal front-ends
//! - [`utils`]: HTTP client, display helpers, validation and PDF text extraction
//! - [`config`]: Configuration management

pub mod config;
pub mod models;
pub mod observe;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use models::{Paper, PaperId, ResultSet};
pub use sources::{DataSource, PaperSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
