//! Utility modules supporting the browser.
//!
//! - [`HttpClient`]: shared reqwest client with configured timeouts
//! - [`truncate_with_ellipsis`]: unicode-aware truncation for list rows and tables
//! - [`validate_keyword`], [`validate_url`]: input validation for search keywords and
//!   document URLs
//! - [`extract_text`], [`excerpt`]: PDF text extraction for document previews
//!
//! # Validation
//!
//! ```rust
//! use paper_browser::utils::{validate_keyword, validate_url};
//!
//! assert_eq!(validate_keyword("  transformers ").unwrap(), "transformers");
//! assert!(validate_keyword("   ").is_err());
//! assert!(validate_url("javascript:alert(1)").is_err());
//! ```

mod display;
mod http;
mod pdf;
mod validate;

pub use display::{
    calculate_column_widths, format_date, get_paper_table_columns, is_terminal, terminal_width,
    truncate_with_ellipsis, ColumnConfig,
};
pub use http::{HttpClient, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};
pub use pdf::{excerpt, extract_text, is_pdf, PdfExtractError};
pub use validate::{is_private_host, validate_keyword, validate_url, ValidationError};
