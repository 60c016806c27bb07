//! Terminal display utilities for CLI output formatting.
//!
//! Width handling is unicode-aware so that titles with wide characters line up
//! in tables and list rows.

use std::io::{self, IsTerminal};
use std::sync::OnceLock;
use terminal_size::terminal_size;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width used when stdout is not a terminal or its size is unknown.
const FALLBACK_WIDTH: usize = 100;

static WIDTH: OnceLock<usize> = OnceLock::new();

/// Terminal width in columns, measured once per process.
pub fn terminal_width() -> usize {
    *WIDTH.get_or_init(|| {
        terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(FALLBACK_WIDTH)
    })
}

/// Whether stdout is attached to a terminal
pub fn is_terminal() -> bool {
    io::stdout().is_terminal()
}

/// Truncate text to fit within `max_width` columns, appending "..." if truncated.
///
/// ```
/// use paper_browser::utils::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
/// assert_eq!(truncate_with_ellipsis("Hi", 8), "Hi");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }

    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut current_width = 0;
    let mut truncated = String::new();

    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(1);
        if current_width + w > budget {
            break;
        }
        current_width += w;
        truncated.push(c);
    }

    if truncated.is_empty() {
        return "...".to_string();
    }

    format!("{}...", truncated)
}

/// Column width configuration for table display.
#[derive(Debug, Clone, Copy)]
pub struct ColumnConfig {
    pub min_width: usize,
    pub max_width: usize,
    pub weight: usize,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        ColumnConfig {
            min_width: 1,
            max_width: usize::MAX,
            weight: 1,
        }
    }
}

impl ColumnConfig {
    /// Create a new column config with minimum width.
    pub fn new(min_width: usize) -> Self {
        ColumnConfig {
            min_width,
            ..Default::default()
        }
    }

    /// Set the maximum width.
    pub fn max(mut self, max_width: usize) -> Self {
        self.max_width = max_width;
        self
    }

    /// Set the weight for space distribution.
    pub fn weight(mut self, weight: usize) -> Self {
        self.weight = weight;
        self
    }
}

/// Calculate column widths from a list of column configurations.
///
/// Every column gets its minimum; the remaining width is shared out by weight,
/// never exceeding a column's maximum.
pub fn calculate_column_widths(terminal_width: usize, configs: &[ColumnConfig]) -> Vec<usize> {
    let n = configs.len();
    if n == 0 {
        return vec![];
    }

    // One separator column between each pair
    let available_width = terminal_width.saturating_sub(n - 1);
    let mut widths: Vec<usize> = configs.iter().map(|c| c.min_width).collect();

    let min_sum: usize = widths.iter().sum();
    if min_sum >= available_width {
        return widths;
    }

    let mut remaining = available_width - min_sum;

    // Weighted passes until nothing can grow any more
    loop {
        let growable: Vec<usize> = (0..n)
            .filter(|&i| configs[i].weight > 0 && widths[i] < configs[i].max_width)
            .collect();
        let total_weight: usize = growable.iter().map(|&i| configs[i].weight).sum();
        if remaining == 0 || total_weight == 0 {
            break;
        }

        let mut given = 0;
        for &i in &growable {
            let share = (remaining * configs[i].weight / total_weight).max(1);
            let room = configs[i].max_width - widths[i];
            let take = share.min(room).min(remaining - given);
            widths[i] += take;
            given += take;
        }

        if given == 0 {
            break;
        }
        remaining -= given;
    }

    widths
}

/// Format an ISO-8601 timestamp as a calendar date, leaving other strings as-is.
pub fn format_date(date: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(date)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| date.to_string())
}

/// Get column widths for a paper table.
///
/// Returns (id_width, title_width, authors_width, year_width).
pub fn get_paper_table_columns(terminal_width: usize) -> (usize, usize, usize, usize) {
    let configs = [
        ColumnConfig::new(6).max(16).weight(0),
        ColumnConfig::new(30).max(90).weight(3),
        ColumnConfig::new(16).max(50).weight(1),
        ColumnConfig::new(4).max(4).weight(0),
    ];

    let widths = calculate_column_widths(terminal_width, &configs);
    (widths[0], widths[1], widths[2], widths[3])
}
