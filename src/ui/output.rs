//! One-shot CLI rendering of the list and detail views.

use comfy_table::{Attribute, Cell, Color as CellColor, ContentArrangement, Table};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::ui::detail::{DetailContent, DetailView, PreviewState, PLACEHOLDER, PREVIEW_UNAVAILABLE};
use crate::ui::list::{ListContent, PaperListView};
use crate::utils::{format_date, get_paper_table_columns, is_terminal, truncate_with_ellipsis};

/// Output format for results
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    #[default]
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    /// Replace `Auto` with a concrete format for the current stdout
    pub fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

fn to_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Render the list view. `width` is the terminal width used for tables.
pub fn format_list(list: &PaperListView, format: OutputFormat, width: usize) -> String {
    match format.resolve() {
        OutputFormat::Json => to_json(&serde_json::json!({
            "title": list.title(),
            "message": list.content().indicator(),
            "papers": list.papers(),
        })),
        OutputFormat::Plain => format_list_plain(list),
        _ => format_list_table(list, width),
    }
}

fn format_list_plain(list: &PaperListView) -> String {
    if let Some(indicator) = list.content().indicator() {
        return indicator;
    }

    let mut out = String::new();
    for row in list.rows() {
        out.push_str(&format!("[{}] {}\n", row.id, row.title));
        if !row.authors.is_empty() {
            out.push_str(&format!("  {}\n", row.authors));
        }
        if !row.summary.is_empty() {
            out.push_str(&format!("  {}\n", row.summary));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

fn format_list_table(list: &PaperListView, width: usize) -> String {
    let heading = format!("━━━ {} ━━━", list.title()).bold().cyan().to_string();

    if let Some(indicator) = list.content().indicator() {
        let indicator = match list.content() {
            ListContent::Error(_) => indicator.red().to_string(),
            _ => indicator.dimmed().to_string(),
        };
        return format!("{}\n{}", heading, indicator);
    }

    let (id_w, title_w, authors_w, year_w) = get_paper_table_columns(width);

    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(vec!["ID", "Title", "Authors", "Year"]);

    for row in list.rows() {
        let title = if row.has_document {
            row.title.clone()
        } else {
            format!("{} (no PDF)", row.title)
        };
        let mut title = truncate_with_ellipsis(&title, title_w);
        if !row.summary.is_empty() {
            title.push('\n');
            title.push_str(&truncate_with_ellipsis(&row.summary, title_w));
        }
        table.add_row(vec![
            Cell::new(truncate_with_ellipsis(row.id.as_str(), id_w)).fg(CellColor::DarkGrey),
            Cell::new(title).add_attribute(Attribute::Bold),
            Cell::new(truncate_with_ellipsis(&row.authors, authors_w)),
            Cell::new(row.year.as_deref().map(|y| truncate_with_ellipsis(y, year_w)).unwrap_or_default()),
        ]);
    }

    format!("{}\n{}", heading, table)
}

/// Render the detail view
pub fn format_detail(detail: &DetailView, format: OutputFormat) -> String {
    let format = format.resolve();

    let DetailContent::Paper(paper) = detail.content() else {
        return match format {
            OutputFormat::Json => to_json(&serde_json::json!({ "message": PLACEHOLDER })),
            _ => PLACEHOLDER.to_string(),
        };
    };

    if format == OutputFormat::Json {
        return to_json(&serde_json::json!({
            "paper": paper,
            "preview": detail.frame(),
        }));
    }

    let color = format == OutputFormat::Table;
    let label = |text: &str| -> String {
        if color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    };

    let mut out = String::new();
    if color {
        out.push_str(&paper.title.blue().bold().to_string());
    } else {
        out.push_str(&paper.title);
    }
    out.push('\n');

    if !paper.authors.is_empty() {
        out.push_str(&format!("{} {}\n", label("Authors:"), paper.authors));
    }
    if let Some(date) = &paper.published_date {
        out.push_str(&format!("{} {}\n", label("Published:"), format_date(date)));
    }
    if let Some(date) = &paper.updated_date {
        out.push_str(&format!("{} {}\n", label("Updated:"), format_date(date)));
    }
    if !paper.categories.is_empty() {
        out.push_str(&format!("{} {}\n", label("Categories:"), paper.categories.join(", ")));
    }

    if !paper.summary.is_empty() {
        out.push('\n');
        out.push_str(&paper.summary);
        out.push('\n');
    }

    out.push('\n');
    match detail.frame() {
        Some(frame) => {
            out.push_str(&format!("{} {}\n", label("Preview:"), frame.src));
            match &frame.state {
                PreviewState::Ready(text) if !text.is_empty() => {
                    out.push('\n');
                    out.push_str(text);
                    out.push('\n');
                }
                PreviewState::Ready(_) => {
                    out.push_str("(document has no extractable text)\n");
                }
                PreviewState::Failed(reason) => {
                    if color {
                        out.push_str(&reason.red().to_string());
                    } else {
                        out.push_str(reason);
                    }
                    out.push('\n');
                }
                PreviewState::Loading | PreviewState::Disabled => {}
            }
        }
        None => {
            out.push_str(PREVIEW_UNAVAILABLE);
            out.push('\n');
        }
    }

    out.trim_end().to_string()
}

/// Print a loading spinner with message.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message. Hidden when stdout is not a terminal.
    pub fn new(msg: &str) -> Self {
        let pb = if is_terminal() {
            indicatif::ProgressBar::new_spinner()
        } else {
            indicatif::ProgressBar::hidden()
        };
        pb.set_style(spinner_style("{spinner:.cyan} {msg}", "⠁⠂⠄⡀⢀⠠⠐⠈ "));
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Finish with success message.
    pub fn finish_with_success(&self, msg: &str) {
        self.pb.set_style(spinner_style("{spinner:.green} {msg}", "✓ "));
        self.pb.finish_with_message(msg.to_string());
    }

    /// Finish with error message.
    pub fn finish_with_error(&self, msg: &str) {
        self.pb.set_style(spinner_style("{spinner:.red} {msg}", "✗ "));
        self.pb.finish_with_message(msg.to_string());
    }

    /// Remove the spinner from the terminal.
    pub fn finish_and_clear(&self) {
        self.pb.finish_and_clear();
    }
}

fn spinner_style(template: &str, tick_chars: &str) -> indicatif::ProgressStyle {
    indicatif::ProgressStyle::with_template(template)
        .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner())
        .tick_chars(tick_chars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FetchKind, PaperBuilder, ResultSet};

    fn loaded_list() -> PaperListView {
        let mut list = PaperListView::new();
        list.render(&ResultSet::loaded(
            FetchKind::Latest,
            vec![
                PaperBuilder::new("1", "Attention Is All You Need")
                    .author("Ashish Vaswani")
                    .summary("Transformers.")
                    .published_date("2017-06-12")
                    .document_url("https://arxiv.org/pdf/1706.03762")
                    .build(),
                PaperBuilder::new("2", "No Document").build(),
            ],
        ));
        list
    }

    #[test]
    fn test_resolve_keeps_explicit_format() {
        assert_eq!(OutputFormat::Json.resolve(), OutputFormat::Json);
        assert_eq!(OutputFormat::Plain.resolve(), OutputFormat::Plain);
        assert_ne!(OutputFormat::Auto.resolve(), OutputFormat::Auto);
    }

    #[test]
    fn test_plain_list() {
        let out = format_list(&loaded_list(), OutputFormat::Plain, 100);
        assert!(out.starts_with("[1] Attention Is All You Need\n  Ashish Vaswani\n  Transformers."));
        assert!(out.contains("[2] No Document"));
    }

    #[test]
    fn test_plain_list_indicator() {
        let mut list = PaperListView::new();
        list.render(&ResultSet::loaded(FetchKind::Latest, vec![]));
        assert_eq!(format_list(&list, OutputFormat::Plain, 100), "No papers found.");
    }

    #[test]
    fn test_json_list() {
        let out = format_list(&loaded_list(), OutputFormat::Json, 100);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["title"], "Latest papers");
        assert!(value["message"].is_null());
        assert_eq!(value["papers"].as_array().unwrap().len(), 2);
        assert_eq!(value["papers"][0]["id"], "1");
    }

    #[test]
    fn test_table_list_contains_rows() {
        let out = format_list(&loaded_list(), OutputFormat::Table, 120);
        assert!(out.contains("Attention Is All You Need"));
        assert!(out.contains("2017"));
        assert!(out.contains("(no PDF)"));
        assert!(out.contains("Transformers."));
    }

    #[test]
    fn test_spinner_finishes_without_terminal() {
        let spinner = Spinner::new("Fetching latest papers...");
        spinner.finish_with_success("Found 3 paper(s)");

        let spinner = Spinner::new("Searching...");
        spinner.finish_with_error("HTTP error! status: 500");

        Spinner::new("Loading document preview...").finish_and_clear();
    }

    #[test]
    fn test_table_error_contains_status() {
        let mut list = PaperListView::new();
        list.render(&ResultSet::error(FetchKind::Latest, "HTTP error! status: 500"));
        let out = format_list(&list, OutputFormat::Table, 100);
        assert!(out.contains("500"));
    }

    #[test]
    fn test_plain_detail() {
        let list = loaded_list();
        let mut detail = DetailView::new().with_previews(false);
        detail.render(list.papers().first());

        let out = format_detail(&detail, OutputFormat::Plain);
        assert!(out.starts_with("Attention Is All You Need\nAuthors: Ashish Vaswani\n"));
        assert!(out.contains("Published: 2017-06-12"));
        assert!(out.contains("Transformers."));
        assert!(out.ends_with("Preview: https://arxiv.org/pdf/1706.03762"));
    }

    #[test]
    fn test_plain_detail_without_document() {
        let list = loaded_list();
        let mut detail = DetailView::new();
        detail.render(list.papers().get(1));
        let out = format_detail(&detail, OutputFormat::Plain);
        assert!(out.ends_with(PREVIEW_UNAVAILABLE));
    }

    #[test]
    fn test_detail_placeholder() {
        let detail = DetailView::new();
        assert_eq!(format_detail(&detail, OutputFormat::Plain), PLACEHOLDER);
    }
}
