use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::ui::detail::{DetailContent, PreviewState, PLACEHOLDER, PREVIEW_UNAVAILABLE};
use crate::ui::list::ListContent;
use crate::ui::tui::app::App;
use crate::ui::tui::input::InputMode;
use crate::ui::tui::theme::Theme;
use crate::utils::{format_date, truncate_with_ellipsis};

const SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Draw the whole screen
pub fn view(f: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Min(5),    // panes
        Constraint::Length(1), // footer / search prompt
    ])
    .split(f.area());

    render_header(f, chunks[0], app);

    let panes = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);
    render_list(f, panes[0], app);
    render_detail(f, panes[1], app);

    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let mut spans = vec![
        Span::styled(" PAPER BROWSER ", theme.header_style()),
        Span::styled(
            format!(" {}", app.browser.list().title()),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ];
    if app.is_loading() {
        spans.push(Span::styled(
            format!(" {}", SPINNER[app.tick % SPINNER.len()]),
            Style::default().fg(theme.accent),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_list(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let list = app.browser.list();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(app.browser.selection().is_none()))
        .title(" Papers ");

    if let Some(indicator) = list.content().indicator() {
        let style = match list.content() {
            ListContent::Error(_) => theme.error_style(),
            _ => Style::default().fg(theme.dim),
        };
        let paragraph = Paragraph::new(indicator)
            .style(style)
            .block(block)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = list
        .rows()
        .iter()
        .map(|row| {
            let mut lines = vec![Line::from(Span::styled(
                truncate_with_ellipsis(&row.title, width),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ))];
            if !row.authors.is_empty() {
                lines.push(Line::from(Span::styled(
                    truncate_with_ellipsis(&row.authors, width),
                    Style::default().fg(theme.dim),
                )));
            }
            if !row.summary.is_empty() {
                lines.push(Line::from(Span::styled(
                    truncate_with_ellipsis(&row.summary, width),
                    Style::default()
                        .fg(theme.dim)
                        .add_modifier(Modifier::ITALIC),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let widget = List::new(items)
        .block(block)
        .highlight_style(theme.highlight_style())
        .highlight_symbol("▶ ");

    let mut state = ListState::default().with_selected(Some(list.cursor()));
    f.render_stateful_widget(widget, area, &mut state);
}

fn section_header(lines: &mut Vec<Line<'static>>, title: &str, theme: &Theme) {
    lines.push(Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    )));
}

fn labeled_line(lines: &mut Vec<Line<'static>>, label: &str, value: &str, theme: &Theme) {
    lines.push(Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(theme.dim)),
        Span::styled(value.to_string(), Style::default().fg(theme.text)),
    ]));
}

fn render_detail(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let detail = app.browser.detail();

    let DetailContent::Paper(paper) = detail.content() else {
        let paragraph = Paragraph::new(PLACEHOLDER)
            .style(Style::default().fg(theme.dim))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border_style(false))
                    .title(" Details "),
            );
        f.render_widget(paragraph, area);
        return;
    };

    let chunks = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let mut lines: Vec<Line<'static>> = vec![Line::from(Span::styled(
        paper.title.clone(),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    ))];
    lines.push(Line::from(""));
    if !paper.authors.is_empty() {
        labeled_line(&mut lines, "Authors", &paper.authors, theme);
    }
    if let Some(date) = &paper.published_date {
        labeled_line(&mut lines, "Published", &format_date(date), theme);
    }
    if let Some(date) = &paper.updated_date {
        labeled_line(&mut lines, "Updated", &format_date(date), theme);
    }
    if !paper.categories.is_empty() {
        labeled_line(&mut lines, "Categories", &paper.categories.join(", "), theme);
    }
    lines.push(Line::from(""));
    section_header(&mut lines, "ABSTRACT", theme);
    for line in paper.summary.lines() {
        lines.push(Line::from(line.to_string()));
    }

    let info = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(true))
                .title(format!(" {} ", paper.id)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));
    f.render_widget(info, chunks[0]);

    render_preview(f, chunks[1], app);
}

fn render_preview(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let detail = app.browser.detail();

    let Some(frame) = detail.frame() else {
        let paragraph = Paragraph::new(PREVIEW_UNAVAILABLE)
            .style(Style::default().fg(theme.dim))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border_style(false))
                    .title(" Preview "),
            );
        f.render_widget(paragraph, area);
        return;
    };

    let (text, style) = match &frame.state {
        PreviewState::Loading => (
            format!("{} Loading document...", SPINNER[app.tick % SPINNER.len()]),
            Style::default().fg(theme.dim),
        ),
        PreviewState::Disabled => (
            "Previews are disabled in the configuration.".to_string(),
            Style::default().fg(theme.dim),
        ),
        PreviewState::Ready(text) if text.is_empty() => (
            "Document has no extractable text.".to_string(),
            Style::default().fg(theme.dim),
        ),
        PreviewState::Ready(text) => (text.clone(), Style::default().fg(theme.text)),
        PreviewState::Failed(reason) => (reason.clone(), theme.error_style()),
    };

    let title_width = area.width.saturating_sub(14) as usize;
    let paragraph = Paragraph::new(text)
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(false))
                .title(format!(
                    " Preview: {} ",
                    truncate_with_ellipsis(&frame.src, title_width)
                )),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let line = if app.input_mode == InputMode::Search {
        Line::from(vec![
            Span::styled(" / ", theme.header_style()),
            Span::styled(
                format!(" {}_", app.search_input),
                Style::default().fg(theme.text),
            ),
            Span::styled("  Enter search  Esc cancel", theme.footer_style()),
        ])
    } else if let Some(status) = &app.status {
        Line::from(Span::styled(format!(" {}", status), theme.error_style()))
    } else {
        Line::from(Span::styled(
            " j/k move  Enter select  Esc clear  / search  r reload  J/K scroll  q quit",
            theme.footer_style(),
        ))
    };

    f.render_widget(Paragraph::new(line), area);
}
