use ratatui::style::{Color, Modifier, Style};

/// Color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub focus_border: Color,
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub error: Color,
    pub highlight_bg: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header_fg: Color::White,
            header_bg: Color::Rgb(30, 60, 120),
            border: Color::Rgb(60, 60, 80),
            focus_border: Color::Rgb(60, 140, 255),
            text: Color::White,
            dim: Color::Rgb(120, 120, 140),
            accent: Color::Rgb(60, 140, 255),
            error: Color::Rgb(255, 80, 80),
            highlight_bg: Color::Rgb(30, 40, 80),
            footer_fg: Color::Rgb(120, 120, 140),
            footer_bg: Color::Reset,
        }
    }
}

impl Theme {
    /// No colors beyond the terminal's own; emphasis through modifiers only.
    pub fn mono() -> Self {
        Self {
            header_fg: Color::Reset,
            header_bg: Color::Reset,
            border: Color::Reset,
            focus_border: Color::Reset,
            text: Color::Reset,
            dim: Color::Reset,
            accent: Color::Reset,
            error: Color::Reset,
            highlight_bg: Color::Reset,
            footer_fg: Color::Reset,
            footer_bg: Color::Reset,
        }
    }

    /// Look a theme up by name, falling back to the default
    pub fn from_name(name: &str) -> Self {
        match name {
            "mono" => Self::mono(),
            _ => Self::default(),
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.focus_border)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }
}
