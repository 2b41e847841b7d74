use ratatui::style::{Color, Modifier, Style};

/// Application theme configuration
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary colors
    pub primary: Color,
    pub accent: Color,

    /// Text colors
    pub text: Color,
    pub text_dim: Color,
    pub text_bright: Color,

    /// Background colors
    pub background: Color,
    pub background_alt: Color,

    /// Border colors
    pub border: Color,

    /// Status colors
    pub success: Color,
    pub error: Color,
    pub info: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme
    pub fn dark() -> Self {
        Self {
            primary: Color::Rgb(147, 51, 234),      // Purple
            accent: Color::Rgb(236, 72, 153),       // Pink

            text: Color::Rgb(248, 250, 252),        // Slate-50
            text_dim: Color::Rgb(148, 163, 184),    // Slate-400
            text_bright: Color::Rgb(255, 255, 255), // White

            background: Color::Rgb(15, 23, 42),     // Slate-900
            background_alt: Color::Rgb(30, 41, 59), // Slate-800

            border: Color::Rgb(71, 85, 105),        // Slate-600

            success: Color::Rgb(34, 197, 94),       // Green-500
            error: Color::Rgb(239, 68, 68),         // Red-500
            info: Color::Rgb(59, 130, 246),         // Blue-500
        }
    }

    /// Style for text content
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    /// Style for the page heading
    pub fn heading_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for borders
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Style for the table header row
    pub fn header_row_style(&self) -> Style {
        Style::default()
            .fg(self.text_bright)
            .bg(self.background_alt)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the name column, bold like a small heading
    pub fn name_style(&self) -> Style {
        Style::default().fg(self.text).add_modifier(Modifier::BOLD)
    }

    /// Style for every other table row
    pub fn alt_row_style(&self) -> Style {
        Style::default().bg(self.background_alt)
    }

    /// Style for the "more to come" status line
    pub fn loading_style(&self) -> Style {
        Style::default().fg(self.info).add_modifier(Modifier::ITALIC)
    }

    /// Style for the "nothing left" status line
    pub fn exhausted_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    /// Style for transient failure notes
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Style for the status bar
    pub fn status_bar_style(&self) -> Style {
        Style::default().fg(self.text_dim).bg(self.background_alt)
    }

    /// Style for help text
    pub fn help_style(&self) -> Style {
        Style::default()
            .fg(self.text)
            .bg(self.background)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the help overlay border
    pub fn help_border_style(&self) -> Style {
        Style::default().fg(self.accent)
    }
}
