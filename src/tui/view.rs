//! Drawing the feed: heading, record table, load status and status bar

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
};

use super::{scroll::ScrollView, styles::Theme, Frame};
use crate::feed::FeedState;

pub const LOADING_TEXT: &str = "Loading more...";
pub const EXHAUSTED_TEXT: &str = "No more items to load";

/// Screen regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedLayout {
    pub heading: Rect,
    pub table: Rect,
    pub load_status: Rect,
    pub status_bar: Rect,
}

impl FeedLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Heading
                Constraint::Min(3),    // Table
                Constraint::Length(1), // Load status
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        Self {
            heading: chunks[0],
            table: chunks[1],
            load_status: chunks[2],
            status_bar: chunks[3],
        }
    }

    /// Record rows that fit in the table once borders and the header row are drawn
    pub fn body_lines(&self) -> u32 {
        u32::from(self.table.height.saturating_sub(3))
    }
}

/// Everything the view needs besides the feed itself
pub struct ViewContext<'a> {
    pub title: &'a str,
    pub endpoint: &'a str,
    pub status_message: Option<&'a str>,
    pub show_help: bool,
    pub help_text: &'a str,
}

pub fn render(frame: &mut Frame, feed: &FeedState, scroll: &ScrollView, theme: &Theme, ctx: &ViewContext<'_>) {
    let layout = FeedLayout::new(frame.size());

    frame.render_widget(
        Paragraph::new(ctx.title).style(theme.heading_style()),
        layout.heading,
    );
    render_table(frame, layout.table, feed, scroll, theme);
    render_load_status(frame, layout.load_status, feed, theme);
    render_status_bar(frame, layout.status_bar, feed, theme, ctx);

    if ctx.show_help {
        render_help_overlay(frame, theme, ctx.help_text);
    }
}

fn render_table(frame: &mut Frame, area: Rect, feed: &FeedState, scroll: &ScrollView, theme: &Theme) {
    let visible = scroll.visible_range();
    let rows = feed
        .records()
        .get(visible.clone())
        .unwrap_or(&[])
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let row = Row::new(vec![
                Cell::from(record.display_name().to_string()).style(theme.name_style()),
                Cell::from(record.display_sequence()),
            ]);
            if (visible.start + i) % 2 == 1 {
                row.style(theme.alt_row_style())
            } else {
                row
            }
        });

    let header = Row::new(vec!["Category Name", "Sequence"]).style(theme.header_row_style());
    let title = if feed.is_empty() {
        String::new()
    } else {
        format!(" {}-{} of {} ", visible.start + 1, visible.end, feed.len())
    };

    let table = Table::new(rows, [Constraint::Percentage(70), Constraint::Percentage(30)])
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(title),
        )
        .style(theme.text_style());

    frame.render_widget(table, area);
}

fn render_load_status(frame: &mut Frame, area: Rect, feed: &FeedState, theme: &Theme) {
    let line = if feed.has_more() {
        Line::from(Span::styled(LOADING_TEXT, theme.loading_style()))
    } else {
        Line::from(Span::styled(EXHAUSTED_TEXT, theme.exhausted_style()))
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, feed: &FeedState, theme: &Theme, ctx: &ViewContext<'_>) {
    let mut spans = vec![Span::raw(format!(
        "{} records | page {} ({} per page)",
        feed.len(),
        feed.cursor(),
        feed.page_size()
    ))];
    if feed.in_flight() > 0 {
        spans.push(Span::raw(" | fetching"));
    }

    match ctx.status_message {
        Some(message) => {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(message.to_string(), theme.error_style()));
        }
        None => spans.push(Span::raw(format!(" | {} | Ctrl+G for help", ctx.endpoint))),
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(theme.status_bar_style()),
        area,
    );
}

fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_text: &str) {
    let area = centered_rect(60, 50, frame.size());

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .border_style(theme.help_border_style()),
        )
        .style(theme.help_style());

    frame.render_widget(Clear, area);
    frame.render_widget(help, area);
}

/// Create a centered rectangle with given percentage of the screen
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
