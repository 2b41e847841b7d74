//! Line-based scroll position of the record table
//!
//! The table is the "document": one line per record. [`ScrollView`] reports
//! its position through [`ViewportMetrics`] with every line counted as
//! `line_height` units.

use crate::viewport::{ScrollMetrics, ViewportMetrics};

#[derive(Debug, Clone)]
pub struct ScrollView {
    /// First visible record
    offset: u32,
    /// Rows of records that fit on screen
    body_lines: u32,
    /// Total records in the table
    content_lines: u32,
    /// Full terminal height in lines
    screen_lines: u32,
    line_height: u32,
}

impl ScrollView {
    pub fn new(screen_lines: u32, body_lines: u32, line_height: u32) -> Self {
        Self {
            offset: 0,
            body_lines,
            content_lines: 0,
            screen_lines,
            line_height,
        }
    }

    #[cfg(test)]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn body_lines(&self) -> u32 {
        self.body_lines
    }

    pub fn max_offset(&self) -> u32 {
        self.content_lines.saturating_sub(self.body_lines)
    }

    /// Terminal was resized
    pub fn resize(&mut self, screen_lines: u32, body_lines: u32) {
        self.screen_lines = screen_lines;
        self.body_lines = body_lines;
        self.clamp();
    }

    /// Number of records changed
    pub fn set_content_lines(&mut self, lines: u32) {
        self.content_lines = lines;
        self.clamp();
    }

    pub fn scroll_down(&mut self, lines: u32) {
        self.offset = self.offset.saturating_add(lines).min(self.max_offset());
    }

    pub fn scroll_up(&mut self, lines: u32) {
        self.offset = self.offset.saturating_sub(lines);
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Half-open range of record indices on screen
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let start = self.offset as usize;
        let end = (self.offset + self.body_lines).min(self.content_lines) as usize;
        start..end.max(start)
    }

    fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }
}

impl ViewportMetrics for ScrollView {
    fn viewport_height(&self) -> u32 {
        self.screen_lines.saturating_mul(self.line_height)
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: self.offset.saturating_mul(self.line_height),
            client_height: self.body_lines.saturating_mul(self.line_height),
            scroll_height: self.content_lines.saturating_mul(self.line_height),
        }
    }
}
