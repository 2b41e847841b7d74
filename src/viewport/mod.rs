//! Viewport measurements the feed depends on
//!
//! Heights are in abstract length units. The terminal host reports one table
//! line as `line_height` units, so the usual "80 per row, 20 from the bottom"
//! numbers work unchanged.

/// Height a single row is assumed to take when sizing the first page
pub const DEFAULT_ROW_HEIGHT: u32 = 80;

/// How close to the bottom counts as "at the bottom"
pub const DEFAULT_BOTTOM_THRESHOLD: u32 = 20;

/// Document scroll position, in the same units as the viewport height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top of the document
    pub scroll_top: u32,
    /// Visible height of the scrolling area
    pub client_height: u32,
    /// Total height of the document
    pub scroll_height: u32,
}

impl ScrollMetrics {
    pub fn new(scroll_top: u32, client_height: u32, scroll_height: u32) -> Self {
        Self {
            scroll_top,
            client_height,
            scroll_height,
        }
    }

    /// Whether the bottom edge of the view is within `threshold` of the document end
    pub fn is_near_bottom(&self, threshold: u32) -> bool {
        self.scroll_top.saturating_add(self.client_height)
            >= self.scroll_height.saturating_sub(threshold)
    }
}

/// Capability that reports the host's viewport size and scroll position
pub trait ViewportMetrics {
    /// Height of the whole viewport
    fn viewport_height(&self) -> u32;

    /// Current scroll position of the document
    fn scroll_metrics(&self) -> ScrollMetrics;
}

/// Number of rows to request per page for a viewport of the given height.
/// Never less than one.
pub fn page_size_for(viewport_height: u32, row_height: u32) -> u32 {
    if row_height == 0 {
        return 1;
    }
    viewport_height.div_ceil(row_height).max(1)
}

/// A viewport that never moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticViewport {
    pub height: u32,
    pub metrics: ScrollMetrics,
}

impl StaticViewport {
    pub fn new(height: u32, metrics: ScrollMetrics) -> Self {
        Self { height, metrics }
    }

    /// A viewport permanently parked at the end of its document.
    /// Headless loading uses it to keep asking for the next page.
    pub fn at_bottom(height: u32) -> Self {
        Self::new(height, ScrollMetrics::new(0, height, height))
    }
}

impl ViewportMetrics for StaticViewport {
    fn viewport_height(&self) -> u32 {
        self.height
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        self.metrics
    }
}
