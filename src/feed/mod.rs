//! Scroll-paginated record feed
//!
//! [`FeedState`] is a pure reducer: scroll positions and fetch completions go
//! in as [`FeedEvent`]s, requests to fetch come out as [`Effect`]s. Whoever
//! owns the state is responsible for running the effects and feeding the
//! results back in.

pub mod loader;

use std::collections::HashSet;

use crate::api::{PageQuery, Record, RecordKey, SortDirection};
use crate::viewport::{
    page_size_for, ScrollMetrics, ViewportMetrics, DEFAULT_BOTTOM_THRESHOLD, DEFAULT_ROW_HEIGHT,
};

/// Whether a new page may be requested while another is still outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchGuard {
    /// Only one fetch at a time; scrolling is ignored until it settles
    #[default]
    SingleFlight,
    /// Every qualifying scroll advances the cursor, fetches may overlap and
    /// complete in any order
    Unguarded,
}

/// Tunables for a feed
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub row_height: u32,
    pub bottom_threshold: u32,
    pub order_by: String,
    pub direction: SortDirection,
    pub guard: FetchGuard,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            bottom_threshold: DEFAULT_BOTTOM_THRESHOLD,
            order_by: "Sequence".to_string(),
            direction: SortDirection::Asc,
            guard: FetchGuard::SingleFlight,
        }
    }
}

/// Inputs to the reducer
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// The document was scrolled
    Scrolled(ScrollMetrics),

    /// A page came back
    PageLoaded { page: u32, records: Vec<Record> },

    /// A page request failed; the reason is informational only
    PageFailed { page: u32, reason: String },
}

/// Work the reducer asks its owner to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(PageQuery),
}

/// Accumulated records plus the pagination bookkeeping around them
#[derive(Debug, Clone)]
pub struct FeedState {
    records: Vec<Record>,
    keys: HashSet<RecordKey>,
    cursor: u32,
    page_size: u32,
    has_more: bool,
    in_flight: usize,
    config: FeedConfig,
}

impl FeedState {
    /// Create the feed for a freshly shown view.
    ///
    /// The page size is fixed here from the viewport height and never
    /// recomputed. Returns the fetch for page 1, which always runs.
    pub fn mount(viewport: &dyn ViewportMetrics, config: FeedConfig) -> (Self, Effect) {
        let page_size = page_size_for(viewport.viewport_height(), config.row_height);
        let mut state = Self {
            records: Vec::new(),
            keys: HashSet::new(),
            cursor: 1,
            page_size,
            has_more: true,
            in_flight: 0,
            config,
        };
        let effect = state.request(1);
        (state, effect)
    }

    /// Apply one event, returning any fetches it triggered
    pub fn reduce(&mut self, event: FeedEvent) -> Vec<Effect> {
        match event {
            FeedEvent::Scrolled(metrics) => self.on_scroll(metrics).into_iter().collect(),
            FeedEvent::PageLoaded { page, records } => {
                self.settle();
                self.merge(page, records);
                Vec::new()
            }
            FeedEvent::PageFailed { .. } => {
                self.settle();
                Vec::new()
            }
        }
    }

    /// Shorthand for reducing the viewport's current scroll position
    pub fn scrolled(&mut self, viewport: &dyn ViewportMetrics) -> Vec<Effect> {
        self.reduce(FeedEvent::Scrolled(viewport.scroll_metrics()))
    }

    fn on_scroll(&mut self, metrics: ScrollMetrics) -> Option<Effect> {
        if !self.has_more || !metrics.is_near_bottom(self.config.bottom_threshold) {
            return None;
        }
        if self.config.guard == FetchGuard::SingleFlight && self.in_flight > 0 {
            return None;
        }

        self.cursor += 1;
        Some(self.request(self.cursor))
    }

    fn request(&mut self, page: u32) -> Effect {
        self.in_flight += 1;
        Effect::Fetch(PageQuery {
            page_number: page,
            page_size: self.page_size,
            order_by: self.config.order_by.clone(),
            direction: self.config.direction,
        })
    }

    fn settle(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn merge(&mut self, page: u32, records: Vec<Record>) {
        let returned = records.len();

        if page == 1 {
            self.records.clear();
            self.keys.clear();
        }
        for record in records {
            if self.keys.insert(record.id.clone()) {
                self.records.push(record);
            }
        }

        // A short page means the source has nothing left
        if returned < self.page_size as usize {
            self.has_more = false;
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Number of requested pages that have not come back yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
