use anyhow::Result;
use crossterm::event::{MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::{
    events::Event,
    keys::{KeyAction, KeyMap},
    scroll::ScrollView,
    styles::Theme,
    view::{self, FeedLayout, ViewContext},
    Frame,
};
use crate::api::PageSource;
use crate::config::Config;
use crate::feed::{loader, Effect, FeedEvent, FeedState};

/// How long a status note stays in the status bar
const STATUS_TTL: Duration = Duration::from_secs(5);

/// Lines moved per mouse wheel notch
const WHEEL_LINES: u32 = 3;

/// Main application state and controller
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    /// Key mappings for the application
    key_map: KeyMap,

    /// Current theme for styling
    theme: Theme,

    /// The records and their pagination state
    feed: FeedState,

    /// Scroll position of the record table
    scroll: ScrollView,

    /// Where pages come from
    source: Arc<dyn PageSource>,

    /// Event sender for fetch completions
    event_sender: mpsc::UnboundedSender<Event>,

    /// Status message to display, with the time it was set
    status_message: Option<(String, Instant)>,

    /// Show help overlay
    show_help: bool,

    title: String,
}

impl App {
    /// Mount the feed for a screen of the given size and start loading page 1
    pub fn new(
        config: &Config,
        source: Arc<dyn PageSource>,
        event_sender: mpsc::UnboundedSender<Event>,
        area: Rect,
    ) -> Result<Self> {
        let layout = FeedLayout::new(area);
        let scroll = ScrollView::new(u32::from(area.height), layout.body_lines(), config.line_height);
        let (feed, first) = FeedState::mount(&scroll, config.feed_config()?);

        info!(
            "Mounted feed for {} with page size {}",
            source.endpoint(),
            feed.page_size()
        );

        let app = Self {
            should_quit: false,
            key_map: KeyMap::default(),
            theme: Theme::default(),
            feed,
            scroll,
            source,
            event_sender,
            status_message: None,
            show_help: false,
            title: config.title.clone(),
        };
        app.dispatch(vec![first]);

        Ok(app)
    }

    /// Handle incoming events. Returns true once the app should exit.
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key_event) => {
                if let Some(action) = self.key_map.action_for(&key_event) {
                    self.on_action(action);
                }
            }

            Event::Mouse(mouse_event) => self.on_mouse(mouse_event),

            Event::Resize(width, height) => {
                let layout = FeedLayout::new(Rect::new(0, 0, width, height));
                self.scroll.resize(u32::from(height), layout.body_lines());
            }

            Event::Tick => {
                if matches!(&self.status_message, Some((_, at)) if at.elapsed() >= STATUS_TTL) {
                    self.status_message = None;
                }
            }

            Event::Feed(feed_event) => self.on_feed_event(feed_event),
        }

        Ok(self.should_quit)
    }

    fn on_action(&mut self, action: KeyAction) {
        let page = self.scroll.body_lines().max(1);
        match action {
            KeyAction::Quit => self.should_quit = true,
            KeyAction::ToggleHelp => self.show_help = !self.show_help,
            KeyAction::LineDown => self.scroll_with(|s| s.scroll_down(1)),
            KeyAction::LineUp => self.scroll_with(|s| s.scroll_up(1)),
            KeyAction::PageDown => self.scroll_with(|s| s.scroll_down(page)),
            KeyAction::PageUp => self.scroll_with(|s| s.scroll_up(page)),
            KeyAction::Top => self.scroll_with(ScrollView::scroll_to_top),
            KeyAction::Bottom => self.scroll_with(ScrollView::scroll_to_bottom),
        }
    }

    fn on_mouse(&mut self, event: MouseEvent) {
        match event.kind {
            MouseEventKind::ScrollDown => self.scroll_with(|s| s.scroll_down(WHEEL_LINES)),
            MouseEventKind::ScrollUp => self.scroll_with(|s| s.scroll_up(WHEEL_LINES)),
            _ => {}
        }
    }

    /// Every scroll input is reported to the feed, moved or not
    fn scroll_with(&mut self, scroll: impl FnOnce(&mut ScrollView)) {
        scroll(&mut self.scroll);
        let effects = self.feed.scrolled(&self.scroll);
        self.dispatch(effects);
    }

    fn on_feed_event(&mut self, event: FeedEvent) {
        if let FeedEvent::PageFailed { page, reason } = &event {
            self.status_message = Some((format!("Page {} failed: {}", page, reason), Instant::now()));
        }

        let effects = self.feed.reduce(event);
        self.scroll.set_content_lines(self.feed.len() as u32);
        self.dispatch(effects);
    }

    /// Start a background fetch for every requested page.
    /// Completions come back through the event channel.
    fn dispatch(&self, effects: Vec<Effect>) {
        for Effect::Fetch(query) in effects {
            debug!("Dispatching fetch for page {}", query.page_number);
            let source = Arc::clone(&self.source);
            let sender = self.event_sender.clone();
            tokio::spawn(async move {
                let event = loader::fetch_page(source.as_ref(), query).await;
                // Nobody is listening once the view is gone
                let _ = sender.send(Event::Feed(event));
            });
        }
    }

    /// Render the application UI
    pub fn render(&mut self, frame: &mut Frame) {
        let help_text = self.key_map.help_text();
        let ctx = ViewContext {
            title: &self.title,
            endpoint: self.source.endpoint(),
            status_message: self.status_message.as_ref().map(|(m, _)| m.as_str()),
            show_help: self.show_help,
            help_text: &help_text,
        };
        view::render(frame, &self.feed, &self.scroll, &self.theme, &ctx);
    }

    #[cfg(test)]
    pub fn feed(&self) -> &FeedState {
        &self.feed
    }

    #[cfg(test)]
    pub fn scroll(&self) -> &ScrollView {
        &self.scroll
    }
}
