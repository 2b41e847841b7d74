use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::feed::FeedEvent;

/// Application events
#[derive(Debug)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),

    /// Mouse input event
    Mouse(MouseEvent),

    /// Terminal resize event
    Resize(u16, u16),

    /// Periodic tick event
    Tick,

    /// A page fetch settled
    Feed(FeedEvent),
}

/// Merges terminal input with events posted from background tasks
pub struct EventHandler {
    /// Event receiver channel
    receiver: mpsc::UnboundedReceiver<Event>,

    /// Event sender channel
    sender: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a handler and start reading terminal input
    pub fn new(tick_interval: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        let input_sender = sender.clone();
        tokio::task::spawn_blocking(move || Self::read_input(input_sender, tick_interval));

        Self { receiver, sender }
    }

    /// Create a handler that only carries internal events
    #[cfg(test)]
    pub fn detached() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { receiver, sender }
    }

    /// Blocking input loop; ends once nobody listens anymore
    fn read_input(sender: mpsc::UnboundedSender<Event>, tick_interval: Duration) {
        loop {
            let event = match crossterm::event::poll(tick_interval) {
                Ok(true) => match crossterm::event::read() {
                    Ok(event) => match Self::convert_crossterm_event(event) {
                        Some(event) => event,
                        None => continue,
                    },
                    Err(e) => {
                        debug!("Terminal input closed: {}", e);
                        return;
                    }
                },
                Ok(false) => Event::Tick,
                Err(e) => {
                    debug!("Terminal input closed: {}", e);
                    return;
                }
            };

            if sender.send(event).is_err() {
                return;
            }
        }
    }

    /// Convert crossterm events to application events
    fn convert_crossterm_event(event: CrosstermEvent) -> Option<Event> {
        match event {
            // Windows reports key releases too
            CrosstermEvent::Key(key_event) if key_event.kind == KeyEventKind::Release => None,
            CrosstermEvent::Key(key_event) => Some(Event::Key(key_event)),
            CrosstermEvent::Mouse(mouse_event) => Some(Event::Mouse(mouse_event)),
            CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
            CrosstermEvent::FocusGained | CrosstermEvent::FocusLost | CrosstermEvent::Paste(_) => None,
        }
    }

    /// Get the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Get a clone of the sender
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[tokio::test]
    async fn test_internal_events_are_delivered_in_order() {
        let mut handler = EventHandler::detached();
        handler.sender().send(Event::Resize(80, 24)).unwrap();
        handler.sender().send(Event::Tick).unwrap();

        assert!(matches!(handler.next().await, Some(Event::Resize(80, 24))));
        assert!(matches!(handler.next().await, Some(Event::Tick)));
    }

    #[test]
    fn test_key_release_is_dropped() {
        let mut release = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(EventHandler::convert_crossterm_event(CrosstermEvent::Key(release)).is_none());

        let press = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        assert!(matches!(
            EventHandler::convert_crossterm_event(CrosstermEvent::Key(press)),
            Some(Event::Key(_))
        ));
        assert!(matches!(
            EventHandler::convert_crossterm_event(CrosstermEvent::Resize(80, 24)),
            Some(Event::Resize(80, 24))
        ));
    }
}
