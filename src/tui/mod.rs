//! Terminal User Interface module using ratatui

mod app;
mod events;
mod keys;
mod scroll;
mod styles;
mod view;

use app::App;
use events::EventHandler;

use anyhow::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::api::{HttpPageSource, PageSource};
use crate::config::Config;

pub type Backend = CrosstermBackend<io::Stdout>;
pub type Frame<'a> = ratatui::Frame<'a>;

/// Input poll interval; also paces status message expiry
const TICK_RATE: Duration = Duration::from_millis(100);

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Main TUI entry point
pub async fn run(config: &Config) -> Result<()> {
    let source: Arc<dyn PageSource> = Arc::new(HttpPageSource::from_config(config)?);

    let mut terminal = init_terminal()?;
    let result = run_app(&mut terminal, config, source).await;

    restore_terminal(&mut terminal)?;
    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Terminal<Backend>,
    config: &Config,
    source: Arc<dyn PageSource>,
) -> Result<()> {
    let mut event_handler = EventHandler::new(TICK_RATE);
    let mut app = App::new(config, source, event_handler.sender(), terminal.size()?)?;

    loop {
        terminal.draw(|frame| app.render(frame))?;

        match event_handler.next().await {
            Some(event) => {
                if app.handle_event(event)? {
                    break; // Exit requested
                }
            }
            None => break,
        }
    }
    Ok(())
}
