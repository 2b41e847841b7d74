use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod cli;
mod config;
mod feed;
mod tui;
mod version;
mod viewport;

use cli::Cli;
use config::Config;

#[tokio::main]
async fn main() {
    // Leave the terminal usable and record what happened
    std::panic::set_hook(Box::new(|panic_info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        );
        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        std::process::exit(1);
    }));

    // Load environment variables from .env file
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match cli.load_config().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&cli, &config) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = dotenv {
        // Don't error if .env file doesn't exist, just log it
        debug!("No .env file found or error loading it: {}", e);
    }
    info!("{} starting", version::full_version());

    if let Err(e) = cli.execute(config).await {
        error!("Application error: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Interactive mode owns the screen, so its logs go to a file instead of stderr
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let default_level = if cli.debug { "infiniscroll=debug" } else { "infiniscroll=info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into());

    if cli.is_interactive() {
        std::fs::create_dir_all(&config.data_dir)?;
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.log_file())?;

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(log_file)),
            )
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;
    }

    Ok(())
}
