use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

use super::fetch::FetchCommand;
use crate::config::Config;
use crate::tui;

/// A terminal table that keeps loading records as you scroll
#[derive(Parser)]
#[command(
    name = "infiniscroll",
    version,
    about = "A terminal table that keeps loading records as you scroll",
    long_about = r#"infiniscroll POSTs page requests to an HTTP endpoint and shows the
returned records in a table, asking for the next page whenever you scroll to
the bottom.

Examples:
  infiniscroll --endpoint https://api.example.com/categories
  infiniscroll fetch --all --json
  INFINISCROLL_TOKEN=... infiniscroll fetch --page 2"#
)]
pub struct Cli {
    /// Endpoint the page requests are POSTed to
    #[arg(short = 'e', long = "endpoint", global = true)]
    pub endpoint: Option<String>,

    /// Bearer token (prefer INFINISCROLL_TOKEN so it stays out of shell history)
    #[arg(long = "token", global = true)]
    pub token: Option<String>,

    /// Path to a JSON config file
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Keep requesting pages while earlier ones are still loading
    #[arg(long = "allow-overlap", global = true)]
    pub allow_overlap: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch records without the interactive view
    Fetch(FetchCommand),
}

impl Cli {
    /// Whether this invocation takes over the terminal
    pub fn is_interactive(&self) -> bool {
        self.command.is_none()
    }

    /// Build the effective configuration: file, environment, then flags
    pub async fn load_config(&self) -> Result<Config> {
        let mut config = Config::init(self.config.as_deref()).await?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut Config) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = Some(endpoint.clone());
        }
        if let Some(token) = &self.token {
            config.token = Some(token.clone());
        }
        if self.allow_overlap {
            config.allow_overlapping_fetches = true;
        }
        config.normalize();
    }

    pub async fn execute(self, config: Config) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }

        config.validate()?;
        debug!("Configuration: {:?}", config);

        match self.command {
            Some(Commands::Fetch(fetch_cmd)) => fetch_cmd.execute(&config).await,
            None => {
                info!("Starting interactive mode");
                tui::run(&config).await?;
                info!("Application finished");
                Ok(())
            }
        }
    }
}
