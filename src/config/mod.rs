use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, path::{Path, PathBuf}};
use tracing::debug;

use crate::api::SortDirection;
use crate::feed::{FeedConfig, FetchGuard};
use crate::viewport::{DEFAULT_BOTTOM_THRESHOLD, DEFAULT_ROW_HEIGHT};

/// Application configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL the page requests are POSTed to
    pub endpoint: Option<String>,

    /// Bearer credential for the endpoint
    pub token: Option<String>,

    /// Assumed height of one table row when sizing pages
    pub row_height: u32,

    /// Distance from the bottom that triggers the next page
    pub bottom_threshold: u32,

    /// Height one terminal line stands for
    pub line_height: u32,

    /// Ordering key sent with every request
    pub order_by: String,

    /// Sort direction sent with every request ("asc" or "desc")
    pub direction: String,

    /// Let scrolling request further pages while one is still loading
    pub allow_overlapping_fetches: bool,

    /// Per-request timeout; unset means wait as long as the network stack does
    pub request_timeout_secs: Option<u64>,

    /// Extra headers for every request
    pub extra_headers: HashMap<String, String>,

    /// Heading shown above the table
    pub title: String,

    /// Where the interactive log file goes
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            token: None,
            row_height: DEFAULT_ROW_HEIGHT,
            bottom_threshold: DEFAULT_BOTTOM_THRESHOLD,
            line_height: DEFAULT_ROW_HEIGHT,
            order_by: "Sequence".to_string(),
            direction: "asc".to_string(),
            allow_overlapping_fetches: false,
            request_timeout_secs: None,
            extra_headers: HashMap::new(),
            title: "Infinite Scroll Page".to_string(),
            data_dir: default_data_dir(),
        }
    }
}

// The token never shows up in logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("row_height", &self.row_height)
            .field("bottom_threshold", &self.bottom_threshold)
            .field("line_height", &self.line_height)
            .field("order_by", &self.order_by)
            .field("direction", &self.direction)
            .field("allow_overlapping_fetches", &self.allow_overlapping_fetches)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("extra_headers", &self.extra_headers.keys().collect::<Vec<_>>())
            .field("title", &self.title)
            .field("data_dir", &self.data_dir)
            .finish()
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("infiniscroll"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

impl Config {
    /// Initialize configuration from the config file (explicit or discovered)
    /// and the environment
    pub async fn init(explicit: Option<&Path>) -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = match explicit {
            Some(path) => Self::load_file(path).await?,
            None => match Self::discover_file() {
                Some(path) => Self::load_file(&path).await?,
                None => Self::default(),
            },
        };

        config.load_from_env();
        config.normalize();
        Ok(config)
    }

    /// Candidate config files, highest priority first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("./.infiniscroll.json"),
            PathBuf::from("./infiniscroll.json"),
        ];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("infiniscroll").join("infiniscroll.json"));
        }
        paths
    }

    fn discover_file() -> Option<PathBuf> {
        Self::search_paths().into_iter().find(|path| path.exists())
    }

    /// Load configuration from a JSON file; missing keys take their defaults
    pub async fn load_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    /// Overlay settings from any variable lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup("INFINISCROLL_ENDPOINT") {
            self.endpoint = Some(endpoint);
        }

        if let Some(token) = lookup("INFINISCROLL_TOKEN") {
            self.token = Some(token);
        }

        if let Some(row_height) = lookup("INFINISCROLL_ROW_HEIGHT").and_then(|v| v.parse().ok()) {
            self.row_height = row_height;
        }

        if let Some(threshold) = lookup("INFINISCROLL_BOTTOM_THRESHOLD").and_then(|v| v.parse().ok()) {
            self.bottom_threshold = threshold;
        }

        if let Some(order_by) = lookup("INFINISCROLL_ORDER_BY") {
            self.order_by = order_by;
        }

        if let Some(direction) = lookup("INFINISCROLL_DIRECTION") {
            self.direction = direction;
        }

        if let Some(timeout) = lookup("INFINISCROLL_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.request_timeout_secs = Some(timeout);
        }
    }

    /// Strip stray whitespace from the endpoint and token
    pub fn normalize(&mut self) {
        for value in [&mut self.endpoint, &mut self.token].into_iter().flatten() {
            let trimmed = value.trim();
            if trimmed.len() != value.len() {
                *value = trimmed.to_string();
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.as_deref().unwrap_or("").trim();
        if endpoint.is_empty() {
            return Err(anyhow!(
                "No endpoint configured. Set INFINISCROLL_ENDPOINT or pass --endpoint."
            ));
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(anyhow!("endpoint must be an http(s) URL, got '{}'", endpoint));
        }

        if self.token.as_deref().map_or(true, |t| t.trim().is_empty()) {
            return Err(anyhow!(
                "No bearer token configured. Set INFINISCROLL_TOKEN or pass --token."
            ));
        }

        if self.row_height == 0 {
            return Err(anyhow!("row_height must be greater than 0"));
        }

        if self.line_height == 0 {
            return Err(anyhow!("line_height must be greater than 0"));
        }

        self.direction.parse::<SortDirection>().map_err(|e| anyhow!(e))?;

        Ok(())
    }

    /// Feed tunables derived from this configuration
    pub fn feed_config(&self) -> Result<FeedConfig> {
        Ok(FeedConfig {
            row_height: self.row_height,
            bottom_threshold: self.bottom_threshold,
            order_by: self.order_by.clone(),
            direction: self.direction.parse().map_err(|e: String| anyhow!(e))?,
            guard: if self.allow_overlapping_fetches {
                FetchGuard::Unguarded
            } else {
                FetchGuard::SingleFlight
            },
        })
    }

    /// File the interactive mode logs to
    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("infiniscroll.log")
    }
}
