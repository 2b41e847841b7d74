//! Error types for the page endpoint

use serde_json::Value;
use thiserror::Error;

/// A failed page fetch.
///
/// The feed treats every variant the same way ("fetch failed"); the split
/// only exists so the log line says what actually went wrong.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server responded with status {status}")]
    Status { status: u16, body: Option<Value> },

    #[error("JSON parsing error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl FetchError {
    /// The error body the server sent back, if there was one
    pub fn server_body(&self) -> Option<&Value> {
        match self {
            FetchError::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
