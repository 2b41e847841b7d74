//! Page endpoint access
//!
//! The feed only ever talks to a [`PageSource`]; [`HttpPageSource`] is the
//! real one, tests plug in canned sources.

pub mod client;
pub mod errors;
pub mod types;

pub use client::HttpPageSource;
pub use errors::FetchResult;
pub use types::{PageQuery, Record, RecordKey, SortDirection};

use async_trait::async_trait;

/// Anything that can hand out pages of records
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page of records
    async fn fetch_page(&self, query: &PageQuery) -> FetchResult<Vec<Record>>;

    /// Where the pages come from, for logs and the status line
    fn endpoint(&self) -> &str;
}
