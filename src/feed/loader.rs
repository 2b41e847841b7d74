//! Running fetch effects against a page source

use anyhow::{anyhow, Result};
use std::collections::VecDeque;
use tracing::{debug, error, info};

use super::{Effect, FeedEvent, FeedState};
use crate::api::{FetchResult, PageQuery, PageSource, Record};
use crate::viewport::ViewportMetrics;

/// Fetch one page of records.
///
/// Failures are logged here, together with whatever body the server sent
/// back, before being handed to the caller.
pub async fn fetch_records(source: &dyn PageSource, query: &PageQuery) -> FetchResult<Vec<Record>> {
    debug!("Fetching page {} (size {})", query.page_number, query.page_size);

    match source.fetch_page(query).await {
        Ok(records) => {
            debug!("Page {} returned {} records", query.page_number, records.len());
            Ok(records)
        }
        Err(e) => {
            error!("Error fetching items: {}", e);
            if let Some(body) = e.server_body() {
                error!("Server responded with: {}", body);
            }
            Err(e)
        }
    }
}

/// Fetch one page and turn the outcome into a feed event.
/// The feed only learns that a page failed, not why it failed.
pub async fn fetch_page(source: &dyn PageSource, query: PageQuery) -> FeedEvent {
    let page = query.page_number;
    match fetch_records(source, &query).await {
        Ok(records) => FeedEvent::PageLoaded { page, records },
        Err(e) => FeedEvent::PageFailed {
            page,
            reason: e.to_string(),
        },
    }
}

/// Outcome of a headless load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub pages: u32,
    pub records: usize,
    pub exhausted: bool,
}

/// Drive a feed without a screen: run every fetch in turn and keep scrolling
/// `viewport` until the source runs dry or `max_pages` requests were made.
///
/// Unlike the interactive view, a failed page aborts the load.
pub async fn load_until_exhausted(
    source: &dyn PageSource,
    state: &mut FeedState,
    first: Effect,
    viewport: &dyn ViewportMetrics,
    max_pages: u32,
) -> Result<LoadSummary> {
    let mut pending: VecDeque<Effect> = VecDeque::from([first]);
    let mut pages = 0;

    while let Some(Effect::Fetch(query)) = pending.pop_front() {
        if pages >= max_pages {
            info!("Stopping after {} pages", pages);
            break;
        }
        pages += 1;

        let event = fetch_page(source, query).await;
        if let FeedEvent::PageFailed { page, reason } = &event {
            return Err(anyhow!("Page {} failed: {}", page, reason));
        }
        pending.extend(state.reduce(event));

        if pending.is_empty() && state.has_more() {
            pending.extend(state.scrolled(viewport));
        }
    }

    Ok(LoadSummary {
        pages,
        records: state.len(),
        exhausted: !state.has_more(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::errors::FetchError;
    use crate::feed::FeedConfig;
    use crate::viewport::StaticViewport;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves pages from a fixed table; unknown pages come back empty
    pub(crate) struct CannedSource {
        pages: HashMap<u32, FetchResult<Vec<Record>>>,
        pub(crate) requested: Mutex<Vec<PageQuery>>,
    }

    impl CannedSource {
        pub(crate) fn new() -> Self {
            Self {
                pages: HashMap::new(),
                requested: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn page(mut self, page: u32, ids: std::ops::RangeInclusive<i64>) -> Self {
            let records = ids
                .map(|id| Record::new(id, &format!("Category {}", id), id))
                .collect();
            self.pages.insert(page, Ok(records));
            self
        }

        pub(crate) fn failing(mut self, page: u32) -> Self {
            self.pages.insert(
                page,
                Err(FetchError::Status {
                    status: 500,
                    body: Some(json!({"error": "boom"})),
                }),
            );
            self
        }
    }

    #[async_trait]
    impl PageSource for CannedSource {
        async fn fetch_page(&self, query: &PageQuery) -> FetchResult<Vec<Record>> {
            self.requested.lock().unwrap().push(query.clone());
            match self.pages.get(&query.page_number) {
                Some(Ok(records)) => Ok(records.clone()),
                Some(Err(FetchError::Status { status, body })) => Err(FetchError::Status {
                    status: *status,
                    body: body.clone(),
                }),
                Some(Err(other)) => Err(FetchError::Config(other.to_string())),
                None => Ok(Vec::new()),
            }
        }

        fn endpoint(&self) -> &str {
            "canned://pages"
        }
    }

    #[tokio::test]
    async fn test_fetch_page_maps_outcomes() {
        let source = CannedSource::new().page(1, 1..=3).failing(2);
        let (mut state, _) =
            FeedState::mount(&StaticViewport::at_bottom(800), FeedConfig::default());

        let query = PageQuery {
            page_number: 1,
            page_size: 10,
            order_by: "Sequence".to_string(),
            direction: Default::default(),
        };
        match fetch_page(&source, query.clone()).await {
            FeedEvent::PageLoaded { page, records } => {
                assert_eq!(page, 1);
                assert_eq!(records.len(), 3);
            }
            other => panic!("unexpected event: {:?}", other),
        }

        let failed = fetch_page(&source, PageQuery { page_number: 2, ..query }).await;
        match &failed {
            FeedEvent::PageFailed { page, reason } => {
                assert_eq!(*page, 2);
                assert!(reason.contains("500"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(state.reduce(failed).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_records_surfaces_server_body() {
        let source = CannedSource::new().page(1, 1..=2).failing(2);
        let query = PageQuery {
            page_number: 2,
            page_size: 10,
            order_by: "Sequence".to_string(),
            direction: Default::default(),
        };

        let err = fetch_records(&source, &query).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500, .. }));
        assert_eq!(err.server_body(), Some(&json!({"error": "boom"})));

        let records = fetch_records(&source, &PageQuery { page_number: 1, ..query })
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(source.requested.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_load_until_exhausted() {
        let source = CannedSource::new()
            .page(1, 1..=10)
            .page(2, 6..=15)
            .page(3, 16..=18);
        let viewport = StaticViewport::at_bottom(800);
        let (mut state, first) = FeedState::mount(&viewport, FeedConfig::default());

        let summary = load_until_exhausted(&source, &mut state, first, &viewport, 100)
            .await
            .unwrap();

        assert_eq!(
            summary,
            LoadSummary {
                pages: 3,
                records: 18,
                exhausted: true
            }
        );
        let pages: Vec<u32> = source
            .requested
            .lock()
            .unwrap()
            .iter()
            .map(|q| q.page_number)
            .collect();
        assert_eq!(pages, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_load_respects_page_limit() {
        let source = CannedSource::new()
            .page(1, 1..=10)
            .page(2, 11..=20)
            .page(3, 21..=30);
        let viewport = StaticViewport::at_bottom(800);
        let (mut state, first) = FeedState::mount(&viewport, FeedConfig::default());

        let summary = load_until_exhausted(&source, &mut state, first, &viewport, 2)
            .await
            .unwrap();

        assert_eq!(summary.pages, 2);
        assert_eq!(summary.records, 20);
        assert!(!summary.exhausted);
    }

    #[tokio::test]
    async fn test_load_stops_on_failure() {
        let source = CannedSource::new().page(1, 1..=10).failing(2);
        let viewport = StaticViewport::at_bottom(800);
        let (mut state, first) = FeedState::mount(&viewport, FeedConfig::default());

        let err = load_until_exhausted(&source, &mut state, first, &viewport, 100)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Page 2 failed"));
        assert_eq!(state.len(), 10);
    }
}
