//! Cursor pagination
//!
//! List endpoints return one batch per request together with an optional
//! `nextBatchPrevId`. Passing that value back as `prevId` fetches the next
//! batch; a response without it is the last one.
//!
//! [`Paginator`] turns a single-page fetch function into a lazy sequence of
//! pages. Nothing is requested until the first pull, each pull issues exactly
//! one request, and the sequence cannot be restarted once it has ended.

use crate::error::{RestError, RestResult};
use futures::future::BoxFuture;
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use std::collections::HashSet;
use std::future::Future;
use std::marker::PhantomData;
use tracing::{debug, warn};

/// Response field carrying the continuation cursor
pub const CURSOR_RESPONSE_FIELD: &str = "nextBatchPrevId";

/// Query parameter the cursor is sent back in
pub const CURSOR_REQUEST_PARAM: &str = "prevId";

/// One batch of a paginated list endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<T> {
    /// Batch payload
    pub data: T,
    /// Continuation cursor; absent on the final page
    #[serde(rename = "nextBatchPrevId", default)]
    pub next_batch_prev_id: Option<String>,
}

impl<T> Page<T> {
    /// Create a page that is followed by more data
    pub fn new(data: T, next_batch_prev_id: impl Into<String>) -> Self {
        Self {
            data,
            next_batch_prev_id: Some(next_batch_prev_id.into()),
        }
    }

    /// Create the final page of a sequence
    pub fn last(data: T) -> Self {
        Self {
            data,
            next_batch_prev_id: None,
        }
    }

    /// Returns true if the server reported more data
    pub fn has_more(&self) -> bool {
        self.next_batch_prev_id.is_some()
    }
}

/// Boxed page-fetch function used by the REST endpoints
pub type PageFetcher<'a, T> =
    Box<dyn FnMut(Option<String>) -> BoxFuture<'a, RestResult<Page<T>>> + Send + 'a>;

/// Paginated request as returned by list endpoints
pub type PagedRequest<'a, T> = Paginator<T, PageFetcher<'a, T>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ready,
    Exhausted,
    Failed,
}

/// Lazy sequence of pages following continuation cursors
///
/// # Example
///
/// ```
/// use bitgo_rest::pagination::{Page, Paginator};
/// use futures::future;
///
/// futures::executor::block_on(async {
/// let mut pages = Paginator::new(|cursor: Option<String>| {
///     future::ready(Ok::<_, bitgo_rest::RestError>(match cursor {
///         None => Page::new(vec![1, 2], "abc"),
///         Some(_) => Page::last(vec![3]),
///     }))
/// });
///
/// let first = pages.next_page().await.unwrap().unwrap();
/// assert_eq!(first.data, vec![1, 2]);
/// let second = pages.next_page().await.unwrap().unwrap();
/// assert_eq!(second.data, vec![3]);
/// assert!(pages.next_page().await.is_none());
/// });
/// ```
pub struct Paginator<T, F> {
    fetch: F,
    next_cursor: Option<String>,
    seen: HashSet<String>,
    pending_error: Option<RestError>,
    state: State,
    fetched: usize,
    _page: PhantomData<fn() -> T>,
}

impl<T, F, Fut> Paginator<T, F>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = RestResult<Page<T>>>,
{
    /// Create a paginator around a single-page fetch function
    ///
    /// The function receives `None` for the first page and the previous
    /// page's cursor afterwards.
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            next_cursor: None,
            seen: HashSet::new(),
            pending_error: None,
            state: State::Ready,
            fetched: 0,
            _page: PhantomData,
        }
    }

    /// Fetch the next page
    ///
    /// Returns `None` once the sequence has ended, either after a page
    /// without a cursor or after an error was returned.
    pub async fn next_page(&mut self) -> Option<RestResult<Page<T>>> {
        if let Some(err) = self.pending_error.take() {
            self.state = State::Failed;
            return Some(Err(err));
        }
        if self.state != State::Ready {
            return None;
        }

        let cursor = self.next_cursor.take();
        debug!(page = self.fetched + 1, cursor = ?cursor, "Fetching page");

        let result = (self.fetch)(cursor).await;
        self.fetched += 1;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                self.state = State::Failed;
                return Some(Err(e));
            }
        };

        match &page.next_batch_prev_id {
            None => {
                debug!(pages = self.fetched, "Pagination exhausted");
                self.state = State::Exhausted;
            }
            Some(cursor) if self.seen.insert(cursor.clone()) => {
                self.next_cursor = Some(cursor.clone());
            }
            Some(cursor) => {
                warn!(cursor = %cursor, "Server repeated a pagination cursor");
                self.pending_error = Some(RestError::RepeatedCursor {
                    cursor: cursor.clone(),
                });
            }
        }

        Some(Ok(page))
    }

    /// Number of fetches issued so far
    pub fn pages_fetched(&self) -> usize {
        self.fetched
    }

    /// Returns true once no further pages will be produced
    pub fn is_finished(&self) -> bool {
        self.state != State::Ready && self.pending_error.is_none()
    }

    /// Convert into a `Stream` of pages
    ///
    /// The stream is not `Unpin`; pin it (`Box::pin`, `futures::pin_mut!`)
    /// before calling `next()` on it.
    pub fn into_stream(self) -> impl Stream<Item = RestResult<Page<T>>> {
        stream::unfold(self, |mut pages| async move {
            let item = pages.next_page().await?;
            Some((item, pages))
        })
    }
}

impl<T, F, Fut> Paginator<Vec<T>, F>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = RestResult<Page<Vec<T>>>>,
{
    /// Flatten the pages into a stream of individual records
    pub fn into_items(self) -> impl Stream<Item = RestResult<T>> {
        self.into_stream().flat_map(|page| {
            let items: Vec<RestResult<T>> = match page {
                Ok(page) => page.data.into_iter().map(Ok).collect(),
                Err(e) => vec![Err(e)],
            };
            stream::iter(items)
        })
    }

    /// Drain every page into one vector, stopping at the first error
    pub async fn collect_all(mut self) -> RestResult<Vec<T>> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await {
            items.extend(page?.data);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    type Calls = Arc<Mutex<Vec<Option<String>>>>;

    fn scripted(
        script: Vec<RestResult<Page<Vec<u32>>>>,
    ) -> (
        impl FnMut(Option<String>) -> future::Ready<RestResult<Page<Vec<u32>>>>,
        Calls,
    ) {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let log = calls.clone();
        let mut script: VecDeque<_> = script.into();

        let fetch = move |cursor: Option<String>| {
            log.lock().unwrap().push(cursor);
            future::ready(script.pop_front().unwrap_or_else(|| {
                Err(RestError::Parse("fetch called after the last page".into()))
            }))
        };

        (fetch, calls)
    }

    #[tokio::test]
    async fn test_two_pages_follow_cursor() {
        let (fetch, calls) = scripted(vec![
            Ok(Page::new(vec![1, 2], "abc")),
            Ok(Page::last(vec![3])),
        ]);
        let mut pages = Paginator::new(fetch);

        let first = pages.next_page().await.unwrap().unwrap();
        assert_eq!(first.data, vec![1, 2]);
        let second = pages.next_page().await.unwrap().unwrap();
        assert_eq!(second.data, vec![3]);

        assert!(pages.next_page().await.is_none());
        assert!(pages.next_page().await.is_none());
        assert!(pages.is_finished());
        assert_eq!(pages.pages_fetched(), 2);
        assert_eq!(*calls.lock().unwrap(), vec![None, Some("abc".to_string())]);
    }

    #[tokio::test]
    async fn test_each_cursor_comes_from_previous_page() {
        let (fetch, calls) = scripted(vec![
            Ok(Page::new(vec![1], "t1")),
            Ok(Page::new(vec![2], "t2")),
            Ok(Page::new(vec![3], "t3")),
            Ok(Page::new(vec![4], "t4")),
            Ok(Page::last(vec![5])),
        ]);

        let pages: Vec<_> = Paginator::new(fetch).into_stream().collect().await;
        assert_eq!(pages.len(), 5);
        assert!(pages.iter().all(|p| p.is_ok()));

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 5);
        assert_eq!(calls[0], None);
        for (i, cursor) in calls.iter().enumerate().skip(1) {
            assert_eq!(cursor.as_deref(), Some(format!("t{}", i).as_str()));
        }
    }

    #[tokio::test]
    async fn test_single_page_without_cursor() {
        let (fetch, calls) = scripted(vec![Ok(Page::last(vec![]))]);
        let mut pages = Paginator::new(fetch);

        assert!(pages.next_page().await.unwrap().unwrap().data.is_empty());
        assert!(pages.next_page().await.is_none());
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_error_ends_sequence() {
        let (fetch, calls) = scripted(vec![
            Ok(Page::new(vec![1], "abc")),
            Err(RestError::from_response(500, "boom")),
            Ok(Page::last(vec![2])),
        ]);
        let mut pages = Paginator::new(fetch);

        assert!(pages.next_page().await.unwrap().is_ok());
        assert!(matches!(pages.next_page().await, Some(Err(RestError::Api { .. }))));
        assert!(pages.next_page().await.is_none());
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_repeated_cursor_is_protocol_error() {
        let (fetch, calls) = scripted(vec![
            Ok(Page::new(vec![1], "abc")),
            Ok(Page::new(vec![2], "abc")),
            Ok(Page::last(vec![3])),
        ]);
        let mut pages = Paginator::new(fetch);

        assert_eq!(pages.next_page().await.unwrap().unwrap().data, vec![1]);
        assert_eq!(pages.next_page().await.unwrap().unwrap().data, vec![2]);
        assert!(!pages.is_finished());

        match pages.next_page().await {
            Some(Err(RestError::RepeatedCursor { cursor })) => assert_eq!(cursor, "abc"),
            other => panic!("unexpected: {:?}", other.map(|r| r.map(|p| p.data))),
        }
        assert!(pages.next_page().await.is_none());
        assert!(pages.is_finished());
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_cycle_through_older_cursor_is_detected() {
        let (fetch, _calls) = scripted(vec![
            Ok(Page::new(vec![1], "a")),
            Ok(Page::new(vec![2], "b")),
            Ok(Page::new(vec![3], "a")),
        ]);

        let result = Paginator::new(fetch).collect_all().await;
        assert!(matches!(result, Err(RestError::RepeatedCursor { .. })));
    }

    #[tokio::test]
    async fn test_into_items_flattens() {
        let (fetch, _calls) = scripted(vec![
            Ok(Page::new(vec![1, 2], "abc")),
            Ok(Page::last(vec![3])),
        ]);

        let items: Vec<u32> = Paginator::new(fetch)
            .into_items()
            .map(|item| item.unwrap())
            .collect()
            .await;
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_nothing_fetched_before_first_pull() {
        let (fetch, calls) = scripted(vec![Ok(Page::last(vec![1]))]);
        let pages = Paginator::new(fetch);
        assert_eq!(pages.pages_fetched(), 0);
        assert!(calls.lock().unwrap().is_empty());
        drop(pages);
    }

    #[test]
    fn test_page_deserialize() {
        let page: Page<Vec<u32>> =
            serde_json::from_str(r#"{"data":[1,2],"nextBatchPrevId":"xyz"}"#).unwrap();
        assert!(page.has_more());
        assert_eq!(page.next_batch_prev_id.as_deref(), Some("xyz"));

        let last: Page<Vec<u32>> = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert!(!last.has_more());
    }
}
