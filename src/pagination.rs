//! Backward walk over a channel's history, one page at a time.

use crate::discord::HistorySource;
use crate::error::{FetchError, PaginateError};
use crate::model::HistoryMessage;
use std::future::Future;
use std::ops::AddAssign;
use tracing::{debug, warn};

/// Discord caps history requests at 100 messages.
pub const PAGE_SIZE: u8 = 100;

/// Lazy sequence of history pages, newest first.
///
/// The cursor is the ID of the oldest message of the previous page. A page shorter
/// than the page size is the last one; a full page is always followed by one more fetch.
pub struct HistoryPages<'a> {
    source: &'a dyn HistorySource,
    channel_id: String,
    before: Option<String>,
    page_size: u8,
    max_pages: Option<usize>,
    fetched: usize,
    exhausted: bool,
    truncated: bool,
}

impl<'a> HistoryPages<'a> {
    pub fn new(source: &'a dyn HistorySource, channel_id: impl Into<String>) -> Self {
        Self {
            source,
            channel_id: channel_id.into(),
            before: None,
            page_size: PAGE_SIZE,
            max_pages: None,
            fetched: 0,
            exhausted: false,
            truncated: false,
        }
    }

    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub async fn next_page(&mut self) -> Result<Option<Vec<HistoryMessage>>, FetchError> {
        if self.exhausted {
            return Ok(None);
        }
        if let Some(max) = self.max_pages {
            if self.fetched >= max {
                warn!(
                    "Stopping pagination of channel {} after {} pages (limit reached)",
                    self.channel_id, max
                );
                self.exhausted = true;
                self.truncated = true;
                return Ok(None);
            }
        }

        let page = self
            .source
            .fetch_page(&self.channel_id, self.page_size, self.before.as_deref())
            .await?;
        self.fetched += 1;

        if page.len() < self.page_size as usize {
            self.exhausted = true;
        }
        match page.last() {
            Some(oldest) => {
                debug!("Next page of channel {} starts before {}", self.channel_id, oldest.id);
                self.before = Some(oldest.id.clone());
                Ok(Some(page))
            }
            None => Ok(None),
        }
    }

    pub fn pages_fetched(&self) -> usize {
        self.fetched
    }

    /// True when the page limit stopped the walk after a full page. Older messages may
    /// or may not exist; no extra fetch is made to find out.
    pub fn truncated(&self) -> bool {
        self.truncated
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PaginationSummary<S> {
    pub pages: usize,
    pub messages: usize,
    pub truncated: bool,
    /// Sum of the handler's per-page results.
    pub handled: S,
}

/// Feeds every non-empty page to `handler` until the history is exhausted.
pub async fn paginate<S, E, F, Fut>(
    mut pages: HistoryPages<'_>,
    mut handler: F,
) -> Result<PaginationSummary<S>, PaginateError<E>>
where
    S: Default + AddAssign,
    E: std::error::Error + 'static,
    F: FnMut(Vec<HistoryMessage>) -> Fut,
    Fut: Future<Output = Result<S, E>>,
{
    let mut summary = PaginationSummary::<S>::default();

    while let Some(page) = pages.next_page().await.map_err(PaginateError::Fetch)? {
        let count = page.len();
        summary.handled += handler(page).await.map_err(PaginateError::Handler)?;
        summary.pages += 1;
        summary.messages += count;
        debug!("Finished processing page of {} messages", count);
    }

    summary.truncated = pages.truncated();
    debug!(
        "Pagination finished after {} fetches ({} messages)",
        pages.pages_fetched(),
        summary.messages
    );
    Ok(summary)
}
