//! Offset/limit paginator.
//!
//! Walks a listing endpoint page by page until one of:
//! - a page comes back shorter than requested (end of data)
//! - the remote `total` says nothing remains
//! - the caller's cap is reached
//!
//! When the cap falls inside a page, the whole page is kept: the result holds
//! at least `max_items` and fewer than `max_items + page_size` items. Pages are
//! fetched sequentially and no snapshot is taken, so a collection that changes
//! mid-walk can yield duplicates or gaps.

use std::future::Future;

use rmcp::model::CallToolResult;
use serde::Serialize;
use tracing::{debug, info};

use super::error::ToolError;
use super::result::error_result_with;
use crate::spotify::{Page, PageCursor, SpotifyError, SpotifyResult};

/// Page size ceiling for saved tracks and playlist listings.
pub const LIBRARY_PAGE_MAX: u32 = 50;

/// Page size ceiling for playlist items.
pub const PLAYLIST_ITEMS_PAGE_MAX: u32 = 100;

/// Items gathered by a pagination walk.
#[derive(Debug, Clone, Serialize)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    /// The cap stopped the walk before the end of the collection.
    pub truncated: bool,
    pub has_more: bool,
    pub next_cursor: Option<PageCursor>,
    pub pages_fetched: usize,
    pub total: Option<u32>,
}

impl<T> PaginationResult<T> {
    /// Transform every item, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginationResult<U> {
        PaginationResult {
            items: self.items.into_iter().map(f).collect(),
            truncated: self.truncated,
            has_more: self.has_more,
            next_cursor: self.next_cursor,
            pages_fetched: self.pages_fetched,
            total: self.total,
        }
    }
}

/// A page fetch failed; earlier pages are discarded.
#[derive(Debug, Clone, Serialize)]
pub struct PaginationFailure {
    /// Items received before the failing page.
    pub retrieved: usize,
    pub pages_fetched: usize,
    /// The page that failed; resuming from here repeats nothing.
    pub cursor: PageCursor,
    #[serde(skip)]
    pub error: SpotifyError,
}

impl PaginationFailure {
    /// Error result whose `outcome` says how far the walk got.
    pub fn to_error_result(&self) -> CallToolResult {
        error_result_with(&ToolError::Remote(self.error.clone()), self)
    }
}

/// Clamp a requested page size to `1..=max`, defaulting to `max`.
pub fn page_limit(requested: Option<u32>, max: u32) -> u32 {
    requested.unwrap_or(max).clamp(1, max)
}

/// Walk a paginated endpoint starting at `start`.
///
/// `max_items` counts items gathered by this walk; a cap of 0 is treated as 1.
pub async fn paginate<T, F, Fut>(
    operation: &str,
    start: PageCursor,
    max_items: Option<usize>,
    mut fetch: F,
) -> Result<PaginationResult<T>, PaginationFailure>
where
    F: FnMut(PageCursor) -> Fut,
    Fut: Future<Output = SpotifyResult<Page<T>>>,
{
    let cap = max_items.map(|c| c.max(1));
    let mut cursor = start;
    let mut items: Vec<T> = Vec::new();
    let mut pages_fetched = 0;
    let mut total: Option<u32> = None;

    loop {
        let page = match fetch(cursor).await {
            Ok(page) => page,
            Err(error) => {
                return Err(PaginationFailure {
                    retrieved: items.len(),
                    pages_fetched,
                    cursor,
                    error,
                });
            }
        };
        pages_fetched += 1;

        let received = page.items.len() as u32;
        if page.total.is_some() {
            total = page.total;
        }
        items.extend(page.items);

        let next = cursor.advance(received);
        let end_of_data = received < cursor.limit || total.is_some_and(|t| next.offset >= t);

        debug!(
            operation,
            total = ?total,
            limit = cursor.limit,
            offset = cursor.offset,
            received,
            has_more = !end_of_data,
            "Fetched page"
        );

        if end_of_data {
            return Ok(PaginationResult {
                items,
                truncated: false,
                has_more: false,
                next_cursor: None,
                pages_fetched,
                total,
            });
        }

        if let Some(cap) = cap {
            if items.len() >= cap {
                info!(
                    "{}: cap of {} reached after {} item(s) in {} page(s)",
                    operation,
                    cap,
                    items.len(),
                    pages_fetched
                );
                return Ok(PaginationResult {
                    items,
                    truncated: true,
                    has_more: true,
                    next_cursor: Some(next),
                    pages_fetched,
                    total,
                });
            }
        }

        cursor = next;
    }
}
