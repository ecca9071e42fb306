//! Pagination utilities for PagerDuty list endpoints.
//!
//! PagerDuty uses classic offset/limit paging: every list response carries
//! `offset`, `limit`, `more` and (optionally) `total` next to the items.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::{PagerDutyError, Result};

/// Maximum pages to fetch in one listing (safety limit).
pub const MAX_PAGES: u32 = 1000;

/// Paging metadata shared by every list response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Offset of the first item on this page.
    #[serde(default)]
    pub offset: u32,
    /// Page size the server applied.
    #[serde(default)]
    pub limit: u32,
    /// Whether further pages exist.
    #[serde(default)]
    pub more: bool,
    /// Total number of items, when the server was asked to compute it.
    #[serde(default)]
    pub total: Option<u64>,
}

/// A page of results from the PagerDuty API.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page, in server order.
    pub items: Vec<T>,
    /// Offset of the first item on this page.
    pub offset: u32,
    /// Page size the server applied.
    pub limit: u32,
    /// Whether there are more pages.
    pub more: bool,
    /// Total number of items across all pages (if known).
    pub total: Option<u64>,
}

impl<T> Page<T> {
    /// Create a page from items and the server's paging metadata.
    #[must_use]
    pub fn new(items: Vec<T>, meta: PageMeta) -> Self {
        Self {
            items,
            offset: meta.offset,
            limit: meta.limit,
            more: meta.more,
            total: meta.total,
        }
    }

    /// The paging metadata of this page.
    #[must_use]
    pub fn meta(&self) -> PageMeta {
        PageMeta {
            offset: self.offset,
            limit: self.limit,
            more: self.more,
            total: self.total,
        }
    }

    /// Offset of the page that follows this one, if the server reported more.
    ///
    /// Follows the server contract `next = offset + limit`. A zero limit
    /// falls back to the number of items received.
    #[must_use]
    pub fn next_offset(&self) -> Option<u32> {
        if !self.more {
            return None;
        }
        let step = if self.limit > 0 {
            self.limit
        } else {
            u32::try_from(self.items.len()).unwrap_or(u32::MAX)
        };
        if step == 0 {
            return None;
        }
        self.offset.checked_add(step)
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            offset: self.offset,
            limit: self.limit,
            more: self.more,
            total: self.total,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Query parameters for paginated requests.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Offset of the first item to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Number of items per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl PaginationParams {
    /// Pagination params for a specific window.
    #[must_use]
    pub fn window(offset: u32, limit: u32) -> Self {
        Self {
            offset: Some(offset),
            limit: Some(limit),
        }
    }
}

/// Fetch every page of a listing, in order.
///
/// `fetch` is called with offset 0 first, then with the offset that follows
/// each returned page, until a page reports `more == false`. Items are
/// appended in the order pages arrive. The first failing page aborts the
/// whole listing and the items gathered so far are dropped.
///
/// `cancel` is checked before every request.
///
/// # Errors
///
/// Returns the first page error, or [`PagerDutyError::Cancelled`] if the
/// token fires between pages. A listing the server still reports as
/// incomplete is never returned: if a page says `more` without moving the
/// offset forward, or [`MAX_PAGES`] pages have been fetched, the call fails
/// with [`PagerDutyError::Pagination`].
pub async fn collect_pages<T, F, Fut>(
    cancel: Option<&CancellationToken>,
    mut fetch: F,
) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut all_items = Vec::new();
    let mut offset = 0;
    let mut pages = 0;

    loop {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(PagerDutyError::Cancelled);
        }

        let page = fetch(offset).await?;
        pages += 1;
        tracing::debug!(
            offset = page.offset,
            limit = page.limit,
            more = page.more,
            received = page.items.len(),
            "fetched page"
        );

        let next = page.next_offset();
        let more = page.more;
        all_items.extend(page.items);

        if !more {
            break;
        }

        match next {
            Some(next) if next > offset => offset = next,
            _ => {
                tracing::warn!(offset, "server reported more pages without advancing");
                return Err(PagerDutyError::Pagination { offset });
            }
        }

        if pages >= MAX_PAGES {
            tracing::warn!(offset, "Reached pagination limit of {} pages", MAX_PAGES);
            return Err(PagerDutyError::Pagination { offset });
        }
    }

    Ok(all_items)
}
