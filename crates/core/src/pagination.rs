//! Pagination engine
//!
//! Slices an ordered sequence into a bounded page. The current page is always
//! clamped to `1..=total_pages`, and `total_pages` is at least 1 even for an
//! empty sequence.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Allowed items-per-page values
pub const PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];

/// Items per page, restricted to [`PAGE_SIZES`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageSize(usize);

impl PageSize {
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize(PAGE_SIZES[0])
    }
}

impl TryFrom<usize> for PageSize {
    type Error = EngineError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        if PAGE_SIZES.contains(&size) {
            Ok(PageSize(size))
        } else {
            Err(EngineError::InvalidPageSize(size))
        }
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

/// `ceil(total_items / page_size)`, never less than 1
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1)).max(1)
}

/// Calculate `(start, end)` slice bounds for `page` (1-indexed).
///
/// The window is empty when `page` lies past the end; callers clamp first.
pub fn calculate_pagination(total_items: usize, page: usize, page_size: usize) -> (usize, usize) {
    let start = page.saturating_sub(1).saturating_mul(page_size).min(total_items);
    let end = start.saturating_add(page_size).min(total_items);
    (start, end)
}

/// Current page and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredPagination")]
pub struct Pagination {
    pub current_page: usize,
    pub items_per_page: PageSize,
}

/// Wire form of [`Pagination`]; a stored page of 0 loads as page 1.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPagination {
    current_page: usize,
    #[serde(default)]
    items_per_page: PageSize,
}

impl From<StoredPagination> for Pagination {
    fn from(stored: StoredPagination) -> Self {
        Self {
            current_page: stored.current_page.max(1),
            items_per_page: stored.items_per_page,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            items_per_page: PageSize::default(),
        }
    }
}

impl Pagination {
    pub fn total_pages(&self, total_items: usize) -> usize {
        total_pages(total_items, self.items_per_page.get())
    }

    pub fn first(&mut self) {
        self.current_page = 1;
    }

    pub fn previous(&mut self) {
        self.current_page = self.current_page.saturating_sub(1).max(1);
    }

    pub fn next(&mut self, total_items: usize) {
        self.current_page = self
            .current_page
            .saturating_add(1)
            .min(self.total_pages(total_items));
    }

    pub fn last(&mut self, total_items: usize) {
        self.current_page = self.total_pages(total_items);
    }

    /// Re-anchors to page 1 so the old page number can't point past the end.
    pub fn set_page_size(&mut self, size: PageSize) {
        self.items_per_page = size;
        self.current_page = 1;
    }

    /// Jump to `page`, clamped into range.
    pub fn go_to(&mut self, page: usize, total_items: usize) {
        self.current_page = page;
        self.clamp(total_items);
    }

    pub fn clamp(&mut self, total_items: usize) {
        self.current_page = self.current_page.clamp(1, self.total_pages(total_items));
    }

    /// Copy of `self` clamped to `total_items`
    pub fn clamped(mut self, total_items: usize) -> Self {
        self.clamp(total_items);
        self
    }

    pub fn can_go_back(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_forward(&self, total_items: usize) -> bool {
        self.current_page < self.total_pages(total_items)
    }

    pub fn window<'s, T>(&self, items: &'s [T]) -> &'s [T] {
        let (start, end) =
            calculate_pagination(items.len(), self.current_page, self.items_per_page.get());
        &items[start..end]
    }

    pub fn range(&self, total_items: usize) -> PageRange {
        let size = self.items_per_page.get();
        PageRange {
            first: self
                .current_page
                .saturating_sub(1)
                .saturating_mul(size)
                .saturating_add(1)
                .min(total_items),
            last: self.current_page.saturating_mul(size).min(total_items),
            total: total_items,
        }
    }
}

/// Displayed `first..=last of total` range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub first: usize,
    pub last: usize,
    pub total: usize,
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {} to {} of {} results",
            self.first, self.last, self.total
        )
    }
}
