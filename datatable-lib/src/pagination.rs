//! Pagination state.

use crate::fetcher::TableResponse;

/// Pagination state of a table.
///
/// Invariant: `page >= 1`, `limit >= 1` and `page <= max(pages, 1)` once a
/// response has been ingested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    /// Current page (1-based).
    pub page: u32,
    /// Total number of pages.
    pub pages: u32,
    /// Total number of records.
    pub total: u64,
    /// Items per page.
    pub limit: u32,
    /// Page numbers to render in the pager.
    pub range: Vec<u32>,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

impl PaginationState {
    /// Initial state before any response has arrived.
    ///
    /// `page` is only the page requested on mount and may exceed `pages`
    /// until the first response replaces it.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            pages: 0,
            total: 0,
            limit: limit.max(1),
            range: Vec::new(),
        }
    }

    /// Clamps a requested page to `[1, max(pages, 1)]`.
    pub fn clamp_page(&self, target: u32) -> u32 {
        target.clamp(1, self.pages.max(1))
    }

    /// Returns the state with `target` as the current page, clamped.
    ///
    /// Does not recompute `range`; that happens when the page's response arrives.
    pub fn request_page(&self, target: u32) -> Self {
        Self {
            page: self.clamp_page(target),
            ..self.clone()
        }
    }

    /// Ingests a fetch response and recomputes the pager range.
    ///
    /// Total, page, pages and limit are taken verbatim from the server, then
    /// page and limit are brought back inside their invariants.
    pub fn recompute<T>(&self, response: &TableResponse<T>, window: u32) -> Self {
        let pages = response.pages;
        let page = response.page.clamp(1, pages.max(1));
        Self {
            page,
            pages,
            total: response.total,
            limit: response.limit.max(1),
            range: page_range(page, pages, window),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    /// 1-based index of the first item on the current page, 0 when empty.
    pub fn first_item(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        (u64::from(self.page) - 1) * u64::from(self.limit) + 1
    }

    /// 1-based index of the last item on the current page, 0 when empty.
    pub fn last_item(&self) -> u64 {
        (u64::from(self.page) * u64::from(self.limit)).min(self.total)
    }
}

/// A window of `window` page numbers centered on `page`, clipped to `[1, pages]`.
///
/// Near either end the window shifts so it stays full width when enough
/// pages exist.
pub fn page_range(page: u32, pages: u32, window: u32) -> Vec<u32> {
    if pages == 0 || window == 0 {
        return Vec::new();
    }
    let window = window.min(pages);
    let page = page.clamp(1, pages);
    let start = page.saturating_sub(window / 2).max(1);
    let end = start.saturating_add(window - 1).min(pages);
    // `window <= pages`, so this cannot underflow.
    let start = end - (window - 1);
    (start..=end).collect()
}
