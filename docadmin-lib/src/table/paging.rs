//! Paging controller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use log::debug;
use serde::Deserialize;
use serde::Serialize;

use crate::config::DEFAULT_PAGE_SIZE;

/// Paging state: page size, row offset and the last reported page count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingState {
    /// Rows per page, always at least 1.
    pub limit: usize,
    /// Index of the first row on the current page.
    pub offset: usize,
    /// Page count reported by the last fetch.
    pub total_pages: usize,
}

impl Default for PagingState {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
            total_pages: 0,
        }
    }
}

impl PagingState {
    /// One-based page number derived from the offset.
    pub fn current_page(&self) -> usize {
        self.offset / self.limit.max(1) + 1
    }
}

/// Offset-based pagination.
///
/// `next_page` is unbounded; disabling it past the last page is the view's
/// job (see [`can_next`](Self::can_next)).
#[derive(Debug, Clone, Default)]
pub struct PagingController {
    inner: Arc<RwLock<PagingState>>,
    revision: Arc<AtomicU64>,
}

impl PagingController {
    /// Controller at offset 0 with the default page size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller with a custom page size. Zero is raised to one.
    pub fn with_limit(limit: usize) -> Self {
        Self::from_state(PagingState {
            limit,
            ..Default::default()
        })
    }

    /// Controller resuming from a saved state.
    pub fn from_state(mut state: PagingState) -> Self {
        state.limit = state.limit.max(1);
        Self {
            inner: Arc::new(RwLock::new(state)),
            revision: Arc::new(AtomicU64::new(0)),
        }
    }

    fn bump(&self) {
        self.revision.fetch_add(1, Ordering::SeqCst);
    }

    /// Current state snapshot.
    pub fn state(&self) -> PagingState {
        self.inner.read().map(|g| *g).unwrap_or_default()
    }

    /// Rows per page.
    pub fn limit(&self) -> usize {
        self.state().limit
    }

    /// Current row offset.
    pub fn offset(&self) -> usize {
        self.state().offset
    }

    /// Last reported page count.
    pub fn total_pages(&self) -> usize {
        self.state().total_pages
    }

    /// Advance one page.
    pub fn next_page(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.offset = guard.offset.saturating_add(guard.limit);
            debug!("Next page: offset {}", guard.offset);
            self.bump();
        }
    }

    /// Go back one page, stopping at zero.
    pub fn prev_page(&self) {
        if let Ok(mut guard) = self.inner.write() {
            let offset = guard.offset.saturating_sub(guard.limit);
            if offset != guard.offset {
                guard.offset = offset;
                debug!("Previous page: offset {offset}");
                self.bump();
            }
        }
    }

    /// Record the page count reported by the query collaborator.
    pub fn set_total_pages(&self, total_pages: usize) {
        if let Ok(mut guard) = self.inner.write()
            && guard.total_pages != total_pages
        {
            guard.total_pages = total_pages;
            self.bump();
        }
    }

    /// Return to the first page.
    pub fn reset(&self) {
        if let Ok(mut guard) = self.inner.write()
            && guard.offset != 0
        {
            guard.offset = 0;
            self.bump();
        }
    }

    /// One-based current page.
    pub fn current_page(&self) -> usize {
        self.state().current_page()
    }

    /// Whether "previous" should be enabled.
    pub fn can_prev(&self) -> bool {
        self.offset() > 0
    }

    /// Whether "next" should be enabled.
    pub fn can_next(&self) -> bool {
        let state = self.state();
        state.current_page() < state.total_pages
    }

    /// Pagination label, e.g. `"2 / 5"`. An unknown total shows as 1.
    pub fn page_label(&self) -> String {
        let state = self.state();
        format!("{} / {}", state.current_page(), state.total_pages.max(1))
    }

    /// Change counter.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let paging = PagingController::new();
        assert_eq!(paging.state(), PagingState::default());
        assert_eq!(paging.limit(), 10);
        assert_eq!(paging.current_page(), 1);
        assert_eq!(paging.page_label(), "1 / 1");
    }

    #[test]
    fn test_next_prev() {
        let paging = PagingController::with_limit(25);
        paging.next_page();
        paging.next_page();
        assert_eq!(paging.offset(), 50);
        assert_eq!(paging.current_page(), 3);
        paging.prev_page();
        assert_eq!(paging.offset(), 25);
    }

    #[test]
    fn test_prev_at_zero_is_noop() {
        let paging = PagingController::new();
        let rev = paging.revision();
        paging.prev_page();
        assert_eq!(paging.offset(), 0);
        assert_eq!(paging.revision(), rev);
    }

    #[test]
    fn test_prev_clamps_unaligned_offset() {
        let paging = PagingController::from_state(PagingState {
            limit: 10,
            offset: 5,
            total_pages: 3,
        });
        paging.prev_page();
        assert_eq!(paging.offset(), 0);
    }

    #[test]
    fn test_enablement() {
        let paging = PagingController::new();
        paging.set_total_pages(2);
        assert!(!paging.can_prev());
        assert!(paging.can_next());
        paging.next_page();
        assert!(paging.can_prev());
        assert!(!paging.can_next());
        assert_eq!(paging.page_label(), "2 / 2");
    }

    #[test]
    fn test_zero_limit_raised() {
        assert_eq!(PagingController::with_limit(0).limit(), 1);
    }
}
