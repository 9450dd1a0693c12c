//! Filtering controller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use log::debug;

use super::filter::{ColumnFilter, FilterValue};

/// Internal state for the filtering controller.
#[derive(Debug, Default)]
struct FilteringInner {
    /// Active filters, at most one per column.
    filters: Vec<ColumnFilter>,
}

/// Ordered set of active column filters.
///
/// The controller is a cheap handle: clones share the same state, so the page
/// that owns it and the table that reads it always agree. Every effective
/// change bumps [`revision`](Self::revision); a call that changes nothing
/// leaves it untouched, which is what callers key refetches on.
#[derive(Debug, Clone, Default)]
pub struct FilteringController {
    inner: Arc<RwLock<FilteringInner>>,
    revision: Arc<AtomicU64>,
}

impl FilteringController {
    /// Create a controller with no active filters.
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&self) {
        self.revision.fetch_add(1, Ordering::SeqCst);
    }

    /// Set the filter for a column.
    ///
    /// `None` or a blank value clears the column. An equal value already in
    /// place is a no-op. Otherwise the previous entry is dropped and the new
    /// one appended. Returns `true` if the state changed.
    pub fn set_filter(&self, column_id: &str, value: Option<FilterValue>) -> bool {
        let Some(value) = value.filter(|v| !v.is_blank()) else {
            return self.clear_filter(column_id);
        };

        let Ok(mut guard) = self.inner.write() else {
            return false;
        };

        if guard
            .filters
            .iter()
            .any(|f| f.column_id == column_id && f.value == value)
        {
            return false;
        }

        guard.filters.retain(|f| f.column_id != column_id);
        debug!("Filter set: {column_id} = {value:?}");
        guard.filters.push(ColumnFilter::new(column_id, value));
        self.bump();
        true
    }

    /// Remove the filter for a column. Returns `true` if one was removed.
    pub fn clear_filter(&self, column_id: &str) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };

        let before = guard.filters.len();
        guard.filters.retain(|f| f.column_id != column_id);
        if guard.filters.len() == before {
            return false;
        }

        debug!("Filter cleared: {column_id}");
        self.bump();
        true
    }

    /// Remove every filter.
    pub fn clear_all_filters(&self) {
        if let Ok(mut guard) = self.inner.write()
            && !guard.filters.is_empty()
        {
            guard.filters.clear();
            debug!("All filters cleared");
            self.bump();
        }
    }

    /// Look up the active value for a column.
    pub fn get_filter(&self, column_id: &str) -> Option<FilterValue> {
        self.inner.read().ok().and_then(|g| {
            g.filters
                .iter()
                .find(|f| f.column_id == column_id)
                .map(|f| f.value.clone())
        })
    }

    /// Snapshot of the active filters, in insertion order.
    pub fn filters(&self) -> Vec<ColumnFilter> {
        self.inner
            .read()
            .map(|g| g.filters.clone())
            .unwrap_or_default()
    }

    /// Returns `true` if at least one filter is active.
    pub fn has_active(&self) -> bool {
        self.inner.read().map(|g| !g.filters.is_empty()).unwrap_or(false)
    }

    /// Change counter.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }
}
