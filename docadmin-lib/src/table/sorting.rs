//! Sorting controller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use log::debug;
use serde::Deserialize;
use serde::Serialize;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl SortDirection {
    /// Wire keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// One active sort: a column id and its direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSort {
    /// Column id.
    #[serde(rename = "id")]
    pub column_id: String,
    /// Descending when `true`.
    #[serde(rename = "desc")]
    pub descending: bool,
}

impl ColumnSort {
    /// Ascending sort on a column.
    pub fn asc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            descending: false,
        }
    }

    /// Descending sort on a column.
    pub fn desc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            descending: true,
        }
    }

    /// Direction of this entry.
    pub fn direction(&self) -> SortDirection {
        if self.descending {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

#[derive(Debug, Default)]
struct SortingInner {
    sorting: Vec<ColumnSort>,
}

/// Ordered list of active sorts; position is priority.
///
/// Like the other controllers this is a shared handle with a revision
/// counter. The table never reorders rows itself, it only reads this state
/// to draw indicators and hands it to the query collaborator.
#[derive(Debug, Clone, Default)]
pub struct SortingController {
    inner: Arc<RwLock<SortingInner>>,
    revision: Arc<AtomicU64>,
}

impl SortingController {
    /// Create a controller with no active sorts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller seeded with initial sorts.
    pub fn with_default(sorting: Vec<ColumnSort>) -> Self {
        let mut seen = Vec::new();
        let sorting = sorting
            .into_iter()
            .filter(|s| {
                let fresh = !seen.contains(&s.column_id);
                seen.push(s.column_id.clone());
                fresh
            })
            .collect();

        Self {
            inner: Arc::new(RwLock::new(SortingInner { sorting })),
            revision: Arc::new(AtomicU64::new(0)),
        }
    }

    fn bump(&self) {
        self.revision.fetch_add(1, Ordering::SeqCst);
    }

    /// Advance a column through none, ascending, descending and back to none.
    ///
    /// Without `multi` every other sort is dropped first. The toggled column
    /// lands at the end of the list unless it returns to none, in which case
    /// it is removed. Returns the column's new direction.
    pub fn toggle_sort(&self, column_id: &str, multi: bool) -> Option<SortDirection> {
        let Ok(mut guard) = self.inner.write() else {
            return None;
        };

        let current = guard
            .sorting
            .iter()
            .find(|s| s.column_id == column_id)
            .map(ColumnSort::direction);

        if !multi {
            guard.sorting.retain(|s| s.column_id == column_id);
        }
        guard.sorting.retain(|s| s.column_id != column_id);

        let next = match current {
            None => Some(SortDirection::Asc),
            Some(SortDirection::Asc) => Some(SortDirection::Desc),
            Some(SortDirection::Desc) => None,
        };

        match next {
            Some(SortDirection::Asc) => guard.sorting.push(ColumnSort::asc(column_id)),
            Some(SortDirection::Desc) => guard.sorting.push(ColumnSort::desc(column_id)),
            None => {}
        }

        debug!("Sort toggled: {column_id} -> {next:?} (multi: {multi})");
        self.bump();
        next
    }

    /// Remove the sort for a column.
    pub fn clear_sort(&self, column_id: &str) {
        if let Ok(mut guard) = self.inner.write() {
            let before = guard.sorting.len();
            guard.sorting.retain(|s| s.column_id != column_id);
            if guard.sorting.len() != before {
                self.bump();
            }
        }
    }

    /// Remove every sort.
    pub fn clear_all_sorts(&self) {
        if let Ok(mut guard) = self.inner.write()
            && !guard.sorting.is_empty()
        {
            guard.sorting.clear();
            self.bump();
        }
    }

    /// Snapshot of the active sorts, primary first.
    pub fn sorting(&self) -> Vec<ColumnSort> {
        self.inner
            .read()
            .map(|g| g.sorting.clone())
            .unwrap_or_default()
    }

    /// Direction for a column, if sorted.
    pub fn direction(&self, column_id: &str) -> Option<SortDirection> {
        self.inner.read().ok().and_then(|g| {
            g.sorting
                .iter()
                .find(|s| s.column_id == column_id)
                .map(ColumnSort::direction)
        })
    }

    /// Zero-based priority for a column, if sorted.
    pub fn priority(&self, column_id: &str) -> Option<usize> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.sorting.iter().position(|s| s.column_id == column_id))
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
    fn test_cycle() {
        let sorting = SortingController::new();
        assert_eq!(sorting.toggle_sort("name", false), Some(SortDirection::Asc));
        assert_eq!(sorting.toggle_sort("name", false), Some(SortDirection::Desc));
        assert_eq!(sorting.toggle_sort("name", false), None);
        assert!(sorting.sorting().is_empty());
    }

    #[test]
    fn test_single_mode_clears_others() {
        let sorting = SortingController::new();
        sorting.toggle_sort("a", false);
        sorting.toggle_sort("b", false);
        assert_eq!(sorting.sorting(), vec![ColumnSort::asc("b")]);
    }

    #[test]
    fn test_multi_accumulates() {
        let sorting = SortingController::new();
        sorting.toggle_sort("a", true);
        sorting.toggle_sort("b", true);
        assert_eq!(sorting.priority("a"), Some(0));
        assert_eq!(sorting.priority("b"), Some(1));
    }

    #[test]
    fn test_with_default_dedupes() {
        let sorting =
            SortingController::with_default(vec![ColumnSort::desc("id"), ColumnSort::asc("id")]);
        assert_eq!(sorting.sorting(), vec![ColumnSort::desc("id")]);
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_string(&ColumnSort::desc("name")).unwrap();
        assert_eq!(json, r#"{"id":"name","desc":true}"#);
    }
}
