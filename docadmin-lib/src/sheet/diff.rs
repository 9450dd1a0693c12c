//! Change-set computation.

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use super::row::{DraftRow, SheetRow, normalized};

/// Rows to create, rows to update and ids to delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchChanges<T> {
    /// Rows to create.
    pub new: Vec<T>,
    /// Persisted rows whose content changed.
    pub updated: Vec<T>,
    /// Persisted rows to delete.
    pub deleted_ids: Vec<i64>,
}

impl<T> BatchChanges<T> {
    /// Whether the change set is empty.
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.updated.is_empty() && self.deleted_ids.is_empty()
    }

    /// Total number of changes.
    pub fn len(&self) -> usize {
        self.new.len() + self.updated.len() + self.deleted_ids.len()
    }
}

impl<T> Default for BatchChanges<T> {
    fn default() -> Self {
        Self {
            new: Vec::new(),
            updated: Vec::new(),
            deleted_ids: Vec::new(),
        }
    }
}

/// Partition the working copy against the snapshot taken on entering edit
/// mode.
///
/// - new: new, not deleted, not empty
/// - updated: persisted, not deleted, and different from the snapshot row
///   with the same id once ids are stripped
/// - deleted: deleted rows that have an id; deleted drafts are dropped
pub fn diff<T: SheetRow>(original: &[T], working: &[DraftRow<T>]) -> BatchChanges<T> {
    let snapshot: HashMap<i64, _> = original
        .iter()
        .filter_map(|row| row.id().map(|id| (id, normalized(row))))
        .collect();

    let mut changes = BatchChanges::default();
    for draft in working {
        match (draft.is_new, draft.is_deleted, draft.row.id()) {
            (_, true, Some(id)) => changes.deleted_ids.push(id),
            (_, true, None) => {}
            (true, false, _) => {
                if !draft.is_empty() {
                    changes.new.push(draft.row.clone());
                }
            }
            (false, false, Some(id)) => {
                let changed = snapshot
                    .get(&id)
                    .is_none_or(|before| *before != normalized(&draft.row));
                if changed {
                    changes.updated.push(draft.row.clone());
                }
            }
            (false, false, None) => {}
        }
    }
    changes
}
