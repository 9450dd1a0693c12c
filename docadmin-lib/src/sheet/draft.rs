//! View/edit state machine and the working copy.

use log::{debug, info};

use crate::model::Value;

use super::diff::{BatchChanges, diff};
use super::row::{DraftRow, SheetRow, normalized};

/// Sheet mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Read-only.
    #[default]
    View,
    /// Editable working copy.
    Edit,
}

/// Confirmed data plus, while editing, a working copy and its snapshot.
///
/// Every session transition bumps an epoch. Work started in one epoch (an
/// in-flight save) can check whether the session it belonged to still
/// exists.
#[derive(Debug, Clone)]
pub struct DraftSession<T> {
    mode: EditMode,
    data: Vec<T>,
    original: Vec<T>,
    working: Vec<DraftRow<T>>,
    epoch: u64,
}

impl<T: SheetRow> DraftSession<T> {
    /// Session in view mode over confirmed data.
    pub fn new(data: Vec<T>) -> Self {
        let working = data.iter().cloned().map(DraftRow::persisted).collect();
        Self {
            mode: EditMode::View,
            data,
            original: Vec::new(),
            working,
            epoch: 0,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Whether the session is in edit mode.
    pub fn is_editing(&self) -> bool {
        self.mode == EditMode::Edit
    }

    /// Session generation.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Confirmed data.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Snapshot taken when edit mode was entered.
    pub fn original(&self) -> &[T] {
        &self.original
    }

    /// Rows to display: the working copy while editing, confirmed data
    /// otherwise.
    pub fn rows(&self) -> &[DraftRow<T>] {
        &self.working
    }

    fn reset_working(&mut self) {
        self.working = self.data.iter().cloned().map(DraftRow::persisted).collect();
    }

    /// Replace the confirmed data. The working copy follows only in view
    /// mode; edits in progress are kept.
    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
        if !self.is_editing() {
            self.reset_working();
        }
    }

    /// Snapshot the data and start editing with one blank row appended.
    /// Returns `false` if already editing.
    pub fn enter_edit(&mut self) -> bool {
        if self.is_editing() {
            return false;
        }
        self.original = self.data.clone();
        self.reset_working();
        self.working.push(DraftRow::blank());
        self.mode = EditMode::Edit;
        self.epoch += 1;
        info!("Entered edit mode with {} rows", self.data.len());
        true
    }

    fn exit(&mut self) {
        self.mode = EditMode::View;
        self.original.clear();
        self.reset_working();
        self.epoch += 1;
    }

    /// Drop the working copy and return to view mode.
    pub fn cancel(&mut self) -> bool {
        if !self.is_editing() {
            return false;
        }
        info!("Edit cancelled");
        self.data = std::mem::take(&mut self.original);
        self.exit();
        true
    }

    /// Leave edit mode after a successful save. Fresh data arrives through
    /// [`set_data`](Self::set_data).
    pub fn finish(&mut self) -> bool {
        if !self.is_editing() {
            return false;
        }
        info!("Edit session saved");
        self.exit();
        true
    }

    /// Patch one field of one row. Deleted rows are read-only.
    pub fn change_row(&mut self, index: usize, field: &str, value: Value) -> bool {
        if !self.is_editing() {
            return false;
        }
        match self.working.get_mut(index) {
            Some(draft) if !draft.is_deleted => {
                draft.row.set_field(field, value);
                true
            }
            _ => false,
        }
    }

    /// Whether a row may be deleted: editing, not already deleted, and not
    /// the trailing row.
    pub fn can_delete(&self, index: usize) -> bool {
        self.is_editing()
            && index + 1 < self.working.len()
            && self.working.get(index).is_some_and(|d| !d.is_deleted)
    }

    /// Mark a row deleted. It stays in place until saved.
    pub fn delete_row(&mut self, index: usize) -> bool {
        if !self.can_delete(index) {
            return false;
        }
        debug!("Row {index} marked deleted");
        self.working[index].is_deleted = true;
        true
    }

    /// Focus landed on a row. Focusing the trailing blank draft appends
    /// another one. Returns `true` if a row was appended.
    pub fn focus_cell(&mut self, index: usize) -> bool {
        if !self.is_editing() || index + 1 != self.working.len() {
            return false;
        }
        if self.working[index].is_blank_draft() {
            self.working.push(DraftRow::blank());
            debug!("Appended draft row {}", index + 1);
            return true;
        }
        false
    }

    /// Whether the working copy differs from the snapshot at all, ignoring
    /// untouched blank drafts.
    pub fn has_changes(&self) -> bool {
        if !self.is_editing() {
            return false;
        }
        let touched: Vec<&DraftRow<T>> = self
            .working
            .iter()
            .filter(|d| !(d.is_blank_draft() && !d.is_deleted))
            .collect();

        touched.len() != self.original.len()
            || touched
                .iter()
                .zip(&self.original)
                .any(|(draft, before)| {
                    draft.is_new
                        || draft.is_deleted
                        || draft.row.id() != before.id()
                        || normalized(&draft.row) != normalized(before)
                })
    }

    /// The change set a save would send.
    pub fn changes(&self) -> BatchChanges<T> {
        diff(&self.original, &self.working)
    }

    /// Whether a save would send anything.
    pub fn has_meaningful_changes(&self) -> bool {
        self.is_editing() && !self.changes().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    fn session() -> DraftSession<Record> {
        DraftSession::new(vec![Record::with_id(1).set("a", "x")])
    }

    #[test]
    fn test_enter_edit_appends_blank() {
        let mut session = session();
        assert!(session.enter_edit());
        assert_eq!(session.rows().len(), 2);
        assert!(session.rows()[1].is_blank_draft());
        assert!(!session.enter_edit());
    }

    #[test]
    fn test_focus_appends_only_on_last_blank() {
        let mut session = session();
        session.enter_edit();
        assert!(!session.focus_cell(0));
        assert!(session.focus_cell(1));
        assert_eq!(session.rows().len(), 3);

        session.change_row(2, "a", Value::from("typed"));
        assert!(!session.focus_cell(2));
        assert_eq!(session.rows().len(), 3);
    }

    #[test]
    fn test_delete_rules() {
        let mut session = session();
        session.enter_edit();
        assert!(!session.can_delete(1));
        assert!(session.delete_row(0));
        assert!(!session.delete_row(0));
    }

    #[test]
    fn test_cancel_restores_snapshot() {
        let mut session = session();
        session.enter_edit();
        session.change_row(0, "a", Value::from("y"));
        assert!(session.has_changes());
        assert!(session.cancel());
        assert_eq!(session.mode(), EditMode::View);
        assert_eq!(session.rows().len(), 1);
        assert_eq!(session.rows()[0].row.get_str("a"), Some("x"));
    }

    #[test]
    fn test_blank_draft_is_not_a_change() {
        let mut session = session();
        session.enter_edit();
        session.focus_cell(1);
        assert!(!session.has_changes());
        assert!(!session.has_meaningful_changes());
    }

    #[test]
    fn test_epoch_moves_on_transitions() {
        let mut session = session();
        let start = session.epoch();
        session.enter_edit();
        session.cancel();
        session.enter_edit();
        assert_eq!(session.epoch(), start + 3);
    }
}
