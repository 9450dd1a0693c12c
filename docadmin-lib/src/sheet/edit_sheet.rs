//! Edit-sheet composition root.

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::SaveError;
use crate::input::{Key, KeyCombo};
use crate::model::Value;
use crate::source::{Confirm, MutationSink};

use super::column::SheetColumn;
use super::diff::BatchChanges;
use super::draft::{DraftSession, EditMode};
use super::navigator::{CellKind, CellPosition, NavigationMove, Navigator};
use super::row::{DraftRow, SheetRow};
use super::validation::SheetValidation;
use super::view::{
    ACTIONS_HEADER, DISCARD_PROMPT, SheetBody, SheetCellView, SheetRowView, SheetView,
    ToolbarView,
};

/// Turns a change set into whatever the mutation collaborator expects.
pub type ChangeMapper<T, P> = Arc<dyn Fn(BatchChanges<T>) -> P + Send + Sync>;

/// A save that has been started but not finished.
///
/// Hand the payload to the mutation collaborator, then pass the epoch and
/// its result to [`EditSheet::finish_save`].
#[derive(Debug, Clone, PartialEq)]
pub struct SaveTicket<P> {
    /// Session generation the save belongs to.
    pub epoch: u64,
    /// Mapped change set.
    pub payload: P,
}

/// What a key press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not handled by the sheet.
    Ignored,
    /// Escape discarded the edit session.
    Cancelled,
    /// Escape was pressed but the operator kept their edits.
    CancelDeclined,
    /// Ctrl/Cmd+S with a saveable sheet; the host should call
    /// [`EditSheet::save`].
    SaveRequested,
    /// Ctrl/Cmd+S while invalid, unchanged or already saving.
    SaveBlocked,
    /// Focus should move.
    Moved(NavigationMove),
}

/// Batch-editable sheet.
///
/// Owns the draft session, validation state and saving flag. Columns and
/// the change mapper are supplied up front; data, the confirmation prompt
/// and the mutation collaborator are passed in by the host.
pub struct EditSheet<T, P = BatchChanges<T>> {
    columns: Vec<SheetColumn<T>>,
    session: DraftSession<T>,
    validation: SheetValidation,
    mapper: ChangeMapper<T, P>,
    saving: bool,
    loading: bool,
    confirm_discard: bool,
    focus: Option<CellPosition>,
}

impl<T: SheetRow> EditSheet<T, BatchChanges<T>> {
    /// Sheet that sends the raw change set.
    pub fn new(columns: Vec<SheetColumn<T>>, data: Vec<T>) -> Self {
        Self::with_mapper(columns, data, |changes| changes)
    }
}

impl<T: SheetRow, P> EditSheet<T, P> {
    /// Sheet that maps the change set before sending it.
    pub fn with_mapper<F>(columns: Vec<SheetColumn<T>>, data: Vec<T>, mapper: F) -> Self
    where
        F: Fn(BatchChanges<T>) -> P + Send + Sync + 'static,
    {
        Self {
            columns,
            session: DraftSession::new(data),
            validation: SheetValidation::new(),
            mapper: Arc::new(mapper),
            saving: false,
            loading: false,
            confirm_discard: true,
            focus: None,
        }
    }

    /// Apply engine configuration (builder pattern).
    pub fn config(mut self, config: &EngineConfig) -> Self {
        self.confirm_discard = config.confirm_discard;
        self
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    /// Current mode.
    pub fn mode(&self) -> EditMode {
        self.session.mode()
    }

    /// Whether the sheet is editing.
    pub fn is_editing(&self) -> bool {
        self.session.is_editing()
    }

    /// Whether a save is in flight.
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Whether every cell passes validation.
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid()
    }

    /// Rows currently shown.
    pub fn rows(&self) -> &[DraftRow<T>] {
        self.session.rows()
    }

    /// Columns.
    pub fn columns(&self) -> &[SheetColumn<T>] {
        &self.columns
    }

    /// Validation state.
    pub fn validation(&self) -> &SheetValidation {
        &self.validation
    }

    /// Session generation.
    pub fn epoch(&self) -> u64 {
        self.session.epoch()
    }

    /// Last focused cell.
    pub fn focus(&self) -> Option<CellPosition> {
        self.focus
    }

    /// Any difference from the snapshot.
    pub fn has_changes(&self) -> bool {
        self.session.has_changes()
    }

    /// Whether a save would send anything.
    pub fn has_meaningful_changes(&self) -> bool {
        self.session.has_meaningful_changes()
    }

    /// The change set a save would send, before mapping.
    pub fn changes(&self) -> BatchChanges<T> {
        self.session.changes()
    }

    // -------------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------------

    /// Replace the confirmed data, e.g. after a refetch.
    pub fn set_data(&mut self, data: Vec<T>) {
        self.session.set_data(data);
    }

    /// Enter or leave the loading state.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    fn revalidate(&mut self) -> bool {
        self.validation
            .validate_all(&self.columns, self.session.rows())
    }

    /// Start editing.
    pub fn enter_edit(&mut self) -> bool {
        if !self.session.enter_edit() {
            return false;
        }
        self.validation.clear();
        self.focus = None;
        self.revalidate();
        true
    }

    /// Set one cell and re-validate.
    pub fn change(&mut self, row: usize, column_id: &str, value: Value) -> bool {
        let Some(field) = self
            .columns
            .iter()
            .find(|c| c.id == column_id)
            .map(|c| c.field.clone())
        else {
            warn!("Change to unknown column {column_id}");
            return false;
        };
        if !self.session.change_row(row, &field, value) {
            return false;
        }
        self.revalidate();
        true
    }

    /// Mark a row deleted and re-validate.
    pub fn delete_row(&mut self, row: usize) -> bool {
        if !self.session.delete_row(row) {
            return false;
        }
        self.revalidate();
        true
    }

    /// Whether the delete action of a row is enabled.
    pub fn can_delete(&self, row: usize) -> bool {
        self.session.can_delete(row)
    }

    /// Focus moved to a cell. Focusing the trailing blank row appends a new
    /// one.
    pub fn focus_cell(&mut self, position: CellPosition) -> bool {
        if !self.is_editing() {
            return false;
        }
        self.focus = Some(position);
        if self.session.focus_cell(position.row) {
            self.revalidate();
            return true;
        }
        false
    }

    /// Leave edit mode, asking first if there are unsaved changes.
    ///
    /// Returns `true` if the session was discarded. A save in flight is not
    /// aborted, but its result will be rejected as stale.
    pub fn cancel(&mut self, confirm: &dyn Confirm) -> bool {
        if !self.is_editing() {
            return false;
        }
        if self.confirm_discard && self.has_changes() && !confirm.confirm(DISCARD_PROMPT) {
            debug!("Cancel declined");
            return false;
        }
        self.session.cancel();
        self.validation.clear();
        self.saving = false;
        self.focus = None;
        true
    }

    // -------------------------------------------------------------------------
    // Saving
    // -------------------------------------------------------------------------

    /// Validate, compute and map the change set, and mark the sheet saving.
    pub fn begin_save(&mut self) -> Result<SaveTicket<P>, SaveError> {
        if !self.is_editing() {
            return Err(SaveError::NotEditing);
        }
        if self.saving {
            return Err(SaveError::AlreadySaving);
        }
        if !self.revalidate() {
            return Err(SaveError::Invalid {
                count: self.validation.error_count(),
            });
        }

        let changes = self.session.changes();
        info!(
            "Saving {} new, {} updated, {} deleted",
            changes.new.len(),
            changes.updated.len(),
            changes.deleted_ids.len()
        );

        self.saving = true;
        Ok(SaveTicket {
            epoch: self.session.epoch(),
            payload: (self.mapper)(changes),
        })
    }

    /// Apply the result of a save started with [`begin_save`](Self::begin_save).
    ///
    /// A result from an earlier session is discarded with
    /// [`SaveError::Stale`]. Success leaves edit mode; failure keeps every
    /// edit so the operator can retry.
    pub fn finish_save(&mut self, epoch: u64, result: Result<(), SaveError>) -> Result<(), SaveError> {
        if epoch != self.session.epoch() {
            warn!(
                "Discarding save result from epoch {epoch} (current {})",
                self.session.epoch()
            );
            return Err(SaveError::Stale);
        }

        self.saving = false;
        match result {
            Ok(()) => {
                self.session.finish();
                self.validation.clear();
                self.focus = None;
                Ok(())
            }
            Err(err) => {
                warn!("Save failed: {err}");
                Err(err)
            }
        }
    }

    /// Save through a mutation collaborator.
    pub async fn save<S>(&mut self, sink: &S) -> Result<(), SaveError>
    where
        S: MutationSink<P> + ?Sized,
        P: Send + 'static,
    {
        let ticket = self.begin_save()?;
        let result = sink.apply(ticket.payload).await;
        self.finish_save(ticket.epoch, result)
    }

    // -------------------------------------------------------------------------
    // Keyboard
    // -------------------------------------------------------------------------

    /// Grid navigator for the current rows. The delete action is the last
    /// column.
    pub fn navigator(&self) -> Navigator {
        let mut kinds: Vec<CellKind> = self.columns.iter().map(|c| c.editor).collect();
        kinds.push(CellKind::Button);
        Navigator::new(self.rows().len(), kinds)
    }

    /// Handle a key press while `focus` holds the focused cell, if any.
    pub fn on_key(
        &mut self,
        combo: KeyCombo,
        focus: Option<CellPosition>,
        confirm: &dyn Confirm,
    ) -> KeyOutcome {
        if !self.is_editing() {
            return KeyOutcome::Ignored;
        }

        if combo.key == Key::Escape {
            return if self.cancel(confirm) {
                KeyOutcome::Cancelled
            } else {
                KeyOutcome::CancelDeclined
            };
        }

        if combo.modifiers.command() && matches!(combo.key, Key::Char('s' | 'S')) {
            return if self.is_valid() && self.has_meaningful_changes() && !self.saving {
                KeyOutcome::SaveRequested
            } else {
                KeyOutcome::SaveBlocked
            };
        }

        let Some(from) = focus else {
            return KeyOutcome::Ignored;
        };
        match self.navigator().navigate(from, combo) {
            Some(step) => {
                self.focus_cell(step.target);
                KeyOutcome::Moved(step)
            }
            None => KeyOutcome::Ignored,
        }
    }

    // -------------------------------------------------------------------------
    // Render
    // -------------------------------------------------------------------------

    fn row_key(draft: &DraftRow<T>, index: usize) -> String {
        draft
            .row
            .id()
            .map_or_else(|| format!("draft-{index}"), |id| id.to_string())
    }

    fn render_row(&self, index: usize, draft: &DraftRow<T>) -> SheetRowView {
        let editing = self.is_editing();
        let cells = self
            .columns
            .iter()
            .map(|column| {
                if editing {
                    SheetCellView {
                        column_id: column.id.clone(),
                        text: column.value(&draft.row).to_string(),
                        editor: Some(column.editor),
                        disabled: draft.is_deleted,
                        error: self
                            .validation
                            .field_error(index, &column.id)
                            .map(str::to_string),
                    }
                } else {
                    SheetCellView {
                        column_id: column.id.clone(),
                        text: column.view_text(&draft.row),
                        editor: None,
                        disabled: false,
                        error: None,
                    }
                }
            })
            .collect();

        SheetRowView {
            key: Self::row_key(draft, index),
            index,
            deleted: draft.is_deleted,
            cells,
            can_delete: editing.then(|| self.can_delete(index)),
        }
    }

    /// Render the current state.
    pub fn render(&self) -> SheetView {
        let mut headers: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        if self.is_editing() {
            headers.push(ACTIONS_HEADER.to_string());
        }

        let body = if self.loading {
            SheetBody::Loading
        } else if self.rows().is_empty() {
            SheetBody::Empty
        } else {
            SheetBody::Rows(
                self.rows()
                    .iter()
                    .enumerate()
                    .map(|(index, draft)| self.render_row(index, draft))
                    .collect(),
            )
        };

        SheetView {
            mode: self.mode(),
            toolbar: ToolbarView::for_state(self.mode(), self.is_valid(), self.saving),
            headers,
            body,
        }
    }
}

impl<T, P> fmt::Debug for EditSheet<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditSheet")
            .field("columns", &self.columns.len())
            .field("validation", &self.validation)
            .field("saving", &self.saving)
            .field("loading", &self.loading)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}
