//! Render output of the edit sheet.

use super::draft::EditMode;
use super::navigator::CellKind;

/// Header of the actions column, shown in edit mode.
pub const ACTIONS_HEADER: &str = "Actions";

/// Empty-body text.
pub const EMPTY_TEXT: &str = "No data available.";

/// Loading text.
pub const LOADING_TEXT: &str = "Loading...";

/// Prompt shown before discarding edits.
pub const DISCARD_PROMPT: &str = "You have unsaved changes. Are you sure you want to cancel?";

/// A toolbar button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    /// Button text.
    pub label: String,
    /// Whether the button can be pressed.
    pub enabled: bool,
}

impl ButtonView {
    fn new(label: &str, enabled: bool) -> Self {
        Self {
            label: label.to_string(),
            enabled,
        }
    }
}

/// Toolbar buttons for the current mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarView {
    /// View mode: a single "Edit" button.
    View {
        /// Edit button.
        edit: ButtonView,
    },
    /// Edit mode: "Cancel" and "Save".
    Edit {
        /// Cancel button, disabled while saving.
        cancel: ButtonView,
        /// Save button, disabled while invalid or saving.
        save: ButtonView,
    },
}

impl ToolbarView {
    pub(super) fn for_state(mode: EditMode, is_valid: bool, saving: bool) -> Self {
        match mode {
            EditMode::View => ToolbarView::View {
                edit: ButtonView::new("Edit", true),
            },
            EditMode::Edit => ToolbarView::Edit {
                cancel: ButtonView::new("Cancel", !saving),
                save: ButtonView::new(
                    if saving { "Saving..." } else { "Save" },
                    is_valid && !saving,
                ),
            },
        }
    }
}

/// One cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetCellView {
    /// Column id.
    pub column_id: String,
    /// Text in view mode, current value in edit mode.
    pub text: String,
    /// Edit element, in edit mode.
    pub editor: Option<CellKind>,
    /// Whether the editor is disabled.
    pub disabled: bool,
    /// Validation message, in edit mode.
    pub error: Option<String>,
}

/// One row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRowView {
    /// Row key: the id, or `draft-{index}` for unsaved rows.
    pub key: String,
    /// Position in the working copy.
    pub index: usize,
    /// Drawn struck through.
    pub deleted: bool,
    /// Cells in column order.
    pub cells: Vec<SheetCellView>,
    /// Whether the delete action is enabled, in edit mode.
    pub can_delete: Option<bool>,
}

/// Sheet body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetBody {
    /// Data not loaded yet.
    Loading,
    /// No rows.
    Empty,
    /// Rows.
    Rows(Vec<SheetRowView>),
}

/// Everything needed to draw a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetView {
    /// Current mode.
    pub mode: EditMode,
    /// Toolbar.
    pub toolbar: ToolbarView,
    /// Column headers, with "Actions" appended in edit mode.
    pub headers: Vec<String>,
    /// Body.
    pub body: SheetBody,
}
