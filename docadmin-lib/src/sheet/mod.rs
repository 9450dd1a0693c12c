//! Batch-editable sheet.
//!
//! A sheet shows confirmed data read-only until the operator enters edit
//! mode. Edits then go to a working copy of draft rows, are validated per
//! cell, and are sent as one change set of new, updated and deleted rows.

mod column;
mod diff;
mod draft;
mod edit_sheet;
mod navigator;
mod row;
mod rules;
mod validation;
mod view;

pub use column::{SelectOption, SheetColumn, ViewRenderer};
pub use diff::{BatchChanges, diff};
pub use draft::{DraftSession, EditMode};
pub use edit_sheet::{ChangeMapper, EditSheet, KeyOutcome, SaveTicket};
pub use navigator::{CellKind, CellPosition, NavigationMove, Navigator};
pub use row::{DraftRow, SheetRow, is_row_empty, normalized};
pub use rules::FieldRules;
pub use validation::{SheetValidation, ValidationErrors};
pub use view::*;
