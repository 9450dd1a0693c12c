//! Per-cell validation of the working copy.

use std::collections::BTreeMap;

use log::trace;

use super::column::SheetColumn;
use super::row::{DraftRow, SheetRow};

/// Sparse error map: row index, then column id, then message.
pub type ValidationErrors = BTreeMap<usize, BTreeMap<String, String>>;

/// Validation state of one sheet.
///
/// Deleted rows and blank drafts are exempt, so the trailing blank row never
/// blocks a save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetValidation {
    errors: ValidationErrors,
}

impl SheetValidation {
    /// No errors.
    pub fn new() -> Self {
        Self::default()
    }

    fn row_errors<T: SheetRow>(
        columns: &[SheetColumn<T>],
        draft: &DraftRow<T>,
    ) -> BTreeMap<String, String> {
        if draft.is_deleted || draft.is_blank_draft() {
            return BTreeMap::new();
        }
        columns
            .iter()
            .filter_map(|column| column.check(&draft.row).map(|msg| (column.id.clone(), msg)))
            .collect()
    }

    /// Re-validate every row, replacing the error map. Returns validity.
    pub fn validate_all<T: SheetRow>(
        &mut self,
        columns: &[SheetColumn<T>],
        rows: &[DraftRow<T>],
    ) -> bool {
        self.errors = rows
            .iter()
            .enumerate()
            .map(|(index, draft)| (index, Self::row_errors(columns, draft)))
            .filter(|(_, errors)| !errors.is_empty())
            .collect();
        trace!("Validated {} rows: {} with errors", rows.len(), self.errors.len());
        self.is_valid()
    }

    /// Re-validate one row and update its entry. Returns that row's validity.
    pub fn validate_row<T: SheetRow>(
        &mut self,
        columns: &[SheetColumn<T>],
        index: usize,
        draft: &DraftRow<T>,
    ) -> bool {
        let errors = Self::row_errors(columns, draft);
        if errors.is_empty() {
            self.errors.remove(&index);
            true
        } else {
            self.errors.insert(index, errors);
            false
        }
    }

    /// Whether no cell has an error.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message for one cell.
    pub fn field_error(&self, row: usize, column_id: &str) -> Option<&str> {
        self.errors
            .get(&row)
            .and_then(|cols| cols.get(column_id))
            .map(String::as_str)
    }

    /// Number of failing cells.
    pub fn error_count(&self) -> usize {
        self.errors.values().map(BTreeMap::len).sum()
    }

    /// The full error map.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Drop every error.
    pub fn clear(&mut self) {
        self.errors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use crate::sheet::FieldRules;

    fn columns() -> Vec<SheetColumn<Record>> {
        vec![
            SheetColumn::new("rawContent", "Content")
                .validate(FieldRules::new().required("Content is required")),
        ]
    }

    #[test]
    fn test_exemptions() {
        let mut deleted = DraftRow::persisted(Record::with_id(1));
        deleted.is_deleted = true;
        let rows = vec![deleted, DraftRow::blank()];

        let mut validation = SheetValidation::new();
        assert!(validation.validate_all(&columns(), &rows));
    }

    #[test]
    fn test_errors_keyed_by_row_and_column() {
        let rows = vec![
            DraftRow::persisted(Record::with_id(1).set("rawContent", "ok")),
            DraftRow::persisted(Record::with_id(2).set("rawContent", "")),
        ];
        let mut validation = SheetValidation::new();
        assert!(!validation.validate_all(&columns(), &rows));
        assert_eq!(validation.field_error(1, "rawContent"), Some("Content is required"));
        assert_eq!(validation.field_error(0, "rawContent"), None);
        assert_eq!(validation.error_count(), 1);
    }

    #[test]
    fn test_validate_row_clears_entry() {
        let mut draft = DraftRow::persisted(Record::with_id(1).set("rawContent", ""));
        let mut validation = SheetValidation::new();
        assert!(!validation.validate_row(&columns(), 0, &draft));

        draft.row.insert("rawContent", "fixed");
        assert!(validation.validate_row(&columns(), 0, &draft));
        assert!(validation.is_valid());
    }
}
