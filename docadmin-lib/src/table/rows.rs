//! Row identity and line numbering.

/// A record the table can display.
pub trait TableRow {
    /// Stable identity of the row within its table.
    fn row_id(&self) -> String;

    /// Default text for a column when the column has no renderer.
    fn cell_text(&self, column_id: &str) -> String;
}

/// A row decorated with its page position and a table-scoped key.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberedRow<T> {
    /// One-based position on the current page.
    pub line_number: usize,
    /// `"{table_id}-{row_id}"`, unique across tables on one page.
    pub key: String,
    /// The row itself.
    pub row: T,
}

/// Table-scoped key for a row.
pub fn row_key(table_id: &str, row_id: &str) -> String {
    format!("{table_id}-{row_id}")
}

/// Number the rows of the current page, starting at 1.
pub fn number_rows<T: TableRow + Clone>(table_id: &str, rows: &[T]) -> Vec<NumberedRow<T>> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| NumberedRow {
            line_number: index + 1,
            key: row_key(table_id, &row.row_id()),
            row: row.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    #[test]
    fn test_number_rows() {
        let rows = vec![Record::with_id(10), Record::with_id(20)];
        let numbered = number_rows("rules", &rows);
        assert_eq!(numbered[0].line_number, 1);
        assert_eq!(numbered[1].line_number, 2);
        assert_eq!(numbered[1].key, "rules-20");
    }

    #[test]
    fn test_keys_differ_across_tables() {
        let rows = vec![Record::with_id(1)];
        assert_ne!(number_rows("a", &rows)[0].key, number_rows("b", &rows)[0].key);
    }
}
