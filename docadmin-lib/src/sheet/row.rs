//! Sheet rows and draft flags.

use serde::Serialize;
use serde_json::Value as Json;

use crate::model::Value;

/// A record the edit sheet can hold.
///
/// `Default` is the blank row appended at the end of the working copy.
/// `Serialize` drives change detection: two rows are the same when their
/// serialized forms match with the id removed.
pub trait SheetRow: Clone + Default + Serialize {
    /// Persisted id, `None` until the server has stored the row.
    fn id(&self) -> Option<i64>;

    /// Read a field by column accessor.
    fn field(&self, field: &str) -> Value;

    /// Write a field by column accessor.
    fn set_field(&mut self, field: &str, value: Value);
}

/// A working-copy row with its transient flags.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftRow<T> {
    /// The row data.
    pub row: T,
    /// Not yet persisted.
    pub is_new: bool,
    /// Marked for deletion on save. Still shown until then.
    pub is_deleted: bool,
}

impl<T: SheetRow> DraftRow<T> {
    /// Wrap a confirmed row.
    pub fn persisted(row: T) -> Self {
        Self {
            row,
            is_new: false,
            is_deleted: false,
        }
    }

    /// A fresh blank row.
    pub fn blank() -> Self {
        Self {
            row: T::default(),
            is_new: true,
            is_deleted: false,
        }
    }

    /// Whether every non-id field is null, missing or an empty string.
    pub fn is_empty(&self) -> bool {
        is_row_empty(&self.row)
    }

    /// New and untouched. Exempt from validation and never saved.
    pub fn is_blank_draft(&self) -> bool {
        self.is_new && self.is_empty()
    }
}

/// Whether every non-id field of `row` is null, missing or `""`.
pub fn is_row_empty<T: Serialize>(row: &T) -> bool {
    match serde_json::to_value(row) {
        Ok(Json::Object(map)) => map
            .iter()
            .filter(|(key, _)| key.as_str() != "id")
            .all(|(_, value)| match value {
                Json::Null => true,
                Json::String(s) => s.is_empty(),
                _ => false,
            }),
        Ok(Json::Null) => true,
        _ => false,
    }
}

/// Serialized form of `row` without its id, for change comparison.
pub fn normalized<T: Serialize>(row: &T) -> Option<Json> {
    let mut value = serde_json::to_value(row).ok()?;
    if let Json::Object(map) = &mut value {
        map.remove("id");
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    #[test]
    fn test_empty_ignores_id() {
        assert!(is_row_empty(&Record::new()));
        assert!(is_row_empty(&Record::with_id(5)));
        assert!(is_row_empty(&Record::new().set("a", "").set("b", Value::Null)));
        assert!(!is_row_empty(&Record::new().set("a", "x")));
        assert!(!is_row_empty(&Record::new().set("n", 0i64)));
    }

    #[test]
    fn test_normalized_strips_id() {
        let a = Record::with_id(1).set("a", "x");
        let b = Record::with_id(2).set("a", "x");
        assert_eq!(normalized(&a), normalized(&b));
        assert_ne!(normalized(&a), normalized(&Record::with_id(1).set("a", "y")));
    }

    #[test]
    fn test_blank_draft() {
        let draft = DraftRow::<Record>::blank();
        assert!(draft.is_blank_draft());
        assert!(!DraftRow::persisted(Record::with_id(1)).is_blank_draft());
    }
}
