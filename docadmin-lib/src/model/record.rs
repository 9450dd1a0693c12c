//! Dynamic record

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

use super::Value;
use crate::sheet::SheetRow;
use crate::table::TableRow;

/// A dynamic record with an optional persisted id.
///
/// Fields are kept in a sorted map so the serialized form is deterministic,
/// which is what the sheet's change detection compares. A record without an id
/// has never been persisted.
///
/// # Example
///
/// ```
/// use docadmin_lib::model::Record;
///
/// let record = Record::with_id(1)
///     .set("rawContent", "Always cite sources")
///     .set("defaultPriority", 50i64);
///
/// assert_eq!(record.id(), Some(1));
/// assert_eq!(record.get_str("rawContent"), Some("Always cite sources"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    /// The persisted identifier, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<i64>,

    /// The field values.
    #[serde(flatten)]
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Creates a new empty, unpersisted record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new record with the given id.
    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            fields: BTreeMap::new(),
        }
    }

    /// Returns the record id, if set.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Sets the record id.
    pub fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    // =========================================================================
    // Typed getters
    // =========================================================================

    /// Returns the field as a string slice, if it is a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Returns the field as an integer, if it converts.
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(Value::as_i64)
    }

    /// Returns the field as a float, if it converts.
    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_f64)
    }

    /// Returns the field as a date, if it converts.
    pub fn get_date(&self, field: &str) -> Option<NaiveDate> {
        self.get(field).and_then(Value::as_date)
    }
}

impl TableRow for Record {
    fn row_id(&self) -> String {
        self.id.map_or_else(|| "new".to_string(), |id| id.to_string())
    }

    fn cell_text(&self, column_id: &str) -> String {
        if column_id == "id" {
            return self.id.map(|id| id.to_string()).unwrap_or_default();
        }
        self.get(column_id).map(Value::to_string).unwrap_or_default()
    }
}

impl SheetRow for Record {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn field(&self, field: &str) -> Value {
        if field == "id" {
            return self.id.into();
        }
        self.get(field).cloned().unwrap_or_default()
    }

    fn set_field(&mut self, field: &str, value: Value) {
        if field == "id" {
            self.id = value.as_i64();
        } else {
            self.fields.insert(field.to_string(), value);
        }
    }
}
