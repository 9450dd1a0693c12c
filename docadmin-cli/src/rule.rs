//! Rule records and their batch payload.

use chrono::NaiveDate;
use docadmin_lib::model::Value;
use docadmin_lib::sheet::{BatchChanges, SheetRow};
use docadmin_lib::table::TableRow;
use serde::Deserialize;
use serde::Serialize;

/// Priority given to rules that do not set one.
pub const DEFAULT_PRIORITY: i64 = 50;

/// A rule category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A rule as served by the store, with its category joined in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub category_id: Option<i64>,
    pub category: Option<Category>,
    pub raw_content: String,
    pub default_priority: Option<i64>,
    pub created_at: Option<NaiveDate>,
}

impl TableRow for Rule {
    fn row_id(&self) -> String {
        self.id.map_or_else(|| "new".to_string(), |id| id.to_string())
    }

    fn cell_text(&self, column_id: &str) -> String {
        match column_id {
            "id" => self.id.map(|id| id.to_string()).unwrap_or_default(),
            "category" | "categoryId" => self
                .category
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            "rawContent" => self.raw_content.clone(),
            "defaultPriority" => self
                .default_priority
                .map(|p| p.to_string())
                .unwrap_or_default(),
            "createdAt" => self.created_at.map(|d| d.to_string()).unwrap_or_default(),
            _ => String::new(),
        }
    }
}

impl SheetRow for Rule {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn field(&self, field: &str) -> Value {
        match field {
            "id" => self.id.into(),
            "categoryId" => self.category_id.into(),
            "rawContent" => self.raw_content.as_str().into(),
            "defaultPriority" => self.default_priority.into(),
            "createdAt" => self.created_at.into(),
            _ => Value::Null,
        }
    }

    fn set_field(&mut self, field: &str, value: Value) {
        match field {
            "categoryId" => self.category_id = value.as_i64(),
            "rawContent" => self.raw_content = value.to_string(),
            "defaultPriority" => self.default_priority = value.as_i64(),
            _ => {}
        }
    }
}

/// A rule as the store accepts it: category by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub category_name: String,
    pub raw_content: String,
    pub default_priority: i64,
}

/// Batch update accepted by the store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulePayload {
    pub new_rules: Vec<RuleInput>,
    pub updated_rules: Vec<RuleInput>,
    pub deleted_ids: Vec<i64>,
}

impl RulePayload {
    /// Flatten a sheet change set, resolving category ids to names.
    ///
    /// Unknown category ids map to an empty name, which the store rejects.
    pub fn from_changes(changes: BatchChanges<Rule>, categories: &[Category]) -> Self {
        let input = |rule: Rule| {
            let category_name = rule
                .category_id
                .and_then(|id| categories.iter().find(|c| c.id == id))
                .or(rule.category.as_ref())
                .map(|c| c.name.clone())
                .unwrap_or_default();
            RuleInput {
                id: rule.id,
                category_name,
                raw_content: rule.raw_content,
                default_priority: rule.default_priority.unwrap_or(DEFAULT_PRIORITY),
            }
        };

        Self {
            new_rules: changes.new.into_iter().map(input).collect(),
            updated_rules: changes.updated.into_iter().map(input).collect(),
            deleted_ids: changes.deleted_ids,
        }
    }
}
