//! Filter specs and filter values.
//!
//! A column declares *how* it can be filtered with a [`FilterSpec`]; the
//! filtering controller stores *what* is currently filtered as
//! [`FilterValue`]s. Both are tagged by [`FilterKind`], and a value is only
//! valid for a column whose filter spec has the same kind.

use std::fmt;

use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

use crate::error::FilterValueError;

/// The kind of filter a column supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    /// Free-text search.
    Search,
    /// One option out of a fixed list.
    Select,
    /// Any subset of a fixed list.
    MultiSelect,
    /// Inclusive date bounds.
    DateRange,
    /// Inclusive numeric bounds.
    NumberRange,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FilterKind::Search => "search",
            FilterKind::Select => "select",
            FilterKind::MultiSelect => "multi-select",
            FilterKind::DateRange => "date-range",
            FilterKind::NumberRange => "number-range",
        })
    }
}

/// A selectable option for select and multi-select filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Value stored in the filter state.
    pub value: String,
    /// Text shown to the operator.
    pub label: String,
}

impl FilterOption {
    /// Creates a new option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Filter declaration carried by a column's metadata.
///
/// Only select and multi-select carry options; only search carries a
/// placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSpec {
    /// Free-text search.
    Search {
        /// Optional label override.
        label: Option<String>,
        /// Placeholder text for the input.
        placeholder: Option<String>,
    },
    /// Single option.
    Select {
        /// Optional label override.
        label: Option<String>,
        /// Allowed options.
        options: Vec<FilterOption>,
    },
    /// Any subset of options.
    MultiSelect {
        /// Optional label override.
        label: Option<String>,
        /// Allowed options.
        options: Vec<FilterOption>,
    },
    /// Date bounds.
    DateRange {
        /// Optional label override.
        label: Option<String>,
    },
    /// Numeric bounds.
    NumberRange {
        /// Optional label override.
        label: Option<String>,
    },
}

impl FilterSpec {
    /// Creates a search filter spec.
    pub fn search() -> Self {
        FilterSpec::Search {
            label: None,
            placeholder: None,
        }
    }

    /// Creates a select filter spec.
    pub fn select(options: impl IntoIterator<Item = FilterOption>) -> Self {
        FilterSpec::Select {
            label: None,
            options: options.into_iter().collect(),
        }
    }

    /// Creates a multi-select filter spec.
    pub fn multi_select(options: impl IntoIterator<Item = FilterOption>) -> Self {
        FilterSpec::MultiSelect {
            label: None,
            options: options.into_iter().collect(),
        }
    }

    /// Creates a date-range filter spec.
    pub fn date_range() -> Self {
        FilterSpec::DateRange { label: None }
    }

    /// Creates a number-range filter spec.
    pub fn number_range() -> Self {
        FilterSpec::NumberRange { label: None }
    }

    /// Sets the label override (builder pattern).
    pub fn with_label(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            FilterSpec::Search { label, .. }
            | FilterSpec::Select { label, .. }
            | FilterSpec::MultiSelect { label, .. }
            | FilterSpec::DateRange { label }
            | FilterSpec::NumberRange { label } => *label = Some(text.into()),
        }
        self
    }

    /// Sets the search placeholder. Ignored for other kinds.
    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        if let FilterSpec::Search { placeholder, .. } = &mut self {
            *placeholder = Some(text.into());
        }
        self
    }

    /// Returns the kind tag.
    pub fn kind(&self) -> FilterKind {
        match self {
            FilterSpec::Search { .. } => FilterKind::Search,
            FilterSpec::Select { .. } => FilterKind::Select,
            FilterSpec::MultiSelect { .. } => FilterKind::MultiSelect,
            FilterSpec::DateRange { .. } => FilterKind::DateRange,
            FilterSpec::NumberRange { .. } => FilterKind::NumberRange,
        }
    }

    /// Returns the label override, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            FilterSpec::Search { label, .. }
            | FilterSpec::Select { label, .. }
            | FilterSpec::MultiSelect { label, .. }
            | FilterSpec::DateRange { label }
            | FilterSpec::NumberRange { label } => label.as_deref(),
        }
    }

    /// Returns the options for select kinds, empty otherwise.
    pub fn options(&self) -> &[FilterOption] {
        match self {
            FilterSpec::Select { options, .. } | FilterSpec::MultiSelect { options, .. } => {
                options
            }
            _ => &[],
        }
    }

    /// Checks that `value` has the shape this filter spec implies.
    pub fn check(&self, column: &str, value: &FilterValue) -> Result<(), FilterValueError> {
        if self.kind() != value.kind() {
            return Err(FilterValueError::KindMismatch {
                column: column.to_string(),
                expected: self.kind(),
                actual: value.kind(),
            });
        }

        let unknown = |v: &str| FilterValueError::UnknownOption {
            column: column.to_string(),
            value: v.to_string(),
        };
        let known = |v: &str| self.options().iter().any(|o| o.value == v);

        match value {
            FilterValue::Select(v) if !known(v) => Err(unknown(v)),
            FilterValue::MultiSelect(values) => match values.iter().find(|v| !known(v)) {
                Some(v) => Err(unknown(v)),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }
}

/// Inclusive date bounds; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    /// Lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    /// Upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Returns `true` when neither bound is set.
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Returns `true` if `date` falls within the bounds.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// Inclusive numeric bounds; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NumberRange {
    /// Lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl NumberRange {
    /// Returns `true` when neither bound is set.
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Returns `true` if `n` falls within the bounds.
    pub fn contains(&self, n: f64) -> bool {
        self.min.is_none_or(|min| n >= min) && self.max.is_none_or(|max| n <= max)
    }
}

/// The value of an active column filter.
///
/// Serialized as `{"kind": ..., "value": ...}` so the query collaborator can
/// dispatch on the kind without knowing the column set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum FilterValue {
    /// Search text.
    Search(String),
    /// Chosen option value.
    Select(String),
    /// Chosen option values.
    MultiSelect(Vec<String>),
    /// Date bounds.
    DateRange(DateRange),
    /// Numeric bounds.
    NumberRange(NumberRange),
}

impl FilterValue {
    /// Creates a search value.
    pub fn search(text: impl Into<String>) -> Self {
        FilterValue::Search(text.into())
    }

    /// Creates a select value.
    pub fn select(value: impl Into<String>) -> Self {
        FilterValue::Select(value.into())
    }

    /// Returns the kind tag.
    pub fn kind(&self) -> FilterKind {
        match self {
            FilterValue::Search(_) => FilterKind::Search,
            FilterValue::Select(_) => FilterKind::Select,
            FilterValue::MultiSelect(_) => FilterKind::MultiSelect,
            FilterValue::DateRange(_) => FilterKind::DateRange,
            FilterValue::NumberRange(_) => FilterKind::NumberRange,
        }
    }

    /// Returns `true` for values that mean "no filter".
    ///
    /// Setting a blank value clears the column's filter instead of storing it.
    pub fn is_blank(&self) -> bool {
        match self {
            FilterValue::Search(s) | FilterValue::Select(s) => s.is_empty(),
            FilterValue::MultiSelect(v) => v.is_empty(),
            FilterValue::DateRange(r) => r.is_empty(),
            FilterValue::NumberRange(r) => r.is_empty(),
        }
    }
}

/// One active filter: a column id and its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    /// Column id.
    #[serde(rename = "id")]
    pub column_id: String,
    /// Filter value.
    pub value: FilterValue,
}

impl ColumnFilter {
    /// Creates a new column filter.
    pub fn new(column_id: impl Into<String>, value: FilterValue) -> Self {
        Self {
            column_id: column_id.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses() -> FilterSpec {
        FilterSpec::select([
            FilterOption::new("general", "General"),
            FilterOption::new("rule", "Rule"),
        ])
    }

    #[test]
    fn test_check_kind_mismatch() {
        let err = FilterSpec::search()
            .check("name", &FilterValue::select("x"))
            .unwrap_err();
        assert_eq!(
            err,
            FilterValueError::KindMismatch {
                column: "name".into(),
                expected: FilterKind::Search,
                actual: FilterKind::Select,
            }
        );
    }

    #[test]
    fn test_check_options() {
        assert!(statuses().check("type", &FilterValue::select("rule")).is_ok());
        assert!(matches!(
            statuses().check("type", &FilterValue::select("other")),
            Err(FilterValueError::UnknownOption { .. })
        ));
    }

    #[test]
    fn test_blank_values() {
        assert!(FilterValue::search("").is_blank());
        assert!(FilterValue::MultiSelect(vec![]).is_blank());
        assert!(FilterValue::DateRange(DateRange::default()).is_blank());
        assert!(!FilterValue::NumberRange(NumberRange {
            min: Some(1.0),
            max: None
        })
        .is_blank());
    }

    #[test]
    fn test_partial_ranges() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let range = DateRange {
            from: Some(d(10)),
            to: None,
        };
        assert!(range.contains(d(10)));
        assert!(range.contains(d(31)));
        assert!(!range.contains(d(9)));

        let range = NumberRange {
            min: None,
            max: Some(5.0),
        };
        assert!(range.contains(-3.0));
        assert!(!range.contains(5.5));
    }

    #[test]
    fn test_wire_shape() {
        let filter = ColumnFilter::new("name", FilterValue::search("Alp"));
        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(json, r#"{"id":"name","value":{"kind":"search","value":"Alp"}}"#);
    }
}
