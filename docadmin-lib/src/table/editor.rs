//! Filter editors.
//!
//! One editor per filterable column, picked by matching the column's
//! [`FilterSpec`]. Editors write straight into the shared
//! [`FilteringController`]; search input is debounced, the others publish on
//! every change.

use std::time::Duration;

use chrono::NaiveDate;
use log::debug;

use crate::error::FilterValueError;

use super::column::ColumnDef;
use super::debounce::Debouncer;
use super::filter::{DateRange, FilterKind, FilterOption, FilterSpec, FilterValue, NumberRange};
use super::filtering::FilteringController;

/// Placeholder shown by search inputs without their own.
pub const SEARCH_PLACEHOLDER: &str = "Search...";

/// Label of the "no selection" entry in select editors.
pub const SELECT_ALL_LABEL: &str = "All";

/// Fields every editor carries.
#[derive(Debug, Clone)]
struct EditorBase {
    column_id: String,
    label: String,
    filtering: FilteringController,
}

impl EditorBase {
    fn publish(&self, value: Option<FilterValue>) -> bool {
        self.filtering.set_filter(&self.column_id, value)
    }

    fn current(&self) -> Option<FilterValue> {
        self.filtering.get_filter(&self.column_id)
    }
}

// =============================================================================
// Search
// =============================================================================

/// Debounced free-text input.
#[derive(Debug)]
pub struct SearchEditor {
    base: EditorBase,
    placeholder: String,
    text: String,
    debouncer: Debouncer,
}

impl SearchEditor {
    /// Text currently in the input.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Input placeholder.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Replace the input text and re-arm the debounce timer.
    ///
    /// The filter is published once input has been quiet for the debounce
    /// window. Empty text clears the filter. Without a tokio runtime the
    /// filter is published at once.
    pub fn input(&mut self, text: impl Into<String>) {
        self.text = text.into();
        let base = self.base.clone();
        let text = self.text.clone();
        self.debouncer.schedule(move || {
            debug!("Search filter settled: {} = {text:?}", base.column_id);
            base.publish(search_value(text));
        });
    }

    /// Publish the current text now, dropping any pending timer.
    pub fn flush(&mut self) -> bool {
        self.debouncer.cancel();
        self.base.publish(search_value(self.text.clone()))
    }

    /// Reload the input from the controller.
    pub fn sync(&mut self) {
        self.debouncer.cancel();
        self.text = match self.base.current() {
            Some(FilterValue::Search(text)) => text,
            _ => String::new(),
        };
    }

    /// Whether a publish is waiting on the timer.
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

fn search_value(text: String) -> Option<FilterValue> {
    (!text.is_empty()).then_some(FilterValue::Search(text))
}

// =============================================================================
// Select
// =============================================================================

/// Single choice out of a fixed option list.
#[derive(Debug)]
pub struct SelectEditor {
    base: EditorBase,
    options: Vec<FilterOption>,
}

impl SelectEditor {
    /// Available options.
    pub fn options(&self) -> &[FilterOption] {
        &self.options
    }

    /// Currently chosen value.
    pub fn selected(&self) -> Option<String> {
        match self.base.current() {
            Some(FilterValue::Select(value)) => Some(value),
            _ => None,
        }
    }

    /// Choose an option, or `None` for "All".
    pub fn choose(&self, value: Option<&str>) -> Result<bool, FilterValueError> {
        let Some(value) = value else {
            return Ok(self.base.publish(None));
        };
        if !self.options.iter().any(|o| o.value == value) {
            return Err(FilterValueError::UnknownOption {
                column: self.base.column_id.clone(),
                value: value.to_string(),
            });
        }
        Ok(self.base.publish(Some(FilterValue::select(value))))
    }
}

// =============================================================================
// Multi-select
// =============================================================================

/// Any subset of a fixed option list.
#[derive(Debug)]
pub struct MultiSelectEditor {
    base: EditorBase,
    options: Vec<FilterOption>,
}

impl MultiSelectEditor {
    /// Available options.
    pub fn options(&self) -> &[FilterOption] {
        &self.options
    }

    /// Currently chosen values, in the order they were picked.
    pub fn selected(&self) -> Vec<String> {
        match self.base.current() {
            Some(FilterValue::MultiSelect(values)) => values,
            _ => Vec::new(),
        }
    }

    /// Add or remove an option. Removing the last one clears the filter.
    pub fn toggle(&self, value: &str) -> Result<bool, FilterValueError> {
        if !self.options.iter().any(|o| o.value == value) {
            return Err(FilterValueError::UnknownOption {
                column: self.base.column_id.clone(),
                value: value.to_string(),
            });
        }

        let mut selected = self.selected();
        if let Some(index) = selected.iter().position(|v| v == value) {
            selected.remove(index);
        } else {
            selected.push(value.to_string());
        }

        Ok(self
            .base
            .publish((!selected.is_empty()).then_some(FilterValue::MultiSelect(selected))))
    }

    /// Trigger text: `"{n} selected"` or `"Select..."`.
    pub fn trigger_text(&self) -> String {
        match self.selected().len() {
            0 => "Select...".to_string(),
            n => format!("{n} selected"),
        }
    }
}

// =============================================================================
// Ranges
// =============================================================================

/// Inclusive date bounds.
#[derive(Debug)]
pub struct DateRangeEditor {
    base: EditorBase,
}

impl DateRangeEditor {
    /// Current bounds.
    pub fn range(&self) -> DateRange {
        match self.base.current() {
            Some(FilterValue::DateRange(range)) => range,
            _ => DateRange::default(),
        }
    }

    /// Set or clear the lower bound. Non-finite bounds count as cleared.
    pub fn set_from(&self, from: Option<NaiveDate>) -> bool {
        let range = DateRange {
            from,
            ..self.range()
        };
        self.base.publish(Some(FilterValue::DateRange(range)))
    }

    /// Set or clear the upper bound. Non-finite bounds count as cleared.
    pub fn set_to(&self, to: Option<NaiveDate>) -> bool {
        let range = DateRange { to, ..self.range() };
        self.base.publish(Some(FilterValue::DateRange(range)))
    }
}

/// Inclusive numeric bounds.
#[derive(Debug)]
pub struct NumberRangeEditor {
    base: EditorBase,
}

impl NumberRangeEditor {
    /// Current bounds.
    pub fn range(&self) -> NumberRange {
        match self.base.current() {
            Some(FilterValue::NumberRange(range)) => range,
            _ => NumberRange::default(),
        }
    }

    /// Set or clear the lower bound.
    pub fn set_min(&self, min: Option<f64>) -> bool {
        let range = NumberRange {
            min: min.filter(|n| n.is_finite()),
            ..self.range()
        };
        self.base.publish(Some(FilterValue::NumberRange(range)))
    }

    /// Set or clear the upper bound.
    pub fn set_max(&self, max: Option<f64>) -> bool {
        let range = NumberRange {
            max: max.filter(|n| n.is_finite()),
            ..self.range()
        };
        self.base.publish(Some(FilterValue::NumberRange(range)))
    }

    /// Parse a bound typed into a number input. Blank text and non-finite
    /// numbers clear it.
    pub fn parse_bound(text: &str) -> Option<f64> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        text.parse::<f64>().ok().filter(|n| n.is_finite())
    }
}

// =============================================================================
// FilterEditor
// =============================================================================

/// Editor for one filterable column.
#[derive(Debug)]
pub enum FilterEditor {
    /// Free-text search.
    Search(SearchEditor),
    /// Single option.
    Select(SelectEditor),
    /// Option subset.
    MultiSelect(MultiSelectEditor),
    /// Date bounds.
    DateRange(DateRangeEditor),
    /// Numeric bounds.
    NumberRange(NumberRangeEditor),
}

impl FilterEditor {
    /// Editor for a column, or `None` if it has no filter.
    pub fn for_column<T>(
        column: &ColumnDef<T>,
        filtering: &FilteringController,
        search_debounce: Duration,
    ) -> Option<Self> {
        let spec = column.meta.filter.as_ref()?;
        let base = EditorBase {
            column_id: column.id.clone(),
            label: column.filter_label(),
            filtering: filtering.clone(),
        };

        let editor = match spec {
            FilterSpec::Search { placeholder, .. } => {
                let mut editor = SearchEditor {
                    base,
                    placeholder: placeholder
                        .clone()
                        .unwrap_or_else(|| SEARCH_PLACEHOLDER.to_string()),
                    text: String::new(),
                    debouncer: Debouncer::new(search_debounce),
                };
                editor.sync();
                FilterEditor::Search(editor)
            }
            FilterSpec::Select { options, .. } => FilterEditor::Select(SelectEditor {
                base,
                options: options.clone(),
            }),
            FilterSpec::MultiSelect { options, .. } => {
                FilterEditor::MultiSelect(MultiSelectEditor {
                    base,
                    options: options.clone(),
                })
            }
            FilterSpec::DateRange { .. } => FilterEditor::DateRange(DateRangeEditor { base }),
            FilterSpec::NumberRange { .. } => {
                FilterEditor::NumberRange(NumberRangeEditor { base })
            }
        };
        Some(editor)
    }

    fn base(&self) -> &EditorBase {
        match self {
            FilterEditor::Search(e) => &e.base,
            FilterEditor::Select(e) => &e.base,
            FilterEditor::MultiSelect(e) => &e.base,
            FilterEditor::DateRange(e) => &e.base,
            FilterEditor::NumberRange(e) => &e.base,
        }
    }

    /// Column being filtered.
    pub fn column_id(&self) -> &str {
        &self.base().column_id
    }

    /// Label shown next to the editor.
    pub fn label(&self) -> &str {
        &self.base().label
    }

    /// Kind tag.
    pub fn kind(&self) -> FilterKind {
        match self {
            FilterEditor::Search(_) => FilterKind::Search,
            FilterEditor::Select(_) => FilterKind::Select,
            FilterEditor::MultiSelect(_) => FilterKind::MultiSelect,
            FilterEditor::DateRange(_) => FilterKind::DateRange,
            FilterEditor::NumberRange(_) => FilterKind::NumberRange,
        }
    }

    /// Whether the column currently has a filter.
    pub fn is_active(&self) -> bool {
        self.base().current().is_some()
    }

    /// Short description of the current value for the filter bar.
    pub fn summary(&self) -> String {
        match self {
            FilterEditor::Search(e) => e.text.clone(),
            FilterEditor::Select(e) => {
                let selected = e.selected();
                e.options
                    .iter()
                    .find(|o| Some(&o.value) == selected.as_ref())
                    .map_or_else(|| SELECT_ALL_LABEL.to_string(), |o| o.label.clone())
            }
            FilterEditor::MultiSelect(e) => e.trigger_text(),
            FilterEditor::DateRange(e) => {
                let range = e.range();
                format!(
                    "{} - {}",
                    range.from.map(|d| d.to_string()).unwrap_or_default(),
                    range.to.map(|d| d.to_string()).unwrap_or_default()
                )
            }
            FilterEditor::NumberRange(e) => {
                let range = e.range();
                format!(
                    "{} - {}",
                    range.min.map(|n| n.to_string()).unwrap_or_default(),
                    range.max.map(|n| n.to_string()).unwrap_or_default()
                )
            }
        }
    }

    /// Clear this column's filter and reset local input.
    pub fn clear(&mut self) -> bool {
        let changed = self.base().publish(None);
        if let FilterEditor::Search(editor) = self {
            editor.sync();
        }
        changed
    }

    /// Reload local input after the controller changed elsewhere.
    pub fn sync(&mut self) {
        if let FilterEditor::Search(editor) = self {
            editor.sync();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use crate::table::ColumnSize;

    fn column(spec: FilterSpec) -> ColumnDef<Record> {
        ColumnDef::new("col", "Col", ColumnSize::fixed(100)).filter(spec)
    }

    fn editor(spec: FilterSpec, filtering: &FilteringController) -> FilterEditor {
        FilterEditor::for_column(&column(spec), filtering, Duration::from_millis(300)).unwrap()
    }

    #[test]
    fn test_no_filter_no_editor() {
        let column = ColumnDef::<Record>::new("col", "Col", ColumnSize::fixed(100));
        let filtering = FilteringController::new();
        assert!(FilterEditor::for_column(&column, &filtering, Duration::ZERO).is_none());
    }

    #[test]
    fn test_select_choose_and_all() {
        let filtering = FilteringController::new();
        let spec = FilterSpec::select([FilterOption::new("rule", "Rule")]);
        let FilterEditor::Select(select) = editor(spec, &filtering) else {
            panic!("expected select editor");
        };

        assert!(select.choose(Some("rule")).unwrap());
        assert_eq!(select.selected().as_deref(), Some("rule"));
        assert!(select.choose(Some("nope")).is_err());
        assert!(select.choose(None).unwrap());
        assert!(filtering.filters().is_empty());
    }

    #[test]
    fn test_multi_select_toggle() {
        let filtering = FilteringController::new();
        let spec = FilterSpec::multi_select([
            FilterOption::new("a", "A"),
            FilterOption::new("b", "B"),
        ]);
        let FilterEditor::MultiSelect(multi) = editor(spec, &filtering) else {
            panic!("expected multi-select editor");
        };

        assert_eq!(multi.trigger_text(), "Select...");
        multi.toggle("a").unwrap();
        multi.toggle("b").unwrap();
        assert_eq!(multi.selected(), ["a", "b"]);
        assert_eq!(multi.trigger_text(), "2 selected");

        multi.toggle("a").unwrap();
        multi.toggle("b").unwrap();
        assert!(filtering.get_filter("col").is_none());
    }

    #[test]
    fn test_range_publishes_only_with_a_bound() {
        let filtering = FilteringController::new();
        let FilterEditor::NumberRange(range) = editor(FilterSpec::number_range(), &filtering)
        else {
            panic!("expected number-range editor");
        };

        range.set_min(Some(2.0));
        range.set_max(Some(8.0));
        assert_eq!(
            range.range(),
            NumberRange {
                min: Some(2.0),
                max: Some(8.0)
            }
        );

        range.set_min(None);
        range.set_max(None);
        assert!(filtering.get_filter("col").is_none());
    }

    #[test]
    fn test_date_range_partial() {
        let filtering = FilteringController::new();
        let FilterEditor::DateRange(range) = editor(FilterSpec::date_range(), &filtering) else {
            panic!("expected date-range editor");
        };
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        range.set_to(Some(day));
        assert_eq!(range.range(), DateRange { from: None, to: Some(day) });
    }

    #[test]
    fn test_parse_bound() {
        assert_eq!(NumberRangeEditor::parse_bound(" 4.5 "), Some(4.5));
        assert_eq!(NumberRangeEditor::parse_bound(""), None);
        assert_eq!(NumberRangeEditor::parse_bound("abc"), None);
        assert_eq!(NumberRangeEditor::parse_bound("NaN"), None);
        assert_eq!(NumberRangeEditor::parse_bound("inf"), None);
        assert_eq!(NumberRangeEditor::parse_bound("-infinity"), None);
    }

    #[test]
    fn test_non_finite_bound_is_idempotent() {
        let filtering = FilteringController::new();
        let FilterEditor::NumberRange(range) = editor(FilterSpec::number_range(), &filtering)
        else {
            panic!("expected number-range editor");
        };

        assert!(range.set_max(Some(10.0)));
        let revision = filtering.revision();
        assert!(!range.set_min(Some(f64::NAN)));
        assert!(!range.set_min(Some(f64::NAN)));
        assert_eq!(filtering.revision(), revision);
        assert_eq!(range.range(), NumberRange { min: None, max: Some(10.0) });
    }

    #[test]
    fn test_search_sync_from_controller() {
        let filtering = FilteringController::new();
        filtering.set_filter("col", Some(FilterValue::search("pre")));
        let FilterEditor::Search(search) = editor(FilterSpec::search(), &filtering) else {
            panic!("expected search editor");
        };
        assert_eq!(search.text(), "pre");
        assert_eq!(search.placeholder(), SEARCH_PLACEHOLDER);
    }
}
