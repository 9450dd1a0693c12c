//! Sheet column descriptors.

use std::fmt;
use std::sync::Arc;

use crate::model::Value;

use super::navigator::CellKind;
use super::row::SheetRow;
use super::rules::FieldRules;

/// Read-only renderer for view mode.
pub type ViewRenderer<T> = Arc<dyn Fn(&T, &Value) -> String + Send + Sync>;

/// An option of a select editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Stored value.
    pub value: String,
    /// Shown text.
    pub label: String,
}

impl SelectOption {
    /// Create a new option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// One editable column.
pub struct SheetColumn<T> {
    /// Column id, used as the validation error key.
    pub id: String,
    /// Field read and written on the row.
    pub field: String,
    /// Header text.
    pub header: String,
    /// Edit-mode element.
    pub editor: CellKind,
    /// Options for [`CellKind::Select`] editors.
    pub options: Vec<SelectOption>,
    /// View-mode renderer. Without one the value's text is shown.
    pub view: Option<ViewRenderer<T>>,
    /// Validation rules.
    pub validation: Option<FieldRules<T>>,
}

impl<T: SheetRow> SheetColumn<T> {
    /// Column whose id and field are the same, edited with a text input.
    pub fn new(field: impl Into<String>, header: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            id: field.clone(),
            field,
            header: header.into(),
            editor: CellKind::Input,
            options: Vec::new(),
            view: None,
            validation: None,
        }
    }

    /// Use a different id than the field name.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Edit with a multi-line text area.
    pub fn textarea(mut self) -> Self {
        self.editor = CellKind::TextArea;
        self
    }

    /// Edit with a dropdown.
    pub fn select(mut self, options: impl IntoIterator<Item = SelectOption>) -> Self {
        self.editor = CellKind::Select;
        self.options = options.into_iter().collect();
        self
    }

    /// Set the view renderer.
    pub fn view<F>(mut self, render: F) -> Self
    where
        F: Fn(&T, &Value) -> String + Send + Sync + 'static,
    {
        self.view = Some(Arc::new(render));
        self
    }

    /// Set the validation rules.
    pub fn validate(mut self, rules: FieldRules<T>) -> Self {
        self.validation = Some(rules);
        self
    }

    /// Current value of this column's field.
    pub fn value(&self, row: &T) -> Value {
        row.field(&self.field)
    }

    /// View-mode text.
    pub fn view_text(&self, row: &T) -> String {
        let value = self.value(row);
        match &self.view {
            Some(render) => render(row, &value),
            None => {
                let text = value.to_string();
                match self.editor {
                    CellKind::Select => self
                        .options
                        .iter()
                        .find(|o| o.value == text)
                        .map_or(text, |o| o.label.clone()),
                    _ => text,
                }
            }
        }
    }

    /// Run the validation rules for this cell.
    pub fn check(&self, row: &T) -> Option<String> {
        self.validation
            .as_ref()
            .and_then(|rules| rules.check(&self.value(row), row))
    }
}

impl<T> Clone for SheetColumn<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            field: self.field.clone(),
            header: self.header.clone(),
            editor: self.editor,
            options: self.options.clone(),
            view: self.view.clone(),
            validation: self.validation.clone(),
        }
    }
}

impl<T> fmt::Debug for SheetColumn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetColumn")
            .field("id", &self.id)
            .field("field", &self.field)
            .field("header", &self.header)
            .field("editor", &self.editor)
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    #[test]
    fn test_select_view_text_uses_label() {
        let column = SheetColumn::<Record>::new("type", "Type").select([
            SelectOption::new("general", "General"),
            SelectOption::new("rule", "Rule"),
        ]);
        let row = Record::new().set("type", "rule");
        assert_eq!(column.view_text(&row), "Rule");
    }

    #[test]
    fn test_select_view_text_integer_value() {
        let column = SheetColumn::<Record>::new("categoryId", "Category").select([
            SelectOption::new("1", "Style"),
            SelectOption::new("2", "Tone"),
        ]);
        assert_eq!(column.view_text(&Record::new().set("categoryId", 2i64)), "Tone");
        assert_eq!(column.view_text(&Record::new().set("categoryId", 7i64)), "7");
    }

    #[test]
    fn test_custom_view() {
        let column = SheetColumn::<Record>::new("priority", "Priority")
            .view(|_, value| format!("P{value}"));
        let row = Record::new().set("priority", 5i64);
        assert_eq!(column.view_text(&row), "P5");
    }

    #[test]
    fn test_check() {
        let column = SheetColumn::<Record>::new("rawContent", "Content")
            .validate(FieldRules::new().required("Content is required"));
        assert_eq!(
            column.check(&Record::new()).as_deref(),
            Some("Content is required")
        );
        assert_eq!(column.check(&Record::new().set("rawContent", "x")), None);
    }
}
