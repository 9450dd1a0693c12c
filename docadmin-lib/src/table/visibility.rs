//! Column visibility.

use std::collections::HashMap;

use log::debug;

use super::column::ColumnDef;

/// Per-column visibility flags.
///
/// Seeded once from each column's `default_hidden`; after that only the
/// operator changes it. Hiding a column leaves its sort and filter alone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnVisibility {
    visible: HashMap<String, bool>,
}

impl ColumnVisibility {
    /// Seed from column metadata.
    pub fn from_columns<'a, T: 'a>(columns: impl IntoIterator<Item = &'a ColumnDef<T>>) -> Self {
        let visible = columns
            .into_iter()
            .map(|c| (c.id.clone(), !c.meta.default_hidden))
            .collect();
        Self { visible }
    }

    /// Whether a column is shown. Unknown columns are shown.
    pub fn is_visible(&self, column_id: &str) -> bool {
        self.visible.get(column_id).copied().unwrap_or(true)
    }

    /// Flip a column and return its new visibility.
    pub fn toggle(&mut self, column_id: &str) -> bool {
        let visible = !self.is_visible(column_id);
        self.set(column_id, visible);
        visible
    }

    /// Show or hide a column.
    pub fn set(&mut self, column_id: &str, visible: bool) {
        debug!("Column {column_id} visible: {visible}");
        self.visible.insert(column_id.to_string(), visible);
    }

    /// Number of hidden columns.
    pub fn hidden_count(&self) -> usize {
        self.visible.values().filter(|v| !**v).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use crate::table::ColumnSize;

    #[test]
    fn test_seed_and_toggle() {
        let columns = vec![
            ColumnDef::<Record>::new("name", "Name", ColumnSize::fixed(100)),
            ColumnDef::<Record>::new("notes", "Notes", ColumnSize::fixed(100)).hidden(),
        ];
        let mut visibility = ColumnVisibility::from_columns(&columns);
        assert!(visibility.is_visible("name"));
        assert!(!visibility.is_visible("notes"));
        assert_eq!(visibility.hidden_count(), 1);

        assert!(visibility.toggle("notes"));
        assert!(!visibility.toggle("name"));
        assert!(!visibility.is_visible("name"));
    }
}
