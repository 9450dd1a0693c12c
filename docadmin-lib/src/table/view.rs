//! Render output of the data table.
//!
//! Plain data describing what a frontend should draw. Nothing here holds a
//! reference back into the table.

use super::column::Align;
use super::filter::FilterKind;
use super::slot::TitleBar;
use super::sorting::SortDirection;

/// Sort state drawn next to a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortIndicator {
    /// Active direction, if sorted.
    pub direction: Option<SortDirection>,
    /// Zero-based sort priority, if sorted.
    pub priority: Option<usize>,
}

impl SortIndicator {
    /// Arrow glyph: up, down, or the neutral double arrow.
    pub fn glyph(&self) -> char {
        match self.direction {
            Some(SortDirection::Asc) => '↑',
            Some(SortDirection::Desc) => '↓',
            None => '↕',
        }
    }

    /// One-based priority badge, shown only for secondary sorts.
    pub fn badge(&self) -> Option<usize> {
        self.priority.filter(|p| *p > 0).map(|p| p + 1)
    }
}

/// One header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCellView {
    /// Column id.
    pub column_id: String,
    /// Header text, empty when the column has none.
    pub label: String,
    /// Alignment.
    pub align: Align,
    /// Sort indicator, for sortable columns only.
    pub sort: Option<SortIndicator>,
}

/// One body cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    /// Column id.
    pub column_id: String,
    /// Rendered text.
    pub text: String,
    /// Alignment.
    pub align: Align,
}

/// One body row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// Table-scoped row key.
    pub key: String,
    /// One-based position on the page.
    pub line_number: usize,
    /// Cells for the visible columns.
    pub cells: Vec<CellView>,
}

/// Empty-state content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Icon name, if the host wants a specific one.
    pub icon: Option<String>,
    /// Headline.
    pub title: String,
    /// Supporting text.
    pub description: String,
}

impl EmptyState {
    /// Empty state without an icon.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            icon: None,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Set the icon (builder pattern).
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Table body, one of four mutually exclusive states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyView {
    /// Placeholder rows while loading.
    Skeleton {
        /// Placeholder row count.
        rows: usize,
        /// Cells per placeholder row.
        columns: usize,
    },
    /// Full-width error row.
    Error {
        /// Error name.
        name: String,
        /// Error message.
        message: String,
    },
    /// Full-width empty-state row.
    Empty(EmptyState),
    /// Data rows.
    Rows(Vec<RowView>),
}

/// One entry of the filter bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterEntryView {
    /// Column id.
    pub column_id: String,
    /// Label shown above the editor.
    pub label: String,
    /// Editor kind.
    pub kind: FilterKind,
    /// Whether the column has an active filter.
    pub active: bool,
    /// Short text for the current value.
    pub summary: String,
}

/// The filter bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterBarView {
    /// Entries in column order.
    pub entries: Vec<FilterEntryView>,
    /// Whether to show "Clear All".
    pub show_clear_all: bool,
}

/// Pagination footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    /// e.g. `"2 / 5"`.
    pub label: String,
    /// "Previous" enabled.
    pub can_prev: bool,
    /// "Next" enabled.
    pub can_next: bool,
}

/// Everything needed to draw one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    /// Table id.
    pub id: String,
    /// Title bar slot.
    pub title_bar: Option<TitleBar>,
    /// Custom header slot.
    pub header_slot: Option<String>,
    /// Filter bar, when the filters slot is present and some column is
    /// filterable.
    pub filter_bar: Option<FilterBarView>,
    /// Grid track template for the visible columns.
    pub grid_template: String,
    /// Header row.
    pub header: Vec<HeaderCellView>,
    /// Body.
    pub body: BodyView,
    /// Footer, when the table is paged.
    pub pagination: Option<PaginationView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_only_for_secondary() {
        let primary = SortIndicator {
            direction: Some(SortDirection::Asc),
            priority: Some(0),
        };
        let secondary = SortIndicator {
            direction: Some(SortDirection::Desc),
            priority: Some(1),
        };
        assert_eq!(primary.badge(), None);
        assert_eq!(secondary.badge(), Some(2));
        assert_eq!(secondary.glyph(), '↓');
    }
}
