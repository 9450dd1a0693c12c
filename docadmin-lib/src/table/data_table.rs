//! Table composition root.

use std::fmt;

use log::{debug, info};

use crate::config::EngineConfig;
use crate::error::{ContextError, FetchError, FilterValueError, TableError};
use crate::input::{EventResult, Modifiers};
use crate::source::{ErrorSink, PageResult, QuerySource};

use super::column::{ColumnDef, ColumnSet};
use super::controllers::Controllers;
use super::editor::FilterEditor;
use super::filter::FilterValue;
use super::layout::TableGrid;
use super::rows::{NumberedRow, TableRow, number_rows};
use super::slot::{Slot, Slots};
use super::view::{
    BodyView, CellView, EmptyState, FilterBarView, FilterEntryView, HeaderCellView,
    PaginationView, RowView, SortIndicator, TableView,
};
use super::visibility::ColumnVisibility;

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`DataTable`].
pub struct DataTableBuilder<T> {
    id: String,
    columns: Vec<ColumnDef<T>>,
    rows: Vec<T>,
    loading: bool,
    error: Option<FetchError>,
    empty_state: Option<EmptyState>,
    controllers: Controllers,
    slots: Vec<Slot>,
    config: EngineConfig,
}

impl<T: TableRow + Clone> DataTableBuilder<T> {
    /// Initial rows.
    pub fn rows(mut self, rows: Vec<T>) -> Self {
        self.rows = rows;
        self
    }

    /// Start in the loading state.
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Start with an error.
    pub fn error(mut self, error: FetchError) -> Self {
        self.error = Some(error);
        self
    }

    /// Empty-state content. Defaults to the config's title and description.
    pub fn empty_state(mut self, empty: EmptyState) -> Self {
        self.empty_state = Some(empty);
        self
    }

    /// Controllers the table reads from.
    pub fn controllers(mut self, controllers: Controllers) -> Self {
        self.controllers = controllers;
        self
    }

    /// Add a slot.
    pub fn slot(mut self, slot: Slot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Engine configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the columns and wiring and build the table.
    pub fn build(self) -> Result<DataTable<T>, TableError> {
        let columns = ColumnSet::new(self.columns)?;

        if self.slots.contains(&Slot::Filters) && self.controllers.filtering.is_none() {
            return Err(ContextError::missing(Slot::Filters.name(), "filtering").into());
        }

        let filter_editors = match &self.controllers.filtering {
            Some(filtering) => columns
                .iter()
                .filter_map(|c| {
                    FilterEditor::for_column(c, filtering, self.config.search_debounce())
                })
                .collect(),
            None => Vec::new(),
        };

        let empty_state = self.empty_state.unwrap_or_else(|| {
            EmptyState::new(
                self.config.empty_title.clone(),
                self.config.empty_description.clone(),
            )
        });

        let visibility = ColumnVisibility::from_columns(columns.iter());
        let rows = number_rows(&self.id, &self.rows);

        debug!(
            "Built table '{}' with {} columns ({} filterable)",
            self.id,
            columns.len(),
            filter_editors.len()
        );

        Ok(DataTable {
            id: self.id,
            columns,
            rows,
            loading: self.loading,
            error: self.error,
            empty_state,
            skeleton_rows: self.config.skeleton_rows,
            controllers: self.controllers,
            slots: Slots::collect(self.slots),
            visibility,
            filter_editors,
        })
    }
}

// =============================================================================
// DataTable
// =============================================================================

/// Headless data table.
///
/// Rows arrive already filtered, sorted and paged by the query collaborator.
/// The table numbers them, tracks column visibility, routes header clicks and
/// filter edits to the controllers, and renders a [`TableView`].
pub struct DataTable<T> {
    id: String,
    columns: ColumnSet<T>,
    rows: Vec<NumberedRow<T>>,
    loading: bool,
    error: Option<FetchError>,
    empty_state: EmptyState,
    skeleton_rows: usize,
    controllers: Controllers,
    slots: Slots,
    visibility: ColumnVisibility,
    filter_editors: Vec<FilterEditor>,
}

impl<T: TableRow + Clone> DataTable<T> {
    /// Start building a table.
    pub fn builder(id: impl Into<String>, columns: Vec<ColumnDef<T>>) -> DataTableBuilder<T> {
        DataTableBuilder {
            id: id.into(),
            columns,
            rows: Vec::new(),
            loading: false,
            error: None,
            empty_state: None,
            controllers: Controllers::default(),
            slots: Vec::new(),
            config: EngineConfig::default(),
        }
    }

    /// Table id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The controllers this table reads from.
    pub fn controllers(&self) -> &Controllers {
        &self.controllers
    }

    /// All columns, visible or not.
    pub fn columns(&self) -> &ColumnSet<T> {
        &self.columns
    }

    /// Current rows with their line numbers and keys.
    pub fn rows(&self) -> &[NumberedRow<T>] {
        &self.rows
    }

    /// Whether the table is loading.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Current error, if any.
    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    // -------------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------------

    /// Replace the rows and renumber them.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = number_rows(&self.id, &rows);
    }

    /// Enter or leave the loading state.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Set or clear the error.
    pub fn set_error(&mut self, error: Option<FetchError>) {
        self.error = error;
    }

    /// Apply a query result: rows and totals on success, the error row and a
    /// report to `sink` on failure.
    pub fn apply_result(&mut self, result: Result<PageResult<T>, FetchError>, sink: &dyn ErrorSink) {
        self.loading = false;
        match result {
            Ok(page) => {
                self.controllers.apply_page(&page);
                self.error = None;
                self.set_rows(page.results);
            }
            Err(err) => {
                sink.report(&err);
                self.error = Some(err);
            }
        }
    }

    /// Fetch the page the controllers describe and apply it.
    pub async fn refresh<S>(&mut self, source: &S, sink: &dyn ErrorSink)
    where
        S: QuerySource<T> + ?Sized,
    {
        self.loading = true;
        let result = self.controllers.load(source).await;
        self.apply_result(result, sink);
    }

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    fn column(&self, column_id: &str) -> Result<&ColumnDef<T>, ContextError> {
        self.columns
            .get(column_id)
            .ok_or_else(|| ContextError::UnknownColumn(column_id.to_string()))
    }

    /// Columns currently shown, in declaration order.
    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnDef<T>> {
        self.columns
            .iter()
            .filter(|c| self.visibility.is_visible(&c.id))
    }

    /// Show or hide a column. Sort and filter state are left alone.
    pub fn toggle_column_visibility(&mut self, column_id: &str) -> Result<bool, ContextError> {
        self.column(column_id)?;
        Ok(self.visibility.toggle(column_id))
    }

    /// Column visibility map.
    pub fn visibility(&self) -> &ColumnVisibility {
        &self.visibility
    }

    /// Grid for the visible columns.
    pub fn grid(&self) -> TableGrid {
        TableGrid::for_columns(self.visible_columns())
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Header click. Shift accumulates sorts; otherwise the clicked column
    /// becomes the only sort. Non-sortable columns ignore the click.
    pub fn header_click(&self, column_id: &str, modifiers: Modifiers) -> EventResult {
        let Ok(column) = self.column(column_id) else {
            return EventResult::Ignored;
        };
        let Some(sorting) = &self.controllers.sorting else {
            return EventResult::Ignored;
        };
        if !column.meta.sortable {
            return EventResult::Ignored;
        }

        sorting.toggle_sort(column_id, modifiers.shift);
        EventResult::Consumed
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Set a column filter after checking it fits the column's filter kind.
    ///
    /// Only that column's editor is reloaded; pending search input on other
    /// columns keeps its timer.
    pub fn set_filter(
        &mut self,
        column_id: &str,
        value: Option<FilterValue>,
    ) -> Result<bool, TableError> {
        let column = self.column(column_id)?;
        let spec = column
            .meta
            .filter
            .as_ref()
            .ok_or_else(|| FilterValueError::NotFilterable(column_id.to_string()))?;
        if let Some(value) = &value {
            spec.check(column_id, value)?;
        }

        let filtering = self
            .controllers
            .filtering
            .as_ref()
            .ok_or_else(|| ContextError::missing("set_filter", "filtering"))?;

        let changed = filtering.set_filter(column_id, value);
        if let Some(editor) = self.filter_editor_mut(column_id) {
            editor.sync();
        }
        Ok(changed)
    }

    /// Clear every filter ("Clear All").
    pub fn clear_all_filters(&mut self) -> Result<(), ContextError> {
        let filtering = self
            .controllers
            .filtering
            .as_ref()
            .ok_or_else(|| ContextError::missing("clear_all_filters", "filtering"))?;
        info!("Clearing all filters on '{}'", self.id);
        filtering.clear_all_filters();
        self.sync_filter_editors();
        Ok(())
    }

    /// Filter editors, one per filterable column.
    pub fn filter_editors(&self) -> &[FilterEditor] {
        &self.filter_editors
    }

    /// Editor for one column.
    pub fn filter_editor_mut(&mut self, column_id: &str) -> Option<&mut FilterEditor> {
        self.filter_editors
            .iter_mut()
            .find(|e| e.column_id() == column_id)
    }

    /// Reload editor inputs after filters changed outside the editors.
    pub fn sync_filter_editors(&mut self) {
        self.filter_editors.iter_mut().for_each(FilterEditor::sync);
    }

    // -------------------------------------------------------------------------
    // Render
    // -------------------------------------------------------------------------

    fn render_header(&self) -> Vec<HeaderCellView> {
        self.visible_columns()
            .map(|column| HeaderCellView {
                column_id: column.id.clone(),
                label: column.header.clone().unwrap_or_default(),
                align: column.meta.align.unwrap_or_default(),
                sort: self
                    .controllers
                    .sorting
                    .as_ref()
                    .filter(|_| column.meta.sortable)
                    .map(|sorting| SortIndicator {
                        direction: sorting.direction(&column.id),
                        priority: sorting.priority(&column.id),
                    }),
            })
            .collect()
    }

    fn render_body(&self) -> BodyView {
        if self.loading {
            return BodyView::Skeleton {
                rows: self.skeleton_rows,
                columns: self.visible_columns().count(),
            };
        }
        if let Some(err) = &self.error {
            return BodyView::Error {
                name: err.name.clone(),
                message: err.message.clone(),
            };
        }
        if self.rows.is_empty() {
            return BodyView::Empty(self.empty_state.clone());
        }

        let visible: Vec<&ColumnDef<T>> = self.visible_columns().collect();
        let rows = self
            .rows
            .iter()
            .map(|numbered| RowView {
                key: numbered.key.clone(),
                line_number: numbered.line_number,
                cells: visible
                    .iter()
                    .map(|column| CellView {
                        column_id: column.id.clone(),
                        text: column.render_cell(&numbered.row, numbered.line_number),
                        align: column.meta.align.unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect();
        BodyView::Rows(rows)
    }

    fn render_filter_bar(&self) -> Option<FilterBarView> {
        if !self.slots.filters || self.filter_editors.is_empty() {
            return None;
        }

        let entries = self
            .filter_editors
            .iter()
            .map(|editor| FilterEntryView {
                column_id: editor.column_id().to_string(),
                label: editor.label().to_string(),
                kind: editor.kind(),
                active: editor.is_active(),
                summary: editor.summary(),
            })
            .collect();

        Some(FilterBarView {
            entries,
            show_clear_all: self
                .controllers
                .filtering
                .as_ref()
                .is_some_and(|f| f.has_active()),
        })
    }

    fn render_pagination(&self) -> Option<PaginationView> {
        self.controllers.paging.as_ref().map(|paging| PaginationView {
            label: paging.page_label(),
            can_prev: paging.can_prev(),
            can_next: paging.can_next(),
        })
    }

    /// Render the current state.
    pub fn render(&self) -> TableView {
        TableView {
            id: self.id.clone(),
            title_bar: self.slots.title_bar.clone(),
            header_slot: self.slots.header.clone(),
            filter_bar: self.render_filter_bar(),
            grid_template: self.grid().template(),
            header: self.render_header(),
            body: self.render_body(),
            pagination: self.render_pagination(),
        }
    }
}

impl<T> fmt::Debug for DataTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("id", &self.id)
            .field("rows", &self.rows.len())
            .field("loading", &self.loading)
            .field("error", &self.error)
            .field("controllers", &self.controllers)
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}
