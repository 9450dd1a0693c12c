//! Column descriptors.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::ColumnError;

use super::filter::FilterSpec;
use super::rows::TableRow;

/// What a cell renderer gets to see.
#[derive(Debug)]
pub struct CellContext<'a, T> {
    /// The row being rendered.
    pub row: &'a T,
    /// One-based position of the row on the current page.
    pub line_number: usize,
    /// Id of the column being rendered.
    pub column_id: &'a str,
}

/// Custom cell renderer.
pub type CellRenderer<T> = Arc<dyn Fn(&CellContext<'_, T>) -> String + Send + Sync>;

/// Horizontal alignment of a column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Left aligned
    #[default]
    Left,
    /// Centered
    Center,
    /// Right aligned
    Right,
}

/// Width bounds of a column, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSize {
    /// Usability floor.
    pub min: u32,
    /// Growth ceiling.
    pub max: u32,
}

impl ColumnSize {
    /// Bounds from `min` to `max`.
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// A column that never resizes.
    pub const fn fixed(width: u32) -> Self {
        Self {
            min: width,
            max: width,
        }
    }

    /// Midpoint of the bounds.
    pub fn average(&self) -> f64 {
        (f64::from(self.min) + f64::from(self.max)) / 2.0
    }
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeta {
    /// Width bounds.
    pub size: ColumnSize,
    /// Cell alignment.
    pub align: Option<Align>,
    /// Starts hidden.
    pub default_hidden: bool,
    /// Header click toggles sorting.
    pub sortable: bool,
    /// Filter editor for the column, if any.
    pub filter: Option<FilterSpec>,
}

impl ColumnMeta {
    /// Metadata with the given size and everything else off.
    pub fn new(size: ColumnSize) -> Self {
        Self {
            size,
            align: None,
            default_hidden: false,
            sortable: false,
            filter: None,
        }
    }
}

/// One table column.
pub struct ColumnDef<T> {
    /// Unique id within the column set.
    pub id: String,
    /// Header text. `None` renders an empty header.
    pub header: Option<String>,
    /// Custom renderer. Without one the row's own cell text is used.
    pub cell: Option<CellRenderer<T>>,
    /// Metadata.
    pub meta: ColumnMeta,
}

impl<T> ColumnDef<T> {
    /// New column with a header and size bounds.
    pub fn new(id: impl Into<String>, header: impl Into<String>, size: ColumnSize) -> Self {
        Self {
            id: id.into(),
            header: Some(header.into()),
            cell: None,
            meta: ColumnMeta::new(size),
        }
    }

    /// Drop the header text.
    pub fn without_header(mut self) -> Self {
        self.header = None;
        self
    }

    /// Set the cell renderer.
    pub fn cell<F>(mut self, render: F) -> Self
    where
        F: Fn(&CellContext<'_, T>) -> String + Send + Sync + 'static,
    {
        self.cell = Some(Arc::new(render));
        self
    }

    /// Set the alignment.
    pub fn align(mut self, align: Align) -> Self {
        self.meta.align = Some(align);
        self
    }

    /// Mark as sortable.
    pub fn sortable(mut self) -> Self {
        self.meta.sortable = true;
        self
    }

    /// Start hidden.
    pub fn hidden(mut self) -> Self {
        self.meta.default_hidden = true;
        self
    }

    /// Attach a filter.
    pub fn filter(mut self, spec: FilterSpec) -> Self {
        self.meta.filter = Some(spec);
        self
    }

    /// Label used by the filter bar: the filter's own label, then the
    /// header, then the id.
    pub fn filter_label(&self) -> String {
        self.meta
            .filter
            .as_ref()
            .and_then(FilterSpec::label)
            .or(self.header.as_deref())
            .unwrap_or(&self.id)
            .to_string()
    }
}

impl<T: TableRow> ColumnDef<T> {
    /// Render this column's cell for a row.
    pub fn render_cell(&self, row: &T, line_number: usize) -> String {
        match &self.cell {
            Some(render) => render(&CellContext {
                row,
                line_number,
                column_id: &self.id,
            }),
            None => row.cell_text(&self.id),
        }
    }
}

impl<T> Clone for ColumnDef<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            cell: self.cell.clone(),
            meta: self.meta.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("cell", &self.cell.as_ref().map(|_| "<renderer>"))
            .field("meta", &self.meta)
            .finish()
    }
}

/// Validated, ordered column set.
#[derive(Debug)]
pub struct ColumnSet<T> {
    columns: Vec<ColumnDef<T>>,
}

impl<T> ColumnSet<T> {
    /// Checks id uniqueness and size bounds.
    pub fn new(columns: Vec<ColumnDef<T>>) -> Result<Self, ColumnError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.id.as_str()) {
                return Err(ColumnError::Duplicate(column.id.clone()));
            }
            let size = column.meta.size;
            if size.min > size.max {
                return Err(ColumnError::InvalidSize {
                    id: column.id.clone(),
                    min: size.min,
                    max: size.max,
                });
            }
        }
        Ok(Self { columns })
    }

    /// All columns in declaration order.
    pub fn columns(&self) -> &[ColumnDef<T>] {
        &self.columns
    }

    /// Column by id.
    pub fn get(&self, id: &str) -> Option<&ColumnDef<T>> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate the columns.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnDef<T>> {
        self.columns.iter()
    }
}

impl<T> Clone for ColumnSet<T> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
        }
    }
}

/// Id of the line-number column.
pub const LINE_NUMBER_COLUMN: &str = "lineNumber";

/// Centered `#` column showing each row's position on the page.
pub fn line_number_column<T: 'static>() -> ColumnDef<T> {
    ColumnDef::new(LINE_NUMBER_COLUMN, "#", ColumnSize::fixed(80))
        .align(Align::Center)
        .cell(|ctx: &CellContext<'_, T>| ctx.line_number.to_string())
}

/// Which timestamp a [`date_column`] shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    /// `createdAt`
    Created,
    /// `updatedAt`
    Updated,
}

impl DateField {
    /// Column id.
    pub fn id(&self) -> &'static str {
        match self {
            DateField::Created => "createdAt",
            DateField::Updated => "updatedAt",
        }
    }

    /// Header text.
    pub fn header(&self) -> &'static str {
        match self {
            DateField::Created => "Created",
            DateField::Updated => "Updated",
        }
    }
}

/// Sortable timestamp column with a date-range filter.
pub fn date_column<T>(field: DateField) -> ColumnDef<T> {
    ColumnDef::new(field.id(), field.header(), ColumnSize::new(150, 250))
        .sortable()
        .filter(FilterSpec::date_range())
}
