//! Server-delegated data table.
//!
//! Paging, filtering and sorting live in controllers owned by the page and
//! passed to the table explicitly. The table itself never reorders or
//! filters rows; it renders whatever the query collaborator returned and
//! turns operator intents into controller updates.

mod column;
mod controllers;
mod data_table;
mod debounce;
mod editor;
mod filter;
mod filtering;
mod layout;
mod paging;
mod rows;
mod slot;
mod sorting;
mod view;
mod visibility;

pub use column::*;
pub use controllers::Controllers;
pub use data_table::{DataTable, DataTableBuilder};
pub use debounce::Debouncer;
pub use editor::*;
pub use filter::*;
pub use filtering::FilteringController;
pub use layout::{TableGrid, Track};
pub use paging::{PagingController, PagingState};
pub use rows::{NumberedRow, TableRow, number_rows, row_key};
pub use slot::*;
pub use sorting::{ColumnSort, SortDirection, SortingController};
pub use view::*;
pub use visibility::ColumnVisibility;
