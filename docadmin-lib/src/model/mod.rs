//! Dynamic record model.
//!
//! [`Record`] is the default row type for both engines: an optional numeric id
//! plus an ordered map of [`Value`]s. Typed row structs can be used instead by
//! implementing [`TableRow`](crate::table::TableRow) and
//! [`SheetRow`](crate::sheet::SheetRow).

mod record;
mod value;

pub use record::Record;
pub use value::Value;
