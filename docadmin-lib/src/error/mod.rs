//! Error types

mod column;
mod config;
mod context;
mod fetch;
mod filter;
mod save;
mod table;

pub use column::*;
pub use config::*;
pub use context::*;
pub use fetch::*;
pub use filter::*;
pub use save::*;
pub use table::*;
