//! Document admin engines
//!
//! Headless interaction models for the admin console's two grid surfaces:
//!
//! - [`table`] - server-delegated data table (paging, filtering and sorting
//!   controllers, grid sizing, column visibility, slotted composition root)
//! - [`sheet`] - batch-editable sheet (view/edit state machine, draft rows,
//!   per-cell validation, change-set diffing, keyboard navigation)
//!
//! Both engines produce plain view structs instead of drawing anything, and
//! talk to the outside world through the traits in [`source`].

pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod sheet;
pub mod source;
pub mod table;

pub use config::EngineConfig;
