//! Table assembly error type

use super::ColumnError;
use super::ContextError;
use super::FilterValueError;

/// Any error raised while building or driving a data table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// Invalid column set.
    #[error(transparent)]
    Column(#[from] ColumnError),

    /// Wiring mistake.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// Filter value does not fit its column.
    #[error(transparent)]
    Filter(#[from] FilterValueError),
}
