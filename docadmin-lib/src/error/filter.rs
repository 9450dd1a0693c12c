//! Filter value error types

use crate::table::FilterKind;

/// Errors raised when a filter value does not fit its column.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterValueError {
    /// The column has no filter spec.
    #[error("column '{0}' is not filterable")]
    NotFilterable(String),

    /// The value's shape does not match the column's filter kind.
    #[error("column '{column}' expects a {expected} filter, got {actual}")]
    KindMismatch {
        /// Column id.
        column: String,
        /// Kind declared by the column.
        expected: FilterKind,
        /// Kind of the supplied value.
        actual: FilterKind,
    },

    /// A select value that is not one of the column's options.
    #[error("'{value}' is not an option of column '{column}'")]
    UnknownOption {
        /// Column id.
        column: String,
        /// The rejected option value.
        value: String,
    },
}
