//! Column definition error types

/// Errors raised when a column set violates its invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnError {
    /// Two columns share an id.
    #[error("duplicate column id '{0}'")]
    Duplicate(String),

    /// A column's minimum width exceeds its maximum width.
    #[error("column '{id}' has min width {min} greater than max width {max}")]
    InvalidSize {
        /// Column id.
        id: String,
        /// Declared minimum width.
        min: u32,
        /// Declared maximum width.
        max: u32,
    },
}
