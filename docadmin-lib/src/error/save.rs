//! Save error types

/// Errors that can occur while saving an edit sheet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    /// The mutation collaborator rejected the change-set.
    #[error("save rejected: {message}")]
    Rejected {
        /// Message from the collaborator.
        message: String,
    },

    /// One or more cells failed validation.
    #[error("{count} cell(s) failed validation")]
    Invalid {
        /// Number of failing cells.
        count: usize,
    },

    /// A save is already in flight.
    #[error("a save is already in progress")]
    AlreadySaving,

    /// The sheet is not in edit mode.
    #[error("the sheet is not in edit mode")]
    NotEditing,

    /// The save resolved after its edit session was cancelled or replaced.
    #[error("save result belongs to a superseded edit session")]
    Stale,
}

impl SaveError {
    /// Creates a rejection error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}
