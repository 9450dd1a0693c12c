//! Data-fetch error type

/// Error reported by the query collaborator.
///
/// Tables render this as a full-width error row instead of failing, so it only
/// needs a name and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{name}: {message}")]
pub struct FetchError {
    /// Short error class, shown as the alert title.
    pub name: String,
    /// Human-readable description.
    pub message: String,
}

impl FetchError {
    /// Creates a generic fetch error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            name: "Error".to_string(),
            message: message.into(),
        }
    }

    /// Creates a fetch error with an explicit name.
    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}
