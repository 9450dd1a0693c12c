//! Context-misuse error types

/// Programming errors in how a table is assembled or addressed.
///
/// These are not meant to be recovered from at runtime; they surface wiring
/// mistakes as early as possible.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// A slot or sub-view needs a controller the table was built without.
    #[error("{slot} requires a {controller} controller")]
    MissingController {
        /// The slot or sub-view that was used.
        slot: &'static str,
        /// The controller it needs.
        controller: &'static str,
    },

    /// A column id that is not part of the table's column set.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
}

impl ContextError {
    /// Creates a missing-controller error.
    pub fn missing(slot: &'static str, controller: &'static str) -> Self {
        Self::MissingController { slot, controller }
    }
}
