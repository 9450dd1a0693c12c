//! Configuration error types

/// Errors that can occur while loading an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document is not valid JSON or names an unknown key.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Paging requires a positive page size.
    #[error("page_size must be greater than zero")]
    ZeroPageSize,
}
