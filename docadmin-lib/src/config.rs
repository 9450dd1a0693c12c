//! Engine configuration.

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;

/// Default number of rows requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default quiet period before a search filter is published.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// Default number of placeholder rows shown while loading.
pub const DEFAULT_SKELETON_ROWS: usize = 5;

/// Tunables shared by the table and sheet engines.
///
/// Every field has a default, so a partial JSON document only overrides what
/// it names.
///
/// # Example
///
/// ```
/// use docadmin_lib::EngineConfig;
///
/// let config = EngineConfig::from_json_str(r#"{"page_size": 25}"#).unwrap();
/// assert_eq!(config.page_size, 25);
/// assert_eq!(config.search_debounce_ms, 300);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Rows per page for paged tables.
    pub page_size: usize,
    /// Debounce window for search-style filter inputs, in milliseconds.
    pub search_debounce_ms: u64,
    /// Skeleton rows rendered while a table is loading.
    pub skeleton_rows: usize,
    /// Ask before discarding unsaved sheet edits.
    pub confirm_discard: bool,
    /// Title of the empty-state row.
    pub empty_title: String,
    /// Description of the empty-state row.
    pub empty_description: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            skeleton_rows: DEFAULT_SKELETON_ROWS,
            confirm_discard: true,
            empty_title: "No results".to_string(),
            empty_description: "There is nothing to show here yet.".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parses a JSON document, filling missing fields with defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }

    /// Returns the search debounce window as a [`Duration`].
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Sets the page size (builder pattern).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the search debounce window (builder pattern).
    pub fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce_ms = delay.as_millis() as u64;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.skeleton_rows, 5);
        assert!(config.confirm_discard);
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_json_str(r#"{"skeleton_rows": 8}"#).unwrap();
        assert_eq!(config.skeleton_rows, 8);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"pageSize": 8}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_zero_page_size() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"page_size": 0}"#),
            Err(ConfigError::ZeroPageSize)
        ));
    }
}
