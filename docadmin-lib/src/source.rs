//! Collaborator seams.
//!
//! The engines never talk to a transport directly. Hosts plug in a
//! [`QuerySource`] for paged reads, a [`MutationSink`] for sheet saves, an
//! [`ErrorSink`] for fetch failures and a [`Confirm`] prompt for discarding
//! edits.

use async_trait::async_trait;
use log::error;
use serde::Deserialize;
use serde::Serialize;

use crate::error::{FetchError, SaveError};
use crate::table::{ColumnFilter, ColumnSort};

/// Everything a query collaborator needs to fetch one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    /// Rows per page.
    pub limit: usize,
    /// Index of the first row.
    pub offset: usize,
    /// Active filters.
    pub filters: Vec<ColumnFilter>,
    /// Active sorts, primary first.
    pub sorting: Vec<ColumnSort>,
}

/// Totals reported alongside a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageTotals {
    /// Page count.
    pub pages: usize,
    /// Record count.
    pub records: usize,
}

impl PageTotals {
    /// Totals for `records` rows split into pages of `limit`.
    pub fn for_records(records: usize, limit: usize) -> Self {
        Self {
            pages: records.div_ceil(limit.max(1)),
            records,
        }
    }
}

/// Paging block of a query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Offset the page was fetched at.
    pub offset: usize,
    /// Page size used.
    pub limit: usize,
    /// Totals.
    pub total: PageTotals,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    /// Rows in final display order.
    pub results: Vec<T>,
    /// Paging block.
    pub paging: PageInfo,
}

/// Supplies paged, filtered and sorted rows.
#[async_trait]
pub trait QuerySource<T>: Send + Sync {
    /// Fetch one page.
    async fn fetch(&self, params: &QueryParams) -> Result<PageResult<T>, FetchError>;
}

/// Persists a sheet's change set.
#[async_trait]
pub trait MutationSink<P: Send + 'static>: Send + Sync {
    /// Apply the payload. Nothing is applied on error.
    async fn apply(&self, payload: P) -> Result<(), SaveError>;
}

/// Receives fetch failures.
pub trait ErrorSink: Send + Sync {
    /// Report a failure.
    fn report(&self, error: &FetchError);
}

/// [`ErrorSink`] that writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogErrorSink;

impl ErrorSink for LogErrorSink {
    fn report(&self, err: &FetchError) {
        error!("Query failed: {err}");
    }
}

/// Blocking yes/no prompt.
pub trait Confirm {
    /// Ask the operator; `true` means proceed.
    fn confirm(&self, message: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_totals() {
        assert_eq!(PageTotals::for_records(0, 10).pages, 0);
        assert_eq!(PageTotals::for_records(10, 10).pages, 1);
        assert_eq!(PageTotals::for_records(11, 10).pages, 2);
    }

    #[test]
    fn test_closure_confirm() {
        let yes = |_: &str| true;
        assert!(yes.confirm("sure?"));
    }
}
