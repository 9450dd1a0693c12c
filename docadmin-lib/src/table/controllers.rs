//! Controller bundle owned by the page.

use log::{debug, warn};

use crate::error::FetchError;
use crate::source::{PageResult, QueryParams, QuerySource};

use super::filtering::FilteringController;
use super::paging::PagingController;
use super::sorting::SortingController;

/// The three controllers a server-driven table reads from.
///
/// Each one is optional so a table can opt out of paging, filtering or
/// sorting. The bundle is a set of handles; cloning it shares state.
#[derive(Debug, Clone, Default)]
pub struct Controllers {
    /// Paging, if the table is paged.
    pub paging: Option<PagingController>,
    /// Filtering, if the table is filterable.
    pub filtering: Option<FilteringController>,
    /// Sorting, if the table is sortable.
    pub sorting: Option<SortingController>,
}

impl Controllers {
    /// All three controllers with the given page size.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            paging: Some(PagingController::with_limit(page_size)),
            filtering: Some(FilteringController::new()),
            sorting: Some(SortingController::new()),
        }
    }

    /// Attach a paging controller (builder pattern).
    pub fn paging(mut self, paging: PagingController) -> Self {
        self.paging = Some(paging);
        self
    }

    /// Attach a filtering controller (builder pattern).
    pub fn filtering(mut self, filtering: FilteringController) -> Self {
        self.filtering = Some(filtering);
        self
    }

    /// Attach a sorting controller (builder pattern).
    pub fn sorting(mut self, sorting: SortingController) -> Self {
        self.sorting = Some(sorting);
        self
    }

    /// Combined change counter. Changes whenever any controller changes.
    pub fn revision(&self) -> u64 {
        self.paging.as_ref().map_or(0, PagingController::revision)
            + self.filtering.as_ref().map_or(0, FilteringController::revision)
            + self.sorting.as_ref().map_or(0, SortingController::revision)
    }

    /// Query parameters for the current state.
    ///
    /// Without paging the whole result set is requested.
    pub fn query(&self) -> QueryParams {
        let (limit, offset) = self
            .paging
            .as_ref()
            .map_or((usize::MAX, 0), |p| (p.limit(), p.offset()));

        QueryParams {
            limit,
            offset,
            filters: self
                .filtering
                .as_ref()
                .map(FilteringController::filters)
                .unwrap_or_default(),
            sorting: self
                .sorting
                .as_ref()
                .map(SortingController::sorting)
                .unwrap_or_default(),
        }
    }

    /// Feed a result's page count back into the paging controller.
    pub fn apply_page<T>(&self, result: &PageResult<T>) {
        if let Some(paging) = &self.paging {
            paging.set_total_pages(result.paging.total.pages);
        }
    }

    /// Fetch the current page and record its totals.
    pub async fn load<T, S>(&self, source: &S) -> Result<PageResult<T>, FetchError>
    where
        S: QuerySource<T> + ?Sized,
    {
        let params = self.query();
        debug!(
            "Loading page: offset {} limit {} ({} filters, {} sorts)",
            params.offset,
            params.limit,
            params.filters.len(),
            params.sorting.len()
        );

        match source.fetch(&params).await {
            Ok(result) => {
                self.apply_page(&result);
                Ok(result)
            }
            Err(err) => {
                warn!("Page load failed: {err}");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{ColumnSort, FilterValue};

    #[test]
    fn test_query_reflects_controllers() {
        let controllers = Controllers::with_page_size(20);
        if let Some(paging) = &controllers.paging {
            paging.next_page();
        }
        if let Some(filtering) = &controllers.filtering {
            filtering.set_filter("name", Some(FilterValue::search("Alp")));
        }
        if let Some(sorting) = &controllers.sorting {
            sorting.toggle_sort("name", false);
        }

        let query = controllers.query();
        assert_eq!(query.limit, 20);
        assert_eq!(query.offset, 20);
        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.sorting, vec![ColumnSort::asc("name")]);
    }

    #[test]
    fn test_query_without_paging() {
        let query = Controllers::default().query();
        assert_eq!(query.offset, 0);
        assert_eq!(query.limit, usize::MAX);
        assert!(query.filters.is_empty());
    }

    #[test]
    fn test_revision_moves() {
        let controllers = Controllers::with_page_size(10);
        let before = controllers.revision();
        if let Some(sorting) = &controllers.sorting {
            sorting.toggle_sort("id", false);
        }
        assert!(controllers.revision() > before);
    }
}
