//! The listing query pipeline and pagination utilities
//!
//! [`query`] is a pure function of its inputs: it filters, sorts and slices
//! borrowed records without mutating them, so calling it twice with the same
//! arguments yields the same page.

use crate::core::filter::FilterSpec;
use crate::core::manager::ManagerDirectory;
use crate::core::property::Property;
use crate::core::sort::SortSpec;
use serde::{Deserialize, Serialize};

/// Which page of the sorted result to show
///
/// # Example
/// ```
/// use estate::core::query::PageSpec;
///
/// let page = PageSpec::new(2, 20);
/// assert_eq!(page.offset(), 20);
/// assert_eq!(page.row_number(0), 21);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSpec {
    /// Page number (starts at 1)
    pub current_page: usize,

    /// Number of items per page
    pub items_per_page: usize,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            current_page: 1,
            items_per_page: 20,
        }
    }
}

impl PageSpec {
    pub fn new(current_page: usize, items_per_page: usize) -> Self {
        Self {
            current_page,
            items_per_page,
        }
    }

    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.current_page.max(1)
    }

    /// Get page size, ensuring minimum of 1
    pub fn limit(&self) -> usize {
        self.items_per_page.max(1)
    }

    /// Index of the first item on this page
    pub fn offset(&self) -> usize {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// 1-based row number shown in the "no" column
    pub fn row_number(&self, index_on_page: usize) -> usize {
        self.offset() + index_on_page + 1
    }

    /// Borrow this page out of a sorted slice; never reads past the end
    pub fn slice<'s, T>(&self, sorted: &'s [T]) -> &'s [T] {
        let start = self.offset().min(sorted.len());
        let end = start.saturating_add(self.limit()).min(sorted.len());
        &sorted[start..end]
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        // Ensure limit and page are at least 1 to avoid division by zero
        let limit = limit.max(1);
        let page = page.max(1);
        let total_pages = total.div_ceil(limit);
        let start = (page - 1).saturating_mul(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }
}

/// One page of a listing plus the counts the pagination control needs
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<'a> {
    /// Records on the requested page, in sorted order
    pub items: Vec<&'a Property>,

    /// Records that passed the filters
    pub total_count: usize,

    /// `ceil(total_count / items_per_page)`
    pub total_pages: usize,

    pub pagination: PaginationMeta,
}

/// Filter then stable-sort, without paginating
///
/// Used by exports and printable reports, which cover every matching record.
pub fn filter_and_sort<'a>(
    records: &'a [Property],
    filters: &FilterSpec,
    sort: &SortSpec,
    directory: &ManagerDirectory,
) -> Vec<&'a Property> {
    let mut matched = filters.apply(records, directory);
    sort.sort(&mut matched);
    matched
}

/// Run the full pipeline: filter, sort, paginate
pub fn query<'a>(
    records: &'a [Property],
    filters: &FilterSpec,
    sort: &SortSpec,
    page: PageSpec,
    directory: &ManagerDirectory,
) -> QueryResult<'a> {
    let sorted = filter_and_sort(records, filters, sort, directory);
    let pagination = PaginationMeta::new(page.page(), page.limit(), sorted.len());

    QueryResult {
        items: page.slice(&sorted).to_vec(),
        total_count: sorted.len(),
        total_pages: pagination.total_pages,
        pagination,
    }
}
