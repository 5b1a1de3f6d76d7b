//! Stateful listing view
//!
//! [`ListingView`] owns the user-editable query configuration and keeps the
//! pagination invariants: any change to the filters, or to the page size,
//! sends the user back to page 1. Sorting does not reset the page.
//!
//! The view itself holds no records. [`ListingView::run`] evaluates the
//! pipeline over whatever records the caller currently has resident.

use crate::config::{FALLBACK_COLUMN_WIDTH, ListingConfig, MIN_COLUMN_WIDTH};
use crate::core::filter::{FilterKind, FilterSpec};
use crate::core::manager::ManagerDirectory;
use crate::core::property::Property;
use crate::core::query::{PageSpec, QueryResult, query};
use crate::core::sort::{SortKey, SortSpec};
use crate::preferences::Preferences;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ListingView {
    filters: FilterSpec,
    sort: SortSpec,
    page: PageSpec,
    /// Filter cards shown in the filter bar, in the order they were added
    active_filters: Vec<FilterKind>,
    visible_columns: Vec<String>,
    column_order: Vec<String>,
    column_widths: IndexMap<String, u32>,
    /// Page sizes the pagination control offers; empty allows any size
    page_sizes: Vec<usize>,
}

impl ListingView {
    /// A fresh view with the configured defaults
    pub fn new(config: &ListingConfig) -> Self {
        Self::from_preferences(&Preferences::initial(config), config)
    }

    /// Restore a view from saved preferences, starting on page 1
    pub fn from_preferences(prefs: &Preferences, config: &ListingConfig) -> Self {
        Self {
            filters: prefs.filter_spec(),
            sort: prefs.sort_spec(),
            page: PageSpec::new(1, config.items_per_page),
            active_filters: prefs.active_filters.clone(),
            visible_columns: prefs.visible_columns.clone(),
            column_order: prefs.column_order.clone(),
            column_widths: prefs.column_widths.clone(),
            page_sizes: config.page_sizes.clone(),
        }
    }

    /// Snapshot for the preference store
    ///
    /// The search term and the current page are session state and are not
    /// part of the snapshot.
    pub fn to_preferences(&self) -> Preferences {
        let mut prefs = Preferences {
            sort_rules: self.sort.rules().to_vec(),
            active_filters: self.active_filters.clone(),
            visible_columns: self.visible_columns.clone(),
            column_order: self.column_order.clone(),
            column_widths: self.column_widths.clone(),
            ..Preferences::default()
        };
        prefs.set_filter_spec(&self.filters);
        prefs
    }

    pub fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn page(&self) -> PageSpec {
        self.page
    }

    pub fn active_filters(&self) -> &[FilterKind] {
        &self.active_filters
    }

    pub fn visible_columns(&self) -> &[String] {
        &self.visible_columns
    }

    pub fn column_order(&self) -> &[String] {
        &self.column_order
    }

    /// Current pixel width of `column`
    pub fn column_width(&self, column: &str) -> u32 {
        self.column_widths
            .get(column)
            .copied()
            .unwrap_or(FALLBACK_COLUMN_WIDTH)
    }

    pub fn column_widths(&self) -> &IndexMap<String, u32> {
        &self.column_widths
    }

    /// Columns to render, in display order
    pub fn rendered_columns(&self) -> Vec<&str> {
        self.column_order
            .iter()
            .filter(|c| self.visible_columns.contains(c))
            .map(String::as_str)
            .collect()
    }

    /// Edit the filters; returns whether anything changed
    ///
    /// A change resets the current page to 1.
    pub fn update_filters(&mut self, edit: impl FnOnce(&mut FilterSpec)) -> bool {
        let before = self.filters.clone();
        edit(&mut self.filters);
        let changed = self.filters != before;
        if changed {
            self.page.current_page = 1;
        }
        changed
    }

    pub fn set_search(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        self.update_filters(|f| f.search = term)
    }

    /// Jump to a page; values below 1 select page 1
    ///
    /// The upper bound depends on the records, so it is not checked here.
    /// [`ListingView::run`] reports an empty page past the end; call
    /// [`ListingView::clamp_page`] with its `total_pages` to pull back.
    pub fn set_page(&mut self, page: usize) {
        self.page.current_page = page.max(1);
    }

    /// Move back onto the last page if the current one is past it
    ///
    /// Returns whether the page changed.
    pub fn clamp_page(&mut self, total_pages: usize) -> bool {
        let last = total_pages.max(1);
        if self.page.current_page > last {
            self.page.current_page = last;
            return true;
        }
        false
    }

    /// Change the page size and go back to page 1
    ///
    /// Sizes outside the configured `page_sizes` are rejected and leave the
    /// view unchanged.
    pub fn set_items_per_page(&mut self, items_per_page: usize) -> bool {
        if items_per_page == 0
            || (!self.page_sizes.is_empty() && !self.page_sizes.contains(&items_per_page))
        {
            tracing::debug!(items_per_page, "Ignoring page size that is not offered");
            return false;
        }
        self.page = PageSpec::new(1, items_per_page);
        true
    }

    /// Edit the sort rules
    pub fn update_sort(&mut self, edit: impl FnOnce(&mut SortSpec)) {
        edit(&mut self.sort);
    }

    /// Table-header click on a sortable column
    pub fn click_header(&mut self, key: SortKey) {
        self.sort.toggle_header(key);
    }

    /// Show a filter card; returns false if it was already shown
    pub fn add_filter_card(&mut self, kind: FilterKind) -> bool {
        if self.active_filters.contains(&kind) {
            return false;
        }
        self.active_filters.push(kind);
        true
    }

    /// Hide a filter card and reset the predicate behind it
    pub fn remove_filter_card(&mut self, kind: FilterKind) {
        self.active_filters.retain(|k| *k != kind);
        self.update_filters(|f| f.clear(kind));
    }

    /// Show or hide a column
    pub fn toggle_column(&mut self, column: &str) {
        if let Some(pos) = self.visible_columns.iter().position(|c| c == column) {
            self.visible_columns.remove(pos);
        } else {
            self.visible_columns.push(column.to_string());
        }
    }

    /// Drag `column` to the position currently held by `target`
    pub fn move_column(&mut self, column: &str, target: &str) {
        let Some(from) = self.column_order.iter().position(|c| c == column) else {
            return;
        };
        let Some(to) = self.column_order.iter().position(|c| c == target) else {
            return;
        };
        let moved = self.column_order.remove(from);
        self.column_order.insert(to, moved);
    }

    /// Drag-resize a column; widths below the minimum are raised to it
    ///
    /// Returns false for columns not in the current order.
    pub fn resize_column(&mut self, column: &str, width: u32) -> bool {
        if !self.column_order.iter().any(|c| c == column) {
            return false;
        }
        self.column_widths
            .insert(column.to_string(), width.max(MIN_COLUMN_WIDTH));
        true
    }

    /// Evaluate the pipeline for the current configuration
    pub fn run<'a>(
        &self,
        records: &'a [Property],
        directory: &ManagerDirectory,
    ) -> QueryResult<'a> {
        query(records, &self.filters, &self.sort, self.page, directory)
    }
}
