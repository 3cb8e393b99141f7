//! Filter and sort state for a record view
//!
//! `FilterState` is a value object owned by exactly one view. Its invariant:
//! any mutation other than pagination itself resets the page to 0, so a
//! filter change can never leave the view requesting an out-of-range page.

use std::collections::BTreeMap;

use crate::columns;

/// Sort direction for a single-column sort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A single-column sort
#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    pub column: String,
    pub direction: SortDirection,
}

/// An optional numeric range; an unset bound emits no predicate
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RangeFilter {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// A per-column filter in the raw-data view: substring match for text
/// columns, a floor for the designated numeric columns
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    Text(String),
    Floor(f64),
}

/// The complete description of what a view is currently showing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    states: Vec<String>,
    tiers: Vec<String>,
    segments: Vec<String>,
    sources: Vec<String>,
    score: RangeFilter,
    revenue: RangeFilter,
    for_sale_only: bool,
    search: String,
    column_filters: BTreeMap<String, ColumnFilter>,
    sort: Option<Sort>,
    page: usize,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    // Accessors

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn tiers(&self) -> &[String] {
        &self.tiers
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn score(&self) -> RangeFilter {
        self.score
    }

    pub fn revenue(&self) -> RangeFilter {
        self.revenue
    }

    pub fn for_sale_only(&self) -> bool {
        self.for_sale_only
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn column_filters(&self) -> &BTreeMap<String, ColumnFilter> {
        &self.column_filters
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    // Mutators. Each one re-zeroes the page.

    pub fn toggle_state(&mut self, state: &str) {
        Self::toggle(&mut self.states, state);
        self.page = 0;
    }

    pub fn toggle_tier(&mut self, tier: &str) {
        Self::toggle(&mut self.tiers, tier);
        self.page = 0;
    }

    pub fn toggle_segment(&mut self, segment: &str) {
        Self::toggle(&mut self.segments, segment);
        self.page = 0;
    }

    pub fn toggle_source(&mut self, source: &str) {
        Self::toggle(&mut self.sources, source);
        self.page = 0;
    }

    pub fn set_score_range(&mut self, range: RangeFilter) {
        self.score = range;
        self.page = 0;
    }

    pub fn set_revenue_range(&mut self, range: RangeFilter) {
        self.revenue = range;
        self.page = 0;
    }

    pub fn set_for_sale_only(&mut self, on: bool) {
        self.for_sale_only = on;
        self.page = 0;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 0;
    }

    pub fn set_column_filter(&mut self, column: &str, filter: ColumnFilter) {
        self.column_filters.insert(column.to_string(), filter);
        self.page = 0;
    }

    pub fn clear_column_filter(&mut self, column: &str) {
        self.column_filters.remove(column);
        self.page = 0;
    }

    /// Set the sort column and direction. Columns the registry marks
    /// unsortable are rejected before any query is built.
    pub fn set_sort(&mut self, column: &str, direction: SortDirection) -> Result<(), String> {
        if !columns::is_sortable(column) {
            return Err(format!("Column '{}' is not sortable", column));
        }
        self.sort = Some(Sort { column: column.to_string(), direction });
        self.page = 0;
        Ok(())
    }

    /// Pagination is the one mutation that must not reset itself
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Back to the initial state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn toggle(set: &mut Vec<String>, value: &str) {
        if let Some(idx) = set.iter().position(|v| v == value) {
            set.remove(idx);
        } else {
            set.push(value.to_string());
        }
    }
}
