//! The firm explorer
//!
//! The main browsing surface: full filter panel, sortable table, 50 rows per
//! page, best acquisition candidates first. A thin facade over
//! `RecordBrowser` that fixes the column set, the page size and the default
//! order, and debounces the free-text search.

use std::sync::Arc;
use std::time::Duration;

use fa_core::{FilterState, RangeFilter, SortDirection};
use fa_data::{OrderBy, QueryBuilder, QueryExecutor, FIRMS_TABLE};

use crate::browser::{BrowserSnapshot, RecordBrowser};
use crate::debounce::Debouncer;

pub const EXPLORER_PAGE_SIZE: usize = 50;

const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Columns the explorer table shows, in display order
const EXPLORER_COLUMNS: &[&str] = &[
    "firm_id",
    "firm_name",
    "city",
    "state",
    "acquisition_score",
    "acquisition_tier",
    "client_segment",
    "estimated_revenue",
    "google_rating",
    "google_review_count",
    "for_sale",
    "phone",
    "website",
    "sources",
];

pub struct FirmExplorer {
    browser: Arc<RecordBrowser>,
    search_debounce: Debouncer,
}

impl FirmExplorer {
    pub fn new(executor: QueryExecutor) -> Self {
        let builder = QueryBuilder::new(FIRMS_TABLE, EXPLORER_COLUMNS, EXPLORER_PAGE_SIZE)
            .with_default_order(OrderBy {
                column: "acquisition_score".into(),
                direction: SortDirection::Descending,
            });
        Self {
            browser: Arc::new(RecordBrowser::new(executor, builder)),
            search_debounce: Debouncer::new(SEARCH_DEBOUNCE),
        }
    }

    pub fn snapshot(&self) -> BrowserSnapshot {
        self.browser.snapshot()
    }

    pub fn filters(&self) -> FilterState {
        self.browser.filters()
    }

    pub fn page_size(&self) -> usize {
        EXPLORER_PAGE_SIZE
    }

    /// Initial load, and the reload path after an inline error
    pub async fn load(&self) {
        self.browser.refresh().await;
    }

    pub async fn toggle_state(&self, state: &str) {
        self.browser.apply(|f| f.toggle_state(state)).await;
    }

    pub async fn toggle_tier(&self, tier: &str) {
        self.browser.apply(|f| f.toggle_tier(tier)).await;
    }

    pub async fn toggle_segment(&self, segment: &str) {
        self.browser.apply(|f| f.toggle_segment(segment)).await;
    }

    pub async fn toggle_source(&self, source: &str) {
        self.browser.apply(|f| f.toggle_source(source)).await;
    }

    pub async fn set_score_range(&self, range: RangeFilter) {
        self.browser.apply(|f| f.set_score_range(range)).await;
    }

    pub async fn set_revenue_range(&self, range: RangeFilter) {
        self.browser.apply(|f| f.set_revenue_range(range)).await;
    }

    pub async fn set_for_sale_only(&self, on: bool) {
        self.browser.apply(|f| f.set_for_sale_only(on)).await;
    }

    /// Debounced: queries fire once typing pauses, not per keystroke
    pub fn set_search(&self, search: impl Into<String>) {
        let browser = self.browser.clone();
        let search = search.into();
        self.search_debounce.submit("search", async move {
            browser.apply(|f| f.set_search(search)).await;
        });
    }

    pub async fn set_sort(&self, column: &str, direction: SortDirection) -> Result<(), String> {
        self.browser.try_apply(|f| f.set_sort(column, direction)).await
    }

    pub async fn go_to_page(&self, page: i64) {
        self.browser.go_to_page(page).await;
    }

    pub async fn clear_filters(&self) {
        self.browser.apply(FilterState::reset).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fa_core::{Row, Value};
    use fa_data::MemoryStore;

    fn firm(id: usize, name: &str, state: &str, score: Option<f64>) -> Row {
        let mut row = Row::new();
        row.insert("firm_id".into(), Value::Number(id as f64));
        row.insert("firm_name".into(), name.into());
        row.insert("city".into(), "Tampa".into());
        row.insert("state".into(), state.into());
        row.insert(
            "acquisition_score".into(),
            score.map(Value::Number).unwrap_or(Value::Null),
        );
        row
    }

    fn explorer() -> FirmExplorer {
        FirmExplorer::new(QueryExecutor::new(Arc::new(MemoryStore::new(
            FIRMS_TABLE,
            vec![
                firm(1, "Alpha Tax Group", "FL", Some(88.0)),
                firm(2, "Bayside CPA", "FL", Some(64.0)),
                firm(3, "Crestview Advisors", "GA", Some(72.0)),
                firm(4, "Delta Accounting", "FL", None),
            ],
        ))))
    }

    #[tokio::test]
    async fn best_candidates_come_first_by_default() {
        let e = explorer();
        e.load().await;
        let snap = e.snapshot();
        assert_eq!(snap.total, 4);
        assert_eq!(snap.rows[0]["firm_name"].as_str(), Some("Alpha Tax Group"));
        // null score sorts last even under the descending default
        assert_eq!(snap.rows[3]["firm_name"].as_str(), Some("Delta Accounting"));
    }

    #[tokio::test]
    async fn explicit_sort_replaces_the_default() {
        let e = explorer();
        e.load().await;
        e.set_sort("firm_name", SortDirection::Ascending).await.unwrap();
        let snap = e.snapshot();
        assert_eq!(snap.rows[0]["firm_name"].as_str(), Some("Alpha Tax Group"));
        assert_eq!(snap.rows[1]["firm_name"].as_str(), Some("Bayside CPA"));
    }

    #[tokio::test]
    async fn unsortable_column_leaves_the_view_untouched() {
        let e = explorer();
        e.load().await;
        let before = e.snapshot();
        assert!(e.set_sort("sources", SortDirection::Ascending).await.is_err());
        let after = e.snapshot();
        assert_eq!(before.total, after.total);
        assert!(e.filters().sort().is_none());
    }

    #[tokio::test]
    async fn state_toggle_narrows_and_widens() {
        let e = explorer();
        e.load().await;
        e.toggle_state("GA").await;
        assert_eq!(e.snapshot().total, 1);
        e.toggle_state("GA").await;
        assert_eq!(e.snapshot().total, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn search_waits_for_typing_to_pause() {
        let e = explorer();
        e.load().await;

        e.set_search("a");
        e.set_search("al");
        e.set_search("alpha");
        // nothing has fired yet
        assert_eq!(e.snapshot().total, 4);

        tokio::time::sleep(Duration::from_millis(400)).await;
        tokio::task::yield_now().await;
        assert_eq!(e.snapshot().total, 1);
        assert_eq!(e.filters().search(), "alpha");
    }

    #[tokio::test]
    async fn clear_filters_restores_the_full_result_set() {
        let e = explorer();
        e.load().await;
        e.toggle_state("FL").await;
        e.set_score_range(RangeFilter { min: Some(80.0), max: None }).await;
        assert_eq!(e.snapshot().total, 1);

        e.clear_filters().await;
        assert_eq!(e.snapshot().total, 4);
        assert_eq!(e.filters(), FilterState::new());
    }
}
