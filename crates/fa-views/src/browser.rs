//! The filtered record browser
//!
//! One pattern, used by the firm explorer, the raw-data browser and the map
//! loader: filter state in, one page of rows plus an exact total out.
//! Responses are tagged with a generation number; a response that is no
//! longer the latest issued request is discarded, so a slow early query can
//! never overwrite the results of a fast later one.

use std::sync::atomic::{AtomicU64, Ordering};

use fa_core::{paging, FilterState, QueryResult, Row};
use fa_data::{QueryBuilder, QueryExecutor, QuerySpec, RemoteQueryError};
use parking_lot::RwLock;
use tracing::{debug, error};

/// What the renderer reads: the current page and the flags around it
#[derive(Debug, Clone, Default)]
pub struct BrowserSnapshot {
    pub rows: Vec<Row>,
    pub total: u64,
    pub page: usize,
    pub loading: bool,
    /// Inline, non-fatal error text; cleared when the next query is issued
    pub error: Option<String>,
}

impl BrowserSnapshot {
    pub fn total_pages(&self, page_size: usize) -> usize {
        paging::total_pages(self.total, page_size)
    }
}

/// A filtered, sorted, paginated view over one remote table
pub struct RecordBrowser {
    executor: QueryExecutor,
    builder: QueryBuilder,
    filters: RwLock<FilterState>,
    snapshot: RwLock<BrowserSnapshot>,
    generation: AtomicU64,
}

impl RecordBrowser {
    pub fn new(executor: QueryExecutor, builder: QueryBuilder) -> Self {
        Self {
            executor,
            builder,
            filters: RwLock::new(FilterState::new()),
            snapshot: RwLock::new(BrowserSnapshot::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> BrowserSnapshot {
        self.snapshot.read().clone()
    }

    pub fn filters(&self) -> FilterState {
        self.filters.read().clone()
    }

    pub fn page_size(&self) -> usize {
        self.builder.page_size()
    }

    /// The current query without a row range, for export
    pub fn unpaged_spec(&self) -> QuerySpec {
        self.builder.build_unpaged(&self.filters.read())
    }

    /// Mutate the filter state, then re-query. `FilterState`'s own invariant
    /// re-zeroes the page before the query is built, so the filters are
    /// always applied before the page is re-derived.
    pub async fn apply(&self, mutate: impl FnOnce(&mut FilterState)) {
        mutate(&mut self.filters.write());
        self.run_query().await;
    }

    /// Like `apply`, but for mutations that can be rejected (sorting by an
    /// unsortable column). The query is only re-issued when the mutation
    /// succeeded; a rejected mutation leaves both state and snapshot alone.
    pub async fn try_apply<E>(
        &self,
        mutate: impl FnOnce(&mut FilterState) -> Result<(), E>,
    ) -> Result<(), E> {
        mutate(&mut self.filters.write())?;
        self.run_query().await;
        Ok(())
    }

    /// Jump to a page, clamped into the valid range for the last known total
    pub async fn go_to_page(&self, requested: i64) {
        let page = {
            let total = self.snapshot.read().total;
            paging::clamp_page(requested, total, self.builder.page_size())
        };
        self.filters.write().set_page(page);
        self.run_query().await;
    }

    /// Re-issue the current query; the explicit reload path after an error
    pub async fn refresh(&self) {
        self.run_query().await;
    }

    async fn run_query(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (spec, page) = {
            let filters = self.filters.read();
            (self.builder.build(&filters), filters.page())
        };

        {
            let mut snap = self.snapshot.write();
            snap.loading = true;
            snap.error = None;
        }

        let result = self.executor.run(&spec).await;

        // Staleness is decided under the snapshot lock: a newer request that
        // finishes between an early check and the write could otherwise be
        // overwritten by this one.
        let mut snap = self.snapshot.write();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding stale query response");
            return;
        }

        snap.loading = false;
        match result {
            Ok(QueryResult { rows, total }) => {
                snap.rows = rows;
                snap.total = total;
                snap.page = page;
            }
            Err(e) => {
                self.record_error(&mut snap, &e);
            }
        }
    }

    fn record_error(&self, snap: &mut BrowserSnapshot, e: &RemoteQueryError) {
        error!(store = %self.executor.store().store_name(), error = %e, "query failed");
        snap.error = Some(e.to_string());
    }
}
