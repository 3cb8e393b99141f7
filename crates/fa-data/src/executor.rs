//! Query execution
//!
//! Thin async layer between a view and its store. `run` executes one paged
//! query; `fetch_all` is the batched variant used by export, issuing
//! increasing row ranges until a short batch signals exhaustion or the hard
//! cap is reached, reporting progress after every batch.

use std::sync::Arc;
use std::time::Instant;

use fa_core::{QueryResult, Row};
use tracing::debug;

use crate::query::{QuerySpec, RowRange};
use crate::store::RecordStore;
use crate::RemoteQueryError;

/// Executes query descriptions against a record store
#[derive(Clone)]
pub struct QueryExecutor {
    store: Arc<dyn RecordStore>,
}

impl QueryExecutor {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Executor over the process-wide store
    pub fn from_global() -> Result<Self, RemoteQueryError> {
        Ok(Self::new(crate::client::store()?))
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Execute one query. Failures surface exactly once; there is no
    /// automatic retry.
    pub async fn run(&self, spec: &QuerySpec) -> Result<QueryResult, RemoteQueryError> {
        let started = Instant::now();
        let result = self.store.query(spec).await?;
        debug!(
            table = %spec.table,
            rows = result.rows.len(),
            total = result.total,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "query complete"
        );
        Ok(result)
    }

    /// Fetch every matching row in batches of `batch_size`, stopping at a
    /// short batch or once `cap` rows have accumulated, whichever comes
    /// first. `progress` receives the number of rows fetched so far after
    /// each batch. Any range already on the spec is ignored.
    pub async fn fetch_all(
        &self,
        spec: &QuerySpec,
        batch_size: usize,
        cap: usize,
        mut progress: impl FnMut(usize),
    ) -> Result<Vec<Row>, RemoteQueryError> {
        debug_assert!(batch_size > 0 && cap > 0);
        let mut rows: Vec<Row> = Vec::new();
        let mut offset = 0;

        loop {
            let mut batch_spec = spec.clone();
            batch_spec.range = Some(RowRange { start: offset, end: offset + batch_size - 1 });
            let batch = self.store.query(&batch_spec).await?.rows;
            let fetched = batch.len();
            rows.extend(batch);
            progress(rows.len().min(cap));

            if fetched < batch_size || rows.len() >= cap {
                break;
            }
            offset += batch_size;
        }

        rows.truncate(cap);
        Ok(rows)
    }
}
