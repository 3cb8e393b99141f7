//! The overview dashboard
//!
//! Headline counts, per-state and per-tier breakdowns, source contribution
//! and the data-completeness report, loaded in one pass. Failures land in
//! the snapshot as inline text; the previous numbers stay on screen until a
//! reload succeeds.

use fa_data::{stats, CompletenessReport, DashboardStats, QueryExecutor, FIRMS_TABLE};
use parking_lot::RwLock;
use tracing::error;

#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub stats: Option<DashboardStats>,
    pub completeness: Option<CompletenessReport>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct DashboardView {
    executor: QueryExecutor,
    snapshot: RwLock<DashboardSnapshot>,
}

impl DashboardView {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor, snapshot: RwLock::new(DashboardSnapshot::default()) }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot.read().clone()
    }

    pub async fn load(&self) {
        {
            let mut snap = self.snapshot.write();
            snap.loading = true;
            snap.error = None;
        }

        let stats = stats::dashboard_stats(&self.executor, FIRMS_TABLE).await;
        let completeness = stats::field_completeness(&self.executor, FIRMS_TABLE).await;

        let mut snap = self.snapshot.write();
        snap.loading = false;
        match (stats, completeness) {
            (Ok(stats), Ok(completeness)) => {
                snap.stats = Some(stats);
                snap.completeness = Some(completeness);
            }
            (Err(e), _) | (_, Err(e)) => {
                error!(error = %e, "dashboard load failed");
                snap.error = Some(e.to_string());
            }
        }
    }
}
