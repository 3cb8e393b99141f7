//! Aggregate statistics over the firms table
//!
//! Read-only compositions of the store's query/count capabilities, feeding
//! the dashboard charts, the map's state breakdown and the data-completeness
//! report. Distribution scans over high-cardinality columns are sampled.

use ahash::AHashMap;
use fa_core::{columns, Value};

use crate::executor::QueryExecutor;
use crate::query::{Predicate, QuerySpec, RowRange};
use crate::RemoteQueryError;

/// Rows sampled when splitting the delimited `sources` column
const SOURCE_SAMPLE: usize = 5_000;
/// Rows sampled for the average-score metric
const SCORE_SAMPLE: usize = 10_000;

/// Per-state record count
#[derive(Debug, Clone)]
pub struct StateCount {
    pub state: String,
    pub name: String,
    pub count: u64,
}

/// Generic key/count pair for tier and source distributions
#[derive(Debug, Clone)]
pub struct Distribution {
    pub key: String,
    pub count: u64,
}

/// The dashboard's headline numbers and chart inputs
#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub total: u64,
    pub for_sale: u64,
    pub by_state: Vec<StateCount>,
    pub by_tier: Vec<Distribution>,
    pub by_source: Vec<Distribution>,
    pub avg_score: Option<f64>,
    pub high_wealth: u64,
}

/// Non-null coverage for one tracked field
#[derive(Debug, Clone)]
pub struct FieldCompleteness {
    pub field: String,
    pub count: u64,
    pub pct: u8,
}

#[derive(Debug, Clone)]
pub struct CompletenessReport {
    pub total: u64,
    pub fields: Vec<FieldCompleteness>,
}

/// Compute the dashboard aggregates
pub async fn dashboard_stats(
    executor: &QueryExecutor,
    table: &str,
) -> Result<DashboardStats, RemoteQueryError> {
    let store = executor.store();

    let total = store.count(table, &[]).await?;
    let for_sale = store
        .count(table, &[Predicate::Eq { column: "for_sale".into(), value: Value::Bool(true) }])
        .await?;
    let high_wealth = store
        .count(table, &[Predicate::Gte { column: "wealth_mgmt_potential".into(), value: 70.0 }])
        .await?;

    let by_state = state_breakdown(executor, table).await?;

    let mut tier_counts: AHashMap<String, u64> = AHashMap::new();
    for value in column_scan(executor, table, "acquisition_tier", &[], None).await? {
        if let Some(tier) = value.as_str() {
            *tier_counts.entry(tier.to_string()).or_default() += 1;
        }
    }
    let mut by_tier: Vec<Distribution> =
        tier_counts.into_iter().map(|(key, count)| Distribution { key, count }).collect();
    by_tier.sort_by(|a, b| a.key.cmp(&b.key));

    let mut source_counts: AHashMap<String, u64> = AHashMap::new();
    for value in
        column_scan(executor, table, "sources", &[], Some(SOURCE_SAMPLE)).await?
    {
        if let Some(sources) = value.as_str() {
            for key in sources.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                *source_counts.entry(key.to_string()).or_default() += 1;
            }
        }
    }
    let mut by_source: Vec<Distribution> =
        source_counts.into_iter().map(|(key, count)| Distribution { key, count }).collect();
    by_source.sort_by(|a, b| b.count.cmp(&a.count));

    let scores: Vec<f64> = column_scan(
        executor,
        table,
        "acquisition_score",
        &[Predicate::NotNull { column: "acquisition_score".into() }],
        Some(SCORE_SAMPLE),
    )
    .await?
    .iter()
    .filter_map(Value::as_f64)
    .collect();
    let avg_score = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    };

    Ok(DashboardStats { total, for_sale, by_state, by_tier, by_source, avg_score, high_wealth })
}

/// Record counts per state, largest first; shared by dashboard and map
pub async fn state_breakdown(
    executor: &QueryExecutor,
    table: &str,
) -> Result<Vec<StateCount>, RemoteQueryError> {
    let mut counts: AHashMap<String, u64> = AHashMap::new();
    for value in column_scan(executor, table, "state", &[], None).await? {
        if let Some(state) = value.as_str() {
            *counts.entry(state.to_string()).or_default() += 1;
        }
    }
    let mut breakdown: Vec<StateCount> = counts
        .into_iter()
        .map(|(state, count)| StateCount {
            name: columns::state_name(&state).to_string(),
            state,
            count,
        })
        .collect();
    breakdown.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.state.cmp(&b.state)));
    Ok(breakdown)
}

/// Non-null coverage for every tracked field
pub async fn field_completeness(
    executor: &QueryExecutor,
    table: &str,
) -> Result<CompletenessReport, RemoteQueryError> {
    let store = executor.store();
    let total = store.count(table, &[]).await?;

    let mut fields = Vec::with_capacity(columns::COMPLETENESS_FIELDS.len());
    for field in columns::COMPLETENESS_FIELDS {
        let count =
            store.count(table, &[Predicate::NotNull { column: (*field).into() }]).await?;
        let pct = if total == 0 {
            0
        } else {
            ((count as f64 / total as f64) * 100.0).round() as u8
        };
        fields.push(FieldCompleteness { field: (*field).to_string(), count, pct });
    }

    Ok(CompletenessReport { total, fields })
}

/// Fetch one column's values for aggregation, optionally sampled
async fn column_scan(
    executor: &QueryExecutor,
    table: &str,
    column: &str,
    predicates: &[Predicate],
    limit: Option<usize>,
) -> Result<Vec<Value>, RemoteQueryError> {
    let spec = QuerySpec {
        table: table.to_string(),
        columns: vec![column.to_string()],
        predicates: predicates.to_vec(),
        order_by: None,
        range: limit.map(RowRange::head),
    };
    let result = executor.run(&spec).await?;
    Ok(result
        .rows
        .into_iter()
        .map(|mut row| row.swap_remove(column).unwrap_or(Value::Null))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use fa_core::Row;
    use std::sync::Arc;

    fn firm(state: &str, tier: &str, score: f64, sources: &str, for_sale: bool) -> Row {
        let mut row = Row::new();
        row.insert("state".into(), state.into());
        row.insert("acquisition_tier".into(), tier.into());
        row.insert("acquisition_score".into(), Value::Number(score));
        row.insert("sources".into(), sources.into());
        row.insert("for_sale".into(), Value::Bool(for_sale));
        row.insert("wealth_mgmt_potential".into(), Value::Number(score));
        row.insert("firm_name".into(), "x".into());
        row.insert("phone".into(), Value::Null);
        row
    }

    fn executor() -> QueryExecutor {
        QueryExecutor::new(Arc::new(MemoryStore::new(
            "firms",
            vec![
                firm("FL", "A", 90.0, "cpadirectory, google_maps", true),
                firm("FL", "B", 60.0, "cpadirectory", false),
                firm("GA", "A", 75.0, "state_cpa_boards", false),
            ],
        )))
    }

    #[tokio::test]
    async fn dashboard_numbers_add_up() {
        let stats = dashboard_stats(&executor(), "firms").await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.for_sale, 1);
        assert_eq!(stats.high_wealth, 2);
        assert_eq!(stats.avg_score, Some(75.0));

        assert_eq!(stats.by_state[0].state, "FL");
        assert_eq!(stats.by_state[0].name, "Florida");
        assert_eq!(stats.by_state[0].count, 2);

        assert_eq!(stats.by_tier.len(), 2);
        assert_eq!(stats.by_tier[0].key, "A");
        assert_eq!(stats.by_tier[0].count, 2);

        // the delimited sources string is split per contributing pipeline
        let cpadir = stats.by_source.iter().find(|d| d.key == "cpadirectory").unwrap();
        assert_eq!(cpadir.count, 2);
        assert!(stats.by_source.iter().any(|d| d.key == "google_maps"));
    }

    #[tokio::test]
    async fn completeness_counts_non_null_cells() {
        let report = field_completeness(&executor(), "firms").await.unwrap();
        assert_eq!(report.total, 3);
        let phone = report.fields.iter().find(|f| f.field == "phone").unwrap();
        assert_eq!(phone.count, 0);
        assert_eq!(phone.pct, 0);
        let name = report.fields.iter().find(|f| f.field == "firm_name").unwrap();
        assert_eq!(name.count, 3);
        assert_eq!(name.pct, 100);
    }
}
