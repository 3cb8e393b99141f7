//! In-memory record store
//!
//! Evaluates predicates, sort and range over a table held in memory. Used by
//! the demo mode and as the reference implementation in tests; its semantics
//! match the hosted store's (case-insensitive substring, null exclusion on
//! numeric bounds, exact counts).

use std::cmp::Ordering;

use async_trait::async_trait;
use fa_core::{QueryResult, Row, SortDirection, Value};

use crate::query::{OrderBy, Predicate, QuerySpec};
use crate::store::RecordStore;
use crate::RemoteQueryError;

/// A record store backed by a `Vec<Row>`
pub struct MemoryStore {
    table: String,
    rows: Vec<Row>,
}

impl MemoryStore {
    pub fn new(table: impl Into<String>, rows: Vec<Row>) -> Self {
        Self { table: table.into(), rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn check_table(&self, table: &str) -> Result<(), RemoteQueryError> {
        if table != self.table {
            return Err(RemoteQueryError::InvalidQuery(format!("unknown table '{}'", table)));
        }
        Ok(())
    }

    fn matching<'a>(&'a self, predicates: &[Predicate]) -> Vec<&'a Row> {
        self.rows
            .iter()
            .filter(|row| predicates.iter().all(|p| matches(row, p)))
            .collect()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn query(&self, spec: &QuerySpec) -> Result<QueryResult, RemoteQueryError> {
        self.check_table(&spec.table)?;

        let mut matched = self.matching(&spec.predicates);
        let total = matched.len() as u64;

        if let Some(order) = &spec.order_by {
            sort_rows(&mut matched, order);
        }

        let page: Vec<&Row> = match spec.range {
            Some(range) => matched
                .into_iter()
                .skip(range.start)
                .take(range.len())
                .collect(),
            None => matched,
        };

        let rows = page.into_iter().map(|row| project(row, &spec.columns)).collect();
        Ok(QueryResult { rows, total })
    }

    async fn count(&self, table: &str, predicates: &[Predicate]) -> Result<u64, RemoteQueryError> {
        self.check_table(table)?;
        Ok(self.matching(predicates).len() as u64)
    }

    fn store_name(&self) -> &str {
        "memory"
    }
}

/// Does `row` satisfy `predicate`? Missing columns behave like nulls.
fn matches(row: &Row, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::Eq { column, value } => row.get(column).is_some_and(|v| v == value),
        Predicate::In { column, values } => {
            let Some(v) = row.get(column) else { return false };
            if v.is_null() {
                return false;
            }
            let text = v.cell_text();
            values.iter().any(|candidate| *candidate == text)
        }
        Predicate::Gte { column, value } => {
            cell_number(row, column).is_some_and(|n| n >= *value)
        }
        Predicate::Lte { column, value } => {
            cell_number(row, column).is_some_and(|n| n <= *value)
        }
        Predicate::Contains { column, needle } => {
            let Some(v) = row.get(column) else { return false };
            if v.is_null() {
                return false;
            }
            v.cell_text().to_lowercase().contains(&needle.to_lowercase())
        }
        Predicate::NotNull { column } => row.get(column).is_some_and(|v| !v.is_null()),
        Predicate::AnyOf(inner) => inner.iter().any(|p| matches(row, p)),
    }
}

fn cell_number(row: &Row, column: &str) -> Option<f64> {
    row.get(column).and_then(Value::as_f64)
}

/// Stable sort with nulls last in either direction
fn sort_rows(rows: &mut [&Row], order: &OrderBy) {
    rows.sort_by(|a, b| {
        let av = a.get(&order.column);
        let bv = b.get(&order.column);
        let ord = match (av, bv) {
            (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
            (None | Some(Value::Null), Some(_)) => return Ordering::Greater,
            (Some(_), None | Some(Value::Null)) => return Ordering::Less,
            (Some(a), Some(b)) => compare_values(a, b),
        };
        match order.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cell_text().cmp(&b.cell_text()),
    }
}

/// Keep only the requested columns, in request order; an empty request
/// returns the full row.
fn project(row: &Row, columns: &[String]) -> Row {
    if columns.is_empty() {
        return row.clone();
    }
    columns
        .iter()
        .map(|c| (c.clone(), row.get(c).cloned().unwrap_or(Value::Null)))
        .collect()
}
