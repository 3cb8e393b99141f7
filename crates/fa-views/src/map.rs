//! Map view data
//!
//! Two queries feed the map: the per-state record counts for the sidebar,
//! and a capped set of geocoded pins. Only a fraction of the table carries
//! coordinates, so pins are the highest-scored geocoded firms rather than a
//! random slice.

use fa_core::{SortDirection, Value};
use fa_data::{
    stats, OrderBy, Predicate, QueryExecutor, QuerySpec, RemoteQueryError, RowRange, StateCount,
    FIRMS_TABLE,
};

/// Most pins a single load will place
pub const MAP_PIN_LIMIT: usize = 2_000;

const PIN_COLUMNS: &[&str] = &[
    "firm_name",
    "city",
    "state",
    "latitude",
    "longitude",
    "acquisition_score",
    "acquisition_tier",
];

/// One map pin
#[derive(Debug, Clone)]
pub struct GeocodedFirm {
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub score: Option<f64>,
    pub tier: Option<String>,
}

pub struct MapLoader {
    executor: QueryExecutor,
}

impl MapLoader {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }

    /// Record counts per state for the sidebar, largest first
    pub async fn state_breakdown(&self) -> Result<Vec<StateCount>, RemoteQueryError> {
        stats::state_breakdown(&self.executor, FIRMS_TABLE).await
    }

    /// The top-scored geocoded firms, optionally narrowed to one state.
    /// Rows whose coordinates fail to parse are skipped, not errors.
    pub async fn geocoded(
        &self,
        state: Option<&str>,
        limit: usize,
    ) -> Result<Vec<GeocodedFirm>, RemoteQueryError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut spec = QuerySpec::new(FIRMS_TABLE);
        spec.columns = PIN_COLUMNS.iter().map(|c| c.to_string()).collect();
        spec.predicates.push(Predicate::NotNull { column: "latitude".into() });
        spec.predicates.push(Predicate::NotNull { column: "longitude".into() });
        if let Some(state) = state {
            spec.predicates.push(Predicate::In {
                column: "state".into(),
                values: vec![state.to_string()],
            });
        }
        spec.order_by = Some(OrderBy {
            column: "acquisition_score".into(),
            direction: SortDirection::Descending,
        });
        spec.range = Some(RowRange::head(limit.min(MAP_PIN_LIMIT)));

        let result = self.executor.run(&spec).await?;
        Ok(result.rows.into_iter().filter_map(pin_from_row).collect())
    }
}

fn pin_from_row(row: fa_core::Row) -> Option<GeocodedFirm> {
    let latitude = row.get("latitude").and_then(Value::as_f64)?;
    let longitude = row.get("longitude").and_then(Value::as_f64)?;
    Some(GeocodedFirm {
        name: row.get("firm_name").and_then(Value::as_str).unwrap_or_default().to_string(),
        city: row.get("city").and_then(Value::as_str).map(str::to_string),
        state: row.get("state").and_then(Value::as_str).map(str::to_string),
        latitude,
        longitude,
        score: row.get("acquisition_score").and_then(Value::as_f64),
        tier: row.get("acquisition_tier").and_then(Value::as_str).map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fa_core::Row;
    use fa_data::MemoryStore;
    use std::sync::Arc;

    fn firm(name: &str, state: &str, score: f64, coords: Option<(f64, f64)>) -> Row {
        let mut row = Row::new();
        row.insert("firm_name".into(), name.into());
        row.insert("state".into(), state.into());
        row.insert("acquisition_score".into(), Value::Number(score));
        row.insert("acquisition_tier".into(), "A".into());
        match coords {
            Some((lat, lng)) => {
                row.insert("latitude".into(), Value::Number(lat));
                row.insert("longitude".into(), Value::Number(lng));
            }
            None => {
                row.insert("latitude".into(), Value::Null);
                row.insert("longitude".into(), Value::Null);
            }
        }
        row
    }

    fn loader() -> MapLoader {
        MapLoader::new(QueryExecutor::new(Arc::new(MemoryStore::new(
            FIRMS_TABLE,
            vec![
                firm("Alpha Tax Group", "FL", 88.0, Some((27.95, -82.46))),
                firm("Bayside CPA", "FL", 64.0, Some((27.77, -82.64))),
                firm("Crestview Advisors", "GA", 72.0, None),
                firm("Delta Accounting", "GA", 95.0, Some((33.75, -84.39))),
            ],
        ))))
    }

    #[tokio::test]
    async fn only_geocoded_rows_become_pins() {
        let pins = loader().geocoded(None, 100).await.unwrap();
        assert_eq!(pins.len(), 3);
        assert!(pins.iter().all(|p| p.name != "Crestview Advisors"));
        // best candidates first
        assert_eq!(pins[0].name, "Delta Accounting");
        assert_eq!(pins[0].latitude, 33.75);
    }

    #[tokio::test]
    async fn state_narrowing_and_limit_apply() {
        let pins = loader().geocoded(Some("FL"), 100).await.unwrap();
        assert_eq!(pins.len(), 2);
        assert!(pins.iter().all(|p| p.state.as_deref() == Some("FL")));

        let capped = loader().geocoded(None, 1).await.unwrap();
        assert_eq!(capped.len(), 1);

        let none = loader().geocoded(None, 0).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn breakdown_matches_the_table() {
        let breakdown = loader().state_breakdown().await.unwrap();
        assert_eq!(breakdown.len(), 2);
        // equal counts fall back to alphabetical order
        assert_eq!(breakdown[0].state, "FL");
        assert_eq!(breakdown[0].name, "Florida");
        assert_eq!(breakdown[0].count, 2);
    }
}
