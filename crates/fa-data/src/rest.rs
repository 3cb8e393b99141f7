//! Hosted-store HTTP client
//!
//! Speaks the PostgREST-style wire protocol of the hosted relational store:
//! predicates become query-string operators (`eq.`, `in.(…)`, `ilike.*…*`,
//! `or=(…)`), pagination uses `Range` headers in `items`, and the exact
//! match count comes back in `Content-Range` when `Prefer: count=exact` is
//! sent. Row-level security is enforced server-side from the API key.

use std::time::Duration;

use async_trait::async_trait;
use fa_core::{QueryResult, Row, SortDirection, Value};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use tracing::debug;

use crate::client::StoreConfig;
use crate::query::{Predicate, QuerySpec};
use crate::store::RecordStore;
use crate::RemoteQueryError;

/// No timeout is mandated upstream; an unbounded hang is worse than a
/// surfaced error, so reads are capped here.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Record store backed by a hosted PostgREST endpoint
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    name: String,
}

impl RestStore {
    pub fn new(config: &StoreConfig) -> Result<Self, RemoteQueryError> {
        let mut headers = HeaderMap::new();
        let apikey = HeaderValue::from_str(&config.api_key)
            .map_err(|e| RemoteQueryError::InvalidQuery(format!("bad API key: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| RemoteQueryError::InvalidQuery(format!("bad API key: {e}")))?;
        headers.insert("apikey", apikey);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
            name: config.url.clone(),
        })
    }
}

#[async_trait]
impl RecordStore for RestStore {
    async fn query(&self, spec: &QuerySpec) -> Result<QueryResult, RemoteQueryError> {
        let url = format!("{}/{}", self.base_url, spec.table);
        let params = query_params(spec)?;
        debug!(table = %spec.table, ?params, "remote query");

        let mut request = self.client.get(&url).query(&params).header("Prefer", "count=exact");
        if let Some(range) = spec.range {
            request = request
                .header("Range-Unit", "items")
                .header("Range", format!("{}-{}", range.start, range.end));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteQueryError::Rejected { status: status.as_u16(), message });
        }

        let total = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range);

        let rows: Vec<Row> =
            response.json().await.map_err(|e| RemoteQueryError::Decode(e.to_string()))?;
        let total = total.unwrap_or(rows.len() as u64);

        Ok(QueryResult { rows, total })
    }

    async fn count(&self, table: &str, predicates: &[Predicate]) -> Result<u64, RemoteQueryError> {
        let spec = QuerySpec {
            table: table.to_string(),
            columns: Vec::new(),
            predicates: predicates.to_vec(),
            order_by: None,
            range: None,
        };
        let url = format!("{}/{}", self.base_url, table);
        let params = query_params(&spec)?;

        // HEAD with count=exact returns the total in Content-Range only
        let response = self
            .client
            .head(&url)
            .query(&params)
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteQueryError::Rejected {
                status: status.as_u16(),
                message: String::new(),
            });
        }

        response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| RemoteQueryError::Decode("missing Content-Range header".into()))
    }

    fn store_name(&self) -> &str {
        &self.name
    }
}

/// Render a query description into PostgREST query-string parameters
fn query_params(spec: &QuerySpec) -> Result<Vec<(String, String)>, RemoteQueryError> {
    let mut params = Vec::new();

    let select =
        if spec.columns.is_empty() { "*".to_string() } else { spec.columns.join(",") };
    params.push(("select".to_string(), select));

    for predicate in &spec.predicates {
        params.push(predicate_param(predicate)?);
    }

    if let Some(order) = &spec.order_by {
        let dir = match order.direction {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        };
        params.push(("order".to_string(), format!("{}.{}", order.column, dir)));
    }

    Ok(params)
}

/// Top-level predicate to a `(key, value)` parameter pair
fn predicate_param(predicate: &Predicate) -> Result<(String, String), RemoteQueryError> {
    match predicate {
        Predicate::Eq { column, value } => {
            Ok((column.clone(), format!("eq.{}", literal(value)?)))
        }
        Predicate::In { column, values } => {
            if values.is_empty() {
                return Err(RemoteQueryError::InvalidQuery(format!(
                    "empty IN set for column '{}'",
                    column
                )));
            }
            Ok((column.clone(), format!("in.({})", values.join(","))))
        }
        Predicate::Gte { column, value } => {
            Ok((column.clone(), format!("gte.{}", number(*value))))
        }
        Predicate::Lte { column, value } => {
            Ok((column.clone(), format!("lte.{}", number(*value))))
        }
        Predicate::Contains { column, needle } => {
            Ok((column.clone(), format!("ilike.{}", pattern(needle))))
        }
        Predicate::NotNull { column } => Ok((column.clone(), "not.is.null".to_string())),
        Predicate::AnyOf(inner) => {
            let rendered: Result<Vec<String>, _> = inner.iter().map(embedded).collect();
            Ok(("or".to_string(), format!("({})", rendered?.join(","))))
        }
    }
}

/// Predicate rendered for use inside an `or=(…)` group
fn embedded(predicate: &Predicate) -> Result<String, RemoteQueryError> {
    match predicate {
        Predicate::Eq { column, value } => Ok(format!("{}.eq.{}", column, literal(value)?)),
        Predicate::In { column, values } => Ok(format!("{}.in.({})", column, values.join(","))),
        Predicate::Gte { column, value } => Ok(format!("{}.gte.{}", column, number(*value))),
        Predicate::Lte { column, value } => Ok(format!("{}.lte.{}", column, number(*value))),
        Predicate::Contains { column, needle } => {
            Ok(format!("{}.ilike.{}", column, pattern(needle)))
        }
        Predicate::NotNull { column } => Ok(format!("{}.not.is.null", column)),
        Predicate::AnyOf(inner) => {
            let rendered: Result<Vec<String>, _> = inner.iter().map(embedded).collect();
            Ok(format!("or({})", rendered?.join(",")))
        }
    }
}

/// Render an `ilike` substring pattern. Needles carrying PostgREST
/// expression punctuation are double-quoted so a comma or parenthesis in a
/// search string cannot split an `or=(…)` group; `*` and `%` stay wildcards
/// (see the `Contains` contract).
fn pattern(needle: &str) -> String {
    if needle.contains([',', '(', ')', '"', '\\']) {
        format!("\"*{}*\"", needle.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        format!("*{}*", needle)
    }
}

fn literal(value: &Value) -> Result<String, RemoteQueryError> {
    match value {
        Value::Null => Err(RemoteQueryError::InvalidQuery(
            "null literal in equality predicate; use NotNull".into(),
        )),
        other => Ok(other.cell_text()),
    }
}

fn number(n: f64) -> String {
    Value::Number(n).cell_text()
}

/// `Content-Range: items 0-49/135156` (or `*/135156`, or `0-49/*`)
fn parse_content_range(header: &str) -> Option<u64> {
    header.rsplit('/').next()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::OrderBy;

    #[test]
    fn renders_select_order_and_predicates() {
        let mut spec = QuerySpec::new("firms");
        spec.columns = vec!["firm_name".into(), "state".into()];
        spec.predicates = vec![
            Predicate::In { column: "acquisition_tier".into(), values: vec!["A".into()] },
            Predicate::In { column: "state".into(), values: vec!["FL".into()] },
            Predicate::Gte { column: "acquisition_score".into(), value: 70.0 },
        ];
        spec.order_by = Some(OrderBy {
            column: "acquisition_score".into(),
            direction: SortDirection::Descending,
        });

        let params = query_params(&spec).unwrap();
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "firm_name,state".to_string()),
                ("acquisition_tier".to_string(), "in.(A)".to_string()),
                ("state".to_string(), "in.(FL)".to_string()),
                ("acquisition_score".to_string(), "gte.70".to_string()),
                ("order".to_string(), "acquisition_score.desc".to_string()),
            ]
        );
    }

    #[test]
    fn disjunctions_render_as_or_groups() {
        let predicate = Predicate::AnyOf(vec![
            Predicate::Contains { column: "firm_name".into(), needle: "smith".into() },
            Predicate::Contains { column: "city".into(), needle: "smith".into() },
        ]);
        assert_eq!(
            predicate_param(&predicate).unwrap(),
            ("or".to_string(), "(firm_name.ilike.*smith*,city.ilike.*smith*)".to_string())
        );
    }

    #[test]
    fn reserved_punctuation_in_a_needle_is_quoted() {
        // a comma inside an or group must not split the disjunction
        let predicate = Predicate::AnyOf(vec![
            Predicate::Contains { column: "firm_name".into(), needle: "smith, jones".into() },
            Predicate::Contains { column: "city".into(), needle: "smith, jones".into() },
        ]);
        assert_eq!(
            predicate_param(&predicate).unwrap(),
            (
                "or".to_string(),
                "(firm_name.ilike.\"*smith, jones*\",city.ilike.\"*smith, jones*\")".to_string()
            )
        );

        let parens = Predicate::Contains {
            column: "firm_name".into(),
            needle: "adams (cpa)".into(),
        };
        assert_eq!(
            predicate_param(&parens).unwrap(),
            ("firm_name".to_string(), "ilike.\"*adams (cpa)*\"".to_string())
        );

        let quote = Predicate::Contains { column: "firm_name".into(), needle: "o\"brien".into() };
        assert_eq!(
            predicate_param(&quote).unwrap(),
            ("firm_name".to_string(), "ilike.\"*o\\\"brien*\"".to_string())
        );

        // plain needles stay unquoted
        let plain = Predicate::Contains { column: "city".into(), needle: "tampa".into() };
        assert_eq!(
            predicate_param(&plain).unwrap(),
            ("city".to_string(), "ilike.*tampa*".to_string())
        );
    }

    #[test]
    fn boolean_equality_renders_plain() {
        let predicate = Predicate::Eq { column: "for_sale".into(), value: Value::Bool(true) };
        assert_eq!(
            predicate_param(&predicate).unwrap(),
            ("for_sale".to_string(), "eq.true".to_string())
        );
    }

    #[test]
    fn empty_in_set_is_a_builder_bug() {
        let predicate = Predicate::In { column: "state".into(), values: vec![] };
        assert!(matches!(
            predicate_param(&predicate),
            Err(RemoteQueryError::InvalidQuery(_))
        ));
    }

    #[test]
    fn content_range_variants() {
        assert_eq!(parse_content_range("items 0-49/135156"), Some(135_156));
        assert_eq!(parse_content_range("0-49/135156"), Some(135_156));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("0-49/*"), None);
    }
}
