//! Row and cell value model
//!
//! Rows arrive from the hosted store as JSON objects. `Value` covers the four
//! JSON scalar shapes the firms table uses; `Row` keeps column order so the
//! on-screen table and exports stay stable.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value; text and booleans are not coerced
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Plain-text rendering used for export cells and predicate matching.
    /// Nulls render as the empty string; whole numbers drop the `.0`.
    pub fn cell_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            Value::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// One record with its columns in request order
pub type Row = IndexMap<String, Value>;

/// Result of executing a query: one page of rows plus the exact number of
/// records matching the predicates, independent of the requested range.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    pub rows: Vec<Row>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_row_round_trips() {
        let json = r#"{"firm_name":"Acme CPA","acquisition_score":82.5,"for_sale":true,"latitude":null}"#;
        let row: Row = serde_json::from_str(json).unwrap();
        assert_eq!(row["firm_name"], Value::Text("Acme CPA".into()));
        assert_eq!(row["acquisition_score"], Value::Number(82.5));
        assert_eq!(row["for_sale"], Value::Bool(true));
        assert!(row["latitude"].is_null());
        // column order is preserved
        let keys: Vec<_> = row.keys().cloned().collect();
        assert_eq!(keys[0], "firm_name");
        assert_eq!(keys[3], "latitude");
    }

    #[test]
    fn cell_text_formats() {
        assert_eq!(Value::Null.cell_text(), "");
        assert_eq!(Value::Number(425000.0).cell_text(), "425000");
        assert_eq!(Value::Number(4.5).cell_text(), "4.5");
        assert_eq!(Value::Bool(false).cell_text(), "false");
    }

    #[test]
    fn integers_deserialize_as_numbers() {
        let row: Row = serde_json::from_str(r#"{"google_review_count":37}"#).unwrap();
        assert_eq!(row["google_review_count"].as_f64(), Some(37.0));
    }
}
