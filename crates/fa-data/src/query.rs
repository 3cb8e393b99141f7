//! Query descriptions and the builder that produces them
//!
//! A `QuerySpec` is a backend-neutral description of one remote read:
//! selected columns, predicates, an optional order clause, and an optional
//! inclusive row range. `QueryBuilder` translates a view's `FilterState`
//! into a spec with no side effects.

use fa_core::{ColumnFilter, FilterState, SortDirection, Value};

/// One filter condition, translated later into a store-specific clause
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Exact equality
    Eq { column: String, value: Value },
    /// Value is one of the given set. Builders never emit this with an
    /// empty set: an empty selection means "no predicate", not "match none".
    In { column: String, values: Vec<String> },
    /// Numeric lower bound (inclusive). Rows with a null value are excluded.
    Gte { column: String, value: f64 },
    /// Numeric upper bound (inclusive). Rows with a null value are excluded.
    Lte { column: String, value: f64 },
    /// Case-insensitive substring match. The hosted store treats `*` and
    /// `%` in the needle as match-any wildcards; other expression
    /// punctuation (commas, parentheses, quotes) is quoted by the client
    /// and matches literally.
    Contains { column: String, needle: String },
    /// Column is not null
    NotNull { column: String },
    /// Logical OR of the inner predicates
    AnyOf(Vec<Predicate>),
}

/// Single-column order clause
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

/// Inclusive, zero-indexed row range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    /// The range covering one page
    pub fn page(page: usize, page_size: usize) -> Self {
        Self { start: page * page_size, end: page * page_size + page_size - 1 }
    }

    /// First `limit` rows. The range is inclusive and cannot express
    /// "no rows"; callers wanting zero rows skip the query instead.
    pub fn head(limit: usize) -> Self {
        debug_assert!(limit > 0);
        Self { start: 0, end: limit - 1 }
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// A complete remote-query description
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub table: String,
    /// Requested columns; empty means all columns
    pub columns: Vec<String>,
    pub predicates: Vec<Predicate>,
    pub order_by: Option<OrderBy>,
    pub range: Option<RowRange>,
}

impl QuerySpec {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            predicates: Vec::new(),
            order_by: None,
            range: None,
        }
    }
}

/// Pure translator from `FilterState` to `QuerySpec`.
///
/// A builder is configured once per view with the source table, the column
/// allowlist, the page size, optional preset predicates (e.g. the raw-data
/// view's source-membership constraint) and a default order used when the
/// filter state carries no explicit sort.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
    columns: Vec<String>,
    page_size: usize,
    preset: Vec<Predicate>,
    default_order: Option<OrderBy>,
}

impl QueryBuilder {
    pub fn new(table: impl Into<String>, columns: &[&str], page_size: usize) -> Self {
        Self {
            table: table.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            page_size,
            preset: Vec::new(),
            default_order: None,
        }
    }

    /// Add a fixed predicate applied regardless of filter state
    pub fn with_preset(mut self, predicate: Predicate) -> Self {
        self.preset.push(predicate);
        self
    }

    /// Order to use when the filter state has no explicit sort
    pub fn with_default_order(mut self, order: OrderBy) -> Self {
        self.default_order = Some(order);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Build the paged query for the filter state's current page
    pub fn build(&self, filters: &FilterState) -> QuerySpec {
        let mut spec = self.build_unpaged(filters);
        spec.range = Some(RowRange::page(filters.page(), self.page_size));
        spec
    }

    /// Build the same query without a row range; the exporter drives the
    /// batching itself.
    pub fn build_unpaged(&self, filters: &FilterState) -> QuerySpec {
        let mut spec = QuerySpec::new(self.table.clone());
        spec.columns = self.columns.clone();
        spec.predicates = self.preset.clone();

        if !filters.states().is_empty() {
            spec.predicates.push(Predicate::In {
                column: "state".into(),
                values: filters.states().to_vec(),
            });
        }
        if !filters.tiers().is_empty() {
            spec.predicates.push(Predicate::In {
                column: "acquisition_tier".into(),
                values: filters.tiers().to_vec(),
            });
        }
        if !filters.segments().is_empty() {
            spec.predicates.push(Predicate::In {
                column: "client_segment".into(),
                values: filters.segments().to_vec(),
            });
        }
        // `sources` is a comma-joined provenance string, not a relational
        // multi-value column, so membership is a substring match. Known
        // precision gap: a source key that is a substring of another key
        // would false-positive (no current key is).
        if !filters.sources().is_empty() {
            spec.predicates.push(Predicate::AnyOf(
                filters
                    .sources()
                    .iter()
                    .map(|key| Predicate::Contains {
                        column: "sources".into(),
                        needle: key.clone(),
                    })
                    .collect(),
            ));
        }

        push_range(&mut spec.predicates, "acquisition_score", filters.score());
        push_range(&mut spec.predicates, "estimated_revenue", filters.revenue());

        if filters.for_sale_only() {
            spec.predicates.push(Predicate::Eq {
                column: "for_sale".into(),
                value: Value::Bool(true),
            });
        }

        if !filters.search().is_empty() {
            spec.predicates.push(Predicate::AnyOf(vec![
                Predicate::Contains {
                    column: "firm_name".into(),
                    needle: filters.search().to_string(),
                },
                Predicate::Contains {
                    column: "city".into(),
                    needle: filters.search().to_string(),
                },
            ]));
        }

        for (column, filter) in filters.column_filters() {
            match filter {
                ColumnFilter::Text(needle) if !needle.is_empty() => {
                    spec.predicates.push(Predicate::Contains {
                        column: column.clone(),
                        needle: needle.clone(),
                    });
                }
                ColumnFilter::Text(_) => {}
                ColumnFilter::Floor(threshold) => {
                    spec.predicates.push(Predicate::Gte {
                        column: column.clone(),
                        value: *threshold,
                    });
                }
            }
        }

        spec.order_by = filters
            .sort()
            .map(|s| OrderBy { column: s.column.clone(), direction: s.direction })
            .or_else(|| self.default_order.clone());

        spec
    }
}

fn push_range(predicates: &mut Vec<Predicate>, column: &str, range: fa_core::RangeFilter) {
    if let Some(min) = range.min {
        predicates.push(Predicate::Gte { column: column.into(), value: min });
    }
    if let Some(max) = range.max {
        predicates.push(Predicate::Lte { column: column.into(), value: max });
    }
}
