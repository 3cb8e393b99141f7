//! The remote store capability
//!
//! Everything above this trait treats the store as a generic "query records
//! with filters, sort, range" and "count matching records" service. The
//! hosted HTTP store and the in-memory store both implement it.

use async_trait::async_trait;
use fa_core::QueryResult;

use crate::query::{Predicate, QuerySpec};
use crate::RemoteQueryError;

/// A read-only record store
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Execute a query and return the requested page of rows together with
    /// the exact count of all records matching the predicates (the count is
    /// independent of the row range).
    async fn query(&self, spec: &QuerySpec) -> Result<QueryResult, RemoteQueryError>;

    /// Count records matching the predicates without fetching rows
    async fn count(&self, table: &str, predicates: &[Predicate]) -> Result<u64, RemoteQueryError>;

    /// Human-readable identifier for logs
    fn store_name(&self) -> &str;
}
