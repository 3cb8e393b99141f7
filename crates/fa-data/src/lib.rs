//! Remote query layer for the firm analytics platform
//!
//! Translates view filter state into parameterized remote queries, executes
//! them against a [`RecordStore`] (hosted HTTP store or in-memory), and
//! exposes aggregate statistics built from the same primitives.

pub mod client;
pub mod executor;
pub mod memory;
pub mod query;
pub mod rest;
pub mod stats;
pub mod store;

use thiserror::Error;

/// Name of the one table this platform reads
pub const FIRMS_TABLE: &str = "firms";

// Re-exports
pub use client::{init_store, store, StoreConfig};
pub use executor::QueryExecutor;
pub use memory::MemoryStore;
pub use query::{OrderBy, Predicate, QueryBuilder, QuerySpec, RowRange};
pub use rest::RestStore;
pub use stats::{
    CompletenessReport, DashboardStats, Distribution, FieldCompleteness, StateCount,
};
pub use store::RecordStore;

/// Errors that can occur while reading from the remote store.
///
/// Every failure is surfaced exactly once; no automatic retry is performed.
/// The caller converts these into a user-visible inline message, and a later
/// user action (filter change or explicit reload) is the only retry path.
#[derive(Error, Debug)]
pub enum RemoteQueryError {
    #[error("store unreachable: {0}")]
    Transport(String),

    #[error("store rejected the query (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("malformed query: {0}")]
    InvalidQuery(String),

    #[error("remote store has not been initialized")]
    Uninitialized,
}

impl From<reqwest::Error> for RemoteQueryError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            RemoteQueryError::Decode(error.to_string())
        } else {
            RemoteQueryError::Transport(error.to_string())
        }
    }
}
