//! Core types for the firm analytics platform
//!
//! This crate provides the value objects shared by every layer: the row/value
//! model, the column and source registries, filter/sort state, and pagination
//! math. Nothing here performs I/O.

pub mod columns;
pub mod filter;
pub mod paging;
pub mod value;

// Re-export commonly used types
pub use columns::{ColumnKind, ColumnSpec, SourceSpec};
pub use filter::{ColumnFilter, FilterState, RangeFilter, Sort, SortDirection};
pub use value::{QueryResult, Row, Value};
