//! Batched export of filtered record sets
//!
//! Drives the query executor in large batches over the *current* filter
//! state (not the current page), then serializes the accumulated rows to CSV
//! or a single-sheet spreadsheet. A failed batch discards everything already
//! fetched: a truncated silent export is worse than a visible failure.

mod exporter;
mod options;
mod sheet;
mod writer;

pub use exporter::{ExportPhase, Exporter};
pub use options::{ExportFormat, ExportOptions, DEFAULT_BATCH_SIZE, DEFAULT_ROW_CAP};
pub use sheet::write_xlsx;
pub use writer::write_csv;

use fa_data::RemoteQueryError;
use thiserror::Error;

/// Errors surfaced by an export run
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("batch fetch failed: {0}")]
    Fetch(#[from] RemoteQueryError),

    #[error("an export is already in progress for this view")]
    InProgress,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV serialization error: {0}")]
    Csv(String),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),
}

impl From<csv::Error> for ExportError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => {
                ExportError::Io(std::io::Error::new(io_err.kind(), error.to_string()))
            }
            _ => ExportError::Csv(error.to_string()),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(error: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::Spreadsheet(error.to_string())
    }
}
