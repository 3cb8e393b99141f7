//! Export configuration

use std::path::PathBuf;

/// Rows fetched per batch during export
pub const DEFAULT_BATCH_SIZE: usize = 1000;
/// Hard cap on exported rows, whatever the filters match
pub const DEFAULT_ROW_CAP: usize = 10_000;

/// Excel limits sheet names to 31 characters
const SHEET_NAME_LIMIT: usize = 31;

/// Output format for an export run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

/// Options for one export run
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Columns to serialize, in on-screen table order
    pub columns: Vec<String>,
    /// Destination file
    pub path: PathBuf,
    /// Sheet name for the spreadsheet variant, normally the active data
    /// source's label; truncated to the format's length limit
    pub sheet_name: String,
    pub batch_size: usize,
    pub row_cap: usize,
}

impl ExportOptions {
    pub fn new(format: ExportFormat, columns: &[&str], path: impl Into<PathBuf>) -> Self {
        Self {
            format,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            path: path.into(),
            sheet_name: "export".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            row_cap: DEFAULT_ROW_CAP,
        }
    }

    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Sheet name clipped to the spreadsheet limit
    pub fn clipped_sheet_name(&self) -> &str {
        let mut end = self.sheet_name.len().min(SHEET_NAME_LIMIT);
        while !self.sheet_name.is_char_boundary(end) {
            end -= 1;
        }
        &self.sheet_name[..end]
    }
}
