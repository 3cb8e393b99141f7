//! Spreadsheet serialization
//!
//! Single-sheet XLSX workbook named after the active data source. Numbers
//! are written as numbers so the spreadsheet sorts and sums correctly.

use std::path::Path;

use fa_core::{columns, Row, Value};
use rust_xlsxwriter::Workbook;

use crate::ExportError;

/// Write rows to a single-sheet XLSX workbook
pub fn write_xlsx(
    columns: &[String],
    rows: &[Row],
    sheet_name: &str,
    path: &Path,
) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name)?;

    for (col, name) in columns.iter().enumerate() {
        sheet.write_string(0, col as u16, columns::label(name))?;
    }

    for (r, row) in rows.iter().enumerate() {
        let excel_row = (r + 1) as u32;
        for (c, name) in columns.iter().enumerate() {
            let col = c as u16;
            match row.get(name) {
                Some(Value::Number(n)) => {
                    sheet.write_number(excel_row, col, *n)?;
                }
                Some(Value::Bool(b)) => {
                    sheet.write_boolean(excel_row, col, *b)?;
                }
                Some(Value::Text(s)) => {
                    sheet.write_string(excel_row, col, s)?;
                }
                Some(Value::Null) | None => {}
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}
