//! CSV serialization
//!
//! Header row of human-readable column labels, every field double-quote
//! wrapped with embedded quotes doubled, comma separator, UTF-8.

use std::io::Write;

use fa_core::{columns, Row, Value};

use crate::ExportError;

/// Serialize rows to CSV in the given column order
pub fn write_csv<W: Write>(columns: &[String], rows: &[Row], out: W) -> Result<(), ExportError> {
    let mut writer =
        csv::WriterBuilder::new().quote_style(csv::QuoteStyle::Always).from_writer(out);

    writer.write_record(columns.iter().map(|c| columns::label(c)))?;
    for row in rows {
        writer.write_record(
            columns.iter().map(|c| row.get(c).unwrap_or(&Value::Null).cell_text()),
        )?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, city: &str, score: f64) -> Row {
        let mut row = Row::new();
        row.insert("firm_name".into(), name.into());
        row.insert("city".into(), city.into());
        row.insert("acquisition_score".into(), Value::Number(score));
        row
    }

    #[test]
    fn header_uses_display_labels() {
        let cols = vec!["firm_name".to_string(), "acquisition_score".to_string()];
        let mut out = Vec::new();
        write_csv(&cols, &[row("Acme", "Tampa", 80.0)], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\"Firm Name\",\"Score\"\n"));
        assert!(text.contains("\"Acme\",\"80\""));
    }

    #[test]
    fn round_trips_commas_and_quotes() {
        let tricky = r#"Smith, Jones & "Partners" LLC"#;
        let cols = vec!["firm_name".to_string(), "city".to_string()];
        let mut out = Vec::new();
        write_csv(&cols, &[row(tricky, "Mobile", 50.0)], &mut out).unwrap();

        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(out.as_slice());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], tricky);
        assert_eq!(&record[1], "Mobile");
    }

    #[test]
    fn missing_and_null_cells_serialize_empty() {
        let cols = vec!["firm_name".to_string(), "phone".to_string()];
        let mut out = Vec::new();
        write_csv(&cols, &[row("Acme", "Tampa", 80.0)], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().nth(1).unwrap().ends_with(",\"\""));
    }
}
