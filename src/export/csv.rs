//! CSV codec
//!
//! A CSV file carries one sheet. On import it is named `Transactions`, the
//! legacy transactions sheet name the importer also accepts.

use std::io::{Read, Write};

use crate::error::{FinTrackError, FinTrackResult};

use super::sheets::LEGACY_TRANSACTIONS_SHEET;
use super::workbook::{Cell, Sheet};

/// Write one sheet as CSV, header row first
pub fn write_csv<W: Write>(sheet: &Sheet, writer: W) -> FinTrackResult<()> {
    let mut wtr = ::csv::Writer::from_writer(writer);

    wtr.write_record(&sheet.headers)
        .map_err(|e| FinTrackError::Export(e.to_string()))?;

    for row in &sheet.rows {
        let mut record: Vec<String> = row.iter().map(Cell::to_string).collect();
        record.resize(sheet.headers.len().max(record.len()), String::new());
        wtr.write_record(&record)
            .map_err(|e| FinTrackError::Export(e.to_string()))?;
    }

    wtr.flush()
        .map_err(|e| FinTrackError::Export(e.to_string()))?;
    Ok(())
}

/// Columns read back as numbers; every other column stays text
const NUMERIC_COLUMNS: [&str; 2] = ["Amount", "Total"];

/// Read a CSV with a header row into a sheet
///
/// Fields under `Amount` or `Total` become numbers when they parse, all other
/// fields stay text; empty fields become empty cells.
pub fn read_csv<R: Read>(reader: R) -> FinTrackResult<Sheet> {
    let mut rdr = ::csv::ReaderBuilder::new()
        .flexible(true)
        .trim(::csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| FinTrackError::Import(format!("Error reading CSV header: {}", e)))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();
    let numeric: Vec<bool> = headers
        .iter()
        .map(|h| NUMERIC_COLUMNS.contains(&h.as_str()))
        .collect();

    let mut sheet = Sheet {
        name: LEGACY_TRANSACTIONS_SHEET.to_string(),
        headers,
        rows: Vec::new(),
    };

    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| {
            FinTrackError::Import(format!("Error reading CSV record {}: {}", idx + 1, e))
        })?;
        sheet.push_row(
            record
                .iter()
                .enumerate()
                .map(|(col, field)| {
                    if field.is_empty() {
                        Cell::Empty
                    } else if numeric.get(col).copied().unwrap_or(false) {
                        parse_number(field)
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(sheet)
}

fn parse_number(field: &str) -> Cell {
    match field.parse::<f64>() {
        Ok(n) if n.is_finite() => Cell::Number(n),
        _ => Cell::Text(field.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_csv_quotes_and_pads() {
        let mut sheet = Sheet::new("All Transactions", &["ID", "Amount", "Description"]);
        sheet.push_row(vec![Cell::text("a1"), Cell::Number(12.5), Cell::text("Tacos, extra salsa")]);
        sheet.push_row(vec![Cell::text("a2"), Cell::Number(3.0)]);

        let mut out = Vec::new();
        write_csv(&sheet, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "ID,Amount,Description\na1,12.5,\"Tacos, extra salsa\"\na2,3,\n"
        );
    }

    #[test]
    fn test_read_csv_keeps_ids_as_text() {
        let data = "ID,Amount\n012345678901,5\n";
        let sheet = read_csv(data.as_bytes()).unwrap();

        assert_eq!(sheet.rows[0][0], Cell::text("012345678901"));
        assert_eq!(sheet.rows[0][1], Cell::Number(5.0));
    }

    #[test]
    fn test_numeric_looking_text_survives_roundtrip() {
        let mut sheet = Sheet::new("All Transactions", &["ID", "Amount", "Category", "Description"]);
        sheet.push_row(vec![Cell::text("a1"), Cell::Number(9.5), Cell::text("2024"), Cell::text("007")]);
        sheet.push_row(vec![Cell::text("a2"), Cell::Number(1.0), Cell::text("Food"), Cell::text("1.50")]);

        let mut out = Vec::new();
        write_csv(&sheet, &mut out).unwrap();
        let read = read_csv(out.as_slice()).unwrap();

        assert_eq!(read.rows[0][1], Cell::Number(9.5));
        assert_eq!(read.rows[0][2], Cell::text("2024"));
        assert_eq!(read.rows[0][3], Cell::text("007"));
        assert_eq!(read.rows[1][3], Cell::text("1.50"));
    }

    #[test]
    fn test_read_csv() {
        let data = "\u{feff}ID,Type,Amount,Date\nx1, EXPENSE ,42.10,1/5/2025\nx2,INCOME,,\n";
        let sheet = read_csv(data.as_bytes()).unwrap();

        assert_eq!(sheet.name, "Transactions");
        assert_eq!(sheet.headers, vec!["ID", "Type", "Amount", "Date"]);
        assert_eq!(sheet.rows[0][1], Cell::text("EXPENSE"));
        assert_eq!(sheet.rows[0][2], Cell::Number(42.1));
        assert_eq!(sheet.rows[0][3], Cell::text("1/5/2025"));
        assert_eq!(sheet.rows[1][2], Cell::Empty);
    }
}
