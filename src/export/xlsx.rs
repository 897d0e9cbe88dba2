//! Excel codec
//!
//! Writes workbooks with `rust_xlsxwriter` and reads them back (xlsx, xls or
//! ods) with `calamine`. The first row of every sheet is its header row.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, XlsxError};

use crate::error::{FinTrackError, FinTrackResult};

use super::workbook::{Cell, Sheet, Workbook};

fn export_error(e: XlsxError) -> FinTrackError {
    FinTrackError::Export(e.to_string())
}

/// Write a workbook to an `.xlsx` file
pub fn write_xlsx(workbook: &Workbook, path: &Path) -> FinTrackResult<()> {
    let mut book = XlsxWorkbook::new();
    let bold = Format::new().set_bold();

    for sheet in &workbook.sheets {
        let worksheet = book.add_worksheet();
        worksheet.set_name(&sheet.name).map_err(export_error)?;

        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, header, &bold)
                .map_err(export_error)?;
        }

        for (r, row) in sheet.rows.iter().enumerate() {
            let r = (r + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                match cell {
                    Cell::Text(s) => {
                        worksheet.write_string(r, col, s).map_err(export_error)?;
                    }
                    Cell::Number(n) => {
                        worksheet.write_number(r, col, *n).map_err(export_error)?;
                    }
                    Cell::Empty => {}
                }
            }
        }

        worksheet.autofit();
    }

    book.save(path).map_err(export_error)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        other => Cell::Text(other.to_string()),
    }
}

/// Read every sheet of a spreadsheet file
pub fn read_xlsx(path: &Path) -> FinTrackResult<Workbook> {
    let mut book = open_workbook_auto(path)
        .map_err(|e| FinTrackError::Import(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut workbook = Workbook::new();

    for name in book.sheet_names() {
        let range = book
            .worksheet_range(&name)
            .map_err(|e| FinTrackError::Import(format!("Failed to read sheet '{}': {}", name, e)))?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row.iter().map(|d| to_cell(d).to_string()).collect(),
            None => Vec::new(),
        };

        let mut sheet = Sheet {
            name: name.clone(),
            headers,
            rows: Vec::new(),
        };
        for row in rows {
            sheet.push_row(row.iter().map(to_cell).collect());
        }

        workbook.push(sheet);
    }

    Ok(workbook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("book.xlsx");

        let mut sheet = Sheet::new("All Transactions", &["ID", "Amount", "Description"]);
        sheet.push_row(vec![Cell::text("abc"), Cell::Number(12.5), Cell::Empty]);
        sheet.push_row(vec![Cell::text("def"), Cell::Number(3.0), Cell::text("Bus")]);
        let mut workbook = Workbook::new();
        workbook.push(Sheet::new("Empty Sheet", &["Type"]));
        workbook.push(sheet);

        write_xlsx(&workbook, &path).unwrap();
        let read = read_xlsx(&path).unwrap();

        assert_eq!(read.sheet_names(), vec!["Empty Sheet", "All Transactions"]);
        let txns = read.sheet("All Transactions").unwrap();
        assert_eq!(txns.headers, vec!["ID", "Amount", "Description"]);
        assert_eq!(txns.rows.len(), 2);
        assert_eq!(txns.rows[0][1].as_number(), Some(12.5));
        assert_eq!(txns.rows[1][2], Cell::text("Bus"));
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(read_xlsx(&temp_dir.path().join("nope.xlsx")).is_err());
    }
}
