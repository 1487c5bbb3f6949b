//! Read a table from the first worksheet of an .xlsx workbook

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx, open_workbook};

use crate::store::table::{Record, Table};
use crate::store::value::{CellValue, parse_datetime};

/// Read a table from an .xlsx file on disk
pub fn read_table(path: &Path) -> Result<Table> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;
    read_first_sheet(&mut workbook)
        .with_context(|| format!("Failed to read table from {}", path.display()))
}

/// Read a table from an in-memory workbook (uploaded file)
pub fn read_table_from_bytes(bytes: Vec<u8>) -> Result<Table> {
    let mut workbook =
        Xlsx::new(Cursor::new(bytes)).context("Uploaded file is not a valid .xlsx workbook")?;
    read_first_sheet(&mut workbook)
}

fn read_first_sheet<RS: Read + Seek>(workbook: &mut Xlsx<RS>) -> Result<Table> {
    let sheet_name = workbook
        .sheet_names()
        .first()
        .context("Excel file has no sheets")?
        .clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    let mut rows = range.rows();
    let header = match rows.next() {
        Some(header) => header,
        None => return Ok(Table::default()),
    };

    // (column index, column name); blank and repeated headers are ignored
    let mut columns: Vec<(usize, String)> = Vec::new();
    for (col, cell) in header.iter().enumerate() {
        let name = cell_to_value(cell).to_text().trim().to_string();
        if name.is_empty() || columns.iter().any(|(_, existing)| *existing == name) {
            continue;
        }
        columns.push((col, name));
    }

    let mut records = Vec::new();
    for row in rows {
        let mut record = Record::new();
        let mut any_value = false;
        for (col, name) in &columns {
            let value = row.get(*col).map(cell_to_value).unwrap_or_default();
            any_value |= !value.is_blank();
            record.set(name.clone(), value);
        }
        if any_value {
            records.push(record);
        }
    }

    let names = columns.into_iter().map(|(_, name)| name).collect();
    Ok(Table::from_parts(names, records))
}

fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => {
            // Excel stores every number as a float
            if f.fract() == 0.0 && f.abs() < 9.0e15 {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Float(dt.as_f64())),
        Data::DateTimeIso(s) => parse_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::text(s.clone())),
        Data::DurationIso(s) => CellValue::text(s.clone()),
        Data::Error(e) => {
            log::warn!("Ignoring cell with Excel error value: {:?}", e);
            CellValue::Empty
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::excel::{write_table, write_table_to_buffer};

    fn sample() -> Table {
        let mut table = Table::with_columns(&["Panel Email ID", "Panel Name", "Slot Count"]);
        table.push(
            Record::new()
                .with("Panel Email ID", "ann@x.com")
                .with("Panel Name", "Ann")
                .with("Slot Count", 3i64),
        );
        table.push(Record::new().with("Panel Email ID", "bob@x.com"));
        table
    }

    #[test]
    fn test_read_written_file_preserves_columns_and_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.xlsx");
        write_table(&sample(), &path, "profiles").unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(
            table.columns(),
            &["Panel Email ID", "Panel Name", "Slot Count"]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].get("Slot Count"), &CellValue::Int(3));
        assert_eq!(table.rows()[1].get("Panel Name"), &CellValue::Empty);
    }

    #[test]
    fn test_read_from_bytes() {
        let bytes = write_table_to_buffer(&sample(), "upload").unwrap();
        let table = read_table_from_bytes(bytes).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].get("Panel Email ID").as_key(), "ann@x.com");
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        assert!(read_table_from_bytes(b"not a workbook".to_vec()).is_err());
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(cell_to_value(&Data::Float(12.0)), CellValue::Int(12));
        assert_eq!(cell_to_value(&Data::Float(1.5)), CellValue::Float(1.5));
        assert_eq!(cell_to_value(&Data::String(String::new())), CellValue::Empty);
        assert_eq!(
            cell_to_value(&Data::DateTimeIso("2024-05-06".into())).to_text(),
            "2024-05-06"
        );
    }
}
