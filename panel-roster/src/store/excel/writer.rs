//! Write a table to an .xlsx workbook

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::store::table::Table;
use crate::store::value::{CellValue, format_datetime};

/// Write a table to an Excel file, replacing it wholesale.
///
/// The workbook is saved to a sibling temp file first and renamed over the
/// target, so a failed save leaves the previous file intact.
pub fn write_table(table: &Table, path: &Path, sheet_name: &str) -> Result<()> {
    let mut workbook = build_workbook(table, sheet_name)?;

    let tmp_path = path.with_extension("xlsx.tmp");
    workbook
        .save(&tmp_path)
        .with_context(|| format!("Failed to save Excel file: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to replace Excel file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
pub fn write_table_to_buffer(table: &Table, sheet_name: &str) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(table, sheet_name)?;
    Ok(workbook.save_to_buffer()?)
}

fn build_workbook(table: &Table, sheet_name: &str) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    // Header
    for (col, name) in table.columns().iter().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }

    for (row_idx, record) in table.rows().iter().enumerate() {
        let row = (row_idx + 1) as u32;
        for (col, name) in table.columns().iter().enumerate() {
            write_value(worksheet, row, col as u16, record.get(name))?;
        }
    }

    Ok(workbook)
}

fn write_value(ws: &mut Worksheet, row: u32, col: u16, value: &CellValue) -> Result<()> {
    match value {
        CellValue::Empty => { /* Leave cell empty */ }
        CellValue::String(s) => { ws.write_string(row, col, s)?; }
        CellValue::Int(i) => { ws.write_number(row, col, *i as f64)?; }
        CellValue::Float(f) => { ws.write_number(row, col, *f)?; }
        CellValue::Bool(b) => { ws.write_boolean(row, col, *b)?; }
        CellValue::DateTime(dt) => { ws.write_string(row, col, format_datetime(dt))?; }
    }
    Ok(())
}
