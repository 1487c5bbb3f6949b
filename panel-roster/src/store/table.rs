//! In-memory table: ordered columns and ordered records

use std::collections::HashMap;

use super::value::CellValue;

static EMPTY: CellValue = CellValue::Empty;

/// One row, keyed by column name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    values: HashMap<String, CellValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell, `Empty` if the column has no value in this row
    pub fn get(&self, column: &str) -> &CellValue {
        self.values.get(column).unwrap_or(&EMPTY)
    }

    pub fn set(&mut self, column: impl Into<String>, value: CellValue) {
        self.values.insert(column.into(), value);
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Builder-style setter used by tests and the CLI
    pub fn with(mut self, column: &str, value: impl Into<CellValue>) -> Self {
        self.set(column, value.into());
        self
    }
}

/// A named ordered collection of same-shaped records
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Table {
    /// Create an empty table with the given column order
    pub fn with_columns<S: AsRef<str>>(columns: &[S]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn from_parts(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Record] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Append a column; every existing row gets an empty value for it.
    /// Returns false if the column already exists.
    pub fn add_column(&mut self, column: &str) -> bool {
        if self.has_column(column) {
            return false;
        }
        self.columns.push(column.to_string());
        for row in &mut self.rows {
            if !row.contains(column) {
                row.set(column, CellValue::Empty);
            }
        }
        true
    }

    /// Append a row. Columns the row carries but the table lacks are added.
    pub fn push(&mut self, record: Record) {
        let extra: Vec<String> = record
            .values
            .keys()
            .filter(|k| !self.has_column(k))
            .cloned()
            .collect();
        for column in extra {
            self.add_column(&column);
        }
        self.rows.push(record);
    }

    /// Indices of rows whose normalized key equals `key`
    pub fn positions_by_key(&self, key_field: &str, key: &str) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.get(key_field).as_key() == key)
            .map(|(idx, _)| idx)
            .collect()
    }
}
