//! Identifier-keyed upsert over a table
//!
//! Keys are compared in normalized text form (see [`CellValue::as_key`]), so a
//! numeric identifier read from a workbook matches the same identifier
//! submitted as a string.

use serde::Serialize;

use super::error::EngineError;
use crate::store::{CellValue, Record, Table};

/// How a supplied value is applied to an existing row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Blank values leave the stored value untouched
    SkipBlank,
    /// Always overwrite, even with a blank value
    Replace,
}

/// A single column assignment
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    pub column: &'static str,
    pub value: CellValue,
    pub policy: WritePolicy,
}

impl FieldUpdate {
    pub fn skip_blank(column: &'static str, value: impl Into<CellValue>) -> Self {
        Self {
            column,
            value: value.into(),
            policy: WritePolicy::SkipBlank,
        }
    }

    pub fn replace(column: &'static str, value: impl Into<CellValue>) -> Self {
        Self {
            column,
            value: value.into(),
            policy: WritePolicy::Replace,
        }
    }
}

/// Which of insert/update an upsert is allowed to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertMode {
    CreateOrUpdate,
    /// Fail with `AlreadyExists` instead of updating
    CreateOnly,
    /// Fail with `KeyNotFound` instead of inserting
    UpdateOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Add every declared column the table lacks, empty for existing rows.
/// Never removes columns. Returns the number of columns added.
pub fn ensure_columns(table: &mut Table, declared: &[&str]) -> usize {
    declared
        .iter()
        .filter(|column| table.add_column(column))
        .count()
}

/// Index of the single row whose key matches, `None` if absent.
/// More than one match is a `DuplicateKey` error.
pub fn find_unique(table: &Table, key_field: &str, key_value: &str) -> Result<Option<usize>, EngineError> {
    if !table.has_column(key_field) {
        return Err(EngineError::MissingKeyColumn {
            table: "target",
            key_field: key_field.to_string(),
        });
    }

    let key = key_value.trim();
    let positions = table.positions_by_key(key_field, key);
    match positions.as_slice() {
        [] => Ok(None),
        [idx] => Ok(Some(*idx)),
        _ => Err(EngineError::DuplicateKey {
            key_field: key_field.to_string(),
            key: key.to_string(),
            count: positions.len(),
        }),
    }
}

/// Insert a row for `key_value` or update the existing one in place
pub fn upsert(
    table: &mut Table,
    key_field: &str,
    key_value: &str,
    updates: &[FieldUpdate],
    mode: UpsertMode,
) -> Result<UpsertOutcome, EngineError> {
    let key = key_value.trim();
    if key.is_empty() {
        return Err(EngineError::BlankKey {
            key_field: key_field.to_string(),
        });
    }

    match find_unique(table, key_field, key)? {
        None => {
            if mode == UpsertMode::UpdateOnly {
                return Err(EngineError::KeyNotFound {
                    key_field: key_field.to_string(),
                    key: key.to_string(),
                });
            }

            let mut record = Record::new();
            for column in table.columns() {
                record.set(column.clone(), CellValue::Empty);
            }
            record.set(key_field, CellValue::String(key.to_string()));
            for update in updates.iter().filter(|u| u.column != key_field) {
                record.set(update.column, update.value.clone());
            }
            table.push(record);
            Ok(UpsertOutcome::Created)
        }
        Some(idx) => {
            if mode == UpsertMode::CreateOnly {
                return Err(EngineError::AlreadyExists {
                    key_field: key_field.to_string(),
                    key: key.to_string(),
                });
            }

            for update in updates {
                table.add_column(update.column);
            }
            let row = &mut table.rows_mut()[idx];
            for update in updates.iter().filter(|u| u.column != key_field) {
                if update.policy == WritePolicy::SkipBlank && update.value.is_blank() {
                    continue;
                }
                row.set(update.column, update.value.clone());
            }
            Ok(UpsertOutcome::Updated)
        }
    }
}
