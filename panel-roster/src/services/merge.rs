//! Bulk merge of an incoming table into a canonical table
//!
//! Both inputs are de-duplicated by key (last occurrence wins), then the
//! incoming rows are laid over the canonical rows: a key present on both sides
//! takes the incoming row whole, keys present on one side are kept as they are.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::error::EngineError;
use crate::store::{Record, Table};

/// Counts describing what a merge did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub canonical_rows: usize,
    pub incoming_rows: usize,
    pub duplicates_dropped: usize,
    pub blank_keys_skipped: usize,
    pub replaced: usize,
    pub added: usize,
    pub total_rows: usize,
    /// Slot rows merged with a count that is not a positive integer
    pub invalid_slot_counts: usize,
}

/// Merge `incoming` into `canonical` by `key_field`
pub fn merge(
    canonical: &Table,
    incoming: &Table,
    key_field: &str,
) -> Result<(Table, MergeReport), EngineError> {
    for (name, table) in [("canonical", canonical), ("incoming", incoming)] {
        if !table.has_column(key_field) {
            return Err(EngineError::MissingKeyColumn {
                table: name,
                key_field: key_field.to_string(),
            });
        }
    }

    let mut report = MergeReport {
        canonical_rows: canonical.len(),
        incoming_rows: incoming.len(),
        ..Default::default()
    };

    let incoming_rows: Vec<&Record> = incoming
        .rows()
        .iter()
        .filter(|row| {
            let blank = row.get(key_field).is_blank();
            if blank {
                report.blank_keys_skipped += 1;
            }
            !blank
        })
        .collect();
    if report.blank_keys_skipped > 0 {
        log::warn!(
            "Skipping {} incoming rows with a blank {}",
            report.blank_keys_skipped,
            key_field
        );
    }

    let (incoming_rows, dropped) = dedup_keep_last(incoming_rows, key_field);
    report.duplicates_dropped += dropped;
    let (canonical_rows, dropped) = dedup_keep_last(canonical.rows().iter().collect(), key_field);
    report.duplicates_dropped += dropped;

    let incoming_keys: HashSet<String> = incoming_rows
        .iter()
        .map(|row| row.get(key_field).as_key())
        .collect();

    // Column order: canonical first, then columns only the upload carries
    let mut columns: Vec<String> = canonical.columns().to_vec();
    for column in incoming.columns() {
        if !columns.contains(column) {
            columns.push(column.clone());
        }
    }

    let mut rows = Vec::with_capacity(canonical_rows.len() + incoming_rows.len());
    for row in canonical_rows {
        if incoming_keys.contains(&row.get(key_field).as_key()) {
            report.replaced += 1;
        } else {
            rows.push(conform(row, &columns));
        }
    }
    report.added = incoming_rows.len() - report.replaced;
    for row in incoming_rows {
        rows.push(conform(row, &columns));
    }

    report.total_rows = rows.len();
    Ok((Table::from_parts(columns, rows), report))
}

/// Keep only the last occurrence of each key, preserving the order of the
/// surviving rows. Returns the rows and how many were dropped.
pub fn dedup_keep_last<'a>(rows: Vec<&'a Record>, key_field: &str) -> (Vec<&'a Record>, usize) {
    let keys: Vec<String> = rows.iter().map(|row| row.get(key_field).as_key()).collect();

    let mut last_index: HashMap<&str, usize> = HashMap::new();
    for (idx, key) in keys.iter().enumerate() {
        last_index.insert(key.as_str(), idx);
    }

    let total = rows.len();
    let kept: Vec<&Record> = rows
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| last_index.get(keys[*idx].as_str()) == Some(idx))
        .map(|(_, row)| row)
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}

/// Copy a row so it carries exactly the merged column set
fn conform(row: &Record, columns: &[String]) -> Record {
    let mut out = Record::new();
    for column in columns {
        out.set(column.clone(), row.get(column).clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::upsert::{FieldUpdate, UpsertMode, upsert};
    use crate::store::CellValue;

    const ID: &str = "id";
    const NAME: &str = "name";
    const GEO: &str = "geo";

    fn table(rows: &[(&str, &str)]) -> Table {
        let mut t = Table::with_columns(&[ID, NAME]);
        for (id, name) in rows {
            t.push(Record::new().with(ID, *id).with(NAME, *name));
        }
        t
    }

    fn names(t: &Table) -> Vec<(String, String)> {
        t.rows()
            .iter()
            .map(|r| (r.get(ID).as_key(), r.get(NAME).to_text()))
            .collect()
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect()
    }

    #[test]
    fn test_incoming_wins_on_collision() {
        let canonical = table(&[("E1", "Ann"), ("E2", "Cat")]);
        let incoming = table(&[("E1", "Bob"), ("E3", "Dan")]);

        let (merged, report) = merge(&canonical, &incoming, ID).unwrap();
        assert_eq!(
            names(&merged),
            pairs(&[("E2", "Cat"), ("E1", "Bob"), ("E3", "Dan")])
        );
        assert_eq!(report.replaced, 1);
        assert_eq!(report.added, 1);
        assert_eq!(report.total_rows, 3);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let canonical = table(&[("E1", "Ann"), ("E2", "Cat"), ("E2", "Cat2")]);
        let incoming = table(&[("E1", "Bob"), ("E3", "Dan"), ("E3", "Eve")]);

        let (once, _) = merge(&canonical, &incoming, ID).unwrap();
        let (twice, _) = merge(&once, &incoming, ID).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merged_table_has_unique_keys() {
        let canonical = table(&[("E1", "a"), ("E1", "b"), ("E2", "c")]);
        let incoming = table(&[("E2", "d"), ("E2", "e"), ("E4", "f")]);

        let (merged, report) = merge(&canonical, &incoming, ID).unwrap();
        let keys: Vec<String> = merged.rows().iter().map(|r| r.get(ID).as_key()).collect();
        let unique: HashSet<&String> = keys.iter().collect();
        assert_eq!(keys.len(), unique.len());
        assert_eq!(report.duplicates_dropped, 2);

        // Last occurrence wins within each input
        assert!(names(&merged).contains(&("E1".into(), "b".into())));
        assert!(names(&merged).contains(&("E2".into(), "e".into())));
    }

    #[test]
    fn test_full_row_replacement() {
        let mut canonical = Table::with_columns(&[ID, NAME, GEO]);
        canonical.push(Record::new().with(ID, "E1").with(NAME, "Ann").with(GEO, "EMEA"));
        let incoming = table(&[("E1", "Bob")]);

        let (merged, _) = merge(&canonical, &incoming, ID).unwrap();
        let row = &merged.rows()[0];
        assert_eq!(row.get(NAME).to_text(), "Bob");
        // The incoming row has no geo, so the canonical value is not kept
        assert!(row.get(GEO).is_blank());
    }

    #[test]
    fn test_numeric_and_string_keys_collide() {
        let mut canonical = Table::with_columns(&[ID, NAME]);
        canonical.push(Record::new().with(ID, CellValue::Int(7)).with(NAME, "old"));
        let incoming = table(&[("7", "new")]);

        let (merged, _) = merge(&canonical, &incoming, ID).unwrap();
        assert_eq!(names(&merged), pairs(&[("7", "new")]));
    }

    #[test]
    fn test_missing_key_column_aborts() {
        let canonical = table(&[("E1", "Ann")]);
        let incoming = Table::with_columns(&[NAME]);
        let err = merge(&canonical, &incoming, ID).unwrap_err();
        assert_eq!(
            err,
            EngineError::MissingKeyColumn {
                table: "incoming",
                key_field: ID.into()
            }
        );
    }

    #[test]
    fn test_incoming_blank_keys_skipped() {
        let canonical = table(&[("E1", "Ann")]);
        let incoming = table(&[("", "ghost"), ("E2", "Bob")]);
        let (merged, report) = merge(&canonical, &incoming, ID).unwrap();
        assert_eq!(report.blank_keys_skipped, 1);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_upsert_then_merge_example() {
        let mut profiles = table(&[]);
        upsert(&mut profiles, ID, "E1", &[FieldUpdate::skip_blank(NAME, "Ann")], UpsertMode::CreateOrUpdate).unwrap();
        upsert(&mut profiles, ID, "E1", &[FieldUpdate::skip_blank(NAME, "")], UpsertMode::CreateOrUpdate).unwrap();
        assert_eq!(names(&profiles), pairs(&[("E1", "Ann")]));

        let (merged, _) = merge(&profiles, &table(&[("E1", "Bob")]), ID).unwrap();
        assert_eq!(names(&merged), pairs(&[("E1", "Bob")]));
    }
}
