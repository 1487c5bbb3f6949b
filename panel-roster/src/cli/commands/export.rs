//! `export`: write a table as CSV

use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use crate::config::Config;
use crate::store::{Table, TableKind, TableStore};

pub async fn handle_export_command(config: &Config, kind: TableKind, output: &Path) -> Result<()> {
    let store = TableStore::new(&config.data_dir, config.files.clone());
    let path = store.path(kind);
    if !path.exists() {
        anyhow::bail!("No {} table at {}", kind, path.display());
    }

    let table = store.read(kind).await?;
    write_csv(&table, output)?;

    println!("Exported {} rows from {} to {}", table.len(), kind, output.display());
    Ok(())
}

/// Write the table's columns as the header row, then every row as text
pub fn write_csv(table: &Table, output: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(output)
        .with_context(|| format!("Failed to create CSV file: {}", output.display()))?;

    wtr.write_record(table.columns())
        .context("Failed to write CSV header")?;

    for (idx, row) in table.rows().iter().enumerate() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|column| row.get(column).to_text())
            .collect();
        wtr.write_record(&record)
            .with_context(|| format!("Failed to write row {}", idx + 1))?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    log::info!("CSV file exported to: {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Record;
    use crate::store::schema::slot_cols;
    use std::fs;

    #[test]
    fn test_write_csv_renders_cells_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("slots.csv");
        let mut table = Table::with_columns(&[slot_cols::EMAIL, slot_cols::COUNT]);
        table.push(
            Record::new()
                .with(slot_cols::EMAIL, "ann@x.com")
                .with(slot_cols::COUNT, 4i64),
        );
        table.push(Record::new().with(slot_cols::EMAIL, "bob, jr@x.com"));

        write_csv(&table, &output).unwrap();

        let text = fs::read_to_string(&output).unwrap();
        assert_eq!(
            text,
            "Panel Email ID,Slot Count\nann@x.com,4\n\"bob, jr@x.com\",\n"
        );
    }

    #[tokio::test]
    async fn test_export_missing_table_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let result =
            handle_export_command(&config, TableKind::Slots, &dir.path().join("out.csv")).await;
        assert!(result.is_err());
        assert!(!dir.path().join("Slots.xlsx").exists());
    }
}
