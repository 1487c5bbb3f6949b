//! `import`: merge a workbook into a table without the server

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::*;

use crate::config::Config;
use crate::services::PanelService;
use crate::store::{TableKind, TableStore};

pub async fn handle_import_command(config: &Config, kind: TableKind, file: &Path) -> Result<()> {
    let bytes = fs::read(file)
        .with_context(|| format!("Failed to read workbook: {}", file.display()))?;
    let file_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    let store = Arc::new(TableStore::new(&config.data_dir, config.files.clone()));
    let service = PanelService::new(store);
    let report = service
        .import(kind, file_name, bytes)
        .await
        .with_context(|| format!("Failed to import {} into {}", file.display(), kind))?;

    println!(
        "{} {} into {}",
        "Imported".bright_green().bold(),
        file.display(),
        kind.to_string().cyan()
    );
    println!(
        "  {} replaced, {} added, {} duplicates dropped, {} blank keys skipped",
        report.replaced, report.added, report.duplicates_dropped, report.blank_keys_skipped
    );
    println!("  {} rows total", report.total_rows);
    if report.invalid_slot_counts > 0 {
        println!(
            "  {} {} rows with an invalid slot count",
            "Warning:".yellow().bold(),
            report.invalid_slot_counts
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::profile_cols;
    use crate::store::{Record, Table, excel};

    #[tokio::test]
    async fn test_import_file_into_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: dir.path().join("data"),
            ..Config::default()
        };

        let upload = dir.path().join("upload.xlsx");
        let mut table = Table::with_columns(&[profile_cols::EMAIL, profile_cols::NAME]);
        table.push(
            Record::new()
                .with(profile_cols::EMAIL, "ann@x.com")
                .with(profile_cols::NAME, "Ann"),
        );
        excel::write_table(&table, &upload, "upload").unwrap();

        handle_import_command(&config, TableKind::Profiles, &upload)
            .await
            .unwrap();

        let stored = excel::read_table(&config.data_dir.join("Panel.xlsx")).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.rows()[0].get(profile_cols::NAME).to_text(), "Ann");
    }
}
