//! Spreadsheet-backed table store
//!
//! Each table lives in its own .xlsx file under the data directory. A table is
//! always read and written whole; writes go through [`TableStore::modify`],
//! which holds the table's lock for the full load-modify-save cycle.

pub mod excel;
pub mod locks;
pub mod schema;
pub mod table;
pub mod value;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use locks::TableLocks;
pub use schema::TableKind;
pub use table::{Record, Table};
pub use value::CellValue;

/// File names of each table, relative to the data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFiles {
    pub profiles: String,
    pub slots: String,
    pub credentials: String,
}

impl Default for TableFiles {
    fn default() -> Self {
        Self {
            profiles: "Panel.xlsx".to_string(),
            slots: "Slots.xlsx".to_string(),
            credentials: "Credentials.xlsx".to_string(),
        }
    }
}

impl TableFiles {
    fn file_name(&self, kind: TableKind) -> &str {
        match kind {
            TableKind::Profiles => &self.profiles,
            TableKind::Slots => &self.slots,
            TableKind::Credentials => &self.credentials,
        }
    }
}

/// Process-wide access point for all tables
#[derive(Debug)]
pub struct TableStore {
    data_dir: PathBuf,
    files: TableFiles,
    locks: TableLocks,
}

impl TableStore {
    pub fn new(data_dir: impl Into<PathBuf>, files: TableFiles) -> Self {
        Self {
            data_dir: data_dir.into(),
            files,
            locks: TableLocks::new(),
        }
    }

    pub fn path(&self, kind: TableKind) -> PathBuf {
        self.data_dir.join(self.files.file_name(kind))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Create any missing table files with their declared columns
    pub async fn initialize(&self) -> Result<()> {
        for kind in [TableKind::Profiles, TableKind::Slots] {
            self.read(kind).await?;
        }
        Ok(())
    }

    /// Load a table under its lock without writing it back
    pub async fn read(&self, kind: TableKind) -> Result<Table> {
        let _guard = self.locks.acquire(kind).await;
        self.file(kind).load_blocking().await
    }

    /// Run a load-modify-save cycle under the table's lock.
    ///
    /// File I/O runs on the blocking pool; `f` runs in memory between the two.
    /// The table is saved only if `f` returns `Ok`.
    pub async fn modify<T, E, F>(&self, kind: TableKind, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Table) -> Result<T, E>,
        E: From<anyhow::Error>,
    {
        let _guard = self.locks.acquire(kind).await;
        let file = self.file(kind);
        let mut table = file.clone().load_blocking().await?;
        let out = f(&mut table)?;
        file.save_blocking(table).await?;
        Ok(out)
    }

    fn file(&self, kind: TableKind) -> TableFile {
        TableFile {
            kind,
            dir: self.data_dir.clone(),
            path: self.path(kind),
        }
    }
}

/// Owned location of one table, movable onto the blocking pool.
/// Callers must hold the table lock.
#[derive(Debug, Clone)]
struct TableFile {
    kind: TableKind,
    dir: PathBuf,
    path: PathBuf,
}

impl TableFile {
    async fn load_blocking(self) -> Result<Table> {
        tokio::task::spawn_blocking(move || self.load())
            .await
            .context("Table load task failed")?
    }

    async fn save_blocking(self, table: Table) -> Result<()> {
        tokio::task::spawn_blocking(move || self.save(&table))
            .await
            .context("Table save task failed")?
    }

    /// Load the table; a missing file is created with the declared columns
    fn load(&self) -> Result<Table> {
        if !self.path.exists() {
            log::info!("Creating {} table at {}", self.kind, self.path.display());
            let table = Table::with_columns(self.kind.columns());
            self.save(&table)?;
            return Ok(table);
        }

        let table = excel::read_table(&self.path)?;
        log::debug!("Loaded {} rows from {}", table.len(), self.path.display());
        Ok(table)
    }

    fn save(&self, table: &Table) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data directory: {}", self.dir.display()))?;
        excel::write_table(table, &self.path, self.kind.as_str())?;
        log::debug!("Saved {} rows to {}", table.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, TableStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TableStore::new(dir.path().join("data"), TableFiles::default());
        (dir, store)
    }

    #[tokio::test]
    async fn test_missing_table_created_with_declared_columns() {
        let (_dir, store) = store();
        assert!(!store.path(TableKind::Slots).exists());

        let table = store.read(TableKind::Slots).await.unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), schema::SLOT_COLUMNS.len());
        assert!(store.path(TableKind::Slots).exists());

        // Second load reads the created file
        let again = store.read(TableKind::Slots).await.unwrap();
        assert_eq!(again.columns(), table.columns());
    }

    #[tokio::test]
    async fn test_modify_saves_on_success_only() {
        let (_dir, store) = store();

        store
            .modify(TableKind::Profiles, |t| {
                t.push(Record::new().with(schema::profile_cols::EMAIL, "a@x.com"));
                Ok::<_, anyhow::Error>(())
            })
            .await
            .unwrap();

        let failed: Result<(), anyhow::Error> = store
            .modify(TableKind::Profiles, |t| {
                t.push(Record::new().with(schema::profile_cols::EMAIL, "b@x.com"));
                anyhow::bail!("rejected")
            })
            .await;
        assert!(failed.is_err());

        let table = store.read(TableKind::Profiles).await.unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.rows()[0].get(schema::profile_cols::EMAIL).as_key(),
            "a@x.com"
        );
    }

    #[tokio::test]
    async fn test_concurrent_modifies_are_serialized() {
        let (_dir, store) = store();
        let store = std::sync::Arc::new(store);

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .modify(TableKind::Profiles, move |t| {
                        t.push(
                            Record::new().with(schema::profile_cols::EMAIL, format!("p{i}@x.com")),
                        );
                        Ok::<_, anyhow::Error>(())
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let table = store.read(TableKind::Profiles).await.unwrap();
        assert_eq!(table.len(), 8);
    }

    #[tokio::test]
    async fn test_table_io_yields_to_other_tasks() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let (_dir, store) = store();
        let ran = std::sync::Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let other = tokio::spawn(async move { flag.store(true, Ordering::SeqCst) });

        // On the single-threaded test runtime the other task only runs if
        // loading the file suspends this one
        let seen = store
            .modify(TableKind::Slots, |_| {
                Ok::<_, anyhow::Error>(ran.load(Ordering::SeqCst))
            })
            .await
            .unwrap();
        assert!(seen);
        other.await.unwrap();
    }

    #[tokio::test]
    async fn test_initialize_creates_profile_and_slot_tables() {
        let (_dir, store) = store();
        store.initialize().await.unwrap();
        assert!(store.path(TableKind::Profiles).exists());
        assert!(store.path(TableKind::Slots).exists());
        assert!(!store.path(TableKind::Credentials).exists());
    }
}
