//! Panelist profile and slot operations
//!
//! Every write goes through the upsert engine inside a single
//! [`TableStore::modify`] cycle; lookups go through [`find_unique`].

mod import;
pub mod models;
mod profiles;
mod slots;

use std::sync::Arc;

use serde_json::{Map, Value};

pub use models::{ProfileForm, SlotForm};

use super::error::ServiceError;
use super::upsert::find_unique;
use crate::store::{TableKind, TableStore};

/// Entry point for the profile, slot and import operations
#[derive(Debug, Clone)]
pub struct PanelService {
    store: Arc<TableStore>,
}

impl PanelService {
    pub fn new(store: Arc<TableStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TableStore {
        &self.store
    }

    /// Look up one row by identifier and render it as a JSON object
    async fn find_row(
        &self,
        kind: TableKind,
        id: &str,
        not_found: &str,
    ) -> Result<Map<String, Value>, ServiceError> {
        let id = require_identifier(id)?;
        let table = self.store.read(kind).await?;

        let idx = find_unique(&table, kind.key_column(), id)?
            .ok_or_else(|| ServiceError::NotFound(not_found.to_string()))?;

        let row = &table.rows()[idx];
        Ok(table
            .columns()
            .iter()
            .map(|column| (column.clone(), row.get(column).to_json()))
            .collect())
    }
}

/// Trimmed identifier, or a validation error if blank
fn require_identifier(id: &str) -> Result<&str, ServiceError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ServiceError::Validation(
            "Panel Email ID is required".to_string(),
        ));
    }
    Ok(id)
}
