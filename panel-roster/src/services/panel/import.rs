//! Bulk import of uploaded workbooks

use std::path::Path;

use anyhow::Context;

use super::PanelService;
use super::slots::parse_slot_count;
use crate::services::error::ServiceError;
use crate::services::merge::{MergeReport, merge};
use crate::services::upsert::ensure_columns;
use crate::store::schema::slot_cols;
use crate::store::{Table, TableKind, excel};

impl PanelService {
    /// Merge an uploaded .xlsx workbook into a canonical table by identifier.
    ///
    /// Rows in the upload replace canonical rows with the same identifier.
    /// The upload itself is never persisted.
    pub async fn import(
        &self,
        kind: TableKind,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<MergeReport, ServiceError> {
        if kind == TableKind::Credentials {
            return Err(ServiceError::Validation(
                "Credentials cannot be imported".to_string(),
            ));
        }

        let is_xlsx = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
        if !is_xlsx {
            return Err(ServiceError::Validation(
                "Only .xlsx files are allowed".to_string(),
            ));
        }

        let incoming = tokio::task::spawn_blocking(move || excel::read_table_from_bytes(bytes))
            .await
            .context("Upload parse task failed")?
            .map_err(|err| {
                log::warn!("Rejected upload {}: {:#}", file_name, err);
                ServiceError::Validation(
                    "Uploaded file could not be read as a workbook".to_string(),
                )
            })?;

        let mut report = self
            .store
            .modify(kind, |canonical| {
                ensure_columns(canonical, kind.columns());
                let (mut merged, report) = merge(canonical, &incoming, kind.key_column())?;
                ensure_columns(&mut merged, kind.columns());
                *canonical = merged;
                Ok::<_, ServiceError>(report)
            })
            .await?;

        if kind == TableKind::Slots {
            report.invalid_slot_counts = flag_invalid_slot_counts(&incoming);
        }

        log::info!(
            "Imported {} into {}: {} replaced, {} added, {} total",
            file_name,
            kind,
            report.replaced,
            report.added,
            report.total_rows
        );
        Ok(report)
    }
}

/// Warn about uploaded slot rows whose non-blank count is not a positive
/// integer. The rows are still merged; returns how many there were.
fn flag_invalid_slot_counts(incoming: &Table) -> usize {
    let mut invalid = 0;
    for row in incoming.rows() {
        let count = row.get(slot_cols::COUNT);
        if count.is_blank() || parse_slot_count(&count.to_text()).is_ok() {
            continue;
        }
        invalid += 1;
        log::warn!(
            "Imported slot row for {} has invalid {}: {:?}",
            row.get(slot_cols::EMAIL).as_key(),
            slot_cols::COUNT,
            count.to_text()
        );
    }
    invalid
}
