//! Slot save/update/search

use serde_json::{Map, Value};

use super::{PanelService, SlotForm, require_identifier};
use crate::services::error::ServiceError;
use crate::services::upsert::{
    FieldUpdate, UpsertMode, UpsertOutcome, WritePolicy, ensure_columns, find_unique, upsert,
};
use crate::store::TableKind;
use crate::store::schema::{SLOT_COLUMNS, slot_cols};

/// Parse a slot count; only positive integers are accepted
pub fn parse_slot_count(text: &str) -> Result<i64, ServiceError> {
    match text.trim().parse::<i64>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(ServiceError::Validation(
            "Slot Count must be a positive integer".to_string(),
        )),
    }
}

impl PanelService {
    /// Save the slot schedule for an existing profile, overwriting any
    /// previous schedule for the same identifier.
    pub async fn save_slot(&self, form: &SlotForm) -> Result<UpsertOutcome, ServiceError> {
        let id = require_identifier(&form.email)?;
        let count = parse_slot_count(&form.slot_count)?;

        let profiles = self.store.read(TableKind::Profiles).await?;
        if find_unique(&profiles, TableKind::Profiles.key_column(), id)?.is_none() {
            return Err(ServiceError::NotFound(
                "Panel profile not found. Please create the profile first.".to_string(),
            ));
        }

        let mut updates = form.field_updates(WritePolicy::Replace);
        updates.push(FieldUpdate::replace(slot_cols::COUNT, count));

        let outcome = self
            .store
            .modify(TableKind::Slots, |table| {
                ensure_columns(table, SLOT_COLUMNS);
                upsert(
                    table,
                    TableKind::Slots.key_column(),
                    id,
                    &updates,
                    UpsertMode::CreateOrUpdate,
                )
                .map_err(ServiceError::from)
            })
            .await?;

        log::info!("Slot for {} {:?} ({} slots)", id, outcome, count);
        Ok(outcome)
    }

    /// Update an existing slot row. Blank fields keep stored values.
    pub async fn update_slot(&self, form: &SlotForm) -> Result<UpsertOutcome, ServiceError> {
        let id = require_identifier(&form.email)?;

        let mut updates = form.field_updates(WritePolicy::SkipBlank);
        if !form.slot_count.trim().is_empty() {
            let count = parse_slot_count(&form.slot_count)?;
            updates.push(FieldUpdate::skip_blank(slot_cols::COUNT, count));
        }

        let outcome = self
            .store
            .modify(TableKind::Slots, |table| {
                ensure_columns(table, SLOT_COLUMNS);
                upsert(
                    table,
                    TableKind::Slots.key_column(),
                    id,
                    &updates,
                    UpsertMode::UpdateOnly,
                )
                .map_err(ServiceError::from)
            })
            .await
            .map_err(|err| match err {
                ServiceError::NotFound(_) => {
                    ServiceError::NotFound("No slot found for this Email ID".to_string())
                }
                other => other,
            })?;

        log::info!("Slot for {} {:?}", id, outcome);
        Ok(outcome)
    }

    pub async fn find_slot(&self, id: &str) -> Result<Map<String, Value>, ServiceError> {
        self.find_row(TableKind::Slots, id, "Slot not found").await
    }
}
