//! Profile create/update/search

use serde_json::{Map, Value};

use super::{PanelService, ProfileForm, require_identifier};
use crate::services::error::ServiceError;
use crate::services::upsert::{UpsertMode, UpsertOutcome, ensure_columns, upsert};
use crate::store::TableKind;
use crate::store::schema::PROFILE_COLUMNS;

impl PanelService {
    /// Create a new profile; an existing identifier is a conflict
    pub async fn create_profile(&self, form: &ProfileForm) -> Result<UpsertOutcome, ServiceError> {
        self.write_profile(form, UpsertMode::CreateOnly)
            .await
            .map_err(|err| match err {
                ServiceError::Conflict(_) => ServiceError::Conflict(
                    "Profile with this Email ID already exists".to_string(),
                ),
                other => other,
            })
    }

    /// Create or update a profile. Blank fields keep stored values; the
    /// skills list is replaced as submitted.
    pub async fn update_profile(&self, form: &ProfileForm) -> Result<UpsertOutcome, ServiceError> {
        self.write_profile(form, UpsertMode::CreateOrUpdate).await
    }

    pub async fn find_profile(&self, id: &str) -> Result<Map<String, Value>, ServiceError> {
        self.find_row(TableKind::Profiles, id, "Employee not found")
            .await
    }

    async fn write_profile(
        &self,
        form: &ProfileForm,
        mode: UpsertMode,
    ) -> Result<UpsertOutcome, ServiceError> {
        let id = require_identifier(&form.email)?;
        let updates = form.field_updates();

        let outcome = self
            .store
            .modify(TableKind::Profiles, |table| {
                ensure_columns(table, PROFILE_COLUMNS);
                upsert(table, TableKind::Profiles.key_column(), id, &updates, mode)
                    .map_err(ServiceError::from)
            })
            .await?;

        log::info!("Profile {} {:?}", id, outcome);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{profile, service};
    use super::*;
    use crate::store::schema::profile_cols;

    #[tokio::test]
    async fn test_create_then_duplicate_is_conflict() {
        let (_dir, svc) = service();
        let outcome = svc.create_profile(&profile("ann@x.com", "Ann")).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Created);

        let err = svc
            .create_profile(&profile("ann@x.com", "Other"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let found = svc.find_profile("ann@x.com").await.unwrap();
        assert_eq!(found[profile_cols::NAME], "Ann");
    }

    #[tokio::test]
    async fn test_create_requires_identifier() {
        let (_dir, svc) = service();
        let err = svc.create_profile(&profile("  ", "Ann")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_blank_fields_and_replaces_skills() {
        let (_dir, svc) = service();
        let mut form = profile("ann@x.com", "Ann");
        form.geo = "EMEA".into();
        form.skill_1 = "Rust".into();
        svc.create_profile(&form).await.unwrap();

        let update = ProfileForm {
            email: "ann@x.com".into(),
            grade: "C2".into(),
            ..Default::default()
        };
        let outcome = svc.update_profile(&update).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);

        let found = svc.find_profile("ann@x.com").await.unwrap();
        assert_eq!(found[profile_cols::NAME], "Ann");
        assert_eq!(found[profile_cols::GEO], "EMEA");
        assert_eq!(found[profile_cols::GRADE], "C2");
        assert_eq!(found[profile_cols::SKILLS], "");
    }

    #[tokio::test]
    async fn test_update_creates_missing_profile() {
        let (_dir, svc) = service();
        let outcome = svc
            .update_profile(&profile("new@x.com", "New"))
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Created);
    }

    #[tokio::test]
    async fn test_search_unknown_is_not_found() {
        let (_dir, svc) = service();
        let err = svc.find_profile("ghost@x.com").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
