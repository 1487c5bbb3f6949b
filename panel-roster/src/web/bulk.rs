//! Admin-only workbook uploads

use axum::Json;
use axum::extract::{Multipart, Query, State};
use axum::http::HeaderMap;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{AppError, AppState};
use crate::auth::Capability;
use crate::store::TableKind;

const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct BulkQuery {
    pub table: Option<TableKind>,
}

pub async fn save_bulk(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<BulkQuery>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let kind = query.table.unwrap_or(TableKind::Profiles);
    import_upload(state, headers, kind, multipart).await
}

pub async fn import_profiles(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    import_upload(state, headers, TableKind::Profiles, multipart).await
}

async fn import_upload(
    state: AppState,
    headers: HeaderMap,
    kind: TableKind,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let session = state.authorize(&headers, Capability::AdminOnly).await?;
    let (file_name, bytes) = read_upload(multipart).await?;

    log::info!(
        "{} uploaded {} ({} bytes) for {}",
        session.identity,
        file_name,
        bytes.len(),
        kind
    );
    let report = state.panel.import(kind, &file_name, bytes).await?;

    Ok(Json(json!({
        "message": "Data merged and saved successfully!",
        "report": report,
    })))
}

/// File name and contents of the `file` field
async fn read_upload(mut multipart: Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(err.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(AppError::BadRequest("No selected file".to_string()));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::BadRequest(err.body_text()))?;
        return Ok((file_name, bytes.to_vec()));
    }

    Err(AppError::BadRequest("No file part".to_string()))
}
