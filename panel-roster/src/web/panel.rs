//! Profile and slot routes

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::{AppError, AppState};
use crate::auth::Capability;
use crate::services::UpsertOutcome;
use crate::services::panel::{ProfileForm, SlotForm};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub employee_id: String,
}

fn message(text: &str, outcome: UpsertOutcome) -> Json<Value> {
    Json(json!({ "message": text, "outcome": outcome }))
}

pub async fn save_data(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ProfileForm>,
) -> Result<Json<Value>, AppError> {
    state.authorize(&headers, Capability::General).await?;
    let outcome = state.panel.create_profile(&form).await?;
    Ok(message("Profile created successfully!", outcome))
}

pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ProfileForm>,
) -> Result<Json<Value>, AppError> {
    state.authorize(&headers, Capability::General).await?;
    let outcome = state.panel.update_profile(&form).await?;
    let text = match outcome {
        UpsertOutcome::Created => "Profile created successfully!",
        UpsertOutcome::Updated => "Profile updated successfully!",
    };
    Ok(message(text, outcome))
}

pub async fn save_slot(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SlotForm>,
) -> Result<Json<Value>, AppError> {
    state.authorize(&headers, Capability::General).await?;
    let outcome = state.panel.save_slot(&form).await?;
    Ok(message("Slot saved successfully!", outcome))
}

pub async fn update_slot(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SlotForm>,
) -> Result<Json<Value>, AppError> {
    state.authorize(&headers, Capability::General).await?;
    let outcome = state.panel.update_slot(&form).await?;
    Ok(message("Slot updated successfully!", outcome))
}

pub async fn search_employee(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Map<String, Value>>, AppError> {
    state.authorize(&headers, Capability::General).await?;
    Ok(Json(state.panel.find_profile(&query.employee_id).await?))
}

pub async fn search_slot(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Map<String, Value>>, AppError> {
    state.authorize(&headers, Capability::General).await?;
    Ok(Json(state.panel.find_slot(&query.employee_id).await?))
}
