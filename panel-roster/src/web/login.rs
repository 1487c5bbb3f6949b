//! Login, logout and the landing page

use axum::Form;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::SET_COOKIE;
use axum::response::{Html, IntoResponse, Redirect, Response};
use chrono::Utc;
use serde::Deserialize;

use super::{AppError, AppState, cookie, pages};
use crate::auth::Capability;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    let session = state.authorize(&headers, Capability::General).await?;
    Ok(Html(pages::index(&session)))
}

pub async fn login_page() -> Html<&'static str> {
    Html(pages::LOGIN)
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let identity = form.email.trim().to_string();
    let verifier = state.verifier.clone();
    let (who, secret) = (identity.clone(), form.password);

    // Credential lookups read the workbook from disk
    let role = tokio::task::spawn_blocking(move || verifier.verify(&who, &secret))
        .await
        .map_err(|err| AppError::Internal(err.into()))?
        .map_err(|err| {
            log::warn!("Login failed for {}: {}", identity, err);
            AppError::from(err)
        })?;

    let token = state.sessions.create(&identity, role).await;
    let active = state.sessions.len().await;
    log::info!("{} logged in as {} ({} active sessions)", identity, role, active);

    let cookie = cookie::session_cookie(
        &state.config.session_cookie,
        &token.to_string(),
        state.sessions.ttl(),
    );
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let name = &state.config.session_cookie;
    if let Some(token) = cookie::cookie_value(&headers, name) {
        if let Some(session) = state.sessions.remove(&token).await {
            let minutes = (Utc::now() - session.created_at).num_minutes();
            log::info!("{} logged out after {} min", session.identity, minutes);
        }
    }

    ([(SET_COOKIE, cookie::expired_cookie(name))], Redirect::to("/login")).into_response()
}
