//! HTTP layer
//!
//! Every panel route resolves the session cookie and runs it through the role
//! gate before touching the services. Failures render through [`AppError`].

mod bulk;
mod cookie;
mod error;
mod login;
mod pages;
mod panel;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderMap;
use axum::routing::{get, post};

pub use error::AppError;

use crate::auth::{AuthState, Capability, CredentialVerifier, Session, SessionStore};
use crate::config::Config;
use crate::services::PanelService;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub panel: PanelService,
    pub sessions: Arc<SessionStore>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Resolve the request's session and check it against `capability`
    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        capability: Capability,
    ) -> Result<Session, AppError> {
        let session = match cookie::cookie_value(headers, &self.config.session_cookie) {
            Some(token) => self.sessions.resolve(&token).await,
            None => None,
        };
        AuthState::from_session(session)
            .authorize(capability)
            .ok_or(AppError::Forbidden)
    }
}

pub fn router(state: AppState) -> Router {
    let max_upload = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(login::index))
        .route("/login", get(login::login_page).post(login::login))
        .route("/logout", get(login::logout))
        .route("/save_data", post(panel::save_data))
        .route("/update_profile", post(panel::update_profile))
        .route("/save_slot", post(panel::save_slot))
        .route("/update_slot", post(panel::update_slot))
        .route("/search_employee", get(panel::search_employee))
        .route("/search_slot", get(panel::search_slot))
        .route("/save_bulk", post(bulk::save_bulk))
        .route("/import_profiles", post(bulk::import_profiles))
        .layer(DefaultBodyLimit::max(max_upload))
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(state: AppState) -> Result<()> {
    let addr = state.config.bind;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    log::info!("Listening on http://{}", addr);
    axum::serve(listener, router(state))
        .await
        .context("HTTP server failed")?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::{headers_for, state};
    use super::*;
    use crate::auth::Role;

    #[tokio::test]
    async fn test_employee_reaches_general_but_not_admin_routes() {
        let (_dir, state) = state();
        let headers = headers_for(&state, Role::Employee).await;

        assert!(state.authorize(&headers, Capability::General).await.is_ok());
        assert!(matches!(
            state.authorize(&headers, Capability::AdminOnly).await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_missing_or_stale_cookie_is_forbidden() {
        let (_dir, state) = state();
        assert!(matches!(
            state.authorize(&HeaderMap::new(), Capability::General).await,
            Err(AppError::Forbidden)
        ));

        let headers = headers_for(&state, Role::Admin).await;
        let token = cookie::cookie_value(&headers, &state.config.session_cookie).unwrap();
        state.sessions.remove(&token).await;
        assert!(matches!(
            state.authorize(&headers, Capability::General).await,
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_router_builds() {
        let (_dir, state) = state();
        let _router = router(state);
    }
}
