use axum::Json;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use super::pages;
use crate::auth::AuthError;
use crate::services::ServiceError;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Handler failures and their HTTP rendering
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("forbidden")]
    Forbidden,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UnknownIdentity | AuthError::BadSecret => AppError::InvalidCredentials,
            AuthError::Storage(err) => AppError::Internal(err),
            other => AppError::Internal(anyhow::anyhow!(other)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Forbidden => {
                return (StatusCode::FORBIDDEN, Html(pages::FORBIDDEN)).into_response();
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Service(ServiceError::Validation(message))
            | AppError::Service(ServiceError::Conflict(message)) => {
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Service(ServiceError::NotFound(message)) => (StatusCode::NOT_FOUND, message),
            AppError::Service(ServiceError::Integrity(err)) => {
                log::error!("Data integrity violation: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
            AppError::Service(ServiceError::Storage(err)) | AppError::Internal(err) => {
                log::error!("Request failed: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
