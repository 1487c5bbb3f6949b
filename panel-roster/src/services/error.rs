use thiserror::Error;

/// Failures of the upsert and merge engines
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("no row with {key_field} = {key}")]
    KeyNotFound { key_field: String, key: String },

    #[error("{count} rows share {key_field} = {key}")]
    DuplicateKey {
        key_field: String,
        key: String,
        count: usize,
    },

    #[error("a row with {key_field} = {key} already exists")]
    AlreadyExists { key_field: String, key: String },

    #[error("{table} table has no {key_field} column")]
    MissingKeyColumn {
        table: &'static str,
        key_field: String,
    },

    #[error("{key_field} must not be blank")]
    BlankKey { key_field: String },
}

/// Failures surfaced by the panel services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("data integrity violation: {0}")]
    Integrity(EngineError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl From<EngineError> for ServiceError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::KeyNotFound { .. } => ServiceError::NotFound(err.to_string()),
            EngineError::AlreadyExists { .. } => ServiceError::Conflict(err.to_string()),
            EngineError::MissingKeyColumn { .. } | EngineError::BlankKey { .. } => {
                ServiceError::Validation(err.to_string())
            }
            EngineError::DuplicateKey { .. } => ServiceError::Integrity(err),
        }
    }
}
