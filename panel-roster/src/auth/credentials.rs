//! Credential lookup against the credentials table

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::password::verify_password;
use crate::store::excel;
use crate::store::schema::credential_cols;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Employee,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::Employee => write!(f, "Employee"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unknown identity")]
    UnknownIdentity,

    #[error("wrong password")]
    BadSecret,

    #[error("stored credential for {0} is not a valid hash")]
    MalformedCredential(String),

    #[error("stored role for {0} is not recognised")]
    InvalidRole(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Resolves an identity and secret to a role
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, identity: &str, secret: &str) -> Result<Role, AuthError>;
}

/// Verifier that reads the credentials workbook on every attempt
#[derive(Debug, Clone)]
pub struct SpreadsheetVerifier {
    path: PathBuf,
}

impl SpreadsheetVerifier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialVerifier for SpreadsheetVerifier {
    fn verify(&self, identity: &str, secret: &str) -> Result<Role, AuthError> {
        if !self.path.exists() {
            log::warn!(
                "Credentials file {} does not exist; nobody can log in",
                self.path.display()
            );
            return Err(AuthError::UnknownIdentity);
        }

        let table = excel::read_table(&self.path)?;
        // Identity comparison is exact and case-sensitive
        let row = table
            .rows()
            .iter()
            .find(|row| row.get(credential_cols::EMAIL).to_text().trim() == identity)
            .ok_or(AuthError::UnknownIdentity)?;

        let stored = row.get(credential_cols::PASSWORD).to_text();
        match verify_password(secret, &stored) {
            Some(true) => {}
            Some(false) => return Err(AuthError::BadSecret),
            None => return Err(AuthError::MalformedCredential(identity.to_string())),
        }

        row.get(credential_cols::ROLE)
            .to_text()
            .parse()
            .map_err(|_| AuthError::InvalidRole(identity.to_string()))
    }
}
