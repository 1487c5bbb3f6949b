//! Authentication and role gating
//!
//! Logins are checked against the credentials workbook, which stores salted
//! password hashes. A successful login opens an in-memory session; the gate
//! decides per request whether the session's role may perform an action.

pub mod credentials;
pub mod gate;
pub mod password;
pub mod session;

pub use credentials::{AuthError, CredentialVerifier, Role, SpreadsheetVerifier};
pub use gate::{AuthState, Capability};
pub use session::{Session, SessionStore};
