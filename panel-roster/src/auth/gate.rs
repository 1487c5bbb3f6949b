//! Role gate: which roles may perform which actions

use super::credentials::Role;
use super::session::Session;

/// Action classes guarded by the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Profile and slot reads/writes
    General,
    /// Bulk import and other admin-only actions
    AdminOnly,
}

impl Capability {
    pub fn allows(&self, role: Role) -> bool {
        match self {
            Capability::General => matches!(role, Role::Admin | Role::Employee),
            Capability::AdminOnly => role == Role::Admin,
        }
    }
}

/// Request authorization state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated(Session),
}

impl AuthState {
    pub fn from_session(session: Option<Session>) -> Self {
        match session {
            Some(session) => AuthState::Authenticated(session),
            None => AuthState::Unauthenticated,
        }
    }

    /// The session if it may perform `capability`, `None` otherwise
    pub fn authorize(self, capability: Capability) -> Option<Session> {
        match self {
            AuthState::Authenticated(session) if capability.allows(session.role) => Some(session),
            AuthState::Authenticated(session) => {
                log::warn!(
                    "{} ({}) denied {:?} action",
                    session.identity,
                    session.role,
                    capability
                );
                None
            }
            AuthState::Unauthenticated => None,
        }
    }
}
