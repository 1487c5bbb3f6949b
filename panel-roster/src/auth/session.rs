//! In-memory server-side sessions keyed by a random token

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::credentials::Role;

/// An authenticated identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, ttl: TimeDelta, now: DateTime<Utc>) -> bool {
        now - self.created_at >= ttl
    }
}

/// Sessions expire `ttl` after login. Expired entries are dropped when looked
/// up and swept whenever a new session starts.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    ttl: TimeDelta,
}

impl SessionStore {
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Start a session and return its token
    pub async fn create(&self, identity: &str, role: Role) -> Uuid {
        let now = Utc::now();
        let token = Uuid::new_v4();
        let session = Session {
            identity: identity.to_string(),
            role,
            created_at: now,
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, existing| !existing.is_expired(self.ttl, now));
        let swept = before - sessions.len();
        if swept > 0 {
            log::debug!("Swept {} expired sessions", swept);
        }
        sessions.insert(token, session);
        token
    }

    /// Live session for `token`; an expired one is removed and resolves to none
    pub async fn get(&self, token: &Uuid) -> Option<Session> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(session) if !session.is_expired(self.ttl, now) => {
                    return Some(session.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.remove(token) {
            log::info!("Session for {} expired", session.identity);
        }
        None
    }

    /// Look up a session from a raw cookie value; malformed tokens resolve to none
    pub async fn resolve(&self, raw_token: &str) -> Option<Session> {
        let token = Uuid::parse_str(raw_token.trim()).ok()?;
        self.get(&token).await
    }

    pub async fn remove(&self, raw_token: &str) -> Option<Session> {
        let token = Uuid::parse_str(raw_token.trim()).ok()?;
        self.sessions.write().await.remove(&token)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
