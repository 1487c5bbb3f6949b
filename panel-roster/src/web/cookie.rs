//! Session cookie parsing and formatting

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use chrono::TimeDelta;

/// Value of the named cookie from the request's `Cookie` headers
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
}

/// Cookie carrying a session token, expiring with the session
pub fn session_cookie(name: &str, token: &str, max_age: TimeDelta) -> String {
    let max_age = max_age.num_seconds();
    format!("{name}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={max_age}")
}

pub fn expired_cookie(name: &str) -> String {
    format!("{name}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}
