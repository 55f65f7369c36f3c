//! `session_id` cookie handling

use axum::http::HeaderMap;
use axum::http::header::COOKIE;

/// Name of the cookie carrying the session identifier
pub const SESSION_COOKIE: &str = "session_id";

/// Read the `session_id` cookie from every `Cookie` header.
///
/// An empty value counts as absent.
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value for a newly issued session identifier.
pub fn set_session_cookie(id: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

/// Mint a fresh, unguessable session identifier.
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
