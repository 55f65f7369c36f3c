//! Request handlers

use super::AppState;
use super::cookie::{new_session_id, session_cookie, set_session_cookie};
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Json, Response};
use mindcare_application::RelayInput;
use mindcare_domain::SessionId;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

/// Chat widget served at `/`
const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub response: String,
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Relay one message. Always 200 with a `response` string.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<SendMessageRequest>,
) -> Response {
    let mut issued = None;
    let session_id = match session_cookie(&headers) {
        Some(id) => SessionId::new(id),
        None if state.issue_cookies && state.relay.mode().keeps_history() => {
            let id = new_session_id();
            issued = Some(set_session_cookie(&id));
            SessionId::new(id)
        }
        None => SessionId::default(),
    };

    debug!(
        "send_message: session {} ({} chars)",
        session_id,
        request.message.chars().count()
    );

    let outcome = state
        .relay
        .execute(RelayInput::new(session_id, request.message))
        .await;

    let mut response = Json(SendMessageResponse {
        response: outcome.text,
    })
    .into_response();

    if let Some(cookie) = issued
        && let Ok(value) = HeaderValue::from_str(&cookie)
    {
        response.headers_mut().insert(SET_COOKIE, value);
    }

    response
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "mindcare",
        "version": env!("CARGO_PKG_VERSION"),
        "mode": state.relay.mode().as_str(),
        "sessions": state.relay.sessions().len().await,
    }))
}
