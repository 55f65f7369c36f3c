//! HTTP surface: chat widget, message relay and health check

pub mod cookie;
mod handlers;

pub use handlers::{SendMessageRequest, SendMessageResponse};

use axum::Router;
use axum::routing::{get, post};
use mindcare_application::RelayMessageUseCase;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared application state for handlers.
pub struct AppState {
    pub relay: RelayMessageUseCase,
    /// Mint a `session_id` cookie for clients that have none
    pub issue_cookies: bool,
}

impl AppState {
    pub fn new(relay: RelayMessageUseCase) -> Self {
        Self {
            relay,
            issue_cookies: false,
        }
    }

    pub fn with_issue_cookies(mut self, issue: bool) -> Self {
        self.issue_cookies = issue;
        self
    }
}

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/send_message", post(handlers::send_message))
        .route("/api/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until `shutdown` is cancelled.
///
/// In-flight requests are allowed to finish.
pub async fn serve(
    addr: &str,
    router: Router,
    shutdown: CancellationToken,
) -> Result<(), ServeError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    info!("MindCare listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use mindcare_application::{GatewayError, LlmGateway, SessionHandle, SessionStore};
    use mindcare_domain::relay::fallback::{CONVERSATION_ERROR, SERVICE_ERROR};
    use mindcare_domain::{Model, OutboundRequest, RelayMode, Session, SessionId};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    /// Replies with the number of turns it was sent, or always fails
    struct EchoGateway {
        model: Model,
        fail: bool,
    }

    impl EchoGateway {
        fn ok() -> Self {
            Self {
                model: Model::default(),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                model: Model::default(),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl LlmGateway for EchoGateway {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn generate(&self, request: &OutboundRequest) -> Result<String, GatewayError> {
            if self.fail {
                return Err(GatewayError::ConnectionError("connection refused".into()));
            }
            Ok(format!("turns={}", request.turn_count()))
        }
    }

    #[derive(Default)]
    struct TestStore {
        sessions: Mutex<HashMap<SessionId, SessionHandle>>,
    }

    #[async_trait]
    impl SessionStore for TestStore {
        async fn get_or_create(&self, id: &SessionId) -> SessionHandle {
            self.sessions
                .lock()
                .await
                .entry(id.clone())
                .or_insert_with(|| {
                    Arc::new(Mutex::new(Session::with_introduction(id.clone())))
                })
                .clone()
        }

        async fn len(&self) -> usize {
            self.sessions.lock().await.len()
        }
    }

    fn app(gateway: EchoGateway, mode: RelayMode, issue_cookies: bool) -> Router {
        let relay = RelayMessageUseCase::new(Arc::new(gateway), Arc::new(TestStore::default()))
            .with_mode(mode);
        router(Arc::new(
            AppState::new(relay).with_issue_cookies(issue_cookies),
        ))
    }

    fn post_message(body: Value, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/send_message")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn index_serves_widget() {
        let response = app(EchoGateway::ok(), RelayMode::Conversational, false)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("MindCare"));
        assert!(html.contains("/send_message"));
        assert!(html.contains("Crisis Resources"));
    }

    #[tokio::test]
    async fn send_message_returns_reply() {
        let response = app(EchoGateway::ok(), RelayMode::Conversational, false)
            .oneshot(post_message(json!({"message": "hello"}), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        // Introduction pair plus the new user turn.
        assert_eq!(body_json(response).await, json!({"response": "turns=3"}));
    }

    #[tokio::test]
    async fn send_message_failure_is_fallback_with_200() {
        let response = app(EchoGateway::failing(), RelayMode::Conversational, false)
            .oneshot(post_message(json!({"message": "hello"}), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["response"], CONVERSATION_ERROR);

        let response = app(EchoGateway::failing(), RelayMode::Stateless, false)
            .oneshot(post_message(json!({"message": "hello"}), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["response"], SERVICE_ERROR);
    }

    #[tokio::test]
    async fn cookies_keep_sessions_apart() {
        let app = app(EchoGateway::ok(), RelayMode::Conversational, false);

        let first = app
            .clone()
            .oneshot(post_message(json!({"message": "a"}), Some("session_id=alice")))
            .await
            .unwrap();
        assert_eq!(body_json(first).await["response"], "turns=3");

        let second = app
            .clone()
            .oneshot(post_message(json!({"message": "b"}), Some("session_id=alice")))
            .await
            .unwrap();
        assert_eq!(body_json(second).await["response"], "turns=5");

        let other = app
            .clone()
            .oneshot(post_message(json!({"message": "c"}), Some("session_id=bob")))
            .await
            .unwrap();
        assert_eq!(body_json(other).await["response"], "turns=3");

        let health = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let health = body_json(health).await;
        assert_eq!(health["status"], "ok");
        assert_eq!(health["mode"], "conversational");
        assert_eq!(health["sessions"], 2);
    }

    #[tokio::test]
    async fn issues_cookie_when_enabled() {
        let response = app(EchoGateway::ok(), RelayMode::Conversational, true)
            .oneshot(post_message(json!({"message": "hi"}), None))
            .await
            .unwrap();

        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("session_id="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
    }

    #[tokio::test]
    async fn existing_cookie_is_not_reissued() {
        let response = app(EchoGateway::ok(), RelayMode::Conversational, true)
            .oneshot(post_message(json!({"message": "hi"}), Some("session_id=known")))
            .await
            .unwrap();
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn missing_message_field_is_empty_text() {
        let response = app(EchoGateway::ok(), RelayMode::Stateless, false)
            .oneshot(post_message(json!({}), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["response"], "turns=1");
    }

    #[tokio::test]
    async fn invalid_json_is_rejected() {
        let request = Request::builder()
            .method("POST")
            .uri("/send_message")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app(EchoGateway::ok(), RelayMode::Conversational, false)
            .oneshot(request)
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }
}
