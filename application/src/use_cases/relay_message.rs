//! Relay Message use case.
//!
//! Forwards one user message to the remote model and returns the reply text.
//!
//! In conversational mode the session history plus the new message is
//! replayed; once the reply (or fallback) is known both turns are appended as
//! one pair. No lock is held while waiting on the remote model.
//! In stateless mode the message is wrapped in a fixed template and nothing
//! is remembered.
//!
//! The relay never fails: every gateway error is logged, recorded as a
//! [`FailureKind`], and replaced by a [`FallbackText`].

use crate::config::BehaviorConfig;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::session_store::{SessionHandle, SessionStore};
use mindcare_domain::util::preview;
use mindcare_domain::{FailureKind, FallbackText, OutboundRequest, RelayMode, SessionId};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Input for the [`RelayMessageUseCase`].
#[derive(Debug, Clone)]
pub struct RelayInput {
    /// Session the message belongs to (ignored in stateless mode).
    pub session_id: SessionId,
    /// The user's message, possibly empty.
    pub message: String,
}

impl RelayInput {
    pub fn new(session_id: SessionId, message: impl Into<String>) -> Self {
        Self {
            session_id,
            message: message.into(),
        }
    }
}

/// Result of one relay: the text to show, and why it is a fallback if it is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayOutcome {
    pub text: String,
    pub failure: Option<FailureKind>,
}

impl RelayOutcome {
    fn reply(text: String) -> Self {
        Self {
            text,
            failure: None,
        }
    }

    fn fallback(mode: RelayMode, kind: FailureKind) -> Self {
        Self {
            text: FallbackText::for_failure(mode, kind).to_string(),
            failure: Some(kind),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.failure.is_some()
    }
}

/// Use case for relaying a message to the remote model.
#[derive(Clone)]
pub struct RelayMessageUseCase {
    gateway: Arc<dyn LlmGateway>,
    sessions: Arc<dyn SessionStore>,
    mode: RelayMode,
    behavior: BehaviorConfig,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl RelayMessageUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            gateway,
            sessions,
            mode: RelayMode::default(),
            behavior: BehaviorConfig::default(),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_mode(mut self, mode: RelayMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_behavior(mut self, behavior: BehaviorConfig) -> Self {
        self.behavior = behavior;
        self
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn mode(&self) -> RelayMode {
        self.mode
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// Resolve the session (conversational mode only) and relay the message.
    pub async fn execute(&self, input: RelayInput) -> RelayOutcome {
        match self.mode {
            RelayMode::Conversational => {
                let handle = self.sessions.get_or_create(&input.session_id).await;
                self.relay_with_outcome(Some(&handle), &input.message).await
            }
            RelayMode::Stateless => self.relay_with_outcome(None, &input.message).await,
        }
    }

    /// Relay a message and return only the text to display.
    pub async fn relay(&self, session: Option<&SessionHandle>, user_text: &str) -> String {
        self.relay_with_outcome(session, user_text).await.text
    }

    /// Relay a message, reporting the failure kind behind any fallback.
    ///
    /// With a session handle the history is replayed and extended by one
    /// user turn and one assistant turn; without one the stateless template
    /// is used. The mode only selects which fallback text applies.
    ///
    /// Concurrent relays on one session each see the history as it was when
    /// they started; their pairs land in completion order.
    pub async fn relay_with_outcome(
        &self,
        session: Option<&SessionHandle>,
        user_text: &str,
    ) -> RelayOutcome {
        match session {
            Some(handle) => {
                // The lock is released for the call; the pair is appended in one step after.
                let (request, session_id) = {
                    let session = handle.lock().await;
                    (
                        OutboundRequest::conversation(&session, user_text),
                        session.id().clone(),
                    )
                };

                let outcome = self.call(&request, Some(&session_id)).await;

                let mut session = handle.lock().await;
                if outcome.is_fallback() {
                    session.add_failed_exchange(user_text, outcome.text.clone());
                } else {
                    session.add_exchange(user_text, outcome.text.clone());
                }
                outcome
            }
            None => {
                let request = OutboundRequest::stateless(user_text);
                self.call(&request, None).await
            }
        }
    }

    async fn call(&self, request: &OutboundRequest, session_id: Option<&SessionId>) -> RelayOutcome {
        let session = session_id.map(|id| id.as_str());
        debug!(
            session = session.unwrap_or("-"),
            turns = request.turn_count(),
            "Relaying to {}",
            self.gateway.model()
        );
        self.conversation_logger.log(ConversationEvent::new(
            "relay_request",
            json!({
                "session": session,
                "mode": self.mode.as_str(),
                "model": self.gateway.model().as_str(),
                "turns": request.turn_count(),
            }),
        ));

        if let Some(delay) = self.behavior.thinking_delay {
            tokio::time::sleep(delay).await;
        }

        let result = match self.behavior.timeout {
            Some(limit) => tokio::time::timeout(limit, self.gateway.generate(request))
                .await
                .unwrap_or(Err(GatewayError::Timeout)),
            None => self.gateway.generate(request).await,
        };

        let result = match result {
            Ok(text) if text.trim().is_empty() => Err(GatewayError::EmptyResponse),
            other => other,
        };

        match result {
            Ok(text) => {
                info!(
                    session = session.unwrap_or("-"),
                    "Relayed reply ({} bytes)",
                    text.len()
                );
                self.conversation_logger.log(ConversationEvent::new(
                    "relay_response",
                    json!({
                        "session": session,
                        "text": preview(&text, 200),
                    }),
                ));
                RelayOutcome::reply(text)
            }
            Err(error) => {
                let kind = error.kind();
                if kind.is_error() {
                    warn!(
                        session = session.unwrap_or("-"),
                        kind = kind.as_str(),
                        "Error communicating with {}: {}",
                        self.gateway.model(),
                        error
                    );
                } else {
                    debug!(
                        session = session.unwrap_or("-"),
                        "Model returned no text, using fallback"
                    );
                }
                self.conversation_logger.log(ConversationEvent::new(
                    "relay_failure",
                    json!({
                        "session": session,
                        "kind": kind,
                        "error": error.to_string(),
                    }),
                ));
                RelayOutcome::fallback(self.mode, kind)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::conversation_logger::MemoryConversationLogger;
    use async_trait::async_trait;
    use mindcare_domain::relay::fallback::{CONVERSATION_ERROR, EMPTY_RESPONSE, SERVICE_ERROR};
    use mindcare_domain::{Model, Role, Session, Turn};
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;

    /// A scripted reply for the mock gateway
    #[derive(Debug)]
    enum Scripted {
        Text(String),
        Error(GatewayError),
        /// Never answers within any reasonable timeout
        Hang,
    }

    /// Mock gateway that returns scripted replies in order and records requests
    struct ScriptedGateway {
        model: Model,
        replies: Mutex<VecDeque<Scripted>>,
        requests: Mutex<Vec<OutboundRequest>>,
        latency: Option<Duration>,
    }

    impl ScriptedGateway {
        fn new(replies: Vec<Scripted>) -> Self {
            Self {
                model: Model::default(),
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
                latency: None,
            }
        }

        fn echo() -> Self {
            Self::new(Vec::new())
        }

        /// Every reply takes `latency` to arrive
        fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = Some(latency);
            self
        }

        fn requests(&self) -> Vec<OutboundRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn generate(&self, request: &OutboundRequest) -> Result<String, GatewayError> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
            let next = self.replies.lock().unwrap().pop_front();
            match next {
                Some(Scripted::Text(t)) => Ok(t),
                Some(Scripted::Error(e)) => Err(e),
                Some(Scripted::Hang) => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok("too late".to_string())
                }
                // Default: echo the number of turns seen
                None => Ok(format!("reply after {} turns", request.turn_count())),
            }
        }
    }

    /// Minimal store for exercising the use case
    #[derive(Default)]
    struct TestStore {
        sessions: Mutex<HashMap<SessionId, SessionHandle>>,
    }

    #[async_trait]
    impl SessionStore for TestStore {
        async fn get_or_create(&self, id: &SessionId) -> SessionHandle {
            self.sessions
                .lock()
                .unwrap()
                .entry(id.clone())
                .or_insert_with(|| {
                    Arc::new(tokio::sync::Mutex::new(Session::with_introduction(id.clone())))
                })
                .clone()
        }

        async fn len(&self) -> usize {
            self.sessions.lock().unwrap().len()
        }
    }

    fn use_case(gateway: Arc<ScriptedGateway>) -> (RelayMessageUseCase, Arc<TestStore>) {
        let store = Arc::new(TestStore::default());
        (RelayMessageUseCase::new(gateway, store.clone()), store)
    }

    async fn turns_of(store: &TestStore, id: &str) -> Vec<Turn> {
        let handle = store.get_or_create(&SessionId::new(id)).await;
        let session = handle.lock().await;
        session.turns().to_vec()
    }

    #[tokio::test]
    async fn successful_reply_is_returned_and_recorded() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Text(
            "I'm here for you.".to_string(),
        )]));
        let (relay, store) = use_case(gateway.clone());

        let outcome = relay
            .execute(RelayInput::new(SessionId::new("a"), "I feel low"))
            .await;

        assert_eq!(outcome.text, "I'm here for you.");
        assert!(!outcome.is_fallback());

        let turns = turns_of(&store, "a").await;
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[2], Turn::user("I feel low"));
        assert_eq!(turns[3], Turn::assistant("I'm here for you."));
    }

    #[tokio::test]
    async fn history_grows_by_two_per_call_in_order() {
        let gateway = Arc::new(ScriptedGateway::echo());
        let (relay, store) = use_case(gateway.clone());
        let id = SessionId::new("same");

        for (i, msg) in ["one", "two", "three"].iter().enumerate() {
            relay.execute(RelayInput::new(id.clone(), *msg)).await;
            let turns = turns_of(&store, "same").await;
            assert_eq!(turns.len(), 2 + 2 * (i + 1));
            assert_eq!(turns[turns.len() - 2], Turn::user(*msg));
            assert_eq!(turns[turns.len() - 1].role, Role::Assistant);
        }

        // Each request replayed the full history including the new user turn
        let requests = gateway.requests();
        let counts: Vec<_> = requests.iter().map(|r| r.turn_count()).collect();
        assert_eq!(counts, vec![3, 5, 7]);
    }

    #[tokio::test]
    async fn sessions_do_not_share_history() {
        let gateway = Arc::new(ScriptedGateway::echo());
        let (relay, store) = use_case(gateway);

        relay
            .execute(RelayInput::new(SessionId::new("alice"), "secret of alice"))
            .await;
        relay
            .execute(RelayInput::new(SessionId::new("bob"), "hello from bob"))
            .await;

        let alice = turns_of(&store, "alice").await;
        let bob = turns_of(&store, "bob").await;
        assert!(alice.iter().all(|t| t.text != "hello from bob"));
        assert!(bob.iter().all(|t| t.text != "secret of alice"));
        assert_eq!(alice.len(), 4);
        assert_eq!(bob.len(), 4);
    }

    #[tokio::test]
    async fn empty_reply_uses_empty_fallback() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Scripted::Error(GatewayError::EmptyResponse),
            Scripted::Text("   ".to_string()),
        ]));
        let (relay, _store) = use_case(gateway);

        let first = relay
            .execute(RelayInput::new(SessionId::default(), "hello"))
            .await;
        assert_eq!(first.text, EMPTY_RESPONSE);
        assert_eq!(first.failure, Some(FailureKind::Empty));

        let second = relay
            .execute(RelayInput::new(SessionId::default(), "hello"))
            .await;
        assert_eq!(second.text, EMPTY_RESPONSE);
    }

    #[tokio::test]
    async fn transport_error_uses_error_fallback() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Error(
            GatewayError::ConnectionError("connection refused".to_string()),
        )]));
        let (relay, store) = use_case(gateway);

        let outcome = relay
            .execute(RelayInput::new(SessionId::default(), "hello"))
            .await;

        assert_eq!(outcome.text, CONVERSATION_ERROR);
        assert_eq!(outcome.failure, Some(FailureKind::Transport));

        // The fallback still completes the pair of turns
        let turns = turns_of(&store, "default").await;
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[3], Turn::assistant(CONVERSATION_ERROR));
    }

    #[tokio::test]
    async fn every_error_kind_degrades_to_non_empty_text() {
        let errors = vec![
            GatewayError::ConnectionError("dns".into()),
            GatewayError::Timeout,
            GatewayError::RequestFailed {
                status: 503,
                message: "unavailable".into(),
            },
            GatewayError::Blocked("SAFETY".into()),
            GatewayError::MalformedResponse("eof".into()),
            GatewayError::EmptyResponse,
        ];
        let expected: Vec<_> = errors.iter().map(|e| e.kind()).collect();
        let gateway = Arc::new(ScriptedGateway::new(
            errors.into_iter().map(Scripted::Error).collect(),
        ));
        let (relay, _store) = use_case(gateway);

        for kind in expected {
            let outcome = relay
                .execute(RelayInput::new(SessionId::default(), "hi"))
                .await;
            assert!(!outcome.text.is_empty());
            assert_eq!(outcome.failure, Some(kind));
        }
    }

    #[tokio::test]
    async fn timeout_bounds_the_wait() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Hang]));
        let (relay, _store) = use_case(gateway);
        let relay = relay.with_behavior(BehaviorConfig {
            timeout: Some(Duration::from_millis(20)),
            thinking_delay: None,
        });

        let outcome = relay
            .execute(RelayInput::new(SessionId::default(), "hello"))
            .await;

        assert_eq!(outcome.failure, Some(FailureKind::Timeout));
        assert_eq!(outcome.text, CONVERSATION_ERROR);
    }

    #[tokio::test]
    async fn stateless_timeout_uses_service_fallback() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Hang]));
        let (relay, _store) = use_case(gateway);
        let relay = relay.with_mode(RelayMode::Stateless).with_behavior(BehaviorConfig {
            timeout: Some(Duration::from_millis(20)),
            thinking_delay: None,
        });

        let outcome = relay
            .execute(RelayInput::new(SessionId::default(), "hello"))
            .await;

        assert_eq!(outcome.failure, Some(FailureKind::Timeout));
        assert_eq!(outcome.text, SERVICE_ERROR);
    }

    #[tokio::test]
    async fn default_session_relays_run_concurrently() {
        let latency = Duration::from_millis(300);
        let gateway = Arc::new(ScriptedGateway::echo().with_latency(latency));
        let (relay, store) = use_case(gateway);

        let started = std::time::Instant::now();
        let calls = (0..4).map(|i| {
            let relay = relay.clone();
            async move {
                relay
                    .execute(RelayInput::new(SessionId::default(), format!("msg {i}")))
                    .await
            }
        });
        let outcomes = futures::future::join_all(calls).await;
        let elapsed = started.elapsed();

        assert!(outcomes.iter().all(|o| !o.is_fallback()));
        assert!(
            elapsed < latency * 2,
            "relays on one session waited on each other: {elapsed:?}"
        );

        let turns = turns_of(&store, "default").await;
        assert_eq!(turns.len(), 2 + 8);
        for pair in turns.chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[1].role, Role::Assistant);
        }
    }

    #[tokio::test]
    async fn failed_exchange_is_recorded_but_not_replayed() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Error(
            GatewayError::Blocked("SAFETY".into()),
        )]));
        let (relay, store) = use_case(gateway.clone());

        let blocked = relay
            .execute(RelayInput::new(SessionId::default(), "blocked words"))
            .await;
        assert_eq!(blocked.failure, Some(FailureKind::Blocked));

        let next = relay
            .execute(RelayInput::new(SessionId::default(), "hello"))
            .await;
        assert!(!next.is_fallback());

        // History still grows by two per call
        assert_eq!(turns_of(&store, "default").await.len(), 6);

        let requests = gateway.requests();
        assert_eq!(requests[1].turn_count(), 3);
        match &requests[1] {
            OutboundRequest::Conversation { turns, .. } => {
                assert!(turns.iter().all(|t| t.text != "blocked words"));
                assert_eq!(turns[2], Turn::user("hello"));
            }
            OutboundRequest::Prompt(_) => panic!("expected conversation"),
        }
    }

    #[tokio::test]
    async fn stateless_mode_keeps_no_history() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Scripted::Text("Hey! 😊".to_string()),
            Scripted::Error(GatewayError::Timeout),
        ]));
        let (relay, store) = use_case(gateway.clone());
        let relay = relay.with_mode(RelayMode::Stateless);

        let outcome = relay
            .execute(RelayInput::new(SessionId::new("x"), "hello"))
            .await;
        assert_eq!(outcome.text, "Hey! 😊");
        assert_eq!(store.len().await, 0);

        let outcome = relay
            .execute(RelayInput::new(SessionId::new("x"), "again"))
            .await;
        assert_eq!(outcome.text, SERVICE_ERROR);

        let requests = gateway.requests();
        assert!(matches!(&requests[0], OutboundRequest::Prompt(p) if p.ends_with("Message: hello")));
        assert!(matches!(&requests[1], OutboundRequest::Prompt(p) if p.ends_with("Message: again")));
    }

    #[tokio::test]
    async fn relay_returns_plain_text() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Text("ok".into())]));
        let (relay, store) = use_case(gateway);
        let handle = store.get_or_create(&SessionId::new("h")).await;

        assert_eq!(relay.relay(Some(&handle), "hi").await, "ok");
        assert_eq!(handle.lock().await.len(), 4);
    }

    #[tokio::test]
    async fn concurrent_relays_for_one_session_keep_pairs_together() {
        let gateway = Arc::new(ScriptedGateway::echo());
        let (relay, store) = use_case(gateway);

        let calls = (0..8).map(|i| {
            let relay = relay.clone();
            async move {
                relay
                    .execute(RelayInput::new(SessionId::new("shared"), format!("msg {i}")))
                    .await
            }
        });
        futures::future::join_all(calls).await;

        let turns = turns_of(&store, "shared").await;
        assert_eq!(turns.len(), 2 + 16);
        for pair in turns.chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[1].role, Role::Assistant);
        }
    }

    #[tokio::test]
    async fn conversation_logger_records_request_and_outcome() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Scripted::Text("fine".into()),
            Scripted::Error(GatewayError::Blocked("SAFETY".into())),
        ]));
        let logger = Arc::new(MemoryConversationLogger::new());
        let (relay, _store) = use_case(gateway);
        let relay = relay.with_conversation_logger(logger.clone());

        relay
            .execute(RelayInput::new(SessionId::default(), "a"))
            .await;
        relay
            .execute(RelayInput::new(SessionId::default(), "b"))
            .await;

        assert_eq!(
            logger.event_types(),
            vec!["relay_request", "relay_response", "relay_request", "relay_failure"]
        );
        assert_eq!(logger.events()[3].payload["kind"], "blocked");
    }
}
