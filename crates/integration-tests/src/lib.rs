//! Shared harness for the end-to-end suites: a fully assembled router over
//! the in-memory store, with direct handles on the store, the auth adapter
//! and the room registry so tests can look behind the HTTP surface.

use std::sync::Arc;

use api_adapters::{router, AppState};
use auth_adapters::JwtAuthenticator;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use domains::models::{AuthContext, Role};
use prometheus_client::registry::Registry;
use realtime_adapters::{RoomRegistry, TransportMetrics};
use services::{AnswerService, NotificationDispatcher, QuestionService};
use storage_adapters::MemoryStore;
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub auth: Arc<JwtAuthenticator>,
    pub rooms: Arc<RoomRegistry>,
    pub dispatcher: Arc<NotificationDispatcher>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let auth = Arc::new(JwtAuthenticator::new(b"integration-test-secret", 24));

        let mut registry = Registry::default();
        let metrics = TransportMetrics::default();
        metrics.register(&mut registry);
        let rooms = Arc::new(RoomRegistry::new(metrics));

        let dispatcher = Arc::new(NotificationDispatcher::new(store.clone(), rooms.clone()));
        let questions = Arc::new(QuestionService::new(store.clone(), store.clone()));
        let answers = Arc::new(AnswerService::new(
            store.clone(),
            store.clone(),
            dispatcher.clone(),
        ));

        let state = AppState {
            questions,
            answers,
            dispatcher: dispatcher.clone(),
            verifier: auth.clone(),
            rooms: rooms.clone(),
            metrics: Arc::new(registry),
        };

        Self {
            router: router(state, None),
            store,
            auth,
            rooms,
            dispatcher,
        }
    }

    /// Mints an identity and a signed token for it.
    pub fn login(&self, username: &str, role: Role) -> (AuthContext, String) {
        let identity = AuthContext {
            user_id: Uuid::new_v4(),
            username: username.to_string(),
            role,
        };
        let token = self.auth.issue(&identity).expect("token signing");
        (identity, token)
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router never fails");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body read");
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, value)
    }

    /// Posts a valid question as the given token's user, returns its id.
    pub async fn seed_question(&self, token: &str, title: &str) -> Uuid {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/questions",
                Some(token),
                Some(serde_json::json!({
                    "title": title,
                    "content": "Content long enough to clear the twenty character floor.",
                    "tags": ["rust", "testing"]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "seed question failed: {body}");
        body["id"].as_str().unwrap().parse().unwrap()
    }

    /// Posts a valid answer, returns its id.
    pub async fn seed_answer(&self, token: &str, question_id: Uuid) -> Uuid {
        let (status, body) = self
            .request(
                Method::POST,
                &format!("/api/answers/question/{question_id}"),
                Some(token),
                Some(serde_json::json!({ "content": "An answer comfortably past ten chars." })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "seed answer failed: {body}");
        body["id"].as_str().unwrap().parse().unwrap()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
