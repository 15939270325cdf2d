//! # rusty-answers binary
//!
//! Assembles the adapters around the services and serves the API plus the
//! realtime channel on one listener.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{router, AppState};
use auth_adapters::JwtAuthenticator;
use axum::http::HeaderValue;
use configs::Settings;
use prometheus_client::registry::Registry;
use realtime_adapters::{RoomRegistry, TransportMetrics};
use secrecy::ExposeSecret;
use services::{AnswerService, NotificationDispatcher, QuestionService};
use storage_adapters::MemoryStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::load().context("loading settings")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log.filter)),
        )
        .init();

    // Adapters
    let store = Arc::new(MemoryStore::new());
    let verifier = Arc::new(JwtAuthenticator::new(
        settings.auth.jwt_secret.expose_secret().as_bytes(),
        settings.auth.token_ttl_hours,
    ));

    let mut registry = Registry::default();
    let transport_metrics = TransportMetrics::default();
    transport_metrics.register(&mut registry);
    let rooms = Arc::new(RoomRegistry::new(transport_metrics));

    // Services
    let dispatcher = Arc::new(NotificationDispatcher::new(store.clone(), rooms.clone()));
    let questions = Arc::new(QuestionService::new(store.clone(), store.clone()));
    let answers = Arc::new(AnswerService::new(
        store.clone(),
        store.clone(),
        dispatcher.clone(),
    ));

    let allowed_origin = settings
        .http
        .cors_origin
        .as_deref()
        .map(HeaderValue::from_str)
        .transpose()
        .context("invalid cors origin")?;

    let state = AppState {
        questions,
        answers,
        dispatcher,
        verifier,
        rooms,
        metrics: Arc::new(registry),
    };
    let app = router(state, allowed_origin);

    let listener = tokio::net::TcpListener::bind(&settings.http.bind_addr)
        .await
        .with_context(|| format!("binding {}", settings.http.bind_addr))?;
    tracing::info!(addr = %settings.http.bind_addr, "rusty-answers listening");

    axum::serve(listener, app).await?;
    Ok(())
}
