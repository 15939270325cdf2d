//! # API Handlers
//!
//! One handler per logical operation; each one authenticates, delegates to
//! the owning service and serializes the mutated entity (or the structured
//! error) back out.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::models::{Answer, Notification, Question, QuestionDetail};
use domains::ports::TokenVerifier;
use prometheus_client::registry::Registry;
use realtime_adapters::session::run_session;
use realtime_adapters::RoomRegistry;
use serde::Deserialize;
use serde_json::json;
use services::answers::{PostAnswer, VoteRequest};
use services::questions::{AskQuestion, ListQuery, QuestionPage, UpdateQuestion};
use services::{AnswerService, NotificationDispatcher, QuestionService};
use uuid::Uuid;

use crate::auth::{optional_auth, require_auth};
use crate::error::ApiError;

/// State shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub questions: Arc<QuestionService>,
    pub answers: Arc<AnswerService>,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub rooms: Arc<RoomRegistry>,
    pub metrics: Arc<Registry>,
}

pub async fn ask_question(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<AskQuestion>,
) -> Result<(StatusCode, Json<Question>), ApiError> {
    let actor = require_auth(state.verifier.as_ref(), &headers)?;
    let question = state.questions.ask(&actor, input).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

pub async fn list_questions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<QuestionPage>, ApiError> {
    let actor = optional_auth(state.verifier.as_ref(), &headers)?;
    let page = state.questions.list(actor.as_ref(), query).await?;
    Ok(Json(page))
}

pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuestionDetail>, ApiError> {
    Ok(Json(state.questions.get(id).await?))
}

pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(patch): Json<UpdateQuestion>,
) -> Result<Json<Question>, ApiError> {
    let actor = require_auth(state.verifier.as_ref(), &headers)?;
    let question = state.questions.update(&actor, id, patch).await?;
    Ok(Json(question))
}

pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let actor = require_auth(state.verifier.as_ref(), &headers)?;
    state.questions.delete(&actor, id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Question and associated answers removed"
    })))
}

pub async fn post_answer(
    State(state): State<AppState>,
    Path(question_id): Path<Uuid>,
    headers: HeaderMap,
    Json(input): Json<PostAnswer>,
) -> Result<(StatusCode, Json<Answer>), ApiError> {
    let actor = require_auth(state.verifier.as_ref(), &headers)?;
    let answer = state.answers.post(&actor, question_id, input).await?;
    Ok((StatusCode::CREATED, Json(answer)))
}

pub async fn vote_answer(
    State(state): State<AppState>,
    Path(answer_id): Path<Uuid>,
    headers: HeaderMap,
    Json(input): Json<VoteRequest>,
) -> Result<Json<Answer>, ApiError> {
    let actor = require_auth(state.verifier.as_ref(), &headers)?;
    let answer = state
        .answers
        .vote(&actor, answer_id, &input.vote_type)
        .await?;
    Ok(Json(answer))
}

pub async fn accept_answer(
    State(state): State<AppState>,
    Path((question_id, answer_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
) -> Result<Json<Question>, ApiError> {
    let actor = require_auth(state.verifier.as_ref(), &headers)?;
    let question = state
        .answers
        .accept(&actor, question_id, answer_id)
        .await?;
    Ok(Json(question))
}

pub async fn delete_answer(
    State(state): State<AppState>,
    Path(answer_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let actor = require_auth(state.verifier.as_ref(), &headers)?;
    state.answers.delete(&actor, answer_id).await?;
    Ok(Json(json!({ "success": true, "message": "Answer removed" })))
}

pub async fn list_notifications(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let actor = require_auth(state.verifier.as_ref(), &headers)?;
    Ok(Json(state.dispatcher.list_for(&actor).await?))
}

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    token: String,
}

/// Upgrades to the realtime channel. The token rides in the query string
/// because browsers cannot set headers on websocket handshakes.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let identity = state.verifier.verify(&query.token)?;
    let rooms = state.rooms.clone();
    Ok(ws.on_upgrade(move |socket| run_session(socket, identity, rooms)))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let mut body = String::new();
    match prometheus_client::encoding::text::encode(&mut body, &state.metrics) {
        Ok(()) => (
            [(
                header::CONTENT_TYPE,
                "application/openmetrics-text; version=1.0.0; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
