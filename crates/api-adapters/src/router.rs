//! Route table and middleware assembly.

use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, AppState};

/// Builds the full application router. `allowed_origin` restricts CORS to
/// the SPA's origin when configured, otherwise any origin is accepted.
pub fn router(state: AppState, allowed_origin: Option<HeaderValue>) -> Router {
    let cors = match allowed_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    };

    Router::new()
        .route(
            "/api/questions",
            get(handlers::list_questions).post(handlers::ask_question),
        )
        .route(
            "/api/questions/{id}",
            get(handlers::get_question)
                .put(handlers::update_question)
                .delete(handlers::delete_question),
        )
        .route(
            "/api/answers/question/{question_id}",
            post(handlers::post_answer),
        )
        .route("/api/answers/{answer_id}/vote", post(handlers::vote_answer))
        .route(
            "/api/answers/question/{question_id}/accept/{answer_id}",
            post(handlers::accept_answer),
        )
        .route("/api/answers/{answer_id}", delete(handlers::delete_answer))
        .route("/api/notifications", get(handlers::list_notifications))
        .route("/ws", get(handlers::ws_upgrade))
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
