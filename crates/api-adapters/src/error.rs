//! Maps `AppError` onto HTTP responses with a stable `{ kind, message }`
//! body the client can branch on.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::error::AppError;
use serde_json::json;

pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self.0 {
            AppError::NotFound(_, _) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::TransportUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "transport_unavailable")
            }
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        (
            status,
            Json(json!({ "kind": kind, "message": self.0.to_string() })),
        )
            .into_response()
    }
}
