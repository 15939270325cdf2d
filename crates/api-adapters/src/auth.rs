//! Bearer-token extraction over the `TokenVerifier` port.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use domains::error::{AppError, Result};
use domains::models::AuthContext;
use domains::ports::TokenVerifier;

/// Required authentication: missing or bad credentials are an error.
pub fn require_auth(verifier: &dyn TokenVerifier, headers: &HeaderMap) -> Result<AuthContext> {
    let token = bearer_token(headers)
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;
    verifier.verify(token)
}

/// Optional authentication: anonymous callers proceed with no identity,
/// a presented-but-invalid token is still rejected.
pub fn optional_auth(
    verifier: &dyn TokenVerifier,
    headers: &HeaderMap,
) -> Result<Option<AuthContext>> {
    match bearer_token(headers) {
        Some(token) => verifier.verify(token).map(Some),
        None => Ok(None),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
