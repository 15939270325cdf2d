//! # auth-adapters
//!
//! HS256 JWT implementation of the `TokenVerifier` port. Credential
//! storage and password verification live with the identity service that
//! issues these tokens; this crate only signs and verifies the
//! `{ sub, username, role }` payload the rest of the system consumes.

use chrono::{Duration, Utc};
use domains::error::{AppError, Result};
use domains::models::{AuthContext, Role};
use domains::ports::TokenVerifier;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    username: String,
    role: Role,
    exp: i64,
}

pub struct JwtAuthenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl: Duration,
}

impl JwtAuthenticator {
    pub fn new(secret: &[u8], token_ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }

    /// Signs a token for an already-authenticated identity.
    pub fn issue(&self, identity: &AuthContext) -> Result<String> {
        let claims = Claims {
            sub: identity.user_id,
            username: identity.username.clone(),
            role: identity.role,
            exp: (Utc::now() + self.token_ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| AppError::Unauthorized(format!("could not sign token: {err}")))
    }
}

impl TokenVerifier for JwtAuthenticator {
    fn verify(&self, token: &str) -> Result<AuthContext> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|err| {
                tracing::debug!(error = %err, "token rejected");
                AppError::Unauthorized("invalid or expired token".to_string())
            })?;

        Ok(AuthContext {
            user_id: data.claims.sub,
            username: data.claims.username,
            role: data.claims.role,
        })
    }
}
