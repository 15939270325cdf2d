//! # AppError
//!
//! Centralized error handling for the rusty-answers ecosystem.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Question, Answer)
    #[error("{0} not found with ID {1}")]
    NotFound(&'static str, String),

    /// Validation failure (e.g., tag limits, unknown vote type)
    #[error("validation error: {0}")]
    InvalidInput(String),

    /// Missing or unverifiable credentials
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Ownership/role violation (e.g., accepting an answer on someone
    /// else's question)
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// State mismatch (e.g., answer does not belong to the question,
    /// incomplete cascade cleanup)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Live delivery could not be attempted. Non-fatal: the persisted
    /// notification remains the source of truth.
    #[error("live delivery unavailable: {0}")]
    TransportUnavailable(String),

    /// Entity store failure
    #[error("storage error: {0}")]
    Storage(String),
}

/// A specialized Result type for rusty-answers logic.
pub type Result<T> = std::result::Result<T, AppError>;
