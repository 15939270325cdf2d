//! # api-adapters
//!
//! The web routing and orchestration layer for rusty-answers.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod router;

pub use handlers::AppState;
pub use router::router;
