//! # Core Ports
//!
//! Contracts between the domain core and its adapters. Every adapter crate
//! implements one of these; services only ever see the trait objects.
//!
//! The entity store contract assumes single-document writes are atomic.
//! Cross-entity cascades are not, and callers must treat them as
//! best-effort.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Answer, AuthContext, Notification, Question};

/// Query shape for question listings. Construction of anything fancier
/// (full-text search, cursors) belongs to the HTTP layer's collaborators.
#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    /// Exact tag match (tags are stored lowercase).
    pub tag: Option<String>,
    /// Only questions with zero answers.
    pub unanswered: bool,
    /// When false, only `Approved` questions are returned.
    pub include_unapproved: bool,
    pub limit: u64,
    pub offset: u64,
}

/// Persistence contract for questions.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait QuestionRepo: Send + Sync {
    async fn create(&self, question: Question) -> Result<Question>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Question>>;
    /// Returns the requested page and the total count matching the filter.
    async fn list(&self, filter: QuestionFilter) -> Result<(Vec<Question>, u64)>;
    /// Whole-document replace; atomic per the store contract.
    async fn update(&self, question: Question) -> Result<Question>;
    /// Returns false when no such question existed.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Persistence contract for answers.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AnswerRepo: Send + Sync {
    async fn create(&self, answer: Answer) -> Result<Answer>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Answer>>;
    async fn find_by_question(&self, question_id: Uuid) -> Result<Vec<Answer>>;
    async fn update(&self, answer: Answer) -> Result<Answer>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
    /// Cascade helper; returns how many answers were removed.
    async fn delete_by_question(&self, question_id: Uuid) -> Result<u64>;
}

/// Persistence contract for notifications.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait NotificationRepo: Send + Sync {
    async fn create(&self, notification: Notification) -> Result<Notification>;
    /// Newest first.
    async fn list_by_recipient(&self, recipient_id: Uuid) -> Result<Vec<Notification>>;
}

/// Live fan-out contract. Publishing addresses the recipient's room;
/// delivery to zero subscribers is a success, not an error.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    async fn publish(&self, recipient_id: Uuid, notification: &Notification) -> Result<()>;
}

/// The auth collaborator: turns a bearer token into a verified identity.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<AuthContext>;
}
