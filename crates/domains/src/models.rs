//! # Domain Models
//!
//! These structs represent the core entities of rusty-answers.
//! Field names serialize as camelCase because the SPA client and the wire
//! protocol predate this backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Moderation state of a question. New questions default to `Approved`;
/// `PendingApproval` and `Rejected` exist for admin moderation queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    PendingApproval,
    Approved,
    Rejected,
}

impl Default for QuestionStatus {
    fn default() -> Self {
        QuestionStatus::Approved
    }
}

/// A question owns the ordered list of its answer ids. `answer_ids` is
/// append-only in creation order; answer documents hold the back-reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// 1..=5 tags, each at most 20 chars, normalized to lowercase.
    pub tags: Vec<String>,
    pub status: QuestionStatus,
    pub author_id: Uuid,
    pub author_name: String,
    /// Authoritative membership, insertion order = creation order.
    pub answer_ids: Vec<Uuid>,
    /// Must reference an answer whose `question_id` equals `id`.
    pub accepted_answer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An answer to a question. `question_id` is immutable once created.
///
/// The two voter lists are disjoint per user at all times; the vote engine
/// is the only writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    pub author_name: String,
    pub question_id: Uuid,
    pub upvoter_ids: Vec<Uuid>,
    pub downvoter_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Answer {
    /// Score is derived, never stored.
    pub fn score(&self) -> i64 {
        self.upvoter_ids.len() as i64 - self.downvoter_ids.len() as i64
    }
}

/// What triggered a notification. Serialized with the legacy wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    NewAnswer,
    Mention,
    AdminMessage,
}

/// A persisted notification. The durable record is the source of truth;
/// live delivery over the realtime transport is best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub sender_id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    /// Relative link the client navigates to, e.g. `/questions/<id>`.
    pub link: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// The two vote directions. Any other wire value is rejected as invalid
/// input before it reaches the vote engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Upvote,
    Downvote,
}

impl VoteKind {
    /// Parses the wire strings `"upvote"` / `"downvote"`.
    pub fn parse(raw: &str) -> Option<VoteKind> {
        match raw {
            "upvote" => Some(VoteKind::Upvote),
            "downvote" => Some(VoteKind::Downvote),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteKind::Upvote => "upvote",
            VoteKind::Downvote => "downvote",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// The verified identity attached to a request by the auth collaborator.
/// `username` rides along so services can render display names without a
/// user-store lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Read model for the question page: the question plus its answers,
/// ordered by score descending with creation order as the tiebreak.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDetail {
    #[serde(flatten)]
    pub question: Question,
    pub answers: Vec<Answer>,
}
