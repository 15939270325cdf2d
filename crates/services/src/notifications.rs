//! # Notification Dispatcher
//!
//! Persist-then-publish. The durable record is the only guaranteed
//! artifact; the live push into the recipient's room is fire-and-forget
//! and a delivery failure never surfaces to the triggering request.

use std::sync::Arc;

use chrono::Utc;
use domains::error::Result;
use domains::models::{AuthContext, Notification, NotificationKind, Question};
use domains::ports::{NotificationPublisher, NotificationRepo};
use uuid::Uuid;

/// How much of the question title makes it into the message.
const TITLE_PREVIEW_CHARS: usize = 30;

pub struct NotificationDispatcher {
    notifications: Arc<dyn NotificationRepo>,
    publisher: Arc<dyn NotificationPublisher>,
}

impl NotificationDispatcher {
    pub fn new(
        notifications: Arc<dyn NotificationRepo>,
        publisher: Arc<dyn NotificationPublisher>,
    ) -> Self {
        Self {
            notifications,
            publisher,
        }
    }

    /// Notifies a question's author that someone answered.
    ///
    /// Returns `None` without persisting or publishing anything when the
    /// answer author is the question author.
    pub async fn notify_new_answer(
        &self,
        question: &Question,
        answer_author: &AuthContext,
    ) -> Result<Option<Notification>> {
        if answer_author.user_id == question.author_id {
            return Ok(None);
        }

        let preview: String = question.title.chars().take(TITLE_PREVIEW_CHARS).collect();
        let notification = Notification {
            id: Uuid::new_v4(),
            recipient_id: question.author_id,
            sender_id: answer_author.user_id,
            kind: NotificationKind::NewAnswer,
            message: format!(
                "{} answered your question: \"{}...\"",
                answer_author.username, preview
            ),
            link: format!("/questions/{}", question.id),
            is_read: false,
            created_at: Utc::now(),
        };

        let persisted = self.notifications.create(notification).await?;

        // Publish failure must not look like persistence failure.
        if let Err(err) = self
            .publisher
            .publish(persisted.recipient_id, &persisted)
            .await
        {
            tracing::warn!(
                recipient_id = %persisted.recipient_id,
                notification_id = %persisted.id,
                error = %err,
                "live delivery failed, durable notification kept"
            );
        }

        Ok(Some(persisted))
    }

    /// The persisted feed for a recipient, newest first.
    pub async fn list_for(&self, actor: &AuthContext) -> Result<Vec<Notification>> {
        self.notifications.list_by_recipient(actor.user_id).await
    }
}
