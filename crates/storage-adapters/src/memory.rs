//! In-memory document store backing the entity repo ports.
//!
//! Collections are keyed by entity id in DashMaps, so every single-document
//! write is atomic — exactly the guarantee the services layer assumes.
//! Nothing here coordinates across collections; cascades remain the
//! caller's problem, matching the store contract.

use async_trait::async_trait;
use dashmap::DashMap;
use domains::error::{AppError, Result};
use domains::models::{Answer, Notification, Question, QuestionStatus};
use domains::ports::{AnswerRepo, NotificationRepo, QuestionFilter, QuestionRepo};
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    questions: DashMap<Uuid, Question>,
    answers: DashMap<Uuid, Answer>,
    notifications: DashMap<Uuid, Notification>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuestionRepo for MemoryStore {
    async fn create(&self, question: Question) -> Result<Question> {
        self.questions.insert(question.id, question.clone());
        Ok(question)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Question>> {
        Ok(self.questions.get(&id).map(|entry| entry.clone()))
    }

    /// Filters in memory, newest first, then applies the page window.
    async fn list(&self, filter: QuestionFilter) -> Result<(Vec<Question>, u64)> {
        let mut matching: Vec<Question> = self
            .questions
            .iter()
            .filter(|entry| {
                let q = entry.value();
                if !filter.include_unapproved && q.status != QuestionStatus::Approved {
                    return false;
                }
                if let Some(tag) = &filter.tag {
                    if !q.tags.iter().any(|t| t == tag) {
                        return false;
                    }
                }
                if filter.unanswered && !q.answer_ids.is_empty() {
                    return false;
                }
                true
            })
            .map(|entry| entry.clone())
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len() as u64;

        let page = matching
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect();

        Ok((page, total))
    }

    async fn update(&self, question: Question) -> Result<Question> {
        if !self.questions.contains_key(&question.id) {
            return Err(AppError::NotFound("Question", question.id.to_string()));
        }
        self.questions.insert(question.id, question.clone());
        Ok(question)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.questions.remove(&id).is_some())
    }
}

#[async_trait]
impl AnswerRepo for MemoryStore {
    async fn create(&self, answer: Answer) -> Result<Answer> {
        self.answers.insert(answer.id, answer.clone());
        Ok(answer)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Answer>> {
        Ok(self.answers.get(&id).map(|entry| entry.clone()))
    }

    async fn find_by_question(&self, question_id: Uuid) -> Result<Vec<Answer>> {
        Ok(self
            .answers
            .iter()
            .filter(|entry| entry.value().question_id == question_id)
            .map(|entry| entry.clone())
            .collect())
    }

    async fn update(&self, answer: Answer) -> Result<Answer> {
        if !self.answers.contains_key(&answer.id) {
            return Err(AppError::NotFound("Answer", answer.id.to_string()));
        }
        self.answers.insert(answer.id, answer.clone());
        Ok(answer)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.answers.remove(&id).is_some())
    }

    async fn delete_by_question(&self, question_id: Uuid) -> Result<u64> {
        let doomed: Vec<Uuid> = self
            .answers
            .iter()
            .filter(|entry| entry.value().question_id == question_id)
            .map(|entry| *entry.key())
            .collect();

        let mut removed = 0;
        for id in doomed {
            if self.answers.remove(&id).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[async_trait]
impl NotificationRepo for MemoryStore {
    async fn create(&self, notification: Notification) -> Result<Notification> {
        self.notifications
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn list_by_recipient(&self, recipient_id: Uuid) -> Result<Vec<Notification>> {
        let mut list: Vec<Notification> = self
            .notifications
            .iter()
            .filter(|entry| entry.value().recipient_id == recipient_id)
            .map(|entry| entry.clone())
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }
}
