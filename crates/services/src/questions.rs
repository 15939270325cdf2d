//! # Question Service
//!
//! Question CRUD plus the cascade side of referential integrity: deleting
//! a question removes every answer that points back at it before the
//! question record itself goes away. The cascade is best-effort (the store
//! only guarantees single-document atomicity), so a partial failure is
//! reported as a conflict instead of being swallowed.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use domains::error::{AppError, Result};
use domains::models::{AuthContext, Question, QuestionDetail, QuestionStatus};
use domains::ports::{AnswerRepo, QuestionFilter, QuestionRepo};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const TITLE_MIN_CHARS: usize = 10;
const TITLE_MAX_CHARS: usize = 150;
const CONTENT_MIN_CHARS: usize = 20;
const TAGS_MAX: usize = 5;
const TAG_MAX_CHARS: usize = 20;

const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct AskQuestion {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuestion {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub tag: Option<String>,
    /// `sort=unanswered` narrows to questions with no answers yet.
    pub sort: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPage {
    pub questions: Vec<Question>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_questions: u64,
}

pub struct QuestionService {
    questions: Arc<dyn QuestionRepo>,
    answers: Arc<dyn AnswerRepo>,
}

impl QuestionService {
    pub fn new(questions: Arc<dyn QuestionRepo>, answers: Arc<dyn AnswerRepo>) -> Self {
        Self { questions, answers }
    }

    pub async fn ask(&self, actor: &AuthContext, input: AskQuestion) -> Result<Question> {
        let title = validate_title(&input.title)?;
        validate_content(&input.content)?;
        let tags = normalize_tags(input.tags)?;

        let now = Utc::now();
        let question = Question {
            id: Uuid::new_v4(),
            title,
            content: input.content,
            tags,
            status: QuestionStatus::default(),
            author_id: actor.user_id,
            author_name: actor.username.clone(),
            answer_ids: Vec::new(),
            accepted_answer_id: None,
            created_at: now,
            updated_at: now,
        };

        self.questions.create(question).await
    }

    /// Non-admin callers only ever see approved questions.
    pub async fn list(
        &self,
        actor: Option<&AuthContext>,
        query: ListQuery,
    ) -> Result<QuestionPage> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

        let filter = QuestionFilter {
            tag: query.tag,
            unanswered: query.sort.as_deref() == Some("unanswered"),
            include_unapproved: actor.map(AuthContext::is_admin).unwrap_or(false),
            limit,
            offset: (page - 1) * limit,
        };

        let (questions, total) = self.questions.list(filter).await?;

        Ok(QuestionPage {
            questions,
            current_page: page,
            total_pages: total.div_ceil(limit),
            total_questions: total,
        })
    }

    /// The question page read model. Answers come back sorted by score,
    /// highest first, with creation order breaking ties.
    pub async fn get(&self, id: Uuid) -> Result<QuestionDetail> {
        let question = self
            .questions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Question", id.to_string()))?;

        let mut answers = self.answers.find_by_question(id).await?;

        let creation_order: HashMap<Uuid, usize> = question
            .answer_ids
            .iter()
            .enumerate()
            .map(|(index, answer_id)| (*answer_id, index))
            .collect();
        answers.sort_by_key(|a| creation_order.get(&a.id).copied().unwrap_or(usize::MAX));
        // stable sort keeps creation order inside equal scores
        answers.sort_by(|a, b| b.score().cmp(&a.score()));

        Ok(QuestionDetail { question, answers })
    }

    /// Only the author may edit; admins moderate via delete, not edit.
    pub async fn update(
        &self,
        actor: &AuthContext,
        id: Uuid,
        patch: UpdateQuestion,
    ) -> Result<Question> {
        let mut question = self
            .questions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Question", id.to_string()))?;

        if question.author_id != actor.user_id {
            return Err(AppError::Forbidden(
                "only the author may update this question".to_string(),
            ));
        }

        if let Some(title) = patch.title {
            question.title = validate_title(&title)?;
        }
        if let Some(content) = patch.content {
            validate_content(&content)?;
            question.content = content;
        }
        if let Some(tags) = patch.tags {
            question.tags = normalize_tags(tags)?;
        }
        question.updated_at = Utc::now();

        self.questions.update(question).await
    }

    /// Cascade delete: answers first, then the question. A failed cascade
    /// leaves the question in place and reports the corruption risk.
    pub async fn delete(&self, actor: &AuthContext, id: Uuid) -> Result<()> {
        let question = self
            .questions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Question", id.to_string()))?;

        if question.author_id != actor.user_id && !actor.is_admin() {
            return Err(AppError::Forbidden(
                "not authorized to delete this question".to_string(),
            ));
        }

        let removed = self.answers.delete_by_question(id).await.map_err(|err| {
            AppError::Conflict(format!(
                "cascade delete incomplete for question {id}, answers may remain: {err}"
            ))
        })?;

        self.questions.delete(id).await?;
        tracing::info!(question_id = %id, answers_removed = removed, "question deleted");
        Ok(())
    }
}

fn validate_title(raw: &str) -> Result<String> {
    let title = raw.trim();
    let len = title.chars().count();
    if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len) {
        return Err(AppError::InvalidInput(format!(
            "title must be between {TITLE_MIN_CHARS} and {TITLE_MAX_CHARS} characters"
        )));
    }
    Ok(title.to_string())
}

fn validate_content(content: &str) -> Result<()> {
    if content.chars().count() < CONTENT_MIN_CHARS {
        return Err(AppError::InvalidInput(format!(
            "content must be at least {CONTENT_MIN_CHARS} characters long"
        )));
    }
    Ok(())
}

/// Lowercases every tag and enforces the count/length bounds.
fn normalize_tags(tags: Vec<String>) -> Result<Vec<String>> {
    if tags.is_empty() || tags.len() > TAGS_MAX {
        return Err(AppError::InvalidInput(format!(
            "you must provide between 1 and {TAGS_MAX} tags"
        )));
    }
    let normalized: Vec<String> = tags.into_iter().map(|t| t.to_lowercase()).collect();
    if normalized.iter().any(|t| t.chars().count() > TAG_MAX_CHARS) {
        return Err(AppError::InvalidInput(format!(
            "tags cannot be longer than {TAG_MAX_CHARS} characters"
        )));
    }
    Ok(normalized)
}
