//! # Answer Service
//!
//! The write paths that tie questions and answers together: posting an
//! answer (append to the parent's id list + notification dispatch), the
//! vote toggle, accepting an answer, and the single-answer delete that
//! patches the parent before the record disappears.

use std::sync::Arc;

use chrono::Utc;
use domains::error::{AppError, Result};
use domains::models::{Answer, AuthContext, Question, VoteKind};
use domains::ports::{AnswerRepo, QuestionRepo};
use serde::Deserialize;
use uuid::Uuid;

use crate::notifications::NotificationDispatcher;
use crate::vote::apply_vote;

const ANSWER_MIN_CHARS: usize = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct PostAnswer {
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub vote_type: String,
}

pub struct AnswerService {
    questions: Arc<dyn QuestionRepo>,
    answers: Arc<dyn AnswerRepo>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl AnswerService {
    pub fn new(
        questions: Arc<dyn QuestionRepo>,
        answers: Arc<dyn AnswerRepo>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            questions,
            answers,
            dispatcher,
        }
    }

    /// Creates the answer, appends its id to the parent question and
    /// dispatches the new-answer notification to the question's author.
    pub async fn post(
        &self,
        actor: &AuthContext,
        question_id: Uuid,
        input: PostAnswer,
    ) -> Result<Answer> {
        if input.content.chars().count() < ANSWER_MIN_CHARS {
            return Err(AppError::InvalidInput(format!(
                "answer must be at least {ANSWER_MIN_CHARS} characters long"
            )));
        }

        let mut question = self
            .questions
            .find_by_id(question_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Question", question_id.to_string()))?;

        let now = Utc::now();
        let answer = self
            .answers
            .create(Answer {
                id: Uuid::new_v4(),
                content: input.content,
                author_id: actor.user_id,
                author_name: actor.username.clone(),
                question_id,
                upvoter_ids: Vec::new(),
                downvoter_ids: Vec::new(),
                created_at: now,
                updated_at: now,
            })
            .await?;

        question.answer_ids.push(answer.id);
        question.updated_at = now;
        let question = self.questions.update(question).await?;

        self.dispatcher.notify_new_answer(&question, actor).await?;

        Ok(answer)
    }

    /// Toggle vote. The raw vote type is validated here so the engine only
    /// ever sees the closed enum.
    pub async fn vote(
        &self,
        actor: &AuthContext,
        answer_id: Uuid,
        vote_type: &str,
    ) -> Result<Answer> {
        let kind = VoteKind::parse(vote_type).ok_or_else(|| {
            AppError::InvalidInput(format!("invalid vote type: {vote_type}"))
        })?;

        let mut answer = self
            .answers
            .find_by_id(answer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Answer", answer_id.to_string()))?;

        apply_vote(&mut answer, actor.user_id, kind);
        answer.updated_at = Utc::now();

        self.answers.update(answer).await
    }

    /// Accepts an answer on the actor's own question. Plain assignment:
    /// re-accepting a different answer replaces the old acceptance, and
    /// accepting the already-accepted answer changes nothing.
    ///
    /// Ownership is checked before the answer is even resolved, so a
    /// non-author gets Forbidden for any answer id.
    pub async fn accept(
        &self,
        actor: &AuthContext,
        question_id: Uuid,
        answer_id: Uuid,
    ) -> Result<Question> {
        let mut question = self
            .questions
            .find_by_id(question_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Question", question_id.to_string()))?;

        if question.author_id != actor.user_id {
            return Err(AppError::Forbidden(
                "only the question author may accept an answer".to_string(),
            ));
        }

        let answer = self
            .answers
            .find_by_id(answer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Answer", answer_id.to_string()))?;

        if answer.question_id != question_id {
            return Err(AppError::Conflict(
                "answer does not belong to this question".to_string(),
            ));
        }

        if question.accepted_answer_id == Some(answer_id) {
            return Ok(question);
        }

        question.accepted_answer_id = Some(answer_id);
        question.updated_at = Utc::now();
        self.questions.update(question).await
    }

    /// Deletes an answer (author or admin). The parent question is patched
    /// first: the id leaves `answer_ids` and, when the deleted answer was
    /// the accepted one, the acceptance is cleared.
    pub async fn delete(&self, actor: &AuthContext, answer_id: Uuid) -> Result<()> {
        let answer = self
            .answers
            .find_by_id(answer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Answer", answer_id.to_string()))?;

        if answer.author_id != actor.user_id && !actor.is_admin() {
            return Err(AppError::Forbidden(
                "not authorized to delete this answer".to_string(),
            ));
        }

        if let Some(mut question) = self.questions.find_by_id(answer.question_id).await? {
            question.answer_ids.retain(|id| *id != answer_id);
            if question.accepted_answer_id == Some(answer_id) {
                question.accepted_answer_id = None;
            }
            question.updated_at = Utc::now();
            self.questions.update(question).await?;
        }

        self.answers.delete(answer_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::models::{QuestionStatus, Role};
    use domains::ports::{MockAnswerRepo, MockQuestionRepo};
    use mockall::predicate::eq;

    fn actor(role: Role) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            username: "someone".to_string(),
            role,
        }
    }

    fn question_by(author_id: Uuid) -> Question {
        Question {
            id: Uuid::new_v4(),
            title: "How do I pin a future?".to_string(),
            content: "The compiler keeps telling me the future is not Unpin.".to_string(),
            tags: vec!["async".to_string()],
            status: QuestionStatus::Approved,
            author_id,
            author_name: "asker".to_string(),
            answer_ids: Vec::new(),
            accepted_answer_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn answer_for(question_id: Uuid, author_id: Uuid) -> Answer {
        Answer {
            id: Uuid::new_v4(),
            content: "Box::pin is the shortest path.".to_string(),
            author_id,
            author_name: "helper".to_string(),
            question_id,
            upvoter_ids: Vec::new(),
            downvoter_ids: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn dispatcher_with_no_traffic() -> Arc<NotificationDispatcher> {
        let mut repo = domains::ports::MockNotificationRepo::new();
        repo.expect_create().times(0);
        let mut publisher = domains::ports::MockNotificationPublisher::new();
        publisher.expect_publish().times(0);
        Arc::new(NotificationDispatcher::new(
            Arc::new(repo),
            Arc::new(publisher),
        ))
    }

    #[tokio::test]
    async fn accept_is_forbidden_for_non_author_before_answer_lookup() {
        let question = question_by(Uuid::new_v4());
        let question_id = question.id;

        let mut questions = MockQuestionRepo::new();
        questions
            .expect_find_by_id()
            .with(eq(question_id))
            .returning(move |_| Ok(Some(question.clone())));

        let mut answers = MockAnswerRepo::new();
        // A stranger must be rejected without resolving the answer at all.
        answers.expect_find_by_id().times(0);

        let service = AnswerService::new(
            Arc::new(questions),
            Arc::new(answers),
            dispatcher_with_no_traffic(),
        );

        let stranger = actor(Role::User);
        let result = service
            .accept(&stranger, question_id, Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn accept_rejects_answer_from_another_question() {
        let author = actor(Role::User);
        let question = question_by(author.user_id);
        let question_id = question.id;
        let foreign_answer = answer_for(Uuid::new_v4(), Uuid::new_v4());
        let foreign_answer_id = foreign_answer.id;

        let mut questions = MockQuestionRepo::new();
        questions
            .expect_find_by_id()
            .returning(move |_| Ok(Some(question.clone())));
        let mut answers = MockAnswerRepo::new();
        answers
            .expect_find_by_id()
            .with(eq(foreign_answer_id))
            .returning(move |_| Ok(Some(foreign_answer.clone())));

        let service = AnswerService::new(
            Arc::new(questions),
            Arc::new(answers),
            dispatcher_with_no_traffic(),
        );

        let result = service.accept(&author, question_id, foreign_answer_id).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn accept_of_already_accepted_answer_is_a_no_op() {
        let author = actor(Role::User);
        let mut question = question_by(author.user_id);
        let question_id = question.id;
        let answer = answer_for(question_id, Uuid::new_v4());
        question.accepted_answer_id = Some(answer.id);
        question.answer_ids.push(answer.id);
        let answer_id = answer.id;

        let mut questions = MockQuestionRepo::new();
        questions
            .expect_find_by_id()
            .returning(move |_| Ok(Some(question.clone())));
        questions.expect_update().times(0);
        let mut answers = MockAnswerRepo::new();
        answers
            .expect_find_by_id()
            .returning(move |_| Ok(Some(answer.clone())));

        let service = AnswerService::new(
            Arc::new(questions),
            Arc::new(answers),
            dispatcher_with_no_traffic(),
        );

        let accepted = service.accept(&author, question_id, answer_id).await.unwrap();
        assert_eq!(accepted.accepted_answer_id, Some(answer_id));
    }

    #[tokio::test]
    async fn deleting_the_accepted_answer_clears_acceptance() {
        let author = actor(Role::User);
        let mut question = question_by(Uuid::new_v4());
        let answer = answer_for(question.id, author.user_id);
        question.answer_ids.push(answer.id);
        question.accepted_answer_id = Some(answer.id);
        let answer_id = answer.id;

        let mut questions = MockQuestionRepo::new();
        questions
            .expect_find_by_id()
            .returning(move |_| Ok(Some(question.clone())));
        questions
            .expect_update()
            .withf(move |q: &Question| {
                q.accepted_answer_id.is_none() && !q.answer_ids.contains(&answer_id)
            })
            .returning(|q| Ok(q));

        let mut answers = MockAnswerRepo::new();
        answers
            .expect_find_by_id()
            .returning(move |_| Ok(Some(answer.clone())));
        answers
            .expect_delete()
            .with(eq(answer_id))
            .returning(|_| Ok(true));

        let service = AnswerService::new(
            Arc::new(questions),
            Arc::new(answers),
            dispatcher_with_no_traffic(),
        );

        service.delete(&author, answer_id).await.unwrap();
    }

    #[tokio::test]
    async fn delete_by_stranger_is_forbidden_but_admin_passes() {
        let answer = answer_for(Uuid::new_v4(), Uuid::new_v4());
        let answer_id = answer.id;
        let question = question_by(Uuid::new_v4());

        let mut questions = MockQuestionRepo::new();
        questions
            .expect_find_by_id()
            .returning(move |_| Ok(Some(question.clone())));
        questions.expect_update().returning(|q| Ok(q));
        let mut answers = MockAnswerRepo::new();
        answers
            .expect_find_by_id()
            .returning(move |_| Ok(Some(answer.clone())));
        answers.expect_delete().returning(|_| Ok(true));

        let service = AnswerService::new(
            Arc::new(questions),
            Arc::new(answers),
            dispatcher_with_no_traffic(),
        );

        let stranger = actor(Role::User);
        let result = service.delete(&stranger, answer_id).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        let admin = actor(Role::Admin);
        service.delete(&admin, answer_id).await.unwrap();
    }

    #[tokio::test]
    async fn unknown_vote_type_never_reaches_the_store() {
        let mut questions = MockQuestionRepo::new();
        questions.expect_find_by_id().times(0);
        let mut answers = MockAnswerRepo::new();
        answers.expect_find_by_id().times(0);

        let service = AnswerService::new(
            Arc::new(questions),
            Arc::new(answers),
            dispatcher_with_no_traffic(),
        );

        let voter = actor(Role::User);
        let result = service.vote(&voter, Uuid::new_v4(), "sideways").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
