//! Optimistic question view with snapshot rollback.
//!
//! Votes are toggled locally with the same engine the server runs, so a
//! confirmed request needs no reconciliation at all: the local state
//! already matches what the server computed.

use domains::error::{AppError, Result};
use domains::models::{QuestionDetail, VoteKind};
use services::vote::apply_vote;
use uuid::Uuid;

/// An owned deep copy of the view taken before a tentative mutation.
/// No aliasing with the live state: rollback is a whole-value replace.
#[derive(Debug, Clone)]
pub struct Snapshot(QuestionDetail);

#[derive(Debug, Clone)]
pub struct QuestionView {
    current: QuestionDetail,
}

impl QuestionView {
    pub fn new(detail: QuestionDetail) -> Self {
        Self { current: detail }
    }

    pub fn current(&self) -> &QuestionDetail {
        &self.current
    }

    /// Server truth replaces whatever the view holds.
    pub fn refresh(&mut self, detail: QuestionDetail) {
        self.current = detail;
    }

    /// Applies a vote toggle locally and returns the pre-mutation
    /// snapshot to roll back with if the request fails.
    pub fn optimistic_vote(
        &mut self,
        answer_id: Uuid,
        user_id: Uuid,
        kind: VoteKind,
    ) -> Result<Snapshot> {
        let snapshot = Snapshot(self.current.clone());

        let answer = self
            .current
            .answers
            .iter_mut()
            .find(|a| a.id == answer_id)
            .ok_or_else(|| AppError::NotFound("Answer", answer_id.to_string()))?;
        apply_vote(answer, user_id, kind);

        Ok(snapshot)
    }

    /// Marks an answer accepted locally. Accepting the already-accepted
    /// answer is a no-op on the server, so the snapshot equals the state.
    pub fn optimistic_accept(&mut self, answer_id: Uuid) -> Result<Snapshot> {
        if !self.current.answers.iter().any(|a| a.id == answer_id) {
            return Err(AppError::NotFound("Answer", answer_id.to_string()));
        }
        let snapshot = Snapshot(self.current.clone());
        self.current.question.accepted_answer_id = Some(answer_id);
        Ok(snapshot)
    }

    /// Full rollback: the snapshot replaces the live state wholesale.
    /// Local mutations made since the snapshot are discarded with it.
    pub fn rollback(&mut self, snapshot: Snapshot) {
        self.current = snapshot.0;
    }

    /// Confirms a tentative mutation by consuming its snapshot.
    pub fn commit(&mut self, snapshot: Snapshot) {
        drop(snapshot);
    }
}
