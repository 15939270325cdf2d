//! # Vote Engine
//!
//! Pure toggle logic over an answer's voter lists. Single pass, no
//! intermediate invalid state: a user id never appears in both lists.
//!
//! Applying the same vote twice returns the answer to its prior state, so
//! the toggle is its own inverse.

use domains::models::{Answer, VoteKind};
use uuid::Uuid;

/// Applies one vote action in place.
///
/// Upvote: drop any standing downvote, then toggle membership in the
/// upvoter list. Downvote is symmetric.
pub fn apply_vote(answer: &mut Answer, user_id: Uuid, kind: VoteKind) {
    let (same, opposite) = match kind {
        VoteKind::Upvote => (&mut answer.upvoter_ids, &mut answer.downvoter_ids),
        VoteKind::Downvote => (&mut answer.downvoter_ids, &mut answer.upvoter_ids),
    };

    opposite.retain(|id| *id != user_id);

    if let Some(pos) = same.iter().position(|id| *id == user_id) {
        // toggle off
        same.remove(pos);
    } else {
        same.push(user_id);
    }
}
