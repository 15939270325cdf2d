//! # client-state
//!
//! The client's local mirror of server state: a notification feed fed by
//! the realtime channel, and an optimistic view of one question's answers
//! for instant vote/accept feedback.
//!
//! The optimistic pattern is deliberately blunt: capture a deep snapshot,
//! mutate the live view, and on request failure replace the whole view
//! with the snapshot. Rolling back discards every local mutation made
//! after the snapshot was taken — a known limitation of the
//! full-replacement strategy, kept as-is.

pub mod feed;
pub mod view;

pub use feed::NotificationFeed;
pub use view::{QuestionView, Snapshot};
