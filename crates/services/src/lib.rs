//! rusty-answers/crates/services/src/lib.rs
//!
//! Business rules over the domain ports: the vote toggle, question/answer
//! referential integrity, accept-answer authorization and notification
//! dispatch. Everything here is I/O-free except through the injected port
//! trait objects.

pub mod answers;
pub mod notifications;
pub mod questions;
pub mod vote;

pub use answers::AnswerService;
pub use notifications::NotificationDispatcher;
pub use questions::QuestionService;
