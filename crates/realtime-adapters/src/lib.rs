//! # realtime-adapters
//!
//! Room-based pub/sub over websockets. Each authenticated client joins a
//! channel keyed by its own user id; the notification dispatcher publishes
//! into the recipient's channel through the `NotificationPublisher` port.
//! Delivery is broadcast within the room, best-effort, and never queued
//! for disconnected sessions.

pub mod events;
pub mod metrics;
pub mod rooms;
pub mod session;

pub use events::{ClientEvent, ServerEvent};
pub use metrics::TransportMetrics;
pub use rooms::RoomRegistry;
