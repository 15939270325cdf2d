//! Wire events for the realtime channel.
//!
//! The protocol is two messages: the client joins its own room after
//! connecting, the server pushes notifications into that room. Event names
//! are inherited from the SPA's socket vocabulary.

use domains::models::Notification;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client → server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Subscribe this connection to the channel keyed by the user's id.
    /// Only honored for the connection's own authenticated user.
    #[serde(rename_all = "camelCase")]
    JoinRoom { user_id: Uuid },
}

/// Server → client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A freshly persisted notification for the room's user.
    NewNotification(Notification),
}
