//! Per-connection websocket loop.
//!
//! One task forwards room events from the session's channel into the
//! socket; the reading half handles the join handshake and treats any
//! close or error as an implicit unsubscribe.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use domains::models::AuthContext;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::events::{ClientEvent, ServerEvent};
use crate::rooms::RoomRegistry;

/// Runs until the client disconnects. The connection only enters a room
/// after a `join_room` for the authenticated user's own id; a join for
/// any other room is refused.
pub async fn run_session(socket: WebSocket, identity: AuthContext, registry: Arc<RoomRegistry>) {
    let connection_id = Uuid::new_v4();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<ServerEvent>();
    let (mut sink, mut stream) = socket.split();

    let forward = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let Ok(text) = serde_json::to_string(&event) else {
                continue;
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    tracing::info!(%connection_id, user_id = %identity.user_id, "websocket connected");

    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientEvent>(text.as_str()) {
                Ok(ClientEvent::JoinRoom { user_id }) => {
                    if user_id == identity.user_id {
                        registry.join(user_id, connection_id, event_tx.clone());
                    } else {
                        tracing::warn!(
                            %connection_id,
                            authenticated = %identity.user_id,
                            requested = %user_id,
                            "refused join for foreign room"
                        );
                    }
                }
                Err(err) => {
                    tracing::debug!(%connection_id, error = %err, "unparseable client event");
                }
            },
            Ok(Message::Close(_)) => break,
            // pings are answered by the protocol layer; pongs and binary
            // frames carry nothing in this protocol
            Ok(_) => {}
            Err(err) => {
                tracing::debug!(%connection_id, error = %err, "websocket error");
                break;
            }
        }
    }

    registry.leave(connection_id);
    forward.abort();
    tracing::info!(%connection_id, "websocket disconnected");
}
