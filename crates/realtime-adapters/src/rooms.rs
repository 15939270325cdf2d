//! # Room registry
//!
//! The single shared structure of the realtime transport: a map from user
//! id to that user's live sessions. Membership changes only on connect and
//! disconnect of the user's own sessions; publishing broadcasts to every
//! session currently in the room.
//!
//! The transport never owns a notification, it conveys a copy. No
//! acknowledgement, no replay: a session that is not in the room at
//! publish time receives nothing.

use async_trait::async_trait;
use dashmap::DashMap;
use domains::error::Result;
use domains::models::Notification;
use domains::ports::NotificationPublisher;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::events::ServerEvent;
use crate::metrics::TransportMetrics;

struct RoomMember {
    connection_id: Uuid,
    sender: mpsc::UnboundedSender<ServerEvent>,
}

#[derive(Default)]
pub struct RoomRegistry {
    /// user id → live sessions in that user's room
    rooms: DashMap<Uuid, Vec<RoomMember>>,
    /// connection id → user id, for disconnect cleanup
    connections: DashMap<Uuid, Uuid>,
    metrics: TransportMetrics,
}

impl RoomRegistry {
    pub fn new(metrics: TransportMetrics) -> Self {
        Self {
            rooms: DashMap::new(),
            connections: DashMap::new(),
            metrics,
        }
    }

    /// Adds a session to the user's room. Multiple simultaneous sessions
    /// for one user are expected; each gets every event.
    pub fn join(
        &self,
        user_id: Uuid,
        connection_id: Uuid,
        sender: mpsc::UnboundedSender<ServerEvent>,
    ) {
        if self.connections.insert(connection_id, user_id).is_some() {
            // repeated join from the same connection is a no-op
            return;
        }
        self.rooms.entry(user_id).or_default().push(RoomMember {
            connection_id,
            sender,
        });
        self.metrics.sessions.inc();
        tracing::debug!(%user_id, %connection_id, "session joined room");
    }

    /// Implicit unsubscribe: a dropped connection leaves its room.
    pub fn leave(&self, connection_id: Uuid) {
        let Some((_, user_id)) = self.connections.remove(&connection_id) else {
            return;
        };
        if let Some(mut members) = self.rooms.get_mut(&user_id) {
            let before = members.len();
            members.retain(|m| m.connection_id != connection_id);
            let dropped = before - members.len();
            for _ in 0..dropped {
                self.metrics.sessions.dec();
            }
        }
        self.rooms.remove_if(&user_id, |_, members| members.is_empty());
        tracing::debug!(%user_id, %connection_id, "session left room");
    }

    /// Sessions currently subscribed for a user.
    pub fn session_count(&self, user_id: Uuid) -> usize {
        self.rooms.get(&user_id).map(|m| m.len()).unwrap_or(0)
    }

    /// Broadcasts to the room, pruning sessions whose receiver is gone.
    /// Returns how many sessions the event reached.
    fn broadcast(&self, user_id: Uuid, event: &ServerEvent) -> usize {
        let mut delivered = 0;
        let mut dead: Vec<Uuid> = Vec::new();

        if let Some(mut members) = self.rooms.get_mut(&user_id) {
            members.retain(|member| {
                if member.sender.send(event.clone()).is_ok() {
                    delivered += 1;
                    true
                } else {
                    dead.push(member.connection_id);
                    false
                }
            });
        }

        for connection_id in dead {
            self.connections.remove(&connection_id);
            self.metrics.sessions.dec();
        }
        self.rooms.remove_if(&user_id, |_, members| members.is_empty());

        delivered
    }
}

#[async_trait]
impl NotificationPublisher for RoomRegistry {
    /// Fire-and-forget fan-out. An empty room is a successful publish:
    /// the recipient is simply offline and the durable record stands.
    async fn publish(&self, recipient_id: Uuid, notification: &Notification) -> Result<()> {
        self.metrics.events_published.inc();
        let delivered = self.broadcast(
            recipient_id,
            &ServerEvent::NewNotification(notification.clone()),
        );
        self.metrics.events_delivered.inc_by(delivered as u64);
        tracing::debug!(
            %recipient_id,
            notification_id = %notification.id,
            delivered,
            "published new_notification"
        );
        Ok(())
    }
}
