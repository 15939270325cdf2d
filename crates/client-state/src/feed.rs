//! Live notification list, most recent first.

use domains::models::Notification;

#[derive(Debug, Default, Clone)]
pub struct NotificationFeed {
    items: Vec<Notification>,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends a pushed notification.
    pub fn push(&mut self, notification: Notification) {
        self.items.insert(0, notification);
    }

    /// Batch dismissal; there is no per-item mark-as-read round trip.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
