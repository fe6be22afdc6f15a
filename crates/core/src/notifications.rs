use crate::domain::notification::Notification;
use crate::filter::{filter, StatusFilter};

/// Notifications shown to the session owner, newest first.
#[derive(Clone, Debug, Default)]
pub struct NotificationFeed {
    items: Vec<Notification>,
}

impl NotificationFeed {
    pub fn push(&mut self, notification: Notification) {
        self.items.insert(0, notification);
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn search(&self, status: StatusFilter, query: &str) -> Vec<Notification> {
        filter(&self.items, status, query)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
