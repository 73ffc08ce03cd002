//! Notifier that keeps every notification in memory

use std::sync::Mutex;

use crate::domain::{Notification, NotificationLevel, Notifier};

/// Records notifications for later inspection, optionally forwarding them
pub struct InMemoryNotifier {
    notifications: Mutex<Vec<Notification>>,
    forward: Option<Box<dyn Notifier>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
            forward: None,
        }
    }

    /// Also pass every notification on to another notifier
    pub fn forwarding_to(notifier: impl Notifier + 'static) -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
            forward: Some(Box::new(notifier)),
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn with_level(&self, level: NotificationLevel) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(|n| n.level == level)
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.clear();
        }
    }
}

impl Default for InMemoryNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for InMemoryNotifier {
    fn notify(&self, notification: Notification) {
        if let Some(forward) = &self.forward {
            forward.notify(notification.clone());
        }

        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(notification);
        }
    }
}
