//! Notifier that renders notifications as log events

use tracing::{error, info, warn};

use crate::domain::{Notification, NotificationLevel, Notifier};

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let level = notification.level;
        let message = notification.message;

        match level {
            NotificationLevel::Success | NotificationLevel::Info => {
                info!(level = %level, "{}", message)
            }
            NotificationLevel::Warning => warn!(level = %level, "{}", message),
            NotificationLevel::Error => error!(level = %level, "{}", message),
        }
    }
}
