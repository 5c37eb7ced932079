use tracing::info;

use crate::Result;
use crate::traits::{Notification, Notifier};

/// Hands notifications to the log instead of a delivery service.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for TracingNotifier {
    fn send(&self, notification: &Notification) -> Result<()> {
        info!(
            recipient = %notification.recipient_id,
            channel = %notification.channel,
            kind = ?notification.kind,
            subject = %notification.subject,
            "notification dispatched"
        );
        Ok(())
    }
}
