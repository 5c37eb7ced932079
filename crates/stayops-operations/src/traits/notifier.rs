use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Email,
    Sms,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => f.write_str("email"),
            Self::Sms => f.write_str("sms"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ReservationConfirmed,
    OwnerBookingConfirmed,
    ReservationCancelled,
    RefundIssued,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient_id: String,
    pub channel: Channel,
    pub kind: NotificationKind,
    pub subject: String,
    pub body: String,
}

/// Outbound notification delivery. Sends are best-effort: the orchestrator
/// records failures but never aborts because of them.
pub trait Notifier: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the notification could not be handed off.
    fn send(&self, notification: &Notification) -> Result<()>;
}
