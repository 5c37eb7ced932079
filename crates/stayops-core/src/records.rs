use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Revenue,
    Refund,
}

impl TransactionType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Revenue => "REVENUE",
            Self::Refund => "REFUND",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Settled,
}

/// Append-only ledger row recording money owed to or by the business.
///
/// The amount is signed: refunds are negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: i64,
    pub reservation_id: String,
    pub property_id: String,
    pub guest_id: String,
    #[serde(default)]
    pub status: TransactionStatus,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskKind {
    PreArrivalCleaning,
    CheckInMeeting,
}

impl TaskKind {
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::PreArrivalCleaning => "pre-arrival-cleaning",
            Self::CheckInMeeting => "check-in-meeting",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::PreArrivalCleaning => "Pre-arrival cleaning",
            Self::CheckInMeeting => "Check-in meeting",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Open,
    Done,
    Cancelled,
}

/// Prefix shared by every task key scoped to one reservation.
///
/// `:` and `%` in the id are percent-encoded, so no reservation's prefix is
/// a prefix of another reservation's keys.
#[must_use]
pub fn task_key_prefix(reservation_id: &str) -> String {
    let segment = reservation_id.replace('%', "%25").replace(':', "%3A");
    format!("reservation:{segment}:")
}

#[must_use]
pub fn task_key(reservation_id: &str, kind: TaskKind) -> String {
    format!("{}{}", task_key_prefix(reservation_id), kind.slug())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub key: String,
    pub kind: TaskKind,
    pub title: String,
    pub assignee_id: String,
    pub due_at: DateTime<Utc>,
    #[serde(default)]
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    ReservationConfirmed,
    ReservationCancelled,
}

impl AuditAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReservationConfirmed => "RESERVATION_CONFIRMED",
            Self::ReservationCancelled => "RESERVATION_CANCELLED",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: String,
    pub actor_id: String,
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
