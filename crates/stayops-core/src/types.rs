use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::ReservationStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    Agent,
    Owner,
    Guest,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::Agent => "AGENT",
            Self::Owner => "OWNER",
            Self::Guest => "GUEST",
        }
    }

    /// Staff roles may confirm reservations; agents only their own.
    #[must_use]
    pub fn is_staff(self) -> bool {
        matches!(self, Self::Admin | Self::Manager | Self::Agent)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "MANAGER" => Ok(Self::Manager),
            "AGENT" => Ok(Self::Agent),
            "OWNER" => Ok(Self::Owner),
            "GUEST" => Ok(Self::Guest),
            _ => Err(CoreError::UnknownRole(s.to_string())),
        }
    }
}

/// An authenticated user acting on a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl Actor {
    #[must_use]
    pub fn new(id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    #[serde(default)]
    pub default_agent_id: Option<String>,
}

/// A booking of a property. Amounts are in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub property_id: String,
    pub guest_id: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_amount: i64,
    #[serde(default)]
    pub paid_amount: i64,
    #[serde(default)]
    pub status: ReservationStatus,
    #[serde(default)]
    pub notes: String,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    #[must_use]
    pub fn outstanding_amount(&self) -> i64 {
        (self.total_amount - self.paid_amount).max(0)
    }

    /// Appends `line` to the notes, keeping earlier notes on their own lines.
    pub fn append_note(&mut self, line: &str) {
        if self.notes.is_empty() {
            self.notes = line.to_string();
        } else {
            self.notes.push('\n');
            self.notes.push_str(line);
        }
    }

    /// Check-in as an instant: midnight UTC of the check-in date.
    #[must_use]
    pub fn check_in_at(&self) -> DateTime<Utc> {
        self.check_in.and_time(chrono::NaiveTime::MIN).and_utc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reservation(total: i64, paid: i64) -> Reservation {
        Reservation {
            id: "res_1".to_string(),
            property_id: "prop_1".to_string(),
            guest_id: "guest_1".to_string(),
            agent_id: None,
            check_in: NaiveDate::from_ymd_opt(2024, 3, 10).expect("valid date"),
            check_out: NaiveDate::from_ymd_opt(2024, 3, 14).expect("valid date"),
            total_amount: total,
            paid_amount: paid,
            status: ReservationStatus::Pending,
            notes: String::new(),
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn outstanding_amount_never_negative() {
        assert_eq!(reservation(500, 200).outstanding_amount(), 300);
        assert_eq!(reservation(500, 700).outstanding_amount(), 0);
    }

    #[test]
    fn append_note_preserves_prior_notes() {
        let mut res = reservation(0, 0);
        res.append_note("late arrival");
        res.append_note("guest request");

        assert_eq!(res.notes, "late arrival\nguest request");
    }

    #[test]
    fn check_in_at_is_midnight_utc() {
        let res = reservation(0, 0);

        assert_eq!(res.check_in_at().to_rfc3339(), "2024-03-10T00:00:00+00:00");
    }

    #[test]
    fn only_staff_roles_are_staff() {
        assert!(Role::Admin.is_staff());
        assert!(Role::Manager.is_staff());
        assert!(Role::Agent.is_staff());
        assert!(!Role::Owner.is_staff());
        assert!(!Role::Guest.is_staff());
    }

    #[test]
    fn reservation_deserializes_from_camel_case() -> Result<(), serde_json::Error> {
        let json = r#"{
            "id": "res_1",
            "propertyId": "prop_1",
            "guestId": "guest_1",
            "agentId": "agent_9",
            "checkIn": "2024-03-10",
            "checkOut": "2024-03-12",
            "totalAmount": 500,
            "status": "MODIFIED",
            "updatedAt": "2024-01-01T00:00:00Z"
        }"#;

        let res: Reservation = serde_json::from_str(json)?;

        assert_eq!(res.agent_id.as_deref(), Some("agent_9"));
        assert_eq!(res.paid_amount, 0);
        assert_eq!(res.status, ReservationStatus::Modified);
        assert!(res.notes.is_empty());
        Ok(())
    }
}
