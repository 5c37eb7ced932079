use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
    Modified,
}

impl ReservationStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
            Self::NoShow => "NO_SHOW",
            Self::Modified => "MODIFIED",
        }
    }

    /// Terminal statuses reject every lifecycle action.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Resolves the status a reservation moves to when `action` is applied.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` when the action is not permitted
    /// from the current status.
    pub fn transition(self, action: LifecycleAction) -> Result<Self, CoreError> {
        let next = match (self, action) {
            (Self::Pending, LifecycleAction::Confirm) => Some(Self::Confirmed),
            (Self::Pending | Self::Confirmed | Self::Modified, LifecycleAction::Cancel) => {
                Some(Self::Cancelled)
            }
            (
                Self::Confirmed
                | Self::Cancelled
                | Self::Completed
                | Self::NoShow
                | Self::Modified,
                LifecycleAction::Confirm,
            )
            | (Self::Cancelled | Self::Completed | Self::NoShow, LifecycleAction::Cancel) => None,
        };

        next.ok_or(CoreError::InvalidTransition { from: self, action })
    }

    #[must_use]
    pub fn can_transition(self, action: LifecycleAction) -> bool {
        self.transition(action).is_ok()
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "CANCELLED" => Ok(Self::Cancelled),
            "COMPLETED" => Ok(Self::Completed),
            "NO_SHOW" => Ok(Self::NoShow),
            "MODIFIED" => Ok(Self::Modified),
            _ => Err(CoreError::UnknownStatus(s.to_string())),
        }
    }
}

/// A state-mutating operation the lifecycle orchestrator can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleAction {
    Confirm,
    Cancel,
}

impl LifecycleAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
        }
    }

    #[must_use]
    pub fn target_status(self) -> ReservationStatus {
        match self {
            Self::Confirm => ReservationStatus::Confirmed,
            Self::Cancel => ReservationStatus::Cancelled,
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ReservationStatus; 6] = [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::Cancelled,
        ReservationStatus::Completed,
        ReservationStatus::NoShow,
        ReservationStatus::Modified,
    ];

    #[test]
    fn only_pending_can_be_confirmed() {
        for status in ALL {
            let allowed = status.can_transition(LifecycleAction::Confirm);
            assert_eq!(allowed, status == ReservationStatus::Pending, "{status}");
        }
    }

    #[test]
    fn pending_confirmed_and_modified_can_be_cancelled() {
        let cancellable: Vec<_> = ALL
            .into_iter()
            .filter(|s| s.can_transition(LifecycleAction::Cancel))
            .collect();

        assert_eq!(
            cancellable,
            vec![
                ReservationStatus::Pending,
                ReservationStatus::Confirmed,
                ReservationStatus::Modified,
            ]
        );
    }

    #[test]
    fn terminal_statuses_reject_every_action() {
        for status in ALL.into_iter().filter(|s| s.is_terminal()) {
            assert!(!status.can_transition(LifecycleAction::Confirm));
            assert!(!status.can_transition(LifecycleAction::Cancel));
        }
    }

    #[test]
    fn transition_lands_on_action_target() -> Result<(), CoreError> {
        assert_eq!(
            ReservationStatus::Pending.transition(LifecycleAction::Confirm)?,
            LifecycleAction::Confirm.target_status()
        );
        assert_eq!(
            ReservationStatus::Modified.transition(LifecycleAction::Cancel)?,
            LifecycleAction::Cancel.target_status()
        );
        Ok(())
    }

    #[test]
    fn parses_case_insensitively() -> Result<(), CoreError> {
        assert_eq!(
            "no_show".parse::<ReservationStatus>()?,
            ReservationStatus::NoShow
        );
        assert!(matches!(
            "ARCHIVED".parse::<ReservationStatus>(),
            Err(CoreError::UnknownStatus(s)) if s == "ARCHIVED"
        ));
        Ok(())
    }

    #[test]
    fn serializes_as_screaming_snake_case() -> Result<(), serde_json::Error> {
        assert_eq!(
            serde_json::to_string(&ReservationStatus::NoShow)?,
            "\"NO_SHOW\""
        );
        Ok(())
    }
}
