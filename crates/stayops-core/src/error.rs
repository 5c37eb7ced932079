use thiserror::Error;

use crate::status::{LifecycleAction, ReservationStatus};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown reservation status '{0}'")]
    UnknownStatus(String),

    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("cannot {action} a reservation in status {from}")]
    InvalidTransition {
        from: ReservationStatus,
        action: LifecycleAction,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_names_action_and_status() {
        let err = CoreError::InvalidTransition {
            from: ReservationStatus::Completed,
            action: LifecycleAction::Cancel,
        };

        assert_eq!(
            err.to_string(),
            "cannot cancel a reservation in status COMPLETED"
        );
    }
}
