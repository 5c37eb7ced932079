use std::fmt;

use serde::{Deserialize, Serialize};
use stayops_core::LifecycleAction;
use stayops_saga::StepTrace;

use crate::error::{FailureKind, OperationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Confirmed,
    Cancelled,
    Failed,
}

impl RunStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Failed => "FAILED",
        }
    }
}

impl From<LifecycleAction> for RunStatus {
    fn from(action: LifecycleAction) -> Self {
        match action {
            LifecycleAction::Confirm => Self::Confirmed,
            LifecycleAction::Cancel => Self::Cancelled,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one confirm or cancel run, relayed verbatim to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub success: bool,
    pub reservation_id: String,
    pub status: RunStatus,
    pub message: String,
    pub steps: StepTrace,
    #[serde(skip)]
    failure: Option<FailureKind>,
}

impl RunResult {
    pub(crate) fn succeeded(
        action: LifecycleAction,
        reservation_id: &str,
        message: String,
        steps: StepTrace,
    ) -> Self {
        Self {
            success: true,
            reservation_id: reservation_id.to_string(),
            status: action.into(),
            message,
            steps,
            failure: None,
        }
    }

    pub(crate) fn failed(reservation_id: &str, error: &OperationError, steps: StepTrace) -> Self {
        Self {
            success: false,
            reservation_id: reservation_id.to_string(),
            status: RunStatus::Failed,
            message: error.root().to_string(),
            steps,
            failure: Some(error.kind()),
        }
    }

    /// Why the run failed; `None` on success.
    #[must_use]
    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure
    }

    #[must_use]
    pub fn http_status(&self) -> u16 {
        if self.success {
            return 200;
        }
        self.failure
            .map_or(FailureKind::Persistence.http_status(), FailureKind::http_status)
    }

    /// Human-readable rendering: a headline followed by one line per step.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} {}: {}\n{}",
            self.reservation_id,
            self.status,
            self.message,
            self.steps.summary()
        )
    }
}
