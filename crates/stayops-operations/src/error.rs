use std::path::PathBuf;

use stayops_core::{CoreError, LifecycleAction, ReservationStatus, Role};
use stayops_saga::SagaError;
use thiserror::Error;

/// Coarse classification of a failed run, used by callers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The reservation or a related entity does not exist.
    NotFound,
    /// The reservation's status does not permit the requested transition.
    Precondition,
    /// The actor lacks the required role or ownership.
    Permission,
    /// Infrastructure failure while reading or writing.
    Persistence,
}

impl FailureKind {
    #[must_use]
    pub fn http_status(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Precondition => 409,
            Self::Permission => 403,
            Self::Persistence => 500,
        }
    }
}

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("reservation '{0}' not found")]
    ReservationNotFound(String),

    #[error("property '{0}' not found")]
    PropertyNotFound(String),

    #[error("cannot {action} reservation '{reservation_id}': status is {status}")]
    InvalidStatus {
        reservation_id: String,
        status: ReservationStatus,
        action: LifecycleAction,
    },

    #[error("insufficient permissions: role {role} cannot {action} reservations")]
    RoleNotPermitted { role: Role, action: LifecycleAction },

    #[error(
        "insufficient permissions: agent '{agent_id}' is not assigned to reservation '{reservation_id}'"
    )]
    AgentNotAssigned {
        agent_id: String,
        reservation_id: String,
    },

    #[error("cannot schedule tasks for reservation '{reservation_id}': due date out of range")]
    ScheduleOutOfRange { reservation_id: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("persistence failure during {operation}: {message}")]
    Persistence {
        operation: &'static str,
        message: String,
    },

    #[error("notification to '{recipient}' failed: {message}")]
    Notification { recipient: String, message: String },

    #[error("failed to read store file '{path}'")]
    StoreRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write store file '{path}'")]
    StoreWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse store file '{path}'")]
    StoreParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize store file '{path}'")]
    StoreSerialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("store file '{path}' lists {entity} '{id}' under key '{key}'")]
    StoreKeyMismatch {
        path: PathBuf,
        entity: &'static str,
        key: String,
        id: String,
    },

    #[error("failed to read config file '{path}'")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(
        "cleaning-lead-time-hours = {hours} in '{path}' exceeds the maximum of {max}"
    )]
    ConfigLeadTimeOutOfRange { path: PathBuf, hours: u32, max: u32 },

    #[error("lifecycle saga failed at step '{step}'")]
    SagaFailed {
        step: String,
        #[source]
        source: Box<OperationError>,
    },
}

pub type Result<T> = std::result::Result<T, OperationError>;

impl OperationError {
    pub(crate) fn persistence(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Persistence {
            operation,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::ReservationNotFound(_) | Self::PropertyNotFound(_) => FailureKind::NotFound,
            Self::InvalidStatus { .. } | Self::ScheduleOutOfRange { .. } | Self::Core(_) => {
                FailureKind::Precondition
            }
            Self::RoleNotPermitted { .. } | Self::AgentNotAssigned { .. } => {
                FailureKind::Permission
            }
            Self::SagaFailed { source, .. } => source.kind(),
            Self::Persistence { .. }
            | Self::Notification { .. }
            | Self::StoreRead { .. }
            | Self::StoreWrite { .. }
            | Self::StoreParse { .. }
            | Self::StoreSerialize { .. }
            | Self::StoreKeyMismatch { .. }
            | Self::ConfigRead { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigLeadTimeOutOfRange { .. } => FailureKind::Persistence,
        }
    }

    /// The innermost error, skipping saga wrapping.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::SagaFailed { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<SagaError<OperationError>> for OperationError {
    fn from(err: SagaError<OperationError>) -> Self {
        let step = err.step().to_string();
        Self::SagaFailed {
            step,
            source: Box::new(err.into_source()),
        }
    }
}
