pub mod error;
mod records;
mod status;
pub mod types;

pub use error::*;
pub use records::{
    AuditAction, AuditLogEntry, FinancialTransaction, TaskKind, TaskRecord, TaskStatus,
    TransactionStatus, TransactionType, task_key, task_key_prefix,
};
pub use status::{LifecycleAction, ReservationStatus};
pub use types::*;
