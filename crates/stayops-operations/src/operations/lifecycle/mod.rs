mod context;
mod operation;
mod result;
mod saga_data;
mod saga_steps;

pub use context::LifecycleContext;
pub use operation::{LifecycleOperation, lifecycle_step_names};
pub use result::{RunResult, RunStatus};
pub use saga_data::LifecycleSagaData;
pub use saga_steps::{
    AuditStep, FinancialReconciliationStep, NotificationStep, StatusTransitionStep,
    TaskSpawningStep, ValidationStep,
};
