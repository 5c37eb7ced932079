mod lifecycle;
mod show;

pub use lifecycle::{
    AuditStep, FinancialReconciliationStep, LifecycleContext, LifecycleOperation,
    LifecycleSagaData, NotificationStep, RunResult, RunStatus, StatusTransitionStep,
    TaskSpawningStep, ValidationStep, lifecycle_step_names,
};
pub use show::{ReservationOverview, ShowOperation};
