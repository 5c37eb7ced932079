mod audit_repo;
mod ledger_repo;
mod notifier;
mod reservation_repo;
mod store;
mod task_repo;

pub use audit_repo::AuditRepo;
pub use ledger_repo::LedgerRepo;
pub use notifier::{Channel, Notification, NotificationKind, Notifier};
pub use reservation_repo::{PropertyRepo, ReservationRepo};
pub use store::{Completion, Store, UnitOfWork};
pub use task_repo::{TaskRepo, TaskUpdate};
