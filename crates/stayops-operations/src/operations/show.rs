use serde::Serialize;
use stayops_core::{AuditLogEntry, FinancialTransaction, Reservation, TaskRecord, task_key_prefix};

use crate::Result;
use crate::error::OperationError;
use crate::traits::{Completion, Store, UnitOfWork};

/// A reservation together with every record the lifecycle keeps for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationOverview {
    pub reservation: Reservation,
    pub tasks: Vec<TaskRecord>,
    pub transactions: Vec<FinancialTransaction>,
    pub audit_log: Vec<AuditLogEntry>,
}

/// Read-only lookup of a reservation and its related records.
pub struct ShowOperation<S> {
    store: S,
}

impl<S> ShowOperation<S>
where
    S: Store,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// Returns `OperationError::ReservationNotFound` if the id does not
    /// resolve, or a persistence error if the store cannot be read.
    pub fn execute(&self, reservation_id: &str) -> Result<ReservationOverview> {
        self.store
            .transaction(|uow| Completion::Rollback(load(uow, reservation_id)))?
    }
}

fn load(uow: &dyn UnitOfWork, reservation_id: &str) -> Result<ReservationOverview> {
    let reservation = uow
        .find_reservation(reservation_id)?
        .ok_or_else(|| OperationError::ReservationNotFound(reservation_id.to_string()))?;

    Ok(ReservationOverview {
        tasks: uow.tasks_by_key_prefix(&task_key_prefix(reservation_id))?,
        transactions: uow.transactions_for_reservation(reservation_id)?,
        audit_log: uow.audit_entries_for(reservation_id)?,
        reservation,
    })
}

#[cfg(test)]
mod tests {
    use stayops_core::{Actor, ReservationStatus, Role};

    use super::*;
    use crate::OrchestratorConfig;
    use crate::mocks::{FixedClock, RecordingNotifier, reservation, state_with};
    use crate::operations::LifecycleOperation;
    use crate::providers::InMemoryStore;

    #[test]
    fn overview_collects_records_written_by_a_run() -> anyhow::Result<()> {
        let op = LifecycleOperation::new(
            InMemoryStore::new(state_with([reservation("res_1", ReservationStatus::Pending)])),
            RecordingNotifier::new(),
            FixedClock::default(),
            OrchestratorConfig::default(),
        );
        op.confirm(
            "res_1",
            &Actor::new("admin_1", "admin@example.com", Role::Admin),
        );
        let show = ShowOperation::new(InMemoryStore::new(op.store().snapshot()?));

        let overview = show.execute("res_1")?;

        assert_eq!(overview.reservation.status, ReservationStatus::Confirmed);
        assert_eq!(overview.tasks.len(), 2);
        assert_eq!(overview.transactions.len(), 1);
        assert_eq!(overview.audit_log.len(), 1);
        Ok(())
    }

    #[test]
    fn unknown_reservation_is_not_found() {
        let show = ShowOperation::new(InMemoryStore::new(state_with([])));

        let result = show.execute("res_404");

        assert!(matches!(result, Err(OperationError::ReservationNotFound(id)) if id == "res_404"));
    }
}
