use std::cell::RefCell;
use std::sync::{Mutex, PoisonError};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use stayops_core::{
    AuditLogEntry, FinancialTransaction, Property, Reservation, TaskRecord, TaskStatus,
};
use tracing::debug;

use crate::Result;
use crate::error::OperationError;
use crate::traits::{
    AuditRepo, Completion, LedgerRepo, PropertyRepo, ReservationRepo, Store, TaskRepo,
    TaskUpdate, UnitOfWork,
};

/// Every persisted entity, as one serializable document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    #[serde(default)]
    pub properties: IndexMap<String, Property>,
    #[serde(default)]
    pub reservations: IndexMap<String, Reservation>,
    #[serde(default)]
    pub transactions: Vec<FinancialTransaction>,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    #[serde(default)]
    pub audit_log: Vec<AuditLogEntry>,
}

impl StoreState {
    #[must_use]
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.insert(property.id.clone(), property);
        self
    }

    #[must_use]
    pub fn with_reservation(mut self, reservation: Reservation) -> Self {
        self.reservations
            .insert(reservation.id.clone(), reservation);
        self
    }
}

/// Process-local store with serialized transactions.
///
/// A transaction holds the store lock for its whole duration and works on a
/// private copy of the state, which replaces the shared state on commit.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new(state: StoreState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// Copy of the committed state.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn snapshot(&self) -> Result<StoreState> {
        let guard = self.state.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }

    /// Runs `work` in a transaction; on `Commit`, `on_commit` sees the new
    /// state before it becomes visible and can veto it by returning an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned or `on_commit` fails; the
    /// shared state is unchanged in both cases.
    pub fn transaction_with_commit_hook<T, F, H>(&self, work: F, on_commit: H) -> Result<T>
    where
        F: FnOnce(&dyn UnitOfWork) -> Completion<T>,
        H: FnOnce(&StoreState) -> Result<()>,
    {
        let mut guard = self.state.lock().map_err(poisoned)?;
        let tx = InMemoryTransaction {
            working: RefCell::new(guard.clone()),
        };

        match work(&tx) {
            Completion::Commit(value) => {
                let working = tx.working.into_inner();
                on_commit(&working)?;
                *guard = working;
                debug!("transaction committed");
                Ok(value)
            }
            Completion::Rollback(value) => {
                debug!("transaction rolled back");
                Ok(value)
            }
        }
    }
}

impl Store for InMemoryStore {
    fn transaction<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&dyn UnitOfWork) -> Completion<T>,
    {
        self.transaction_with_commit_hook(work, |_| Ok(()))
    }
}

fn poisoned<T>(_: PoisonError<T>) -> OperationError {
    OperationError::persistence("begin transaction", "store lock poisoned")
}

struct InMemoryTransaction {
    working: RefCell<StoreState>,
}

impl ReservationRepo for InMemoryTransaction {
    fn find_reservation(&self, id: &str) -> Result<Option<Reservation>> {
        Ok(self.working.borrow().reservations.get(id).cloned())
    }

    fn update_reservation(&self, reservation: &Reservation) -> Result<()> {
        let mut state = self.working.borrow_mut();
        let Some(row) = state.reservations.get_mut(&reservation.id) else {
            return Err(OperationError::persistence(
                "update reservation",
                format!("no row for reservation '{}'", reservation.id),
            ));
        };
        *row = reservation.clone();
        Ok(())
    }
}

impl PropertyRepo for InMemoryTransaction {
    fn find_property(&self, id: &str) -> Result<Option<Property>> {
        Ok(self.working.borrow().properties.get(id).cloned())
    }
}

impl LedgerRepo for InMemoryTransaction {
    fn create_transaction(&self, transaction: &FinancialTransaction) -> Result<()> {
        self.working
            .borrow_mut()
            .transactions
            .push(transaction.clone());
        Ok(())
    }

    fn transactions_for_reservation(
        &self,
        reservation_id: &str,
    ) -> Result<Vec<FinancialTransaction>> {
        Ok(self
            .working
            .borrow()
            .transactions
            .iter()
            .filter(|t| t.reservation_id == reservation_id)
            .cloned()
            .collect())
    }
}

impl TaskRepo for InMemoryTransaction {
    fn create_task(&self, task: &TaskRecord) -> Result<()> {
        let mut state = self.working.borrow_mut();
        if state.tasks.iter().any(|t| t.id == task.id) {
            return Err(OperationError::persistence(
                "create task",
                format!("duplicate task id '{}'", task.id),
            ));
        }
        state.tasks.push(task.clone());
        Ok(())
    }

    fn bulk_update_tasks_by_key_prefix(&self, prefix: &str, update: &TaskUpdate) -> Result<usize> {
        let mut state = self.working.borrow_mut();
        let mut count = 0;
        for task in state
            .tasks
            .iter_mut()
            .filter(|t| t.key.starts_with(prefix) && t.status == TaskStatus::Open)
        {
            task.status = update.status;
            if update.status == TaskStatus::Cancelled {
                task.cancelled_by = Some(update.actor_id.clone());
                task.cancelled_at = Some(update.at);
            }
            count += 1;
        }
        Ok(count)
    }

    fn tasks_by_key_prefix(&self, prefix: &str) -> Result<Vec<TaskRecord>> {
        Ok(self
            .working
            .borrow()
            .tasks
            .iter()
            .filter(|t| t.key.starts_with(prefix))
            .cloned()
            .collect())
    }
}

impl AuditRepo for InMemoryTransaction {
    fn append_audit(&self, entry: &AuditLogEntry) -> Result<()> {
        self.working.borrow_mut().audit_log.push(entry.clone());
        Ok(())
    }

    fn audit_entries_for(&self, entity_id: &str) -> Result<Vec<AuditLogEntry>> {
        Ok(self
            .working
            .borrow()
            .audit_log
            .iter()
            .filter(|e| e.entity_id == entity_id)
            .cloned()
            .collect())
    }
}
