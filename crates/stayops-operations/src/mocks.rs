use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use stayops_core::{
    AuditLogEntry, FinancialTransaction, Property, Reservation, ReservationStatus, TaskRecord,
};
use stayops_saga::Clock;

use crate::Result;
use crate::error::OperationError;
use crate::providers::{InMemoryStore, StoreState};
use crate::traits::{
    AuditRepo, Completion, LedgerRepo, Notification, Notifier, PropertyRepo, ReservationRepo,
    Store, TaskRepo, TaskUpdate, UnitOfWork,
};

pub struct FixedClock {
    time: DateTime<Utc>,
}

impl FixedClock {
    #[must_use]
    pub fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }

    /// # Panics
    ///
    /// Panics if `timestamp` is not RFC 3339.
    #[must_use]
    pub fn at(timestamp: &str) -> Self {
        let time = DateTime::parse_from_rfc3339(timestamp)
            .expect("valid RFC 3339 timestamp")
            .with_timezone(&Utc);
        Self::new(time)
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::at("2024-03-01T09:00:00Z")
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, notification: &Notification) -> Result<()> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notification.clone());
        }
        Ok(())
    }
}

pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn send(&self, notification: &Notification) -> Result<()> {
        Err(OperationError::Notification {
            recipient: notification.recipient_id.clone(),
            message: "gateway unavailable".to_string(),
        })
    }
}

/// Repository call that [`FaultyStore`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    FindReservation,
    FindProperty,
    UpdateReservation,
    CreateTask,
    UpdateTasks,
    CreateTransaction,
    AppendAudit,
    Commit,
}

/// In-memory store that fails one kind of repository call with a
/// persistence error.
pub struct FaultyStore {
    inner: InMemoryStore,
    fault: Fault,
}

impl FaultyStore {
    #[must_use]
    pub fn new(state: StoreState, fault: Fault) -> Self {
        Self {
            inner: InMemoryStore::new(state),
            fault,
        }
    }

    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> StoreState {
        self.inner.snapshot().expect("store lock poisoned")
    }
}

impl Store for FaultyStore {
    fn transaction<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&dyn UnitOfWork) -> Completion<T>,
    {
        let fault = self.fault;
        self.inner.transaction_with_commit_hook(
            |uow| work(&FaultyUnitOfWork { inner: uow, fault }),
            |_| {
                if fault == Fault::Commit {
                    Err(injected("commit"))
                } else {
                    Ok(())
                }
            },
        )
    }
}

fn injected(operation: &'static str) -> OperationError {
    OperationError::persistence(operation, "injected failure")
}

struct FaultyUnitOfWork<'a> {
    inner: &'a dyn UnitOfWork,
    fault: Fault,
}

impl FaultyUnitOfWork<'_> {
    fn check(&self, fault: Fault, operation: &'static str) -> Result<()> {
        if self.fault == fault {
            Err(injected(operation))
        } else {
            Ok(())
        }
    }
}

impl ReservationRepo for FaultyUnitOfWork<'_> {
    fn find_reservation(&self, id: &str) -> Result<Option<Reservation>> {
        self.check(Fault::FindReservation, "find reservation")?;
        self.inner.find_reservation(id)
    }

    fn update_reservation(&self, reservation: &Reservation) -> Result<()> {
        self.check(Fault::UpdateReservation, "update reservation")?;
        self.inner.update_reservation(reservation)
    }
}

impl PropertyRepo for FaultyUnitOfWork<'_> {
    fn find_property(&self, id: &str) -> Result<Option<Property>> {
        self.check(Fault::FindProperty, "find property")?;
        self.inner.find_property(id)
    }
}

impl LedgerRepo for FaultyUnitOfWork<'_> {
    fn create_transaction(&self, transaction: &FinancialTransaction) -> Result<()> {
        self.check(Fault::CreateTransaction, "create transaction")?;
        self.inner.create_transaction(transaction)
    }

    fn transactions_for_reservation(
        &self,
        reservation_id: &str,
    ) -> Result<Vec<FinancialTransaction>> {
        self.inner.transactions_for_reservation(reservation_id)
    }
}

impl TaskRepo for FaultyUnitOfWork<'_> {
    fn create_task(&self, task: &TaskRecord) -> Result<()> {
        self.check(Fault::CreateTask, "create task")?;
        self.inner.create_task(task)
    }

    fn bulk_update_tasks_by_key_prefix(&self, prefix: &str, update: &TaskUpdate) -> Result<usize> {
        self.check(Fault::UpdateTasks, "update tasks")?;
        self.inner.bulk_update_tasks_by_key_prefix(prefix, update)
    }

    fn tasks_by_key_prefix(&self, prefix: &str) -> Result<Vec<TaskRecord>> {
        self.inner.tasks_by_key_prefix(prefix)
    }
}

impl AuditRepo for FaultyUnitOfWork<'_> {
    fn append_audit(&self, entry: &AuditLogEntry) -> Result<()> {
        self.check(Fault::AppendAudit, "append audit entry")?;
        self.inner.append_audit(entry)
    }

    fn audit_entries_for(&self, entity_id: &str) -> Result<Vec<AuditLogEntry>> {
        self.inner.audit_entries_for(entity_id)
    }
}

#[must_use]
pub fn property(id: &str, owner_id: &str) -> Property {
    Property {
        id: id.to_string(),
        name: format!("Property {id}"),
        owner_id: owner_id.to_string(),
        default_agent_id: None,
    }
}

/// A reservation on `prop_1` for guest `guest_1`, checking in 2024-03-10.
///
/// # Panics
///
/// Never: the fixture dates are hard-coded and valid.
#[must_use]
pub fn reservation(id: &str, status: ReservationStatus) -> Reservation {
    Reservation {
        id: id.to_string(),
        property_id: "prop_1".to_string(),
        guest_id: "guest_1".to_string(),
        agent_id: None,
        check_in: NaiveDate::from_ymd_opt(2024, 3, 10).expect("valid date"),
        check_out: NaiveDate::from_ymd_opt(2024, 3, 14).expect("valid date"),
        total_amount: 500,
        paid_amount: 0,
        status,
        notes: String::new(),
        updated_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

/// State holding `prop_1` (owned by `owner_1`) and the given reservations.
#[must_use]
pub fn state_with(reservations: impl IntoIterator<Item = Reservation>) -> StoreState {
    reservations.into_iter().fold(
        StoreState::default().with_property(property("prop_1", "owner_1")),
        StoreState::with_reservation,
    )
}
