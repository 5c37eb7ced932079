use super::{AuditRepo, LedgerRepo, PropertyRepo, ReservationRepo, TaskRepo};
use crate::Result;

/// All repositories reachable inside one transaction.
pub trait UnitOfWork: ReservationRepo + PropertyRepo + LedgerRepo + TaskRepo + AuditRepo {}

impl<T> UnitOfWork for T where T: ReservationRepo + PropertyRepo + LedgerRepo + TaskRepo + AuditRepo {}

/// How a unit of work asks its transaction to end.
#[derive(Debug)]
pub enum Completion<T> {
    Commit(T),
    Rollback(T),
}

impl<T> Completion<T> {
    #[must_use]
    pub fn is_commit(&self) -> bool {
        matches!(self, Self::Commit(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Commit(value) | Self::Rollback(value) => value,
        }
    }
}

/// Transactional access to persisted entities.
///
/// Implementations run `work` against a single transaction and make either
/// all of its writes visible (on `Commit`) or none of them (on `Rollback`).
/// Concurrent transactions are serialized.
pub trait Store: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or committed.
    /// A failed commit leaves no writes visible.
    fn transaction<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&dyn UnitOfWork) -> Completion<T>;
}
