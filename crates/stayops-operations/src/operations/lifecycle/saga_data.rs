use stayops_core::{
    Actor, AuditLogEntry, FinancialTransaction, LifecycleAction, Property, Reservation,
    ReservationStatus, TaskRecord, TransactionType,
};

use crate::Result;
use crate::error::OperationError;
use crate::traits::NotificationKind;

/// State threaded through the lifecycle steps of one run.
#[derive(Debug, Clone)]
pub struct LifecycleSagaData {
    pub action: LifecycleAction,
    pub reservation_id: String,
    pub actor: Actor,
    /// Cancellation reason, trimmed; `None` when absent or blank.
    pub reason: Option<String>,

    pub reservation: Option<Reservation>,
    pub property: Option<Property>,

    pub previous_status: Option<ReservationStatus>,
    pub final_status: Option<ReservationStatus>,
    pub tasks_created: Vec<TaskRecord>,
    pub tasks_cancelled: usize,
    pub ledger_entries: Vec<FinancialTransaction>,
    pub notifications_sent: Vec<NotificationKind>,
    pub audit_entry: Option<AuditLogEntry>,
}

impl LifecycleSagaData {
    #[must_use]
    pub fn new(
        action: LifecycleAction,
        reservation_id: &str,
        actor: &Actor,
        reason: Option<&str>,
    ) -> Self {
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        Self {
            action,
            reservation_id: reservation_id.to_string(),
            actor: actor.clone(),
            reason,
            reservation: None,
            property: None,
            previous_status: None,
            final_status: None,
            tasks_created: Vec::new(),
            tasks_cancelled: 0,
            ledger_entries: Vec::new(),
            notifications_sent: Vec::new(),
            audit_entry: None,
        }
    }

    pub(super) fn loaded_reservation(&self) -> Result<&Reservation> {
        self.reservation
            .as_ref()
            .ok_or_else(|| OperationError::ReservationNotFound(self.reservation_id.clone()))
    }

    pub(super) fn loaded_property(&self) -> Result<&Property> {
        match (&self.property, &self.reservation) {
            (Some(property), _) => Ok(property),
            (None, Some(reservation)) => Err(OperationError::PropertyNotFound(
                reservation.property_id.clone(),
            )),
            (None, None) => Err(OperationError::ReservationNotFound(
                self.reservation_id.clone(),
            )),
        }
    }

    /// The refund row appended during this run, if any.
    #[must_use]
    pub fn refund(&self) -> Option<&FinancialTransaction> {
        self.ledger_entries
            .iter()
            .find(|t| t.kind == TransactionType::Refund)
    }
}

#[cfg(test)]
mod tests {
    use stayops_core::Role;

    use super::*;

    #[test]
    fn blank_reason_is_dropped() {
        let actor = Actor::new("admin_1", "admin@example.com", Role::Admin);

        let data = LifecycleSagaData::new(LifecycleAction::Cancel, "res_1", &actor, Some("   "));

        assert_eq!(data.reason, None);
    }

    #[test]
    fn reason_is_trimmed() {
        let actor = Actor::new("admin_1", "admin@example.com", Role::Admin);

        let data = LifecycleSagaData::new(
            LifecycleAction::Cancel,
            "res_1",
            &actor,
            Some("  guest request \n"),
        );

        assert_eq!(data.reason.as_deref(), Some("guest request"));
    }

    #[test]
    fn missing_reservation_reports_not_found() {
        let actor = Actor::new("admin_1", "admin@example.com", Role::Admin);
        let data = LifecycleSagaData::new(LifecycleAction::Confirm, "res_9", &actor, None);

        assert!(matches!(
            data.loaded_property(),
            Err(OperationError::ReservationNotFound(id)) if id == "res_9"
        ));
    }
}
