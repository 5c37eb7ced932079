use stayops_core::{
    AuditAction, AuditLogEntry, FinancialTransaction, LifecycleAction, Role, TaskKind, TaskRecord,
    TaskStatus, TransactionStatus, TransactionType, task_key, task_key_prefix,
};
use stayops_saga::{SagaStep, StepOutcome};
use tracing::{debug, warn};
use uuid::Uuid;

use super::context::LifecycleContext;
use super::saga_data::LifecycleSagaData;
use crate::Result;
use crate::error::{FailureKind, OperationError};
use crate::traits::{Channel, Notification, NotificationKind, TaskUpdate};

const ENTITY_TYPE: &str = "Reservation";

fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

/// Loads the reservation and its property, then checks the status
/// precondition and the actor's permission.
///
/// Only confirm requires the property row: it drives task assignment and the
/// owner notice. A cancel proceeds without it.
pub struct ValidationStep;

impl<'a> SagaStep<LifecycleContext<'a>> for ValidationStep {
    type Data = LifecycleSagaData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "validation"
    }

    fn execute(
        &self,
        ctx: &LifecycleContext<'a>,
        data: &mut LifecycleSagaData,
    ) -> Result<StepOutcome> {
        let reservation = ctx
            .uow()
            .find_reservation(&data.reservation_id)?
            .ok_or_else(|| OperationError::ReservationNotFound(data.reservation_id.clone()))?;
        let property = ctx.uow().find_property(&reservation.property_id)?;
        if data.action == LifecycleAction::Confirm && property.is_none() {
            return Err(OperationError::PropertyNotFound(
                reservation.property_id.clone(),
            ));
        }

        if !reservation.status.can_transition(data.action) {
            return Err(OperationError::InvalidStatus {
                reservation_id: reservation.id.clone(),
                status: reservation.status,
                action: data.action,
            });
        }

        if data.action == LifecycleAction::Confirm {
            let actor = &data.actor;
            if !actor.role.is_staff() {
                return Err(OperationError::RoleNotPermitted {
                    role: actor.role,
                    action: data.action,
                });
            }
            let assigned = reservation.agent_id.as_deref() == Some(actor.id.as_str());
            if actor.role == Role::Agent && !assigned {
                return Err(OperationError::AgentNotAssigned {
                    agent_id: actor.id.clone(),
                    reservation_id: reservation.id.clone(),
                });
            }
        }

        let message = format!(
            "reservation {} is {}; {} {} may {} it",
            reservation.id, reservation.status, data.actor.role, data.actor.id, data.action
        );
        data.previous_status = Some(reservation.status);
        data.reservation = Some(reservation);
        data.property = property;
        Ok(StepOutcome::completed(message))
    }

    fn rejects(&self, error: &OperationError) -> bool {
        error.kind() != FailureKind::Persistence
    }
}

pub struct StatusTransitionStep;

impl<'a> SagaStep<LifecycleContext<'a>> for StatusTransitionStep {
    type Data = LifecycleSagaData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "status_transition"
    }

    fn execute(
        &self,
        ctx: &LifecycleContext<'a>,
        data: &mut LifecycleSagaData,
    ) -> Result<StepOutcome> {
        let mut reservation = data.loaded_reservation()?.clone();
        let from = reservation.status;
        let to = from.transition(data.action)?;

        reservation.status = to;
        if let (LifecycleAction::Cancel, Some(reason)) = (data.action, &data.reason) {
            reservation.append_note(&format!("Cancellation reason: {reason}"));
        }
        reservation.updated_at = ctx.clock().now();
        ctx.uow().update_reservation(&reservation)?;

        debug!(reservation = %reservation.id, %from, %to, "reservation status updated");
        data.final_status = Some(to);
        data.reservation = Some(reservation);
        Ok(StepOutcome::completed(format!("status {from} -> {to}")))
    }
}

/// Creates the follow-up tasks on confirm; cancels every open task keyed to
/// the reservation on cancel.
pub struct TaskSpawningStep;

impl TaskSpawningStep {
    fn spawn(ctx: &LifecycleContext<'_>, data: &mut LifecycleSagaData) -> Result<StepOutcome> {
        let reservation = data.loaded_reservation()?;
        let property = data.loaded_property()?;
        let assignee = reservation
            .agent_id
            .as_ref()
            .or(property.default_agent_id.as_ref())
            .unwrap_or(&data.actor.id)
            .clone();
        let check_in = reservation.check_in_at();
        let cleaning_due = check_in
            .checked_sub_signed(ctx.config().cleaning_lead_time())
            .ok_or_else(|| OperationError::ScheduleOutOfRange {
                reservation_id: reservation.id.clone(),
            })?;
        let now = ctx.clock().now();

        let planned = [
            (TaskKind::PreArrivalCleaning, cleaning_due),
            (TaskKind::CheckInMeeting, check_in),
        ];

        let mut created = Vec::with_capacity(planned.len());
        for (kind, due_at) in planned {
            let task = TaskRecord {
                id: new_id("task"),
                key: task_key(&reservation.id, kind),
                kind,
                title: kind.title().to_string(),
                assignee_id: assignee.clone(),
                due_at,
                status: TaskStatus::Open,
                created_at: now,
                cancelled_by: None,
                cancelled_at: None,
            };
            ctx.uow().create_task(&task)?;
            debug!(
                key = %task.key,
                assignee = %task.assignee_id,
                due = %task.due_at,
                "created task"
            );
            created.push(task);
        }

        let message = format!("created {} tasks assigned to {assignee}", created.len());
        data.tasks_created = created;
        Ok(StepOutcome::completed(message))
    }

    fn cancel(ctx: &LifecycleContext<'_>, data: &mut LifecycleSagaData) -> Result<StepOutcome> {
        let update = TaskUpdate {
            status: TaskStatus::Cancelled,
            actor_id: data.actor.id.clone(),
            at: ctx.clock().now(),
        };
        let count = ctx
            .uow()
            .bulk_update_tasks_by_key_prefix(&task_key_prefix(&data.reservation_id), &update)?;

        data.tasks_cancelled = count;
        Ok(StepOutcome::completed(format!("cancelled {count} open tasks")))
    }
}

impl<'a> SagaStep<LifecycleContext<'a>> for TaskSpawningStep {
    type Data = LifecycleSagaData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "task_spawning"
    }

    fn execute(
        &self,
        ctx: &LifecycleContext<'a>,
        data: &mut LifecycleSagaData,
    ) -> Result<StepOutcome> {
        match data.action {
            LifecycleAction::Confirm => Self::spawn(ctx, data),
            LifecycleAction::Cancel => Self::cancel(ctx, data),
        }
    }
}

/// Appends the ledger row owed by the transition: revenue for the
/// outstanding balance on confirm, a negative refund of the paid amount on
/// cancel. Reservation amounts are never changed.
pub struct FinancialReconciliationStep;

impl<'a> SagaStep<LifecycleContext<'a>> for FinancialReconciliationStep {
    type Data = LifecycleSagaData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "financial_reconciliation"
    }

    fn execute(
        &self,
        ctx: &LifecycleContext<'a>,
        data: &mut LifecycleSagaData,
    ) -> Result<StepOutcome> {
        let reservation = data.loaded_reservation()?;

        let (kind, amount, description) = match data.action {
            LifecycleAction::Confirm => {
                if reservation.paid_amount >= reservation.total_amount {
                    return Ok(StepOutcome::completed("no outstanding balance"));
                }
                (
                    TransactionType::Revenue,
                    reservation.total_amount - reservation.paid_amount,
                    format!("Outstanding balance for reservation {}", reservation.id),
                )
            }
            LifecycleAction::Cancel => {
                if reservation.paid_amount <= 0 {
                    return Ok(StepOutcome::completed("no payment to refund"));
                }
                (
                    TransactionType::Refund,
                    -reservation.paid_amount,
                    format!("Refund for cancelled reservation {}", reservation.id),
                )
            }
        };

        let transaction = FinancialTransaction {
            id: new_id("txn"),
            kind,
            amount,
            reservation_id: reservation.id.clone(),
            property_id: reservation.property_id.clone(),
            guest_id: reservation.guest_id.clone(),
            status: TransactionStatus::Pending,
            description,
            created_at: ctx.clock().now(),
        };
        ctx.uow().create_transaction(&transaction)?;

        let message = format!("recorded {kind} of {amount}");
        data.ledger_entries.push(transaction);
        Ok(StepOutcome::completed(message))
    }
}

/// Best-effort guest and owner notifications. Delivery failures are
/// reported as a soft failure and never abort the run.
pub struct NotificationStep;

impl NotificationStep {
    fn plan(ctx: &LifecycleContext<'_>, data: &LifecycleSagaData) -> Result<Vec<Notification>> {
        let reservation = data.loaded_reservation()?;
        let config = ctx.config();
        let place = data
            .property
            .as_ref()
            .map_or(reservation.property_id.as_str(), |p| p.name.as_str());
        let stay = format!(
            "{place} from {} to {}",
            reservation.check_in, reservation.check_out
        );

        let mut planned = Vec::new();
        match data.action {
            LifecycleAction::Confirm => {
                let property = data.loaded_property()?;
                planned.push(Notification {
                    recipient_id: reservation.guest_id.clone(),
                    channel: config.guest_channel(),
                    kind: NotificationKind::ReservationConfirmed,
                    subject: format!("Reservation {} confirmed", reservation.id),
                    body: format!("Your stay at {stay} is confirmed."),
                });
                if config.notify_owner_on_confirm() {
                    planned.push(Notification {
                        recipient_id: property.owner_id.clone(),
                        channel: Channel::Email,
                        kind: NotificationKind::OwnerBookingConfirmed,
                        subject: format!("New booking at {}", property.name),
                        body: format!("Reservation {} at {stay} is confirmed.", reservation.id),
                    });
                }
            }
            LifecycleAction::Cancel => {
                let body = match &data.reason {
                    Some(reason) => {
                        format!("Your reservation at {stay} has been cancelled. Reason: {reason}")
                    }
                    None => format!("Your reservation at {stay} has been cancelled."),
                };
                planned.push(Notification {
                    recipient_id: reservation.guest_id.clone(),
                    channel: config.guest_channel(),
                    kind: NotificationKind::ReservationCancelled,
                    subject: format!("Reservation {} cancelled", reservation.id),
                    body,
                });
                if let Some(refund) = data.refund().filter(|_| config.refund_notice_on_cancel()) {
                    planned.push(Notification {
                        recipient_id: reservation.guest_id.clone(),
                        channel: config.guest_channel(),
                        kind: NotificationKind::RefundIssued,
                        subject: format!("Refund for reservation {}", reservation.id),
                        body: format!("A refund of {} has been issued.", refund.amount.abs()),
                    });
                }
            }
        }
        Ok(planned)
    }
}

impl<'a> SagaStep<LifecycleContext<'a>> for NotificationStep {
    type Data = LifecycleSagaData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "notification"
    }

    fn execute(
        &self,
        ctx: &LifecycleContext<'a>,
        data: &mut LifecycleSagaData,
    ) -> Result<StepOutcome> {
        let planned = Self::plan(ctx, data)?;
        let total = planned.len();

        let mut failures = Vec::new();
        for notification in planned {
            match ctx.notifier().send(&notification) {
                Ok(()) => data.notifications_sent.push(notification.kind),
                Err(err) => {
                    warn!(
                        recipient = %notification.recipient_id,
                        kind = ?notification.kind,
                        error = %err,
                        "notification failed"
                    );
                    failures.push(err.to_string());
                }
            }
        }

        if failures.is_empty() {
            Ok(StepOutcome::completed(format!("sent {total} notifications")))
        } else {
            Ok(StepOutcome::soft_failed(format!(
                "{} of {total} notifications failed: {}",
                failures.len(),
                failures.join("; ")
            )))
        }
    }
}

pub struct AuditStep;

impl<'a> SagaStep<LifecycleContext<'a>> for AuditStep {
    type Data = LifecycleSagaData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "audit"
    }

    fn execute(
        &self,
        ctx: &LifecycleContext<'a>,
        data: &mut LifecycleSagaData,
    ) -> Result<StepOutcome> {
        let action = match data.action {
            LifecycleAction::Confirm => AuditAction::ReservationConfirmed,
            LifecycleAction::Cancel => AuditAction::ReservationCancelled,
        };
        let entry = AuditLogEntry {
            id: new_id("audit"),
            actor_id: data.actor.id.clone(),
            action,
            entity_type: ENTITY_TYPE.to_string(),
            entity_id: data.reservation_id.clone(),
            timestamp: ctx.clock().now(),
            detail: data.reason.clone(),
        };
        ctx.uow().append_audit(&entry)?;

        data.audit_entry = Some(entry);
        Ok(StepOutcome::completed(format!("recorded {action}")))
    }
}
