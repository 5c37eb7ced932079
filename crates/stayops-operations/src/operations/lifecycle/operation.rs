use std::sync::Arc;

use stayops_core::{Actor, LifecycleAction};
use stayops_saga::{Clock, Saga, SagaBuilder, StepTrace};
use tracing::{info, info_span, warn};

use super::context::LifecycleContext;
use super::result::RunResult;
use super::saga_data::LifecycleSagaData;
use super::saga_steps::{
    AuditStep, FinancialReconciliationStep, NotificationStep, StatusTransitionStep,
    TaskSpawningStep, ValidationStep,
};
use crate::config::OrchestratorConfig;
use crate::error::OperationError;
use crate::traits::{Completion, Notifier, Store};

type LifecycleSaga<'a> = Saga<LifecycleContext<'a>, LifecycleSagaData, OperationError>;

fn lifecycle_saga<'a>() -> LifecycleSaga<'a> {
    SagaBuilder::new()
        .first_step(ValidationStep)
        .then(StatusTransitionStep)
        .then(TaskSpawningStep)
        .then(FinancialReconciliationStep)
        .then(NotificationStep)
        .then(AuditStep)
        .build()
}

/// Names of the lifecycle steps, in execution order.
#[must_use]
pub fn lifecycle_step_names() -> Vec<&'static str> {
    lifecycle_saga().step_names()
}

/// Confirms or cancels reservations.
///
/// Each run executes the lifecycle saga inside one store transaction: all
/// of its writes are committed together, or none are when a step fails.
pub struct LifecycleOperation<S, N, K> {
    store: Arc<S>,
    notifier: Arc<N>,
    clock: Arc<K>,
    config: OrchestratorConfig,
}

impl<S, N, K> LifecycleOperation<S, N, K>
where
    S: Store,
    N: Notifier,
    K: Clock,
{
    pub fn new(store: S, notifier: N, clock: K, config: OrchestratorConfig) -> Self {
        Self {
            store: Arc::new(store),
            notifier: Arc::new(notifier),
            clock: Arc::new(clock),
            config,
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn confirm(&self, reservation_id: &str, actor: &Actor) -> RunResult {
        self.run(LifecycleAction::Confirm, reservation_id, actor, None)
    }

    pub fn cancel(&self, reservation_id: &str, actor: &Actor, reason: Option<&str>) -> RunResult {
        self.run(LifecycleAction::Cancel, reservation_id, actor, reason)
    }

    /// Runs `action` against the reservation. Never panics and never returns
    /// an error: every failure is reported through the result.
    pub fn run(
        &self,
        action: LifecycleAction,
        reservation_id: &str,
        actor: &Actor,
        reason: Option<&str>,
    ) -> RunResult {
        let span = info_span!(
            "lifecycle",
            %action,
            reservation = reservation_id,
            actor = %actor.id
        );
        let _enter = span.enter();

        let mut recorded: Option<StepTrace> = None;
        let outcome = self.store.transaction(|uow| {
            let ctx = LifecycleContext::new(uow, &*self.notifier, &*self.clock, &self.config);
            let mut data = LifecycleSagaData::new(action, reservation_id, actor, reason);

            let (result, trace) =
                lifecycle_saga().execute_with_trace(&ctx, &mut data, &*self.clock);
            recorded = Some(trace);

            match result {
                Ok(()) => Completion::Commit(Ok(data)),
                Err(err) => Completion::Rollback(Err(OperationError::from(err))),
            }
        });

        match outcome {
            Ok(Ok(data)) => {
                let trace = recorded.unwrap_or_default();
                info!(
                    status = ?data.final_status,
                    tasks_created = data.tasks_created.len(),
                    tasks_cancelled = data.tasks_cancelled,
                    ledger_entries = data.ledger_entries.len(),
                    "lifecycle run committed"
                );
                let message = match action {
                    LifecycleAction::Confirm => format!("reservation {reservation_id} confirmed"),
                    LifecycleAction::Cancel => format!("reservation {reservation_id} cancelled"),
                };
                RunResult::succeeded(action, reservation_id, message, trace)
            }
            Ok(Err(err)) => {
                warn!(error = %err, kind = ?err.kind(), "lifecycle run rolled back");
                RunResult::failed(reservation_id, &err, recorded.unwrap_or_default())
            }
            Err(err) => {
                // The transaction could not begin, or its commit failed.
                warn!(error = %err, "lifecycle transaction failed");
                let now = self.clock.now();
                let mut trace =
                    recorded.unwrap_or_else(|| StepTrace::planned(lifecycle_step_names(), now));
                trace.fail_remaining(&err.to_string(), now);
                RunResult::failed(reservation_id, &err, trace)
            }
        }
    }
}
