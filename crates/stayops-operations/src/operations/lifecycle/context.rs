use stayops_saga::Clock;

use crate::config::OrchestratorConfig;
use crate::traits::{Notifier, UnitOfWork};

/// Collaborators shared by every lifecycle step for the length of one
/// transaction.
pub struct LifecycleContext<'a> {
    uow: &'a dyn UnitOfWork,
    notifier: &'a dyn Notifier,
    clock: &'a dyn Clock,
    config: &'a OrchestratorConfig,
}

impl<'a> LifecycleContext<'a> {
    pub fn new(
        uow: &'a dyn UnitOfWork,
        notifier: &'a dyn Notifier,
        clock: &'a dyn Clock,
        config: &'a OrchestratorConfig,
    ) -> Self {
        Self {
            uow,
            notifier,
            clock,
            config,
        }
    }

    #[must_use]
    pub fn uow(&self) -> &'a dyn UnitOfWork {
        self.uow
    }

    #[must_use]
    pub fn notifier(&self) -> &'a dyn Notifier {
        self.notifier
    }

    #[must_use]
    pub fn clock(&self) -> &'a dyn Clock {
        self.clock
    }

    #[must_use]
    pub fn config(&self) -> &'a OrchestratorConfig {
        self.config
    }
}
