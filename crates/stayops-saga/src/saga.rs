use std::fmt::{Debug, Display};

use tracing::{debug, warn};

use crate::clock::Clock;
use crate::error::SagaError;
use crate::step::{SagaStep, StepOutcome};
use crate::trace::StepTrace;

pub(crate) type BoxedStep<Ctx, Data, Err> = Box<dyn SagaStep<Ctx, Data = Data, Error = Err>>;

/// A compiled saga ready for execution.
///
/// Steps run in registration order. The first step returning `Err` aborts the
/// run and no further step executes. The failing step is marked `failed`.
/// If the step [rejects](SagaStep::rejects) the error the trace stops there;
/// otherwise every step that has not run yet is marked `failed` with the
/// same message.
pub struct Saga<Ctx, Data, Err> {
    steps: Vec<BoxedStep<Ctx, Data, Err>>,
}

impl<Ctx, Data, Err> Saga<Ctx, Data, Err>
where
    Err: Debug + Display,
{
    pub(crate) fn from_steps(steps: Vec<BoxedStep<Ctx, Data, Err>>) -> Self {
        Self { steps }
    }

    #[must_use]
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Execute the saga.
    ///
    /// # Errors
    ///
    /// Returns `SagaError::StepFailed` with the first step error.
    pub fn execute(
        &self,
        ctx: &Ctx,
        data: &mut Data,
        clock: &dyn Clock,
    ) -> Result<(), SagaError<Err>> {
        let (result, _trace) = self.execute_with_trace(ctx, data, clock);
        result
    }

    /// Execute the saga and return both the result and the step trace.
    pub fn execute_with_trace(
        &self,
        ctx: &Ctx,
        data: &mut Data,
        clock: &dyn Clock,
    ) -> (Result<(), SagaError<Err>>, StepTrace) {
        let mut trace = StepTrace::planned(self.step_names(), clock.now());

        for (index, step) in self.steps.iter().enumerate() {
            let name = step.name();
            debug!(step = name, index, "executing saga step");

            match step.execute(ctx, data) {
                Ok(StepOutcome::Completed(message)) => {
                    debug!(step = name, %message, "saga step completed");
                    trace.record_completed(index, message, clock.now());
                }
                Ok(StepOutcome::SoftFailed(message)) => {
                    warn!(step = name, %message, "saga step failed without aborting");
                    trace.record_failure(index, message, clock.now());
                }
                Err(error) => {
                    let message = error.to_string();
                    let at = clock.now();
                    trace.record_failure(index, message.clone(), at);
                    if step.rejects(&error) {
                        trace.truncate(index + 1);
                        warn!(step = name, %message, "saga rejected");
                    } else {
                        let skipped = trace.fail_remaining(&message, at);
                        warn!(step = name, %message, skipped, "saga step failed, aborting");
                    }
                    return (
                        Err(SagaError::StepFailed {
                            step: name.to_string(),
                            source: error,
                        }),
                        trace,
                    );
                }
            }
        }

        (Ok(()), trace)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::{DateTime, Utc};

    use super::*;
    use crate::builder::SagaBuilder;
    use crate::trace::StepStatus;

    struct TestContext {
        log: RefCell<Vec<String>>,
    }

    impl TestContext {
        fn new() -> Self {
            Self {
                log: RefCell::new(Vec::new()),
            }
        }
    }

    struct EpochClock;

    impl Clock for EpochClock {
        fn now(&self) -> DateTime<Utc> {
            DateTime::<Utc>::UNIX_EPOCH
        }
    }

    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("{0}")]
    struct TestError(String);

    struct AddStep {
        name: &'static str,
        value: i32,
    }

    impl SagaStep<TestContext> for AddStep {
        type Data = i32;
        type Error = TestError;

        fn name(&self) -> &'static str {
            self.name
        }

        fn execute(&self, ctx: &TestContext, data: &mut i32) -> Result<StepOutcome, TestError> {
            ctx.log.borrow_mut().push(self.name.to_string());
            *data += self.value;
            Ok(StepOutcome::completed(format!("added {}", self.value)))
        }
    }

    struct FailingStep;

    impl SagaStep<TestContext> for FailingStep {
        type Data = i32;
        type Error = TestError;

        fn name(&self) -> &'static str {
            "failing"
        }

        fn execute(&self, _ctx: &TestContext, _data: &mut i32) -> Result<StepOutcome, TestError> {
            Err(TestError("boom".to_string()))
        }
    }

    struct GuardStep;

    impl SagaStep<TestContext> for GuardStep {
        type Data = i32;
        type Error = TestError;

        fn name(&self) -> &'static str {
            "guard"
        }

        fn execute(&self, _ctx: &TestContext, data: &mut i32) -> Result<StepOutcome, TestError> {
            if *data < 0 {
                return Err(TestError("negative".to_string()));
            }
            Ok(StepOutcome::completed("non-negative"))
        }

        fn rejects(&self, error: &TestError) -> bool {
            error.0 == "negative"
        }
    }

    struct SoftFailingStep;

    impl SagaStep<TestContext> for SoftFailingStep {
        type Data = i32;
        type Error = TestError;

        fn name(&self) -> &'static str {
            "soft"
        }

        fn execute(&self, _ctx: &TestContext, _data: &mut i32) -> Result<StepOutcome, TestError> {
            Ok(StepOutcome::soft_failed("notifier offline"))
        }
    }

    #[test]
    fn steps_run_in_order_against_shared_data() -> anyhow::Result<()> {
        let ctx = TestContext::new();
        let saga = SagaBuilder::new()
            .first_step(AddStep {
                name: "add_10",
                value: 10,
            })
            .then(AddStep {
                name: "add_5",
                value: 5,
            })
            .build();

        let mut data = 1;
        saga.execute(&ctx, &mut data, &EpochClock)?;

        assert_eq!(data, 16);
        assert_eq!(*ctx.log.borrow(), vec!["add_10", "add_5"]);
        Ok(())
    }

    #[test]
    fn failure_stops_execution_and_fails_remaining_steps() {
        let ctx = TestContext::new();
        let saga = SagaBuilder::new()
            .first_step(AddStep {
                name: "add_10",
                value: 10,
            })
            .then(FailingStep)
            .then(AddStep {
                name: "add_5",
                value: 5,
            })
            .build();

        let mut data = 0;
        let (result, trace) = saga.execute_with_trace(&ctx, &mut data, &EpochClock);

        let err = result.expect_err("saga should fail");
        assert_eq!(err.step(), "failing");
        assert_eq!(*ctx.log.borrow(), vec!["add_10"]);

        let records = trace.records();
        assert_eq!(records[0].status, StepStatus::Completed);
        assert_eq!(records[1].status, StepStatus::Failed);
        assert_eq!(records[1].message, "boom");
        assert_eq!(records[2].status, StepStatus::Failed);
        assert_eq!(records[2].message, "boom");
    }

    #[test]
    fn first_step_failure_fails_every_step() {
        let ctx = TestContext::new();
        let saga = SagaBuilder::new()
            .first_step(FailingStep)
            .then(AddStep {
                name: "add_1",
                value: 1,
            })
            .build();

        let mut data = 0;
        let (result, trace) = saga.execute_with_trace(&ctx, &mut data, &EpochClock);

        assert!(matches!(result, Err(SagaError::StepFailed { step, .. }) if step == "failing"));
        assert_eq!(trace.count(StepStatus::Failed), 2);
        assert_eq!(data, 0);
    }

    #[test]
    fn rejection_ends_trace_at_rejecting_step() {
        let ctx = TestContext::new();
        let saga = SagaBuilder::new()
            .first_step(AddStep {
                name: "add_1",
                value: 1,
            })
            .then(GuardStep)
            .then(AddStep {
                name: "add_2",
                value: 2,
            })
            .build();

        let mut data = -5;
        let (result, trace) = saga.execute_with_trace(&ctx, &mut data, &EpochClock);

        assert!(matches!(result, Err(SagaError::StepFailed { step, .. }) if step == "guard"));
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.records()[0].status, StepStatus::Completed);
        assert_eq!(trace.records()[1].status, StepStatus::Failed);
        assert_eq!(trace.records()[1].message, "negative");
        assert_eq!(data, -4);
    }

    #[test]
    fn soft_failure_is_recorded_and_execution_continues() -> anyhow::Result<()> {
        let ctx = TestContext::new();
        let saga = SagaBuilder::new()
            .first_step(SoftFailingStep)
            .then(AddStep {
                name: "add_2",
                value: 2,
            })
            .build();

        let mut data = 0;
        let (result, trace) = saga.execute_with_trace(&ctx, &mut data, &EpochClock);
        result?;

        assert_eq!(data, 2);
        assert_eq!(trace.records()[0].status, StepStatus::Failed);
        assert_eq!(trace.records()[0].message, "notifier offline");
        assert_eq!(trace.records()[1].status, StepStatus::Completed);
        Ok(())
    }

    #[test]
    fn successful_trace_carries_step_messages() {
        let ctx = TestContext::new();
        let saga = SagaBuilder::new()
            .first_step(AddStep {
                name: "add_3",
                value: 3,
            })
            .build();

        let mut data = 0;
        let (result, trace) = saga.execute_with_trace(&ctx, &mut data, &EpochClock);

        assert!(result.is_ok());
        assert!(trace.all_completed());
        assert_eq!(trace.records()[0].message, "added 3");
    }
}
