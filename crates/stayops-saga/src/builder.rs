use std::fmt::{Debug, Display};
use std::marker::PhantomData;

use crate::saga::{BoxedStep, Saga};
use crate::step::SagaStep;

/// Marker type for a builder with no steps.
pub struct Empty;

/// Marker type for a builder with at least one step.
pub struct HasSteps;

/// Type-state builder for constructing sagas.
///
/// Every step shares the same context, data and error types. A saga cannot
/// be built without at least one step:
///
/// ```compile_fail
/// use stayops_saga::SagaBuilder;
///
/// // `build()` is only available after `first_step()`
/// let saga = SagaBuilder::<(), (), String, _>::new().build();
/// ```
pub struct SagaBuilder<Ctx, Data, Err, State> {
    steps: Vec<BoxedStep<Ctx, Data, Err>>,
    _state: PhantomData<State>,
}

impl<Ctx, Data, Err> SagaBuilder<Ctx, Data, Err, Empty> {
    /// Create a new saga builder in the empty state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            _state: PhantomData,
        }
    }

    /// Add the first step to the saga.
    #[must_use]
    pub fn first_step<S>(self, step: S) -> SagaBuilder<Ctx, Data, Err, HasSteps>
    where
        S: SagaStep<Ctx, Data = Data, Error = Err> + 'static,
    {
        let mut steps = self.steps;
        steps.push(Box::new(step));
        SagaBuilder {
            steps,
            _state: PhantomData,
        }
    }
}

impl<Ctx, Data, Err> Default for SagaBuilder<Ctx, Data, Err, Empty> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx, Data, Err> SagaBuilder<Ctx, Data, Err, HasSteps> {
    /// Add another step to the saga.
    #[must_use]
    pub fn then<S>(mut self, step: S) -> Self
    where
        S: SagaStep<Ctx, Data = Data, Error = Err> + 'static,
    {
        self.steps.push(Box::new(step));
        self
    }

    /// Build the saga from the accumulated steps.
    #[must_use]
    pub fn build(self) -> Saga<Ctx, Data, Err>
    where
        Err: Debug + Display,
    {
        Saga::from_steps(self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::StepOutcome;

    struct TestContext;

    struct Increment;

    impl SagaStep<TestContext> for Increment {
        type Data = i32;
        type Error = String;

        fn name(&self) -> &'static str {
            "increment"
        }

        fn execute(&self, _ctx: &TestContext, data: &mut i32) -> Result<StepOutcome, String> {
            *data += 1;
            Ok(StepOutcome::completed("incremented"))
        }
    }

    #[test]
    fn builder_creates_single_step_saga() {
        let saga: Saga<TestContext, i32, String> =
            SagaBuilder::new().first_step(Increment).build();

        assert_eq!(saga.step_names(), vec!["increment"]);
    }

    #[test]
    fn builder_keeps_step_order() {
        let saga: Saga<TestContext, i32, String> = SagaBuilder::new()
            .first_step(Increment)
            .then(Increment)
            .then(Increment)
            .build();

        assert_eq!(saga.len(), 3);
    }
}
